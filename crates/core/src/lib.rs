pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod group;
pub mod ids;
pub mod layout;
pub mod model;
pub mod presentation;
pub mod source;
pub mod time;
pub mod view;

pub use error::{Result, TraceDeckError};
