pub mod content;
pub mod span;
pub mod tool;
pub mod turn;
