//! Per-view state: span toggles, load state and the stale-response guard.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TraceDeckError};
use crate::model::turn::Neighbors;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Pretty,
    Json,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Pretty => Self::Json,
            Self::Json => Self::Pretty,
        }
    }
}

impl FromStr for ViewMode {
    type Err = TraceDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(TraceDeckError::Parse(format!("unknown view mode: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SpanToggle {
    expanded: bool,
    view_mode: ViewMode,
}

/// Expand and view-mode toggles keyed by span id.
#[derive(Debug, Clone, Default)]
pub struct SpanViewState {
    spans: HashMap<String, SpanToggle>,
}

impl SpanViewState {
    pub fn is_expanded(&self, span_id: &str) -> bool {
        self.spans.get(span_id).is_some_and(|t| t.expanded)
    }

    pub fn view_mode(&self, span_id: &str) -> ViewMode {
        self.spans
            .get(span_id)
            .map(|t| t.view_mode)
            .unwrap_or_default()
    }

    pub fn set_expanded(&mut self, span_id: &str, expanded: bool) {
        self.entry(span_id).expanded = expanded;
    }

    pub fn toggle_expanded(&mut self, span_id: &str) -> bool {
        let toggle = self.entry(span_id);
        toggle.expanded = !toggle.expanded;
        toggle.expanded
    }

    pub fn set_view_mode(&mut self, span_id: &str, mode: ViewMode) {
        self.entry(span_id).view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self, span_id: &str) -> ViewMode {
        let toggle = self.entry(span_id);
        toggle.view_mode = toggle.view_mode.toggled();
        toggle.view_mode
    }

    pub fn reset(&mut self) {
        self.spans.clear();
    }

    fn entry(&mut self, span_id: &str) -> &mut SpanToggle {
        self.spans.entry(span_id.to_string()).or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Identifies one load: the id it was issued for and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: String,
    generation: u64,
}

impl Ticket {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    generation: u64,
    current: Option<Ticket>,
}

impl RequestGuard {
    /// Issues a new ticket and invalidates every earlier one.
    pub fn begin(&mut self, id: impl Into<String>) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            id: id.into(),
            generation: self.generation,
        };
        self.current = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.as_ref() == Some(ticket)
    }
}

/// A conversation or trace detail view.
#[derive(Debug, Clone)]
pub struct DetailView<T> {
    guard: RequestGuard,
    state: LoadState<T>,
    neighbors: Option<Neighbors>,
    spans: SpanViewState,
}

impl<T> Default for DetailView<T> {
    fn default() -> Self {
        Self {
            guard: RequestGuard::default(),
            state: LoadState::Loading,
            neighbors: None,
            spans: SpanViewState::default(),
        }
    }
}

impl<T> DetailView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts loading `id`. Span toggles and neighbors from the previous id are dropped.
    pub fn navigate(&mut self, id: impl Into<String>) -> Ticket {
        self.spans.reset();
        self.state = LoadState::Loading;
        self.neighbors = None;
        self.guard.begin(id)
    }

    /// Returns `false` when the result belongs to a superseded load.
    pub fn apply_data(&mut self, ticket: &Ticket, result: Result<T>) -> bool {
        if !self.guard.is_current(ticket) {
            debug!(
                id = ticket.id(),
                generation = ticket.generation(),
                "discarding stale data response"
            );
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        true
    }

    pub fn apply_neighbors(&mut self, ticket: &Ticket, result: Result<Neighbors>) -> bool {
        if !self.guard.is_current(ticket) {
            debug!(
                id = ticket.id(),
                generation = ticket.generation(),
                "discarding stale neighbors response"
            );
            return false;
        }
        match result {
            Ok(neighbors) => self.neighbors = Some(neighbors),
            Err(err) => {
                warn!(id = ticket.id(), error = %err, "neighbors unavailable; navigation disabled");
                self.neighbors = None;
            }
        }
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn neighbors(&self) -> Option<&Neighbors> {
        self.neighbors.as_ref()
    }

    pub fn spans(&self) -> &SpanViewState {
        &self.spans
    }

    pub fn spans_mut(&mut self) -> &mut SpanViewState {
        &mut self.spans
    }
}
