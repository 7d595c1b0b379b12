//! Proportional Gantt layout.
//!
//! Every bar in a view is measured against one shared denominator, so bars of
//! different turns stay comparable. Computed values are left raw; only
//! [`BarGeometry`] is adjusted for drawing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::span::SpanRecord;

/// Narrowest bar drawn, as a percentage of the track.
pub const MIN_BAR_PERCENT: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl TimelineLayout {
    /// `offset_ms` is measured from the start of the owning turn.
    pub fn compute(offset_ms: f64, duration_ms: f64, global_duration_ms: f64) -> Self {
        if global_duration_ms.is_nan() || global_duration_ms <= 0.0 {
            return Self::default();
        }
        Self {
            left_percent: (offset_ms / global_duration_ms) * 100.0,
            width_percent: (duration_ms / global_duration_ms) * 100.0,
        }
    }

    pub fn geometry(&self) -> BarGeometry {
        let left_percent = if self.left_percent.is_finite() {
            self.left_percent
        } else {
            0.0
        };
        let width_percent = if self.width_percent.is_finite() && self.width_percent >= 0.0 {
            self.width_percent.max(MIN_BAR_PERCENT)
        } else {
            MIN_BAR_PERCENT
        };

        BarGeometry {
            left_percent,
            width_percent,
            end_percent: left_percent + width_percent,
        }
    }
}

/// What actually gets drawn: finite, with the visibility floor applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
    pub end_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAnomaly {
    NegativeDuration,
    UnparseableTimestamp,
}

impl LayoutAnomaly {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NegativeDuration => "negative_duration",
            Self::UnparseableTimestamp => "unparseable_timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLayout {
    #[serde(flatten)]
    pub timeline: TimelineLayout,
    pub bar: BarGeometry,
    pub anomaly: Option<LayoutAnomaly>,
}

/// Lays out `span` against a view whose time axis starts at `origin_ms`.
pub fn layout_span(span: &SpanRecord, origin_ms: f64, global_duration_ms: f64) -> SpanLayout {
    let start_ms = span.started_at.millis();
    let duration_ms = span.duration_ms();
    let offset_ms = start_ms - origin_ms;

    let anomaly = if offset_ms.is_nan() || duration_ms.is_nan() {
        Some(LayoutAnomaly::UnparseableTimestamp)
    } else if duration_ms < 0.0 {
        Some(LayoutAnomaly::NegativeDuration)
    } else {
        None
    };

    if let Some(anomaly) = anomaly {
        warn!(
            span_id = %span.id,
            trace_id = %span.trace_id,
            started_at = %span.started_at.display(),
            ended_at = %span.ended_at.display(),
            anomaly = anomaly.as_str(),
            "span timing is malformed; rendering degenerate bar"
        );
    }

    let timeline = TimelineLayout::compute(offset_ms, duration_ms, global_duration_ms);
    SpanLayout {
        timeline,
        bar: timeline.geometry(),
        anomaly,
    }
}
