use serde::Deserialize;
use shared::models::Timestamp;

use crate::dom_ids;

/// Pointer position relative to the chart container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Pointer moved over (or left) the chart. `time` is the bar under the
/// pointer, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrosshairEvent {
    pub point: Option<Point>,
    pub time: Option<Timestamp>,
}

impl CrosshairEvent {
    pub fn at(x: f64, y: f64, time: Option<Timestamp>) -> Self {
        Self {
            point: Some(Point { x, y }),
            time,
        }
    }

    pub fn left() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeEvent {
    /// Element id of the observed element.
    pub target: String,
    pub width: f64,
    pub height: f64,
}

/// Content box posted by the chart container's resize observer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct ObservedSize {
    width: f64,
    height: f64,
}

impl ResizeEvent {
    pub fn chart_container(width: f64, height: f64) -> Self {
        Self {
            target: dom_ids::CHART_CONTAINER.to_string(),
            width,
            height,
        }
    }

    /// Decodes one observer message for the chart container.
    pub fn from_observer(message: serde_json::Value) -> Result<Self, serde_json::Error> {
        let size: ObservedSize = serde_json::from_value(message)?;
        Ok(Self::chart_container(size.width, size.height))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    LoadClicked,
    SymbolChanged,
    DateChanged,
    Crosshair(CrosshairEvent),
    Resized(ResizeEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn observer_message_targets_chart_container() {
        let event = ResizeEvent::from_observer(json!({ "width": 1024.5, "height": 480 })).unwrap();
        assert_eq!(event, ResizeEvent::chart_container(1024.5, 480.0));
        assert_eq!(event.target, dom_ids::CHART_CONTAINER);
    }

    #[test]
    fn malformed_observer_message_is_rejected() {
        assert!(ResizeEvent::from_observer(json!({ "width": "wide" })).is_err());
        assert!(ResizeEvent::from_observer(json!(null)).is_err());
    }
}
