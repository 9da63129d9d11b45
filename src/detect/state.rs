use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::FilterResult;

/// Emitted once per rising edge of the filtered detection signal. Consumed
/// immediately by the notification fan-out; never queued.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct AlertEvent {
    pub species: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum AlertState {
    Idle,
    Active,
}

/// Edge-triggered alert latch.
///
/// A sustained detection across consecutive frames yields exactly one event;
/// a new event requires at least one frame without a qualifying detection
/// first. Flicker across the threshold on alternating frames will re-trigger
/// on every rising edge, a known limitation kept deliberately (no debounce
/// beyond the single-frame edge logic).
#[derive(Debug)]
pub struct AlertStateMachine {
    state: AlertState,
}

impl AlertStateMachine {
    pub fn new() -> AlertStateMachine {
        AlertStateMachine {
            state: AlertState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == AlertState::Active
    }

    /// Advances the machine by one frame. Returns an event only on the
    /// Idle → Active transition.
    pub fn on_frame(&mut self, result: &FilterResult) -> Option<AlertEvent> {
        match (self.state, result.present) {
            (AlertState::Idle, true) => {
                self.state = AlertState::Active;
                result.species.as_deref().map(|species| AlertEvent {
                    species: species.to_string(),
                    timestamp: Utc::now(),
                })
            }
            (AlertState::Active, false) => {
                self.state = AlertState::Idle;
                None
            }
            _ => None,
        }
    }
}
