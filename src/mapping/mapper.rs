//! Event mapper - resolves input events to symbolic action names
//!
//! Pure lookup against the loaded mapping configuration. An event without a
//! mapping resolves to `None`; that is a normal outcome the caller reports
//! distinctly, not an error.

use crate::gamepad::types::{AxisClass, AxisId, InputEvent};
use crate::mapping::config::{AxisActions, MappingConfig};
use log::trace;
use std::collections::HashMap;

/// A resolved action: the symbolic name plus the event that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub event: InputEvent,
}

/// Resolves button edges and axis transitions to action names
#[derive(Debug, Clone, Default)]
pub struct EventMapper {
    buttons: HashMap<u8, String>,
    axes: HashMap<AxisId, AxisActions>,
}

impl EventMapper {
    /// Build a mapper from a validated mapping configuration
    ///
    /// Button keys that do not parse as indices were already rejected by
    /// `Config::validate` and are skipped here.
    pub fn new(config: &MappingConfig) -> Self {
        let buttons = config
            .buttons
            .iter()
            .filter_map(|(key, name)| Some((key.parse().ok()?, name.clone())))
            .collect();

        Self {
            buttons,
            axes: config.axes.clone(),
        }
    }

    /// Resolve one event to an action, or `None` when no mapping exists
    ///
    /// Transitions back to neutral never resolve; only entering a low/high
    /// class can drive an action.
    pub fn resolve(&self, event: &InputEvent) -> Option<Action> {
        let name = match event {
            InputEvent::ButtonEdge { index, .. } => self.buttons.get(index)?,
            InputEvent::AxisTransition { axis, to, .. } => {
                let actions = self.axes.get(axis)?;
                match to {
                    AxisClass::Low => actions.low.as_ref()?,
                    AxisClass::High => actions.high.as_ref()?,
                    AxisClass::Neutral => return None,
                }
            }
        };

        trace!("Resolved {:?} -> '{}'", event, name);
        Some(Action {
            name: name.clone(),
            event: *event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mapper() -> EventMapper {
        let mut config = MappingConfig::default();
        config.buttons.insert("0".to_string(), "jump".to_string());
        config.buttons.insert("3".to_string(), "reload".to_string());
        config.axes.insert(
            AxisId::LeftX,
            AxisActions {
                low: Some("steer_left".to_string()),
                high: Some("steer_right".to_string()),
            },
        );
        config.axes.insert(
            AxisId::DpadY,
            AxisActions {
                low: Some("menu_up".to_string()),
                high: None,
            },
        );
        EventMapper::new(&config)
    }

    #[test]
    fn test_button_resolution() {
        let mapper = test_mapper();
        let event = InputEvent::ButtonEdge {
            index: 0,
            pressed: true,
        };
        let action = mapper.resolve(&event).unwrap();
        assert_eq!(action.name, "jump");
        assert_eq!(action.event, event);

        // Unmapped button is a normal miss
        assert!(mapper
            .resolve(&InputEvent::ButtonEdge {
                index: 7,
                pressed: true,
            })
            .is_none());
    }

    #[test]
    fn test_axis_resolution() {
        let mapper = test_mapper();
        let action = mapper
            .resolve(&InputEvent::AxisTransition {
                axis: AxisId::LeftX,
                from: AxisClass::Neutral,
                to: AxisClass::High,
            })
            .unwrap();
        assert_eq!(action.name, "steer_right");

        // Half-mapped axis: only the configured direction resolves
        assert!(mapper
            .resolve(&InputEvent::AxisTransition {
                axis: AxisId::DpadY,
                from: AxisClass::Neutral,
                to: AxisClass::High,
            })
            .is_none());
    }

    #[test]
    fn test_neutral_transitions_never_resolve() {
        let mapper = test_mapper();
        assert!(mapper
            .resolve(&InputEvent::AxisTransition {
                axis: AxisId::LeftX,
                from: AxisClass::High,
                to: AxisClass::Neutral,
            })
            .is_none());
    }

    #[test]
    fn test_unmapped_axis() {
        let mapper = test_mapper();
        assert!(mapper
            .resolve(&InputEvent::AxisTransition {
                axis: AxisId::RightY,
                from: AxisClass::Neutral,
                to: AxisClass::Low,
            })
            .is_none());
    }
}
