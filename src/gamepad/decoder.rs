//! Report decoding and the input-event state machine
//!
//! `decode_report` is the single entry point for one report tick: it runs the
//! axis, hat, and button decoders against a validated layout, compares the
//! results to the tracker state, and returns only the edges. It performs no
//! I/O and never blocks, so it is safe to call directly on the task that
//! receives reports.

use crate::gamepad::layout::{ButtonSpec, HatSpec, IdleOrder, ReportLayout};
use crate::gamepad::tracker::{classify, TrackerState};
use crate::gamepad::types::{AxisClass, AxisId, InputEvent};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The report is shorter than the layout requires. The tick is skipped
    /// and tracker state is left untouched.
    #[error("truncated report: got {got} bytes, layout requires {need}")]
    Truncated { got: usize, need: usize },
}

/// Canonical hat direction table, nibble value -> (x, y)
///
/// 0 is up, continuing clockwise through 7 = up-left. x: low = left,
/// high = right; y: low = up, high = down. Any value >= 8 means centered.
const HAT_DIRECTIONS: [(AxisClass, AxisClass); 8] = [
    (AxisClass::Neutral, AxisClass::Low),  // 0: up
    (AxisClass::High, AxisClass::Low),     // 1: up-right
    (AxisClass::High, AxisClass::Neutral), // 2: right
    (AxisClass::High, AxisClass::High),    // 3: down-right
    (AxisClass::Neutral, AxisClass::High), // 4: down
    (AxisClass::Low, AxisClass::High),     // 5: down-left
    (AxisClass::Low, AxisClass::Neutral),  // 6: left
    (AxisClass::Low, AxisClass::Low),      // 7: up-left
];

/// Normalize the raw button bytes into a bitfield with button 0 on bit 0
pub fn decode_buttons(spec: &ButtonSpec, report: &[u8]) -> u16 {
    let low = report[spec.offset];
    let high = spec.high_offset.map(|o| report[o]).unwrap_or(0);

    // Subtraction saturates: a raw value below the idle offset clamps to
    // zero instead of wrapping into an all-buttons-pressed artifact.
    let value = match spec.idle_order {
        IdleOrder::AfterMask => {
            let composed = ((low & spec.mask) as u16) | ((high as u16) << 8);
            composed.saturating_sub(spec.idle_offset)
        }
        IdleOrder::BeforeMask => {
            let composed = (low as u16) | ((high as u16) << 8);
            let lane_mask = (spec.mask as u16) | 0xFF00;
            composed.saturating_sub(spec.idle_offset) & lane_mask
        }
    };

    value >> spec.shift
}

/// Decode the hat nibble into (x, y) classifications
pub fn decode_hat(spec: &HatSpec, report: &[u8]) -> (AxisClass, AxisClass) {
    let nibble = (report[spec.offset] & spec.mask) >> spec.mask.trailing_zeros();
    HAT_DIRECTIONS
        .get(nibble as usize)
        .copied()
        .unwrap_or((AxisClass::Neutral, AxisClass::Neutral))
}

/// Run one report through the full decode pipeline
///
/// Pure function of (report, layout, tracker): updates the tracker in place
/// and returns this tick's events in a fixed order: axes in declared layout
/// order, then the hat axes, then buttons by ascending index. Feeding the
/// same report twice yields an empty second tick.
pub fn decode_report(
    layout: &ReportLayout,
    state: &mut TrackerState,
    report: &[u8],
) -> Result<Vec<InputEvent>, DecodeError> {
    if report.len() < layout.report_len {
        return Err(DecodeError::Truncated {
            got: report.len(),
            need: layout.report_len,
        });
    }

    let mut events = Vec::new();

    for spec in &layout.axes {
        let class = classify(report[spec.offset], spec.center, spec.deadzone);
        if let Some((from, to)) = state.transition(spec.axis, class) {
            events.push(InputEvent::AxisTransition {
                axis: spec.axis,
                from,
                to,
            });
        }
    }

    if let Some(hat) = &layout.hat {
        let (x, y) = decode_hat(hat, report);
        if let Some((from, to)) = state.transition(AxisId::DpadX, x) {
            events.push(InputEvent::AxisTransition {
                axis: AxisId::DpadX,
                from,
                to,
            });
        }
        if let Some((from, to)) = state.transition(AxisId::DpadY, y) {
            events.push(InputEvent::AxisTransition {
                axis: AxisId::DpadY,
                from,
                to,
            });
        }
    }

    let bits = decode_buttons(&layout.buttons, report);
    for index in 0..layout.buttons.count {
        let now = bits & (1 << index) != 0;
        let was = state.is_pressed(index);
        if now && !was {
            state.set_pressed(index);
            events.push(InputEvent::ButtonEdge {
                index,
                pressed: true,
            });
        } else if !now && was {
            // Releases are state-only; only presses drive actions.
            state.clear_pressed(index);
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::layout::AxisSpec;

    fn button_spec(mask: u8, shift: u32, idle: u16, order: IdleOrder) -> ButtonSpec {
        ButtonSpec {
            offset: 5,
            high_offset: Some(6),
            mask,
            shift,
            idle_offset: idle,
            idle_order: order,
            count: 12,
        }
    }

    #[test]
    fn test_two_byte_compose_with_hat_mask() {
        // Hat lives in the low nibble of byte 5; buttons start at bit 4.
        let spec = button_spec(0xF0, 4, 0, IdleOrder::AfterMask);
        let report = [0u8, 0, 0, 0, 0, 0x10, 0x00, 0];
        assert_eq!(decode_buttons(&spec, &report), 1);

        // High byte contributes bits 8.. before the shift
        let report = [0u8, 0, 0, 0, 0, 0x08, 0x01, 0];
        // low nibble (hat) masked away, 0x0100 >> 4 = 0x10 -> button 4
        assert_eq!(decode_buttons(&spec, &report), 0x10);
    }

    #[test]
    fn test_single_byte_no_mask() {
        let spec = ButtonSpec {
            offset: 3,
            high_offset: None,
            mask: 0xFF,
            shift: 0,
            idle_offset: 0,
            idle_order: IdleOrder::AfterMask,
            count: 8,
        };
        let report = [0u8, 0, 0, 0b0000_0101];
        assert_eq!(decode_buttons(&spec, &report), 0b101);
    }

    #[test]
    fn test_idle_offset_after_mask() {
        // Device resolves "no buttons" to 0x08 after masking
        let spec = ButtonSpec {
            offset: 5,
            high_offset: None,
            mask: 0xFF,
            shift: 0,
            idle_offset: 8,
            idle_order: IdleOrder::AfterMask,
            count: 8,
        };
        let idle = [0u8, 0, 0, 0, 0, 0x08];
        assert_eq!(decode_buttons(&spec, &idle), 0);

        let pressed = [0u8, 0, 0, 0, 0, 0x09];
        assert_eq!(decode_buttons(&spec, &pressed), 1);
    }

    #[test]
    fn test_idle_orders_are_not_commutative() {
        let report = [0u8, 0, 0, 0, 0, 0x17, 0];

        // after_mask: (0x17 & 0xF0) - 0x08 = 0x08
        let after = button_spec(0xF0, 0, 0x08, IdleOrder::AfterMask);
        assert_eq!(decode_buttons(&after, &report), 0x08);

        // before_mask: (0x17 - 0x08) & 0xF0 = 0x00
        let before = button_spec(0xF0, 0, 0x08, IdleOrder::BeforeMask);
        assert_eq!(decode_buttons(&before, &report), 0x00);
    }

    #[test]
    fn test_idle_underflow_clamps_to_zero() {
        let spec = ButtonSpec {
            offset: 5,
            high_offset: None,
            mask: 0xFF,
            shift: 0,
            idle_offset: 0x20,
            idle_order: IdleOrder::AfterMask,
            count: 12,
        };
        // Raw below the idle offset must not wrap into 0xFFxx
        let report = [0u8, 0, 0, 0, 0, 0x05];
        assert_eq!(decode_buttons(&spec, &report), 0);
    }

    #[test]
    fn test_hat_table() {
        let spec = HatSpec {
            offset: 5,
            mask: 0x0F,
        };
        let report = |nibble: u8| [0u8, 0, 0, 0, 0, nibble];

        assert_eq!(
            decode_hat(&spec, &report(0)),
            (AxisClass::Neutral, AxisClass::Low)
        );
        assert_eq!(
            decode_hat(&spec, &report(3)),
            (AxisClass::High, AxisClass::High)
        );
        assert_eq!(
            decode_hat(&spec, &report(4)),
            (AxisClass::Neutral, AxisClass::High)
        );
        assert_eq!(
            decode_hat(&spec, &report(7)),
            (AxisClass::Low, AxisClass::Low)
        );
        // 8 and anything above means centered
        assert_eq!(
            decode_hat(&spec, &report(8)),
            (AxisClass::Neutral, AxisClass::Neutral)
        );
        assert_eq!(
            decode_hat(&spec, &report(0x0F)),
            (AxisClass::Neutral, AxisClass::Neutral)
        );
    }

    #[test]
    fn test_hat_high_nibble_mask() {
        let spec = HatSpec {
            offset: 2,
            mask: 0xF0,
        };
        let report = [0u8, 0, 0x20, 0];
        assert_eq!(
            decode_hat(&spec, &report),
            (AxisClass::High, AxisClass::Neutral)
        );
    }

    #[test]
    fn test_event_order_axes_then_hat_then_buttons() {
        let layout = ReportLayout {
            report_len: 8,
            axes: vec![
                AxisSpec {
                    axis: AxisId::LeftX,
                    offset: 0,
                    center: 128,
                    deadzone: 50,
                },
                AxisSpec {
                    axis: AxisId::LeftY,
                    offset: 1,
                    center: 128,
                    deadzone: 50,
                },
            ],
            buttons: ButtonSpec {
                offset: 5,
                high_offset: Some(6),
                mask: 0xF0,
                shift: 4,
                idle_offset: 0,
                idle_order: IdleOrder::AfterMask,
                count: 12,
            },
            hat: Some(HatSpec {
                offset: 5,
                mask: 0x0F,
            }),
        };
        layout.validate().unwrap();

        let mut state = TrackerState::new();
        // left_x high, left_y low, hat up-right, buttons 0 and 2 pressed
        let report = [255u8, 0, 128, 128, 0, 0x51, 0x00, 0];
        let events = decode_report(&layout, &mut state, &report).unwrap();

        assert_eq!(
            events,
            vec![
                InputEvent::AxisTransition {
                    axis: AxisId::LeftX,
                    from: AxisClass::Neutral,
                    to: AxisClass::High,
                },
                InputEvent::AxisTransition {
                    axis: AxisId::LeftY,
                    from: AxisClass::Neutral,
                    to: AxisClass::Low,
                },
                InputEvent::AxisTransition {
                    axis: AxisId::DpadX,
                    from: AxisClass::Neutral,
                    to: AxisClass::High,
                },
                InputEvent::AxisTransition {
                    axis: AxisId::DpadY,
                    from: AxisClass::Neutral,
                    to: AxisClass::Low,
                },
                InputEvent::ButtonEdge {
                    index: 0,
                    pressed: true,
                },
                InputEvent::ButtonEdge {
                    index: 2,
                    pressed: true,
                },
            ]
        );

        // Same report again: everything already reflected, zero events
        let events = decode_report(&layout, &mut state, &report).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_release_is_state_only() {
        let layout = ReportLayout {
            report_len: 6,
            axes: vec![],
            buttons: ButtonSpec {
                offset: 5,
                high_offset: None,
                mask: 0xFF,
                shift: 0,
                idle_offset: 0,
                idle_order: IdleOrder::AfterMask,
                count: 8,
            },
            hat: None,
        };

        let mut state = TrackerState::new();
        let pressed = [0u8, 0, 0, 0, 0, 0b0000_0010];
        let released = [0u8, 0, 0, 0, 0, 0];

        let events = decode_report(&layout, &mut state, &pressed).unwrap();
        assert_eq!(
            events,
            vec![InputEvent::ButtonEdge {
                index: 1,
                pressed: true,
            }]
        );

        // Release produces no event but clears the flag...
        let events = decode_report(&layout, &mut state, &released).unwrap();
        assert!(events.is_empty());
        assert!(!state.is_pressed(1));

        // ...so the next press is a fresh edge
        let events = decode_report(&layout, &mut state, &pressed).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_truncated_report_preserves_state() {
        let layout = ReportLayout {
            report_len: 8,
            axes: vec![AxisSpec {
                axis: AxisId::LeftX,
                offset: 0,
                center: 128,
                deadzone: 50,
            }],
            buttons: ButtonSpec {
                offset: 5,
                high_offset: Some(6),
                mask: 0xFF,
                shift: 0,
                idle_offset: 0,
                idle_order: IdleOrder::AfterMask,
                count: 12,
            },
            hat: None,
        };

        let mut state = TrackerState::new();
        let full = [255u8, 0, 0, 0, 0, 0x01, 0, 0];
        decode_report(&layout, &mut state, &full).unwrap();
        assert!(state.is_pressed(0));
        assert_eq!(state.axis(AxisId::LeftX), AxisClass::High);

        let err = decode_report(&layout, &mut state, &full[..4]).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { got: 4, need: 8 });

        // Prior state unchanged
        assert!(state.is_pressed(0));
        assert_eq!(state.axis(AxisId::LeftX), AxisClass::High);
    }
}
