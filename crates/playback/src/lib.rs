//! Audio playback control: pause/resume state machine and the in-flash sample table
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]

pub mod control;
pub mod payload;

pub use control::{ControlAction, ControlState, PauseResumeControl};
pub use payload::{AudioPayload, PayloadError};

/// Map a control action onto the engine command it issues, if any.
pub const fn engine_command(action: ControlAction) -> Option<platform::PauseResume> {
    match action {
        ControlAction::Pause => Some(platform::PauseResume::Pause),
        ControlAction::Resume => Some(platform::PauseResume::Resume),
        ControlAction::Heartbeat | ControlAction::Stop => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    /// Pause/resume state machine tests
    mod control_tests {
        use crate::control::{ControlAction, ControlState, PauseResumeControl};

        #[test]
        fn test_starts_steady_without_engine_command() {
            let mut control = PauseResumeControl::new();
            assert_eq!(control.state(), ControlState::Steady);
            assert!(!control.is_pausing());
            assert_eq!(control.next_action(), ControlAction::Heartbeat);
            assert_eq!(control.step(|| false), ControlAction::Heartbeat);
            assert_eq!(control.state(), ControlState::Steady);
        }

        #[test]
        fn test_first_signal_requests_pause() {
            let mut control = PauseResumeControl::new();
            control.on_signal();
            assert_eq!(control.state(), ControlState::PauseRequested);
            assert!(control.is_pausing());
            assert_eq!(control.next_action(), ControlAction::Pause);
            assert_eq!(control.state(), ControlState::Steady);
        }

        #[test]
        fn test_signals_alternate_pause_and_resume() {
            let mut control = PauseResumeControl::new();
            let actions: Vec<_> = (0..4)
                .map(|_| control.step(|| true))
                .collect();
            assert_eq!(
                actions,
                [
                    ControlAction::Pause,
                    ControlAction::Resume,
                    ControlAction::Pause,
                    ControlAction::Resume
                ]
            );
        }

        #[test]
        fn test_signal_overrides_pending_request() {
            let mut control = PauseResumeControl::new();
            control.on_signal();
            // Second signal lands before the pause was issued.
            control.on_signal();
            assert_eq!(control.state(), ControlState::ResumeRequested);
            assert_eq!(control.next_action(), ControlAction::Resume);
        }

        #[test]
        fn test_forced_stop_ignores_queue() {
            let mut control = PauseResumeControl::new().with_forced_stop();
            let mut polled = false;
            let action = control.step(|| {
                polled = true;
                true
            });
            assert_eq!(action, ControlAction::Stop);
            assert!(!polled, "forced stop must not consume signals");
            assert!(control.is_forced_stop());
        }

        #[test]
        fn test_engine_command_mapping() {
            use crate::engine_command;
            use platform::PauseResume;

            assert_eq!(engine_command(ControlAction::Pause), Some(PauseResume::Pause));
            assert_eq!(engine_command(ControlAction::Resume), Some(PauseResume::Resume));
            assert_eq!(engine_command(ControlAction::Heartbeat), None);
            assert_eq!(engine_command(ControlAction::Stop), None);
        }
    }

    /// Kth signal pauses when K is odd, resumes when K is even
    mod control_props {
        use crate::control::{ControlAction, PauseResumeControl};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_kth_signal_alternates(ticks in proptest::collection::vec(any::<bool>(), 1..64)) {
                let mut control = PauseResumeControl::new();
                let mut signals = 0usize;
                for signal in ticks {
                    let action = control.step(|| signal);
                    if signal {
                        signals += 1;
                        let expected = if signals % 2 == 1 {
                            ControlAction::Pause
                        } else {
                            ControlAction::Resume
                        };
                        prop_assert_eq!(action, expected);
                    } else {
                        prop_assert_eq!(action, ControlAction::Heartbeat);
                    }
                }
            }
        }
    }

    /// Sample table tests
    mod payload_tests {
        use crate::payload::{AudioPayload, PayloadError};

        static TABLE: [u8; 16] = [
            0xAA, 0xAA, 0xAA, 0xAA, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
        ];

        #[test]
        fn test_samples_skip_header() {
            let payload = AudioPayload::new(&TABLE, 16, 4).unwrap();
            assert_eq!(payload.header(), &[0xAA; 4]);
            assert_eq!(payload.samples().len(), 12);
            assert_eq!(payload.samples().first(), Some(&1));
            assert_eq!(payload.total_size(), 16);
            assert_eq!(payload.start_offset(), 4);
        }

        #[test]
        fn test_declared_size_limits_samples() {
            let payload = AudioPayload::new(&TABLE, 10, 4).unwrap();
            assert_eq!(payload.samples(), &[1, 2, 3, 4, 5, 6]);
        }

        #[test]
        fn test_offset_past_end_rejected() {
            let err = AudioPayload::new(&TABLE, 16, 16).unwrap_err();
            assert_eq!(
                err,
                PayloadError::OffsetOutOfRange {
                    offset: 16,
                    total: 16
                }
            );
            assert_eq!(err.as_str(), "offset out of range");
        }

        #[test]
        fn test_short_table_rejected() {
            let err = AudioPayload::new(&TABLE, 32, 4).unwrap_err();
            assert!(matches!(err, PayloadError::TableTooShort { actual: 16, declared: 32 }));
            assert_eq!(format!("{err}"), "table holds 16 bytes, 32 declared");
        }
    }
}
