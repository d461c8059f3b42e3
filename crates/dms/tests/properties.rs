//! Property tests for debounce, calibration, classification and the ledger

use alerting::AlertLedger;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dms::calibration::{CalibrationBaseline, PoseObservation};
use dms::classifier::{classify, GAZE_BANDS};
use dms::debounce::{BlinkWindow, DebounceState, BLINK_WINDOW_SECS, MIN_BLINK_FRAMES};
use dms::SignalLevel;
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

proptest! {
    #[test]
    fn eye_counter_monotone_and_resets(
        closed in prop::collection::vec(any::<bool>(), 1..300),
        threshold in 1u32..30,
    ) {
        let mut state = DebounceState::default();
        for &is_closed in &closed {
            let before = state.eye_closure_frame_count;
            let blinks_before = state.blink_count;
            state.update_eye_closure(is_closed, threshold);

            if is_closed {
                prop_assert_eq!(state.eye_closure_frame_count, before + 1);
                prop_assert_eq!(state.blink_count, blinks_before);
            } else {
                prop_assert_eq!(state.eye_closure_frame_count, 0);
                let expected = u32::from((MIN_BLINK_FRAMES..threshold).contains(&before));
                prop_assert_eq!(state.blink_count, blinks_before + expected);
            }
        }
    }

    #[test]
    fn blink_window_evaluates_once_per_minute(
        gaps_ms in prop::collection::vec(1i64..20_000, 1..200),
        blink_every in 1usize..10,
    ) {
        let mut state = DebounceState::default();
        let mut now = base();
        let mut last_eval = now;
        state.update_blink_window(now, 5);

        for (i, gap) in gaps_ms.iter().enumerate() {
            now += Duration::milliseconds(*gap);
            if i % blink_every == 0 {
                state.blink_count += 1;
            }
            match state.update_blink_window(now, 5) {
                BlinkWindow::Evaluated { .. } => {
                    prop_assert!(now - last_eval > Duration::seconds(BLINK_WINDOW_SECS));
                    prop_assert_eq!(state.blink_count, 0);
                    last_eval = now;
                }
                BlinkWindow::Open => {
                    prop_assert!(now - last_eval <= Duration::seconds(BLINK_WINDOW_SECS));
                }
            }
        }
    }

    #[test]
    fn ledger_entry_lives_exactly_three_seconds(
        recorded_ms in 0i64..10_000,
        probe_ms in 0i64..20_000,
    ) {
        let mut ledger = AlertLedger::default();
        let t = base() + Duration::milliseconds(recorded_ms);
        ledger.record("Warning: Yawning", t);

        let probe = t + Duration::milliseconds(probe_ms);
        ledger.expire(probe);
        prop_assert_eq!(ledger.contains("Warning: Yawning"), probe_ms <= 3_000);
    }

    #[test]
    fn calibration_keeps_second_observation(
        a in (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0),
        b in (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0),
    ) {
        let first = PoseObservation { gaze_x_norm: a.0, head_x: a.1, head_y: a.2 };
        let second = PoseObservation { gaze_x_norm: b.0, head_x: b.1, head_y: b.2 };

        let mut baseline = CalibrationBaseline::default();
        let before = baseline.offsets(first);
        prop_assert!(before.is_none());

        baseline.calibrate(first);
        baseline.calibrate(second);
        prop_assert_eq!(baseline.gaze_center, b.0);
        prop_assert_eq!(baseline.head_center_x, b.1);
        prop_assert_eq!(baseline.head_center_y, b.2);

        let at_baseline = baseline.offsets(second).unwrap();
        prop_assert_eq!(at_baseline.gaze, 0.0);
        prop_assert_eq!(at_baseline.head_x, 0.0);
    }

    #[test]
    fn classification_is_monotone(x in 0.0f32..1.0, y in 0.0f32..1.0, threshold in 0.0f32..0.3) {
        let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
        prop_assert!(classify(lo, threshold, GAZE_BANDS) <= classify(hi, threshold, GAZE_BANDS));
        if lo <= threshold {
            prop_assert_eq!(classify(lo, threshold, GAZE_BANDS), SignalLevel::None);
        }
    }
}
