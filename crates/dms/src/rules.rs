//! Compound drowsiness and distraction rules
//!
//! Evaluated once per frame after every per-signal level is known. Only the
//! current frame's levels are used.

use crate::analysis::{DmsAlert, SignalLevels};
use crate::classifier::SignalLevel;
use crate::debounce::EyeClosureLevel;

/// Conclusions for one frame, in evaluation order.
///
/// The two drowsiness rules are exclusive (the severe one wins). The two
/// distraction rules are independent and may both fire.
pub fn evaluate(levels: &SignalLevels) -> Vec<DmsAlert> {
    let mut alerts = Vec::new();

    let drowsy_sign = levels.head_droop >= SignalLevel::Mild || levels.yawn;
    match levels.eye_closed {
        EyeClosureLevel::Alert if drowsy_sign => alerts.push(DmsAlert::SevereDrowsiness),
        EyeClosureLevel::Warning if drowsy_sign => alerts.push(DmsAlert::ModerateDrowsiness),
        _ => {}
    }

    if levels.hands_occupied {
        let looking_away = levels.head_turn.max(levels.head_tilt);
        if looking_away >= SignalLevel::Mild {
            alerts.push(DmsAlert::ModerateDistraction);
        }
        if looking_away >= SignalLevel::Moderate {
            alerts.push(DmsAlert::SevereDistraction);
        }
    }

    alerts
}
