//! Driver Monitoring System (DMS)
//!
//! Real-time driver state analysis from face and hand landmarks:
//! - Eye closure and blink rate (drowsiness)
//! - Yawn detection
//! - Gaze and head pose deviation from a calibrated baseline
//! - Hand-to-face proximity (phone use, texting)
//! - Compound drowsiness / distraction conclusions
//!
//! [`DmsModule`] owns all session state and is fed one [`LandmarkFrame`] at a
//! time. Every alert it fires lands in an [`alerting::AlertLedger`] whose
//! snapshot is returned with each frame's analysis.

pub mod analysis;
pub mod calibration;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod features;
pub mod landmarks;
pub mod rules;

pub use analysis::{DmsAlert, DmsAnalysis, SignalLevels};
pub use calibration::{CalibrationBaseline, PoseObservation};
pub use classifier::{Severity, SignalLevel};
pub use config::DmsConfig;
pub use debounce::{DebounceState, EyeClosureLevel};
pub use features::FaceFeatures;
pub use landmarks::{FaceLandmarks, HandLandmarks, Landmark, LandmarkFrame, Point};

use alerting::{AlertError, AlertLedger, LedgerConfig};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use analysis::{CALIBRATION_PROMPT, NORMAL_STATUS};
use debounce::BlinkWindow;
use landmarks::MAX_HANDS;

/// Both hand centroids must sit below this normalized y for texting
const TEXTING_MIN_Y: f32 = 0.6;
/// Maximum normalized distance between hand centroids for texting
const TEXTING_MAX_DISTANCE: f32 = 0.35;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("No face detected")]
    NoFace,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keypoints missing for feature calculation")]
    KeypointsMissing,

    #[error("Alert ledger error: {0}")]
    Alerting(#[from] AlertError),
}

/// Driver monitoring module
pub struct DmsModule {
    config: DmsConfig,
    baseline: CalibrationBaseline,
    state: DebounceState,
    ledger: AlertLedger,
    /// Pose seen on the latest frame, `None` if that frame had no face
    last_observation: Option<PoseObservation>,
}

impl DmsModule {
    /// Create a new DMS module with configuration
    pub fn new(config: DmsConfig, ledger_config: LedgerConfig) -> Result<Self, DmsError> {
        config.validate()?;
        ledger_config.validate()?;

        Ok(Self {
            config,
            baseline: CalibrationBaseline::default(),
            state: DebounceState::default(),
            ledger: AlertLedger::new(ledger_config),
            last_observation: None,
        })
    }

    /// Analyze a single frame for driver state
    pub fn process(&mut self, frame: &LandmarkFrame, now: DateTime<Utc>) -> DmsAnalysis {
        let features = frame.face.as_ref().and_then(|face| {
            match FaceFeatures::extract(face, frame.width, frame.height) {
                Ok(features) => Some(features),
                Err(e) => {
                    warn!("Skipping face for this frame: {}", e);
                    None
                }
            }
        });
        self.last_observation = features.as_ref().map(PoseObservation::from);

        let mut levels = SignalLevels::default();
        let mut fired = Vec::new();

        if let Some(features) = &features {
            self.update_face_signals(features, now, &mut levels, &mut fired);
        }
        self.update_hand_signals(frame, features.as_ref(), &mut levels, &mut fired);
        fired.extend(rules::evaluate(&levels));

        for alert in &fired {
            self.ledger.record(alert.message(), now);
        }
        self.ledger.expire(now);

        if !fired.is_empty() {
            debug!("Frame fired {} alert(s): {:?}", fired.len(), fired);
        }
        for conclusion in fired.iter().filter(|a| a.is_compound()) {
            info!("{}", conclusion.message());
        }

        let status = fired
            .last()
            .map_or(NORMAL_STATUS, DmsAlert::message)
            .to_string();
        let calibrated = self.baseline.is_calibrated;

        DmsAnalysis {
            timestamp: now,
            face_detected: features.is_some(),
            hands_detected: frame.hands.len().min(MAX_HANDS),
            ear: features.map(|f| f.ear),
            features,
            calibrated,
            levels,
            fired,
            status,
            calibration_prompt: (features.is_some() && !calibrated).then_some(CALIBRATION_PROMPT),
            alerts: self.ledger.snapshot(),
        }
    }

    /// Eye closure, blink rate, yawn, then gaze/head pose when calibrated
    fn update_face_signals(
        &mut self,
        features: &FaceFeatures,
        now: DateTime<Utc>,
        levels: &mut SignalLevels,
        fired: &mut Vec<DmsAlert>,
    ) {
        let closed = features.ear_measurable
            && features.ear < self.config.ear_threshold
            && features.iris_missing_or_low();

        levels.eye_closed = self
            .state
            .update_eye_closure(closed, self.config.eye_closed_frames_threshold);
        match levels.eye_closed {
            EyeClosureLevel::Alert => fired.push(DmsAlert::EyesClosedTooLong),
            EyeClosureLevel::Warning => fired.push(DmsAlert::EyesClosed),
            EyeClosureLevel::None => {}
        }

        if let BlinkWindow::Evaluated { high_rate: true, .. } =
            self.state.update_blink_window(now, self.config.blink_rate_threshold)
        {
            fired.push(DmsAlert::HighBlinkRate);
        }

        levels.yawn = self.state.update_yawn(
            features.mar,
            self.config.mar_threshold,
            self.config.yawn_threshold,
        );
        if levels.yawn {
            fired.push(DmsAlert::Yawning);
        }

        let Some(offsets) = self.baseline.offsets(PoseObservation::from(features)) else {
            return;
        };
        let pose = classifier::classify_pose(&offsets, &self.config);
        levels.gaze = pose.gaze;
        levels.head_turn = pose.head_turn;
        levels.head_tilt = pose.head_tilt;
        levels.head_droop = pose.head_droop;

        let graded: [(SignalLevel, fn(Severity) -> DmsAlert); 4] = [
            (pose.gaze, DmsAlert::GazeDeviation),
            (pose.head_turn, DmsAlert::HeadTurn),
            (pose.head_tilt, DmsAlert::LookingUpward),
            (pose.head_droop, DmsAlert::HeadDroop),
        ];
        for (level, alert) in graded {
            if let Some(severity) = level.severity() {
                fired.push(alert(severity));
            }
        }
    }

    /// Phone call and hand-near-face need the face; texting only needs two hands
    fn update_hand_signals(
        &self,
        frame: &LandmarkFrame,
        features: Option<&FaceFeatures>,
        levels: &mut SignalLevels,
        fired: &mut Vec<DmsAlert>,
    ) {
        if frame.hands.len() > MAX_HANDS {
            warn!(
                "{} hands reported, using the first {}",
                frame.hands.len(),
                MAX_HANDS
            );
        }
        let hands = &frame.hands[..frame.hands.len().min(MAX_HANDS)];
        let near_ear = |hand: &HandLandmarks| {
            features.map_or(false, |f| {
                features::hand_near_ear(&f.ear_tips_px, hand, frame.width, frame.height)
            })
        };

        if let Some(face) = features {
            for hand in hands {
                if near_ear(hand) {
                    fired.push(DmsAlert::MobileCall);
                    levels.mobile_call = true;
                    levels.hands_occupied = true;
                } else if features::hand_near_face(
                    face.face_center_px,
                    hand,
                    frame.width,
                    frame.height,
                    self.config.hand_near_face_px as f32,
                ) {
                    fired.push(DmsAlert::HandNearFace);
                    levels.hand_near_face = true;
                    levels.hands_occupied = true;
                }
            }
        }

        if let [first, second] = hands {
            if let Some(pair) = features::hand_pair_metrics(first, second) {
                if pair.distance < TEXTING_MAX_DISTANCE
                    && pair.both_below(TEXTING_MIN_Y)
                    && !near_ear(first)
                    && !near_ear(second)
                {
                    fired.push(DmsAlert::Texting);
                    levels.texting = true;
                    levels.hands_occupied = true;
                }
            }
        }
    }

    /// Calibrate from the pose seen on the most recent frame
    pub fn calibrate(&mut self) -> Result<CalibrationBaseline, DmsError> {
        let observed = self.last_observation.ok_or(DmsError::NoFace)?;
        Ok(self.calibrate_with(observed))
    }

    /// Calibrate from an explicit observation
    pub fn calibrate_with(&mut self, observed: PoseObservation) -> CalibrationBaseline {
        self.baseline.calibrate(observed);
        self.baseline
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_calibrated
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Read-only view of the active alerts
    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.state.reset();
        self.ledger.clear();
        self.baseline = CalibrationBaseline::default();
        self.last_observation = None;
    }
}

impl Default for DmsModule {
    fn default() -> Self {
        Self {
            config: DmsConfig::default(),
            baseline: CalibrationBaseline::default(),
            state: DebounceState::default(),
            ledger: AlertLedger::default(),
            last_observation: None,
        }
    }
}
