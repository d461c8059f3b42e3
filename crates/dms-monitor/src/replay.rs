//! JSON-lines replay of detector output
//!
//! Each input line is one [`ReplayEvent`]. Every frame produces one
//! [`FrameReport`] line on the output writer.

use std::io::Write;

use alerting::AlertSnapshot;
use chrono::{TimeZone, Utc};
use dms::{DmsAnalysis, DmsError, DmsModule, FaceLandmarks, HandLandmarks, LandmarkFrame};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::settings::MonitorSettings;

/// Replay errors
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] DmsError),
}

/// One input record
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEvent {
    /// Detector output for one camera frame
    Frame(FrameRecord),
    /// Take the latest frame's pose as the neutral baseline
    Calibrate,
    /// Stop the replay
    Quit,
}

/// Landmarks for one frame; geometry falls back to the capture settings
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Capture time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub face: Option<FaceLandmarks>,
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl FrameRecord {
    fn into_frame(self, (default_width, default_height): (u32, u32)) -> LandmarkFrame {
        LandmarkFrame {
            width: self.width.unwrap_or(default_width),
            height: self.height.unwrap_or(default_height),
            face: self.face,
            hands: self.hands,
        }
    }
}

/// Per-frame output line
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub timestamp_ms: i64,
    pub face_detected: bool,
    pub ear: Option<f32>,
    pub calibrated: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_prompt: Option<&'static str>,
    pub alerts: Vec<AlertSnapshot>,
}

impl FrameReport {
    fn new(timestamp_ms: i64, analysis: DmsAnalysis) -> Self {
        Self {
            timestamp_ms,
            face_detected: analysis.face_detected,
            ear: analysis.ear,
            calibrated: analysis.calibrated,
            status: analysis.status,
            calibration_prompt: analysis.calibration_prompt,
            alerts: analysis.alerts,
        }
    }
}

/// Whether the replay should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Replay counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: u64,
    pub calibrations: u64,
    pub skipped: u64,
}

/// Engine plus output sink for one replay
pub struct ReplaySession<W> {
    dms: DmsModule,
    frame_size: (u32, u32),
    out: W,
    stats: ReplayStats,
}

impl<W: Write> ReplaySession<W> {
    pub fn new(settings: &MonitorSettings, out: W) -> Result<Self, ReplayError> {
        let dms = DmsModule::new(settings.dms.clone(), settings.ledger.clone())?;
        Ok(Self {
            dms,
            frame_size: settings.capture.frame_size(),
            out,
            stats: ReplayStats::default(),
        })
    }

    /// Parse and handle one input line; malformed lines are skipped
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, ReplayError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        match serde_json::from_str::<ReplayEvent>(line) {
            Ok(event) => self.handle(event),
            Err(e) => {
                warn!("Skipping malformed event: {}", e);
                self.stats.skipped += 1;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle(&mut self, event: ReplayEvent) -> Result<Flow, ReplayError> {
        match event {
            ReplayEvent::Frame(record) => {
                let timestamp_ms = record.timestamp_ms;
                let Some(now) = Utc.timestamp_millis_opt(timestamp_ms).single() else {
                    warn!("Skipping frame with invalid timestamp {}", timestamp_ms);
                    self.stats.skipped += 1;
                    return Ok(Flow::Continue);
                };
                let frame = record.into_frame(self.frame_size);
                let analysis = self.dms.process(&frame, now);
                self.stats.frames += 1;
                self.emit(&FrameReport::new(timestamp_ms, analysis))?;
            }
            ReplayEvent::Calibrate => match self.dms.calibrate() {
                Ok(_) => self.stats.calibrations += 1,
                Err(e) => warn!("Calibration skipped: {}", e),
            },
            ReplayEvent::Quit => {
                info!("Quit requested after {} frames", self.stats.frames);
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn emit(&mut self, report: &FrameReport) -> Result<(), ReplayError> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    pub fn engine(&self) -> &DmsModule {
        &self.dms
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Feed every line of `reader` through `session` until EOF or a quit event
pub async fn replay<R, W>(reader: R, session: &mut ReplaySession<W>) -> Result<ReplayStats, ReplayError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if session.handle_line(&line)? == Flow::Quit {
            break;
        }
    }
    let stats = session.stats();
    debug!("Replay finished: {:?}", stats);
    Ok(stats)
}
