//! Per-signal debounce state tracked across frames

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Closed-frame count beyond which the eyes are "closed too long"
pub const EYES_CLOSED_TOO_LONG_FRAMES: u32 = 30;

/// Shortest closure (frames) that counts as a blink
pub const MIN_BLINK_FRAMES: u32 = 2;

/// Length of the blink-rate window (seconds)
pub const BLINK_WINDOW_SECS: i64 = 60;

/// Mouth aspect ratio samples kept for display/smoothing
pub const MAR_HISTORY_LEN: usize = 30;

/// Eye closure level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum EyeClosureLevel {
    #[default]
    None,
    /// Closed longer than the configured frame threshold
    Warning,
    /// Closed longer than [`EYES_CLOSED_TOO_LONG_FRAMES`]
    Alert,
}

/// Result of one blink-window check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkWindow {
    /// Window still running
    Open,
    /// Window rolled over after counting `blinks`
    Evaluated { blinks: u32, high_rate: bool },
}

/// Bounded history, oldest sample evicted first
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    /// Most recent sample
    pub fn back(&self) -> Option<&T> {
        self.data.back()
    }

    /// Samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Debounce counters for one driver session
#[derive(Debug, Clone)]
pub struct DebounceState {
    /// Consecutive frames with eyes closed
    pub eye_closure_frame_count: u32,

    /// Blinks counted in the current window
    pub blink_count: u32,

    /// Start of the current blink window, set on the first face frame
    pub blink_window_start: Option<DateTime<Utc>>,

    /// Open-mouth frames since the last yawn fired
    pub yawn_event_count: u32,

    /// Recent mouth aspect ratio samples
    pub mar_history: SlidingWindow<f32>,
}

impl Default for DebounceState {
    fn default() -> Self {
        Self {
            eye_closure_frame_count: 0,
            blink_count: 0,
            blink_window_start: None,
            yawn_event_count: 0,
            mar_history: SlidingWindow::new(MAR_HISTORY_LEN),
        }
    }
}

impl DebounceState {
    /// Advance the eye-closure counter for one frame.
    ///
    /// An open frame ends the closure: if it lasted `[MIN_BLINK_FRAMES,
    /// frames_threshold)` frames it is counted as a blink, then the counter
    /// restarts at 0.
    pub fn update_eye_closure(&mut self, closed: bool, frames_threshold: u32) -> EyeClosureLevel {
        if !closed {
            if (MIN_BLINK_FRAMES..frames_threshold).contains(&self.eye_closure_frame_count) {
                self.blink_count += 1;
                debug!(
                    "Blink after {} frames ({} in window)",
                    self.eye_closure_frame_count, self.blink_count
                );
            }
            self.eye_closure_frame_count = 0;
            return EyeClosureLevel::None;
        }

        self.eye_closure_frame_count += 1;
        if self.eye_closure_frame_count > EYES_CLOSED_TOO_LONG_FRAMES {
            EyeClosureLevel::Alert
        } else if self.eye_closure_frame_count > frames_threshold {
            EyeClosureLevel::Warning
        } else {
            EyeClosureLevel::None
        }
    }

    /// Roll the blink window over once it is older than [`BLINK_WINDOW_SECS`].
    ///
    /// The count is reset whether or not the rate was high.
    pub fn update_blink_window(&mut self, now: DateTime<Utc>, rate_threshold: u32) -> BlinkWindow {
        let start = *self.blink_window_start.get_or_insert(now);
        if now.signed_duration_since(start) <= Duration::seconds(BLINK_WINDOW_SECS) {
            return BlinkWindow::Open;
        }

        let blinks = self.blink_count;
        let high_rate = blinks >= rate_threshold;
        info!("Blink window closed: {} blinks (high rate: {})", blinks, high_rate);

        self.blink_count = 0;
        self.blink_window_start = Some(now);
        BlinkWindow::Evaluated { blinks, high_rate }
    }

    /// Record a mouth aspect ratio sample; true when a yawn fires this frame
    pub fn update_yawn(&mut self, mar: f32, mar_threshold: f32, yawn_threshold: u32) -> bool {
        self.mar_history.push(mar);
        if mar > mar_threshold {
            self.yawn_event_count += 1;
        }

        if self.yawn_event_count > yawn_threshold {
            self.yawn_event_count = 0;
            true
        } else {
            false
        }
    }

    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
