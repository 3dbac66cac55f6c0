//! Per-session angle history used for diagnostic summaries.

use medifit_core::whole_degrees;
use serde::{Deserialize, Serialize};

/// Angle recorded when landmarks are missing or the geometry degenerates.
///
/// Reads as "fully extended", which no exercise threshold acts on.
pub const FALLBACK_ANGLE: i32 = 180;

/// Append-only angle samples, one entry per processed frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleHistory {
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    /// Sit-up shoulder-hip-knee stream
    pub body: Vec<i32>,
    pub frames: Vec<u64>,
}

impl AngleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a left/right joint pair, or the fallback for both sides
    pub fn record_pair(&mut self, pair: Option<(f64, f64)>) {
        let (left, right) = match pair {
            Some((left, right)) => (whole_degrees(left), whole_degrees(right)),
            None => (FALLBACK_ANGLE, FALLBACK_ANGLE),
        };
        self.left.push(left);
        self.right.push(right);
    }

    pub fn record_body(&mut self, body: Option<f64>) {
        self.body.push(body.map(whole_degrees).unwrap_or(FALLBACK_ANGLE));
    }

    pub fn record_frame(&mut self, index: u64) {
        self.frames.push(index);
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.body.clear();
        self.frames.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
