use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-frame processing time over repeated runs, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub frames: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
}

impl ProcessingStats {
    pub fn push(&mut self, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1e3;
        if self.frames == 0 {
            self.min_ms = ms;
            self.max_ms = ms;
        } else {
            self.min_ms = self.min_ms.min(ms);
            self.max_ms = self.max_ms.max(ms);
        }
        self.frames += 1;
        self.mean_ms += (ms - self.mean_ms) / self.frames as f64;
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }
}
