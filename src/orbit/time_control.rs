use super::TimeMode;
use crate::errors::InvalidTimeMode;

/// Process-wide time setting, changed only by explicit user action.
///
/// Pausing remembers the running mode so that resuming restores it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeControl {
    mode: TimeMode,
    resume: TimeMode,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(TimeMode::Multiplier(1.0))
    }
}

impl TimeControl {
    /// Starting paused resumes at 1x
    pub fn new(mode: TimeMode) -> Self {
        let resume = match mode {
            TimeMode::Paused => TimeMode::Multiplier(1.0),
            running => running,
        };
        Self { mode, resume }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.mode == TimeMode::Paused
    }

    pub fn set_mode(&mut self, mode: TimeMode) {
        if mode != TimeMode::Paused {
            self.resume = mode;
        }
        self.mode = mode;
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<TimeMode, InvalidTimeMode> {
        let mode = TimeMode::from_speed(speed)?;
        self.set_mode(mode);
        Ok(mode)
    }

    pub fn toggle_pause(&mut self) -> TimeMode {
        if self.is_paused() {
            self.mode = self.resume;
        } else {
            self.resume = self.mode;
            self.mode = TimeMode::Paused;
        }
        self.mode
    }
}
