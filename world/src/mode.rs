use std::time::Duration;

use maze_chase_core::GameMode;

/// Timed hunter/prey mode with capture bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ModeController {
    duration: Duration,
    capture_extension: Duration,
    combo_window: Duration,
    mode: GameMode,
    activated_at: Duration,
    extensions: Duration,
    multiplier: u32,
    last_capture: Option<Duration>,
}

impl ModeController {
    pub(crate) const fn new(
        duration: Duration,
        capture_extension: Duration,
        combo_window: Duration,
    ) -> Self {
        Self {
            duration,
            capture_extension,
            combo_window,
            mode: GameMode::Normal,
            activated_at: Duration::ZERO,
            extensions: Duration::ZERO,
            multiplier: 1,
            last_capture: None,
        }
    }

    pub(crate) const fn mode(&self) -> GameMode {
        self.mode
    }

    pub(crate) fn is_empowered(&self) -> bool {
        self.mode == GameMode::PlayerEmpowered
    }

    /// Starts, or restarts, the empowerment window at `now`.
    pub(crate) fn empower(&mut self, now: Duration) {
        self.mode = GameMode::PlayerEmpowered;
        self.activated_at = now;
        self.extensions = Duration::ZERO;
        self.multiplier = 1;
        self.last_capture = None;
    }

    /// Returns to normal mode once the window elapsed. Reports whether the
    /// mode changed.
    pub(crate) fn expire(&mut self, now: Duration) -> bool {
        if !self.is_empowered() {
            return false;
        }
        let window = self.duration.saturating_add(self.extensions);
        if now.saturating_sub(self.activated_at) <= window {
            return false;
        }
        self.reset();
        true
    }

    /// Records a capture at `now`, extends the window, and returns the
    /// multiplier applied to the capture award.
    pub(crate) fn record_capture(&mut self, now: Duration) -> u32 {
        let chained = self
            .last_capture
            .map_or(false, |last| now.saturating_sub(last) <= self.combo_window);
        self.multiplier = if chained {
            self.multiplier.saturating_mul(2)
        } else {
            1
        };
        self.last_capture = Some(now);
        self.extensions = self.extensions.saturating_add(self.capture_extension);
        self.multiplier
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.duration, self.capture_extension, self.combo_window);
    }
}
