use std::time::Duration;

use log::warn;

/// Fixed-step timer settings.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimerConfig {
    /// Simulated time per tick.
    pub step: Duration,
    /// Most ticks fired in one frame; `0` means no cap.
    pub max_ticks_per_frame: u32,
}

/// Turns host frame timestamps into ticks at a fixed rate.
///
/// Late frames catch up by firing several ticks at once, up to the cap.
#[derive(Debug, Clone)]
pub struct FixedStepTimer {
    step: f64,
    max_ticks_per_frame: u32,
    accumulated: f64,
    last_frame_ms: f64,
}

impl FixedStepTimer {
    #[must_use]
    pub fn new(config: TimerConfig) -> Self {
        Self {
            step: config.step.as_secs_f64(),
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulated: 0.0,
            last_frame_ms: 0.0,
        }
    }

    /// Handles one frame at `timestamp_ms` and returns how many ticks fired.
    ///
    /// Non-finite timestamps are skipped and leave the timer untouched.
    pub fn frame(&mut self, timestamp_ms: f64, mut on_tick: impl FnMut()) -> u32 {
        if !timestamp_ms.is_finite() {
            warn!("ignoring non-finite frame timestamp {timestamp_ms}");
            return 0;
        }

        let elapsed_ms = (timestamp_ms - self.last_frame_ms).max(0.0);
        self.accumulated += elapsed_ms / 1000.0;

        let mut fired = 0;
        while self.accumulated > self.step {
            if self.max_ticks_per_frame != 0 && fired == self.max_ticks_per_frame {
                let dropped = self.accumulated - self.step;
                warn!("timer fell behind; dropping {:.0} ms of backlog", dropped * 1000.0);
                self.accumulated = self.step;
                break;
            }

            on_tick();
            self.accumulated -= self.step;
            fired += 1;
        }

        self.last_frame_ms = timestamp_ms;
        fired
    }

    /// Seconds of simulated time waiting for the next tick.
    #[must_use]
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }
}
