use std::time::{Duration, Instant};

use crate::solver::WaveField;

/// Anything advanced once per animation frame.
pub trait Tickable {
    fn tick(&mut self, dt: Duration);
}

/// The field advances one fixed step per tick regardless of wall-clock delta.
impl Tickable for WaveField {
    fn tick(&mut self, _dt: Duration) {
        self.step();
    }
}

/// Frame timing for the render loop: per-frame delta, pause state and an fps
/// figure sampled once per second.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    paused: bool,
    frames_in_window: u32,
    window_start: Option<Instant>,
    fps: Option<u32>,
}

impl FrameClock {
    pub const FPS_WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            last_frame: None,
            paused: false,
            frames_in_window: 0,
            window_start: None,
            fps: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume without a catch-up delta for the paused interval.
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_frame = None;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Frames counted over the most recent full window, once one has elapsed.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Record a presented frame at `now`. Returns the delta since the previous
    /// running frame (`None` while paused) and whether a new fps sample was taken.
    pub fn advance(&mut self, now: Instant) -> (Option<Duration>, bool) {
        let start = *self.window_start.get_or_insert(now);
        self.frames_in_window += 1;
        let sampled = now.duration_since(start) >= Self::FPS_WINDOW;
        if sampled {
            self.fps = Some(self.frames_in_window);
            self.frames_in_window = 0;
            self.window_start = Some(now);
        }

        if self.paused {
            return (None, sampled);
        }
        let dt = self.last_frame.map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);
        (Some(dt), sampled)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick `target` `steps` times if the clock is running.
pub fn run_frame<T: Tickable>(clock: &mut FrameClock, target: &mut T, steps: usize, now: Instant) -> (Option<Duration>, bool) {
    let (dt, sampled) = clock.advance(now);
    if let Some(dt) = dt {
        for _ in 0..steps {
            target.tick(dt);
        }
    }
    (dt, sampled)
}
