use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Process-wide inbound-rate gate, applied before a request reaches the
/// validator. Fixed window: up to `max_requests` admissions per `window`,
/// checked-and-incremented atomically. Owned and injected by the service so
/// deployments can swap limits and tests can use tiny ones.
pub struct AdmissionController {
    max_requests: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    admitted: u32,
}

impl AdmissionController {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                admitted: 0,
            }),
        }
    }

    /// Admit or reject the next request. Rejections carry the seconds until
    /// the current window resets.
    pub fn admit(&self) -> Result<(), u64> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            // A poisoned counter still counts correctly; recover the guard
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.admitted = 0;
        }

        if state.admitted < self.max_requests {
            state.admitted += 1;
            return Ok(());
        }

        let elapsed = now.duration_since(state.window_start);
        let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
        Err(retry_after)
    }
}
