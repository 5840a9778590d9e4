use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Requests a running job to pause or stop.
///
/// Requests are honoured at the next placement boundary, a stop request also before the next pick attempt.
#[derive(Debug, Clone, Default)]
pub struct JobControl {
    flags: Arc<Flags>,
}

#[derive(Debug, Default)]
struct Flags {
    pause: AtomicBool,
    stop: AtomicBool,
}

impl JobControl {
    pub fn pause(&self) {
        self.flags
            .pause
            .store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.flags
            .stop
            .store(true, Ordering::SeqCst);
    }

    pub fn is_pause_requested(&self) -> bool {
        self.flags
            .pause
            .load(Ordering::SeqCst)
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flags
            .stop
            .load(Ordering::SeqCst)
    }

    pub(crate) fn clear_pause(&self) {
        self.flags
            .pause
            .store(false, Ordering::SeqCst);
    }

    pub(crate) fn reset(&self) {
        self.clear_pause();
        self.flags
            .stop
            .store(false, Ordering::SeqCst);
    }
}
