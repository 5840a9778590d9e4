use std::io;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Spawns the thread that owns the machine hardware.
///
/// When a priority is given (1-99, higher = more priority) the thread asks for SCHED_FIFO scheduling. Without
/// the required privileges this fails, the thread then keeps running with the default policy.
pub struct RtThread {}

impl RtThread {
    pub fn spawn<F, T>(name: &str, priority: Option<u8>, f: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T,
        F: Send + 'static,
        T: Send + 'static,
    {
        if let Some(priority) = priority {
            if !(1..=99).contains(&priority) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid real-time priority. priority: {}", priority),
                ));
            }
        }

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if let Some(priority) = priority {
                    match apply_fifo_scheduling(priority) {
                        Ok(()) => debug!("RT thread starting with priority {}", priority),
                        Err(error) => warn!("Unable to apply real-time scheduling. priority: {}, error: {}", priority, error),
                    }
                }

                f()
            })
    }
}

#[cfg(unix)]
fn apply_fifo_scheduling(priority: u8) -> io::Result<()> {
    // SAFETY: `sched_param` is plain data, `pthread_self` always refers to the calling thread.
    let result = unsafe {
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = priority as i32;
        libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param)
    };

    match result {
        0 => Ok(()),
        code => Err(io::Error::from_raw_os_error(code)),
    }
}

#[cfg(not(unix))]
fn apply_fifo_scheduling(_priority: u8) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "real-time scheduling"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_without_priority() {
        // when
        let handle = RtThread::spawn("test", None, || 42).unwrap();

        // then
        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn runs_when_priority_cannot_be_applied() {
        // when
        let handle = RtThread::spawn("test", Some(10), || thread::current().name().map(str::to_string)).unwrap();

        // then
        assert_eq!(handle.join().unwrap(), Some("test".to_string()));
    }

    #[test]
    fn rejects_invalid_priority() {
        // when
        let result = RtThread::spawn("test", Some(0), || ());

        // then
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
