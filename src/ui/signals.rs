use crate::error::{Result, ValSplitError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl+C handling for one run.
///
/// The first interrupt requests cancellation, which the pipeline honors at its
/// next stage boundary. A second interrupt exits at once, unless output files
/// are being written: then interrupts are reported and ignored so no
/// half-written file is left behind.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
    writing: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let shutdown = Self::new_for_test();

        let running = shutdown.running.clone();
        let message_shown = shutdown.shutdown_message_shown.clone();
        let writing = shutdown.writing.clone();

        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);

            if writing.load(Ordering::SeqCst) {
                eprintln!("\n⏳ Writing output files, please wait...");
            } else if !message_shown.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Cancelling... (press Ctrl+C again to quit immediately)");
            } else {
                eprintln!("\n💀 Quitting, nothing was written.");
                std::process::exit(130);
            }
        })
        .map_err(|e| ValSplitError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(shutdown)
    }

    /// Instance without a signal handler (tests, embedding).
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
            writing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ValSplitError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_writing(&self) -> bool {
        self.writing.load(Ordering::SeqCst)
    }

    /// Runs `operation` once no cancellation is pending, with interrupts
    /// deferred until it returns.
    pub fn while_writing<F, R>(&self, operation: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        self.check_shutdown()?;
        self.writing.store(true, Ordering::SeqCst);
        let result = operation();
        self.writing.store(false, Ordering::SeqCst);
        result
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        // Handler registration fails when one is already installed
        Self::new().unwrap_or_else(|err| {
            log::warn!("event=signal_handler_unavailable error={}", err);
            Self::new_for_test()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_state_management() {
        let shutdown = GracefulShutdown::new_for_test();

        assert!(shutdown.is_running());
        assert!(shutdown.check_shutdown().is_ok());

        shutdown.request_shutdown();
        assert!(!shutdown.is_running());
        assert!(matches!(
            shutdown.check_shutdown(),
            Err(ValSplitError::Cancelled)
        ));
    }

    #[test]
    fn test_default_falls_back_when_handler_is_taken() {
        let first = GracefulShutdown::default();
        let second = GracefulShutdown::default();

        assert!(first.is_running());
        assert!(second.is_running());
    }

    #[test]
    fn test_while_writing_marks_the_write_phase() {
        let shutdown = GracefulShutdown::new_for_test();

        let seen = shutdown
            .while_writing(|| Ok(shutdown.is_writing()))
            .unwrap();
        assert!(seen);
        assert!(!shutdown.is_writing());
    }

    #[test]
    fn test_while_writing_refuses_after_cancel() {
        let shutdown = GracefulShutdown::new_for_test();
        shutdown.request_shutdown();

        let mut ran = false;
        let result = shutdown.while_writing(|| {
            ran = true;
            Ok(())
        });

        assert!(matches!(result, Err(ValSplitError::Cancelled)));
        assert!(!ran);
    }

    #[test]
    fn test_write_phase_ends_on_error() {
        let shutdown = GracefulShutdown::new_for_test();
        let result: Result<()> = shutdown.while_writing(|| {
            Err(ValSplitError::Config {
                message: "boom".to_string(),
            })
        });

        assert!(result.is_err());
        assert!(!shutdown.is_writing());
    }
}
