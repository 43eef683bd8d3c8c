//! Cooperative cancellation on Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::exit_codes;
use crate::output::print_warning;

/// Shared flag that stops new requests once set.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stops.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Listen for Ctrl-C in the background.
    ///
    /// The first signal sets the flag so in-flight downloads can finish; a
    /// second one exits immediately.
    pub fn install_ctrl_c_handler(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if interrupt.is_triggered() {
                    print_warning("Interrupted again. Exiting...");
                    std::process::exit(exit_codes::ABORT);
                }
                print_warning("Interrupt received. Finishing in-flight downloads...");
                interrupt.trigger();
            }
        });
    }
}
