//! Ctrl+C handling.
//!
//! The handler only raises a flag; the frame loop checks it between frames
//! and releases any held button before exiting.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for handling Ctrl+C across the application
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        STOP_REQUESTED.store(true, Ordering::SeqCst);
        log::info!("Received Ctrl+C, shutting down...");
    })
}
