//! Cross-platform native desktop notifications
//!
//! Uses notify-rust for native notifications on macOS, Linux, Windows and BSD.

use notify_rust::{Notification, Timeout};

/// Show a caller notification. Failures are logged, never returned: the
/// card has already been printed by the time this runs.
pub fn send(title: &str, message: &str, timeout_ms: u32) {
    let result = Notification::new()
        .appname("callercard")
        .summary(title)
        .body(message)
        .timeout(Timeout::Milliseconds(timeout_ms))
        .show();

    if let Err(e) = result {
        tracing::warn!("Desktop notification failed: {}", e);
    }
}
