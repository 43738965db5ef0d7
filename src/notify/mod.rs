//! Desktop notification delivery.
//!
//! Delivery is best-effort: callers log failures and carry on.

mod desktop;

pub use desktop::DesktopNotifier;

use crate::error::Result;

/// Notification delivery capability.
pub trait Notifier {
    /// Show a desktop notification.
    fn send(&self, title: &str, body: &str) -> Result<()>;

    /// Play an alert sound. Never fails.
    fn play_sound(&self);
}
