//! Seams to the host page's widgets
//!
//! The modal, toast, navigation and client-storage collaborators are
//! external widgets; the guard only ever talks to them through these
//! traits.

use async_trait::async_trait;

/// The blocking "Session Expired" dialog. Implementations must not be
/// dismissible by outside click or escape; the future resolves when the
/// user acknowledges.
#[async_trait]
pub trait SessionPrompt: Send + Sync {
    async fn session_expired(&self);
}

/// Transient, dismissible notifications (toasts).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    /// Close any alert currently on screen.
    fn dismiss_all(&self);
}

/// The host page's location.
pub trait Navigator: Send + Sync {
    /// URL of the current page, used as the post-login return target.
    fn current_url(&self) -> String;
    fn navigate(&self, url: &str);
}

/// Local and session storage on the client.
pub trait ClientStorage: Send + Sync {
    /// Clear everything. Best-effort: the guard proceeds with the
    /// redirect even when this fails.
    fn clear_all(&self) -> Result<(), String>;
}
