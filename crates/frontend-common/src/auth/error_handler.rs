//! Standardized error handling and the global interceptor
//!
//! `handle_error` is the default error path for dispatched calls: the
//! guard classifies first, and an unauthorized response short-circuits
//! the generic toast entirely. The global interceptor is a process-wide
//! backstop for call sites that do not route through the wrapped client.

use std::sync::{Arc, Mutex};

use garage_http::ClientError;
use once_cell::sync::Lazy;
use tracing::debug;

use super::classify::{Classification, ResponseLike, classify};
use super::error_messages::{DomainExtractor, extract_error_message};
use super::guard::SessionGuard;
use crate::ui::Notifier;

/// Global interceptor slot
static INTERCEPTOR: Lazy<Mutex<Option<Arc<SessionGuard>>>> = Lazy::new(|| Mutex::new(None));

/// Standardized error handler: delegate unauthorized responses to the
/// guard, otherwise surface one extracted, human-readable message.
pub async fn handle_error(
    guard: &SessionGuard,
    notifier: &dyn Notifier,
    error: &ClientError,
    extractor: Option<&DomainExtractor>,
) {
    let response = ResponseLike::from_error(error);
    if classify(&response) == Classification::Unauthorized {
        guard.handle_unauthorized(&response, true).await;
        return;
    }

    let message = match error.raw_body() {
        Some(raw) => extract_error_message(raw, error.envelope(), extractor),
        None => error.to_string(),
    };
    notifier.error(&message);
}

/// Install the process-wide interceptor consulted by [`report_failure`].
pub fn install_global_interceptor(guard: Arc<SessionGuard>) {
    *INTERCEPTOR
        .lock()
        .expect("interceptor lock poisoned") = Some(guard);
}

/// Remove the process-wide interceptor.
pub fn clear_global_interceptor() {
    *INTERCEPTOR
        .lock()
        .expect("interceptor lock poisoned") = None;
}

/// Backstop for failures observed outside the wrapped client. Returns
/// true when the installed guard classified the failure as unauthorized
/// and took it over; no other error UI may fire for that failure.
/// Outside the runtime the failure is left to the caller instead.
pub fn report_failure(response: ResponseLike) -> bool {
    if classify(&response) != Classification::Unauthorized {
        return false;
    }

    let Some(guard) = INTERCEPTOR
        .lock()
        .expect("interceptor lock poisoned")
        .clone()
    else {
        debug!("unauthorized response observed with no interceptor installed");
        return false;
    };

    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        debug!("unauthorized response observed outside the runtime");
        return false;
    };

    handle.spawn(async move {
        guard.handle_unauthorized(&response, true).await;
    });
    true
}
