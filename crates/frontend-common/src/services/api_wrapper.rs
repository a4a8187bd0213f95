//! API wrapper utilities for handling authentication errors
//!
//! For call sites that talk to the dispatcher directly instead of going
//! through the wrapped client.

use garage_http::ClientError;
use std::future::Future;

use crate::auth::classify::ResponseLike;
use crate::auth::guard::SessionGuard;

/// Hand an authentication failure to the guard; other errors pass.
pub async fn handle_api_error(error: &ClientError, guard: &SessionGuard) {
    if error.is_auth_expired() {
        guard
            .handle_unauthorized(&ResponseLike::from_error(error), true)
            .await;
    }
}

/// Wrapper for API calls that handles auth errors
pub async fn with_auth_error_handling<T, F>(
    guard: &SessionGuard,
    api_call: F,
) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match api_call.await {
        Ok(result) => Ok(result),
        Err(error) => {
            handle_api_error(&error, guard).await;
            Err(error)
        }
    }
}
