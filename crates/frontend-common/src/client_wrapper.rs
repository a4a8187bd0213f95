//! Wrapped client that routes every outcome through the session guard
//!
//! Entity modules call through this wrapper so that soft expiry on
//! success bodies and hard 401s on failures are both caught before any
//! module-level handling runs.

use std::sync::Arc;

use garage_http::client::upload::{ProgressFn, UploadPart};
use garage_http::{ApiEnvelope, ClientError, GarageClient, RequestSpec};
use serde::Serialize;

use crate::auth::classify::ResponseLike;
use crate::auth::error_handler::handle_error;
use crate::auth::error_messages::{DomainExtractor, garage_error_extractor};
use crate::auth::guard::SessionGuard;
use crate::ui::Notifier;

/// Per-call handlers with named defaults. `None` means the standard
/// behavior: an informational toast when the envelope carries a success
/// message, and the standardized error handler otherwise.
#[derive(Default)]
pub struct CallHandlers {
    pub on_success: Option<Box<dyn Fn(&ApiEnvelope) + Send + Sync>>,
    pub on_error: Option<Box<dyn Fn(&ClientError) + Send + Sync>>,
}

impl CallHandlers {
    pub fn on_success(mut self, handler: impl Fn(&ApiEnvelope) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl Fn(&ClientError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }
}

/// Wrapper around [`GarageClient`] that consults the guard on every
/// outcome.
pub struct WrappedClient {
    inner: GarageClient,
    guard: Arc<SessionGuard>,
    notifier: Arc<dyn Notifier>,
    extractor: Box<DomainExtractor>,
}

impl WrappedClient {
    /// Create a new wrapped client with the default garage message
    /// extractor.
    pub fn new(inner: GarageClient, guard: Arc<SessionGuard>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner,
            guard,
            notifier,
            extractor: Box::new(garage_error_extractor),
        }
    }

    /// Replace the domain-specific message extractor.
    pub fn with_extractor(
        mut self,
        extractor: impl Fn(&serde_json::Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Get a reference to the inner client (use sparingly - prefer the
    /// wrapped methods).
    pub fn inner(&self) -> &GarageClient {
        &self.inner
    }

    /// Execute a request, letting the guard take over on any expiry.
    ///
    /// A soft expiry (HTTP 200 with `requiresLogin`) or a hard 401 comes
    /// back as [`ClientError::SessionExpired`]: the guard has already
    /// handled it and no further UI may fire.
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiEnvelope, ClientError> {
        match self.inner.execute_envelope(request).await {
            Ok(envelope) => {
                if !self.guard.validate_api_response(&envelope).await {
                    return Err(ClientError::SessionExpired);
                }
                Ok(envelope)
            }
            Err(error) => {
                if error.is_auth_expired() {
                    self.guard
                        .handle_unauthorized(&ResponseLike::from_error(&error), true)
                        .await;
                    return Err(ClientError::SessionExpired);
                }
                Err(error)
            }
        }
    }

    /// Execute a descriptor and run the per-call handlers, falling back
    /// to the documented defaults when they are omitted.
    pub async fn dispatch(&self, spec: RequestSpec, handlers: CallHandlers) {
        let request = spec.build(&self.inner);

        match self.execute(request).await {
            Ok(envelope) => match &handlers.on_success {
                Some(on_success) => on_success(&envelope),
                None => {
                    if envelope.success {
                        if let Some(message) = envelope.message.as_deref() {
                            self.notifier.success(message);
                        }
                    }
                }
            },
            // The guard owns this path entirely.
            Err(ClientError::SessionExpired) => {}
            Err(error) => match &handlers.on_error {
                Some(on_error) => on_error(&error),
                None => {
                    handle_error(
                        &self.guard,
                        self.notifier.as_ref(),
                        &error,
                        Some(&self.extractor),
                    )
                    .await;
                }
            },
        }
    }

    pub async fn get<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &T,
    ) -> Result<ApiEnvelope, ClientError> {
        self.execute(self.inner.get(path, query)).await
    }

    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        fields: &T,
    ) -> Result<ApiEnvelope, ClientError> {
        self.execute(self.inner.post_form(path, fields)).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiEnvelope, ClientError> {
        self.execute(self.inner.put_json(path, body)).await
    }

    pub async fn delete<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &T,
    ) -> Result<ApiEnvelope, ClientError> {
        self.execute(self.inner.delete(path, query)).await
    }

    /// Multipart upload with progress, routed through the guard like
    /// every other call.
    pub async fn upload(
        &self,
        path: &str,
        parts: Vec<UploadPart>,
        progress: Option<ProgressFn>,
    ) -> Result<ApiEnvelope, ClientError> {
        let request = self.inner.upload(path, parts, progress)?;
        self.execute(request).await
    }
}
