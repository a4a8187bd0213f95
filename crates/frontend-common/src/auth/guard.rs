//! Session guard
//!
//! Single authority for detecting authentication expiry and walking the
//! user back to the identity provider. Owns the cached identity-provider
//! configuration and the "prompt visible" flag; nothing else may touch
//! either.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use garage_http::{ApiEnvelope, GarageClient, SessionConfig};
use reqwest::Method;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::classify::{Classification, ResponseLike, classify};
use crate::config::SessionDefaults;
use crate::ui::{ClientStorage, Navigator, Notifier, SessionPrompt};

/// Process-wide session guard. Created once at page load and kept for the
/// page lifetime; a navigation (the redirect included) discards it.
pub struct SessionGuard {
    client: GarageClient,
    config: OnceCell<SessionConfig>,
    prompt_visible: AtomicBool,
    prompt: Arc<dyn SessionPrompt>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    storage: Arc<dyn ClientStorage>,
}

impl SessionGuard {
    pub fn new(
        client: GarageClient,
        prompt: Arc<dyn SessionPrompt>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn ClientStorage>,
    ) -> Self {
        Self {
            client,
            config: OnceCell::new(),
            prompt_visible: AtomicBool::new(false),
            prompt,
            notifier,
            navigator,
            storage,
        }
    }

    /// Identity-provider configuration, fetched at most once per page
    /// lifetime. Concurrent callers share the in-flight fetch; a fetch
    /// failure resolves to the hard-coded fallback and is never surfaced.
    pub async fn load_config(&self) -> &SessionConfig {
        self.config
            .get_or_init(|| async {
                match self.fetch_config().await {
                    Ok(config) => {
                        debug!(authority = %config.identity_authority, "session config loaded");
                        config
                    }
                    Err(error) => {
                        warn!(%error, "session config fetch failed, using fallback");
                        SessionDefaults::fallback()
                    }
                }
            })
            .await
    }

    async fn fetch_config(&self) -> Result<SessionConfig, garage_http::ClientError> {
        let request = self.client.request(Method::GET, SessionDefaults::CONFIG_PATH);
        self.client.execute(request).await
    }

    /// Pure classification of any response-like value.
    pub fn classify(&self, response: &ResponseLike) -> Classification {
        classify(response)
    }

    /// React to an unauthorized response. With `announce`, at most one
    /// "Session Expired" prompt is shown for the page lifetime; callers
    /// racing while it is visible are no-ops. Without `announce` the
    /// redirect happens immediately.
    pub async fn handle_unauthorized(&self, response: &ResponseLike, announce: bool) {
        debug!(?response, announce, "unauthorized response detected");

        if !announce {
            self.redirect_to_login().await;
            return;
        }

        if self
            .prompt_visible
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // A prompt is already on screen.
            return;
        }

        self.notifier.dismiss_all();
        self.prompt.session_expired().await;
        self.redirect_to_login().await;
    }

    /// Clear client-side storage and navigate to the identity-provider
    /// login with the current page as the return URL. Storage failures
    /// are swallowed; the redirect always proceeds.
    pub async fn redirect_to_login(&self) {
        if let Err(error) = self.storage.clear_all() {
            warn!(%error, "failed to clear client storage before redirect");
        }

        let config = self.load_config().await;
        let authority = config.identity_authority.trim_end_matches('/');

        let target = if authority.is_empty() {
            // Unreachable by construction (the fallback always has an
            // authority), but the redirect must still go somewhere.
            SessionDefaults::LOGIN_PATH.to_string()
        } else {
            format!(
                "{authority}{}?ReturnUrl={}",
                SessionDefaults::LOGIN_PATH,
                urlencoding::encode(&self.navigator.current_url()),
            )
        };

        debug!(%target, "redirecting to login");
        self.navigator.navigate(&target);
    }

    /// Check a successful (HTTP 200) response body for soft expiry.
    /// Returns false and takes over when `requiresLogin` is set; callers
    /// must skip the body in that case.
    pub async fn validate_api_response(&self, envelope: &ApiEnvelope) -> bool {
        if envelope.requires_login {
            self.handle_unauthorized(&ResponseLike::Parsed(envelope.clone()), true)
                .await;
            return false;
        }
        true
    }
}
