//! Wire types shared across the garage management endpoints

use serde::{Deserialize, Serialize};

/// Generic envelope returned by every garage management API endpoint.
///
/// Endpoints may signal soft session expiry by returning HTTP 200 with
/// `requiresLogin: true`; callers are expected to check that flag before
/// touching `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: Option<String>,
    /// Direct error text set by the web controllers.
    pub error: Option<String>,
    /// Error text relayed from the API layer, sometimes with an embedded
    /// JSON fragment ("API Error: BadRequest - {...}").
    pub error_message: Option<String>,
    pub data: Option<serde_json::Value>,
    pub requires_login: bool,
}

impl ApiEnvelope {
    /// Envelope that only signals soft session expiry.
    pub fn requires_login() -> Self {
        Self {
            requires_login: true,
            ..Self::default()
        }
    }
}

/// Identity-provider configuration served to the frontend.
///
/// The legacy endpoint returns PascalCase field names; both spellings are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(alias = "IdentityServerAuthority")]
    pub identity_authority: String,
    #[serde(alias = "ApiBaseUrl")]
    pub api_base_url: String,
}
