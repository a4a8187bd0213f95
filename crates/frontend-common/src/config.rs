//! Frontend configuration

use garage_http::SessionConfig;

/// Session configuration defaults
pub struct SessionDefaults;

impl SessionDefaults {
    /// Endpoint serving the identity-provider configuration
    pub const CONFIG_PATH: &'static str = "/Home/GetConfig";

    /// Login path appended to the identity authority
    pub const LOGIN_PATH: &'static str = "/Account/Login";

    /// Identity authority used when the configuration fetch fails
    pub const FALLBACK_IDENTITY_AUTHORITY: &'static str = "https://localhost:44333";

    /// API base URL used when the configuration fetch fails
    pub const FALLBACK_API_BASE_URL: &'static str = "https://localhost:44303/api/";

    /// Configuration used when the fetch fails; never fatal to the
    /// redirect flow.
    pub fn fallback() -> SessionConfig {
        SessionConfig {
            identity_authority: Self::FALLBACK_IDENTITY_AUTHORITY.to_string(),
            api_base_url: Self::FALLBACK_API_BASE_URL.to_string(),
        }
    }
}
