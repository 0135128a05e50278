use crate::auth::BasicAuth;
use crate::kv::KvBackend;
use crate::services::LinkRepository;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to every handler through axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// Code -> URL mapping
    pub links: Arc<dyn LinkRepository>,

    /// Backend behind `links`, used for health checks
    pub backend: Arc<dyn KvBackend>,

    /// Credentials for the admin routes
    pub basic_auth: BasicAuth,

    /// Whether strict URL validation is enabled (requires http:// or https://)
    pub strict_url_validation: bool,
}
