use std::sync::Arc;

use crate::domain::ports::SessionStorage;
use crate::frameworks::config::ClientConfig;
use crate::frameworks::telemetry::init_tracing;
use crate::interface_adapters::gateway::ApiGateway;
use crate::interface_adapters::storage::{FileStorage, MemoryStorage};
use crate::use_cases::session_manager::SessionManager;

// Wires storage, session and gateway from config, then reports backend
// reachability and where a restored session would land.
pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    // Config picks the log format, so tracing starts once it is known. A
    // broken config still gets logged in the default format.
    let loaded = ClientConfig::load();
    init_tracing(
        loaded
            .as_ref()
            .map(|config| config.log_format)
            .unwrap_or_default(),
    );

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            return;
        }
    };
    tracing::debug!(
        base_url = %config.base_url,
        timeout_ms = config.request_timeout.as_millis() as u64,
        "client configured."
    );

    let storage: Arc<dyn SessionStorage> = match &config.storage_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using file session storage.");
            Arc::new(FileStorage::new(path.clone()))
        }
        None => {
            tracing::warn!("no data directory available; session will not survive restarts.");
            Arc::new(MemoryStorage::new())
        }
    };
    let session = Arc::new(SessionManager::new(storage));
    let restored = session.restore();

    let gateway = match ApiGateway::with_timeout(
        config.base_url.clone(),
        session.clone(),
        config.request_timeout,
    ) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return;
        }
    };

    let status = gateway.test_connection().await;
    if status.ok {
        tracing::info!(status = status.status, base_url = %gateway.base_url(), "{}", status.message);
    } else {
        tracing::warn!(status = status.status, base_url = %gateway.base_url(), "{}", status.message);
    }

    match restored {
        Some(session) => tracing::info!(
            role = %session.role,
            user = %session.user.display_name(),
            redirect_to = session.redirect_target(),
            "signed in."
        ),
        None => tracing::info!(redirect_to = crate::domain::session::LOGIN_PATH, "not signed in."),
    }
}
