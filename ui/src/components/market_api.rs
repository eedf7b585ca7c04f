use dioxus::prelude::*;

use oldgold_common::backend::{friendly_auth_message, AuthBackend};
use oldgold_common::config::BackendConfig;
use oldgold_common::gateway::ListingGateway;
use oldgold_common::memory::{MemoryAuth, MemoryBlobStore, MemoryStore};
use oldgold_common::session::SessionProvider;

use super::shared_state::use_shared_state;

pub type Gateway = ListingGateway<MemoryStore, MemoryBlobStore>;

/// Collaborators the pages talk to, provided as context by `App`.
#[derive(Clone)]
pub struct Market {
    pub gateway: Gateway,
    pub auth: MemoryAuth,
    pub session: SessionProvider,
}

impl Market {
    /// Build the collaborators. Project settings come from compile-time
    /// `OLDGOLD_*` variables; without them the app runs offline.
    pub fn connect() -> Self {
        let config = compile_time_config();
        if config.is_configured() {
            tracing::warn!(project = ?config.project_id, "{}", offline_reason(&config));
        } else {
            tracing::info!("{}", offline_reason(&config));
        }

        #[cfg(feature = "example-data")]
        let store = MemoryStore::seeded(oldgold_common::memory::example_listings());
        #[cfg(not(feature = "example-data"))]
        let store = MemoryStore::new();

        Self {
            gateway: ListingGateway::new(store, MemoryBlobStore::new(), config),
            auth: MemoryAuth::new(),
            session: SessionProvider::new(),
        }
    }
}

/// Why the app is running on in-memory collaborators.
fn offline_reason(config: &BackendConfig) -> &'static str {
    if config.is_configured() {
        "backend project configured, but this build has no hosted adapters; running offline"
    } else {
        "no backend project configured, running offline"
    }
}

fn compile_time_config() -> BackendConfig {
    BackendConfig::from_lookup(|key| {
        let value = match key {
            "OLDGOLD_API_KEY" => option_env!("OLDGOLD_API_KEY"),
            "OLDGOLD_AUTH_DOMAIN" => option_env!("OLDGOLD_AUTH_DOMAIN"),
            "OLDGOLD_PROJECT_ID" => option_env!("OLDGOLD_PROJECT_ID"),
            "OLDGOLD_STORAGE_BUCKET" => option_env!("OLDGOLD_STORAGE_BUCKET"),
            "OLDGOLD_MESSAGING_SENDER_ID" => option_env!("OLDGOLD_MESSAGING_SENDER_ID"),
            "OLDGOLD_APP_ID" => option_env!("OLDGOLD_APP_ID"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

pub fn use_market() -> Market {
    use_context::<Market>()
}

/// Fire-and-forget actions handled by the market coroutine.
#[derive(Debug, Clone)]
pub enum MarketAction {
    SignOut,
}

/// Get a handle to send actions to the market coroutine.
pub fn use_market_action() -> Coroutine<MarketAction> {
    use_coroutine_handle::<MarketAction>()
}

/// Start the market coroutine: it drives the session provider from the
/// auth collaborator, mirrors the session into [`SharedState`], and handles
/// [`MarketAction`]s.
///
/// [`SharedState`]: super::shared_state::SharedState
pub fn use_market_coroutine() {
    let market = use_market();
    let shared = use_shared_state();

    use_coroutine(move |mut rx: UnboundedReceiver<MarketAction>| {
        let Market { auth, session, .. } = market.clone();
        async move {
            use futures::StreamExt;

            let follow = {
                let (auth, session) = (auth.clone(), session.clone());
                async move { session.follow(&auth).await }
            };

            let mirror = async move {
                let mut shared = shared;
                let mut watch = session.watch();
                while let Some(state) = watch.next().await {
                    shared.write().session = state;
                }
            };

            let actions = async move {
                let mut shared = shared;
                while let Some(action) = rx.next().await {
                    tracing::debug!(?action, "market action");
                    match action {
                        MarketAction::SignOut => {
                            if let Err(err) = auth.sign_out().await {
                                tracing::warn!(%err, "sign-out failed");
                                shared.write().last_error = Some(friendly_auth_message(&err));
                            }
                        }
                    }
                }
            };

            futures::join!(follow, mirror, actions);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_project_still_reports_offline() {
        let config = BackendConfig {
            api_key: Some("key".into()),
            project_id: Some("oldgold".into()),
            ..Default::default()
        };
        assert!(offline_reason(&config).contains("no hosted adapters"));
        assert!(offline_reason(&BackendConfig::default()).starts_with("no backend project"));
    }
}
