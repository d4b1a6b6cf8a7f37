//! Shared application state injected into every handler.

use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use crate::application::retry::RetryPolicy;
use crate::application::services::{
    EventService, FamilyService, NftService, ReskinService, UserService,
};
use crate::config::Config;
use crate::infrastructure::http::{AlchemyClient, GeminiClient, NeynarClient};
use crate::infrastructure::persistence::{
    PgFamilyCacheRepository, PgNftCacheRepository, PgUserEventRepository,
};

pub type AppFamilyService = FamilyService<PgFamilyCacheRepository, NeynarClient>;
pub type AppNftService = NftService<PgNftCacheRepository, AlchemyClient>;
pub type AppUserService = UserService<NeynarClient>;
pub type AppEventService = EventService<PgUserEventRepository>;
pub type AppReskinService = ReskinService<GeminiClient>;

/// Tuning knobs of the services, split from [`Config`] so tests can build
/// state without environment variables.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub family_freshness: Duration,
    pub nft_freshness: Duration,
    pub family_limit: u32,
    pub retry: RetryPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            family_freshness: Duration::hours(1),
            nft_freshness: Duration::hours(6),
            family_limit: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            family_freshness: config.family_freshness(),
            nft_freshness: config.nft_freshness(),
            family_limit: config.family_limit,
            retry: config.retry_policy(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub family_service: Arc<AppFamilyService>,
    pub nft_service: Arc<AppNftService>,
    pub user_service: Arc<AppUserService>,
    pub event_service: Arc<AppEventService>,
    pub reskin_service: Arc<AppReskinService>,
    pub pool: Arc<PgPool>,
}

impl AppState {
    /// Wires repositories and clients into the services.
    pub fn new(
        pool: Arc<PgPool>,
        neynar: Arc<NeynarClient>,
        alchemy: Arc<AlchemyClient>,
        gemini: Arc<GeminiClient>,
        settings: &ServiceSettings,
    ) -> Self {
        let family_repo = Arc::new(PgFamilyCacheRepository::new(pool.clone()));
        let nft_repo = Arc::new(PgNftCacheRepository::new(pool.clone()));
        let event_repo = Arc::new(PgUserEventRepository::new(pool.clone()));

        Self {
            family_service: Arc::new(FamilyService::new(
                family_repo,
                neynar.clone(),
                settings.family_freshness,
                settings.family_limit,
                settings.retry,
            )),
            nft_service: Arc::new(NftService::new(
                nft_repo,
                alchemy,
                settings.nft_freshness,
                settings.retry,
            )),
            user_service: Arc::new(UserService::new(neynar, settings.retry)),
            event_service: Arc::new(EventService::new(event_repo)),
            reskin_service: Arc::new(ReskinService::new(gemini, settings.retry)),
            pool,
        }
    }
}
