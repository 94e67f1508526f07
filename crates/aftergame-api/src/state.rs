//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/gateway/hasher traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use aftergame_core::chat::relay::ChatRelay;
use aftergame_core::event::feed::ChangeFeed;
use aftergame_core::llm::CompletionGateway;
use aftergame_core::service::account::AccountService;
use aftergame_core::service::career::CareerService;
use aftergame_core::service::conversation::ConversationService;
use aftergame_core::service::dashboard::DashboardService;
use aftergame_core::service::journal::JournalService;
use aftergame_core::service::profile::ProfileService;
use aftergame_core::service::story::StoryService;
use aftergame_infra::config::{gateway_api_key, load_app_config, resolve_data_dir};
use aftergame_infra::crypto::password::Argon2PasswordHasher;
use aftergame_infra::crypto::token::Sha256TokenIssuer;
use aftergame_infra::http::gateway::HttpCompletionGateway;
use aftergame_infra::sqlite::account::SqliteAccountRepository;
use aftergame_infra::sqlite::career::SqliteCareerRepository;
use aftergame_infra::sqlite::conversation::SqliteConversationRepository;
use aftergame_infra::sqlite::journal::SqliteJournalRepository;
use aftergame_infra::sqlite::pool::{DatabasePool, database_url};
use aftergame_infra::sqlite::profile::SqliteProfileRepository;
use aftergame_infra::sqlite::story::SqliteStoryRepository;
use aftergame_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService =
    AccountService<SqliteAccountRepository, Argon2PasswordHasher, Sha256TokenIssuer>;

pub type ConcreteChatRelay = ChatRelay<Arc<HttpCompletionGateway>, Arc<ConcreteAccountService>>;

pub type ConcreteCareerService = CareerService<Arc<HttpCompletionGateway>, SqliteCareerRepository>;

pub type ConcreteDashboardService = DashboardService<
    SqliteJournalRepository,
    SqliteConversationRepository,
    SqliteProfileRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<ConcreteAccountService>,
    pub chat_relay: Arc<ConcreteChatRelay>,
    pub conversation_service: Arc<ConversationService<SqliteConversationRepository>>,
    pub profile_service: Arc<ProfileService<SqliteProfileRepository>>,
    pub journal_service: Arc<JournalService<SqliteJournalRepository>>,
    pub dashboard_service: Arc<ConcreteDashboardService>,
    pub career_service: Arc<ConcreteCareerService>,
    pub story_service: Arc<StoryService<SqliteStoryRepository>>,
    pub gateway: Arc<HttpCompletionGateway>,
    pub feed: ChangeFeed,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        tracing::debug!(data_dir = %data_dir.display(), model = %config.chat_model, "application state ready");
        Self::build(db_pool, config, gateway_api_key(), data_dir)
    }

    /// Wire services over an open pool.
    pub fn build(
        db_pool: DatabasePool,
        config: AppConfig,
        gateway_key: Option<SecretString>,
        data_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let feed = ChangeFeed::default();
        let gateway = Arc::new(HttpCompletionGateway::new(&config, gateway_key)?);

        let account_service = Arc::new(AccountService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Sha256TokenIssuer::new(),
        ));

        let chat_relay = Arc::new(ChatRelay::new(
            gateway.clone(),
            account_service.clone(),
            config.chat_model.clone(),
        ));

        let conversation_service = Arc::new(ConversationService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            feed.clone(),
        ));
        let profile_service = Arc::new(ProfileService::new(
            SqliteProfileRepository::new(db_pool.clone()),
            feed.clone(),
        ));
        let journal_service = Arc::new(JournalService::new(
            SqliteJournalRepository::new(db_pool.clone()),
            feed.clone(),
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            SqliteJournalRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteProfileRepository::new(db_pool.clone()),
        ));
        let career_service = Arc::new(CareerService::new(
            gateway.clone(),
            SqliteCareerRepository::new(db_pool.clone()),
            feed.clone(),
            config.career_model.clone(),
        ));
        let story_service = Arc::new(StoryService::new(SqliteStoryRepository::new(
            db_pool.clone(),
        )));

        Ok(Self {
            account_service,
            chat_relay,
            conversation_service,
            profile_service,
            journal_service,
            dashboard_service,
            career_service,
            story_service,
            gateway,
            feed,
            config,
            data_dir,
            db_pool,
        })
    }

    /// Whether the relay has gateway credentials.
    pub fn chat_relay_configured(&self) -> bool {
        self.gateway.is_configured()
    }
}
