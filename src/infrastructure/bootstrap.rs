use crate::application::use_cases::inspection::InspectionSession;
use crate::domain::error::Result;
use crate::infrastructure::config::Settings;
use crate::infrastructure::db::conformance::ConformanceRepository;
use crate::infrastructure::db::connection::{connect_pool, init_db};
use crate::infrastructure::db::diary::DiaryRepository;
use crate::infrastructure::db::lots::LotRepository;
use crate::infrastructure::db::ConformanceStore;
use std::sync::Arc;
use tracing::info;

pub fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Shared handles wired at startup and passed into the application layer.
/// Use cases receive these explicitly; nothing reaches for a global client.
pub struct AppContext {
    pub settings: Settings,
    pub conformance: Arc<ConformanceRepository>,
    pub lots: Arc<LotRepository>,
    pub diary: Arc<DiaryRepository>,
}

impl AppContext {
    pub async fn init(settings: Settings) -> Result<Self> {
        let pool = connect_pool(&settings.database_url).await?;
        init_db(&pool).await?;
        info!(database_url = %settings.database_url, "Database ready");

        Ok(Self {
            conformance: Arc::new(ConformanceRepository::new(pool.clone())),
            lots: Arc::new(LotRepository::new(pool.clone())),
            diary: Arc::new(DiaryRepository::new(pool)),
            settings,
        })
    }

    /// Opens an inspection session for a lot with the configured debounce
    /// window.
    pub async fn open_inspection(&self, lot_id: &str) -> Result<InspectionSession> {
        InspectionSession::load(
            Arc::clone(&self.conformance) as Arc<dyn ConformanceStore>,
            lot_id,
            self.settings.quiet_period(),
        )
        .await
    }
}
