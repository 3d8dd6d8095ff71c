use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{
    DatabaseError, DatabaseManager, GiftRepository, ProductRepository, UserRepository,
};
use crate::gifts::BundleGenerator;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub generator: Arc<BundleGenerator>,
}

impl AppState {
    /// Must be called inside a tokio runtime (the pool spawns its reaper).
    pub fn new(config: AppConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect_lazy(&config.database)?;

        let generator = match config.gifts.random_seed {
            Some(seed) => {
                info!("Gift bundle sampler seeded with {}", seed);
                BundleGenerator::seeded(seed)
            }
            None => BundleGenerator::with_thread_rng(),
        };

        Ok(Self {
            config: Arc::new(config),
            pool,
            generator: Arc::new(generator),
        })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn gifts(&self) -> GiftRepository {
        GiftRepository::new(self.pool.clone())
    }
}
