use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// Explicit randomness source for the selection component, seedable
    /// through `selection.seed` for deterministic tests.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let rng = match config.selection.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            db,
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}
