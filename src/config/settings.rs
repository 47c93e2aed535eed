pub struct EloSettings {
    pub starting_elo: i32,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self { starting_elo: 1000 }
    }
}

pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "op_leader_ranking.db".to_string()),
        }
    }
}

pub struct AppConfig {
    pub elo: EloSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            elo: EloSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

// Config is passed explicitly into services (dependency injection) rather
// than held as a global.
