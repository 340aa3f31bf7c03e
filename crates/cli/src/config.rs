/// CLI configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use; only the database-backed
/// commands need `DATABASE_URL`.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// PostgreSQL connection URL (default: unset).
    pub database_url: Option<String>,
    /// Connection pool size (default: `5`).
    pub db_max_connections: u32,
    /// Pretty-print emitted JSON (default: `true`).
    pub pretty: bool,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `DATABASE_URL`       | unset   |
    /// | `DB_MAX_CONNECTIONS` | `5`     |
    /// | `VIEWEDITOR_PRETTY`  | `true`  |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let pretty: bool = std::env::var("VIEWEDITOR_PRETTY")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("VIEWEDITOR_PRETTY must be true or false");

        Self {
            database_url,
            db_max_connections,
            pretty,
        }
    }

    /// The database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for this command"))
    }
}
