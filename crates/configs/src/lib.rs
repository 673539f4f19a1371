use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

use common::LogFormat;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations during bootstrap.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

/// Credential hashing and token signing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_expires_hours")]
    pub jwt_expires_hours: i64,
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    #[serde(default)]
    pub password: PasswordHashConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expires_hours: default_jwt_expires_hours(),
            jwt_issuer: default_jwt_issuer(),
            password: PasswordHashConfig::default(),
        }
    }
}

/// Fixed cost of the argon2id password hash.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self { memory_kib: 19_456, iterations: 2, parallelism: 1 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }
fn default_jwt_expires_hours() -> i64 { 8 }
fn default_jwt_issuer() -> String { "lifeboard".into() }

/// Load from `CONFIG_PATH` (or `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables, then validate every section.
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    /// Environment values win over the file; `lookup` abstracts `std::env::var` for tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.auth.jwt_secret = secret;
        }
        if let Some(hours) = lookup("JWT_EXPIRES_HOURS") {
            self.auth.jwt_expires_hours = hours
                .trim()
                .parse()
                .map_err(|_| anyhow!("JWT_EXPIRES_HOURS must be an integer, got {hours:?}"))?;
        }
        if let Some(raw) = lookup("LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&raw)
                .ok_or_else(|| anyhow!("LOG_FORMAT must be `compact` or `json`, got {raw:?}"))?;
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.jwt_expires_hours <= 0 {
            return Err(anyhow!("auth.jwt_expires_hours must be positive"));
        }
        if self.jwt_issuer.trim().is_empty() {
            return Err(anyhow!("auth.jwt_issuer must not be blank"));
        }
        self.password.validate()
    }
}

impl PasswordHashConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(anyhow!("auth.password iterations and parallelism must be >= 1"));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(anyhow!("auth.password.memory_kib must be at least 8 * parallelism"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.database.max_connections, 10);
        assert!(cfg.database.run_migrations);
        assert_eq!(cfg.auth.jwt_expires_hours, 8);
        assert_eq!(cfg.auth.jwt_issuer, "lifeboard");
        assert_eq!(cfg.auth.password, PasswordHashConfig::default());
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_sections_from_toml() {
        let cfg = parse(
            r#"
            [database]
            url = "postgres://u:p@localhost/lifeboard"
            max_connections = 4
            min_connections = 1

            [auth]
            jwt_secret = "s3cret"
            jwt_expires_hours = 2
            password = { memory_kib = 64, iterations = 1, parallelism = 1 }

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert_eq!(cfg.auth.password.memory_kib, 64);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        cfg.database.validate().unwrap();
        cfg.auth.validate().unwrap();
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = parse("[auth]\njwt_secret = \"file\"\n").unwrap();
        cfg.apply_env(env(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "env"),
            ("JWT_EXPIRES_HOURS", "12"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.auth.jwt_secret, "env");
        assert_eq!(cfg.auth.jwt_expires_hours, 12);
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn malformed_env_values_are_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("JWT_EXPIRES_HOURS", "soon")])).is_err());
        assert!(cfg.apply_env(env(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut db = DatabaseConfig::default();
        assert!(db.validate().is_err());
        db.url = "mysql://localhost/x".into();
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/x".into();
        db.validate().unwrap();
        db.max_connections = 1;
        assert!(db.validate().is_err());

        let mut auth = AuthConfig::default();
        assert!(auth.validate().is_err());
        auth.jwt_secret = "x".into();
        auth.validate().unwrap();
        auth.jwt_expires_hours = 0;
        assert!(auth.validate().is_err());
        auth.jwt_expires_hours = 1;
        auth.password.memory_kib = 4;
        assert!(auth.validate().is_err());
    }
}
