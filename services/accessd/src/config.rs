use anyhow::{Context, Result};
use pagegate_authz::RoleCatalog;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_PG_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_PG_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PG_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" => Ok(StorageBackend::Postgres),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_PG_MAX_CONNECTIONS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_PG_CONNECT_TIMEOUT_MS
}

fn default_acquire_timeout_ms() -> u64 {
    DEFAULT_PG_ACQUIRE_TIMEOUT_MS
}

// Access service configuration sourced from environment variables, with an
// optional YAML overlay.
#[derive(Debug, Clone)]
pub struct AccessdConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    /// Identity ids promoted to `admin` at start-up.
    pub seed_admins: Vec<String>,
    pub catalog: RoleCatalog,
}

#[derive(Debug, Deserialize)]
struct AccessdConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    postgres: Option<PostgresConfig>,
    seed_admins: Option<Vec<String>>,
    role_permissions: Option<HashMap<String, Vec<String>>>,
}

impl AccessdConfig {
    pub fn from_env() -> Result<Self> {
        let metrics_bind = std::env::var("PAGEGATE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse PAGEGATE_METRICS_BIND")?;
        let bind_addr = std::env::var("PAGEGATE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8443".to_string())
            .parse()
            .with_context(|| "parse PAGEGATE_BIND")?;
        let storage = std::env::var("PAGEGATE_STORAGE")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()
            .with_context(|| "parse PAGEGATE_STORAGE")?;
        let postgres = match std::env::var("PAGEGATE_POSTGRES_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: env_or("PAGEGATE_POSTGRES_MAX_CONNECTIONS", DEFAULT_PG_MAX_CONNECTIONS)?,
                connect_timeout_ms: env_or(
                    "PAGEGATE_POSTGRES_CONNECT_TIMEOUT_MS",
                    DEFAULT_PG_CONNECT_TIMEOUT_MS,
                )?,
                acquire_timeout_ms: env_or(
                    "PAGEGATE_POSTGRES_ACQUIRE_TIMEOUT_MS",
                    DEFAULT_PG_ACQUIRE_TIMEOUT_MS,
                )?,
            }),
            Err(_) => None,
        };
        let seed_admins = std::env::var("PAGEGATE_SEED_ADMINS")
            .map(|value| split_list(&value))
            .unwrap_or_default();
        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
            seed_admins,
            catalog: RoleCatalog::standard(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("PAGEGATE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read PAGEGATE_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AccessdConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse accessd config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.postgres {
            self.postgres = Some(value);
        }
        if let Some(value) = override_cfg.seed_admins {
            self.seed_admins = value;
        }
        if let Some(value) = override_cfg.role_permissions {
            self.catalog = RoleCatalog::standard()
                .with_role_overrides(&value)
                .with_context(|| "parse role_permissions")?;
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegate_authz::{Role, permissions};
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        let _g1 = EnvGuard::unset("PAGEGATE_BIND");
        let _g2 = EnvGuard::unset("PAGEGATE_METRICS_BIND");
        let _g3 = EnvGuard::unset("PAGEGATE_STORAGE");
        let _g4 = EnvGuard::unset("PAGEGATE_POSTGRES_URL");
        let _g5 = EnvGuard::unset("PAGEGATE_SEED_ADMINS");

        let config = AccessdConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, "0.0.0.0:8443".parse::<SocketAddr>().unwrap());
        assert_eq!(config.metrics_bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.postgres.is_none());
        assert!(config.seed_admins.is_empty());
        assert_eq!(config.catalog, RoleCatalog::standard());
    }

    #[test]
    #[serial]
    fn from_env_reads_postgres_and_seed_admins() {
        let _g1 = EnvGuard::set("PAGEGATE_STORAGE", "postgres");
        let _g2 = EnvGuard::set("PAGEGATE_POSTGRES_URL", "postgres://localhost/pagegate");
        let _g3 = EnvGuard::set("PAGEGATE_POSTGRES_MAX_CONNECTIONS", "3");
        let _g4 = EnvGuard::set("PAGEGATE_SEED_ADMINS", " alice , ,bob");

        let config = AccessdConfig::from_env().expect("config");
        assert_eq!(config.storage, StorageBackend::Postgres);
        let pg = config.postgres.expect("postgres");
        assert_eq!(pg.max_connections, 3);
        assert_eq!(pg.connect_timeout_ms, DEFAULT_PG_CONNECT_TIMEOUT_MS);
        assert_eq!(config.seed_admins, vec!["alice", "bob"]);
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_values() {
        let _g1 = EnvGuard::set("PAGEGATE_STORAGE", "mongo");
        assert!(AccessdConfig::from_env().is_err());
        drop(_g1);
        let _g2 = EnvGuard::set("PAGEGATE_BIND", "not-an-addr");
        assert!(AccessdConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn yaml_overrides_env_values() {
        let _g1 = EnvGuard::unset("PAGEGATE_STORAGE");
        let _g2 = EnvGuard::unset("PAGEGATE_POSTGRES_URL");
        let mut config = AccessdConfig::from_env().expect("config");
        config
            .apply_yaml(
                r#"
bind_addr: "127.0.0.1:9000"
storage: postgres
postgres:
  url: "postgres://db/pagegate"
seed_admins: ["root-id"]
role_permissions:
  viewer: ["posts.read"]
"#,
            )
            .expect("yaml");
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageBackend::Postgres);
        let pg = config.postgres.expect("postgres");
        assert_eq!(pg.url, "postgres://db/pagegate");
        assert_eq!(pg.max_connections, DEFAULT_PG_MAX_CONNECTIONS);
        assert_eq!(config.seed_admins, vec!["root-id"]);
        let viewer = config.catalog.permissions_for(Role::Viewer);
        assert_eq!(viewer.len(), 1);
        assert!(viewer.contains(permissions::POSTS_READ));
    }

    #[test]
    fn yaml_rejects_unknown_roles() {
        let mut config = AccessdConfig {
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            metrics_bind: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            storage: StorageBackend::Memory,
            postgres: None,
            seed_admins: Vec::new(),
            catalog: RoleCatalog::standard(),
        };
        let err = config
            .apply_yaml("role_permissions:\n  owner: [\"x\"]\n")
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid role"));
    }

    #[test]
    #[serial]
    fn from_env_or_yaml_reads_file() {
        let path = std::env::temp_dir().join(format!("accessd-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "metrics_bind: \"127.0.0.1:9100\"\n").expect("write");
        let _g1 = EnvGuard::set("PAGEGATE_CONFIG", path.to_str().expect("path"));
        let _g2 = EnvGuard::unset("PAGEGATE_STORAGE");
        let _g3 = EnvGuard::unset("PAGEGATE_BIND");
        let config = AccessdConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.metrics_bind, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
        let _ = std::fs::remove_file(path);
    }
}
