use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration: strongly-typed global sections plus a
/// flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core server configuration.
    pub server: ServerConfig,
    /// Database configuration (optional).
    pub database: Option<DatabaseConfig>,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Media storage configuration (optional, defaults under home_dir).
    pub media: Option<MediaConfig>,
    /// Per-module configuration bag: module_name -> arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub home_dir: String, // normalized to an absolute path on load
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL (e.g., "sqlite://storefront.db").
    pub url: String,
    /// Maximum number of connections in the pool (defaults to 10).
    pub max_conns: Option<u32>,
    /// SQLite busy timeout in milliseconds (defaults to 5000).
    pub busy_timeout_ms: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory uploaded images are stored under. Relative paths resolve
    /// against `server.home_dir`.
    pub root: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: Option<String>, // "logs/storefront.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Empty => $HOME/.storefront, created on demand.
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8087,
            timeout_sec: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file: Some("logs/storefront.log".to_string()),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://database/storefront.db".to_string(),
                max_conns: Some(10),
                busy_timeout_ms: Some(5000),
            }),
            logging: Some(LoggingConfig::default()),
            media: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Layered loading: defaults -> YAML file -> environment variables.
    /// Also normalizes `server.home_dir` into an absolute path and creates it.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Start from a minimal base where optional sections stay None unless
        // the YAML/ENV layers provide them.
        let base = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            media: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // STOREFRONT__SERVER__PORT=8087 maps to server.port
            .merge(Env::prefixed("STOREFRONT__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .context("Failed to extract config from figment")?;

        normalize_home_dir_inplace(&mut config.server)
            .context("Failed to resolve server.home_dir")?;

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.server)
                    .context("Failed to resolve server.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML (for `--print-config`).
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let logging = self.logging.get_or_insert_with(LoggingConfig::default);
        logging.console_level = match args.verbose {
            0 => logging.console_level.clone(), // keep
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
    }

    /// Absolute media root, resolving relative paths against home_dir.
    pub fn media_root(&self) -> PathBuf {
        let raw = self
            .media
            .as_ref()
            .map(|m| m.root.clone())
            .unwrap_or_else(|| "media".to_string());
        let p = PathBuf::from(raw);
        if p.is_absolute() {
            p
        } else {
            Path::new(&self.server.home_dir).join(p)
        }
    }

    /// Fetch one module's config value out of the bag, if present.
    pub fn module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}

/// Command line arguments passed down from the binary.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
}

const fn default_subdir() -> &'static str {
    ".storefront"
}

/// Resolve `server.home_dir`: empty means `$HOME/.storefront`, relative paths
/// resolve against the current directory. The directory is created.
fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    let resolved: PathBuf = if server.home_dir.trim().is_empty() {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME is not set and server.home_dir is empty")?;
        home.join(default_subdir())
    } else {
        let p = PathBuf::from(server.home_dir.trim());
        if p.is_absolute() {
            p
        } else {
            std::env::current_dir()
                .context("cannot resolve current directory")?
                .join(p)
        }
    };

    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("cannot create home_dir {}", resolved.display()))?;

    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_have_database_and_logging() {
        let config = AppConfig::default();
        assert!(config.database.is_some());
        assert!(config.logging.is_some());
        assert_eq!(config.server.port, 8087);
    }

    #[test]
    fn yaml_layer_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "server:\n  home_dir: \"{}\"\n  host: 0.0.0.0\n  port: 9000\nmodules:\n  catalog:\n    default_limit: 24\n",
            dir.path().join("home").display()
        )
        .unwrap();

        let config = AppConfig::load_layered(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.module_config("catalog").unwrap()["default_limit"],
            serde_json::json!(24)
        );
        // optional sections stay unset unless provided
        assert!(config.database.is_none());
    }

    #[test]
    fn cli_overrides_port_and_verbosity() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            port: Some(1234),
            verbose: 2,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.logging.unwrap().console_level, "trace");
    }

    #[test]
    fn media_root_resolves_relative_to_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.server.home_dir = dir.path().to_string_lossy().to_string();
        assert_eq!(config.media_root(), dir.path().join("media"));
    }
}
