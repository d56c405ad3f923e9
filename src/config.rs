use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::error::DealHuntError;
use crate::model::Storefront;
use crate::source::DataSource;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "data/deals.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub storefront: Storefront,
    pub page_size: usize,
    pub debug: bool,
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: ConfigDefaults,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigDefaults {
    source: Option<String>,
    storefront: Option<String>,
    page_size: Option<usize>,
    data_dir: Option<String>,
}

/// Values supplied on the command line; `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub storefront: Option<String>,
    pub page_size: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub debug: bool,
}

impl AppConfig {
    pub fn load(overrides: ConfigOverrides) -> Result<Self, DealHuntError> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dealhunt");
        let file_config = load_config_file(&config_dir);
        Self::resolve(overrides, file_config, |name| std::env::var(name).ok())
    }

    fn resolve(
        overrides: ConfigOverrides,
        file_config: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DealHuntError> {
        // Priority: CLI flags → env vars → config file → defaults
        let source = overrides
            .source
            .or_else(|| env("DEALHUNT_SOURCE"))
            .or(file_config.defaults.source)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
            .parse::<DataSource>()?;

        let storefront = match overrides
            .storefront
            .or_else(|| env("DEALHUNT_STOREFRONT"))
            .or(file_config.defaults.storefront)
        {
            Some(s) => s.parse::<Storefront>()?,
            None => Storefront::default(),
        };

        let page_size = overrides
            .page_size
            .or(file_config.defaults.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(DealHuntError::Config("Page size must be at least 1".to_string()));
        }

        let data_dir = overrides
            .data_dir
            .or_else(|| env("DEALHUNT_DATA_DIR").map(PathBuf::from))
            .or(file_config.defaults.data_dir.map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from(".local/share"))
                    .join("dealhunt")
            });

        Ok(AppConfig {
            source,
            storefront,
            page_size,
            debug: overrides.debug,
            data_dir,
        })
    }
}

fn load_config_file(config_dir: &Path) -> ConfigFile {
    let config_path = config_dir.join("config.toml");
    if !config_path.exists() {
        return ConfigFile::default();
    }
    match std::fs::read_to_string(&config_path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
            ConfigFile::default()
        }),
        Err(_) => ConfigFile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(ConfigOverrides::default(), ConfigFile::default(), no_env).unwrap();
        assert_eq!(config.source, DataSource::File(PathBuf::from(DEFAULT_SOURCE)));
        assert_eq!(config.storefront, Storefront::DealHunt);
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file: ConfigFile = toml::from_str(
            "[defaults]\nsource = \"file.json\"\nstorefront = \"affiliate-grid\"\npage_size = 6\n",
        )
        .unwrap();
        let env = |name: &str| (name == "DEALHUNT_SOURCE").then(|| "env.json".to_string());

        let config = AppConfig::resolve(ConfigOverrides::default(), file, env).unwrap();
        assert_eq!(config.source, DataSource::File(PathBuf::from("env.json")));
        assert_eq!(config.storefront, Storefront::AffiliateGrid);
        assert_eq!(config.page_size, 6);

        let overrides = ConfigOverrides {
            source: Some("flag.json".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(overrides, ConfigFile::default(), env).unwrap();
        assert_eq!(config.source, DataSource::File(PathBuf::from("flag.json")));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let overrides = ConfigOverrides {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(overrides, ConfigFile::default(), no_env).is_err());
    }

    #[test]
    fn test_unknown_storefront_rejected() {
        let overrides = ConfigOverrides {
            storefront: Some("bazaar".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(overrides, ConfigFile::default(), no_env).is_err());
    }
}
