use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_at};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

const DEFAULT_GENERATOR_TIMEOUT: u64 = 60;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    generator: Generator,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
}

/// Where generated questions come from.
#[derive(Debug, Deserialize)]
pub struct Generator {
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    pub fn parse(bytes: &[u8]) -> ConfigResult<Self> {
        Ok(toml::from_slice(bytes)?)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let config = match read_config(use_local).and_then(|bytes| Self::parse(&bytes)) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                };

                config
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn generator(&self) -> &Generator {
        &self.generator
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}

impl Generator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_secs: None,
        }
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[inline]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[inline]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_GENERATOR_TIMEOUT)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"
        [host]
        bindto = "127.0.0.1:5000"

        [app]
        jwt = "secret"
        database_uri = "postgres://localhost/quizlog"

        [generator]
        endpoint = "http://127.0.0.1:8000/generate"
    "#;

    #[test]
    fn parse_applies_defaults() {
        let config = Config::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(config.host().bindto(), "127.0.0.1:5000");
        assert_eq!(config.app().jwt(), "secret");
        assert!(!config.app().docs());
        assert_eq!(config.generator().endpoint(), "http://127.0.0.1:8000/generate");
        assert_eq!(config.generator().api_key(), None);
        assert_eq!(config.generator().timeout_secs(), 60);
    }

    #[test]
    fn parse_reads_optional_fields() {
        let text = SAMPLE
            .replace("jwt = \"secret\"", "jwt = \"secret\"\ndocs = true")
            .replace(
                "endpoint = \"http://127.0.0.1:8000/generate\"",
                "endpoint = \"http://gen\"\napi_key = \"k\"\ntimeout_secs = 5",
            );
        let config = Config::parse(text.as_bytes()).unwrap();
        assert!(config.app().docs());
        assert_eq!(config.generator().api_key(), Some("k"));
        assert_eq!(config.generator().timeout_secs(), 5);
    }

    #[test]
    fn parse_requires_generator_section() {
        let text = SAMPLE.split("[generator]").next().unwrap();
        assert!(matches!(
            Config::parse(text.as_bytes()),
            Err(ConfigError::TomlDeError(_))
        ));
    }
}
