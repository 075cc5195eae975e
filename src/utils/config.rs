use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::driver::common::PollConfig;

/// Browser engine used by the web driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserType::Chromium),
            "firefox" => Ok(BrowserType::Firefox),
            "webkit" | "safari" => Ok(BrowserType::Webkit),
            _ => anyhow::bail!("Unknown browser: {}", s),
        }
    }
}

/// Values the assertions compare against that depend on the environment under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expectations {
    /// Success toasts shown after adding or removing sample data.
    /// One per sample-data category (security, auditing, threat detection).
    pub sample_data_toasts: usize,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            sample_data_toasts: 3,
        }
    }
}

/// Settings given on the command line; unset fields keep the loaded value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub headless: bool,
    pub browser: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub continue_on_failure: bool,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Dashboard root, relative page routes are joined onto it
    pub base_url: String,

    pub username: Option<String>,
    pub password: Option<String>,

    pub browser: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Dashboards behind self-signed certificates are the norm in test labs
    pub ignore_https_errors: bool,

    /// Default timeout for element waiting (ms)
    pub default_timeout_ms: u64,

    /// First delay between two element queries (ms)
    pub poll_interval_ms: u64,

    /// Upper bound for the backed-off query delay (ms)
    pub max_poll_interval_ms: u64,

    /// Keep running scenarios after one fails
    pub continue_on_failure: bool,

    /// Output directory for screenshots and reports
    pub output_dir: PathBuf,

    pub expectations: Expectations,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:5601".to_string(),
            username: None,
            password: None,
            browser: BrowserType::Chromium,
            headless: false,
            viewport_width: 1280,
            viewport_height: 720,
            ignore_https_errors: true,
            default_timeout_ms: 4000,
            poll_interval_ms: 100,
            max_poll_interval_ms: 500,
            continue_on_failure: false,
            output_dir: PathBuf::from("./output"),
            expectations: Expectations::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file, then apply environment overrides
    ///
    /// Command line flags go on top with [`Config::apply_cli`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `WAZUH_E2E_*` overrides. The lookup is injected so tests do not touch the process env.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WAZUH_E2E_BASE_URL") {
            self.base_url = url;
        }
        if let Some(user) = lookup("WAZUH_E2E_USERNAME") {
            self.username = Some(user);
        }
        if let Some(pass) = lookup("WAZUH_E2E_PASSWORD") {
            self.password = Some(pass);
        }
        if let Some(headless) = lookup("WAZUH_E2E_HEADLESS") {
            self.headless = parse_flag("WAZUH_E2E_HEADLESS", &headless)?;
        }
        if let Some(timeout) = lookup("WAZUH_E2E_TIMEOUT_MS") {
            self.default_timeout_ms = timeout
                .parse()
                .with_context(|| format!("WAZUH_E2E_TIMEOUT_MS is not a number: {}", timeout))?;
        }
        Ok(())
    }

    /// Apply command line flags, which take precedence over file and environment
    ///
    /// Boolean flags can only switch a setting on.
    pub fn apply_cli(&mut self, cli: CliOverrides) -> Result<()> {
        if let Some(url) = cli.base_url {
            self.base_url = url;
        }
        if cli.headless {
            self.headless = true;
        }
        if let Some(browser) = cli.browser {
            self.browser = browser.parse()?;
        }
        if let Some(dir) = cli.output_dir {
            self.output_dir = dir;
        }
        if cli.continue_on_failure {
            self.continue_on_failure = true;
        }
        Ok(())
    }

    /// Join a page route onto the base URL; absolute URLs pass through
    pub fn url_for(&self, route: &str) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            route.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                route.trim_start_matches('/')
            )
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            timeout_ms: self.default_timeout_ms,
            initial_interval_ms: self.poll_interval_ms,
            max_interval_ms: self.max_poll_interval_ms,
            use_exponential_backoff: true,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} is not a boolean: {}", key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_timeout_ms, 4000);
        assert_eq!(config.expectations.sample_data_toasts, 3);
        assert!(config.ignore_https_errors);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
baseUrl: https://dashboard.lab:443
headless: true
expectations:
  sampleDataToasts: 4
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "https://dashboard.lab:443");
        assert!(config.headless);
        assert_eq!(config.expectations.sample_data_toasts, 4);
        assert_eq!(config.default_timeout_ms, 4000);
        assert_eq!(config.browser, BrowserType::Chromium);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wazuh-e2e.yaml");
        std::fs::write(&path, "browser: firefox\ndefaultTimeoutMs: 10000\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.browser, BrowserType::Firefox);
        assert_eq!(config.default_timeout_ms, 10000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("WAZUH_E2E_BASE_URL", "https://10.0.0.5"),
            ("WAZUH_E2E_USERNAME", "admin"),
            ("WAZUH_E2E_HEADLESS", "1"),
            ("WAZUH_E2E_TIMEOUT_MS", "2500"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "https://10.0.0.5");
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(config.password.is_none());
        assert!(config.headless);
        assert_eq!(config.default_timeout_ms, 2500);
    }

    #[test]
    fn test_bad_timeout_env_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(|key| {
            (key == "WAZUH_E2E_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_headless_env_is_parsed_strictly() {
        let mut config = Config {
            headless: true,
            ..Config::default()
        };
        config
            .apply_env(|key| (key == "WAZUH_E2E_HEADLESS").then(|| "FALSE".to_string()))
            .unwrap();
        assert!(!config.headless);

        let result = config
            .apply_env(|key| (key == "WAZUH_E2E_HEADLESS").then(|| "ture".to_string()));
        assert!(result.unwrap_err().to_string().contains("WAZUH_E2E_HEADLESS"));
    }

    #[test]
    fn test_cli_overrides_file_and_env() {
        let mut config = Config::from_yaml(
            "baseUrl: https://from-file\nheadless: true\nbrowser: firefox\n",
        )
        .unwrap();
        config
            .apply_env(|key| (key == "WAZUH_E2E_BASE_URL").then(|| "https://from-env".to_string()))
            .unwrap();
        assert_eq!(config.base_url, "https://from-env");

        config
            .apply_cli(CliOverrides {
                base_url: Some("https://from-cli".to_string()),
                output_dir: Some(PathBuf::from("/tmp/e2e")),
                continue_on_failure: true,
                ..CliOverrides::default()
            })
            .unwrap();

        assert_eq!(config.base_url, "https://from-cli");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/e2e"));
        assert!(config.continue_on_failure);
        // Flags left unset keep the file values
        assert!(config.headless);
        assert_eq!(config.browser, BrowserType::Firefox);
    }

    #[test]
    fn test_cli_unknown_browser_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_cli(CliOverrides {
            browser: Some("lynx".to_string()),
            ..CliOverrides::default()
        });
        assert!(result.is_err());
        assert_eq!(config.browser, BrowserType::Chromium);
    }

    #[test]
    fn test_url_for() {
        let config = Config {
            base_url: "https://localhost:5601/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.url_for("/app/wazuh#/manager/?tab=decoders"),
            "https://localhost:5601/app/wazuh#/manager/?tab=decoders"
        );
        assert_eq!(config.url_for("http://other/x"), "http://other/x");
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("Firefox".parse::<BrowserType>().unwrap(), BrowserType::Firefox);
        assert!("lynx".parse::<BrowserType>().is_err());
    }
}
