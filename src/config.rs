use std::env;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_host: Option<String>,
    pub account_id: Option<String>,
    pub api_key: Option<String>,
    pub mapping_path: Option<PathBuf>,
    pub cost_category: Option<String>,
    pub min_saving: f64,
    pub connector_ref: Option<String>,
    pub ticket_component: Option<String>,
    pub dry_run: bool,
    pub log_level: String,
    pub output_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

/// Resolves setting names against the process environment. Under a plugin
/// host every setting is also exposed with a prefix (e.g. `PLUGIN_`), which
/// takes precedence over the bare name.
pub struct EnvSource<F> {
    prefix: Option<String>,
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(prefix: Option<String>, lookup: F) -> Self {
        let prefix = prefix.filter(|p| !p.trim().is_empty());
        Self { prefix, lookup }
    }

    /// Blank values count as unset, so an empty prefixed setting falls back
    /// to the bare name.
    pub fn get(&self, key: &str) -> Option<String> {
        let prefixed = self
            .prefix
            .as_deref()
            .and_then(|prefix| self.non_blank(&format!("{prefix}{key}")));
        prefixed.or_else(|| self.non_blank(key))
    }

    fn non_blank(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl AppConfig {
    pub fn load(env_prefix: Option<String>) -> AppResult<Self> {
        let source = EnvSource::new(env_prefix, |key: &str| env::var(key).ok());
        Self::from_source(&source)
    }

    pub fn from_source<F>(source: &EnvSource<F>) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_saving = match source.get("MIN_SAVING") {
            Some(raw) => raw.parse::<f64>().map_err(|err| {
                AppError::Configuration(format!("MIN_SAVING '{raw}' is not a number: {err}"))
            })?,
            None => 0.0,
        };
        if !min_saving.is_finite() {
            return Err(AppError::Configuration(
                "MIN_SAVING must be a finite number".to_string(),
            ));
        }

        let dry_run = match source.get("DRY_RUN") {
            Some(raw) => parse_flag("DRY_RUN", &raw)?,
            None => false,
        };

        Ok(Self {
            api_host: source.get("HARNESS_URL"),
            account_id: source.get("HARNESS_ACCOUNT_ID"),
            api_key: source.get("HARNESS_PLATFORM_API_KEY"),
            mapping_path: source.get("CSV_FILE").map(PathBuf::from),
            cost_category: source.get("COST_CATEGORY"),
            min_saving,
            connector_ref: source.get("JIRA_CONNECTOR_REF"),
            ticket_component: source.get("JIRA_COMPONENT"),
            dry_run,
            log_level: source
                .get("LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            output_file: source.get("DRONE_OUTPUT").map(PathBuf::from),
            env_prefix: source.prefix.clone(),
        })
    }

    pub fn require_api_host(&self) -> AppResult<&str> {
        require(&self.api_host, "HARNESS_URL")
    }

    pub fn require_account_id(&self) -> AppResult<&str> {
        require(&self.account_id, "HARNESS_ACCOUNT_ID")
    }

    pub fn require_api_key(&self) -> AppResult<&str> {
        require(&self.api_key, "HARNESS_PLATFORM_API_KEY")
    }

    pub fn require_cost_category(&self) -> AppResult<&str> {
        require(&self.cost_category, "COST_CATEGORY")
    }

    pub fn require_mapping_path(&self) -> AppResult<&PathBuf> {
        self.mapping_path
            .as_ref()
            .ok_or_else(|| AppError::Configuration("CSV_FILE is not set".to_string()))
    }

    /// Base URL for the API and the deep links placed in ticket bodies.
    pub fn base_url(&self) -> AppResult<String> {
        let host = self.require_api_host()?.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(host.to_string())
        } else {
            Ok(format!("https://{host}"))
        }
    }
}

fn require<'a>(value: &'a Option<String>, key: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| AppError::Configuration(format!("{key} is not set")))
}

fn parse_flag(key: &str, raw: &str) -> AppResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "{key} '{other}' is not a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(
        prefix: Option<&str>,
        vars: &[(&str, &str)],
    ) -> EnvSource<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSource::new(prefix.map(str::to_string), move |key: &str| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_source(&source(None, &[])).unwrap();
        assert_eq!(config.min_saving, 0.0);
        assert!(!config.dry_run);
        assert_eq!(config.log_level, "info");
        assert!(config.output_file.is_none());
        assert!(config.require_cost_category().is_err());
    }

    #[test]
    fn prefixed_settings_take_precedence() {
        let src = source(
            Some("PLUGIN_"),
            &[
                ("PLUGIN_COST_CATEGORY", "Teams"),
                ("COST_CATEGORY", "Ignored"),
                ("HARNESS_ACCOUNT_ID", "acct"),
            ],
        );
        let config = AppConfig::from_source(&src).unwrap();
        assert_eq!(config.cost_category.as_deref(), Some("Teams"));
        assert_eq!(config.account_id.as_deref(), Some("acct"));
    }

    #[test]
    fn blank_prefixed_setting_falls_back_to_bare_name() {
        let src = source(
            Some("PLUGIN_"),
            &[
                ("PLUGIN_JIRA_CONNECTOR_REF", ""),
                ("JIRA_CONNECTOR_REF", "jira_conn"),
                ("PLUGIN_COST_CATEGORY", "   "),
                ("COST_CATEGORY", "Teams"),
            ],
        );
        let config = AppConfig::from_source(&src).unwrap();
        assert_eq!(config.connector_ref.as_deref(), Some("jira_conn"));
        assert_eq!(config.cost_category.as_deref(), Some("Teams"));
    }

    #[test]
    fn parses_numbers_and_flags() {
        let src = source(None, &[("MIN_SAVING", "12.5"), ("DRY_RUN", "TRUE")]);
        let config = AppConfig::from_source(&src).unwrap();
        assert_eq!(config.min_saving, 12.5);
        assert!(config.dry_run);

        let bad = source(None, &[("DRY_RUN", "maybe")]);
        assert!(matches!(
            AppConfig::from_source(&bad),
            Err(AppError::Configuration(_))
        ));

        let bad = source(None, &[("MIN_SAVING", "lots")]);
        assert!(matches!(
            AppConfig::from_source(&bad),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let src = source(None, &[("JIRA_CONNECTOR_REF", "  ")]);
        let config = AppConfig::from_source(&src).unwrap();
        assert!(config.connector_ref.is_none());
    }

    #[test]
    fn base_url_assumes_https() {
        let src = source(None, &[("HARNESS_URL", "app.harness.io/")]);
        let config = AppConfig::from_source(&src).unwrap();
        assert_eq!(config.base_url().unwrap(), "https://app.harness.io");

        let src = source(None, &[("HARNESS_URL", "http://localhost:8080")]);
        let config = AppConfig::from_source(&src).unwrap();
        assert_eq!(config.base_url().unwrap(), "http://localhost:8080");
    }
}
