use std::path::PathBuf;

use crate::config::AppConfig;

/// Prints the resolved configuration (secrets masked).
pub fn run(config: &AppConfig) {
    for (label, value) in describe(config) {
        println!("{label}: {value}");
    }
}

fn describe(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Environment prefix", display_value(&config.env_prefix)),
        ("Platform host", display_value(&config.api_host)),
        ("Account ID", display_value(&config.account_id)),
        ("API key", mask_secret(&config.api_key)),
        ("Mapping table", display_path(&config.mapping_path)),
        ("Cost category", display_value(&config.cost_category)),
        ("Minimum saving", format!("{:.2}", config.min_saving)),
        ("Jira connector", display_value(&config.connector_ref)),
        ("Ticket component", display_component(&config.ticket_component)),
        ("Dry run", config.dry_run.to_string()),
        ("Log level", config.log_level.clone()),
        ("Output file", display_path(&config.output_file)),
    ]
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

/// Tickets carry no component unless one is configured.
fn display_component(value: &Option<String>) -> String {
    match value.as_deref().filter(|v| !v.is_empty()) {
        Some(component) => component.to_string(),
        None => "<not set> (no component sent; set JIRA_COMPONENT)".to_string(),
    }
}

fn display_path(value: &Option<PathBuf>) -> String {
    value
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 => {
            let prefix = token.chars().take(3).collect::<String>();
            let suffix = token.chars().rev().take(3).collect::<Vec<_>>();
            let suffix = suffix.into_iter().rev().collect::<String>();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(&Some("pat.abcdef.123456".to_string())), "pat***456");
        assert_eq!(mask_secret(&Some("short".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
    }

    #[test]
    fn never_prints_raw_api_key() {
        let config = AppConfig {
            api_host: Some("app.harness.io".to_string()),
            account_id: Some("acct".to_string()),
            api_key: Some("pat.secret.value".to_string()),
            mapping_path: None,
            cost_category: None,
            min_saving: 0.0,
            connector_ref: None,
            ticket_component: None,
            dry_run: true,
            log_level: "info".to_string(),
            output_file: None,
            env_prefix: None,
        };
        let lines = describe(&config);
        assert!(lines.iter().all(|(_, value)| !value.contains("secret")));
        assert!(lines.contains(&("Mapping table", "<not set>".to_string())));
        let component = lines
            .iter()
            .find(|(label, _)| *label == "Ticket component")
            .map(|(_, value)| value.as_str())
            .unwrap();
        assert!(component.contains("no component sent"));
        assert!(component.contains("JIRA_COMPONENT"));
    }

    #[test]
    fn shows_configured_component() {
        assert_eq!(display_component(&Some("Non-PS".to_string())), "Non-PS");
    }
}
