//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::job::BackendChoice;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let value = normalize_config_value(key, value)?;

    let mut config = store.load().await?;
    *field_mut(&mut config, key) = Some(value.clone());

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    let value = field_mut(&mut config, key).take();
    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value("api_base", config.api_base.as_deref().unwrap_or(NOT_SET));
    presenter.key_value("backend", config.backend.as_deref().unwrap_or(NOT_SET));
    presenter.key_value("output_dir", config.output_dir.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Field backing a (validated) config key
fn field_mut<'a>(config: &'a mut AppConfig, key: &str) -> &'a mut Option<String> {
    match key {
        "api_base" => &mut config.api_base,
        "backend" => &mut config.backend,
        "output_dir" => &mut config.output_dir,
        _ => unreachable!(), // Already validated
    }
}

/// Validate a config value based on key type, returning the form to store
fn normalize_config_value(key: &str, value: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "api_base" => {
            let url = value.trim().trim_end_matches('/');
            let has_host = url
                .split_once("://")
                .is_some_and(|(scheme, rest)| matches!(scheme, "http" | "https") && !rest.is_empty());
            if !has_host {
                return Err(invalid(format!(
                    "Invalid URL '{}'. Expected http://host[:port] or https://host[:port]",
                    value
                )));
            }
            Ok(url.to_string())
        }
        "backend" => value
            .parse::<BackendChoice>()
            .map(|b| b.to_string())
            .map_err(|e| invalid(e.to_string())),
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            Ok(value.to_string())
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_valid() {
        assert_eq!(
            normalize_config_value("api_base", "http://localhost:8000").unwrap(),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_config_value("api_base", "https://analyzer.example.com/").unwrap(),
            "https://analyzer.example.com"
        );
    }

    #[test]
    fn api_base_invalid() {
        assert!(normalize_config_value("api_base", "localhost:8000").is_err());
        assert!(normalize_config_value("api_base", "ftp://host").is_err());
        assert!(normalize_config_value("api_base", "http://").is_err());
    }

    #[test]
    fn backend_is_normalized() {
        assert_eq!(normalize_config_value("backend", "FASTER").unwrap(), "faster");
        let err = normalize_config_value("backend", "whisper").unwrap_err();
        assert!(err.to_string().contains("backend"));
    }

    #[test]
    fn output_dir_must_not_be_blank() {
        assert!(normalize_config_value("output_dir", "  ").is_err());
        assert_eq!(normalize_config_value("output_dir", "out").unwrap(), "out");
    }

    #[test]
    fn unknown_key_rejected() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }

    #[test]
    fn field_mut_targets_each_key() {
        let mut config = AppConfig::empty();
        *field_mut(&mut config, "api_base") = Some("http://a".to_string());
        *field_mut(&mut config, "backend") = Some("faster".to_string());
        *field_mut(&mut config, "output_dir") = Some("out".to_string());
        assert_eq!(config.api_base.as_deref(), Some("http://a"));
        assert_eq!(config.backend.as_deref(), Some("faster"));
        assert_eq!(config.output_dir.as_deref(), Some("out"));
    }
}
