//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ClientConfig;
use crate::domain::errors::GoodDataError;
use crate::domain::result::Result;
use regex::Regex;
use secrecy::Secret;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ClientConfig`]
/// 4. Applies environment variable overrides (`GOODDATA_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use gooddata::config::loader::load_config;
///
/// let config = load_config("gooddata.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GoodDataError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GoodDataError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ClientConfig = toml::from_str(&contents)
        .map_err(|e| GoodDataError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        GoodDataError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Referencing an unset variable is an
/// error so a half-substituted config never reaches the transport.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GoodDataError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `GOODDATA_*` prefix
///
/// Variables follow the pattern `GOODDATA_<SECTION>_<KEY>`, for example
/// `GOODDATA_ENDPOINT_HOSTNAME` or `GOODDATA_POLLING_INTERVAL_MS`.
fn apply_env_overrides(config: &mut ClientConfig) {
    // Endpoint overrides
    if let Ok(val) = std::env::var("GOODDATA_ENDPOINT_HOSTNAME") {
        config.endpoint.hostname = val;
    }
    if let Ok(val) = std::env::var("GOODDATA_ENDPOINT_PROTOCOL") {
        config.endpoint.protocol = val;
    }
    if let Ok(val) = std::env::var("GOODDATA_ENDPOINT_PORT") {
        if let Ok(port) = val.parse() {
            config.endpoint.port = Some(port);
        }
    }

    // Credential overrides
    if let Ok(val) = std::env::var("GOODDATA_CREDENTIALS_USERNAME") {
        config.credentials.username = val;
    }
    if let Ok(val) = std::env::var("GOODDATA_CREDENTIALS_PASSWORD") {
        config.credentials.password = Secret::new(val.into());
    }

    // HTTP overrides
    if let Ok(val) = std::env::var("GOODDATA_HTTP_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.http.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("GOODDATA_HTTP_TLS_VERIFY") {
        config.http.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("GOODDATA_HTTP_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.http.retry.max_retries = retries;
        }
    }

    // Polling overrides
    if let Ok(val) = std::env::var("GOODDATA_POLLING_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.polling.interval_ms = interval;
        }
    }
    if let Ok(val) = std::env::var("GOODDATA_POLLING_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.polling.max_attempts = attempts;
        }
    }
}
