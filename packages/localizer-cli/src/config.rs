use anyhow::Context;
use jsx_localizer::LocalizeConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".i18nrc";

pub fn read_config(path: &Path) -> anyhow::Result<LocalizeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = LocalizeConfig::from_json(&content)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Load the configuration at `path` (or `.i18nrc`). A missing file gives the
/// defaults; so does a malformed one, after logging it.
pub fn load_config(path: Option<&Path>) -> LocalizeConfig {
    let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
    if !path.exists() {
        debug!(path = %path.display(), "no configuration file, using defaults");
        return LocalizeConfig::default();
    }

    match read_config(path) {
        Ok(config) => config,
        Err(err) => {
            error!("{:#}; using default configuration", err);
            LocalizeConfig::default()
        }
    }
}
