#![deny(clippy::all)]

/**
 * JSX Localizer - Node.js binding
 *
 * Per-module transforms for bundler loaders.
 */
use jsx_localizer::LocalizeConfig;
use jsx_localizer_cli::{extract_strings, inject_localization};
use napi::{Error, Result, Status};
use napi_derive::napi;
use tracing::debug;

fn to_napi_error(err: impl std::fmt::Display) -> Error {
  Error::new(Status::GenericFailure, err.to_string())
}

#[napi]
pub struct Loader {
  config: LocalizeConfig,
}

#[napi]
impl Loader {
  /// `config` is the JSON content of an `.i18nrc`; absent keys keep their defaults.
  #[napi(constructor)]
  pub fn new(config: Option<String>) -> Result<Self> {
    let config = match config {
      Some(json) => LocalizeConfig::from_json(&json).map_err(to_napi_error)?,
      None => LocalizeConfig::default(),
    };
    Ok(Loader { config })
  }

  /// Rewrite a module into its localized form.
  #[napi]
  pub fn inject(&self, filename: String, source: String) -> Result<String> {
    debug!(filename = %filename, "injecting");
    inject_localization(&source, &filename, &self.config)
      .map(|injected| injected.code)
      .map_err(to_napi_error)
  }

  /// Catalog entries of an already localized module, as JSON.
  #[napi]
  pub fn extract(&self, filename: String, source: String) -> Result<String> {
    extract_strings(&source, &filename, &self.config)
      .to_json_pretty()
      .map_err(to_napi_error)
  }

  #[napi(getter)]
  pub fn component_name(&self) -> String {
    self.config.component_name.clone()
  }
}
