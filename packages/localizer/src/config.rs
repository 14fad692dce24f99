//! Configuration
//!
//! A single value threaded by reference into every pass. Field names follow the
//! camelCase keys of the `.i18nrc` file.

use crate::error::{LocalizeError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Child text of a swapped-out element inside the `elements` list.
pub const ELEMENT_PLACEHOLDER: &str = "$1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizeConfig {
    /// Name of the canonical localized element.
    pub component_name: String,
    /// Line prepended when the element form was injected.
    pub component_import: String,
    /// Line prepended when the call form was injected.
    pub i18n_import: String,
    /// Receiver of the lookup call, `<namespace>.t(...)`.
    pub i18n_namespace: String,
    /// Structure violations raise instead of being logged.
    pub strict: bool,
    pub element_tag: char,
    pub expression_opening: String,
    pub expression_closing: String,
    pub placeholder_tag: String,
    pub placeholder_index_tag: String,
    pub max_translation_key_length: usize,
    pub base_path: String,
    pub src_folders: Vec<String>,
    pub file_extensions: Vec<String>,
    pub export_path: String,
    pub default_locale: String,
    pub attribute_names: Vec<String>,
    pub attribute_ignores: Vec<String>,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        LocalizeConfig {
            component_name: "Localize".to_string(),
            component_import: r#"import Localize from "jsx-localizer/Localize";"#.to_string(),
            i18n_import: r#"import i18n from "jsx-localizer/i18n";"#.to_string(),
            i18n_namespace: "i18n".to_string(),
            strict: true,
            element_tag: '*',
            expression_opening: "%[".to_string(),
            expression_closing: "]".to_string(),
            placeholder_tag: "~~~".to_string(),
            placeholder_index_tag: "$".to_string(),
            max_translation_key_length: 16,
            base_path: ".".to_string(),
            src_folders: vec!["src".to_string()],
            file_extensions: vec!["js".to_string(), "jsx".to_string()],
            export_path: "./public/locale".to_string(),
            default_locale: "en".to_string(),
            attribute_names: ["title", "placeholder", "label", "tooltip", "content"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            attribute_ignores: ["id", "name", "className"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LocalizeConfig {
    /// Parse a configuration from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Report a recoverable violation: an error under strict mode, a warning otherwise.
    pub fn violation(&self, error: LocalizeError) -> Result<()> {
        if self.strict {
            Err(error)
        } else {
            warn!("[WARNING] {}", error);
            Ok(())
        }
    }

    /// Returns `Ok(true)` when `condition` holds. Otherwise reports the violation and
    /// returns `Ok(false)` so lenient callers can skip the offending node.
    pub fn ensure(
        &self,
        condition: bool,
        error: impl FnOnce() -> LocalizeError,
    ) -> Result<bool> {
        if condition {
            return Ok(true);
        }
        self.violation(error())?;
        Ok(false)
    }

    /// Allow-list entries match anywhere in the name, ignoring case; deny-list entries
    /// match the whole name.
    pub fn is_translatable_attribute_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.attribute_names
            .iter()
            .any(|allowed| lower.contains(&allowed.to_lowercase()))
            && !self.attribute_ignores.iter().any(|ignored| ignored == name)
    }

    /// Callee of the lookup call, e.g. `i18n.t`.
    pub fn lookup_callee(&self) -> String {
        format!("{}.t", self.i18n_namespace)
    }
}
