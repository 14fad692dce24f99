//! Per-file transforms
//!
//! Source text in, source text (or catalog entries) out. These are what a bundler
//! loader calls for every JS/JSX module.

use crate::bridge::parse_document;
use jsx_localizer::printer::print_host_code;
use jsx_localizer::{extract, inject, InjectReport, LocalizeConfig, Result, Translations};
use tracing::{debug, error};

/// Rewritten module source and the forms that were injected into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Injected {
    pub code: String,
    pub report: InjectReport,
}

/// Rewrite every translatable run in `source` into its localized form, adding the
/// imports the generated code relies on.
pub fn inject_localization(source: &str, path: &str, config: &LocalizeConfig) -> Result<Injected> {
    let document = parse_document(source, path, config)?;
    let (document, report) = inject(document, config);

    let mut code = print_host_code(&document);
    if report.contains(InjectReport::ELEMENT) {
        code = format!("{}\n{}", config.component_import, code);
    }
    if report.contains(InjectReport::CALL) {
        code = format!("{}\n{}", config.i18n_import, code);
    }

    debug!(path, ?report, "injected localization");
    Ok(Injected { code, report })
}

/// Collect the catalog entries of an already localized module. A module that fails
/// to parse or violates the localized structure contributes nothing.
pub fn extract_strings(source: &str, description: &str, config: &LocalizeConfig) -> Translations {
    parse_document(source, description, config)
        .and_then(|document| extract(&document, description, config))
        .unwrap_or_else(|err| {
            error!(path = description, "failed to extract strings: {}", err);
            Translations::new()
        })
}

/// Inject then extract in one go, without printing and reparsing in between.
pub fn collect_translations(source: &str, path: &str, config: &LocalizeConfig) -> Result<Translations> {
    let document = parse_document(source, path, config)?;
    let (document, _) = inject(document, config);
    extract(&document, path, config)
}
