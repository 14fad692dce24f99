//! Catalog export
//!
//! Runs inject then extract over every source file of the project and writes the
//! default-locale catalog.

use crate::transform::collect_translations;
use anyhow::Context;
use glob::glob;
use jsx_localizer::{LocalizeConfig, Translations};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Source files that contributed to the catalog.
    pub files: usize,
    /// Source files that could not be read or parsed.
    pub skipped: usize,
    pub entries: usize,
    pub output: PathBuf,
}

/// Every `<basePath>/<srcFolder>/**/*.<ext>`, sorted.
pub fn collect_source_files(config: &LocalizeConfig) -> anyhow::Result<Vec<PathBuf>> {
    let base = Path::new(&config.base_path);
    let mut files = Vec::new();

    for folder in &config.src_folders {
        for extension in &config.file_extensions {
            let pattern = base.join(folder).join("**").join(format!("*.{}", extension));
            let pattern = pattern.to_string_lossy();
            let paths = glob(&pattern)
                .with_context(|| format!("invalid source pattern {}", pattern))?;
            files.extend(paths.filter_map(Result::ok).filter(|path| path.is_file()));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

pub fn export_catalog(config: &LocalizeConfig) -> anyhow::Result<ExportSummary> {
    let start = Instant::now();
    let files = collect_source_files(config)?;
    info!("extracting strings from {} files", files.len());

    let extracted: Vec<Option<Translations>> = files
        .par_iter()
        .map(|path| extract_file(path, config))
        .collect();

    let mut catalog = Translations::new();
    let mut skipped = 0;
    for translations in extracted {
        match translations {
            Some(translations) => catalog.merge(translations, config)?,
            None => skipped += 1,
        }
    }

    let export_path = Path::new(&config.export_path);
    fs::create_dir_all(export_path)
        .with_context(|| format!("failed to create {}", export_path.display()))?;
    let output = export_path.join(format!("{}.json", config.default_locale));
    fs::write(&output, catalog.to_json_pretty()?)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "wrote {} entries to {} in {:?}",
        catalog.len(),
        output.display(),
        start.elapsed()
    );

    Ok(ExportSummary {
        files: files.len() - skipped,
        skipped,
        entries: catalog.len(),
        output,
    })
}

fn extract_file(path: &Path, config: &LocalizeConfig) -> Option<Translations> {
    let description = path.to_string_lossy();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            error!(path = %description, "failed to read source: {}", err);
            return None;
        }
    };

    match collect_translations(&source, &description, config) {
        Ok(translations) => Some(translations),
        Err(err) => {
            error!(path = %description, "skipping file: {}", err);
            None
        }
    }
}
