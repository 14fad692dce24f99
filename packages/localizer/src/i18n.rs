//! Runtime lookup
//!
//! Resolves canonical text against the catalog of the active locale and fills in
//! expression bindings. Catalogs are loaded lazily, once per locale, through an
//! optional [`CatalogLoader`].

use crate::catalog::{CatalogLoader, Translations};
use crate::config::LocalizeConfig;
use crate::digest::generate_key;
use crate::error::{LocalizeError, Result};
use crate::tokens::{TokenCodec, TokenKind};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Placeholder name → rendered value.
pub type Bindings = IndexMap<String, String>;

pub struct I18n {
    config: LocalizeConfig,
    codec: TokenCodec,
    locale: String,
    catalogs: HashMap<String, Translations>,
    /// Locales the loader was already asked for.
    attempted: HashSet<String>,
    loader: Option<Box<dyn CatalogLoader>>,
}

impl I18n {
    pub fn new(config: LocalizeConfig) -> Self {
        I18n {
            codec: TokenCodec::new(&config),
            locale: config.default_locale.clone(),
            config,
            catalogs: HashMap::new(),
            attempted: HashSet::new(),
            loader: None,
        }
    }

    pub fn with_loader(mut self, loader: impl CatalogLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn config(&self) -> &LocalizeConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    /// Catalog of the active locale.
    pub fn translations(&self) -> Option<&Translations> {
        self.catalogs.get(&self.locale)
    }

    /// Replace the catalog of the active locale.
    pub fn set_translations(&mut self, translations: Translations) {
        self.catalogs.insert(self.locale.clone(), translations);
    }

    pub fn needs_loading(&self) -> bool {
        self.loader.is_some()
            && !self.catalogs.contains_key(&self.locale)
            && !self.attempted.contains(&self.locale)
    }

    /// Ask the loader for the active locale, at most once per locale.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if !self.needs_loading() {
            return Ok(());
        }
        self.attempted.insert(self.locale.clone());

        if let Some(loader) = &self.loader {
            if let Some(catalog) = loader.load(&self.locale)? {
                debug!(locale = %self.locale, entries = catalog.len(), "loaded catalog");
                self.catalogs.insert(self.locale.clone(), catalog);
            }
        }
        Ok(())
    }

    /// Translation of `text`, or `text` itself when the catalog has none.
    pub fn lookup<'a>(&'a self, text: &'a str) -> &'a str {
        let key = generate_key(text, self.config.max_translation_key_length);
        self.translations()
            .and_then(|catalog| catalog.get(&key))
            .map(|entry| entry.text.as_str())
            .filter(|translated| !translated.is_empty())
            .unwrap_or(text)
    }

    /// Look up `text` and substitute every expression token from `bindings`.
    pub fn t(&self, text: &str, bindings: &Bindings) -> Result<String> {
        let translated = self.lookup(text);
        let pattern = self.codec.pattern(TokenKind::Expression, 0);

        let mut out = String::with_capacity(translated.len());
        let mut used = HashSet::new();
        let mut cursor = 0;
        for token in pattern.find_iter(translated) {
            let value = bindings
                .get(token.inner)
                .ok_or_else(|| LocalizeError::MissingBinding {
                    kind: TokenKind::Expression,
                    name: token.inner.to_string(),
                })?;
            out.push_str(&translated[cursor..token.range.start]);
            out.push_str(value);
            used.insert(token.inner);
            cursor = token.range.end;
        }
        out.push_str(&translated[cursor..]);

        for name in bindings.keys() {
            if !used.contains(name.as_str()) {
                self.config.violation(LocalizeError::InvalidStructure(format!(
                    "expression {} not found in \"{}\"",
                    name, translated
                )))?;
            }
        }
        Ok(out)
    }
}

static GLOBAL: Lazy<RwLock<I18n>> = Lazy::new(|| RwLock::new(I18n::new(LocalizeConfig::default())));

/// The process-wide instance.
pub fn global() -> &'static RwLock<I18n> {
    &GLOBAL
}

/// Replace the process-wide instance.
pub fn install(i18n: I18n) {
    *write(global()) = i18n;
}

/// [`I18n::t`] on the process-wide instance, loading the active catalog first if
/// needed.
pub fn translate(text: &str, bindings: &Bindings) -> Result<String> {
    if read(global()).needs_loading() {
        write(global()).ensure_loaded()?;
    }
    read(global()).t(text, bindings)
}

pub fn read(lock: &RwLock<I18n>) -> RwLockReadGuard<'_, I18n> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write(lock: &RwLock<I18n>) -> RwLockWriteGuard<'_, I18n> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
