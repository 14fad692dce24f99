#![deny(clippy::all)]

/**
 * JSX Localizer
 *
 * Rewrites literal text in JSX markup into localizable form, extracts catalog
 * entries back out of it, and substitutes translations at render time.
 */

// Markup model
pub mod markup;
pub mod printer;

// Token grammar and keys
pub mod digest;
pub mod tokens;

// Passes
pub mod aggregate;
pub mod classify;
pub mod extract;
pub mod inject;

// Runtime
pub mod catalog;
pub mod i18n;
pub mod render;

pub mod config;
mod error;

// Re-exports
pub use catalog::{CatalogLoader, DirectoryLoader, TranslationEntry, Translations};
pub use config::LocalizeConfig;
pub use digest::generate_key;
pub use error::{LocalizeError, Result};
pub use extract::extract;
pub use i18n::{Bindings, I18n};
pub use inject::{inject, InjectReport};
pub use markup::HostCode;
pub use printer::print_host_code;
pub use render::{render, ElementTemplate, Rendered, Segment};
pub use tokens::{TokenCodec, TokenKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
