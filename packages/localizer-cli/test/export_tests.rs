//! Export Tests
//!
//! Catalog export over a scratch project directory.

use jsx_localizer_cli::export::collect_source_files;
use jsx_localizer_cli::localizer::{generate_key, LocalizeConfig, Translations};
use jsx_localizer_cli::export_catalog;
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> (tempfile::TempDir, LocalizeConfig) {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "src/App.jsx",
        "export const App = () => <div>Hello <b>world</b></div>;\n",
    );
    write(
        dir.path(),
        "src/components/Field.js",
        "export const Field = () => <input placeholder=\"Your name\" />;\n",
    );
    write(dir.path(), "src/legacy.ts", "const x: number = 1;\n");
    write(dir.path(), "lib/Other.js", "const o = <p>Elsewhere</p>;\n");

    let config = LocalizeConfig {
        base_path: dir.path().to_string_lossy().to_string(),
        export_path: dir.path().join("public/locale").to_string_lossy().to_string(),
        ..LocalizeConfig::default()
    };
    (dir, config)
}

#[test]
fn test_source_files_follow_folders_and_extensions() {
    let (dir, config) = project();
    let files = collect_source_files(&config).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| path.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["src/App.jsx", "src/components/Field.js"]);
}

#[test]
fn test_export_writes_default_locale_catalog() {
    let (dir, config) = project();
    let summary = export_catalog(&config).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.output, dir.path().join("public/locale/en.json"));

    let catalog = Translations::from_json(&fs::read_to_string(&summary.output).unwrap()).unwrap();
    assert_eq!(
        catalog.get(&generate_key("Hello *world*", 16)).unwrap().text,
        "Hello *world*"
    );
    assert_eq!(
        catalog.get(&generate_key("Your name", 16)).unwrap().text,
        "Your name"
    );

    // sources are not rewritten by an export
    assert!(!fs::read_to_string(dir.path().join("src/App.jsx"))
        .unwrap()
        .contains("Localize"));
}

#[test]
fn test_broken_files_are_skipped() {
    let (dir, config) = project();
    write(dir.path(), "src/Broken.jsx", "export const = <div>\n");

    let summary = export_catalog(&config).unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.entries, 2);
}

#[test]
fn test_default_locale_names_the_file() {
    let (dir, mut config) = project();
    config.default_locale = "fr".to_string();
    let summary = export_catalog(&config).unwrap();
    assert_eq!(summary.output, dir.path().join("public/locale/fr.json"));
    assert!(summary.output.is_file());
}
