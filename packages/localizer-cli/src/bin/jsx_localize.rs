/**
 * JSX Localizer CLI - jsx-localize
 *
 * Inject localization into JS/JSX modules
 */
use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use jsx_localizer_cli::{init_logging, inject_localization, load_config};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};

fn main() {
    let matches = Command::new("jsx-localize")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrite literal JSX text into localizable form")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to the configuration file (default: .i18nrc)"),
        )
        .arg(
            Arg::new("write")
                .short('w')
                .long("write")
                .action(ArgAction::SetTrue)
                .help("Rewrite files in place instead of printing them"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(1..)
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Modules to transform"),
        )
        .get_matches();

    init_logging();

    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path));
    let write = matches.get_flag("write");

    let mut failed = false;
    for path in matches.get_many::<PathBuf>("files").into_iter().flatten() {
        if let Err(err) = localize_file(path, &config, write) {
            error!("{:#}", err);
            failed = true;
        }
    }

    if failed {
        process::exit(1);
    }
}

fn localize_file(
    path: &Path,
    config: &jsx_localizer_cli::localizer::LocalizeConfig,
    write: bool,
) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let injected = inject_localization(&source, &path.to_string_lossy(), config)?;

    if write {
        if injected.code != source {
            fs::write(path, &injected.code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("localized {}", path.display());
        }
    } else {
        print!("{}", injected.code);
    }
    Ok(())
}
