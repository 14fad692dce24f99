/**
 * JSX Localizer CLI - jsx-localize-export
 *
 * Extract the default-locale catalog from a project
 */
use clap::{Arg, Command};
use jsx_localizer_cli::{export_catalog, init_logging, load_config};
use std::path::PathBuf;
use std::process;
use tracing::error;

fn main() {
    let matches = Command::new("jsx-localize-export")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract translatable strings into a JSON catalog")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to the configuration file (default: .i18nrc)"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("DIR")
                .help("Output directory for the catalog (overrides exportPath)"),
        )
        .get_matches();

    init_logging();

    let mut config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path));
    if let Some(out) = matches.get_one::<String>("out") {
        config.export_path = out.clone();
    }

    match export_catalog(&config) {
        Ok(summary) => println!(
            "{} entries from {} files written to {}",
            summary.entries,
            summary.files,
            summary.output.display()
        ),
        Err(err) => {
            error!("{:#}", err);
            process::exit(1);
        }
    }
}
