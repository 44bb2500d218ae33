//! # Stratify Catalog CLI
//!
//! Terminal front-end for the steel section catalog picker. With no
//! subcommand it runs the cascading menus; the subcommands expose each
//! menu stage for scripting.

mod cli;
mod interactive;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use catalog_core::{CatalogError, CatalogResult, CatalogSettings, Namespace, SelectorSession};

use crate::cli::{Cli, Command};

/// Settings file picked up from the working directory when `--settings` is absent
const DEFAULT_SETTINGS_FILE: &str = "catalog.toml";

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (tests) is harmless, so the error is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_settings(cli: &Cli) -> CatalogResult<CatalogSettings> {
    let settings = match &cli.settings {
        Some(path) => CatalogSettings::load(path)?,
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
            CatalogSettings::load(Path::new(DEFAULT_SETTINGS_FILE))?
        }
        None => CatalogSettings::default(),
    };
    let settings = cli.apply_overrides(settings);
    settings.validate()?;
    debug!(?settings, "settings resolved");
    Ok(settings)
}

fn exit_code(err: &CatalogError) -> u8 {
    match err {
        CatalogError::InvalidInput { .. } | CatalogError::DirectoryNotFound { .. } => 2,
        CatalogError::NoSelection => 3,
        CatalogError::MissingColumn { .. }
        | CatalogError::FileError { .. }
        | CatalogError::CsvError { .. }
        | CatalogError::SerializationError { .. }
        | CatalogError::VersionMismatch { .. } => 1,
    }
}

/// Load a series and pick one of its members, failing loudly where the
/// menus would stay silent.
fn select(session: &mut SelectorSession, series: &str, member: &str) -> CatalogResult<()> {
    session.select_series(series);
    if session.table().is_empty() {
        let reason = session
            .diagnostics()
            .first()
            .cloned()
            .unwrap_or_else(|| "series has no members".to_string());
        return Err(CatalogError::invalid_input("series", series, reason));
    }

    session.select_member(member);
    if session.derived().is_none() {
        return Err(CatalogError::invalid_input(
            "member",
            member,
            format!("not found in series {}", series),
        ));
    }
    Ok(())
}

fn save_namespace(session: &SelectorSession, out: &Path) -> CatalogResult<()> {
    session.namespace().save(out)?;
    info!(path = %out.display(), bindings = session.namespace().len(), "namespace saved");
    Ok(())
}

fn open_namespace(session: &mut SelectorSession, out: Option<&PathBuf>) -> CatalogResult<()> {
    if let Some(out) = out {
        session.set_namespace(Namespace::load_or_new(out)?);
    }
    Ok(())
}

fn run(cli: Cli) -> CatalogResult<()> {
    let settings = load_settings(&cli)?;
    let mut session = SelectorSession::open(settings)?;

    match cli.command {
        Some(Command::Types) => {
            for category in session.category_options() {
                println!("{}", category);
            }
        }
        Some(Command::Series { category }) => {
            session.select_category(&category);
            for series in session.series_options() {
                println!("{}", series);
            }
        }
        Some(Command::Members { series }) => {
            session.select_series(&series);
            if let Some(message) = session.diagnostics().first() {
                return Err(CatalogError::invalid_input("series", series.as_str(), message.as_str()));
            }
            for member in session.member_options() {
                println!("{}", member);
            }
        }
        Some(Command::Show { series, member, json }) => {
            select(&mut session, &series, &member)?;
            if json {
                let props = session.derived().ok_or(CatalogError::NoSelection)?;
                let text = serde_json::to_string_pretty(props).map_err(|e| CatalogError::SerializationError {
                    reason: e.to_string(),
                })?;
                println!("{}", text);
            } else {
                output::print_member(&session);
            }
        }
        Some(Command::Publish {
            series,
            member,
            props,
            suffix,
            out,
        }) => {
            open_namespace(&mut session, out.as_ref())?;
            select(&mut session, &series, &member)?;

            if let Some(derived) = session.derived() {
                for warning in &derived.warnings {
                    eprintln!("warning: {}", warning);
                }
            }

            let report = session.publish(&suffix, &props)?;
            output::print_bindings(&report.bindings);
            for warning in &report.warnings {
                eprintln!("warning: {}", warning);
            }

            if let Some(out) = &out {
                save_namespace(&session, out)?;
            }
        }
        Some(Command::Interactive { out }) => {
            open_namespace(&mut session, out.as_ref())?;
            interactive::run(&mut session)?;
            if let Some(out) = &out {
                save_namespace(&session, out)?;
            }
        }
        None => interactive::run(&mut session)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&CatalogError::directory_not_found("/x")), 2);
        assert_eq!(exit_code(&CatalogError::NoSelection), 3);
        assert_eq!(exit_code(&CatalogError::csv_error("a.csv", "bad")), 1);
        assert_eq!(exit_code(&CatalogError::invalid_input("member", "X", "not found")), 2);
        let mismatch = CatalogError::VersionMismatch {
            file_version: "1.0.0".to_string(),
            expected_version: "0.1.0".to_string(),
        };
        assert_eq!(exit_code(&mismatch), 1);
    }
}
