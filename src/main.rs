mod app;
mod cache;
mod error;
mod graph;
mod state;
mod ui;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cache::Session;
use crate::error::{BindscopeError, Result};
use crate::graph::{DependencyOptions, EdgeIndex, EntityInfoLookup, MatchRule, Snapshot, resolve};

/// Inspect binding connections between the entities of an editor snapshot.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Snapshot file (defaults to the one opened last)
    #[arg(long, global = true, env = "BINDSCOPE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Match paths on entity boundaries instead of substring containment
    #[arg(long, global = true)]
    strict_match: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the snapshot interactively (default)
    Tui,

    /// Print the connections of one entity as JSON
    ///
    /// Writes the resolved dependency sets, the dropdown options built from
    /// them, and display info for every connected entity to stdout.
    Connections {
        /// Entity name, e.g. Api1
        entity: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let rule = if cli.strict_match {
        MatchRule::EntityBoundary
    } else {
        MatchRule::Substring
    };

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            init_tracing(&cli.verbose, true)?;
            run_tui(cli.snapshot, rule)
        }
        Commands::Connections { entity } => {
            init_tracing(&cli.verbose, false)?;
            let snapshot_path = resolve_snapshot_path(cli.snapshot, &load_session())?;
            print_connections(&snapshot_path, &entity, rule)
        }
    }
}

/// Initialize structured logging.
///
/// While the TUI owns the terminal, events go to the log file in the cache
/// directory. Otherwise they go to stderr so stdout stays clean for JSON.
fn init_tracing(verbose: &Verbosity<WarnLevel>, to_file: bool) -> Result<()> {
    let level = verbose.tracing_level_filter();
    let filter = EnvFilter::new(format!("warn,bindscope={level}"));

    let log_file = match cache::log_path() {
        Some(path) if to_file => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Some(File::create(path)?)
        }
        _ => None,
    };

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        // No cache dir: stay quiet rather than draw over the TUI.
        None if to_file => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(std::io::sink)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn load_session() -> Session {
    let Some(path) = cache::state_path() else {
        return Session::default();
    };
    match Session::load(&path) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable session");
            Session::default()
        }
    }
}

fn resolve_snapshot_path(cli_path: Option<PathBuf>, session: &Session) -> Result<PathBuf> {
    cli_path
        .or_else(|| session.last_snapshot.clone())
        .ok_or(BindscopeError::NoSnapshot)
}

fn run_tui(cli_path: Option<PathBuf>, rule: MatchRule) -> Result<()> {
    let session = load_session();
    let snapshot_path = resolve_snapshot_path(cli_path, &session)?;

    let mut app = App::new(snapshot_path.clone(), rule);

    // Restore the last entity only when reopening the same snapshot.
    if session.last_snapshot.as_deref() == Some(snapshot_path.as_path()) {
        if let Some(entity) = session.last_entity.as_deref() {
            let known = app
                .snapshot
                .data()
                .is_some_and(|snapshot| snapshot.contains_entity(entity));
            if known {
                debug!(entity, "restoring last entity");
                app.select_entity(entity);
            }
        }
    }

    let mut terminal = ratatui::try_init()?;
    let result = app.run(&mut terminal);
    ratatui::restore();
    result?;

    let session = Session {
        last_snapshot: Some(snapshot_path),
        last_entity: app.selected_entity().map(str::to_string),
    };
    if let Some(path) = cache::state_path() {
        if let Err(e) = session.save(&path) {
            warn!(error = %e, "failed to save session");
        }
    }
    Ok(())
}

fn print_connections(snapshot_path: &Path, entity: &str, rule: MatchRule) -> Result<()> {
    let snapshot = Snapshot::load(snapshot_path)?;
    if !snapshot.contains_entity(entity) {
        warn!(entity, "entity is not in the data tree");
    }

    let output = connections_report(&snapshot, entity, rule);

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    serde_json::to_writer_pretty(&mut writer, &output)?;
    writeln!(writer)?;
    Ok(())
}

/// JSON body of the `connections` command.
fn connections_report(snapshot: &Snapshot, entity: &str, rule: MatchRule) -> serde_json::Value {
    let deps = &snapshot.inverse_dependency_map;
    let sets = match rule {
        MatchRule::Substring => resolve(deps, Some(entity)),
        MatchRule::EntityBoundary => EdgeIndex::build(deps).resolve(Some(entity), rule),
    };
    let options = DependencyOptions::from_sets(sets.as_ref());

    let lookup = EntityInfoLookup::new(snapshot);
    let info: serde_json::Map<String, serde_json::Value> = options
        .dependency_options
        .iter()
        .chain(options.inverse_dependency_options.iter())
        .filter_map(|option| {
            let info = lookup.lookup(&option.value)?;
            serde_json::to_value(info)
                .ok()
                .map(|value| (option.value.clone(), value))
        })
        .collect();

    serde_json::json!({
        "entity": entity,
        "dependencies": sets,
        "options": options,
        "info": info,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot() -> Snapshot {
        serde_json::from_str(
            r#"{
                "dataTree": {
                    "Input1": { "ENTITY_TYPE": "WIDGET", "type": "INPUT_WIDGET" },
                    "Text1": { "ENTITY_TYPE": "WIDGET", "type": "TEXT_WIDGET" },
                    "Text10": { "ENTITY_TYPE": "WIDGET", "type": "TEXT_WIDGET" },
                    "Api1": { "ENTITY_TYPE": "ACTION", "actionId": "a1" }
                },
                "inverseDependencyMap": {
                    "Api1.config.url": ["Input1.text"],
                    "Text10.value": ["Text1.text"],
                    "Input1.text": []
                },
                "actions": [{ "id": "a1", "name": "Api1", "pluginId": "p1" }],
                "plugins": [{ "id": "p1", "name": "REST API", "packageName": "restapi-plugin" }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_connections_report_default_rule() {
        let report = connections_report(&snapshot(), "Input1", MatchRule::Substring);

        assert_eq!(report["entity"], "Input1");
        assert_eq!(
            report["dependencies"],
            json!({ "directDependencies": [], "inverseDependencies": ["Api1"] })
        );
        assert_eq!(
            report["options"]["inverseDependencyOptions"],
            json!([{ "label": "Api1", "value": "Api1" }])
        );
        assert_eq!(report["info"]["Api1"]["icon"], "🌐");
        assert_eq!(report["info"]["Api1"]["datasourceName"], "");
    }

    #[test]
    fn test_connections_report_strict_rule() {
        let loose = connections_report(&snapshot(), "Text1", MatchRule::Substring);
        assert_eq!(
            loose["dependencies"],
            json!({ "directDependencies": [], "inverseDependencies": [] })
        );

        let strict = connections_report(&snapshot(), "Text1", MatchRule::EntityBoundary);
        assert_eq!(
            strict["dependencies"]["inverseDependencies"],
            json!(["Text10"])
        );
    }

    #[test]
    fn test_connections_report_without_entity() {
        let report = connections_report(&snapshot(), "", MatchRule::Substring);
        assert_eq!(report["dependencies"], serde_json::Value::Null);
        assert_eq!(
            report["options"],
            json!({ "dependencyOptions": [], "inverseDependencyOptions": [] })
        );
    }
}
