//! Inspection entry point.
//!
//! # Responsibility
//! - Open a permission database, provisioning default tables if absent.
//! - Print row counts, or one kind's alive rows as JSON.
//!
//! Usage: `permstore_cli <db-path> [permissions|entity-permissions]`.
//! Set `PERMSTORE_LOG_DIR` to an absolute directory to enable file logging.

use log::info;
use permstore_core::{
    EntityPermissionQuery, EntityPermissionRepository, PermissionQuery, PermissionRepository,
    PermissionStore, StoreOptions,
};
use std::process::ExitCode;

const USAGE: &str = "usage: permstore_cli <db-path> [permissions|entity-permissions]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let (db_path, kind) = match args {
        [db_path] => (db_path, None),
        [db_path, kind] => (db_path, Some(kind.as_str())),
        _ => return Err(USAGE.to_string()),
    };

    if let Ok(log_dir) = std::env::var("PERMSTORE_LOG_DIR") {
        permstore_core::init_logging(permstore_core::default_log_level(), &log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} kind={}",
        permstore_core::core_version(),
        kind.unwrap_or("summary")
    );

    let conn = permstore_core::open_db(db_path).map_err(|err| err.to_string())?;
    let options = StoreOptions {
        automigrate_enabled: true,
        ..StoreOptions::default()
    };
    let store = PermissionStore::try_new(options, &conn).map_err(|err| err.to_string())?;

    let output = match kind {
        None => {
            let permissions = store
                .permissions(&conn)
                .count_permissions(&PermissionQuery::new())
                .map_err(|err| err.to_string())?;
            let links = store
                .entity_permissions(&conn)
                .count_entity_permissions(&EntityPermissionQuery::new())
                .map_err(|err| err.to_string())?;
            format!("permissions={permissions}\nentity_permissions={links}")
        }
        Some("permissions") => {
            let rows = store
                .permissions(&conn)
                .list_permissions(&PermissionQuery::new())
                .map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&rows).map_err(|err| err.to_string())?
        }
        Some("entity-permissions") => {
            let rows = store
                .entity_permissions(&conn)
                .list_entity_permissions(&EntityPermissionQuery::new())
                .map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&rows).map_err(|err| err.to_string())?
        }
        Some(other) => return Err(format!("unknown kind `{other}`\n{USAGE}")),
    };

    println!("{output}");
    Ok(())
}
