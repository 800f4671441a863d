//! `pz-block` admin command line.
//!
//! Opens the block store, runs one operation and prints the result envelope
//! as JSON on stdout. Exit status is 0 when the envelope reports success,
//! 1 when the operation failed and 2 when setup failed.

use clap::{Parser, Subcommand};
use log::error;
use pz_block_core::db::open_db;
use pz_block_core::{
    init_logging, init_stderr_logging, ApiEnvelope, AppConfig, BlockChanges, BlockId,
    BlockService, LoggingError, NewBlock, SqliteBlockRepository,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pz-block", about = "Manage admin-panel content blocks", version)]
struct Cli {
    /// SQLite database file; overrides `PZ_BLOCK_DB_PATH`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log level; overrides `PZ_BLOCK_LOG_LEVEL`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory; overrides `PZ_BLOCK_LOG_DIR`.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one block.
    Get { id: BlockId },
    /// Insert a block and print its id.
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Rewrite title and/or content of a block.
    Update {
        id: BlockId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Search titles and print one page of results.
    Page {
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        page_size: i64,
    },
    /// Delete blocks by id.
    Delete { ids: Vec<BlockId> },
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Err(err) = init_cli_logging(&config) {
        eprintln!("pz-block: {err}");
        return ExitCode::from(2);
    }

    if let Command::Version = cli.command {
        println!("{}", pz_block_core::core_version());
        return ExitCode::SUCCESS;
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=cli_open module=cli status=error db_path={} error={err}",
                config.db_path.display()
            );
            return ExitCode::from(2);
        }
    };
    let repo = match SqliteBlockRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=cli_open module=cli status=error error_code=schema_mismatch error={err}");
            return ExitCode::from(2);
        }
    };
    let service = BlockService::new(repo);

    match cli.command {
        Command::Get { id } => emit(&ApiEnvelope::from(service.get(id))),
        Command::Create { title, content } => {
            emit(&ApiEnvelope::from(service.create(&NewBlock::new(title, content))))
        }
        Command::Update { id, title, content } => {
            let changes = BlockChanges { id, title, content };
            emit(&ApiEnvelope::from_affected(service.update(&changes)))
        }
        Command::Page {
            keyword,
            page,
            page_size,
        } => emit(&ApiEnvelope::from_page(
            service.page(keyword, page, page_size),
        )),
        Command::Delete { ids } => emit(&ApiEnvelope::from_affected(service.delete(&ids))),
        Command::Version => ExitCode::SUCCESS,
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    config
}

/// Logs to files under `log_dir` when configured, otherwise to stderr.
fn init_cli_logging(config: &AppConfig) -> Result<(), LoggingError> {
    match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(&config.log_level, log_dir),
        None => init_stderr_logging(&config.log_level),
    }
}

fn emit<T: Serialize>(envelope: &ApiEnvelope<T>) -> ExitCode {
    match serde_json::to_string(envelope) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("pz-block: cannot encode result: {err}");
            return ExitCode::from(2);
        }
    }
    if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::{init_cli_logging, resolve_config, Cli, Command};
    use clap::{CommandFactory, Parser};
    use pz_block_core::LoggingError;
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn db_flag_overrides_environment_default() {
        let cli = Cli::parse_from(["pz-block", "--db", "/tmp/blocks.db", "get", "1"]);
        assert_eq!(resolve_config(&cli).db_path, PathBuf::from("/tmp/blocks.db"));
        assert!(matches!(cli.command, Command::Get { id: 1 }));
    }

    #[test]
    fn bad_log_level_is_reported_without_log_dir() {
        let cli = Cli::parse_from(["pz-block", "--log-level", "chatty", "version"]);
        let mut config = resolve_config(&cli);
        config.log_dir = None;

        let err = init_cli_logging(&config).unwrap_err();
        assert!(matches!(err, LoggingError::UnsupportedLevel(ref level) if level == "chatty"));
    }

    #[test]
    fn page_accepts_negative_numbers_for_service_validation() {
        let cli = Cli::parse_from(["pz-block", "page", "--page", "-1"]);
        match cli.command {
            Command::Page {
                keyword,
                page,
                page_size,
            } => {
                assert_eq!(keyword, "");
                assert_eq!(page, -1);
                assert_eq!(page_size, 10);
            }
            _ => panic!("expected page command"),
        }
    }

    #[test]
    fn delete_collects_all_ids() {
        let cli = Cli::parse_from(["pz-block", "delete", "3", "5", "8"]);
        assert!(matches!(cli.command, Command::Delete { ref ids } if ids == &vec![3, 5, 8]));
    }
}
