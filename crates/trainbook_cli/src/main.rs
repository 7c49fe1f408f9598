//! Command-line front end for the train catalogue.
//!
//! Usage:
//!   trainbook list [--search TERM]
//!   trainbook get <ID>
//!   trainbook create --name N --source S --destination D --base-price P --seats N [--discount P]
//!   trainbook update <ID> --name N --source S --destination D --base-price P --seats N [--discount P]
//!   trainbook delete <ID>
//!   trainbook version

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use trainbook_core::db::open_db;
use trainbook_core::{
    core_version, default_log_level, init_logging, SqliteTrainRepository, Train, TrainId,
    TrainService,
};

const DEFAULT_DB_FILE: &str = "trainbook.sqlite3";

#[derive(Parser)]
#[command(name = "trainbook")]
#[command(about = "Manage trains in the booking catalogue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file
    #[arg(long, env = "TRAINBOOK_DB", default_value = DEFAULT_DB_FILE, global = true)]
    db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TRAINBOOK_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "TRAINBOOK_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Print trains as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List every train, optionally filtered by a search term
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one train
    Get { id: TrainId },
    /// Add a train
    Create(TrainFields),
    /// Overwrite every field of an existing train
    Update {
        id: TrainId,
        #[command(flatten)]
        fields: TrainFields,
    },
    /// Remove a train
    Delete { id: TrainId },
    /// Print the core version
    Version,
}

#[derive(Args)]
struct TrainFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    source: String,
    #[arg(long)]
    destination: String,
    #[arg(long)]
    base_price: f64,
    /// Percentage in 0..=100
    #[arg(long, default_value_t = 0.0)]
    discount: f64,
    #[arg(long)]
    seats: u32,
}

impl From<TrainFields> for Train {
    fn from(fields: TrainFields) -> Self {
        Train::new(
            fields.name,
            fields.source,
            fields.destination,
            fields.base_price,
            fields.discount,
            fields.seats,
        )
    }
}

fn main() -> anyhow::Result<ExitCode> {
    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::path::absolute(log_dir)
            .with_context(|| format!("invalid log directory `{}`", log_dir.display()))?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir).context("failed to initialize logging")?;
    }

    if let Command::Version = cli.command {
        println!("trainbook_core version={}", core_version());
        return Ok(ExitCode::SUCCESS);
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = TrainService::new(SqliteTrainRepository::try_new(&conn)?);
    info!("event=cli_command module=cli status=start db={}", cli.db.display());

    match cli.command {
        Command::List { search } => {
            let trains = match search {
                Some(term) => service.search_trains(&term)?,
                None => service.get_all_trains()?,
            };
            print_trains(&trains, cli.json)?;
        }
        Command::Get { id } => match service.get_train_by_id(id)? {
            Some(train) => print_trains(std::slice::from_ref(&train), cli.json)?,
            None => {
                eprintln!("train not found: {id}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Create(fields) => {
            let created = service.create_train(&fields.into())?;
            print_trains(std::slice::from_ref(&created), cli.json)?;
        }
        Command::Update { id, fields } => {
            let updated = service.update_train(id, &fields.into())?;
            print_trains(std::slice::from_ref(&updated), cli.json)?;
        }
        Command::Delete { id } => {
            service.delete_train(id)?;
            if !cli.json {
                println!("deleted train {id}");
            }
        }
        Command::Version => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn print_trains(trains: &[Train], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(trains)?);
        return Ok(());
    }

    for train in trains {
        println!("{}", format_train(train));
    }
    Ok(())
}

fn format_train(train: &Train) -> String {
    let id = train
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "#{id} {}: {} -> {} price={:.2} discount={}% seats={}",
        train.name,
        train.source,
        train.destination,
        train.base_price,
        train.discount_percentage,
        train.total_seats
    )
}

#[cfg(test)]
mod tests {
    use super::{format_train, run, Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::Path;
    use std::process::ExitCode;
    use trainbook_core::{Train, TrainServiceError};

    fn parse_with_db(db: &Path, args: &[&str]) -> Cli {
        let db = db.to_str().unwrap();
        Cli::try_parse_from(["trainbook", "--db", db].iter().chain(args).copied()).unwrap()
    }

    const UPDATED_FIELDS: &[&str] = &[
        "--name",
        "Updated Train",
        "--source",
        "City C",
        "--destination",
        "City D",
        "--base-price",
        "150",
        "--seats",
        "250",
    ];

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_parses_id_and_fields() {
        let cli = Cli::try_parse_from([
            "trainbook",
            "update",
            "3",
            "--name",
            "Updated Train",
            "--source",
            "City C",
            "--destination",
            "City D",
            "--base-price",
            "150",
            "--discount",
            "15",
            "--seats",
            "250",
        ])
        .unwrap();

        match cli.command {
            Command::Update { id, fields } => {
                let train: Train = fields.into();
                assert_eq!(id, 3);
                assert_eq!(train.id, None);
                assert_eq!(train.destination, "City D");
                assert_eq!(train.total_seats, 250);
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn create_rejects_negative_seats() {
        let result = Cli::try_parse_from([
            "trainbook",
            "create",
            "--name",
            "X",
            "--source",
            "A",
            "--destination",
            "B",
            "--base-price",
            "1",
            "--seats",
            "-1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn format_train_renders_route_and_pricing() {
        let train = Train::new("Express Train", "City A", "City B", 100.0, 10.0, 200).with_id(1);
        assert_eq!(
            format_train(&train),
            "#1 Express Train: City A -> City B price=100.00 discount=10% seats=200"
        );
    }

    #[test]
    fn get_of_missing_id_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("trainbook.sqlite3");

        let code = run(parse_with_db(&db, &["get", "404"])).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn update_of_missing_id_fails_with_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("trainbook.sqlite3");

        let mut args = vec!["update", "404"];
        args.extend_from_slice(UPDATED_FIELDS);
        let err = run(parse_with_db(&db, &args)).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrainServiceError>(),
            Some(TrainServiceError::NotFound(404))
        ));
    }

    #[test]
    fn create_then_get_and_delete_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("trainbook.sqlite3");

        let mut args = vec!["create"];
        args.extend_from_slice(UPDATED_FIELDS);
        assert_eq!(run(parse_with_db(&db, &args)).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            run(parse_with_db(&db, &["get", "1"])).unwrap(),
            ExitCode::SUCCESS
        );
        assert_eq!(
            run(parse_with_db(&db, &["delete", "1"])).unwrap(),
            ExitCode::SUCCESS
        );
        assert_eq!(
            run(parse_with_db(&db, &["get", "1"])).unwrap(),
            ExitCode::FAILURE
        );
    }
}
