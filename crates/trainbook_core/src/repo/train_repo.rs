//! Train repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the persistence boundary the train service depends on.
//! - Keep SQL details inside the core persistence layer.
//!
//! # Invariants
//! - Write paths call `Train::validate()` before SQL mutations.
//! - Read paths reject undecodable rows instead of masking them.
//! - `delete_by_id` is silent when the id does not exist.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::train::{Train, TrainId, TrainValidationError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const TRAINS_TABLE: &str = "trains";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "source",
    "destination",
    "base_price",
    "discount_percentage",
    "total_seats",
];

const TRAIN_SELECT_SQL: &str = "SELECT
    id,
    name,
    source,
    destination,
    base_price,
    discount_percentage,
    total_seats
FROM trains";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised by train repository implementations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TrainValidationError),
    Db(DbError),
    /// A stored row could not be decoded into a `Train`.
    InvalidData(String),
    /// The backing store could not be reached (e.g. a poisoned lock).
    Unavailable(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted train data: {message}"),
            Self::Unavailable(message) => write!(f, "train store unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TrainValidationError> for RepoError {
    fn from(value: TrainValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence boundary for train records.
///
/// Implementations own no business logic. Any conforming implementation is
/// substitutable behind `TrainService`.
#[cfg_attr(test, mockall::automock)]
pub trait TrainRepository {
    /// Returns every stored train. No filtering, no pagination.
    fn find_all(&self) -> RepoResult<Vec<Train>>;

    /// Returns the train with `id`, or `None` when absent.
    fn find_by_id(&self, id: TrainId) -> RepoResult<Option<Train>>;

    /// Inserts when `train.id` is `None`, otherwise inserts or overwrites the
    /// record at that id. Returns the persisted record with `id` populated.
    fn save(&self, train: &Train) -> RepoResult<Train>;

    /// Removes the record with `id`. Absent ids are not an error.
    fn delete_by_id(&self, id: TrainId) -> RepoResult<()>;
}

/// SQLite-backed train repository.
pub struct SqliteTrainRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrainRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   altered outside the migration path.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl TrainRepository for SqliteTrainRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Train>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRAIN_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut trains = Vec::new();

        while let Some(row) = rows.next()? {
            trains.push(parse_train_row(row)?);
        }

        Ok(trains)
    }

    fn find_by_id(&self, id: TrainId) -> RepoResult<Option<Train>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRAIN_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        match rows.next()? {
            Some(row) => Ok(Some(parse_train_row(row)?)),
            None => Ok(None),
        }
    }

    fn save(&self, train: &Train) -> RepoResult<Train> {
        train.validate()?;

        let id = match train.id {
            None => {
                self.conn.execute(
                    "INSERT INTO trains (
                        name,
                        source,
                        destination,
                        base_price,
                        discount_percentage,
                        total_seats
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    params![
                        train.name.as_str(),
                        train.source.as_str(),
                        train.destination.as_str(),
                        train.base_price,
                        train.discount_percentage,
                        train.total_seats,
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO trains (
                        id,
                        name,
                        source,
                        destination,
                        base_price,
                        discount_percentage,
                        total_seats
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        source = excluded.source,
                        destination = excluded.destination,
                        base_price = excluded.base_price,
                        discount_percentage = excluded.discount_percentage,
                        total_seats = excluded.total_seats,
                        updated_at = (strftime('%s', 'now') * 1000);",
                    params![
                        id,
                        train.name.as_str(),
                        train.source.as_str(),
                        train.destination.as_str(),
                        train.base_price,
                        train.discount_percentage,
                        train.total_seats,
                    ],
                )?;
                id
            }
        };

        debug!(
            "event=train_save module=repo status=ok id={id} assigned={}",
            train.id.is_none()
        );
        Ok(Train {
            id: Some(id),
            ..train.clone()
        })
    }

    fn delete_by_id(&self, id: TrainId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trains WHERE id = ?1;", [id])?;
        debug!("event=train_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [TRAINS_TABLE],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(TRAINS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TRAINS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    match REQUIRED_COLUMNS
        .iter()
        .find(|column| !columns.contains(**column))
    {
        Some(column) => Err(RepoError::MissingRequiredColumn {
            table: TRAINS_TABLE,
            column: *column,
        }),
        None => Ok(()),
    }
}

fn parse_train_row(row: &Row<'_>) -> RepoResult<Train> {
    let id: TrainId = row.get("id")?;

    let seats: i64 = row.get("total_seats")?;
    let total_seats = u32::try_from(seats).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid total_seats value `{seats}` in trains.total_seats for id {id}"
        ))
    })?;

    Ok(Train {
        id: Some(id),
        name: row.get("name")?,
        source: row.get("source")?,
        destination: row.get("destination")?,
        base_price: row.get("base_price")?,
        discount_percentage: row.get("discount_percentage")?,
        total_seats,
    })
}
