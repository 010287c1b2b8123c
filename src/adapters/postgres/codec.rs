//! Shared row conversions and error mapping for the PostgreSQL adapters.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{DomainError, ErrorCode, PressNumber};
use crate::domain::history::{Audited, ModHistory};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// True if `err` is a unique violation on `constraint`.
pub(super) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    is_violation(err, UNIQUE_VIOLATION, constraint)
}

/// True if `err` is a foreign key violation on `constraint`.
pub(super) fn is_foreign_key_violation(err: &sqlx::Error, constraint: &str) -> bool {
    is_violation(err, FOREIGN_KEY_VIOLATION, constraint)
}

fn is_violation(err: &sqlx::Error, code: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(code) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to serialize row: {}", e))
    })
}

pub(super) fn from_json<T: DeserializeOwned>(
    column: &str,
    value: serde_json::Value,
) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} column: {}", column, e),
        )
    })
}

pub(super) fn press_from_db(press: Option<i16>) -> Result<Option<PressNumber>, DomainError> {
    press
        .map(|p| {
            PressNumber::new(p).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid press value: {}", e))
            })
        })
        .transpose()
}

/// Rebuilds an audited entity from its `id`, `data` and `mods` columns.
pub(super) fn row_to_audited<I, D>(row: PgRow) -> Result<Audited<I, D>, DomainError>
where
    I: From<i64>,
    D: DeserializeOwned,
{
    let id: i64 = row.get("id");
    let data: serde_json::Value = row.get("data");
    let mods: serde_json::Value = row.get("mods");

    let data: D = from_json("data", data)?;
    let mods: ModHistory<D> = from_json("mods", mods)?;
    Ok(Audited::reconstitute(I::from(id), data, mods))
}
