//! Row mapping traits for generated statement code.

use crate::error::{OrmError, OrmResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// Generated statement methods map each returned row through this trait.
///
/// # Example
///
/// ```ignore
/// use pgscope::{FromRow, OrmResult, RowExt};
///
/// struct Author {
///     id: i64,
///     first_name: String,
///     email: Option<String>,
/// }
///
/// impl FromRow for Author {
///     fn from_row(row: &Row) -> OrmResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             first_name: row.try_get_column("first_name")?,
///             email: row.try_get_column("email")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;

    /// Map every row, stopping at the first decode error.
    fn from_rows(rows: &[Row]) -> OrmResult<Vec<Self>> {
        rows.iter().map(Self::from_row).collect()
    }
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning OrmError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }
}
