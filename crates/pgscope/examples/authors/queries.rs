//! Statement-per-method layer, in the shape a SQL code generator emits.

use pgscope::{Executor, FromRow, OrmResult, QueryScope, RowExt};
use serde::Serialize;
use tokio_postgres::Row;

#[derive(Debug, Serialize)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl FromRow for Author {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
        })
    }
}

const GET_ALL_AUTHOR: &str = "SELECT id, first_name, last_name, email FROM authors";

const COUNT_AUTHORS: &str = "SELECT count(*) AS total FROM authors";

pub struct Queries<E> {
    db: E,
}

impl<E: Executor> Queries<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }

    pub async fn get_all_author(&self, scope: &QueryScope) -> OrmResult<Vec<Author>> {
        let rows = self.db.query(scope, GET_ALL_AUTHOR, &[]).await?;
        Author::from_rows(&rows)
    }

    pub async fn count_authors(&self, scope: &QueryScope) -> OrmResult<i64> {
        let row = self.db.query_one(scope, COUNT_AUTHORS, &[]).await?;
        row.try_get_column("total")
    }
}
