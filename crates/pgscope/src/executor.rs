//! Scope-aware execution interface.
//!
//! Generated statement code is written against [`Executor`] and threads the
//! caller's [`QueryScope`] into every call. Whether the scope has any effect
//! depends on the executor it was constructed with:
//!
//! - any [`GenericClient`] is an `Executor` that ignores the scope;
//! - [`ScopedClient`](crate::ScopedClient) applies the scope's builder before
//!   delegating.

use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::scope::QueryScope;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

/// Statement execution with a request scope.
pub trait Executor: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, or `NotFound`.
    fn query_one(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Row>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send;

    /// Prepare a statement. Never modified by the scope.
    fn prepare(
        &self,
        scope: &QueryScope,
        sql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Statement>> + Send;
}

impl<C: GenericClient> Executor for C {
    fn execute(
        &self,
        _scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        GenericClient::execute(self, sql, params)
    }

    fn query(
        &self,
        _scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        GenericClient::query(self, sql, params)
    }

    fn query_one(
        &self,
        _scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Row>> + Send {
        GenericClient::query_one(self, sql, params)
    }

    fn query_opt(
        &self,
        _scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send {
        GenericClient::query_opt(self, sql, params)
    }

    fn prepare(
        &self,
        _scope: &QueryScope,
        sql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Statement>> + Send {
        GenericClient::prepare_statement(self, sql)
    }
}
