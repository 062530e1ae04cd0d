//! Executor decorator that applies a request's [`Builder`] to every statement.
//!
//! `ScopedClient` wraps any [`GenericClient`] and implements [`Executor`].
//! For `execute`, `query`, `query_one` and `query_opt` it looks up the
//! builder in the caller's [`QueryScope`]; when one is present the statement
//! and parameters are rebuilt before delegation, otherwise the call is
//! forwarded untouched. `prepare` is always forwarded untouched.
//!
//! # Example
//!
//! ```ignore
//! use pgscope::{QueryScope, ScopedClient, ScopedClientConfig};
//!
//! let pool = pgscope::create_pool(&database_url)?;
//! let client = pool.get().await?;
//!
//! // Generated statement code built over the decorated client.
//! let queries = Queries::new(ScopedClient::new(client));
//!
//! let scope = QueryScope::new().build(|b| {
//!     b.filter("LOWER(first_name) LIKE LOWER(?)", ("%an%",))
//!         .order("last_name")
//!         .pagination(1, 20);
//! });
//! let authors = queries.get_all_authors(&scope).await?;
//! ```

mod config;

#[cfg(test)]
mod tests;

pub use config::ScopedClientConfig;

use crate::builder::{Builder, BuiltSql};
use crate::client::GenericClient;
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::scope::QueryScope;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

/// A [`GenericClient`] decorated with scope-driven statement rewriting.
pub struct ScopedClient<C> {
    client: C,
    config: ScopedClientConfig,
}

impl<C: GenericClient> ScopedClient<C> {
    /// Wrap `client` with the default configuration (`$n` placeholders).
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: ScopedClientConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ScopedClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ScopedClientConfig {
        &self.config
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn rewrite<'a>(
        &self,
        op: &'static str,
        scope: &'a QueryScope,
        sql: &str,
        params: &[&'a (dyn ToSql + Sync)],
    ) -> Option<BuiltSql<'a>> {
        let Some(builder) = scope.builder() else {
            self.log_passthrough(op, sql);
            return None;
        };

        let built = builder.build_with(self.config.placeholder, sql, params);
        self.log_rewrite(op, builder, &built);
        Some(built)
    }

    #[cfg(feature = "tracing")]
    fn log_rewrite(&self, op: &'static str, builder: &Builder, built: &BuiltSql<'_>) {
        if !self.config.log_rewrites {
            return;
        }
        tracing::debug!(
            target: "pgscope.sql",
            op,
            predicates = builder.predicates().len(),
            param_count = built.params.len(),
            sql = %built.sql,
            "statement rewritten from scope"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_rewrite(&self, _op: &'static str, _builder: &Builder, _built: &BuiltSql<'_>) {}

    #[cfg(feature = "tracing")]
    fn log_passthrough(&self, op: &'static str, sql: &str) {
        if self.config.log_rewrites {
            tracing::trace!(target: "pgscope.sql", op, sql, "no builder in scope");
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log_passthrough(&self, _op: &'static str, _sql: &str) {}
}

impl<C: GenericClient> Executor for ScopedClient<C> {
    async fn execute(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<u64> {
        match self.rewrite("execute", scope, sql, params) {
            Some(built) => GenericClient::execute(&self.client, &built.sql, &built.params).await,
            None => GenericClient::execute(&self.client, sql, params).await,
        }
    }

    async fn query(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<Vec<Row>> {
        match self.rewrite("query", scope, sql, params) {
            Some(built) => GenericClient::query(&self.client, &built.sql, &built.params).await,
            None => GenericClient::query(&self.client, sql, params).await,
        }
    }

    async fn query_one(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<Row> {
        match self.rewrite("query_one", scope, sql, params) {
            Some(built) => GenericClient::query_one(&self.client, &built.sql, &built.params).await,
            None => GenericClient::query_one(&self.client, sql, params).await,
        }
    }

    async fn query_opt(
        &self,
        scope: &QueryScope,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<Option<Row>> {
        match self.rewrite("query_opt", scope, sql, params) {
            Some(built) => GenericClient::query_opt(&self.client, &built.sql, &built.params).await,
            None => GenericClient::query_opt(&self.client, sql, params).await,
        }
    }

    async fn prepare(&self, _scope: &QueryScope, sql: &str) -> OrmResult<Statement> {
        GenericClient::prepare_statement(&self.client, sql).await
    }
}
