//! # pgscope
//!
//! Request-scoped filters, ordering, grouping and pagination for fixed SQL
//! statements, applied without touching the statements or their call sites.
//!
//! Generated statement code calls an [`Executor`] with a fixed base statement
//! and the caller's [`QueryScope`]. When the executor is a [`ScopedClient`],
//! the scope's [`Builder`] is appended to the statement before it reaches the
//! database:
//!
//! ```ignore
//! use pgscope::prelude::*;
//!
//! let queries = AuthorQueries::new(ScopedClient::new(pool.get().await?));
//!
//! let scope = QueryScope::new().build(|b| {
//!     b.filter(
//!         "LOWER(email) LIKE LOWER(?) OR LOWER(email) LIKE LOWER(?)",
//!         ("%example.com", "%example.org"),
//!     );
//!     if let Some(name) = name_filter {
//!         b.filter_bind("LOWER(first_name) LIKE LOWER(?)", name);
//!     }
//!     b.order("last_name").pagination(page, 20);
//! });
//!
//! let authors = queries.get_all_authors(&scope).await?;
//! ```
//!
//! - **Explicit scope**: the builder travels in a `QueryScope` value; nested
//!   composition derives a new scope and never mutates the old one
//! - **Fixed clause order**: `WHERE`/`AND`, `GROUP BY`, `ORDER BY`, `LIMIT`,
//!   `OFFSET`, whatever order the setters were called in
//! - **Aligned parameters**: base statement parameters first, then predicate
//!   arguments in insertion order, with `?` markers renumbered to `$n`
//! - **Transparent**: without a builder in scope, calls are forwarded byte for
//!   byte, and backend errors are never wrapped

pub mod builder;
pub mod client;
pub mod error;
pub mod executor;
pub mod placeholder;
pub mod prelude;
pub mod row;
pub mod scope;
pub mod scoped_client;

pub use builder::{Arg, Builder, BuiltSql, DEFAULT_PAGE_SIZE, IntoArgs, Predicate};
pub use client::GenericClient;
pub use error::{OrmError, OrmResult};
pub use executor::Executor;
pub use placeholder::PlaceholderStyle;
pub use row::{FromRow, RowExt};
pub use scope::QueryScope;
pub use scoped_client::{ScopedClient, ScopedClientConfig};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
