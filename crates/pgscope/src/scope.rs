//! Request-scoped carrier for a [`Builder`].
//!
//! A `QueryScope` is passed explicitly from the repository layer through the
//! generated statement methods down to the executor. It holds at most one
//! builder and is never mutated: every composition step returns a new scope.
//!
//! ```ignore
//! let scope = QueryScope::new().build(|b| {
//!     b.filter("LOWER(first_name) LIKE LOWER(?)", ("%an%",));
//! });
//! let authors = queries.get_all_authors(&scope).await?;
//! ```

use crate::builder::Builder;
use std::sync::Arc;

/// Immutable, cheaply clonable per-request scope.
#[derive(Debug, Clone, Default)]
pub struct QueryScope {
    builder: Option<Arc<Builder>>,
}

impl QueryScope {
    /// The empty root scope. Statements run through it are not modified.
    pub fn new() -> Self {
        Self::default()
    }

    /// The builder attached to this scope, if any.
    pub fn builder(&self) -> Option<&Builder> {
        self.builder.as_deref()
    }

    /// Derive a scope carrying `builder`, replacing any existing one.
    pub fn with_builder(&self, builder: Builder) -> Self {
        Self {
            builder: Some(Arc::new(builder)),
        }
    }

    /// Derive a scope with no builder.
    pub fn without_builder(&self) -> Self {
        Self { builder: None }
    }

    /// Derive a scope whose builder is this scope's builder (or an empty one)
    /// with `f` applied.
    ///
    /// The existing builder is cloned before `f` runs, so `self` keeps seeing
    /// exactly what it saw before.
    pub fn build(&self, f: impl FnOnce(&mut Builder)) -> Self {
        let mut builder = self.builder().cloned().unwrap_or_default();
        f(&mut builder);
        self.with_builder(builder)
    }
}
