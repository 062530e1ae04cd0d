//! Convenient imports for typical `pgscope` usage.
//!
//! `GenericClient` is left out on purpose: its methods share names with
//! [`Executor`](crate::Executor), and generated code only needs the latter.
//!
//! ```ignore
//! use pgscope::prelude::*;
//! ```

pub use crate::{
    Builder, Executor, FromRow, OrmError, OrmResult, PlaceholderStyle, QueryScope, RowExt,
    ScopedClient, ScopedClientConfig,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
