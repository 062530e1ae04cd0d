//! Query-modification accumulator.
//!
//! A [`Builder`] collects the filters, grouping, ordering and pagination a
//! request wants applied to a fixed base statement, and [`Builder::build`]
//! appends them to that statement:
//!
//! ```ignore
//! let mut b = Builder::new();
//! b.filter("LOWER(email) LIKE LOWER(?)", ("%example.com",))
//!     .in_list("status", ["active", "invited"])
//!     .order("created_at DESC")
//!     .pagination(2, 20);
//!
//! let built = b.build_with(PlaceholderStyle::Dollar, "SELECT * FROM authors", &[]);
//! // SELECT * FROM authors
//! // WHERE (LOWER(email) LIKE LOWER($1))
//! // AND (status IN ($2,$3))
//! // ORDER BY created_at DESC
//! // LIMIT 20
//! // OFFSET 20
//! ```
//!
//! Expressions and clause text are trusted as-is: nothing here parses or
//! validates SQL, and a mismatch between `?` markers and arguments is only
//! reported later by the database.

use crate::placeholder::PlaceholderStyle;
use std::fmt::Write;
use std::sync::Arc;
use tokio_postgres::types::ToSql;


/// Page size used by [`Builder::pagination`] when the requested size is not positive.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A positional argument owned by a [`Builder`].
///
/// Shared so that deriving a new builder revision never copies argument values.
pub type Arg = Arc<dyn ToSql + Sync + Send>;

/// A boolean SQL fragment and the arguments for its `?` markers.
#[derive(Debug, Clone)]
pub struct Predicate {
    expression: String,
    args: Vec<Arg>,
}

impl Predicate {
    /// The raw expression, with `?` markers.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Arguments in marker order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

/// Conversion of caller values into predicate arguments.
///
/// Implemented for `()`, tuples of up to eight values, arrays and `Vec`s.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl<T> IntoArgs for Vec<T>
where
    T: ToSql + Sync + Send + 'static,
{
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(|v| Arc::new(v) as Arg).collect()
    }
}

impl<T, const N: usize> IntoArgs for [T; N]
where
    T: ToSql + Sync + Send + 'static,
{
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(|v| Arc::new(v) as Arg).collect()
    }
}

/// Arguments that are already boxed.
struct Shared(Vec<Arg>);

impl IntoArgs for Shared {
    fn into_args(self) -> Vec<Arg> {
        self.0
    }
}

macro_rules! impl_into_args_for_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> IntoArgs for ($($name,)+)
        where
            $($name: ToSql + Sync + Send + 'static),+
        {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$(Arc::new($name) as Arg),+]
            }
        }
    };
}

impl_into_args_for_tuple!(A);
impl_into_args_for_tuple!(A, B);
impl_into_args_for_tuple!(A, B, C);
impl_into_args_for_tuple!(A, B, C, D);
impl_into_args_for_tuple!(A, B, C, D, E);
impl_into_args_for_tuple!(A, B, C, D, E, F);
impl_into_args_for_tuple!(A, B, C, D, E, F, G);
impl_into_args_for_tuple!(A, B, C, D, E, F, G, H);

/// Accumulates filters, grouping, ordering and pagination for one request.
///
/// Setters overwrite (`order`, `group_by`, `offset`, `limit`, `pagination`) or
/// append (`filter`, `in_list`). Cloning is cheap: argument values are shared,
/// only the predicate list is copied, so a clone can be extended without
/// touching the builder it came from.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    predicates: Vec<Predicate>,
    order: String,
    group_by: String,
    offset: i64,
    limit: i64,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate, ANDed with the ones already present.
    ///
    /// The expression is wrapped in parentheses when built. Its `?` markers
    /// must match `args` one to one.
    #[doc(alias = "where")]
    pub fn filter(&mut self, expression: impl Into<String>, args: impl IntoArgs) -> &mut Self {
        self.predicates.push(Predicate {
            expression: expression.into(),
            args: args.into_args(),
        });
        self
    }

    /// Add a predicate with a single argument.
    pub fn filter_bind<T>(&mut self, expression: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.filter(expression, (value,))
    }

    /// Add `column IN (?,?,...)` with one marker per value.
    ///
    /// An empty `values` yields `column IN ()`, which most databases reject
    /// or treat as false. Callers should not pass an empty list.
    #[doc(alias = "in")]
    pub fn in_list<T>(&mut self, column: &str, values: impl IntoIterator<Item = T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let args: Vec<Arg> = values.into_iter().map(|v| Arc::new(v) as Arg).collect();
        let markers = vec!["?"; args.len()].join(",");
        self.filter(format!("{column} IN ({markers})"), Shared(args))
    }

    /// Set the `ORDER BY` text (e.g. `"created_at DESC, id"`).
    pub fn order(&mut self, cols: impl Into<String>) -> &mut Self {
        self.order = cols.into();
        self
    }

    /// Set the `GROUP BY` text.
    pub fn group_by(&mut self, cols: impl Into<String>) -> &mut Self {
        self.group_by = cols.into();
        self
    }

    /// Set the offset. Only values above zero are emitted.
    pub fn offset(&mut self, n: i64) -> &mut Self {
        self.offset = n;
        self
    }

    /// Set the limit. Only values above zero are emitted.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.limit = n;
        self
    }

    /// Set limit and offset from a 1-based page number and a page size.
    ///
    /// A page below 1 is treated as 1 and a size below 1 as
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn pagination(&mut self, page: i64, limit: i64) -> &mut Self {
        let page = if page <= 0 { 1 } else { page };
        let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
        let offset = (page - 1).saturating_mul(limit).max(0);

        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Predicates in insertion order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order_clause(&self) -> Option<&str> {
        (!self.order.is_empty()).then_some(self.order.as_str())
    }

    pub fn group_by_clause(&self) -> Option<&str> {
        (!self.group_by.is_empty()).then_some(self.group_by.as_str())
    }

    pub fn offset_value(&self) -> i64 {
        self.offset
    }

    pub fn limit_value(&self) -> i64 {
        self.limit
    }

    /// Total number of predicate arguments.
    pub fn param_count(&self) -> usize {
        self.predicates.iter().map(|p| p.args.len()).sum()
    }

    /// `true` if building would return the base statement plus a newline and
    /// the base arguments unchanged.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
            && self.order.is_empty()
            && self.group_by.is_empty()
            && self.limit <= 0
            && self.offset <= 0
    }

    /// Append the accumulated clauses to `sql`, keeping `?` markers as written.
    pub fn build<'a>(&'a self, sql: &str, params: &[&'a (dyn ToSql + Sync)]) -> BuiltSql<'a> {
        self.build_with(PlaceholderStyle::Question, sql, params)
    }

    /// Append the accumulated clauses to `sql`, rendering markers in `style`.
    ///
    /// Output order is fixed: base statement, `WHERE`/`AND` predicates,
    /// `GROUP BY`, `ORDER BY`, `LIMIT`, `OFFSET`, each on its own line. The
    /// returned parameters are `params` followed by every predicate's
    /// arguments in insertion order, which is the order the markers appear.
    pub fn build_with<'a>(
        &'a self,
        style: PlaceholderStyle,
        sql: &str,
        params: &[&'a (dyn ToSql + Sync)],
    ) -> BuiltSql<'a> {
        let mut out = String::with_capacity(sql.len() + 64);
        let mut all: Vec<&'a (dyn ToSql + Sync)> =
            Vec::with_capacity(params.len() + self.param_count());
        all.extend_from_slice(params);

        out.push_str(sql);
        out.push('\n');

        let mut last = params.len();
        for (idx, predicate) in self.predicates.iter().enumerate() {
            out.push_str(if idx == 0 { "WHERE (" } else { "AND (" });
            style.render_into(&mut out, &predicate.expression, &mut last);
            out.push_str(")\n");

            all.extend(predicate.args.iter().map(|a| &**a as &(dyn ToSql + Sync)));
        }

        if !self.group_by.is_empty() {
            let _ = writeln!(out, "GROUP BY {}", self.group_by);
        }

        if !self.order.is_empty() {
            let _ = writeln!(out, "ORDER BY {}", self.order);
        }

        if self.limit > 0 {
            let _ = writeln!(out, "LIMIT {}", self.limit);
        }

        if self.offset > 0 {
            let _ = writeln!(out, "OFFSET {}", self.offset);
        }

        BuiltSql { sql: out, params: all }
    }
}

/// A rewritten statement and its full argument list.
#[derive(Debug)]
pub struct BuiltSql<'a> {
    pub sql: String,
    pub params: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> BuiltSql<'a> {
    pub fn into_parts(self) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
        (self.sql, self.params)
    }
}
