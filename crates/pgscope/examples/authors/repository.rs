//! Domain repository: decides which predicates a use case adds.

use crate::queries::{Author, Queries};
use pgscope::{GenericClient, OrmResult, QueryScope, ScopedClient};

pub struct Repository<C> {
    query: Queries<C>,
    query_builder: Queries<ScopedClient<C>>,
}

impl<C: GenericClient + Clone> Repository<C> {
    pub fn new(db: C) -> Self {
        Self {
            query: Queries::new(db.clone()),
            query_builder: Queries::new(ScopedClient::new(db)),
        }
    }

    /// Authors with a company address whose first name matches `name_like`.
    pub async fn get_all_author(
        &self,
        scope: &QueryScope,
        name_like: Option<&str>,
        page: i64,
    ) -> OrmResult<Vec<Author>> {
        let name_like = name_like.map(str::to_owned);
        let scope = scope.build(|b| {
            b.filter(
                "LOWER(email) LIKE LOWER(?) OR LOWER(email) LIKE LOWER(?)",
                ("%example.com", "%example.org"),
            );
            if let Some(name) = name_like {
                b.filter_bind("LOWER(first_name) LIKE LOWER(?)", name);
            }
            b.order("last_name, first_name").pagination(page, 10);
        });
        self.query_builder.get_all_author(&scope).await
    }

    pub async fn count_all(&self, scope: &QueryScope) -> OrmResult<i64> {
        self.query.count_authors(scope).await
    }
}
