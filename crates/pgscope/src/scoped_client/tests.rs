use super::*;
use crate::error::OrmError;
use crate::placeholder::PlaceholderStyle;
use std::sync::Mutex;

const LIST_AUTHORS: &str = "SELECT id, first_name, email FROM authors";
const AUTHORS_BY_OWNER: &str = "SELECT id, first_name, email FROM authors WHERE owner_id = $1";

// ── Shared recording client for tests ──

#[derive(Debug, Clone, PartialEq)]
struct Call {
    op: &'static str,
    sql: String,
    params: Vec<String>,
}

#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    fail_with: Option<String>,
}

impl RecordingClient {
    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    fn record(&self, op: &'static str, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<()> {
        self.calls.lock().unwrap().push(Call {
            op,
            sql: sql.to_string(),
            params: params.iter().map(|p| format!("{p:?}")).collect(),
        });
        match &self.fail_with {
            Some(message) => Err(OrmError::Other(message.clone())),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn last(&self) -> Call {
        self.calls().pop().expect("at least one call")
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        self.record("query", sql, params)?;
        Ok(vec![])
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Row> {
        self.record("query_one", sql, params)?;
        Err(OrmError::not_found("no rows"))
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Option<Row>> {
        self.record("query_opt", sql, params)?;
        Ok(None)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        self.record("execute", sql, params)?;
        Ok(3)
    }

    async fn prepare_statement(&self, sql: &str) -> OrmResult<Statement> {
        self.record("prepare", sql, &[])?;
        Err(OrmError::Other("prepare unsupported".to_string()))
    }
}

fn email_and_name_scope() -> QueryScope {
    QueryScope::new().build(|b| {
        b.filter(
            "LOWER(email) LIKE LOWER(?) OR LOWER(email) LIKE LOWER(?) ",
            ("%example.com", "%example.org"),
        )
        .filter("LOWER(first_name) LIKE LOWER(?)", ("%an%",));
    })
}

#[tokio::test]
async fn empty_scope_forwards_every_primitive_unchanged() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);
    let scope = QueryScope::new();
    let owner = 7_i64;

    client
        .query(&scope, AUTHORS_BY_OWNER, &[&owner])
        .await
        .unwrap();
    let _ = client.query_one(&scope, AUTHORS_BY_OWNER, &[&owner]).await;
    client
        .query_opt(&scope, AUTHORS_BY_OWNER, &[&owner])
        .await
        .unwrap();
    client
        .execute(&scope, "DELETE FROM authors WHERE id = $1", &[&owner])
        .await
        .unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 4);
    for call in &calls[..3] {
        assert_eq!(call.sql, AUTHORS_BY_OWNER);
        assert_eq!(call.params, ["7"]);
    }
    assert_eq!(calls[3].sql, "DELETE FROM authors WHERE id = $1");
    assert_eq!(
        calls.iter().map(|c| c.op).collect::<Vec<_>>(),
        ["query", "query_one", "query_opt", "execute"]
    );
}

#[tokio::test]
async fn query_is_rewritten_with_dollar_placeholders() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);

    let scope = email_and_name_scope().build(|b| {
        b.order("last_name").pagination(2, 20);
    });
    client.query(&scope, LIST_AUTHORS, &[]).await.unwrap();

    let call = recorder.last();
    assert_eq!(
        call.sql,
        "SELECT id, first_name, email FROM authors\n\
         WHERE (LOWER(email) LIKE LOWER($1) OR LOWER(email) LIKE LOWER($2) )\n\
         AND (LOWER(first_name) LIKE LOWER($3))\n\
         ORDER BY last_name\n\
         LIMIT 20\n\
         OFFSET 20\n"
    );
    assert_eq!(
        call.params,
        ["\"%example.com\"", "\"%example.org\"", "\"%an%\""]
    );
}

#[tokio::test]
async fn predicate_params_follow_base_params() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);
    let scope = QueryScope::new().build(|b| {
        b.in_list("status", ["active", "invited"]);
    });
    let owner = 7_i64;

    client
        .query_opt(&scope, AUTHORS_BY_OWNER, &[&owner])
        .await
        .unwrap();

    let call = recorder.last();
    assert_eq!(
        call.sql,
        format!("{AUTHORS_BY_OWNER}\nWHERE (status IN ($2,$3))\n")
    );
    assert_eq!(call.params, ["7", "\"active\"", "\"invited\""]);
}

#[tokio::test]
async fn question_mark_config_keeps_markers() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder)
        .with_config(ScopedClientConfig::new().question_marks());
    assert_eq!(client.config().placeholder, PlaceholderStyle::Question);

    let scope = QueryScope::new().build(|b| {
        b.in_list("id", [1_i32, 2, 3]);
    });
    client.query(&scope, "SELECT * FROM t", &[]).await.unwrap();

    let call = recorder.last();
    assert!(call.sql.contains("id IN (?,?,?)"));
    assert_eq!(call.params, ["1", "2", "3"]);
}

#[tokio::test]
async fn execute_is_rewritten_and_returns_backend_count() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);
    let scope = QueryScope::new().build(|b| {
        b.filter_bind("created_at < ?", "2020-01-01");
    });

    let affected = client
        .execute(&scope, "DELETE FROM authors", &[])
        .await
        .unwrap();

    assert_eq!(affected, 3);
    assert_eq!(
        recorder.last().sql,
        "DELETE FROM authors\nWHERE (created_at < $1)\n"
    );
}

#[tokio::test]
async fn backend_errors_pass_through_unchanged() {
    let recorder = RecordingClient::failing("boom");
    let client = ScopedClient::new(&recorder);

    let err = client
        .query(&email_and_name_scope(), LIST_AUTHORS, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Other(ref m) if m == "boom"));

    let err = client
        .query_one(&QueryScope::new(), LIST_AUTHORS, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Other(ref m) if m == "boom"));
}

#[tokio::test]
async fn query_one_not_found_comes_from_backend() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);

    let err = client
        .query_one(&email_and_name_scope(), LIST_AUTHORS, &[])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(recorder.last().op, "query_one");
    assert!(recorder.last().sql.starts_with(LIST_AUTHORS));
}

#[tokio::test]
async fn prepare_is_never_rewritten() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);

    let _ = client.prepare(&email_and_name_scope(), LIST_AUTHORS).await;

    let call = recorder.last();
    assert_eq!(call.op, "prepare");
    assert_eq!(call.sql, LIST_AUTHORS);
}

#[tokio::test]
async fn scope_without_builder_is_passthrough() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);

    let scope = email_and_name_scope().without_builder();
    client.query(&scope, LIST_AUTHORS, &[]).await.unwrap();

    assert_eq!(recorder.last().sql, LIST_AUTHORS);
}

#[tokio::test]
async fn rewriting_happens_with_logging_disabled() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder)
        .with_config(ScopedClientConfig::new().log_rewrites(false));

    let scope = QueryScope::new().build(|b| {
        b.limit(1);
    });
    client.query(&scope, LIST_AUTHORS, &[]).await.unwrap();

    assert_eq!(recorder.last().sql, format!("{LIST_AUTHORS}\nLIMIT 1\n"));
}

#[tokio::test]
async fn concurrent_requests_share_the_backend_not_the_builder() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);

    let base = QueryScope::new().build(|b| {
        b.filter("deleted_at IS NULL", ());
    });
    let first = base.build(|b| {
        b.filter_bind("id = ?", 1_i64);
    });
    let second = base.build(|b| {
        b.order("id DESC");
    });

    let (a, b) = tokio::join!(
        client.query(&first, LIST_AUTHORS, &[]),
        client.query(&second, LIST_AUTHORS, &[]),
    );
    a.unwrap();
    b.unwrap();

    let mut sqls: Vec<String> = recorder.calls().into_iter().map(|c| c.sql).collect();
    sqls.sort();
    assert_eq!(
        sqls,
        [
            format!("{LIST_AUTHORS}\nWHERE (deleted_at IS NULL)\nAND (id = $1)\n"),
            format!("{LIST_AUTHORS}\nWHERE (deleted_at IS NULL)\nORDER BY id DESC\n"),
        ]
    );
    assert_eq!(base.builder().map(|b| b.predicates().len()), Some(1));
}

#[tokio::test]
async fn plain_generic_client_ignores_the_scope() {
    let recorder = RecordingClient::default();

    Executor::query(&recorder, &email_and_name_scope(), LIST_AUTHORS, &[])
        .await
        .unwrap();

    assert_eq!(recorder.last().sql, LIST_AUTHORS);
    assert!(recorder.last().params.is_empty());
}

#[test]
fn into_inner_returns_the_backend() {
    let recorder = RecordingClient::default();
    let client = ScopedClient::new(&recorder);
    assert!(std::ptr::eq(*client.inner(), &recorder));
    assert!(std::ptr::eq(client.into_inner(), &recorder));
}

#[test]
fn default_config_targets_postgres() {
    let config = ScopedClientConfig::default();
    assert_eq!(config.placeholder, PlaceholderStyle::Dollar);
    assert!(config.log_rewrites);
}
