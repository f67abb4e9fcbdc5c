//! Relationships through a secondary table.

mod common;

use common::{api, connection, run, sorted_included};
use jsonapi_sql::prelude::*;
use rusqlite::Connection;
use serde_json::{json, Value};
use std::collections::HashSet;

fn tagged_connection() -> Connection {
    let conn = connection();
    conn.execute_batch(
        "INSERT INTO tag (id, label) VALUES (1, 'rust'), (2, 'sql'), (3, 'unused');
         INSERT INTO article_tag (article_id, tag_id) VALUES (1, 1), (1, 2);",
    )
    .unwrap();
    conn
}

/// Articles 1 -> 2 -> 3 through `article_related`.
fn related_connection() -> Connection {
    let conn = connection();
    conn.execute_batch(
        "INSERT INTO article (id, name) VALUES (2, 'Second article'), (3, 'Third article');
         INSERT INTO article_related (article_id, related_id) VALUES (1, 2), (2, 3);",
    )
    .unwrap();
    conn
}

fn run_related(api: &JsonApi, conn: &Connection, include: &[&str]) -> Value {
    let fields = FieldSelection::new().with("articles", ["related"]);
    let query = api
        .select_where(
            conn,
            api.root("articles").unwrap(),
            Some(&fields),
            Some(include),
            |alias| table_col(alias, "id").eq(1),
        )
        .unwrap();
    fetch_value(conn, &query).unwrap()
}

#[test]
fn test_many_to_many_linkage() {
    let api = api();
    let conn = tagged_connection();
    let fields = FieldSelection::new().with("articles", ["tags"]);

    let document = run(&api, &conn, "articles", Some(&fields), None);

    assert_eq!(
        document["data"][0]["relationships"]["tags"]["data"],
        json!([{"type": "tags", "id": 1}, {"type": "tags", "id": 2}])
    );
}

#[test]
fn test_many_to_many_without_rows() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["tags"]);

    let document = run(&api, &conn, "articles", Some(&fields), None);

    assert_eq!(
        document["data"][0]["relationships"]["tags"]["data"],
        json!([])
    );
}

#[test]
fn test_include_many_to_many() {
    let api = api();
    let conn = tagged_connection();
    let fields = FieldSelection::new()
        .with("articles", ["tags"])
        .with("tags", ["label"]);

    let document = run(&api, &conn, "articles", Some(&fields), Some(&["tags"]));

    assert_eq!(
        sorted_included(&document),
        vec![
            json!({"type": "tags", "id": 1, "attributes": {"label": "rust"}}),
            json!({"type": "tags", "id": 2, "attributes": {"label": "sql"}}),
        ]
    );
}

#[test]
fn test_secondary_table_is_joined() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articles", ["tags"]);

    for dialect in [Dialect::Postgres, Dialect::Sqlite, Dialect::DuckDb] {
        let sql = api
            .select(&dialect, root, Some(&fields), Some(&["tags"]))
            .unwrap()
            .to_sql();
        // Once for the linkage, once for the included member.
        assert_eq!(
            sql.matches("INNER JOIN \"article_tag\" AS").count(),
            2,
            "SQL: {}",
            sql
        );
    }

    let sql = api
        .select(&Dialect::MySql, root, Some(&fields), Some(&["tags"]))
        .unwrap()
        .to_sql();
    assert_eq!(sql.matches("INNER JOIN `article_tag` AS").count(), 2);
}

#[test]
fn test_self_referential_linkage() {
    let api = api();
    let conn = related_connection();

    let document = run_related(&api, &conn, &[]);

    assert_eq!(
        document,
        json!({
            "data": [{
                "type": "articles",
                "id": 1,
                "relationships": {"related": {"data": [{"type": "articles", "id": 2}]}}
            }]
        })
    );
}

#[test]
fn test_include_self_referential_chain() {
    let api = api();
    let conn = related_connection();

    let document = run_related(&api, &conn, &["related.related"]);

    assert_eq!(
        document["data"][0]["relationships"]["related"]["data"],
        json!([{"type": "articles", "id": 2}])
    );
    assert_eq!(
        sorted_included(&document),
        vec![
            json!({
                "type": "articles",
                "id": 2,
                "relationships": {"related": {"data": [{"type": "articles", "id": 3}]}}
            }),
            json!({
                "type": "articles",
                "id": 3,
                "relationships": {"related": {"data": []}}
            }),
        ]
    );
}

#[test]
fn test_self_referential_junction_aliases() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articles", ["related"]);

    let sql = api
        .select(&Dialect::Sqlite, root, Some(&fields), Some(&["related.related"]))
        .unwrap()
        .to_sql();

    // Root linkage 1, `related` member 1 + 1, `related.related` member 2 + 1.
    let aliases: HashSet<&str> = sql
        .split("INNER JOIN \"article_related\" AS \"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(aliases.len(), 6, "SQL: {}", sql);
}
