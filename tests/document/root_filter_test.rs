//! Restricting the root rows.

mod common;

use common::{api, connection, run, sorted_included};
use jsonapi_sql::prelude::*;
use rusqlite::Connection;
use serde_json::{json, Value};

fn second_article(conn: &Connection) {
    conn.execute_batch(
        "INSERT INTO article (id, name, content, category_id, author_id, owner_id)
            VALUES (2, 'Other article', 'Body', 2, 2, 2);
         INSERT INTO comment (id, content, article_id, author_id)
            VALUES (2, 'Other comment', 2, 1);",
    )
    .unwrap();
}

fn run_where<F>(api: &JsonApi, conn: &Connection, include: &[&str], filter: F) -> Value
where
    F: Fn(&str) -> Expr,
{
    let query = api
        .select_where(conn, api.root("articles").unwrap(), None, Some(include), filter)
        .unwrap();
    fetch_value(conn, &query).unwrap()
}

#[test]
fn test_filter_narrows_data() {
    let api = api();
    let conn = connection();
    second_article(&conn);

    assert_eq!(
        run(&api, &conn, "articles", None, None)["data"]
            .as_array()
            .unwrap()
            .len(),
        2
    );

    let document = run_where(&api, &conn, &[], |alias| table_col(alias, "id").eq(2));
    assert_eq!(document, json!({"data": [{"type": "articles", "id": 2}]}));
}

#[test]
fn test_filter_narrows_included() {
    let api = api();
    let conn = connection();
    second_article(&conn);

    let document = run_where(&api, &conn, &["category", "comments"], |alias| {
        table_col(alias, "name").eq(lit_str("Other article"))
    });

    assert_eq!(
        sorted_included(&document),
        vec![
            json!({"type": "categories", "id": 2}),
            json!({"type": "comments", "id": 2}),
        ]
    );
}

#[test]
fn test_filter_with_or() {
    let api = api();
    let conn = connection();
    second_article(&conn);
    conn.execute_batch(
        "INSERT INTO article (id, name, content, category_id, author_id, owner_id)
            VALUES (3, 'Third article', NULL, 3, 1, 1);",
    )
    .unwrap();

    let document = run_where(&api, &conn, &["category"], |alias| {
        table_col(alias, "id")
            .eq(1)
            .or(table_col(alias, "id").eq(3))
            .and(table_col(alias, "content").is_null())
    });

    assert_eq!(
        document["data"],
        json!([{"type": "articles", "id": 1}, {"type": "articles", "id": 3}])
    );
    assert_eq!(
        sorted_included(&document),
        vec![
            json!({"type": "categories", "id": 1}),
            json!({"type": "categories", "id": 3}),
        ]
    );
}

#[test]
fn test_filter_matching_nothing() {
    let api = api();
    let conn = connection();

    let document = run_where(&api, &conn, &["comments"], |_| lit_bool(false));

    assert_eq!(document, json!({"data": [], "included": []}));
}

#[test]
fn test_filter_on_nan_matches_nothing() {
    let api = api();
    let conn = connection();

    let document = run_where(&api, &conn, &[], |alias| {
        table_col(alias, "id").eq(lit_float(f64::NAN))
    });

    assert_eq!(document, json!({"data": []}));
}
