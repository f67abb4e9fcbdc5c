//! Compound documents: the `included` block.

mod common;

use common::{api, connection, run, sorted_included};
use jsonapi_sql::prelude::*;
use serde_json::json;

#[test]
fn test_include_to_one() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["category"]);

    let document = run(&api, &conn, "articles", Some(&fields), Some(&["category"]));

    assert_eq!(
        document["data"][0]["relationships"]["category"]["data"],
        json!({"type": "categories", "id": 1})
    );
    assert_eq!(
        document["included"],
        json!([{"type": "categories", "id": 1}])
    );
}

#[test]
fn test_include_to_many() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new()
        .with("articles", ["comments"])
        .with("comments", ["content"]);

    let document = run(&api, &conn, "articles", Some(&fields), Some(&["comments"]));

    assert_eq!(
        document["included"],
        json!([{
            "type": "comments",
            "id": 1,
            "attributes": {"content": "Some comment"}
        }])
    );
}

#[test]
fn test_included_uses_selected_fields() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new()
        .with("articles", ["category"])
        .with("categories", ["name"]);

    let document = run(&api, &conn, "articles", Some(&fields), Some(&["category"]));

    assert_eq!(
        document["included"],
        json!([{
            "type": "categories",
            "id": 1,
            "attributes": {"name": "Some category"}
        }])
    );
}

#[test]
fn test_included_without_fields_has_identifiers_only() {
    let api = api();
    let conn = connection();

    let document = run(&api, &conn, "articles", None, Some(&["category"]));

    assert_eq!(document["data"], json!([{"type": "articles", "id": 1}]));
    assert_eq!(
        document["included"],
        json!([{"type": "categories", "id": 1}])
    );
}

#[test]
fn test_deep_include() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new()
        .with("articles", ["category"])
        .with("categories", ["subcategories"]);

    let document = run(
        &api,
        &conn,
        "articles",
        Some(&fields),
        Some(&["category.subcategories"]),
    );

    assert_eq!(
        sorted_included(&document),
        vec![
            json!({
                "type": "categories",
                "id": 1,
                "relationships": {
                    "subcategories": {"data": [
                        {"type": "categories", "id": 2},
                        {"type": "categories", "id": 3}
                    ]}
                }
            }),
            json!({
                "type": "categories",
                "id": 2,
                "relationships": {"subcategories": {"data": []}}
            }),
            json!({
                "type": "categories",
                "id": 3,
                "relationships": {"subcategories": {"data": []}}
            }),
        ]
    );
}

#[test]
fn test_multiple_paths() {
    let api = api();
    let conn = connection();

    let document = run(&api, &conn, "articles", None, Some(&["category", "comments"]));

    assert_eq!(
        sorted_included(&document),
        vec![
            json!({"type": "categories", "id": 1}),
            json!({"type": "comments", "id": 1}),
        ]
    );
}

#[test]
fn test_object_reached_twice_is_included_once() {
    let api = api();
    let conn = connection();

    // Category 1 is reached through both paths.
    let document = run(
        &api,
        &conn,
        "articles",
        None,
        Some(&["category", "comments.article.category"]),
    );

    assert_eq!(
        sorted_included(&document),
        vec![
            json!({"type": "articles", "id": 1}),
            json!({"type": "categories", "id": 1}),
            json!({"type": "comments", "id": 1}),
        ]
    );
}

#[test]
fn test_include_from_comment_root() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["name"]);

    let document = run(&api, &conn, "comments", Some(&fields), Some(&["article"]));

    assert_eq!(document["data"], json!([{"type": "comments", "id": 1}]));
    assert_eq!(
        document["included"],
        json!([{
            "type": "articles",
            "id": 1,
            "attributes": {"name": "Some article"}
        }])
    );
}

#[test]
fn test_include_with_no_matches_is_empty_list() {
    let api = api();
    let conn = connection();
    conn.execute("DELETE FROM comment", []).unwrap();

    let document = run(&api, &conn, "articles", None, Some(&["comments"]));

    assert_eq!(document["included"], json!([]));
}

#[test]
fn test_empty_include_list_omits_block() {
    let api = api();
    let conn = connection();

    let document = run(&api, &conn, "articles", None, Some(&[]));

    assert!(document.get("included").is_none());
}

#[test]
fn test_unknown_include_segment() {
    let api = api();
    let root = api.root("articles").unwrap();

    assert_eq!(
        api.select(&Dialect::Sqlite, root, None, Some(&["category.tags"])),
        Err(BuildError::UnknownRelationship {
            segment: "tags".into(),
            entity: "Category".into(),
        })
    );
}

#[test]
fn test_include_through_unaliased_type() {
    let api = api();
    let root = api.root("articles").unwrap();

    assert_eq!(
        api.select(&Dialect::Sqlite, root, None, Some(&["author"])),
        Err(BuildError::UnknownAlias("User".into()))
    );
}

#[test]
fn test_decoded_compound_document() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new()
        .with("articles", ["name", "category"])
        .with("categories", ["name"]);
    let query = api
        .select(
            &conn,
            api.root("articles").unwrap(),
            Some(&fields),
            Some(&["category"]),
        )
        .unwrap();

    let document = fetch_document(&conn, &query).unwrap();
    let category = document
        .find_included("categories", &json!(1))
        .expect("category is included");

    assert_eq!(category.attribute("name"), Some(&json!("Some category")));
    assert_eq!(
        document.data[0].relationship("category").unwrap().identifiers()[0],
        &category.identifier()
    );
}
