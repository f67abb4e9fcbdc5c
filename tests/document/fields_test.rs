//! Sparse fieldsets: attributes, relationship linkage and field errors.

mod common;

use common::{api, connection, run};
use jsonapi_sql::prelude::*;
use serde_json::json;

#[test]
fn test_identifiers_only_without_fields() {
    let api = api();
    let conn = connection();

    assert_eq!(
        run(&api, &conn, "articles", None, None),
        json!({"data": [{"type": "articles", "id": 1}]})
    );
}

#[test]
fn test_selected_attributes() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["name", "content"]);

    assert_eq!(
        run(&api, &conn, "articles", Some(&fields), None),
        json!({
            "data": [{
                "type": "articles",
                "id": 1,
                "attributes": {"name": "Some article", "content": null}
            }]
        })
    );
}

#[test]
fn test_attributes_follow_declaration_order() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articles", ["content", "name"]);

    let sql = api
        .select(&Dialect::Postgres, root, Some(&fields), None)
        .unwrap()
        .to_sql();
    let name = sql.find("'name'").unwrap();
    let content = sql.find("'content'").unwrap();
    assert!(name < content, "SQL: {}", sql);
}

#[test]
fn test_to_one_relationship() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["category"]);

    let document = run(&api, &conn, "articles", Some(&fields), None);
    let article = &document["data"][0];

    assert_eq!(
        article["relationships"]["category"]["data"],
        json!({"type": "categories", "id": 1})
    );
    assert!(article.get("attributes").is_none());
    assert!(document.get("included").is_none());
}

#[test]
fn test_to_one_relationship_without_match_is_null() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("categories", ["parent"]);

    let document = run(&api, &conn, "categories", Some(&fields), None);
    let data = document["data"].as_array().unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["relationships"]["parent"]["data"], json!(null));
    assert_eq!(
        data[1]["relationships"]["parent"]["data"],
        json!({"type": "categories", "id": 1})
    );
}

#[test]
fn test_to_many_relationship() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["comments"]);

    let document = run(&api, &conn, "articles", Some(&fields), None);

    assert_eq!(
        document["data"][0]["relationships"]["comments"]["data"],
        json!([{"type": "comments", "id": 1}])
    );
}

#[test]
fn test_empty_to_many_relationship_is_empty_list() {
    let api = api();
    let conn = connection();
    conn.execute("DELETE FROM comment", []).unwrap();
    let fields = FieldSelection::new().with("articles", ["comments"]);

    let document = run(&api, &conn, "articles", Some(&fields), None);

    assert_eq!(
        document["data"][0]["relationships"]["comments"]["data"],
        json!([])
    );
}

#[test]
fn test_attributes_and_relationships_together() {
    let api = api();
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["name", "category", "comments"]);

    let document = fetch_document(
        &conn,
        &api.select(&conn, api.root("articles").unwrap(), Some(&fields), None)
            .unwrap(),
    )
    .unwrap();
    let article = &document.data[0];

    assert_eq!(article.attribute("name"), Some(&json!("Some article")));
    assert_eq!(article.attribute("content"), None);
    assert!(matches!(
        article.relationship("category"),
        Some(RelationshipData::One(Some(id))) if id.type_name == "categories"
    ));
    assert_eq!(
        article.relationship("comments").unwrap().identifiers().len(),
        1
    );
}

#[test]
fn test_unselected_type_keeps_identifiers_only() {
    let api = api();
    let conn = connection();
    // Only comments are narrowed; the article root stays bare.
    let fields = FieldSelection::new().with("comments", ["content"]);

    assert_eq!(
        run(&api, &conn, "articles", Some(&fields), None),
        json!({"data": [{"type": "articles", "id": 1}]})
    );
}

#[test]
fn test_empty_table() {
    let api = api();
    let conn = connection();
    conn.execute_batch("DELETE FROM comment; DELETE FROM article;")
        .unwrap();
    let fields = FieldSelection::new().with("articles", ["name"]);

    assert_eq!(
        run(&api, &conn, "articles", Some(&fields), None),
        json!({"data": []})
    );
}

#[test]
fn test_unknown_alias() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articel", ["name"]);

    assert_eq!(
        api.select(&Dialect::Sqlite, root, Some(&fields), None),
        Err(BuildError::UnknownAlias("articel".into()))
    );
    assert_eq!(
        api.root("users"),
        Err(BuildError::UnknownAlias("users".into()))
    );
}

#[test]
fn test_relationship_to_unaliased_type() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articles", ["author"]);

    assert_eq!(
        api.select(&Dialect::Sqlite, root, Some(&fields), None),
        Err(BuildError::UnknownAlias("User".into()))
    );
}

#[test]
fn test_unknown_field() {
    let api = api();
    let root = api.root("articles").unwrap();
    let fields = FieldSelection::new().with("articles", ["name", "title"]);

    assert_eq!(
        api.select(&Dialect::Sqlite, root, Some(&fields), None),
        Err(BuildError::UnknownField {
            entity: "Article".into(),
            field: "title".into(),
        })
    );
}

#[test]
fn test_lenient_fields_skip_unknown_names() {
    let strict = api();
    let api = JsonApi::new(
        strict.catalog().clone(),
        strict.registry().clone(),
        Settings {
            strict_fields: false,
            ..Settings::default()
        },
    );
    let conn = connection();
    let fields = FieldSelection::new().with("articles", ["name", "title"]);

    assert_eq!(
        run(&api, &conn, "articles", Some(&fields), None),
        json!({
            "data": [{
                "type": "articles",
                "id": 1,
                "attributes": {"name": "Some article"}
            }]
        })
    );
}

#[test]
fn test_fields_from_query_parameters() {
    let api = api();
    let conn = connection();
    let mut fields = FieldSelection::new();
    fields.insert_csv("articles", "name, comments");

    let document = run(&api, &conn, "articles", Some(&fields), None);

    assert_eq!(document["data"][0]["attributes"], json!({"name": "Some article"}));
    assert_eq!(
        document["data"][0]["relationships"]["comments"]["data"],
        json!([{"type": "comments", "id": 1}])
    );
}
