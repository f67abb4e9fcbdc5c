//! Shared blog fixture: users, categories, articles, comments and tags.
//! Articles also link to each other through `article_related`.
#![allow(dead_code)]

use jsonapi_sql::prelude::*;
use rusqlite::Connection;
use serde_json::Value;

pub const SCHEMA: &str = r#"
    CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT);
    CREATE TABLE category (
        id INTEGER PRIMARY KEY,
        name TEXT,
        created_at TEXT,
        parent_id INTEGER REFERENCES category (id)
    );
    CREATE TABLE article (
        id INTEGER PRIMARY KEY,
        name TEXT,
        content TEXT,
        category_id INTEGER REFERENCES category (id),
        author_id INTEGER REFERENCES user (id),
        owner_id INTEGER REFERENCES user (id)
    );
    CREATE TABLE comment (
        id INTEGER PRIMARY KEY,
        content TEXT,
        article_id INTEGER REFERENCES article (id),
        author_id INTEGER REFERENCES user (id)
    );
    CREATE TABLE tag (id INTEGER PRIMARY KEY, label TEXT);
    CREATE TABLE article_tag (
        article_id INTEGER REFERENCES article (id),
        tag_id INTEGER REFERENCES tag (id)
    );
    CREATE TABLE article_related (
        article_id INTEGER REFERENCES article (id),
        related_id INTEGER REFERENCES article (id)
    );
"#;

pub const DATA: &str = r#"
    INSERT INTO user (id, name) VALUES (1, 'Alice'), (2, 'Bob');
    INSERT INTO category (id, name, created_at, parent_id) VALUES
        (1, 'Some category', '2024-01-01', NULL),
        (2, 'Subcategory 1', '2024-01-02', 1),
        (3, 'Subcategory 2', '2024-01-03', 1);
    INSERT INTO article (id, name, content, category_id, author_id, owner_id)
        VALUES (1, 'Some article', NULL, 1, 1, 2);
    INSERT INTO comment (id, content, article_id, author_id)
        VALUES (1, 'Some comment', 1, 2);
"#;

pub fn catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();
    builder.entity("User", "user").primary_key("id").column("name");
    builder
        .entity("Category", "category")
        .primary_key("id")
        .column("name")
        .column("created_at")
        .foreign_key("parent_id", "category", "id")
        .to_one("parent", "Category", [("parent_id", "id")])
        .to_many("subcategories", "Category", [("id", "parent_id")]);
    builder
        .entity("Article", "article")
        .primary_key("id")
        .column("name")
        .column("content")
        .foreign_key("category_id", "category", "id")
        .foreign_key("author_id", "user", "id")
        .foreign_key("owner_id", "user", "id")
        .to_one("category", "Category", [("category_id", "id")])
        .to_one("author", "User", [("author_id", "id")])
        .to_one("owner", "User", [("owner_id", "id")])
        .to_many("comments", "Comment", [("id", "article_id")])
        .many_to_many(
            "tags",
            "Tag",
            "article_tag",
            [("id", "article_id")],
            [("tag_id", "id")],
        )
        .many_to_many(
            "related",
            "Article",
            "article_related",
            [("id", "article_id")],
            [("related_id", "id")],
        );
    builder
        .entity("Comment", "comment")
        .primary_key("id")
        .column("content")
        .foreign_key("article_id", "article", "id")
        .foreign_key("author_id", "user", "id")
        .to_one("article", "Article", [("article_id", "id")])
        .to_one("author", "User", [("author_id", "id")]);
    builder.entity("Tag", "tag").primary_key("id").column("label");
    builder.junction("article_tag", &["article_id", "tag_id"]);
    builder.junction("article_related", &["article_id", "related_id"]);
    builder.build().unwrap()
}

/// Route compiler logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `User` has no alias.
pub fn api() -> JsonApi {
    init_tracing();
    let catalog = catalog();
    let registry = AliasRegistry::new(
        &catalog,
        [
            ("articles", "Article"),
            ("categories", "Category"),
            ("comments", "Comment"),
            ("tags", "Tag"),
        ],
    )
    .unwrap();
    JsonApi::new(catalog, registry, Settings::default())
}

pub fn connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(DATA).unwrap();
    conn
}

/// Compile on `conn` and return the raw document.
pub fn run(
    api: &JsonApi,
    conn: &Connection,
    root: &str,
    fields: Option<&FieldSelection>,
    include: Option<&[&str]>,
) -> Value {
    let query = api
        .select(conn, api.root(root).unwrap(), fields, include)
        .unwrap();
    fetch_value(conn, &query).unwrap()
}

/// `included`, sorted by `(type, id)` so comparisons do not depend on UNION order.
pub fn sorted_included(document: &Value) -> Vec<Value> {
    let mut included = document["included"].as_array().cloned().unwrap_or_default();
    included.sort_by_key(|r| (r["type"].to_string(), r["id"].as_i64()));
    included
}
