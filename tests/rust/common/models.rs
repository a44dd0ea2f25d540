//! Record types shared by the test suites.

#![allow(dead_code)]

use surql_translate::query_builder::Query;
use surql_translate::schema_catalog::{FieldSchema, Record, SchemaCatalog};
use surql_translate::translator::{translate, Translation};

pub struct Post;

impl Record for Post {
    fn table() -> &'static str {
        "post"
    }

    fn fields() -> Vec<FieldSchema> {
        vec![
            FieldSchema::id(),
            FieldSchema::new("Title").column("title"),
            FieldSchema::new("Content").column("content"),
            FieldSchema::new("Status").column("status"),
            FieldSchema::new("CreatedAt").column("created_at"),
        ]
    }
}

pub struct User;

impl Record for User {
    fn table() -> &'static str {
        "user"
    }

    fn fields() -> Vec<FieldSchema> {
        vec![
            FieldSchema::id(),
            FieldSchema::new("Username"),
            FieldSchema::new("Age"),
            FieldSchema::new("IsActive"),
            FieldSchema::new("IsAdmin"),
            FieldSchema::new("IsOwner"),
            // never part of a projection
            FieldSchema::new("Password").write_only(),
        ]
    }
}

pub struct Address;

impl Record for Address {
    fn table() -> &'static str {
        "address"
    }

    fn fields() -> Vec<FieldSchema> {
        vec![
            FieldSchema::id(),
            FieldSchema::new("Number"),
            FieldSchema::new("Street"),
            FieldSchema::new("City"),
            FieldSchema::new("State"),
            FieldSchema::new("ZipCode"),
            FieldSchema::new("Country"),
            FieldSchema::new("IsActive"),
        ]
    }
}

pub struct Order;

impl Record for Order {
    fn table() -> &'static str {
        "order"
    }

    fn fields() -> Vec<FieldSchema> {
        vec![
            FieldSchema::id(),
            FieldSchema::new("Address").record("address"),
            FieldSchema::new("Products"),
            FieldSchema::new("Status"),
            FieldSchema::new("CreatedAt"),
        ]
    }
}

pub struct Product;

impl Record for Product {
    fn table() -> &'static str {
        "product"
    }

    fn fields() -> Vec<FieldSchema> {
        vec![FieldSchema::id(), FieldSchema::new("Name")]
    }
}

pub fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog
        .register::<Post>()
        .and_then(|c| c.register::<User>())
        .and_then(|c| c.register::<Address>())
        .and_then(|c| c.register::<Order>())
        .and_then(|c| c.register::<Product>())
        .expect("test models register");
    catalog
}

pub fn translate_query(query: &Query) -> Translation {
    translate(query, &catalog()).expect("query translates")
}

pub fn to_surql(query: &Query) -> String {
    translate_query(query).query
}

/// Full-record projection of `post`.
pub const POST_FIELDS: &str =
    "content AS Content, created_at AS CreatedAt, id AS Id, status AS Status, title AS Title";

/// Full-record projection of `user`.
pub const USER_FIELDS: &str = "Age, id AS Id, IsActive, IsAdmin, IsOwner, Username";

/// Full-record projection of `address`.
pub const ADDRESS_FIELDS: &str =
    "City, Country, id AS Id, IsActive, Number, State, Street, ZipCode";
