use surql_translate::query_builder::Query;

use crate::models::{to_surql, POST_FIELDS};

#[test]
fn test_order_by() {
    let query = Query::from_table("post").order_by(|p| p.member("CreatedAt"));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post ORDER BY created_at", POST_FIELDS)
    );
}

#[test]
fn test_order_by_descending() {
    let query = Query::from_table("post").order_by_descending(|p| p.member("CreatedAt"));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post ORDER BY created_at DESC", POST_FIELDS)
    );
}

#[test]
fn test_then_by_appends() {
    let query = Query::from_table("post")
        .order_by(|p| p.member("CreatedAt"))
        .then_by(|p| p.member("Status"))
        .then_by(|p| p.member("Title"));
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM post ORDER BY created_at, status, title",
            POST_FIELDS
        )
    );
}

#[test]
fn test_mixed_directions() {
    let query = Query::from_table("post")
        .order_by_descending(|p| p.member("CreatedAt"))
        .then_by_descending(|p| p.member("Status"))
        .then_by(|p| p.member("Title"));
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM post ORDER BY created_at DESC, status DESC, title",
            POST_FIELDS
        )
    );
}

#[test]
fn test_new_order_by_resets_ordering() {
    let query = Query::from_table("post")
        .order_by(|p| p.member("CreatedAt"))
        .then_by(|p| p.member("Title"))
        .order_by_descending(|p| p.member("Status"));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post ORDER BY status DESC", POST_FIELDS)
    );
}

#[test]
fn test_order_by_after_filter() {
    let query = Query::from_table("post")
        .filter(|p| p.member("Status").eq("PUBLISHED"))
        .order_by(|p| p.member("Title"))
        .select(|p| p.member("Title"));
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE title FROM post WHERE status == \"PUBLISHED\" ORDER BY title"
    );
}

#[test]
fn test_then_by_without_order_by_is_rejected() {
    let query = Query::from_table("post").then_by(|p| p.member("Title"));
    let catalog = crate::models::catalog();
    assert!(surql_translate::translate(&query, &catalog).is_err());
}
