use surql_translate::query_builder::{Expr, Query};

use crate::models::{to_surql, translate_query, POST_FIELDS};

#[test]
fn test_skip() {
    let query = Query::from_table("post").skip(10);
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post START 10", POST_FIELDS)
    );
}

#[test]
fn test_take() {
    let query = Query::from_table("post").take(5);
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post LIMIT 5", POST_FIELDS)
    );
}

#[test]
fn test_skip_then_take() {
    let query = Query::from_table("post").skip(10).take(5);
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post LIMIT 5 START 10", POST_FIELDS)
    );
}

#[test]
fn test_skip_after_take_wraps() {
    let query = Query::from_table("post")
        .select(|p| p.member("Title"))
        .take(5)
        .skip(2);
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE $this FROM (SELECT VALUE title FROM post LIMIT 5) START 2"
    );
}

#[test]
fn test_filter_after_take_wraps() {
    let query = Query::from_table("post")
        .take(5)
        .filter(|p| p.member("Status").eq("DRAFT"));
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT Content, CreatedAt, Id, Status, Title FROM (SELECT {} FROM post LIMIT 5) WHERE Status == \"DRAFT\"",
            POST_FIELDS
        )
    );
}

#[test]
fn test_take_from_variable() {
    let query = Query::from_table("post")
        .select(|p| p.member("Title"))
        .take(Expr::var("pageSize", 20));
    let translation = translate_query(&query);
    assert_eq!(translation.query, "SELECT VALUE title FROM post LIMIT $pageSize");
    assert_eq!(translation.parameters.names().collect::<Vec<_>>(), vec!["pageSize"]);
}
