use surql_translate::query_builder::{Expr, Query};

use crate::models::{to_surql, POST_FIELDS, USER_FIELDS};

#[test]
fn test_filter_by_equality() {
    let query = Query::from_table("post").filter(|p| p.member("Title").eq("Title 1"));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM post WHERE title == \"Title 1\"", POST_FIELDS)
    );
}

#[test]
fn test_filter_keeps_boolean_grouping() {
    let query = Query::from_table("user").filter(|u| {
        u.clone()
            .member("IsAdmin")
            .or(u.clone().member("IsOwner"))
            .and(u.member("IsActive"))
    });
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM user WHERE (IsAdmin || IsOwner) && IsActive",
            USER_FIELDS
        )
    );
}

#[test]
fn test_successive_filters_are_anded() {
    let query = Query::from_table("post")
        .filter(|p| p.member("Title").eq("Title 1"))
        .filter(|p| p.member("Status").ne("DRAFT"));
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM post WHERE title == \"Title 1\" && status != \"DRAFT\"",
            POST_FIELDS
        )
    );
}

#[test]
fn test_successive_or_filters_keep_their_parentheses() {
    let query = Query::from_table("user")
        .filter(|u| u.member("IsActive"))
        .filter(|u| u.clone().member("IsAdmin").or(u.member("IsOwner")));
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM user WHERE IsActive && (IsAdmin || IsOwner)",
            USER_FIELDS
        )
    );
}

#[test]
fn test_negation() {
    let query = Query::from_table("user").filter(|u| !u.member("IsActive"));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM user WHERE !IsActive", USER_FIELDS)
    );
}

#[test]
fn test_arithmetic_comparison() {
    let query = Query::from_table("user").filter(|u| (u.member("Age") + 1).gt(18));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM user WHERE Age + 1 > 18", USER_FIELDS)
    );
}

#[test]
fn test_filter_after_projection_filters_projected_values() {
    let query = Query::from_table("user")
        .select(|u| u.member("Age"))
        .filter(|age| age.ge(18));
    assert_eq!(to_surql(&query), "SELECT VALUE Age FROM user WHERE Age >= 18");
}

#[test]
fn test_filter_on_nested_record_member() {
    let query = Query::from_table("order")
        .filter(|o| o.member("Address").member("Country").eq("France"))
        .select(|o| o.member("Status"));
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE Status FROM order WHERE Address.Country == \"France\""
    );
}

#[test]
fn test_filter_with_conditional() {
    let query = Query::from_table("user").filter(|u| {
        Expr::when(
            u.clone().member("IsAdmin"),
            true.into(),
            Expr::when(u.clone().member("IsOwner"), u.member("IsActive"), false.into()),
        )
    });
    assert_eq!(
        to_surql(&query),
        format!(
            "SELECT {} FROM user WHERE IF IsAdmin THEN true ELSE IF IsOwner THEN IsActive ELSE false END",
            USER_FIELDS
        )
    );
}
