use surql_translate::query_builder::Query;
use surql_translate::query_lowering::LoweringError;
use surql_translate::translator::{translate, TranslateError};
use test_case::test_case;

use crate::models::{catalog, to_surql, POST_FIELDS};

#[test]
fn test_count() {
    let query = Query::from_table("post").count();
    assert_eq!(to_surql(&query), "(SELECT count() FROM post GROUP ALL)[0].count");
}

#[test]
fn test_long_count() {
    let query = Query::from_table("post").long_count();
    assert_eq!(to_surql(&query), "(SELECT count() FROM post GROUP ALL)[0].count");
}

#[test]
fn test_count_with_predicate() {
    let query = Query::from_table("post").count_where(|p| p.member("Status").eq("DRAFT"));
    assert_eq!(
        to_surql(&query),
        "(SELECT count(status == \"DRAFT\") FROM post GROUP ALL)[0].count"
    );
}

#[test]
fn test_count_after_filter() {
    let query = Query::from_table("post")
        .filter(|p| p.member("Status").eq("DRAFT"))
        .count();
    assert_eq!(
        to_surql(&query),
        "(SELECT count() FROM post WHERE status == \"DRAFT\" GROUP ALL)[0].count"
    );
}

#[test]
fn test_count_of_page_wraps() {
    let query = Query::from_table("post").take(5).count();
    assert_eq!(
        to_surql(&query),
        format!(
            "(SELECT count() FROM (SELECT {} FROM post LIMIT 5) GROUP ALL)[0].count",
            POST_FIELDS
        )
    );
}

#[test_case("sum", "math::sum", "Sum" ; "sum")]
#[test_case("min", "math::min", "Min" ; "min")]
#[test_case("max", "math::max", "Max" ; "max")]
#[test_case("average", "math::mean", "Avg" ; "average")]
fn test_aggregate_of_projection(method: &str, function: &str, alias: &str) {
    let projected = Query::from_table("user").select(|u| u.member("Age"));
    let query = match method {
        "sum" => projected.sum(),
        "min" => projected.min(),
        "max" => projected.max(),
        _ => projected.average(),
    };
    assert_eq!(
        to_surql(&query),
        format!(
            "(SELECT {}(Age) AS {} FROM user GROUP ALL)[0].{}",
            function, alias, alias
        )
    );
}

#[test_case("sum", "math::sum", "Sum" ; "sum")]
#[test_case("min", "math::min", "Min" ; "min")]
#[test_case("max", "math::max", "Max" ; "max")]
#[test_case("average", "math::mean", "Avg" ; "average")]
fn test_aggregate_with_selector(method: &str, function: &str, alias: &str) {
    let users = Query::from_table("user");
    let query = match method {
        "sum" => users.sum_by(|u| u.member("Age")),
        "min" => users.min_by(|u| u.member("Age")),
        "max" => users.max_by(|u| u.member("Age")),
        _ => users.average_by(|u| u.member("Age")),
    };
    assert_eq!(
        to_surql(&query),
        format!(
            "(SELECT {}(Age) AS {} FROM user GROUP ALL)[0].{}",
            function, alias, alias
        )
    );
}

#[test]
fn test_sum_of_records_is_rejected() {
    let query = Query::from_table("user").sum();
    assert!(matches!(
        translate(&query, &catalog()),
        Err(TranslateError::Lowering(LoweringError::UnsupportedOperation(_)))
    ));
}

#[test]
fn test_array_member_aggregates() {
    let query = Query::from_table("order").select(|o| o.member("Products").count());
    assert_eq!(to_surql(&query), "SELECT VALUE array::len(Products) FROM order");
}

#[test]
fn test_aggregate_with_selector_over_array_member_is_rejected() {
    let query = Query::from_table("order")
        .select(|o| o.member("Products").sum_by(|p| p.member("Price")));
    assert!(matches!(
        translate(&query, &catalog()),
        Err(TranslateError::Lowering(LoweringError::UnsupportedOperation(_)))
    ));
}
