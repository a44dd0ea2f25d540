use surql_translate::query_builder::{Expr, Query};
use surql_translate::query_lowering::LoweringError;
use surql_translate::surql_ir::{Constant, Kind};
use surql_translate::translator::{translate, TranslateError};

use crate::models::{catalog, to_surql, USER_FIELDS};

#[test]
fn test_method_on_function_result() {
    let query = Query::from_table("post")
        .select(|_| Expr::call("time::year", vec![Expr::call("time::now", vec![])]));
    assert_eq!(to_surql(&query), "SELECT VALUE time::now().year() FROM post");
}

#[test]
fn test_method_on_member() {
    let query = Query::from_table("post").select(|p| p.member("CreatedAt").apply("time::year", vec![]));
    assert_eq!(to_surql(&query), "SELECT VALUE created_at.year() FROM post");
}

#[test]
fn test_renamed_array_function() {
    let query = Query::from_table("order")
        .select(|o| Expr::call("array::sort_asc", vec![o.member("Products")]));
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE array::sort::asc(Products) FROM order"
    );
}

#[test]
fn test_time_from_unix() {
    let query = Query::from_table("post")
        .filter(|p| p.member("CreatedAt").gt(Expr::call("time::from_unix", vec![Expr::constant(0)])));
    assert!(to_surql(&query).ends_with("WHERE created_at > time::from::unix(0)"));
}

#[test]
fn test_duration_from_nanos() {
    let query = Query::from_table("post").select(|_| {
        Expr::call(
            "duration::from_nanos",
            vec![Expr::constant(100) * 123456789],
        )
    });
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE duration::from::nanos(100 * 123456789) FROM post"
    );
}

#[test]
fn test_vector_distance() {
    let query = Query::from_table("post").select(|_| {
        Expr::call(
            "vector::distance_euclidean",
            vec![
                Expr::array([Expr::constant(1), Expr::constant(2)]),
                Expr::array([Expr::constant(3), Expr::constant(4)]),
            ],
        )
    });
    assert_eq!(
        to_surql(&query),
        "SELECT VALUE vector::distance::euclidean([1, 2], [3, 4]) FROM post"
    );
}

#[test]
fn test_string_function() {
    let query = Query::from_table("post")
        .filter(|p| Expr::call("string::starts_with", vec![p.member("Title"), Expr::constant("How")]));
    assert!(to_surql(&query).ends_with("WHERE string::starts_with(title, \"How\")"));
}

#[test]
fn test_coalesce() {
    let query = Query::from_table("post")
        .filter(|p| p.member("Status").coalesce("DRAFT").eq("DRAFT"));
    assert!(to_surql(&query).ends_with("WHERE status ?? \"DRAFT\" == \"DRAFT\""));
}

#[test]
fn test_range_contains() {
    let query = Query::from_table("user")
        .filter(|u| Expr::range(5, Expr::constant(5) + 10).contains(u.member("Age")));
    assert_eq!(
        to_surql(&query),
        format!("SELECT {} FROM user WHERE 5..(5 + 10) CONTAINS Age", USER_FIELDS)
    );
}

#[test]
fn test_cast() {
    let query = Query::from_table("user").select(|u| u.member("Age").cast(Kind::String));
    assert_eq!(to_surql(&query), "SELECT VALUE <string> Age FROM user");
}

#[test]
fn test_builtin_constant() {
    let query = Query::from_table("user")
        .select(|u| u.member("Age") * Expr::builtin(Constant::MathPi));
    assert_eq!(to_surql(&query), "SELECT VALUE Age * math::PI FROM user");
}

#[test]
fn test_unknown_function() {
    let query = Query::from_table("post").select(|p| Expr::call("string::reverse_words", vec![p.member("Title")]));
    assert!(matches!(
        translate(&query, &catalog()),
        Err(TranslateError::Lowering(LoweringError::UnsupportedOperation(_)))
    ));
}

#[test]
fn test_wrong_arity() {
    let query = Query::from_table("post").select(|_| Expr::call("time::now", vec![Expr::constant(1)]));
    match translate(&query, &catalog()) {
        Err(TranslateError::Lowering(LoweringError::UnsupportedOperation(message))) => {
            assert!(message.contains("time::now"), "{}", message);
        }
        other => panic!("expected an arity error, got {:?}", other),
    }
}
