use serde_json::json;
use surql_translate::config::TranslatorConfig;
use surql_translate::query_builder::{Expr, Literal, Query};
use surql_translate::query_lowering::LoweringError;
use surql_translate::translator::{translate, translate_with_config, TranslateError, Translator};

use crate::models::{catalog, to_surql, translate_query, USER_FIELDS};

#[test]
fn test_constant_is_inlined() {
    let query = Query::from_table("user").filter(|u| u.member("Age").ge(Expr::constant(18)));
    let translation = translate_query(&query);
    assert_eq!(
        translation.query,
        format!("SELECT {} FROM user WHERE Age >= 18", USER_FIELDS)
    );
    assert!(translation.parameters.is_empty());
}

#[test]
fn test_variable_is_bound() {
    let query = Query::from_table("user").filter(|u| u.member("Age").ge(Expr::var("minAge", 18)));
    let translation = translate_query(&query);
    assert_eq!(
        translation.query,
        format!("SELECT {} FROM user WHERE Age >= $minAge", USER_FIELDS)
    );
    assert_eq!(translation.parameters.to_json(), json!({ "minAge": 18 }));
}

#[test]
fn test_multiple_variables_keep_first_use_order() {
    let query = Query::from_table("address").filter(|a| {
        a.clone()
            .member("IsActive")
            .and(a.clone().member("Country").eq(Expr::var("country", "USA")))
            .and(a.member("City").eq(Expr::var("city", "New York")))
    });
    let translation = translate_query(&query);
    assert!(translation
        .query
        .ends_with("WHERE IsActive && Country == $country && City == $city"));
    assert_eq!(
        translation.parameters.names().collect::<Vec<_>>(),
        vec!["country", "city"]
    );
}

#[test]
fn test_member_of_object_variable() {
    let search = Literal::object([
        ("Country", Literal::from("USA")),
        ("City", Literal::from("New York")),
    ]);
    let query = Query::from_table("address").filter(|a| {
        a.clone()
            .member("Country")
            .eq(Expr::var("search", search.clone()).member("Country"))
            .and(a.member("City").eq(Expr::var("search", search).member("City")))
    });
    let translation = translate_query(&query);
    assert!(translation
        .query
        .ends_with("WHERE Country == $search.Country && City == $search.City"));
    assert_eq!(
        translation.parameters.to_json(),
        json!({ "search": { "Country": "USA", "City": "New York" } })
    );
}

#[test]
fn test_null_variable() {
    let query = Query::from_table("post").filter(|p| p.member("Status").eq(Expr::var("status", Literal::Null)));
    let translation = translate_query(&query);
    assert!(translation.query.ends_with("WHERE status == $status"));
    assert_eq!(translation.parameters.to_json(), json!({ "status": null }));
}

#[test]
fn test_reserved_names_are_prefixed() {
    let query = Query::from_table("address").filter(|a| {
        a.clone()
            .member("Country")
            .eq(Expr::var("access", "a"))
            .or(a.clone().member("Country").eq(Expr::var("auth", "b")))
            .or(a.clone().member("Country").eq(Expr::var("token", "c")))
            .or(a.member("Country").eq(Expr::var("session", "d")))
    });
    let translation = translate_query(&query);
    assert!(translation.query.ends_with(
        "WHERE Country == $_access || Country == $_auth || Country == $_token || Country == $_session"
    ));
    assert_eq!(
        translation.parameters.names().collect::<Vec<_>>(),
        vec!["_access", "_auth", "_token", "_session"]
    );
}

#[test]
fn test_custom_reserved_names() {
    let config = TranslatorConfig {
        reserved_parameter_names: vec!["region".to_string()],
        reserved_prefix: "p_".to_string(),
        ..TranslatorConfig::default()
    };
    let query = Query::from_table("address")
        .filter(|a| a.member("Country").eq(Expr::var("region", "EU")));
    let translation = Translator::with_config(&catalog(), config)
        .translate(&query)
        .unwrap();
    assert!(translation.query.ends_with("WHERE Country == $p_region"));
}

#[test]
fn test_builtin_parameter_names_are_prefixed() {
    let query = Query::from_table("user").filter(|u| {
        u.clone()
            .member("Age")
            .gt(Expr::var("this", 3))
            .and(u.member("Age").lt(Expr::var("Parent", 90)))
    });
    let translation = translate_query(&query);
    assert_eq!(
        translation.query,
        format!(
            "SELECT {} FROM user WHERE Age > $_this && Age < $_Parent",
            USER_FIELDS
        )
    );
    assert_eq!(
        translation.parameters.to_json(),
        json!({ "_this": 3, "_Parent": 90 })
    );
}

#[test]
fn test_builtin_names_stay_reserved_without_configured_names() {
    let config = TranslatorConfig {
        reserved_parameter_names: vec![],
        ..TranslatorConfig::default()
    };
    let query = Query::from_table("user").filter(|u| u.member("Age").gt(Expr::var("this", 3)));
    let translation = translate_with_config(&query, &catalog(), &config).unwrap();
    assert!(translation.query.ends_with("WHERE Age > $_this"));
    assert_eq!(translation.parameters.to_json(), json!({ "_this": 3 }));
}

#[test]
fn test_prefixed_name_taken_by_another_variable() {
    let query = Query::from_table("address").filter(|a| {
        a.clone()
            .member("Country")
            .eq(Expr::var("token", "a"))
            .or(a.member("City").eq(Expr::var("_token", "b")))
    });
    let translation = translate_query(&query);
    assert!(translation
        .query
        .ends_with("WHERE Country == $_token || City == $__token"));
    assert_eq!(
        translation.parameters.to_json(),
        json!({ "_token": "a", "__token": "b" })
    );
}

#[test]
fn test_same_variable_twice_is_bound_once() {
    let query = Query::from_table("user").filter(|u| {
        u.clone()
            .member("Age")
            .ge(Expr::var("age", 18))
            .or(u.member("Age").eq(Expr::var("age", 18)))
    });
    let translation = translate_query(&query);
    assert_eq!(translation.parameters.len(), 1);
}

#[test]
fn test_conflicting_variable_values() {
    let query = Query::from_table("user").filter(|u| {
        u.clone()
            .member("Age")
            .ge(Expr::var("age", 18))
            .and(u.member("Age").le(Expr::var("age", 65)))
    });
    assert_eq!(
        translate(&query, &catalog()),
        Err(TranslateError::Lowering(LoweringError::ConflictingParameter {
            name: "age".to_string()
        }))
    );
}

#[test]
fn test_invalid_variable_name() {
    let query = Query::from_table("user").filter(|u| u.member("Age").ge(Expr::var("min age", 18)));
    assert_eq!(
        translate(&query, &catalog()),
        Err(TranslateError::Lowering(LoweringError::InvalidParameterName {
            name: "min age".to_string()
        }))
    );
}

#[test]
fn test_parameters_of_replaced_ordering_are_dropped() {
    let query = Query::from_table("post")
        .order_by(|p| p.member("Title").eq(Expr::var("pinned", "Welcome")))
        .order_by(|p| p.member("CreatedAt"));
    let translation = translate_query(&query);
    assert!(translation.query.ends_with("ORDER BY created_at"));
    assert!(translation.parameters.is_empty());
}

#[test]
fn test_record_id_constant_is_bound() {
    let query = Query::from_table("post")
        .filter(|p| p.member("Id").eq(Expr::constant(Literal::record_id("post", "hello"))));
    let translation = translate_query(&query);
    assert!(translation.query.ends_with("WHERE id == $_rid0"));
    assert_eq!(translation.parameters.names().collect::<Vec<_>>(), vec!["_rid0"]);
}

#[test]
fn test_translation_is_deterministic() {
    let build = || {
        Query::from_table("address").filter(|a| {
            a.clone()
                .member("City")
                .eq(Expr::var("city", "Paris"))
                .and(a.member("Country").eq(Expr::var("country", "France")))
        })
    };
    let config = TranslatorConfig::default();
    let first = translate_with_config(&build(), &catalog(), &config).unwrap();
    let second = translate_with_config(&build(), &catalog(), &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(to_surql(&build()), first.query);
}
