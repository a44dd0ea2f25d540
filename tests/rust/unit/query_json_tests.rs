//! Unit tests for the JSON form of builder queries, as read by the CLI

#[cfg(test)]
mod query_json_tests {
    use serde_json::json;
    use surql_translate::query_builder::{Expr, Query};

    use crate::models::{translate_query, POST_FIELDS};

    #[test]
    fn test_hand_written_query_document() {
        let document = r#"{
            "root": { "table": "user" },
            "operations": [
                { "where": {
                    "param": "u",
                    "body": { "binary": {
                        "op": "GreaterThanOrEqual",
                        "left": { "member": { "target": { "parameter": "u" }, "name": "Age" } },
                        "right": { "variable": { "name": "minAge", "value": { "type": "int32", "value": 21 } } }
                    } }
                } },
                { "select": {
                    "param": "u",
                    "body": { "member": { "target": { "parameter": "u" }, "name": "Username" } }
                } }
            ]
        }"#;

        let query: Query = serde_json::from_str(document).unwrap();
        let translation = translate_query(&query);
        assert_eq!(
            translation.query,
            "SELECT VALUE Username FROM user WHERE Age >= $minAge"
        );
        assert_eq!(translation.parameters.to_json(), json!({ "minAge": 21 }));
    }

    #[test]
    fn test_operations_default_to_empty() {
        let query: Query = serde_json::from_str(r#"{ "root": { "table": "post" } }"#).unwrap();
        assert_eq!(
            translate_query(&query).query,
            format!("SELECT {} FROM post", POST_FIELDS)
        );
    }

    #[test]
    fn test_serialized_query_translates_the_same() {
        let query = Query::from_table("post")
            .filter(|p| p.member("Status").eq(Expr::var("status", "PUBLISHED")))
            .order_by_descending(|p| p.member("CreatedAt"))
            .take(10)
            .select(|p| p.member("Title"));

        let document = serde_json::to_string(&query).unwrap();
        let parsed: Query = serde_json::from_str(&document).unwrap();
        assert_eq!(translate_query(&parsed), translate_query(&query));
    }

    #[test]
    fn test_translation_document() {
        let query = Query::from_table("post")
            .filter(|p| p.member("Status").eq(Expr::var("status", "DRAFT")))
            .count();
        let document = translate_query(&query).to_json();
        assert_eq!(
            document,
            json!({
                "query": "(SELECT count() FROM post WHERE status == $status GROUP ALL)[0].count",
                "parameters": { "status": "DRAFT" }
            })
        );
    }
}
