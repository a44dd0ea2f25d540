//! Unit tests for catalog registration and catalog-bound queries

#[cfg(test)]
mod catalog_tests {
    use surql_translate::query_lowering::LoweringError;
    use surql_translate::schema_catalog::{FieldSchema, RecordSchema, SchemaCatalog, SchemaError};
    use surql_translate::translator::{translate, TranslateError};

    use crate::models::{catalog, Post, User, USER_FIELDS};

    #[test]
    fn test_tables_are_listed_sorted() {
        assert_eq!(
            catalog().tables(),
            vec!["address", "order", "post", "product", "user"]
        );
    }

    #[test]
    fn test_registering_a_type_twice_is_a_no_op() {
        let mut catalog = SchemaCatalog::new();
        catalog.register::<User>().unwrap();
        catalog.register::<User>().unwrap();
        assert_eq!(catalog.tables(), vec!["user"]);
    }

    #[test]
    fn test_conflicting_schema_for_same_table() {
        let mut catalog = SchemaCatalog::new();
        catalog.register::<User>().unwrap();
        let other = RecordSchema::new("user", vec![FieldSchema::id()]).unwrap();
        assert!(matches!(
            catalog.register_schema(other),
            Err(SchemaError::DuplicateTable { .. })
        ));
    }

    #[test]
    fn test_dangling_record_member_fails_validation() {
        let mut catalog = SchemaCatalog::new();
        catalog
            .register_schema(
                RecordSchema::new(
                    "order",
                    vec![FieldSchema::id(), FieldSchema::new("Address").record("address")],
                )
                .unwrap(),
            )
            .unwrap();
        assert!(matches!(
            catalog.validate(),
            Err(SchemaError::UnknownRecordReference { .. })
        ));
    }

    #[test]
    fn test_bound_query_translates_against_its_catalog() {
        let catalog = catalog();
        let query = catalog.query::<User>().filter(|u| u.member("IsActive"));
        let translation = translate(&query, &catalog).unwrap();
        assert_eq!(
            translation.query,
            format!("SELECT {} FROM user WHERE IsActive", USER_FIELDS)
        );
    }

    #[test]
    fn test_bound_query_rejected_by_other_catalog() {
        let query = catalog().query::<Post>();
        assert!(matches!(
            translate(&query, &catalog()),
            Err(TranslateError::Lowering(LoweringError::InvalidTableReference(_)))
        ));
    }

    #[test]
    fn test_query_by_table_name() {
        let catalog = catalog();
        let query = catalog
            .query_table("product")
            .select(|p| p.member("Name"));
        assert_eq!(
            translate(&query, &catalog).unwrap().query,
            "SELECT VALUE Name FROM product"
        );
    }
}
