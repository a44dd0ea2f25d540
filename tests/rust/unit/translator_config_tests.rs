//! Unit tests for translator configuration files

#[cfg(test)]
mod translator_config_tests {
    use std::io::Write;

    use surql_translate::config::TranslatorConfig;
    use surql_translate::query_builder::{Expr, Literal, Query};
    use surql_translate::translator::Translator;
    use tempfile::NamedTempFile;

    use crate::models::catalog;

    fn config_file(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = config_file("reserved_prefix: x_\n");
        let config = TranslatorConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.reserved_prefix, "x_");
        assert_eq!(
            config.reserved_parameter_names,
            TranslatorConfig::default().reserved_parameter_names
        );
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let file = config_file("reserved_parameter_names: [\"not valid\"]\n");
        assert!(TranslatorConfig::from_yaml_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(TranslatorConfig::from_yaml_file("/nonexistent/translator.yaml").is_err());
    }

    #[test]
    fn test_file_overrides_defaults_when_merged() {
        let file = config_file(
            "reserved_parameter_names: [tenant]\nreserved_prefix: q_\nrecord_id_parameter_prefix: rec\n",
        );
        let mut config = TranslatorConfig::default();
        config.merge(TranslatorConfig::from_yaml_file(file.path()).unwrap());

        let catalog = catalog();
        let translator = Translator::with_config(&catalog, config);
        let query = Query::from_table("post").filter(|p| {
            p.clone()
                .member("Status")
                .eq(Expr::var("tenant", "acme"))
                .and(p.member("Id").eq(Expr::constant(Literal::record_id("post", "first"))))
        });
        let translation = translator.translate(&query).unwrap();
        assert!(translation
            .query
            .ends_with("WHERE status == $q_tenant && id == $rec0"));
        assert_eq!(
            translation.parameters.names().collect::<Vec<_>>(),
            vec!["q_tenant", "rec0"]
        );
    }

    #[test]
    fn test_default_reserved_names_are_still_usable_when_not_configured() {
        let file = config_file("reserved_parameter_names: []\n");
        let config = TranslatorConfig::from_yaml_file(file.path()).unwrap();
        let catalog = catalog();
        let query = Query::from_table("post")
            .filter(|p| p.member("Status").eq(Expr::var("session", "s1")));
        let translation = Translator::with_config(&catalog, config)
            .translate(&query)
            .unwrap();
        assert!(translation.query.ends_with("WHERE status == $session"));
    }
}
