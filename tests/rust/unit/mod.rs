//! Unit tests - catalogs, query documents and translator configuration

#[path = "../common/models.rs"]
mod models;

mod catalog_tests;
mod query_json_tests;
mod translator_config_tests;
