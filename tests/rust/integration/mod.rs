//! Integration tests - builder queries translated end to end against the test models
//!
//! Every test goes through the public `translate` entry point and checks the exact
//! SurrealQL text and parameter table.

#[path = "../common/models.rs"]
mod models;

mod aggregating_tests;
mod filtering_tests;
mod function_tests;
mod nested_tests;
mod ordering_tests;
mod pagination_tests;
mod parameter_tests;
mod schema_file_tests;
