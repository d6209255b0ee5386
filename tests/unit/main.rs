//! Unit tests for individual components

mod error_test;
mod action_log_test;
mod config_test;
mod util_test;
mod builders_test;
mod repository_test;
