//! Integration test harness.

mod helpers;

mod auth_test;
mod ws_test;
