//! History test suite

mod record_tests;
