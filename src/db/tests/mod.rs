//! Database repository tests
//!
//! Each repository has a test module containing shared test functions that
//! take the repositories they exercise, plus a `sqlite_tests` module running
//! them against fresh in-memory databases.

mod labels;
