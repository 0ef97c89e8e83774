//! End-to-end tests driving the full router.

#[cfg(all(test, feature = "database-sqlite"))]
mod api_e2e;
