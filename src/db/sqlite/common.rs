use chrono::{DateTime, Utc};
use sqlx::{Sqlite, query::Query, sqlite::SqliteArguments};
use uuid::Uuid;

use crate::db::error::{DbError, DbResult};

/// Parse a UUID string from the database, returning a DbError on failure
pub fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::Internal(format!("Invalid UUID in database: {}", e)))
}

/// Parse a nullable UUID column
pub fn parse_optional_uuid(s: Option<String>) -> DbResult<Option<Uuid>> {
    s.as_deref().map(parse_uuid).transpose()
}

/// Parse a JSON string-array column such as `products.variants`
pub fn parse_string_list(s: &str) -> DbResult<Vec<String>> {
    Ok(serde_json::from_str(s)?)
}

/// Comma-separated `?` placeholders for an IN list
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// A value bound to a dynamically built statement.
#[derive(Debug, Clone)]
pub enum SqlArg {
    Text(String),
    Time(DateTime<Utc>),
}

impl From<Uuid> for SqlArg {
    fn from(id: Uuid) -> Self {
        SqlArg::Text(id.to_string())
    }
}

/// Bind arguments in order onto a query built with `?` placeholders.
pub fn bind_args<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &[SqlArg],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Text(s) => query.bind(s.clone()),
            SqlArg::Time(t) => query.bind(*t),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }

    #[test]
    fn test_parse_string_list() {
        assert_eq!(
            parse_string_list(r#"["128GB","256GB"]"#).unwrap(),
            vec!["128GB".to_string(), "256GB".to_string()]
        );
        assert!(parse_string_list("not json").is_err());
    }

    #[test]
    fn test_parse_optional_uuid() {
        assert_eq!(parse_optional_uuid(None).unwrap(), None);
        let id = Uuid::new_v4();
        assert_eq!(parse_optional_uuid(Some(id.to_string())).unwrap(), Some(id));
        assert!(parse_optional_uuid(Some("nope".into())).is_err());
    }
}
