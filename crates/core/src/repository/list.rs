use std::fmt;
use std::str::FromStr;

use devshare_error::{Error, Result, domain};

/// Default page size when the caller sets none
pub const DEFAULT_LIMIT: i64 = 50;

/// Columns a listing may be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(domain::invalid_input("sort_by", format!("unknown column {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(domain::invalid_input("order", format!("expected ASC or DESC, got {other}"))),
        }
    }
}

/// Paging and ordering for list queries. Only whitelisted columns and
/// keywords ever reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListOptions {
    /// Apply defaults to unset (or zero) values, then validate the rest.
    pub fn new(
        limit: Option<i64>,
        offset: Option<i64>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self> {
        let limit = match limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(l) if l < 0 => return Err(domain::invalid_input("limit", "must not be negative")),
            Some(l) => l,
        };
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(domain::invalid_input("offset", "must not be negative"));
        }

        Ok(Self {
            limit,
            offset,
            sort_by: sort_by
                .filter(|s| !s.is_empty())
                .map(str::parse::<SortField>)
                .transpose()?
                .unwrap_or_default(),
            order: order
                .filter(|s| !s.is_empty())
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// `ORDER BY` clause body, e.g. `created_at DESC`
    pub fn order_clause(&self) -> String {
        format!("{} {}", self.sort_by.column(), self.order.keyword())
    }
}

impl fmt::Display for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} limit {} offset {}",
            self.order_clause(),
            self.limit,
            self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let opts = ListOptions::new(None, None, None, None).unwrap();
        assert_eq!(opts, ListOptions::default());
        assert_eq!(opts.order_clause(), "created_at DESC");

        let zero = ListOptions::new(Some(0), Some(0), Some(""), Some("")).unwrap();
        assert_eq!(zero.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_explicit_values() {
        let opts = ListOptions::new(Some(10), Some(20), Some("name"), Some("ASC")).unwrap();
        assert_eq!(opts.to_string(), "name ASC limit 10 offset 20");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ListOptions::new(Some(-1), None, None, None).unwrap_err().is_invalid_input());
        assert!(ListOptions::new(None, Some(-5), None, None).unwrap_err().is_invalid_input());
        assert!(
            ListOptions::new(None, None, Some("password; DROP TABLE users"), None)
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(ListOptions::new(None, None, None, Some("asc")).unwrap_err().is_invalid_input());
    }
}
