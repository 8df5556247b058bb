use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const PAGINATION_LIMIT_DEFAULT: i64 = 20;
pub const PAGINATION_LIMIT_MAX: i64 = 50;
pub const PAGINATION_OFFSET_DEFAULT: i64 = 0;

/// Listing order by creation time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    #[serde(rename = "ASC")]
    Ascending,
    #[default]
    #[serde(rename = "DESC")]
    Descending,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }

    pub fn parse_or(value: &str, default: Order) -> Self {
        match value {
            "ASC" => Order::Ascending,
            "DESC" => Order::Descending,
            _ => default,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Convert 1-based page and page size into `(limit, offset)`.
///
/// A zero size falls back to the default limit and any size above it is
/// clamped to the maximum.
pub fn paging_to_limit_offset(page: u32, size: u32) -> (i64, i64) {
    let limit = match i64::from(size) {
        0 => PAGINATION_LIMIT_DEFAULT,
        s if s > PAGINATION_LIMIT_DEFAULT => PAGINATION_LIMIT_MAX,
        s => s,
    };

    let offset = if page > 1 {
        (i64::from(page) - 1) * limit
    } else {
        PAGINATION_OFFSET_DEFAULT
    };

    (limit, offset)
}
