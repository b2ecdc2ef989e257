use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::time::current_period;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// Paging and sorting parameters understood by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub direction: Direction,
}

impl PageQuery {
    pub fn new(sort_by: &str, direction: Direction) -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: sort_by.to_string(),
            direction,
        }
    }

    /// Newest first, the default ordering of debts, goals and deposits.
    pub fn newest() -> Self {
        Self::new("createdAt", Direction::Desc)
    }

    /// Alphabetical, the default ordering of categories, income sources and accounts.
    pub fn by_name() -> Self {
        Self::new("name", Direction::Asc)
    }

    pub fn with_page(mut self, page: u64, size: u64) -> Self {
        self.page = page;
        self.size = size;
        self
    }
}

/// Period filter of the expense and income filter endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterType {
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    #[serde(rename = "type")]
    pub kind: FilterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub direction: Direction,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            kind: FilterType::Month,
            year: None,
            month: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: String::from("creationDate"),
            direction: Direction::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeFilter {
    #[serde(rename = "type")]
    pub kind: FilterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub direction: Direction,
}

impl Default for IncomeFilter {
    fn default() -> Self {
        Self {
            kind: FilterType::Month,
            year: None,
            month: None,
            source_name: None,
            account_type: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: String::from("creationDate"),
            direction: Direction::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncomesVsExpensesQuery {
    pub months: u32,
    /// `YYYY-MM`
    pub period: String,
}

impl Default for IncomesVsExpensesQuery {
    fn default() -> Self {
        Self {
            months: 6,
            period: current_period(),
        }
    }
}

/// Plain `page`/`size` paging, used by the debt payments and the simple list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePage {
    pub page: u64,
    pub size: u64,
}

impl Default for SimplePage {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_encoding() {
        let query = PageQuery::newest();
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded["sortBy"], "createdAt");
        assert_eq!(encoded["direction"], "desc");
        assert_eq!(encoded["size"], 20);

        let filter = ExpenseFilter {
            year: Some(2025),
            month: Some(6),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&filter).unwrap();
        assert_eq!(encoded["type"], "MONTH");
        assert_eq!(encoded["year"], 2025);
        assert_eq!(encoded["direction"], "asc");

        let filter = IncomeFilter::default();
        let encoded = serde_json::to_value(&filter).unwrap();
        assert!(encoded.get("sourceName").is_none());
        assert_eq!(encoded["sortBy"], "creationDate");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PageQuery::by_name().sort_by, "name");
        assert_eq!(PageQuery::by_name().direction, Direction::Asc);
        assert_eq!(IncomesVsExpensesQuery::default().months, 6);
        assert_eq!(SimplePage::default().size, 10);
    }
}
