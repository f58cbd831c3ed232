use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Category choices the server accepts. Shown as a hint when adding;
// the server is the one that rejects anything else.
pub const CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Bills",
    "Other",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default)]
    pub user: Option<String>,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// Raw field set for a new expense. Fields stay strings on purpose:
// the client checks presence only, format errors are the server's to report.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseDraft {
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl ExpenseDraft {
    pub fn new(amount: String, category: String, description: String, date: String) -> Self {
        Self {
            amount,
            category,
            description,
            date,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    // Query pairs for the list endpoint, one per set filter.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref category) = self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

// Both fields can come back null or missing; the renderers fall back to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub expense_count: Option<u64>,
}

impl Summary {
    pub fn total(&self) -> Decimal {
        self.total_amount.unwrap_or(Decimal::ZERO)
    }

    pub fn count(&self) -> u64 {
        self.expense_count.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_filter_query_pairs_empty() {
        let filter = ExpenseFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn test_filter_query_pairs_all_set() {
        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        };

        let pairs = filter.query_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("category", "Food".to_string()));
        assert_eq!(pairs[1], ("start_date", "2025-01-01".to_string()));
        assert_eq!(pairs[2], ("end_date", "2025-01-31".to_string()));
    }

    #[test]
    fn test_filter_query_pairs_partial() {
        let filter = ExpenseFilter {
            category: None,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: None,
        };

        let pairs = filter.query_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "start_date");
    }

    #[test]
    fn test_expense_parses_server_payload() {
        // Amounts arrive as strings, dates as YYYY-MM-DD.
        let body = r#"{
            "id": 7,
            "user": "alice",
            "amount": "12.50",
            "category": "Food",
            "description": "lunch",
            "date": "2025-01-15",
            "created_at": "2025-01-15T10:30:00.123456Z"
        }"#;

        let expense: Expense = serde_json::from_str(body).unwrap();
        assert_eq!(expense.id, 7);
        assert_eq!(expense.amount, Decimal::from_str("12.50").unwrap());
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(expense.user.as_deref(), Some("alice"));
        assert!(expense.created_at.is_some());
    }

    #[test]
    fn test_expense_parses_without_optional_fields() {
        let body = r#"{"id": 1, "amount": "3.00", "category": "Other", "date": "2025-02-01"}"#;

        let expense: Expense = serde_json::from_str(body).unwrap();
        assert_eq!(expense.description, "");
        assert!(expense.user.is_none());
        assert!(expense.created_at.is_none());
    }

    #[test]
    fn test_summary_defaults_to_zero() {
        let summary: Summary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.total(), Decimal::ZERO);
        assert_eq!(summary.count(), 0);
    }

    #[test]
    fn test_summary_handles_null_fields() {
        let summary: Summary =
            serde_json::from_str(r#"{"total_amount": null, "expense_count": null}"#).unwrap();
        assert_eq!(summary.total(), Decimal::ZERO);
        assert_eq!(summary.count(), 0);
    }

    #[test]
    fn test_summary_parses_values() {
        let summary: Summary =
            serde_json::from_str(r#"{"total_amount": "120.75", "expense_count": 4}"#).unwrap();
        assert_eq!(summary.total(), Decimal::from_str("120.75").unwrap());
        assert_eq!(summary.count(), 4);
    }
}
