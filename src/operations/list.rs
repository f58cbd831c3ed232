use crate::models::expense::{Expense, ExpenseFilter, Summary};

pub const EMPTY_STATE: &str = "No expenses found. Add your first expense with 'add'!";

// Plain-text rendering of fetched data. The command loop fetches, these bind.
pub fn format_expense_table(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut lines = Vec::with_capacity(expenses.len() + 1);
    lines.push(format!(
        "{:<10}  {:<14}  {:<30}  {:>10}  {:>6}",
        "Date", "Category", "Description", "Amount", "Id"
    ));

    for expense in expenses {
        let mut description = if expense.description.is_empty() {
            "-".to_string()
        } else {
            expense.description.clone()
        };
        if description.len() > 30 {
            description.truncate(27);
            description.push_str("...");
        }

        lines.push(format!(
            "{:<10}  {:<14}  {:<30}  {:>10}  {:>6}",
            expense.date.format("%Y-%m-%d"),
            expense.category,
            description,
            format!("${:.2}", expense.amount),
            expense.id,
        ));
    }

    lines.join("\n")
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Monthly Summary: Total Spent: ${:.2} | Total Expenses: {}",
        summary.total(),
        summary.count()
    )
}

pub fn format_filter(filter: &ExpenseFilter) -> String {
    if filter.is_empty() {
        return "Filters: (none)".to_string();
    }

    let category = filter.category.as_deref().unwrap_or("(any)");
    let from = filter
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(any)".to_string());
    let to = filter
        .end_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(any)".to_string());

    format!("Filters: category={} date={}..{}", category, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_test_expense(id: i64, amount: Decimal, description: &str) -> Expense {
        Expense {
            id,
            user: Some("alice".to_string()),
            amount,
            category: "Food".to_string(),
            description: description.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            created_at: None,
        }
    }

    #[test]
    fn test_empty_list_renders_empty_state_only() {
        let output = format_expense_table(&[]);
        assert_eq!(output, EMPTY_STATE);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_table_renders_one_row_per_expense() {
        let expenses = vec![
            create_test_expense(1, Decimal::new(1250, 2), "lunch"),
            create_test_expense(2, Decimal::new(800, 2), "bus"),
            create_test_expense(3, Decimal::new(9999, 2), "groceries"),
        ];

        let output = format_expense_table(&expenses);
        // Header plus one row per expense.
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_amounts_are_formatted_to_two_decimals() {
        let expenses = vec![create_test_expense(1, Decimal::new(125, 1), "lunch")];

        let output = format_expense_table(&expenses);
        assert!(output.contains("$12.50"));
    }

    #[test]
    fn test_empty_description_renders_dash() {
        let expenses = vec![create_test_expense(1, Decimal::new(500, 2), "")];

        let output = format_expense_table(&expenses);
        let row = output.lines().nth(1).unwrap();
        assert!(row.contains(" - "));
    }

    #[test]
    fn test_long_description_is_truncated() {
        let long = "a".repeat(60);
        let expenses = vec![create_test_expense(1, Decimal::new(500, 2), &long)];

        let output = format_expense_table(&expenses);
        assert!(output.contains("..."));
        assert!(!output.contains(&long));
    }

    #[test]
    fn test_summary_formatting() {
        let summary: Summary =
            serde_json::from_str(r#"{"total_amount": "42.10", "expense_count": 3}"#).unwrap();
        assert_eq!(
            format_summary(&summary),
            "Monthly Summary: Total Spent: $42.10 | Total Expenses: 3"
        );
    }

    #[test]
    fn test_summary_formatting_defaults() {
        let summary = Summary::default();
        assert_eq!(
            format_summary(&summary),
            "Monthly Summary: Total Spent: $0.00 | Total Expenses: 0"
        );
    }

    #[test]
    fn test_filter_line_empty_and_set() {
        assert_eq!(format_filter(&ExpenseFilter::default()), "Filters: (none)");

        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: None,
        };
        assert_eq!(
            format_filter(&filter),
            "Filters: category=Food date=2025-01-01..(any)"
        );
    }
}
