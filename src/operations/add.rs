use std::io;

use crate::models::expense::ExpenseDraft;

pub fn read_user_input_and_create_draft() -> Result<ExpenseDraft, String> {
    let mut details = String::new();
    io::stdin()
        .read_line(&mut details)
        .map_err(|_| "Failed to read line".to_string())?;

    create_draft(&details)
}

// Expected format: amount, category, date(YYYY-MM-DD), description(optional).
// Only presence is checked here; format errors are the server's to report.
pub fn create_draft(details: &str) -> Result<ExpenseDraft, String> {
    let detail_parts: Vec<&str> = details.trim().split(',').map(|s| s.trim()).collect();
    if detail_parts.len() < 3 || detail_parts.len() > 4 {
        return Err(format!(
            "Invalid number of details provided. Expected amount, category, date and an optional description but got {} fields",
            detail_parts.len()
        ));
    }

    let amount = detail_parts[0];
    let category = detail_parts[1];
    let date = detail_parts[2];
    let description = detail_parts.get(3).copied().unwrap_or("");

    if amount.is_empty() || category.is_empty() || date.is_empty() {
        return Err("Please fill all required fields".to_string());
    }

    Ok(ExpenseDraft::new(
        amount.to_string(),
        category.to_string(),
        description.to_string(),
        date.to_string(),
    ))
}
