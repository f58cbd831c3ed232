use crate::api::client::{classify_transport_error, error_for_status, ApiClient, ApiError};
use crate::models::expense::{Expense, ExpenseDraft, ExpenseFilter, Summary};
use crate::models::session::Session;

pub fn list_expenses(
    api: &ApiClient,
    session: &Session,
    filter: &ExpenseFilter,
) -> Result<Vec<Expense>, ApiError> {
    let mut request = api.get("/expenses/").bearer_auth(&session.token);

    let pairs = filter.query_pairs();
    if !pairs.is_empty() {
        request = request.query(&pairs);
    }

    let response = request.send().map_err(classify_transport_error)?;
    let response = error_for_status(response)?;

    response
        .json()
        .map_err(|e| ApiError::Transport(format!("Failed to decode expenses: {}", e)))
}

pub fn add_expense(
    api: &ApiClient,
    session: &Session,
    draft: &ExpenseDraft,
) -> Result<Expense, ApiError> {
    let response = api
        .post("/expenses/")
        .bearer_auth(&session.token)
        .json(draft)
        .send()
        .map_err(classify_transport_error)?;

    let response = error_for_status(response)?;

    response
        .json()
        .map_err(|e| ApiError::Transport(format!("Failed to decode created expense: {}", e)))
}

pub fn delete_expense(api: &ApiClient, session: &Session, id: i64) -> Result<(), ApiError> {
    let response = api
        .delete(&format!("/expenses/{}/", id))
        .bearer_auth(&session.token)
        .send()
        .map_err(classify_transport_error)?;

    error_for_status(response)?;
    Ok(())
}

pub fn get_summary(api: &ApiClient, session: &Session) -> Result<Summary, ApiError> {
    let response = api
        .get("/expenses/summary/")
        .bearer_auth(&session.token)
        .send()
        .map_err(classify_transport_error)?;

    let response = error_for_status(response)?;

    response
        .json()
        .map_err(|e| ApiError::Transport(format!("Failed to decode summary: {}", e)))
}
