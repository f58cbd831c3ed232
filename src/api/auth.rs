use serde::{Deserialize, Serialize};

use crate::api::client::{classify_transport_error, error_for_status, ApiClient, ApiError};
use crate::models::session::Session;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access: String,
}

pub fn register(
    api: &ApiClient,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let request = RegisterRequest {
        username,
        email,
        password,
    };

    let response = api
        .post("/register/")
        .json(&request)
        .send()
        .map_err(classify_transport_error)?;

    error_for_status(response)?;
    Ok(())
}

pub fn login(api: &ApiClient, username: &str, password: &str) -> Result<Session, ApiError> {
    let request = LoginRequest { username, password };

    let response = api
        .post("/login/")
        .json(&request)
        .send()
        .map_err(classify_transport_error)?;

    let response = error_for_status(response)?;
    let payload: LoginResponse = response
        .json()
        .map_err(|e| ApiError::Transport(format!("Failed to decode login response: {}", e)))?;

    Ok(Session::new(payload.access, username.to_string()))
}
