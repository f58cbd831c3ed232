pub mod auth;
pub mod client;
pub mod expenses;

pub use client::{ApiClient, ApiError};
