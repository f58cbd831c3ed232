use std::fmt;

// The two failure classes the client distinguishes. Transport failures get a
// generic message; server-reported failures carry the response body verbatim.
#[derive(Debug)]
pub enum ApiError {
    Transport(String),
    Status { status: u16, body: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(message) => write!(f, "{}", message),
            ApiError::Status { status, body } => {
                if body.trim().is_empty() {
                    write!(f, "HTTP {}", status)
                } else {
                    write!(f, "{}", body)
                }
            }
        }
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http.post(self.url(path))
    }

    pub fn delete(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http.delete(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn classify_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Transport(format!("Request timed out: {}", error))
    } else if error.is_connect() {
        ApiError::Transport(format!("Connection failed: {}", error))
    } else {
        ApiError::Transport(format!("Network error: {}", error))
    }
}

// Resolve a response into Ok(2xx) or the server-reported error class.
pub fn error_for_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let api = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(api.url("/expenses/"), "http://localhost:8000/api/expenses/");
    }

    #[test]
    fn test_url_joins_path() {
        let api = ApiClient::new("http://localhost:8000/api");
        assert_eq!(api.url("/login/"), "http://localhost:8000/api/login/");
    }

    #[test]
    fn test_status_error_displays_body_verbatim() {
        let error = ApiError::Status {
            status: 400,
            body: r#"{"amount":["A valid number is required."]}"#.to_string(),
        };
        assert_eq!(
            error.to_string(),
            r#"{"amount":["A valid number is required."]}"#
        );
    }

    #[test]
    fn test_status_error_without_body_shows_code() {
        let error = ApiError::Status {
            status: 500,
            body: "  ".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 500");
    }

    #[test]
    fn test_transport_error_displays_message() {
        let error = ApiError::Transport("Connection failed: refused".to_string());
        assert_eq!(error.to_string(), "Connection failed: refused");
    }
}
