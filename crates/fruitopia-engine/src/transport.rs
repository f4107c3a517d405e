use fruitopia_contracts::vision::ImageUpload;
use reqwest::blocking::multipart::{Form as MultipartForm, Part as MultipartPart};
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty body")]
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Body {
    pub fn json(&self) -> Result<Value, FetchError> {
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::EmptyBody);
        }
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}

/// The only way the client reaches the backend. Every call is a single
/// attempt; retries and caching are deliberately absent.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Body, FetchError>;
    fn post_json(&self, url: &str, payload: &Value) -> Result<Body, FetchError>;
    fn post_file(&self, url: &str, field: &str, upload: &ImageUpload)
        -> Result<Body, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Body, FetchError> {
        log::debug!("GET {url}");
        body_or_error(self.http.get(url).send()?)
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Body, FetchError> {
        log::debug!("POST {url}");
        body_or_error(self.http.post(url).json(payload).send()?)
    }

    fn post_file(
        &self,
        url: &str,
        field: &str,
        upload: &ImageUpload,
    ) -> Result<Body, FetchError> {
        log::debug!("POST {url} ({} bytes as '{field}')", upload.bytes.len());
        let part = MultipartPart::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)?;
        let form = MultipartForm::new().part(field.to_string(), part);
        body_or_error(self.http.post(url).multipart(form).send()?)
    }
}

fn body_or_error(response: HttpResponse) -> Result<Body, FetchError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes()?.to_vec();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: truncate_text(&String::from_utf8_lossy(&bytes), 512),
        });
    }
    Ok(Body {
        bytes,
        content_type,
    })
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{truncate_text, Body, FetchError};

    #[test]
    fn blank_body_is_empty_not_invalid() {
        let body = Body {
            bytes: b"  \n".to_vec(),
            content_type: None,
        };
        assert!(matches!(body.json(), Err(FetchError::EmptyBody)));
    }

    #[test]
    fn html_body_is_invalid_json() {
        let body = Body {
            bytes: b"<!doctype html><app-root></app-root>".to_vec(),
            content_type: Some("text/html".to_string()),
        };
        assert!(matches!(body.json(), Err(FetchError::Json(_))));
    }

    #[test]
    fn json_body_parses() -> anyhow::Result<()> {
        let body = Body {
            bytes: br#"{"samples": ["a.jpg"]}"#.to_vec(),
            content_type: Some("application/json".to_string()),
        };
        assert_eq!(body.json()?, json!({"samples": ["a.jpg"]}));
        Ok(())
    }

    #[test]
    fn truncate_text_marks_cut() {
        assert_eq!(truncate_text("abcdef", 3), "abc…");
        assert_eq!(truncate_text("abc", 3), "abc");
    }
}
