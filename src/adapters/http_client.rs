//! Shared blocking HTTP client construction.

use crate::domain::error::MarketError;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use tracing::debug;

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; marketcharts/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Build a blocking client. The proxy, when given, applies to this client
/// only. Without one the client connects directly and ignores the
/// `HTTP(S)_PROXY` environment variables.
pub fn build_client(proxy: Option<&str>) -> Result<Client, MarketError> {
    let builder = Client::builder().user_agent(USER_AGENT);

    let builder = match proxy {
        Some(url) => {
            let proxy = reqwest::Proxy::all(url).map_err(|e| MarketError::Transport {
                url: url.to_string(),
                reason: format!("invalid proxy: {}", e),
            })?;
            debug!(proxy = url, "routing requests through proxy");
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder.build().map_err(|e| MarketError::Transport {
        url: String::new(),
        reason: format!("failed to build HTTP client: {}", e),
    })
}

/// Read the body of a response that must be `200 OK`.
pub fn read_ok_body(url: &str, response: Response) -> Result<String, MarketError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(MarketError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|e| MarketError::Transport {
        url: url.to_string(),
        reason: format!("failed to read body: {}", e),
    })
}

/// First `max_chars` characters of `text`, for logging raw payloads.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
