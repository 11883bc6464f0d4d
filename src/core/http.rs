use std::time::Duration;

use reqwest::{
    blocking::{
        Client,
        Response,
    },
    header::{
        ACCEPT_ENCODING,
        USER_AGENT,
    },
};

use crate::core::DashboardError;

const MAX_ATTEMPTS: usize = 3;

pub fn http_client(timeout_secs: u64) -> Result<Client, DashboardError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DashboardError::Custom(format!("HTTP client build failed: {e}")))
}

/// GET `url` and return the body, retrying transport failures and empty bodies.
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>, DashboardError> {
    let mut attempts: usize = 0;
    loop {
        attempts += 1;

        let resp = client
            .get(url)
            .header(USER_AGENT, "sentiment-dashboard/0.1 (+reqwest)")
            .header(ACCEPT_ENCODING, "identity")
            .send();

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                if attempts < MAX_ATTEMPTS {
                    log::warn!("[HTTP] GET {} failed (attempt {}): {}", url, attempts, e);
                    std::thread::sleep(Duration::from_secs(2 * attempts as u64));
                    continue;
                }
                return Err(DashboardError::Custom(format!("Failed HTTP GET {}: {}", url, e)));
            }
        };

        ensure_success(&resp)?;

        let failure = match resp.bytes() {
            Ok(body) if !body.is_empty() => return Ok(body.to_vec()),
            Ok(_) => "empty body".to_string(),
            Err(e) => e.to_string(),
        };

        if attempts < MAX_ATTEMPTS {
            log::warn!("[HTTP] Reading body from {} failed (attempt {}): {}", url, attempts, failure);
            std::thread::sleep(Duration::from_secs(2 * attempts as u64));
            continue;
        }
        return Err(DashboardError::Custom(format!(
            "Failed to read response body from {}: {}",
            url, failure
        )));
    }
}

fn ensure_success(resp: &Response) -> Result<(), DashboardError> {
    if !resp.status().is_success() {
        return Err(DashboardError::Custom(format!(
            "HTTP error {} from {}",
            resp.status(),
            resp.url()
        )));
    }
    Ok(())
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
