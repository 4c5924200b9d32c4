//! Small in-memory GET used for metadata documents.

use crate::error::{OsfError, Result};

/// Performs a GET and returns the whole response body. Follows redirects; non-2xx is an error.
///
/// Runs in the current thread.
pub fn get_bytes(url: &str) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| OsfError::transfer(url, e))?;
    easy.follow_location(true)
        .map_err(|e| OsfError::transfer(url, e))?;
    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")
        .map_err(|e| OsfError::transfer(url, e))?;
    easy.http_headers(list)
        .map_err(|e| OsfError::transfer(url, e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| OsfError::transfer(url, e))?;
        transfer
            .perform()
            .map_err(|e| OsfError::transfer(url, e))?;
    }

    let status = easy
        .response_code()
        .map_err(|e| OsfError::transfer(url, e))?;
    if !(200..300).contains(&status) {
        return Err(OsfError::Http {
            url: url.to_string(),
            status,
        });
    }
    tracing::debug!(url, bytes = body.len(), "GET complete");
    Ok(body)
}
