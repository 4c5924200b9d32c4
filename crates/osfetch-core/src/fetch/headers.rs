//! Content-Length tracking across the header blocks of a redirected response.

/// Feeds raw header lines in arrival order; keeps the `Content-Length` of the last response only.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DeclaredLength(Option<u64>);

impl DeclaredLength {
    pub(crate) fn observe(&mut self, line: &str) {
        let line = line.trim();
        // Each status line starts a new response (e.g. after a 302).
        if line.starts_with("HTTP/") {
            self.0 = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.0 = value.trim().parse::<u64>().ok();
            }
        }
    }

    /// Declared length, with a missing header reported as 0 (unknown).
    pub(crate) fn get(&self) -> u64 {
        self.0.unwrap_or(0)
    }
}
