use serde::Serialize;

/// Failure classes the runtime distinguishes. Environment failures never get
/// this far; they are logged and swallowed before any error value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Timeout,
    Backend,
    Decode,
    TenantUnresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetApiError {
    pub status_code: u16,
    pub kind: ErrorKind,
    pub message: String,
}

impl WidgetApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            kind: ErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn decode(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            kind: ErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn backend(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            kind: ErrorKind::Backend,
            message: message.into(),
        }
    }

    pub fn tenant_unresolved(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            kind: ErrorKind::TenantUnresolved,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Timeout)
    }

    /// The text rendered into the conversation as a system-error message.
    /// Transport failures name the backend address so the site owner can
    /// diagnose a misconfigured embed from the page itself.
    pub fn user_facing_text(&self, api_url: &str) -> String {
        match self.kind {
            ErrorKind::Network => format!(
                "Unable to reach the chat service at {api_url}. Please check your connection and try again."
            ),
            ErrorKind::Timeout => {
                format!("The chat service at {api_url} took too long to respond. Please try again.")
            }
            ErrorKind::Backend | ErrorKind::Decode => {
                if self.message.trim().is_empty() {
                    "The chat service returned an error. Please try again later.".to_string()
                } else {
                    format!("The chat service returned an error: {}", self.message)
                }
            }
            ErrorKind::TenantUnresolved => {
                "This chat widget is not configured for this website yet. Please contact the site owner."
                    .to_string()
            }
        }
    }
}

impl std::fmt::Display for WidgetApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (status={}, kind={:?})",
            self.message, self.status_code, self.kind
        )
    }
}

/// Maps a non-success HTTP response to a classified error, preferring the
/// backend's own detail text when one was decodable.
pub fn classify_status(status_code: u16, detail: Option<&str>) -> WidgetApiError {
    let message = detail
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("request failed with status {status_code}"));

    if status_code == 0 {
        WidgetApiError::network(message)
    } else {
        WidgetApiError::backend(status_code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_keeps_backend_detail() {
        let error = classify_status(500, Some("vector store offline"));
        assert_eq!(error.kind, ErrorKind::Backend);
        assert_eq!(error.status_code, 500);
        assert_eq!(error.message, "vector store offline");
    }

    #[test]
    fn classify_synthesizes_generic_detail() {
        let error = classify_status(502, None);
        assert_eq!(error.message, "request failed with status 502");
    }

    #[test]
    fn classify_status_zero_is_network() {
        let error = classify_status(0, Some("connection refused"));
        assert_eq!(error.kind, ErrorKind::Network);
        assert!(error.is_transport());
    }

    #[test]
    fn transport_text_names_backend_address() {
        let error = WidgetApiError::network("connection refused");
        let text = error.user_facing_text("https://x.test");
        assert!(text.contains("https://x.test"));
    }

    #[test]
    fn timeout_text_names_backend_address() {
        let error = WidgetApiError::timeout("no response within deadline");
        let text = error.user_facing_text("https://x.test");
        assert!(text.contains("https://x.test"));
    }

    #[test]
    fn backend_text_prefers_raw_detail() {
        let error = WidgetApiError::backend(500, "index rebuild in progress");
        let text = error.user_facing_text("https://x.test");
        assert!(text.contains("index rebuild in progress"));
    }

    #[test]
    fn tenant_text_points_at_site_owner() {
        let error = WidgetApiError::tenant_unresolved("no tenant for host");
        let text = error.user_facing_text("https://x.test");
        assert!(text.contains("site owner"));
    }
}
