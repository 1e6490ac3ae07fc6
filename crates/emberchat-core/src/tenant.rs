use serde::{Deserialize, Serialize};

use crate::protocol::TenantDetectResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantIdentity {
    pub id: String,
    pub display_name: String,
    pub domain: String,
}

/// Outcome of the once-per-page-load tenant lookup. A failed lookup is cached
/// for the rest of the session; the widget mounts either way and the send
/// path decides what a missing tenant means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TenantResolution {
    Unresolved,
    Resolved { tenant: TenantIdentity },
    Failed { message: String },
}

impl TenantResolution {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    pub fn identity(&self) -> Option<&TenantIdentity> {
        match self {
            Self::Resolved { tenant } => Some(tenant),
            Self::Unresolved | Self::Failed { .. } => None,
        }
    }

    pub fn from_detect_response(response: TenantDetectResponse, lookup_domain: &str) -> Self {
        if response.status != "success" {
            return Self::Failed {
                message: format!("no tenant registered for {lookup_domain}"),
            };
        }
        let Some(record) = response.tenant else {
            return Self::Failed {
                message: format!("no tenant registered for {lookup_domain}"),
            };
        };
        Self::Resolved {
            tenant: TenantIdentity {
                id: record.id,
                display_name: record.name,
                domain: record.domain.unwrap_or_else(|| lookup_domain.to_string()),
            },
        }
    }
}

/// The key the backend expects: bare hostname, with the port appended only
/// when the host page is served from a non-default one.
pub fn host_lookup_key(hostname: &str, port: &str) -> String {
    let hostname = hostname.trim().to_ascii_lowercase();
    let port = port.trim();
    if port.is_empty() || port == "80" || port == "443" {
        hostname
    } else {
        format!("{hostname}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TenantDetectResponse;
    use serde_json::json;

    fn detect(value: serde_json::Value) -> TenantDetectResponse {
        serde_json::from_value(value).expect("detect response decodes")
    }

    #[test]
    fn lookup_key_omits_default_ports() {
        assert_eq!(host_lookup_key("Example.COM", ""), "example.com");
        assert_eq!(host_lookup_key("example.com", "80"), "example.com");
        assert_eq!(host_lookup_key("example.com", "443"), "example.com");
    }

    #[test]
    fn lookup_key_keeps_non_default_ports() {
        assert_eq!(host_lookup_key("localhost", "8080"), "localhost:8080");
    }

    #[test]
    fn success_response_resolves_identity() {
        let resolution = TenantResolution::from_detect_response(
            detect(json!({
                "status": "success",
                "tenant": { "id": "t-1", "name": "Acme", "domain": "acme.test" }
            })),
            "acme.test",
        );

        let identity = resolution.identity().expect("resolved identity");
        assert_eq!(identity.id, "t-1");
        assert_eq!(identity.display_name, "Acme");
        assert_eq!(identity.domain, "acme.test");
    }

    #[test]
    fn resolved_identity_falls_back_to_lookup_domain() {
        let resolution = TenantResolution::from_detect_response(
            detect(json!({
                "status": "success",
                "tenant": { "id": "t-1", "name": "Acme" }
            })),
            "store.acme.test",
        );

        let identity = resolution.identity().expect("resolved identity");
        assert_eq!(identity.domain, "store.acme.test");
    }

    #[test]
    fn error_status_is_a_cached_failure() {
        let resolution = TenantResolution::from_detect_response(
            detect(json!({ "status": "error" })),
            "unknown.test",
        );

        assert!(resolution.is_settled());
        assert!(resolution.identity().is_none());
        assert!(matches!(
            &resolution,
            TenantResolution::Failed { message } if message.contains("unknown.test")
        ));
    }

    #[test]
    fn success_without_tenant_record_is_a_failure() {
        let resolution = TenantResolution::from_detect_response(
            detect(json!({ "status": "success" })),
            "unknown.test",
        );
        assert!(resolution.identity().is_none());
    }
}
