use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on supporting documents requested per retrieval-augmented
/// turn.
pub const MAX_RAG_DOCUMENTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TenantDetectResponse {
    pub status: String,
    #[serde(default)]
    pub tenant: Option<TenantRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TenantRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Body for `POST /api/chat/public`, the generic single-tenant endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicChatRequest {
    pub message: String,
    pub conversation_id: String,
    pub use_rag: bool,
    pub max_documents: u32,
}

impl PublicChatRequest {
    pub fn new(message: &str, conversation_id: &str) -> Self {
        Self {
            message: message.to_string(),
            conversation_id: conversation_id.to_string(),
            use_rag: true,
            max_documents: MAX_RAG_DOCUMENTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicChatResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Value>,
    #[serde(default)]
    pub rag_used: Option<bool>,
}

/// Body for `POST /api/chat/by-domain`, the multi-tenant endpoint routed by
/// host domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainChatRequest {
    pub message: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainChatResponse {
    pub status: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Vec<Value>,
}

impl DomainChatResponse {
    /// The by-domain endpoint reports tenant-level failures inside a 200
    /// body; a non-success status is a backend error even when the HTTP
    /// layer succeeded.
    pub fn into_reply(self) -> Result<String, String> {
        let Self {
            status, response, ..
        } = self;
        match (status.as_str(), response) {
            ("success", Some(reply)) => Ok(reply),
            ("success", None) => Err("chat response was missing its reply text".to_string()),
            (_, detail) => Err(detail
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or_else(|| format!("chat request failed with status {status:?}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn best_detail(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|detail| !detail.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn public_request_carries_rag_defaults() {
        let request = PublicChatRequest::new("hi", "conv-1");
        let body = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(
            body,
            json!({
                "message": "hi",
                "conversation_id": "conv-1",
                "use_rag": true,
                "max_documents": 5,
            })
        );
    }

    #[test]
    fn public_response_tolerates_missing_optionals() {
        let response: PublicChatResponse =
            serde_json::from_value(json!({ "response": "Hello" })).expect("response decodes");
        assert_eq!(response.response, "Hello");
        assert!(response.sources.is_empty());
        assert!(response.rag_used.is_none());
    }

    #[test]
    fn public_response_keeps_sources() {
        let response: PublicChatResponse = serde_json::from_value(json!({
            "response": "Hello",
            "sources": [{ "title": "Handbook", "page": 3 }],
            "rag_used": true,
        }))
        .expect("response decodes");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.rag_used, Some(true));
    }

    #[test]
    fn domain_reply_requires_success_status() {
        let response: DomainChatResponse = serde_json::from_value(json!({
            "status": "success",
            "response": "Hello",
        }))
        .expect("response decodes");
        assert_eq!(response.into_reply().expect("reply text"), "Hello");

        let response: DomainChatResponse = serde_json::from_value(json!({
            "status": "error",
            "response": "tenant suspended",
        }))
        .expect("response decodes");
        let detail = response.into_reply().expect_err("error detail");
        assert_eq!(detail, "tenant suspended");
    }

    #[test]
    fn domain_reply_synthesizes_detail_when_body_is_bare() {
        let response: DomainChatResponse =
            serde_json::from_value(json!({ "status": "error" })).expect("response decodes");
        let detail = response.into_reply().expect_err("error detail");
        assert!(detail.contains("error"));
    }

    #[test]
    fn error_body_prefers_detail_field() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "detail": "rate limited",
            "message": "secondary",
        }))
        .expect("error body decodes");
        assert_eq!(body.best_detail(), Some("rate limited"));
    }

    #[test]
    fn error_body_without_fields_has_no_detail() {
        let body: ApiErrorBody = serde_json::from_value(json!({})).expect("error body decodes");
        assert!(body.best_detail().is_none());
    }
}
