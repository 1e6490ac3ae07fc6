use emberchat_core::error::{WidgetApiError, classify_status};
use emberchat_core::protocol::{
    ApiErrorBody, DomainChatRequest, DomainChatResponse, PublicChatRequest, PublicChatResponse,
    TenantDetectResponse,
};
use emberchat_core::tenant::host_lookup_key;
use futures_util::FutureExt;
use futures_util::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::sleep;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::*;

/// The tenant lookup key for the current host page: hostname plus the port
/// when it is a non-default one.
pub(super) fn host_domain() -> String {
    let Some(location) = web_sys::window().map(|window| window.location()) else {
        return String::new();
    };
    let hostname = location.hostname().unwrap_or_default();
    let port = location.port().unwrap_or_default();
    host_lookup_key(&hostname, &port)
}

pub(super) async fn fetch_tenant(
    api_url: &str,
    domain: &str,
) -> Result<TenantDetectResponse, WidgetApiError> {
    let url = format!(
        "{api_url}{TENANT_DETECT_PATH}?domain={}",
        url_encode(domain)
    );
    let request = Request::get(&url);
    let response = with_timeout(async move { request.send().await.map_err(map_network_error) }).await?;
    decode_json_response(response).await
}

pub(super) async fn post_public_chat(
    api_url: &str,
    body: &PublicChatRequest,
) -> Result<PublicChatResponse, WidgetApiError> {
    post_json(&format!("{api_url}{PUBLIC_CHAT_PATH}"), body).await
}

pub(super) async fn post_domain_chat(
    api_url: &str,
    body: &DomainChatRequest,
) -> Result<DomainChatResponse, WidgetApiError> {
    post_json(&format!("{api_url}{DOMAIN_CHAT_PATH}"), body).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
) -> Result<T, WidgetApiError> {
    let body = serde_json::to_string(body).map_err(|error| {
        WidgetApiError::decode(0, format!("failed to serialize request body: {error}"))
    })?;
    let request = Request::post(url)
        .header("content-type", "application/json")
        .body(body)
        .map_err(|error| {
            WidgetApiError::decode(0, format!("failed to build request body: {error}"))
        })?;

    let response = with_timeout(async move { request.send().await.map_err(map_network_error) }).await?;
    decode_json_response(response).await
}

/// Every request races a fixed deadline so a hung connection resolves into
/// the normal failure path instead of leaving the typing indicator up
/// forever.
async fn with_timeout<T>(
    request: impl Future<Output = Result<T, WidgetApiError>>,
) -> Result<T, WidgetApiError> {
    let request = std::pin::pin!(request.fuse());
    let deadline = std::pin::pin!(sleep(REQUEST_TIMEOUT).fuse());

    match select(request, deadline).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(WidgetApiError::timeout(format!(
            "no response within {} seconds",
            REQUEST_TIMEOUT.as_secs()
        ))),
    }
}

fn map_network_error(error: gloo_net::Error) -> WidgetApiError {
    WidgetApiError::network(error.to_string())
}

async fn decode_json_response<T: DeserializeOwned>(
    response: gloo_net::http::Response,
) -> Result<T, WidgetApiError> {
    let status = response.status();
    let raw = response
        .text()
        .await
        .map_err(|error| WidgetApiError::decode(status, error.to_string()))?;

    if !(200..=299).contains(&status) {
        let detail = serde_json::from_str::<ApiErrorBody>(&raw)
            .ok()
            .and_then(|body| body.best_detail().map(ToString::to_string));
        return Err(classify_status(status, detail.as_deref()));
    }

    serde_json::from_str(&raw).map_err(|error| {
        WidgetApiError::decode(status, format!("failed to decode response: {error}"))
    })
}

fn url_encode(raw: &str) -> String {
    js_sys::encode_uri_component(raw).into()
}
