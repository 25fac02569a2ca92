//! HTTP API tests, driven through the router without binding a socket

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use cryptoguard::api::{create_router, AppState};
use cryptoguard::utils::constants::MAX_UINT256_DECIMAL;
use cryptoguard::{AppResult, ChainId, ThreatEngine, ThreatIntelStore, TokenSecurityReport, TokenSecuritySource};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct HoneypotEverywhere;

#[async_trait]
impl TokenSecuritySource for HoneypotEverywhere {
    async fn fetch_report(
        &self,
        chain: ChainId,
        _address: &str,
    ) -> AppResult<Option<TokenSecurityReport>> {
        // only BSC tokens are honeypots in this fixture
        Ok(Some(TokenSecurityReport {
            is_honeypot: Some(chain == ChainId::BinanceSmartChain),
            ..Default::default()
        }))
    }
}

fn app() -> Router {
    let engine = ThreatEngine::new(
        Arc::new(ThreatIntelStore::with_seed_data()),
        Arc::new(HoneypotEverywhere),
    );
    create_router(Arc::new(AppState::new(Arc::new(engine))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    for uri in ["/health", "/v1/health"] {
        let (status, body) = send(app(), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }
}

#[tokio::test]
async fn test_analyze_url_wire_format() {
    let (status, body) = send(
        app(),
        post("/v1/analyze/url", json!({ "url": "https://metamask-io.com/connect" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["safe"], false);
    assert_eq!(data["riskLevel"], "CRITICAL");
    assert_eq!(data["threats"][0]["type"], "PHISHING");
    assert_eq!(data["threats"][0]["severity"], "CRITICAL");
}

#[tokio::test]
async fn test_analyze_url_fail_open() {
    let (status, body) = send(app(), post("/v1/analyze/url", json!({ "url": "not a url" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["safe"], true);
    assert_eq!(body["data"]["riskLevel"], "SAFE");
    assert_eq!(body["data"]["threats"], json!([]));
}

#[tokio::test]
async fn test_analyze_contract_chain_id_as_string() {
    let token = "0x5555555555555555555555555555555555555555";

    let (_, body) = send(
        app(),
        post("/v1/analyze/contract", json!({ "address": token, "chainId": "56" })),
    )
    .await;
    assert_eq!(body["data"]["threats"][0]["type"], "HONEYPOT");

    let (_, body) = send(app(), post("/v1/analyze/contract", json!({ "address": token }))).await;
    assert_eq!(body["data"]["safe"], true);
}

#[tokio::test]
async fn test_analyze_contract_requires_address() {
    let (status, body) = send(app(), post("/v1/analyze/contract", json!({ "address": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_analyze_approval() {
    let (status, body) = send(
        app(),
        post(
            "/v1/analyze/approval",
            json!({
                "spender": "0x6666666666666666666666666666666666666666",
                "amount": MAX_UINT256_DECIMAL,
                "tokenSymbol": "USDT"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["riskLevel"], "HIGH");
    assert_eq!(body["data"]["threats"][0]["type"], "INFINITE_APPROVAL");
    assert_eq!(body["data"]["threats"][0]["message"], "INFINITE approval of USDT");
}

#[tokio::test]
async fn test_analyze_transaction() {
    // approve(0x1111111254eeb25477b68fb85ed929f73a960582, 2^256-1)
    let calldata = format!(
        "0x095ea7b3{:0>64}{}",
        "1111111254eeb25477b68fb85ed929f73a960582",
        "f".repeat(64)
    );

    let (status, body) = send(app(), post("/v1/analyze/transaction", json!({ "data": calldata }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["spender"], "0x1111111254eeb25477b68fb85ed929f73a960582");
    assert_eq!(body["data"]["amount"], MAX_UINT256_DECIMAL);
    assert_eq!(body["data"]["analysis"]["threats"][0]["message"], "INFINITE approval of token");
}

#[tokio::test]
async fn test_analyze_transaction_rejects_other_calldata() {
    let (status, body) = send(app(), post("/v1/analyze/transaction", json!({ "data": "0xa9059cbb" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_stats_count_scans() {
    let app = app();

    send(app.clone(), post("/v1/analyze/url", json!({ "url": "https://metamask-io.com" }))).await;
    send(app.clone(), post("/v1/analyze/url", json!({ "url": "https://uniswap.org" }))).await;

    let (status, body) = send(app, get("/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    let scans = &body["data"]["scans"];
    assert_eq!(scans["url_scans"], 2);
    assert_eq!(scans["blocked"], 1);
    assert_eq!(scans["threats_by_type"]["PHISHING"], 1);
    assert!(body["data"]["store"]["phishing_domains"].as_u64().unwrap() > 0);
}
