//! HTTP API tests
//!
//! Drive the router through axum-test with in-memory stores behind the
//! debtor report service.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use core_kernel::{Clock, HealthCheckable};
use domain_billing::BillingRecord;
use domain_reporting::{DebtorCacheConfig, DebtorReportCache, DebtorReportService, InMemoryCacheStore};
use interface_api::{create_router, AppState};
use test_utils::{BillingFixtures, InMemoryBillingStore, TemporalFixtures};

struct TestApp {
    server: TestServer,
    billing: Arc<InMemoryBillingStore>,
    cache: Arc<InMemoryCacheStore>,
}

fn app_with(records: Vec<BillingRecord>) -> TestApp {
    let (clock, _handle): (Arc<dyn Clock>, _) = TemporalFixtures::shared_clock();
    let billing = Arc::new(InMemoryBillingStore::with_records(clock.clone(), records));
    let cache = Arc::new(InMemoryCacheStore::new(clock.clone()));

    let service = DebtorReportService::new(
        billing.clone(),
        DebtorReportCache::new(cache.clone(), DebtorCacheConfig::default()),
        clock,
    );
    let dependencies: Vec<Arc<dyn HealthCheckable>> = vec![
        billing.clone() as Arc<dyn HealthCheckable>,
        cache.clone() as Arc<dyn HealthCheckable>,
    ];

    let server = TestServer::new(create_router(AppState::new(service, dependencies))).unwrap();
    TestApp { server, billing, cache }
}

#[tokio::test]
async fn test_get_debtors_returns_report_with_totals() {
    let app = app_with(BillingFixtures::mixed_portfolio());

    let response = app.server.get("/api/v1/debtors").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_debt"], "1050.00");
    assert_eq!(body["debtors"][0]["ric"], "RIC-10001");
    assert_eq!(body["debtors"][0]["overdue_days"], 35);
    assert_eq!(body["debtors"][1]["debt_amount"], "750.00");
}

#[tokio::test]
async fn test_get_debtors_with_no_debtors() {
    let app = app_with(vec![BillingFixtures::paid_today()]);

    let response = app.server.get("/api/v1/debtors").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["total_debt"], "0");
    assert!(body["debtors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let app = app_with(BillingFixtures::mixed_portfolio());

    app.server.get("/api/v1/debtors").await.assert_status_ok();
    app.server.get("/api/v1/debtors").await.assert_status_ok();

    assert_eq!(app.billing.query_count(), 1);
}

#[tokio::test]
async fn test_clear_cache_returns_no_content_and_forces_recompute() {
    let app = app_with(BillingFixtures::mixed_portfolio());
    app.server.get("/api/v1/debtors").await.assert_status_ok();

    app.server
        .delete("/api/v1/debtors/cache")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server.get("/api/v1/debtors").await.assert_status_ok();
    assert_eq!(app.billing.query_count(), 2);
}

#[tokio::test]
async fn test_invalid_record_maps_to_unprocessable() {
    let app = app_with(vec![BillingFixtures::negative_fee_debtor()]);

    let response = app.server.get("/api/v1/debtors").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_record");
}

#[tokio::test]
async fn test_billing_outage_maps_to_service_unavailable() {
    let app = app_with(BillingFixtures::mixed_portfolio());
    app.billing.set_available(false);

    let response = app.server.get("/api/v1/debtors").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "service_unavailable");
}

#[tokio::test]
async fn test_cache_outage_maps_to_service_unavailable() {
    let app = app_with(BillingFixtures::mixed_portfolio());
    app.cache.set_available(false);

    app.server
        .get("/api/v1/debtors")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    app.server
        .delete("/api/v1/debtors/cache")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app_with(Vec::new());

    let live: Value = app.server.get("/health").await.json();
    assert_eq!(live["status"], "healthy");

    let ready = app.server.get("/health/ready").await;
    ready.assert_status_ok();
    let body: Value = ready.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_readiness_fails_when_a_store_is_down() {
    let app = app_with(Vec::new());
    app.cache.set_available(false);

    let ready = app.server.get("/health/ready").await;

    ready.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = ready.json();
    assert_eq!(body["status"], "not_ready");
}
