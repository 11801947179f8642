//! Debtor report pipeline tests
//!
//! Run against in-memory stores driven by a manual clock pinned to the
//! fixture reference date.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use core_kernel::{Clock, ManualClock};
use domain_billing::{BillingError, DebtorReport};
use domain_reporting::{
    CacheStorePort, DebtorCacheConfig, DebtorReportCache, DebtorReportService, InMemoryCacheStore, ReportError,
    DEFAULT_CACHE_KEY,
};
use test_utils::{BillingFixtures, InMemoryBillingStore, TemporalFixtures};

struct Harness {
    billing: Arc<InMemoryBillingStore>,
    store: Arc<InMemoryCacheStore>,
    clock: ManualClock,
    service: DebtorReportService,
}

impl Harness {
    fn with_records(records: Vec<domain_billing::BillingRecord>) -> Self {
        let (clock, handle): (Arc<dyn Clock>, ManualClock) = TemporalFixtures::shared_clock();
        let billing = Arc::new(InMemoryBillingStore::with_records(clock.clone(), records));
        let store = Arc::new(InMemoryCacheStore::new(clock.clone()));
        let cache = DebtorReportCache::new(store.clone(), DebtorCacheConfig::default());
        let service = DebtorReportService::new(billing.clone(), cache, clock);

        Self {
            billing,
            store,
            clock: handle,
            service,
        }
    }

    fn portfolio() -> Self {
        Self::with_records(BillingFixtures::mixed_portfolio())
    }
}

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_cold_cache_computes_only_debtors() {
        let h = Harness::portfolio();

        let report = h.service.get_debtor_report().await.unwrap();

        let rics: Vec<&str> = report.iter().map(|r| r.ric.as_str()).collect();
        assert_eq!(rics, vec!["RIC-10001", "RIC-10002"]);
        assert_eq!(report[0].overdue_days, 35);
        assert_eq!(report[0].debt_amount, dec!(300.00));
        assert_eq!(report[1].overdue_days, 61);
        assert_eq!(report[1].debt_amount, dec!(750.00));
        assert_eq!(h.billing.query_count(), 1);
        assert!(h.store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_warm_cache_skips_billing_store() {
        let h = Harness::portfolio();

        let first = h.service.get_debtor_report().await.unwrap();
        let second = h.service.get_debtor_report().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.billing.query_count(), 1);
    }

    #[tokio::test]
    async fn test_cached_snapshot_ignores_source_changes_until_expiry() {
        let h = Harness::portfolio();
        let first = h.service.get_debtor_report().await.unwrap();

        h.billing.replace_all(vec![BillingFixtures::debtor_35_days()]);
        h.clock.advance(chrono::Duration::seconds(3599));
        assert_eq!(h.service.get_debtor_report().await.unwrap(), first);

        h.clock.advance(chrono::Duration::seconds(1));
        let refreshed = h.service.get_debtor_report().await.unwrap();
        assert_eq!(refreshed.len(), 1);
        assert_eq!(h.billing.query_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_report_is_not_cached() {
        let h = Harness::with_records(vec![BillingFixtures::paid_today(), BillingFixtures::never_paid()]);

        assert!(h.service.get_debtor_report().await.unwrap().is_empty());
        assert!(h.service.get_debtor_report().await.unwrap().is_empty());

        assert_eq!(h.billing.query_count(), 2);
        assert!(!h.store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_first_debtor_shows_up_after_empty_report() {
        let h = Harness::with_records(Vec::new());
        assert!(h.service.get_debtor_report().await.unwrap().is_empty());

        h.billing.insert(BillingFixtures::debtor_61_days());

        let report = h.service.get_debtor_report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].debt_amount, dec!(750.00));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_recompute() {
        let h = Harness::portfolio();
        h.service.get_debtor_report().await.unwrap();

        h.service.clear_cache().await.unwrap();
        assert!(!h.store.contains_key(DEFAULT_CACHE_KEY));

        h.service.get_debtor_report().await.unwrap();
        assert_eq!(h.billing.query_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_on_empty_cache_succeeds() {
        let h = Harness::portfolio();
        assert!(h.service.clear_cache().await.is_ok());
    }

    #[tokio::test]
    async fn test_source_failure_leaves_cache_untouched() {
        let h = Harness::portfolio();
        h.billing.set_available(false);

        let err = h.service.get_debtor_report().await.unwrap_err();

        assert!(matches!(err, ReportError::SourceUnavailable(_)));
        assert!(err.is_transient());
        assert!(!h.store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_source_failure_after_expiry_keeps_nothing_stale() {
        let h = Harness::portfolio();
        h.service.get_debtor_report().await.unwrap();

        h.clock.advance(chrono::Duration::hours(2));
        h.billing.set_available(false);

        assert!(h.service.get_debtor_report().await.is_err());
        assert!(!h.store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_negative_fee_aborts_without_caching() {
        let mut records = BillingFixtures::mixed_portfolio();
        records.push(BillingFixtures::negative_fee_debtor());
        let h = Harness::with_records(records);

        let err = h.service.get_debtor_report().await.unwrap_err();

        match err {
            ReportError::InvalidRecord(BillingError::InvalidRecord { ric, .. }) => {
                assert_eq!(ric.as_str(), "RIC-10006");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
        assert!(!h.store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_cache_outage_is_reported() {
        let h = Harness::portfolio();
        h.store.set_available(false);

        let err = h.service.get_debtor_report().await.unwrap_err();
        assert!(matches!(err, ReportError::CacheUnavailable(_)));
        assert_eq!(h.billing.query_count(), 0);

        assert!(matches!(
            h.service.clear_cache().await.unwrap_err(),
            ReportError::CacheUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_misses_converge_on_one_snapshot() {
        let h = Harness::portfolio();

        let (a, b) = tokio::join!(h.service.get_debtor_report(), h.service.get_debtor_report());

        assert_eq!(a.unwrap(), b.unwrap());
        assert!((1..=2).contains(&h.billing.query_count()));
        assert_eq!(h.service.cache().get().await.unwrap().len(), 2);
    }
}

mod cache_tests {
    use super::*;

    fn cache_over(store: Arc<InMemoryCacheStore>) -> DebtorReportCache {
        DebtorReportCache::new(store, DebtorCacheConfig::default())
    }

    fn sample_reports() -> Vec<DebtorReport> {
        let as_of = TemporalFixtures::as_of();
        vec![
            domain_billing::compute(&BillingFixtures::debtor_35_days(), as_of).unwrap(),
            domain_billing::compute(&BillingFixtures::debtor_61_days(), as_of).unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_reports_in_order() {
        let store = Arc::new(InMemoryCacheStore::new(Arc::new(TemporalFixtures::clock())));
        let cache = cache_over(store);
        let reports = sample_reports();

        cache.put(&reports).await.unwrap();

        assert_eq!(cache.get().await.unwrap(), reports);
    }

    #[tokio::test]
    async fn test_put_replaces_previous_snapshot() {
        let store = Arc::new(InMemoryCacheStore::new(Arc::new(TemporalFixtures::clock())));
        let cache = cache_over(store);
        let reports = sample_reports();

        cache.put(&reports).await.unwrap();
        cache.put(&reports[1..]).await.unwrap();

        assert_eq!(cache.get().await.unwrap(), reports[1..].to_vec());
    }

    #[tokio::test]
    async fn test_empty_put_clears_previous_snapshot() {
        let store = Arc::new(InMemoryCacheStore::new(Arc::new(TemporalFixtures::clock())));
        let cache = cache_over(store.clone());

        cache.put(&sample_reports()).await.unwrap();
        cache.put(&[]).await.unwrap();

        assert!(cache.get().await.unwrap().is_empty());
        assert!(!store.contains_key(DEFAULT_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_corrupt_entries_are_skipped() {
        let store = Arc::new(InMemoryCacheStore::new(Arc::new(TemporalFixtures::clock())));
        let cache = cache_over(store.clone());
        let reports = sample_reports();

        let values = vec![
            serde_json::to_string(&reports[0]).unwrap(),
            "{not json".to_string(),
            serde_json::to_string(&reports[1]).unwrap(),
        ];
        store
            .replace(DEFAULT_CACHE_KEY, values, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get().await.unwrap(), reports);
    }

    #[tokio::test]
    async fn test_custom_key_and_ttl() {
        let clock = TemporalFixtures::clock();
        let store = Arc::new(InMemoryCacheStore::new(Arc::new(clock.clone())));
        let config = DebtorCacheConfig::new().key("debtors:test").ttl(Duration::from_secs(10));
        let cache = DebtorReportCache::new(store.clone(), config);

        cache.put(&sample_reports()).await.unwrap();
        assert!(store.contains_key("debtors:test"));
        assert!(!store.contains_key(DEFAULT_CACHE_KEY));

        clock.advance(chrono::Duration::seconds(10));
        assert!(cache.get().await.unwrap().is_empty());
    }
}

mod property_tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use test_utils::billing_record_strategy;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_report_covers_exactly_the_eligible_records(
            records in vec(billing_record_strategy(TemporalFixtures::as_of()), 0..20)
        ) {
            let as_of = TemporalFixtures::as_of();
            let expected: Vec<_> = records
                .iter()
                .filter(|r| r.is_debt_eligible(as_of))
                .map(|r| r.ric.clone())
                .collect();

            let h = Harness::with_records(records);
            let report = block_on(h.service.get_debtor_report()).unwrap();

            let rics: Vec<_> = report.iter().map(|r| r.ric.clone()).collect();
            prop_assert_eq!(rics, expected);
            for entry in &report {
                prop_assert!(entry.overdue_days > 28);
                prop_assert!(entry.months_overdue() >= 1);
                prop_assert_eq!(entry.debt_amount, entry.monthly_fee * rust_decimal::Decimal::from(entry.months_overdue()));
            }
        }
    }
}
