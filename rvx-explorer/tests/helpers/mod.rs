//! Shared test helpers: in-memory backend with scripted latency and failures

#![allow(dead_code)]

use async_trait::async_trait;
use rvx_common::Catalog;
use rvx_explorer::models::{ReviewPage, ReviewRow};
use rvx_explorer::pagination::PageMeta;
use rvx_explorer::{AggregateEndpoint, FacetStore, FetchError, FilterState, QueryParams, ReviewBackend};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend that records every request and answers from its parameters
pub struct MockBackend {
    total: u64,
    review_calls: Mutex<Vec<QueryParams>>,
    aggregate_calls: Mutex<Vec<(AggregateEndpoint, QueryParams)>>,
    review_delays: Mutex<VecDeque<Duration>>,
    aggregate_delays: Mutex<VecDeque<Duration>>,
    fail_reviews: AtomicBool,
    fail_endpoint: Mutex<Option<AggregateEndpoint>>,
}

impl MockBackend {
    pub fn new(total: u64) -> Arc<Self> {
        Arc::new(Self {
            total,
            review_calls: Mutex::new(Vec::new()),
            aggregate_calls: Mutex::new(Vec::new()),
            review_delays: Mutex::new(VecDeque::new()),
            aggregate_delays: Mutex::new(VecDeque::new()),
            fail_reviews: AtomicBool::new(false),
            fail_endpoint: Mutex::new(None),
        })
    }

    /// Latency of the next reviews requests, in issue order
    pub fn push_review_delays(&self, delays: &[u64]) {
        self.review_delays
            .lock()
            .unwrap()
            .extend(delays.iter().map(|ms| Duration::from_millis(*ms)));
    }

    /// Latency applied to whole aggregate cycles (14 requests each), in order
    pub fn push_cycle_delay(&self, ms: u64) {
        let mut delays = self.aggregate_delays.lock().unwrap();
        delays.extend(std::iter::repeat(Duration::from_millis(ms)).take(14));
    }

    pub fn set_fail_reviews(&self, fail: bool) {
        self.fail_reviews.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_endpoint(&self, endpoint: Option<AggregateEndpoint>) {
        *self.fail_endpoint.lock().unwrap() = endpoint;
    }

    pub fn review_calls(&self) -> Vec<QueryParams> {
        self.review_calls.lock().unwrap().clone()
    }

    pub fn aggregate_calls(&self) -> Vec<(AggregateEndpoint, QueryParams)> {
        self.aggregate_calls.lock().unwrap().clone()
    }
}

fn text_param(params: &QueryParams, key: &str) -> String {
    params.get(key).map(|v| v.to_string()).unwrap_or_default()
}

fn int_param(params: &QueryParams, key: &str, default: i64) -> i64 {
    params.get(key).and_then(|v| v.as_int()).unwrap_or(default)
}

#[async_trait]
impl ReviewBackend for MockBackend {
    async fn fetch_reviews(&self, params: &QueryParams) -> Result<ReviewPage, FetchError> {
        let call = {
            let mut calls = self.review_calls.lock().unwrap();
            calls.push(params.clone());
            calls.len()
        };
        let delay = self.review_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reviews.load(Ordering::SeqCst) {
            return Err(FetchError::Api {
                status: 503,
                reason: Some("Service Unavailable".into()),
                body: json!({"detail": "backend warming up"}),
            });
        }

        let page_size = int_param(params, "page_size", 20) as u32;
        let page = int_param(params, "page", 1) as u32;
        let meta = PageMeta::calculate(self.total, page_size, page);
        let row = ReviewRow {
            review_id: format!("call-{}", call),
            app_id: 730,
            app_name: None,
            language: Some("english".into()),
            text: text_param(params, "q"),
            voted_up: true,
            votes_up: 0,
            votes_funny: 0,
            playtime_at_review: None,
            playtime_forever: None,
            timestamp_created: 1_704_067_200,
            quotes: Vec::new(),
        };

        Ok(ReviewPage {
            meta,
            data: vec![row],
        })
    }

    async fn fetch_aggregate(
        &self,
        endpoint: AggregateEndpoint,
        params: &QueryParams,
    ) -> Result<Value, FetchError> {
        self.aggregate_calls
            .lock()
            .unwrap()
            .push((endpoint, params.clone()));
        let delay = self.aggregate_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_endpoint.lock().unwrap() == Some(endpoint) {
            return Err(FetchError::Network(format!("{} unreachable", endpoint)));
        }

        let app_ids = text_param(params, "app_ids");
        Ok(match endpoint {
            AggregateEndpoint::HeatmapCodes => {
                let dimension = text_param(params, "dimension");
                let code = match dimension.as_str() {
                    "aesthetics" => 1,
                    "features" => 21,
                    _ => 11,
                };
                json!({"rows": [{
                    "dimension": dimension,
                    "code": code,
                    "total": 2,
                    "positive_count": 2,
                    "net": 1.0,
                }]})
            }
            _ => json!({
                "endpoint": endpoint.path(),
                "app_ids": app_ids,
                "polarity": text_param(params, "polarity"),
                "languages": text_param(params, "languages"),
            }),
        })
    }
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new([
        ("Roguelike", vec![1145360, 646570]),
        ("Shooter", vec![730, 1172470]),
    ]))
}

pub fn store() -> Arc<FacetStore> {
    Arc::new(FacetStore::new(catalog(), FilterState::default()))
}
