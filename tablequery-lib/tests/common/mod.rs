//! Test providers shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use tablequery_lib::error::ApiError;
use tablequery_lib::model::Record;
use tablequery_lib::provider::DataProvider;
use tablequery_lib::provider::ProviderResponse;
use tablequery_lib::query::QueryRequest;

pub type Reply = Result<ProviderResponse, ApiError>;

/// Students with ids `first..first + count`.
pub fn students(first: i64, count: i64) -> Vec<Record> {
    (first..first + count)
        .map(|i| {
            Record::new(
                i,
                format!("Student {}", i),
                format!("{} College Road", i),
                format!("555-{:04}", i),
            )
        })
        .collect()
}

/// Answers every request immediately from a closure.
pub struct FnProvider<F> {
    reply: F,
    requests: Mutex<Vec<QueryRequest>>,
}

impl<F> FnProvider<F>
where
    F: Fn(&QueryRequest) -> Reply + Send + Sync,
{
    pub fn new(reply: F) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> DataProvider for FnProvider<F>
where
    F: Fn(&QueryRequest) -> Reply + Send + Sync,
{
    async fn fetch(&self, request: &QueryRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)(request)
    }
}

/// Holds each request until the test releases it through its gate.
///
/// The n-th fetch waits on the n-th gate, so the test decides the order in
/// which responses arrive.
pub struct GatedProvider {
    gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl GatedProvider {
    pub fn new(count: usize) -> (Self, Vec<oneshot::Sender<Reply>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..count).map(|_| oneshot::channel()).unzip();
        let provider = Self {
            gates: Mutex::new(receivers),
            requests: Mutex::new(Vec::new()),
        };
        (provider, senders)
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataProvider for GatedProvider {
    async fn fetch(&self, request: &QueryRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("more fetches than gates");
        gate.await
            .unwrap_or_else(|_| Err(ApiError::parse("gate dropped")))
    }
}
