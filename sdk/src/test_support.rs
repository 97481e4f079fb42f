//! Test utilities for the SDK crate.
//!
//! Shared doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::domain::ports::{Endpoint, Transport, TransportError};
use crate::domain::{Auth, UrlParameter};

/// Clock frozen at one local wall-clock moment.
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    /// Clock whose local time reads `now`.
    ///
    /// Moments skipped by a daylight-saving transition fall back to reading
    /// `now` as UTC.
    pub fn at(now: NaiveDateTime) -> Self {
        let local = Local
            .from_local_datetime(&now)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&now));
        Self(local)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

/// How a scripted request completes.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Complete immediately.
    Ready(Result<Value, TransportError>),
    /// Complete after sleeping on the tokio clock.
    Delayed(Duration, Result<Value, TransportError>),
    /// Never complete; dropping the request is recorded as abandoned.
    Pending,
}

/// One request observed by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub path: Vec<String>,
    pub parameters: Vec<UrlParameter>,
}

/// Transport replaying scripted replies per endpoint, in order.
///
/// Endpoints without a remaining reply fail with a `404` status error.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<Endpoint, VecDeque<Reply>>>,
    registrations: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
    abandoned: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply for `endpoint`.
    #[must_use]
    pub fn respond(self, endpoint: Endpoint, result: Result<Value, TransportError>) -> Self {
        self.script(endpoint, Reply::Ready(result))
    }

    /// Queue a reply for `endpoint` that completes after `delay`.
    #[must_use]
    pub fn respond_after(
        self,
        endpoint: Endpoint,
        delay: Duration,
        result: Result<Value, TransportError>,
    ) -> Self {
        self.script(endpoint, Reply::Delayed(delay, result))
    }

    /// Queue a request for `endpoint` that never completes.
    #[must_use]
    pub fn hang(self, endpoint: Endpoint) -> Self {
        self.script(endpoint, Reply::Pending)
    }

    /// Queue an immediate reply for the next registration.
    #[must_use]
    pub fn respond_to_registration(self, result: Result<Value, TransportError>) -> Self {
        lock(&self.registrations).push_back(Reply::Ready(result));
        self
    }

    #[must_use]
    pub fn script(self, endpoint: Endpoint, reply: Reply) -> Self {
        lock(&self.replies)
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    /// Requests observed so far, in issue order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Requests observed for `endpoint`.
    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    /// Number of never-completing requests dropped by their caller.
    pub fn abandoned_requests(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }

    fn next_reply(&self, endpoint: Endpoint) -> Reply {
        lock(&self.replies)
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Reply::Ready(Err(TransportError::status(
                    404_u16,
                    format!("no scripted reply for {endpoint}"),
                )))
            })
    }

    async fn play(&self, reply: Reply) -> Result<Value, TransportError> {
        match reply {
            Reply::Ready(result) => result,
            Reply::Delayed(delay, result) => {
                tokio::time::sleep(delay).await;
                result
            }
            Reply::Pending => {
                let _signal = AbandonSignal(Arc::clone(&self.abandoned));
                futures_util::future::pending().await
            }
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        _auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> Result<Value, TransportError> {
        lock(&self.calls).push(RecordedCall {
            endpoint,
            path: path.to_vec(),
            parameters: parameters.to_vec(),
        });
        let reply = self.next_reply(endpoint);
        self.play(reply).await
    }

    async fn register(&self, _email: &str) -> Result<Value, TransportError> {
        let reply = lock(&self.registrations).pop_front().unwrap_or_else(|| {
            Reply::Ready(Err(TransportError::status(
                404_u16,
                "no scripted registration reply",
            )))
        });
        self.play(reply).await
    }
}

struct AbandonSignal(Arc<AtomicUsize>);

impl Drop for AbandonSignal {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
