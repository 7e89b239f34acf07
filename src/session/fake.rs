//! Scripted in-memory [`DriverSession`] used by unit tests.
//!
//! Lookups and ops are driven by scripts: each call consumes the next
//! script entry, and the last entry repeats forever. Every call is logged
//! so tests can assert on attempt counts (e.g. the staleness retry bound).

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::locator::Locator;

use super::{DriverSession, ElementHandle, Op, Platform, Scope};

// ============================================================================
// Scripts
// ============================================================================

/// One scripted outcome for `find_one`/`find_all`.
#[derive(Debug, Clone)]
pub(crate) enum FindScript {
    /// These node ids match, in order.
    Found(Vec<&'static str>),
    /// Nothing matches.
    Missing,
}

/// One scripted outcome for `perform`.
#[derive(Debug, Clone)]
pub(crate) enum PerformScript {
    /// Op succeeds with this value.
    Ok(Value),
    /// Op signals a stale handle.
    Stale,
    /// Op fails with an opaque transport error.
    Fail(&'static str),
}

// ============================================================================
// FakeSession
// ============================================================================

/// Scripted transport double.
pub(crate) struct FakeSession {
    platform: Platform,
    finds: Mutex<VecDeque<FindScript>>,
    performs: Mutex<VecDeque<PerformScript>>,
    find_calls: AtomicUsize,
    find_log: Mutex<Vec<(String, String)>>,
    perform_log: Mutex<Vec<(ElementHandle, String)>>,
}

/// Installs a test-writer subscriber once per process, so
/// `RUST_LOG=pagewright=debug cargo test` shows the structured events
/// a test emits.
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}

impl FakeSession {
    pub(crate) fn new(platform: Platform) -> Arc<Self> {
        init_test_logging();
        Arc::new(Self {
            platform,
            finds: Mutex::new(VecDeque::new()),
            performs: Mutex::new(VecDeque::new()),
            find_calls: AtomicUsize::new(0),
            find_log: Mutex::new(Vec::new()),
            perform_log: Mutex::new(Vec::new()),
        })
    }

    /// Appends a find outcome. The last one queued repeats forever.
    pub(crate) fn script_find(self: &Arc<Self>, script: FindScript) -> Arc<Self> {
        self.finds.lock().push_back(script);
        Arc::clone(self)
    }

    /// Appends a perform outcome. The last one queued repeats forever.
    pub(crate) fn script_perform(self: &Arc<Self>, script: PerformScript) -> Arc<Self> {
        self.performs.lock().push_back(script);
        Arc::clone(self)
    }

    /// Number of `find_one`/`find_all` calls observed.
    pub(crate) fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Lookups observed as (locator, scope) pairs, in order.
    pub(crate) fn finds(&self) -> Vec<(String, String)> {
        self.find_log.lock().clone()
    }

    /// Op names performed, in order.
    pub(crate) fn performed(&self) -> Vec<String> {
        self.perform_log
            .lock()
            .iter()
            .map(|(_, op)| op.clone())
            .collect()
    }

    fn next_find(&self) -> FindScript {
        let mut queue = self.finds.lock();
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue.front().cloned().unwrap_or(FindScript::Missing)
        }
    }

    fn next_perform(&self) -> PerformScript {
        let mut queue = self.performs.lock();
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or(PerformScript::Ok(Value::Null))
        }
    }
}

#[async_trait]
impl DriverSession for FakeSession {
    async fn find_one(&self, locator: &Locator, scope: &Scope) -> Result<ElementHandle> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.find_log
            .lock()
            .push((locator.to_string(), scope.to_string()));
        match self.next_find() {
            FindScript::Found(ids) if !ids.is_empty() => Ok(ElementHandle::new(ids[0])),
            _ => Err(Error::not_found(locator.to_string(), scope.to_string())),
        }
    }

    async fn find_all(&self, locator: &Locator, scope: &Scope) -> Result<Vec<ElementHandle>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.find_log
            .lock()
            .push((locator.to_string(), scope.to_string()));
        match self.next_find() {
            FindScript::Found(ids) => Ok(ids.into_iter().map(ElementHandle::new).collect()),
            FindScript::Missing => Ok(Vec::new()),
        }
    }

    async fn perform(&self, handle: &ElementHandle, op: &Op) -> Result<Value> {
        self.perform_log
            .lock()
            .push((handle.clone(), op.name().to_string()));
        match self.next_perform() {
            PerformScript::Ok(value) => Ok(value),
            PerformScript::Stale => Err(Error::stale_element(handle.to_string())),
            PerformScript::Fail(message) => Err(Error::automation(message)),
        }
    }

    fn platform(&self) -> Platform {
        self.platform
    }
}
