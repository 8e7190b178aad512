//! Merge request gateway answering from a script

use crate::gateway::{GatewayError, MergeRequestGateway};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Gateway returning scripted results in order
#[derive(Clone, Default)]
pub struct StubGateway {
    responses: Arc<Mutex<VecDeque<Result<usize, GatewayError>>>>,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    /// Successive open merge request counts
    pub fn counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            responses: Arc::new(Mutex::new(counts.into_iter().map(Ok).collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A gateway whose first query fails
    pub fn failing(error: GatewayError) -> Self {
        let stub = Self::default();
        stub.responses.lock().unwrap().push_back(Err(error));
        stub
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MergeRequestGateway for StubGateway {
    async fn open_merge_requests(&self) -> Result<usize, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Decode("no scripted response left".to_string())))
    }
}
