//! In-process channel with scripted answers
//!
//! Used for tests and local loopback. Every method gets a handler that maps
//! the encoded request to an encoded response or a transport failure; every
//! call is recorded so tests can assert on what was sent.

use super::{Channel, Method, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

type Handler = Arc<dyn Fn(&Bytes) -> Result<Bytes, TransportError> + Send + Sync>;

/// A call observed by a [`MockChannel`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Method invoked
    pub method: Method,
    /// Encoded request
    pub request: Bytes,
}

/// Scripted in-memory channel
#[derive(Clone, Default)]
pub struct MockChannel {
    handlers: Arc<Mutex<HashMap<Method, Handler>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockChannel {
    /// Channel with no handlers; unscripted methods fail as unavailable
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `handler`
    pub fn on<F>(&self, method: Method, handler: F) -> &Self
    where
        F: Fn(&Bytes) -> Result<Bytes, TransportError> + Send + Sync + 'static,
    {
        self.handlers.lock().insert(method, Arc::new(handler));
        self
    }

    /// Answer `method` with each entry of `answers` in turn, repeating the last one
    pub fn on_sequence(&self, method: Method, answers: Vec<Result<Bytes, TransportError>>) -> &Self {
        let queue = Mutex::new(answers.into_iter().collect::<VecDeque<_>>());
        self.on(method, move |_| {
            let mut queue = queue.lock();
            match queue.len() {
                0 => Err(TransportError::Unavailable("no scripted answer".to_string())),
                1 => queue[0].clone(),
                _ => queue.pop_front().unwrap_or_else(|| {
                    Err(TransportError::Unavailable("no scripted answer".to_string()))
                }),
            }
        })
    }

    /// All calls seen so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Calls made to `method`
    pub fn calls_to(&self, method: Method) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for MockChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<String> = self.handlers.lock().keys().map(Method::to_string).collect();
        methods.sort_unstable();
        f.debug_struct("MockChannel")
            .field("methods", &methods)
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

#[async_trait]
impl Channel for MockChannel {
    async fn submit(&self, method: Method, request: Bytes) -> Result<Bytes, TransportError> {
        self.calls.lock().push(RecordedCall {
            method,
            request: request.clone(),
        });

        let handler = self.handlers.lock().get(&method).cloned();
        match handler {
            Some(handler) => handler(&request),
            None => Err(TransportError::Unavailable(format!("no handler for {}", method))),
        }
    }
}
