use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// In-memory transport: records every request and replays canned responses.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self, error: TransportError) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no canned response left")))
    }
}
