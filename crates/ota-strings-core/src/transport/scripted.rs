//! In-memory transport that replays scripted responses and records requests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use ota_strings_types::TransportError;
use parking_lot::Mutex;

use super::{HttpResponse, HttpTransport, OtaRequest};

/// Scripted reply for one request.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Respond(HttpResponse),
    Fail(TransportError),
}

/// Replays queued responses keyed by URL path suffix.
///
/// Responses are matched per path so concurrent locale fetches stay
/// deterministic. A request with nothing queued for its path fails with
/// `BadStatus(599)`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    queues: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<OtaRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enqueue(&self, path: &str, status: u16, body: &str, etag: Option<&str>) {
        let mut response = HttpResponse::new(status, body);
        if let Some(etag) = etag {
            response = response.with_header("ETag", etag);
        }
        self.push(path, Scripted::Respond(response));
    }

    pub(crate) fn enqueue_error(&self, path: &str, error: TransportError) {
        self.push(path, Scripted::Fail(error));
    }

    /// Delay every reply; pairs with paused tokio time.
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub(crate) fn requests(&self) -> Vec<OtaRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn requests_to(&self, path: &str) -> Vec<OtaRequest> {
        self.requests.lock().iter().filter(|r| r.url.path().ends_with(path)).cloned().collect()
    }

    fn push(&self, path: &str, reply: Scripted) {
        self.queues.lock().entry(path.to_string()).or_default().push_back(reply);
    }

    fn next_reply(&self, request: &OtaRequest) -> Option<Scripted> {
        let mut queues = self.queues.lock();
        let request_path = request.url.path();
        let key = queues
            .iter()
            .filter(|(path, queue)| request_path.ends_with(path.as_str()) && !queue.is_empty())
            .map(|(path, _)| path.clone())
            .max_by_key(String::len)?;
        queues.get_mut(&key).and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &OtaRequest,
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(request) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            None => Err(TransportError::BadStatus(599)),
        }
    }
}
