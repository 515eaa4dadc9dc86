use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

#[derive(Debug)]
pub enum FetchState {
    Pending,
    /// `None` means a null payload: no update this cycle.
    Ready(Option<Value>),
    Failed(String),
    Cancelled,
}

pub trait FetchHandle {
    fn poll(&mut self) -> FetchState;

    /// Idempotent: cancelling an already-completed or already-cancelled
    /// request is a no-op.
    fn cancel(&mut self);
}

pub trait GraphFetcher {
    fn fetch(&mut self) -> Box<dyn FetchHandle>;
}

/// Fetches the trustview document over HTTP on a background thread.
///
/// Cancellation flags the worker so a late result is discarded; the agent
/// carries a global timeout so an abandoned call also unblocks and the
/// thread exits instead of piling up behind a stalled server.
pub struct HttpFetcher {
    endpoint: String,
    agent: Agent,
}

impl HttpFetcher {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { endpoint, agent }
    }
}

impl GraphFetcher for HttpFetcher {
    fn fetch(&mut self) -> Box<dyn FetchHandle> {
        let endpoint = self.endpoint.clone();
        let agent = self.agent.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_flag = Arc::clone(&cancelled);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = perform_request(&agent, &endpoint);
            if cancelled_flag.load(Ordering::SeqCst) {
                return;
            }
            let _ = tx.send(result);
        });

        Box::new(HttpFetchHandle { rx, cancelled })
    }
}

struct HttpFetchHandle {
    rx: Receiver<Result<Option<Value>, String>>,
    cancelled: Arc<AtomicBool>,
}

impl FetchHandle for HttpFetchHandle {
    fn poll(&mut self) -> FetchState {
        if self.cancelled.load(Ordering::SeqCst) {
            return FetchState::Cancelled;
        }

        match self.rx.try_recv() {
            Ok(Ok(value)) => FetchState::Ready(value),
            Ok(Err(error)) => FetchState::Failed(error),
            Err(TryRecvError::Empty) => FetchState::Pending,
            Err(TryRecvError::Disconnected) => {
                FetchState::Failed("fetch worker disconnected".to_owned())
            }
        }
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

fn perform_request(agent: &Agent, endpoint: &str) -> Result<Option<Value>, String> {
    let body = agent
        .get(endpoint)
        .call()
        .map_err(|error| format!("request to {endpoint} failed: {error}"))?
        .into_body()
        .read_to_string()
        .map_err(|error| format!("failed to read response from {endpoint}: {error}"))?;

    let value = serde_json::from_str::<Value>(&body)
        .map_err(|error| format!("response from {endpoint} is not valid JSON: {error}"))?;

    Ok(if value.is_null() { None } else { Some(value) })
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;

    /// Scripted response for one `fetch()` call.
    pub(crate) enum FakeResponse {
        /// Delivered on the first poll.
        Now(Option<Value>),
        Fail(String),
        /// Stays pending until cancelled or timed out.
        Never,
    }

    /// Test double recording the issue/cancel order of every request.
    pub(crate) struct FakeFetcher {
        responses: Rc<RefCell<VecDeque<FakeResponse>>>,
        log: Rc<RefCell<Vec<String>>>,
        issued: usize,
    }

    impl FakeFetcher {
        pub(crate) fn new(responses: Vec<FakeResponse>) -> Self {
            Self {
                responses: Rc::new(RefCell::new(responses.into())),
                log: Rc::new(RefCell::new(Vec::new())),
                issued: 0,
            }
        }

        pub(crate) fn log_handle(&self) -> Rc<RefCell<Vec<String>>> {
            Rc::clone(&self.log)
        }
    }

    impl GraphFetcher for FakeFetcher {
        fn fetch(&mut self) -> Box<dyn FetchHandle> {
            self.issued += 1;
            self.log.borrow_mut().push(format!("issue {}", self.issued));
            let response = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(FakeResponse::Never);
            Box::new(FakeHandle {
                id: self.issued,
                response: Some(response),
                cancelled: false,
                log: Rc::clone(&self.log),
            })
        }
    }

    struct FakeHandle {
        id: usize,
        response: Option<FakeResponse>,
        cancelled: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl FetchHandle for FakeHandle {
        fn poll(&mut self) -> FetchState {
            if self.cancelled {
                return FetchState::Cancelled;
            }
            match self.response.take() {
                Some(FakeResponse::Now(value)) => FetchState::Ready(value),
                Some(FakeResponse::Fail(error)) => FetchState::Failed(error),
                Some(FakeResponse::Never) => {
                    self.response = Some(FakeResponse::Never);
                    FetchState::Pending
                }
                None => FetchState::Pending,
            }
        }

        fn cancel(&mut self) {
            if !self.cancelled {
                self.cancelled = true;
                self.log.borrow_mut().push(format!("cancel {}", self.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Instant;

    use super::*;

    // A server that accepts the connection and then stalls forever must
    // not pin the worker thread: the agent's global timeout unblocks the
    // call and the handle reports the failure.
    #[test]
    fn stalled_server_fails_within_the_request_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let accepter = thread::spawn(move || {
            // Hold the connection open without ever answering.
            let _connection = listener.accept();
            thread::sleep(Duration::from_secs(2));
        });

        let mut fetcher =
            HttpFetcher::new(format!("http://{addr}/trustview"), Duration::from_millis(200));
        let mut handle = fetcher.fetch();

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match handle.poll() {
                FetchState::Failed(_) => break,
                FetchState::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                state => panic!("expected the stalled request to fail, got {state:?}"),
            }
        }

        accepter.join().unwrap();
    }

    #[test]
    fn cancelled_request_reports_cancelled_and_stays_cancelled() {
        let mut fetcher =
            HttpFetcher::new("http://127.0.0.1:9/trustview".to_owned(), Duration::from_millis(200));
        let mut handle = fetcher.fetch();

        handle.cancel();
        handle.cancel(); // idempotent
        assert!(matches!(handle.poll(), FetchState::Cancelled));
        assert!(matches!(handle.poll(), FetchState::Cancelled));
    }
}
