use std::cell::RefCell;

use super::{FileDownloader, Response};

/// Replays queued responses in order and records every requested URL.
pub struct MockFetcher {
    responses: RefCell<Vec<Response>>,
    requested: RefCell<Vec<String>>,
}

impl FileDownloader for MockFetcher {
    fn fetch(&self, url: &str) -> Response {
        self.requested.borrow_mut().push(url.to_string());

        let mut responses = self.responses.borrow_mut();

        if responses.is_empty() {
            Response::network_error("no response queued")
        } else {
            responses.remove(0)
        }
    }
}

impl MockFetcher {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: RefCell::new(responses),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}
