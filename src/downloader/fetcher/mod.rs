//! The HTTP seam: anything that can turn a URL into a [`Response`].

mod ureq_fetcher;

pub use ureq_fetcher::UReqFetcher;

#[cfg(test)]
mod mock_fetcher;

#[cfg(test)]
pub use mock_fetcher::MockFetcher;

/// What a single GET produced. Non-2xx statuses never carry a body.
#[derive(Debug)]
pub enum Response {
    Ok {
        body: Vec<u8>,
        content_type: Option<String>,
    },
    Status(u16),
    InvalidBody,
    NetworkError(String),
}

impl Response {
    pub fn ok(body: Vec<u8>, content_type: Option<String>) -> Self {
        Self::Ok { body, content_type }
    }

    pub fn image(body: impl Into<Vec<u8>>, mime: &str) -> Self {
        Self::ok(body.into(), Some(mime.to_string()))
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn not_found() -> Self {
        Self::Status(404)
    }

    pub fn invalid_body() -> Self {
        Self::InvalidBody
    }

    pub fn network_error(reason: impl Into<String>) -> Self {
        Self::NetworkError(reason.into())
    }
}

pub trait FileDownloader {
    fn fetch(&self, url: &str) -> Response;
}
