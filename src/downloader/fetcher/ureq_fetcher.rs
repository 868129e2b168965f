use std::io::Read;
use std::time::Duration;

use ureq::Error::Status;

use super::{FileDownloader, Response};

/// Blocking HTTP GET fetcher with a per-request timeout and a fixed
/// `User-Agent`.
pub struct UReqFetcher {
    agent: ureq::Agent,
}

impl FileDownloader for UReqFetcher {
    fn fetch(&self, url: &str) -> Response {
        tracing::debug!(url, "GET");

        match self.agent.get(url).call() {
            Ok(response) if !(200..300).contains(&response.status()) => {
                Response::status(response.status())
            }

            Ok(response) => {
                let mime = response.header("Content-Type").map(str::to_string);

                let mut body = Vec::new();

                if let Err(err) = response.into_reader().read_to_end(&mut body) {
                    tracing::debug!(url, error = %err, "failed reading body");
                    return Response::invalid_body();
                }

                Response::ok(body, mime)
            }

            Err(Status(code, _)) => Response::status(code),

            Err(err) => Response::network_error(err.to_string()),
        }
    }
}

impl UReqFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();

        UReqFetcher { agent }
    }
}
