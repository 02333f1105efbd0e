use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_USER_AGENT: &str = concat!("keylink/", env!("CARGO_PKG_VERSION"));

pub fn keys_url(username: &str) -> String {
    format!("https://github.com/{username}.keys")
}

/// Outcome of one key fetch: the response body, whether the request
/// succeeded, and (on failure) whether it failed by timing out.
#[derive(Clone, Debug, Default)]
pub struct FetchResult {
    pub body: String,
    pub success: bool,
    pub timed_out: bool,
}

/// Fetches the public SSH keys published for a GitHub username.
///
/// Runs on a worker thread, so implementations may block.
pub trait KeyFetcher: Send + Sync {
    fn fetch_keys(&self, username: &str) -> FetchResult;
}

pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyFetcher for HttpFetcher {
    fn fetch_keys(&self, username: &str) -> FetchResult {
        let response = self
            .agent
            .get(&keys_url(username))
            .set("User-Agent", FETCH_USER_AGENT)
            .call();

        match response {
            Ok(resp) => match resp.into_string() {
                Ok(body) => FetchResult {
                    body,
                    success: true,
                    timed_out: false,
                },
                Err(err) => FetchResult {
                    body: String::new(),
                    success: false,
                    timed_out: is_io_timeout(&err),
                },
            },
            // GitHub answers 404 for an unknown username; any HTTP status
            // error is "doesn't exist" territory, only transport-level
            // timeouts count as timed out.
            Err(err) => {
                let timed_out = match &err {
                    ureq::Error::Transport(transport) => is_transport_timeout(transport),
                    _ => false,
                };
                FetchResult {
                    body: String::new(),
                    success: false,
                    timed_out,
                }
            }
        }
    }
}

fn is_io_timeout(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

fn is_transport_timeout(err: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return is_io_timeout(io);
        }
        source = std::error::Error::source(inner);
    }
    false
}
