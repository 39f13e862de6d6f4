//! Network infrastructure: installer script downloads over HTTPS.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ScriptFetcher;
use crate::domain::ProvisionError;

/// Upper bound on an installer script body.
const MAX_SCRIPT_BYTES: u64 = 4 * 1024 * 1024;

/// Production `ScriptFetcher` backed by a blocking `ureq` agent.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("pisetup/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl ScriptFetcher for UreqFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching installer");
        let agent = self.agent.clone();
        let owned_url = url.to_string();
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &owned_url))
            .await
            .context("spawn_blocking for installer fetch")?
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str) -> Result<String> {
    let fail = |reason: String| -> anyhow::Error {
        ProvisionError::FetchFailed {
            url: url.to_string(),
            reason,
        }
        .into()
    };

    if !url.starts_with("https://") {
        return Err(fail("installer URLs must use https".to_string()));
    }

    let response = match agent.get(url).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, _)) => return Err(fail(format!("HTTP {code}"))),
        Err(ureq::Error::Transport(t)) => return Err(fail(t.to_string())),
    };

    read_capped(response.into_reader(), MAX_SCRIPT_BYTES).map_err(fail)
}

/// Read a script body of at most `limit` bytes.
///
/// A body over the limit is rejected rather than truncated: a partial script
/// must never reach `sh`.
fn read_capped(reader: impl Read, limit: u64) -> std::result::Result<String, String> {
    let mut body = String::new();
    let read = reader
        .take(limit + 1)
        .read_to_string(&mut body)
        .map_err(|e| format!("reading body: {e}"))?;
    if u64::try_from(read).unwrap_or(u64::MAX) > limit {
        return Err(format!("installer exceeds {} MiB", limit / (1024 * 1024)));
    }
    if body.trim().is_empty() {
        return Err("empty response body".to_string());
    }
    Ok(body)
}
