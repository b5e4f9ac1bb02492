//! Scripted downstream client for aggregator tests.

use crate::lookup::{
    domain::{DownstreamError, DownstreamReply, LookupTarget},
    ports::DownstreamClient,
};
use crate::registry::domain::BaseAddress;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// In-memory downstream client.
///
/// Each address is scripted with a reply, a transport failure or a call that
/// never resolves, optionally after a delay. Unscripted addresses behave like
/// a refused connection. Every call is counted per address.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDownstreamClient {
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Clone)]
enum Script {
    Reply(DownstreamReply),
    Fail(DownstreamError),
    Hang,
}

#[derive(Debug, Default)]
struct ScriptState {
    scripts: HashMap<BaseAddress, (Script, Duration)>,
    calls: HashMap<BaseAddress, usize>,
    identifiers: Vec<String>,
}

impl ScriptedDownstreamClient {
    /// Creates a client with no scripted services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `address` answer immediately with `status` and `body`.
    pub fn reply(&self, address: &BaseAddress, status: u16, body: impl Into<String>) {
        self.script(
            address,
            Script::Reply(DownstreamReply::new(status, body)),
            Duration::ZERO,
        );
    }

    /// Makes `address` answer with `status` and `body` after `delay`.
    pub fn reply_after(
        &self,
        address: &BaseAddress,
        delay: Duration,
        status: u16,
        body: impl Into<String>,
    ) {
        self.script(
            address,
            Script::Reply(DownstreamReply::new(status, body)),
            delay,
        );
    }

    /// Makes `address` fail with `error` after `delay`.
    pub fn fail_after(&self, address: &BaseAddress, delay: Duration, error: DownstreamError) {
        self.script(address, Script::Fail(error), delay);
    }

    /// Makes calls to `address` never resolve.
    pub fn hang(&self, address: &BaseAddress) {
        self.script(address, Script::Hang, Duration::ZERO);
    }

    /// Returns how many calls have targeted `address`.
    #[must_use]
    pub fn calls(&self, address: &BaseAddress) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(address).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Returns the total number of calls made.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state
            .read()
            .map(|state| state.calls.values().sum())
            .unwrap_or_default()
    }

    /// Returns every identifier requested, in call order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.identifiers.clone())
            .unwrap_or_default()
    }

    fn script(&self, address: &BaseAddress, script: Script, delay: Duration) {
        if let Ok(mut state) = self.state.write() {
            state.scripts.insert(address.clone(), (script, delay));
        }
    }
}

#[async_trait]
impl DownstreamClient for ScriptedDownstreamClient {
    async fn fetch(
        &self,
        target: &LookupTarget,
        identifier: &str,
    ) -> Result<DownstreamReply, DownstreamError> {
        let scripted = {
            let mut state = self
                .state
                .write()
                .map_err(|err| DownstreamError::Transport(err.to_string()))?;
            *state.calls.entry(target.address().clone()).or_default() += 1;
            state.identifiers.push(identifier.to_owned());
            state.scripts.get(target.address()).cloned()
        };

        let Some((script, delay)) = scripted else {
            return Err(DownstreamError::Refused);
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match script {
            Script::Reply(reply) => Ok(reply),
            Script::Fail(error) => Err(error),
            Script::Hang => std::future::pending().await,
        }
    }
}
