//! # Runtime
//!
//! Executes the engine's effects. Fetches, content loads and timers run as
//! tokio tasks; each one ends by sending a single `Action` back over the
//! channel the UI loop drains. Tasks never touch engine state.
//!
//! ```text
//!   Effect::Fetch        ──▶ spawn: select!(cancelled, fetch)  ──▶ Action::FetchCompleted
//!   Effect::LoadContent  ──▶ inline: send now / url: as above  ──▶ Action::ContentLoaded
//!   Effect::Schedule     ──▶ spawn: sleep                      ──▶ Action::TimerFired
//!   Effect::Exit         ──▶ caller quits
//! ```
//!
//! A cancelled task exits without sending anything. The engine drops stale
//! results anyway, so a result that slips through a cancel is harmless.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::action::{Action, Effect, LoadTarget};
use crate::core::screen::ContentSource;
use crate::fetch::{ContentFetcher, FetchError, absolute_url};

pub struct Runtime {
    fetcher: Arc<dyn ContentFetcher>,
    /// Relative URLs are resolved against this.
    base_url: Option<Url>,
    tx: UnboundedSender<Action>,
    handles: Vec<AbortHandle>,
}

impl Runtime {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        base_url: Option<Url>,
        tx: UnboundedSender<Action>,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            tx,
            handles: Vec::new(),
        }
    }

    /// Runs `effects`. Returns true if one of them asked to exit.
    pub fn execute(&mut self, effects: Vec<Effect>) -> bool {
        self.handles.retain(|h| !h.is_finished());

        let mut exit = false;
        for effect in effects {
            match effect {
                Effect::Fetch {
                    attempt,
                    url,
                    cancel,
                } => {
                    let handle = self.spawn_fetch(url, cancel, move |result| {
                        Action::FetchCompleted { attempt, result }
                    });
                    self.handles.push(handle);
                }
                Effect::LoadContent {
                    target,
                    source,
                    cancel,
                } => self.load_content(target, source, cancel),
                Effect::Schedule { timer, after } => {
                    debug!("Scheduling {:?} in {:?}", timer, after);
                    let tx = self.tx.clone();
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        if tx.send(Action::TimerFired(timer)).is_err() {
                            debug!("Timer {:?} fired after shutdown", timer);
                        }
                    });
                    self.handles.push(handle.abort_handle());
                }
                Effect::Exit => exit = true,
            }
        }
        exit
    }

    /// Number of tasks that may still be running.
    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Aborts everything still running.
    pub fn shutdown(&mut self) {
        let pending = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        if pending > 0 {
            info!("Runtime shut down, aborted {} task(s)", pending);
        }
    }

    fn load_content(&mut self, target: LoadTarget, source: ContentSource, cancel: CancellationToken) {
        match source {
            ContentSource::Inline(document) => {
                if cancel.is_cancelled() {
                    return;
                }
                debug!("Inline content for {:?}", target);
                if self
                    .tx
                    .send(Action::ContentLoaded {
                        target,
                        result: Ok(document),
                    })
                    .is_err()
                {
                    warn!("Failed to deliver inline content: receiver dropped");
                }
            }
            ContentSource::Url(url) => {
                let handle = self.spawn_fetch(url, cancel, move |result| Action::ContentLoaded {
                    target,
                    result,
                });
                self.handles.push(handle);
            }
        }
    }

    fn spawn_fetch<F>(&self, raw_url: String, cancel: CancellationToken, into_action: F) -> AbortHandle
    where
        F: FnOnce(Result<Value, FetchError>) -> Action + Send + 'static,
    {
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        let resolved = absolute_url(self.base_url.as_ref(), &raw_url);

        let handle = tokio::spawn(async move {
            let result = match resolved {
                Ok(url) => {
                    info!("Fetching {} via {}", url, fetcher.name());
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!("Fetch of {} cancelled", url);
                            return;
                        }
                        result = fetcher.fetch_json(url.as_str()) => result,
                    }
                }
                Err(e) => Err(e),
            };

            if cancel.is_cancelled() {
                debug!("Dropping result for {}: cancelled", raw_url);
                return;
            }
            if let Err(e) = &result {
                warn!("Fetch of {} failed: {}", raw_url, e);
            }
            if tx.send(into_action(result)).is_err() {
                warn!("Failed to deliver fetch result for {}: receiver dropped", raw_url);
            }
        });
        handle.abort_handle()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
