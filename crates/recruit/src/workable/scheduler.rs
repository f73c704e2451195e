//! Single-flight, rate-aware request scheduler
//!
//! Every Workable API call is submitted here. Calls are queued on a channel
//! and executed one at a time, in submission order, by a dedicated worker
//! thread. The worker alone owns the [`RateLimitState`]:
//!
//! - at least `min_spacing` elapses between two dispatches
//! - when the window has one call left or fewer, the worker sleeps until the
//!   reset time plus `safety_margin`
//! - rate limit headers of every completed response update the state
//!
//! A failing call only fails its own submitter; the queue keeps draining.

use chrono::Utc;
use log::{debug, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{ApiError, HttpResponse};
use crate::models::RateLimitState;

/// Timing knobs for the scheduler
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Minimum gap between two dispatches, regardless of quota
    pub min_spacing: Duration,
    /// Extra wait past the advertised reset time
    pub safety_margin: Duration,
    /// Quota assumed when a response carries no `x-rate-limit-limit`
    pub default_limit: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_millis(100),
            safety_margin: Duration::from_secs(1),
            default_limit: 10,
        }
    }
}

type Call = Box<dyn FnOnce() -> Result<HttpResponse, ApiError> + Send>;

struct QueuedCall {
    call: Call,
    reply: Sender<Result<HttpResponse, ApiError>>,
}

/// Serializes all outbound API calls through one worker thread
pub struct RequestScheduler {
    queue: Option<Sender<QueuedCall>>,
    worker: Option<JoinHandle<()>>,
}

impl RequestScheduler {
    /// Start the worker thread
    pub fn new(config: SchedulerConfig) -> std::io::Result<Self> {
        let (queue, calls) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("workable-scheduler".to_string())
            .spawn(move || Worker::new(config).run(calls))?;

        Ok(Self {
            queue: Some(queue),
            worker: Some(worker),
        })
    }

    /// Queue `call` and block until the worker has executed it.
    ///
    /// The result (or error) of `call` is returned to this caller only.
    pub fn schedule<F>(&self, call: F) -> Result<HttpResponse, ApiError>
    where
        F: FnOnce() -> Result<HttpResponse, ApiError> + Send + 'static,
    {
        let queue = self.queue.as_ref().ok_or(ApiError::SchedulerClosed)?;
        let (reply, result) = mpsc::channel();

        queue
            .send(QueuedCall {
                call: Box::new(call),
                reply,
            })
            .map_err(|_| ApiError::SchedulerClosed)?;

        result.recv().map_err(|_| ApiError::SchedulerClosed)?
    }
}

impl Drop for RequestScheduler {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the queue is drained
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct Worker {
    config: SchedulerConfig,
    state: Option<RateLimitState>,
    last_dispatch: Option<Instant>,
}

impl Worker {
    fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: None,
            last_dispatch: None,
        }
    }

    fn run(mut self, calls: Receiver<QueuedCall>) {
        for queued in calls {
            self.wait_for_turn();
            self.last_dispatch = Some(Instant::now());

            let result = catch_unwind(AssertUnwindSafe(queued.call))
                .unwrap_or_else(|_| Err(ApiError::Transport("request panicked".to_string())));

            if let Ok(response) = &result {
                self.state = Some(RateLimitState::observe(
                    self.state.as_ref(),
                    &response.rate_limit,
                    self.config.default_limit,
                    Utc::now(),
                ));
            }

            // The submitter may have given up; nothing to do then
            let _ = queued.reply.send(result);
        }
    }

    /// Block until the next call may be dispatched
    fn wait_for_turn(&mut self) {
        if let Some(last) = self.last_dispatch {
            let elapsed = last.elapsed();
            if elapsed < self.config.min_spacing {
                thread::sleep(self.config.min_spacing - elapsed);
            }
        }

        if let Some(state) = self.state.as_mut()
            && state.is_exhausted()
        {
            let wait = state.wait_until_reset(Utc::now(), self.config.safety_margin);
            if !wait.is_zero() {
                if wait > Duration::from_secs(120) {
                    warn!(
                        "Rate limit reset is {}s away, waiting anyway",
                        wait.as_secs()
                    );
                }
                debug!(
                    "Rate limit nearly exhausted ({}/{} left), waiting {}ms for reset",
                    state.remaining,
                    state.limit,
                    wait.as_millis()
                );
                thread::sleep(wait);
            }
            state.replenish();
        }
    }
}
