//! Job controller use case
//!
//! Owns the single tracked analysis job: uploads a recording, polls the
//! job on a fixed interval until it reaches a terminal status, and derives
//! the report download links once it is done.
//!
//! State lives behind one mutex and is published through a `watch` channel
//! after every mutation, so a presenter can render transitions without
//! touching the controller internals. Every polling session and every
//! submission gets a generation number; a response is applied only while its
//! generation is still the active one, which keeps late answers from a
//! replaced job or a cancelled session from overwriting newer state.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::job::{BackendChoice, DownloadLinks, Job, JobFailure};
use crate::domain::upload::AudioFile;

use super::ports::{AnalysisApi, ApiError};

/// Delay between two status queries of a polling session
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Snapshot of everything the controller exposes to a presenter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// The tracked job, if any
    pub job: Option<Job>,
    /// An upload request is outstanding
    pub uploading: bool,
    /// A polling session is active
    pub polling: bool,
}

impl ControllerState {
    /// Nothing is in flight: no upload outstanding and no session running
    pub fn is_settled(&self) -> bool {
        !self.uploading && !self.polling
    }
}

struct PollingSession {
    job_id: String,
    generation: u64,
    handle: JoinHandle<()>,
}

struct Inner {
    state: ControllerState,
    session: Option<PollingSession>,
    poll_generation: u64,
    submit_generation: u64,
}

impl Inner {
    fn is_active(&self, generation: u64) -> bool {
        matches!(&self.session, Some(s) if s.generation == generation)
    }

    /// Tear down the active session, if any. The task is aborted so no
    /// further tick fires, and its generation stops being active so an
    /// in-flight response is discarded.
    fn stop_session(&mut self) -> bool {
        self.state.polling = false;
        match self.session.take() {
            Some(session) => {
                session.handle.abort();
                debug!(
                    job_id = %session.job_id,
                    generation = session.generation,
                    "Polling session stopped"
                );
                true
            }
            None => false,
        }
    }
}

struct Shared<A> {
    api: A,
    inner: Mutex<Inner>,
    updates: watch::Sender<ControllerState>,
    poll_interval: Duration,
}

impl<A> Shared<A> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Critical sections never panic midway, a poisoned lock still holds consistent state
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.state.clone());
    }

    /// Apply the outcome of one tick. Returns true when the session is over.
    fn apply_tick(&self, generation: u64, job_id: &str, outcome: Result<Job, ApiError>) -> bool {
        let mut inner = self.lock();
        if !inner.is_active(generation) {
            debug!(job_id, generation, "Discarding status from a retired polling session");
            return true;
        }

        let finished = match outcome {
            Ok(job) => {
                let terminal = job.is_terminal();
                if terminal {
                    info!(job_id = %job.job_id, status = %job.status, "Job reached a terminal status");
                } else {
                    debug!(job_id = %job.job_id, status = %job.status, "Job in progress");
                }
                inner.state.job = Some(job);
                terminal
            }
            Err(e) => {
                warn!(job_id, error = %e, "Status poll failed, stopping session");
                let last_job_id = inner
                    .state
                    .job
                    .as_ref()
                    .map(|j| j.job_id.clone())
                    .or_else(|| Some(job_id.to_string()));
                inner.state.job = Some(JobFailure::PollTransport { last_job_id }.into_job());
                true
            }
        };

        if finished {
            // Dropping our own handle detaches the task, which returns right after
            inner.session = None;
            inner.state.polling = false;
        }
        self.publish(&inner);
        finished
    }
}

/// Clears `uploading` when a submission is dropped before its response
/// was applied, unless a newer submission already took over.
struct PendingUpload<'a, A> {
    shared: &'a Shared<A>,
    generation: u64,
    resolved: bool,
}

impl<A> Drop for PendingUpload<'_, A> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut inner = self.shared.lock();
        if inner.submit_generation == self.generation && inner.state.uploading {
            debug!(generation = self.generation, "Submission cancelled before a response");
            inner.state.uploading = false;
            self.shared.publish(&inner);
        }
    }
}

impl<A> Drop for Shared<A> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
        inner.stop_session();
    }
}

/// Submit → poll → terminate orchestration for a single job.
///
/// Cheap to clone; clones share the same job slot and session.
pub struct JobController<A> {
    shared: Arc<Shared<A>>,
}

impl<A> Clone for JobController<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> JobController<A>
where
    A: AnalysisApi + 'static,
{
    /// Create a controller polling every [`POLL_INTERVAL`]
    pub fn new(api: A) -> Self {
        Self::with_poll_interval(api, POLL_INTERVAL)
    }

    /// Create a controller with a custom polling interval
    pub fn with_poll_interval(api: A, poll_interval: Duration) -> Self {
        let (updates, _) = watch::channel(ControllerState::default());
        Self {
            shared: Arc::new(Shared {
                api,
                inner: Mutex::new(Inner {
                    state: ControllerState::default(),
                    session: None,
                    poll_generation: 0,
                    submit_generation: 0,
                }),
                updates,
                poll_interval,
            }),
        }
    }

    /// The service adapter this controller talks to
    pub fn api(&self) -> &A {
        &self.shared.api
    }

    /// Current state snapshot
    pub fn state(&self) -> ControllerState {
        self.shared.lock().state.clone()
    }

    /// The tracked job, if any
    pub fn job(&self) -> Option<Job> {
        self.shared.lock().state.job.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.shared.lock().state.uploading
    }

    pub fn is_polling(&self) -> bool {
        self.shared.lock().state.polling
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.shared.updates.subscribe()
    }

    /// Report links for the tracked job; empty unless it is `done`
    pub fn download_links(&self) -> DownloadLinks {
        let inner = self.shared.lock();
        DownloadLinks::derive(self.shared.api.base_url(), inner.state.job.as_ref())
    }

    /// Upload a recording and start tracking the resulting job.
    ///
    /// Previous job state is discarded before the request goes out. On
    /// success a polling session is started for the new job; on failure the
    /// job is set to an `error` state and nothing is polled. If another
    /// submission starts while this one is outstanding, the newer one wins
    /// and this response is dropped.
    ///
    /// # Returns
    /// The job this submission resolved to
    pub async fn submit(&self, file: &AudioFile, backend: BackendChoice) -> Job {
        let generation = {
            let mut inner = self.shared.lock();
            inner.stop_session();
            inner.submit_generation += 1;
            inner.state.job = None;
            inner.state.uploading = true;
            self.shared.publish(&inner);
            inner.submit_generation
        };
        let mut pending = PendingUpload {
            shared: &self.shared,
            generation,
            resolved: false,
        };

        info!(
            file = file.file_name(),
            size = %file.human_readable_size(),
            backend = %backend,
            "Submitting recording"
        );

        let (job, accepted) = match self.shared.api.submit(file, backend).await {
            Ok(job) => {
                info!(job_id = %job.job_id, status = %job.status, "Upload accepted");
                (job, true)
            }
            Err(ApiError::Rejected(rejection)) => {
                warn!(status = rejection.status, message = ?rejection.message, "Upload rejected");
                let failure = JobFailure::SubmissionRejected {
                    job_id: rejection.job_id,
                    message: rejection.message,
                };
                (failure.into_job(), false)
            }
            Err(e) => {
                warn!(error = %e, "Upload did not complete");
                (JobFailure::SubmissionTransport.into_job(), false)
            }
        };

        pending.resolved = true;
        let mut inner = self.shared.lock();
        if inner.submit_generation != generation {
            debug!(job_id = %job.job_id, "Discarding result of a superseded submission");
            return job;
        }

        inner.state.uploading = false;
        inner.state.job = Some(job.clone());
        if accepted {
            self.spawn_session(&mut inner, job.job_id.clone());
        }
        self.shared.publish(&inner);
        job
    }

    /// Start polling the given job, replacing any active session.
    ///
    /// If a different job is currently tracked its state is cleared, a
    /// session only ever refers to the tracked job. Must be called from
    /// within a tokio runtime.
    pub fn start_polling(&self, job_id: &str) {
        let mut inner = self.shared.lock();
        if inner.state.job.as_ref().map(|j| j.job_id.as_str()) != Some(job_id) {
            inner.state.job = None;
        }
        self.spawn_session(&mut inner, job_id.to_string());
        self.shared.publish(&inner);
    }

    /// Stop the active session. Safe to call repeatedly; after it returns
    /// no further status query is issued or applied.
    pub fn stop_polling(&self) {
        let mut inner = self.shared.lock();
        if inner.stop_session() {
            self.shared.publish(&inner);
        }
    }

    /// Resolve once no upload is outstanding and no session is running
    pub async fn wait_until_settled(&self) -> ControllerState {
        let mut updates = self.subscribe();
        let settled = updates
            .wait_for(ControllerState::is_settled)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    fn spawn_session(&self, inner: &mut Inner, job_id: String) {
        inner.stop_session();
        inner.poll_generation += 1;
        let generation = inner.poll_generation;

        debug!(job_id = %job_id, generation, "Polling session started");
        let handle = tokio::spawn(run_session(
            Arc::downgrade(&self.shared),
            job_id.clone(),
            generation,
            self.shared.poll_interval,
        ));

        inner.session = Some(PollingSession {
            job_id,
            generation,
            handle,
        });
        inner.state.polling = true;
    }
}

/// Timer loop of one polling session. Ticks keep a fixed cadence from the
/// session start and never overlap: a query slower than the interval is
/// followed by the next one as soon as it resolves.
async fn run_session<A>(shared: Weak<Shared<A>>, job_id: String, generation: u64, period: Duration)
where
    A: AnalysisApi + 'static,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(strong) = shared.upgrade() else {
            return;
        };
        let outcome = strong.api.job_status(&job_id).await;
        if strong.apply_tick(generation, &job_id, outcome) {
            return;
        }
    }
}
