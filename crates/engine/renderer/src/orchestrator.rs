//! Render orchestrator
//!
//! A cooperative state machine that renders every rig camera through a
//! [`RenderHost`] with a single render slot:
//!
//! ```text
//! Idle ──execute──▶ Armed ──first dispatch──▶ Draining ──queue empty / cancel / failure──▶ Terminated
//! ```
//!
//! The orchestrator never blocks. The host's timer calls [`RenderOrchestrator::tick`]
//! periodically; host notifications are queued on a channel and applied at the start
//! of the next tick, so job states are only ever changed from one place.

use crate::error::{RenderError, Result};
use crate::host::{HostEvent, RenderHost};
use crate::job::{JobState, RenderJob};
use rig::{Camera, Studio};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// Default delay between two poll ticks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Ticks without a start notification before the render request is re-issued
pub const DEFAULT_REISSUE_AFTER_TICKS: u32 = 4;

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Directory the frames are written to; rendering is unavailable until set
    pub output_dir: Option<PathBuf>,
    /// File extension (and therefore format) of the rendered frames
    pub extension: String,
    /// Delay between ticks when driven by [`crate::run_to_completion`]
    pub poll_interval: Duration,
    /// Re-issue a render request that has not started after this many ticks (0 = never)
    pub reissue_after_ticks: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            extension: "png".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            reissue_after_ticks: DEFAULT_REISSUE_AFTER_TICKS,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_reissue_after_ticks(mut self, ticks: u32) -> Self {
        self.reissue_after_ticks = ticks;
        self
    }

    /// Output file for a rig camera: `<output_dir>/<camera name>.<extension>`
    pub fn output_path(&self, output_dir: &Path, camera: &Camera) -> PathBuf {
        output_dir.join(format!("{}.{}", camera.name, self.extension))
    }
}

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// No job queue
    Idle,
    /// Queue filled and host subscribed, nothing dispatched yet
    Armed,
    /// Jobs are being fed to the host
    Draining,
    /// Queue torn down, active camera restored
    Terminated,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every job finished
    Completed { rendered: usize },
    /// A cancellation arrived; `abandoned` jobs were never finished
    Cancelled { rendered: usize, abandoned: usize },
    /// The host failed the job for rig camera `index`
    Failed { index: usize, reason: String },
}

/// Result of one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Keep polling
    Pending,
    /// Terminated; stop the timer
    Ready(RenderOutcome),
}

/// Why the queue is being torn down
enum Halt {
    Cancelled,
    Failed { index: usize, reason: String },
}

/// Feeds rig cameras to a render host one at a time
pub struct RenderOrchestrator {
    config: OrchestratorConfig,
    state: OrchestratorState,
    jobs: Vec<RenderJob>,
    queue: VecDeque<usize>,
    in_flight: Option<usize>,
    /// Active camera at `execute`; taken exactly once on teardown
    saved_camera: Option<Option<Camera>>,
    inbox: Option<Sender<HostEvent>>,
    events: Option<Receiver<HostEvent>>,
    outcome: Option<RenderOutcome>,
}

impl RenderOrchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            state: OrchestratorState::Idle,
            jobs: Vec::new(),
            queue: VecDeque::new(),
            in_flight: None,
            saved_camera: None,
            inbox: None,
            events: None,
            outcome: None,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.config.output_dir = Some(output_dir.into());
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// All jobs of the current (or last) run, in index order
    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    /// Outcome of the last run once terminated
    pub fn outcome(&self) -> Option<&RenderOutcome> {
        self.outcome.as_ref()
    }

    /// `(finished, total)` job counts
    pub fn progress(&self) -> (usize, usize) {
        let done = self
            .jobs
            .iter()
            .filter(|job| job.state == JobState::Done)
            .count();
        (done, self.jobs.len())
    }

    /// Whether [`RenderOrchestrator::execute`] would be accepted
    pub fn can_execute(&self, studio: &Studio) -> bool {
        self.check_preconditions(studio).is_ok()
    }

    fn check_preconditions(&self, studio: &Studio) -> Result<()> {
        if self.is_running() {
            return Err(RenderError::AlreadyRunning);
        }
        if self.config.output_dir.is_none() {
            return Err(RenderError::NoOutputDirectory);
        }
        if studio.rig_cameras().is_empty() {
            return Err(RenderError::NoRigCameras);
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        matches!(
            self.state,
            OrchestratorState::Armed | OrchestratorState::Draining
        )
    }

    /// Save the active camera, queue every rig camera and subscribe to the host
    pub fn execute<H: RenderHost + ?Sized>(&mut self, studio: &Studio, host: &mut H) -> Result<()> {
        self.check_preconditions(studio)?;
        let output_dir = self
            .config
            .output_dir
            .clone()
            .ok_or(RenderError::NoOutputDirectory)?;

        self.jobs = studio
            .rig_cameras()
            .iter()
            .map(|rig_camera| {
                let camera = rig_camera.camera().clone();
                let output_path = self.config.output_path(&output_dir, &camera);
                RenderJob::new(rig_camera.index(), camera, output_path)
            })
            .collect();
        self.queue = (0..self.jobs.len()).collect();
        self.in_flight = None;
        self.outcome = None;
        self.saved_camera = Some(host.active_camera());

        let (sender, receiver) = channel();
        host.subscribe(sender.clone());
        self.inbox = Some(sender);
        self.events = Some(receiver);

        self.state = OrchestratorState::Armed;
        tracing::info!(
            "Armed render queue with {} jobs into {}",
            self.jobs.len(),
            output_dir.display()
        );
        Ok(())
    }

    /// Ask the run to stop; takes effect on the next tick like a host cancellation
    pub fn request_cancel(&self) {
        if let Some(inbox) = &self.inbox {
            let _ = inbox.send(HostEvent::Cancelled);
        }
    }

    /// Advance the state machine by one poll tick
    pub fn tick<H: RenderHost + ?Sized>(&mut self, host: &mut H) -> Result<Poll> {
        match self.state {
            OrchestratorState::Idle => return Err(RenderError::NotRunning),
            OrchestratorState::Terminated => {
                return self
                    .outcome
                    .clone()
                    .map(Poll::Ready)
                    .ok_or(RenderError::NotRunning);
            }
            OrchestratorState::Armed | OrchestratorState::Draining => {}
        }

        let mut halt = self.apply_events();

        if halt.is_none() && self.in_flight.is_none() {
            if self.queue.is_empty() {
                return Ok(Poll::Ready(self.terminate(host, None)));
            }
            halt = self.dispatch_next(host).err();
        } else if halt.is_none() {
            halt = self.wait_for_in_flight(host).err();
        }

        match halt {
            Some(halt) => Ok(Poll::Ready(self.terminate(host, Some(halt)))),
            None => Ok(Poll::Pending),
        }
    }

    /// Drain queued notifications into job states
    fn apply_events(&mut self) -> Option<Halt> {
        let events: Vec<HostEvent> = match &self.events {
            Some(events) => events.try_iter().collect(),
            None => return None,
        };

        let mut halt = None;
        for event in events {
            match event {
                HostEvent::Cancelled => {
                    tracing::info!("Render cancelled by host");
                    halt.get_or_insert(Halt::Cancelled);
                }
                HostEvent::Started(path) => {
                    if let Some(job) = self.in_flight_job_for(&path) {
                        if job.state == JobState::Dispatched {
                            job.state = JobState::Rendering;
                            job.waiting_ticks = 0;
                            tracing::debug!("Render started: {}", path.display());
                        }
                    }
                }
                HostEvent::Finished(path) => {
                    if let Some(job) = self.in_flight_job_for(&path) {
                        job.state = JobState::Done;
                        tracing::info!("Rendered camera {} to {}", job.index, path.display());
                        self.in_flight = None;
                    }
                }
                HostEvent::Failed { output, reason } => {
                    if let Some(job) = self.in_flight_job_for(&output) {
                        job.state = JobState::Failed;
                        let index = job.index;
                        tracing::error!("Render of camera {} failed: {}", index, reason);
                        self.in_flight = None;
                        halt.get_or_insert(Halt::Failed { index, reason });
                    }
                }
            }
        }
        halt
    }

    /// In-flight job writing to `path`; notifications for anything else are stale
    fn in_flight_job_for(&mut self, path: &Path) -> Option<&mut RenderJob> {
        let job = match self.in_flight {
            Some(slot) => &mut self.jobs[slot],
            None => {
                tracing::debug!("Ignoring notification for {} (no job in flight)", path.display());
                return None;
            }
        };
        if job.output_path != path {
            tracing::debug!(
                "Ignoring stale notification for {} (in flight: {})",
                path.display(),
                job.output_path.display()
            );
            return None;
        }
        Some(job)
    }

    fn dispatch_next<H: RenderHost + ?Sized>(&mut self, host: &mut H) -> std::result::Result<(), Halt> {
        let Some(slot) = self.queue.pop_front() else {
            return Ok(());
        };
        self.in_flight = Some(slot);
        self.state = OrchestratorState::Draining;

        let job = &mut self.jobs[slot];
        host.set_active_camera(Some(job.camera.clone()));

        if let Some(dir) = job.output_path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                job.state = JobState::Failed;
                return Err(Halt::Failed {
                    index: job.index,
                    reason: RenderError::OutputDirectory {
                        path: dir.to_path_buf(),
                        source: err,
                    }
                    .to_string(),
                });
            }
        }

        tracing::info!(
            "Dispatching camera {} ({}) -> {}",
            job.index,
            job.camera.name,
            job.output_path.display()
        );
        Self::issue(host, job)
    }

    /// Nothing to do while a job renders, except re-issuing one that never started
    fn wait_for_in_flight<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> std::result::Result<(), Halt> {
        let Some(slot) = self.in_flight else {
            return Ok(());
        };
        let reissue_after = self.config.reissue_after_ticks;
        let job = &mut self.jobs[slot];
        if job.state != JobState::Dispatched {
            return Ok(());
        }

        job.waiting_ticks += 1;
        if reissue_after > 0 && job.waiting_ticks >= reissue_after {
            tracing::warn!(
                "Camera {} has not started after {} ticks, re-issuing render",
                job.index,
                job.waiting_ticks
            );
            return Self::issue(host, job);
        }
        Ok(())
    }

    fn issue<H: RenderHost + ?Sized>(host: &mut H, job: &mut RenderJob) -> std::result::Result<(), Halt> {
        job.attempts += 1;
        job.waiting_ticks = 0;
        job.state = JobState::Dispatched;
        host.render_async(&job.camera, &job.output_path)
            .map_err(|err| {
                job.state = JobState::Failed;
                Halt::Failed {
                    index: job.index,
                    reason: err.to_string(),
                }
            })
    }

    /// Abort any in-flight frame, unsubscribe, drop the queue, restore the active camera
    fn terminate<H: RenderHost + ?Sized>(&mut self, host: &mut H, halt: Option<Halt>) -> RenderOutcome {
        if let Some(slot) = self.in_flight.take() {
            if halt.is_some() {
                tracing::info!(
                    "Abandoning in-flight render of camera {}",
                    self.jobs[slot].index
                );
                host.cancel();
            }
        }
        host.unsubscribe();
        self.inbox = None;
        self.events = None;

        self.queue.clear();
        let mut abandoned = 0;
        for job in &mut self.jobs {
            if !job.state.is_terminal() {
                job.state = JobState::Cancelled;
                abandoned += 1;
            }
        }

        if let Some(camera) = self.saved_camera.take() {
            host.set_active_camera(camera);
        }

        let rendered = self.progress().0;
        let outcome = match halt {
            None => RenderOutcome::Completed { rendered },
            Some(Halt::Cancelled) => RenderOutcome::Cancelled {
                rendered,
                abandoned,
            },
            Some(Halt::Failed { index, reason }) => RenderOutcome::Failed { index, reason },
        };

        self.state = OrchestratorState::Terminated;
        tracing::info!("Render queue terminated: {:?}", outcome);
        self.outcome = Some(outcome.clone());
        outcome
    }
}
