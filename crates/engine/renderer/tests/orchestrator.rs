//! Orchestrator behaviour against a scripted host
//!
//! The host records every call and only emits notifications when told to, so each
//! test controls exactly when starts, completions, failures and cancellations arrive.

use renderer::{
    BlockingAdapter, EventSender, HostEvent, JobState, OrchestratorConfig, OrchestratorState,
    Poll, RenderError, RenderHost, RenderOrchestrator, RenderOutcome, SyncRenderHost,
};
use rig::{camera_name, Camera, RigSettings, Studio};
use std::path::{Path, PathBuf};

#[derive(Default)]
struct ScriptedHost {
    active: Option<Camera>,
    subscriber: Option<EventSender>,
    /// `(camera name, output path)` per render request
    requests: Vec<(String, PathBuf)>,
    /// Camera names passed to `set_active_camera`
    activations: Vec<Option<String>>,
    unsubscribed: usize,
    /// Calls to `cancel`
    cancels: usize,
    /// Emit `Started` and `Finished` right away
    auto_finish: bool,
    /// Reject the n-th render request (0-based)
    reject_request: Option<usize>,
}

impl ScriptedHost {
    fn with_main_camera() -> Self {
        Self {
            active: Some(Camera::default()),
            ..Self::default()
        }
    }

    fn auto_finishing() -> Self {
        Self {
            auto_finish: true,
            ..Self::with_main_camera()
        }
    }

    fn emit(&self, event: HostEvent) {
        if let Some(subscriber) = &self.subscriber {
            subscriber.send(event).unwrap();
        }
    }

    fn last_output(&self) -> PathBuf {
        self.requests.last().unwrap().1.clone()
    }

    fn restorations(&self) -> usize {
        self.activations
            .iter()
            .filter(|name| name.as_deref() == Some("Camera"))
            .count()
    }
}

impl RenderHost for ScriptedHost {
    fn active_camera(&self) -> Option<Camera> {
        self.active.clone()
    }

    fn set_active_camera(&mut self, camera: Option<Camera>) {
        self.activations
            .push(camera.as_ref().map(|camera| camera.name.clone()));
        self.active = camera;
    }

    fn render_async(&mut self, camera: &Camera, output: &Path) -> renderer::Result<()> {
        if self.reject_request == Some(self.requests.len()) {
            return Err(RenderError::Host("render slot busy".to_string()));
        }
        self.requests
            .push((camera.name.clone(), output.to_path_buf()));
        if self.auto_finish {
            self.emit(HostEvent::Started(output.to_path_buf()));
            self.emit(HostEvent::Finished(output.to_path_buf()));
        }
        Ok(())
    }

    fn subscribe(&mut self, events: EventSender) {
        self.subscriber = Some(events);
    }

    fn unsubscribe(&mut self) {
        self.subscriber = None;
        self.unsubscribed += 1;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

fn studio(count: usize) -> Studio {
    let mut studio = Studio::new(RigSettings::new(count, 10.0, 3.0).unwrap());
    studio.set_main_camera(Camera::default());
    studio.build().unwrap();
    studio
}

fn orchestrator(output_dir: &Path, reissue_after_ticks: u32) -> RenderOrchestrator {
    RenderOrchestrator::new(
        OrchestratorConfig::default()
            .with_output_dir(output_dir)
            .with_reissue_after_ticks(reissue_after_ticks),
    )
}

fn run<H: RenderHost>(orch: &mut RenderOrchestrator, host: &mut H, max_ticks: usize) -> RenderOutcome {
    for _ in 0..max_ticks {
        if let Poll::Ready(outcome) = orch.tick(host).unwrap() {
            return outcome;
        }
    }
    panic!("orchestrator did not terminate within {max_ticks} ticks");
}

#[test]
fn test_renders_every_camera_in_index_order() {
    let studio = studio(4);
    let mut host = ScriptedHost::auto_finishing();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);

    orch.execute(&studio, &mut host).unwrap();
    assert_eq!(orch.state(), OrchestratorState::Armed);

    // One dispatch per tick plus the final teardown tick
    let outcome = run(&mut orch, &mut host, 4 + 1);
    assert_eq!(outcome, RenderOutcome::Completed { rendered: 4 });

    let names: Vec<_> = host.requests.iter().map(|(name, _)| name.clone()).collect();
    assert_eq!(names, (0..4).map(camera_name).collect::<Vec<_>>());
    let output_dir = orch.config().output_dir.clone().unwrap();
    assert_eq!(host.requests[2].1, output_dir.join("LentiCamera_2.png"));
    assert!(orch.jobs().iter().all(|job| job.state == JobState::Done));
    assert_eq!(orch.progress(), (4, 4));
}

#[test]
fn test_only_one_job_in_flight() {
    let studio = studio(3);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    for _ in 0..5 {
        assert_eq!(orch.tick(&mut host).unwrap(), Poll::Pending);
    }
    assert_eq!(host.requests.len(), 1);
    assert_eq!(orch.state(), OrchestratorState::Draining);

    let output = host.last_output();
    host.emit(HostEvent::Started(output.clone()));
    orch.tick(&mut host).unwrap();
    assert_eq!(orch.jobs()[0].state, JobState::Rendering);
    assert_eq!(host.requests.len(), 1);

    host.emit(HostEvent::Finished(output));
    orch.tick(&mut host).unwrap();
    assert_eq!(orch.jobs()[0].state, JobState::Done);
    assert_eq!(orch.jobs()[1].state, JobState::Dispatched);
    assert_eq!(host.requests.len(), 2);
    assert_eq!(host.active.as_ref().unwrap().name, camera_name(1));
}

#[test]
fn test_active_camera_restored_exactly_once() {
    let studio = studio(2);
    let mut host = ScriptedHost::auto_finishing();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    run(&mut orch, &mut host, 10);
    assert_eq!(host.active, Some(Camera::default()));
    assert_eq!(host.restorations(), 1);
    assert_eq!(host.unsubscribed, 1);
    assert_eq!(host.cancels, 0);

    // Ticking a terminated run repeats the outcome without side effects
    let again = orch.tick(&mut host).unwrap();
    assert_eq!(again, Poll::Ready(RenderOutcome::Completed { rendered: 2 }));
    assert_eq!(host.restorations(), 1);
    assert_eq!(host.unsubscribed, 1);
}

#[test]
fn test_cancel_request_stops_within_one_tick() {
    let studio = studio(3);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    orch.tick(&mut host).unwrap();
    host.emit(HostEvent::Started(host.last_output()));
    orch.request_cancel();

    let poll = orch.tick(&mut host).unwrap();
    assert_eq!(
        poll,
        Poll::Ready(RenderOutcome::Cancelled {
            rendered: 0,
            abandoned: 3
        })
    );
    assert_eq!(orch.state(), OrchestratorState::Terminated);
    assert!(orch.jobs().iter().all(|job| job.state == JobState::Cancelled));
    assert_eq!(host.requests.len(), 1);
    assert_eq!(host.active, Some(Camera::default()));
    assert!(host.subscriber.is_none());
    // The frame that was rendering is abandoned on the host as well
    assert_eq!(host.cancels, 1);
}

#[test]
fn test_host_cancellation_keeps_finished_jobs() {
    let studio = studio(3);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    orch.tick(&mut host).unwrap();
    host.emit(HostEvent::Finished(host.last_output()));
    orch.tick(&mut host).unwrap();
    host.emit(HostEvent::Cancelled);

    let poll = orch.tick(&mut host).unwrap();
    assert_eq!(
        poll,
        Poll::Ready(RenderOutcome::Cancelled {
            rendered: 1,
            abandoned: 2
        })
    );
    assert_eq!(orch.jobs()[0].state, JobState::Done);
    assert_eq!(host.restorations(), 1);
}

#[test]
fn test_host_failure_terminates_run() {
    let studio = studio(3);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    orch.tick(&mut host).unwrap();
    host.emit(HostEvent::Failed {
        output: host.last_output(),
        reason: "out of memory".to_string(),
    });

    let poll = orch.tick(&mut host).unwrap();
    assert_eq!(
        poll,
        Poll::Ready(RenderOutcome::Failed {
            index: 0,
            reason: "out of memory".to_string()
        })
    );
    assert_eq!(orch.jobs()[0].state, JobState::Failed);
    assert_eq!(orch.jobs()[1].state, JobState::Cancelled);
    assert_eq!(host.active, Some(Camera::default()));
    // Nothing left in the render slot to abandon
    assert_eq!(host.cancels, 0);
}

#[test]
fn test_rejected_request_fails_run() {
    let studio = studio(3);
    let mut host = ScriptedHost {
        reject_request: Some(1),
        ..ScriptedHost::auto_finishing()
    };
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    let outcome = run(&mut orch, &mut host, 10);
    assert!(matches!(outcome, RenderOutcome::Failed { index: 1, .. }));
    assert_eq!(orch.progress(), (1, 3));
    assert_eq!(host.restorations(), 1);
}

#[test]
fn test_silent_request_is_reissued() {
    let studio = studio(2);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 2);
    orch.execute(&studio, &mut host).unwrap();

    orch.tick(&mut host).unwrap();
    orch.tick(&mut host).unwrap();
    assert_eq!(host.requests.len(), 1);

    orch.tick(&mut host).unwrap();
    assert_eq!(host.requests.len(), 2);
    assert_eq!(host.requests[0], host.requests[1]);
    assert_eq!(orch.jobs()[0].attempts, 2);
    assert_eq!(orch.jobs()[0].state, JobState::Dispatched);
}

#[test]
fn test_started_job_is_not_reissued() {
    let studio = studio(2);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 1);
    orch.execute(&studio, &mut host).unwrap();

    orch.tick(&mut host).unwrap();
    host.emit(HostEvent::Started(host.last_output()));
    for _ in 0..5 {
        orch.tick(&mut host).unwrap();
    }
    assert_eq!(host.requests.len(), 1);
    assert_eq!(orch.jobs()[0].attempts, 1);
}

#[test]
fn test_stale_notifications_are_ignored() {
    let studio = studio(2);
    let mut host = ScriptedHost::with_main_camera();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();
    orch.tick(&mut host).unwrap();

    let other = orch.jobs()[1].output_path.clone();
    host.emit(HostEvent::Finished(other.clone()));
    host.emit(HostEvent::Failed {
        output: other,
        reason: "not mine".to_string(),
    });

    assert_eq!(orch.tick(&mut host).unwrap(), Poll::Pending);
    assert_eq!(orch.jobs()[0].state, JobState::Dispatched);
    assert_eq!(orch.jobs()[1].state, JobState::Queued);
    assert_eq!(host.requests.len(), 1);
}

#[test]
fn test_preconditions() {
    let built = studio(2);
    let mut host = ScriptedHost::with_main_camera();

    let mut no_dir = RenderOrchestrator::new(OrchestratorConfig::default());
    assert!(!no_dir.can_execute(&built));
    assert!(matches!(
        no_dir.execute(&built, &mut host),
        Err(RenderError::NoOutputDirectory)
    ));
    assert!(matches!(no_dir.tick(&mut host), Err(RenderError::NotRunning)));

    let unbuilt = Studio::default();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    assert!(matches!(
        orch.execute(&unbuilt, &mut host),
        Err(RenderError::NoRigCameras)
    ));

    assert!(orch.can_execute(&built));
    orch.execute(&built, &mut host).unwrap();
    assert!(!orch.can_execute(&built));
    assert!(matches!(
        orch.execute(&built, &mut host),
        Err(RenderError::AlreadyRunning)
    ));
    assert!(host.activations.is_empty());
}

#[test]
fn test_orchestrator_can_run_again_after_termination() {
    let studio = studio(2);
    let mut host = ScriptedHost::auto_finishing();
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);

    orch.execute(&studio, &mut host).unwrap();
    run(&mut orch, &mut host, 10);
    orch.execute(&studio, &mut host).unwrap();
    let outcome = run(&mut orch, &mut host, 10);

    assert_eq!(outcome, RenderOutcome::Completed { rendered: 2 });
    assert_eq!(host.requests.len(), 4);
    assert_eq!(host.restorations(), 2);
}

struct FlakySync {
    fail_camera: String,
    rendered: Vec<String>,
}

impl SyncRenderHost for FlakySync {
    fn render(&mut self, camera: &Camera, _output: &Path) -> renderer::Result<()> {
        if camera.name == self.fail_camera {
            return Err(RenderError::Host("disk full".to_string()));
        }
        self.rendered.push(camera.name.clone());
        Ok(())
    }
}

#[test]
fn test_blocking_adapter_reports_failures() {
    let studio = studio(3);
    let mut host = BlockingAdapter::new(FlakySync {
        fail_camera: camera_name(2),
        rendered: Vec::new(),
    })
    .with_active_camera(Camera::default());
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator(dir.path(), 0);
    orch.execute(&studio, &mut host).unwrap();

    let outcome = run(&mut orch, &mut host, 10);
    match outcome {
        RenderOutcome::Failed { index, reason } => {
            assert_eq!(index, 2);
            assert!(reason.contains("disk full"), "{reason}");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(host.inner().rendered, vec![camera_name(0), camera_name(1)]);
    assert_eq!(host.active_camera(), Some(Camera::default()));
}
