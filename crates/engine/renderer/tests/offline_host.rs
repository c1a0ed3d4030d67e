//! End-to-end renders through the worker-thread host

use image::RgbImage;
use renderer::{
    run_to_completion, JobState, OfflineHost, OrchestratorConfig, Poll, RenderHost,
    RenderOrchestrator, RenderOutcome, Renderer, StudioTracer,
};
use rig::{camera_name, Camera, RigSettings, Studio};
use std::time::Duration;

/// Tracer that takes a while per frame so a cancel can land mid-render
struct SlowTracer {
    inner: StudioTracer,
    delay: Duration,
}

impl Renderer for SlowTracer {
    fn render_with_camera(&mut self, width: u32, height: u32, camera: &Camera) {
        std::thread::sleep(self.delay);
        self.inner.render_with_camera(width, height, camera);
    }

    fn name(&self) -> &str {
        "SlowTracer"
    }

    fn image_buffer(&self) -> Option<&RgbImage> {
        self.inner.image_buffer()
    }
}

fn studio(count: usize) -> Studio {
    let mut studio = Studio::new(RigSettings::new(count, 8.0, 4.0).unwrap());
    studio.set_main_camera(Camera::default());
    studio.build().unwrap();
    studio
}

fn config(dir: &std::path::Path) -> OrchestratorConfig {
    OrchestratorConfig::default()
        .with_output_dir(dir.join("frames"))
        .with_poll_interval(Duration::from_millis(2))
        .with_reissue_after_ticks(0)
}

#[test]
fn test_renders_one_file_per_camera() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(3);
    let mut host = OfflineHost::new(StudioTracer::default(), 24, 16)
        .with_active_camera(Camera::default());
    let mut orch = RenderOrchestrator::new(config(dir.path()));

    orch.execute(&studio, &mut host).unwrap();
    let mut ticks = 0;
    let outcome = run_to_completion(&mut orch, &mut host, |_| ticks += 1).unwrap();

    assert_eq!(outcome, RenderOutcome::Completed { rendered: 3 });
    assert!(ticks >= 3);
    for index in 0..3 {
        let path = dir
            .path()
            .join("frames")
            .join(format!("{}.png", camera_name(index)));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (24, 16));
    }
    assert_eq!(host.active_camera(), Some(Camera::default()));
}

#[test]
fn test_rig_cameras_see_different_views() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(2);
    let mut host = OfflineHost::new(StudioTracer::default(), 32, 32);
    let mut orch = RenderOrchestrator::new(config(dir.path()));

    orch.execute(&studio, &mut host).unwrap();
    run_to_completion(&mut orch, &mut host, |_| {}).unwrap();

    let left = image::open(&orch.jobs()[0].output_path).unwrap().to_rgb8();
    let right = image::open(&orch.jobs()[1].output_path).unwrap().to_rgb8();
    assert_ne!(left.as_raw(), right.as_raw());
}

#[test]
fn test_cancel_token_cancels_run() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(4);
    let mut host = OfflineHost::new(StudioTracer::default(), 8, 8);
    let token = host.cancel_token();
    token.cancel();

    let mut orch = RenderOrchestrator::new(config(dir.path()));
    orch.execute(&studio, &mut host).unwrap();
    let outcome = run_to_completion(&mut orch, &mut host, |_| {}).unwrap();

    assert_eq!(
        outcome,
        RenderOutcome::Cancelled {
            rendered: 0,
            abandoned: 4
        }
    );
    assert!(orch
        .jobs()
        .iter()
        .all(|job| job.state == JobState::Cancelled));
    assert!(!dir.path().join("frames").join("LentiCamera_0.png").exists());
}

#[test]
fn test_cancel_from_progress_callback() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(5);
    let mut host = OfflineHost::new(StudioTracer::default(), 8, 8);
    let mut orch = RenderOrchestrator::new(config(dir.path()));

    orch.execute(&studio, &mut host).unwrap();
    let outcome = run_to_completion(&mut orch, &mut host, |orch| {
        if orch.progress().0 >= 1 {
            orch.request_cancel();
        }
    })
    .unwrap();

    match outcome {
        RenderOutcome::Cancelled { rendered, abandoned } => {
            assert!(rendered >= 1);
            assert_eq!(rendered + abandoned, 5);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_cancel_request_discards_frame_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(3);
    let mut host = OfflineHost::new(
        SlowTracer {
            inner: StudioTracer::default(),
            delay: Duration::from_millis(300),
        },
        8,
        8,
    );
    let mut orch = RenderOrchestrator::new(config(dir.path()));

    orch.execute(&studio, &mut host).unwrap();
    assert_eq!(orch.tick(&mut host).unwrap(), Poll::Pending);
    orch.request_cancel();
    let poll = orch.tick(&mut host).unwrap();
    assert_eq!(
        poll,
        Poll::Ready(RenderOutcome::Cancelled {
            rendered: 0,
            abandoned: 3
        })
    );

    // Joins the worker, so the abandoned frame has either been discarded or written
    drop(host);
    let frame = orch.jobs()[0].output_path.clone();
    assert!(!frame.exists(), "{} written after cancel", frame.display());
}

#[test]
fn test_host_renders_again_after_abandoned_run() {
    let dir = tempfile::tempdir().unwrap();
    let studio = studio(2);
    let mut host = OfflineHost::new(StudioTracer::default(), 8, 8);
    let mut orch = RenderOrchestrator::new(config(dir.path()));

    orch.execute(&studio, &mut host).unwrap();
    orch.tick(&mut host).unwrap();
    orch.request_cancel();
    assert!(matches!(
        orch.tick(&mut host).unwrap(),
        Poll::Ready(RenderOutcome::Cancelled { .. })
    ));

    orch.execute(&studio, &mut host).unwrap();
    let outcome = run_to_completion(&mut orch, &mut host, |_| {}).unwrap();
    assert_eq!(outcome, RenderOutcome::Completed { rendered: 2 });
}
