//! Offline render host
//!
//! [`OfflineHost`] renders on a worker thread with any [`Renderer`], so
//! `render_async` really returns before the frame exists. Notifications reach the
//! orchestrator through the subscribed channel exactly like a host application's
//! callbacks would.

use crate::error::{RenderError, Result};
use crate::host::{EventSender, HostEvent, RenderHost};
use crate::renderer::Renderer;
use rig::Camera;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Shared flag that makes the host report a cancellation
///
/// Cloned handles refer to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct RenderRequest {
    camera: Camera,
    output: PathBuf,
    /// Value of the host's generation counter when the request was issued
    generation: u64,
}

type Subscriber = Arc<Mutex<Option<EventSender>>>;

/// Render host backed by a worker thread
pub struct OfflineHost {
    active: Option<Camera>,
    subscriber: Subscriber,
    requests: Option<Sender<RenderRequest>>,
    worker: Option<JoinHandle<()>>,
    cancel: CancelToken,
    /// Bumped by [`RenderHost::cancel`]; requests from older generations are dropped
    generation: Arc<AtomicU64>,
}

impl OfflineHost {
    /// Spawn the worker; every frame is rendered at `width x height`
    pub fn new<R>(renderer: R, width: u32, height: u32) -> Self
    where
        R: Renderer + Send + 'static,
    {
        let subscriber: Subscriber = Arc::new(Mutex::new(None));
        let cancel = CancelToken::new();
        let generation = Arc::new(AtomicU64::new(0));
        let (requests, inbox) = channel();

        let worker = {
            let subscriber = Arc::clone(&subscriber);
            let cancel = cancel.clone();
            let generation = Arc::clone(&generation);
            thread::spawn(move || {
                render_loop(renderer, width, height, inbox, subscriber, cancel, generation);
            })
        };

        Self {
            active: None,
            subscriber,
            requests: Some(requests),
            worker: Some(worker),
            cancel,
            generation,
        }
    }

    pub fn with_active_camera(mut self, camera: Camera) -> Self {
        self.active = Some(camera);
        self
    }

    /// Handle for cancelling from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl RenderHost for OfflineHost {
    fn active_camera(&self) -> Option<Camera> {
        self.active.clone()
    }

    fn set_active_camera(&mut self, camera: Option<Camera>) {
        self.active = camera;
    }

    fn render_async(&mut self, camera: &Camera, output: &Path) -> Result<()> {
        let requests = self
            .requests
            .as_ref()
            .ok_or_else(|| RenderError::Host("render worker has shut down".to_string()))?;
        requests
            .send(RenderRequest {
                camera: camera.clone(),
                output: output.to_path_buf(),
                generation: self.generation.load(Ordering::SeqCst),
            })
            .map_err(|_| RenderError::Host("render worker has shut down".to_string()))
    }

    fn subscribe(&mut self, events: EventSender) {
        if let Ok(mut subscriber) = self.subscriber.lock() {
            *subscriber = Some(events);
        }
    }

    fn unsubscribe(&mut self) {
        if let Ok(mut subscriber) = self.subscriber.lock() {
            *subscriber = None;
        }
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for OfflineHost {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Render worker panicked");
            }
        }
    }
}

fn render_loop<R: Renderer>(
    mut renderer: R,
    width: u32,
    height: u32,
    inbox: Receiver<RenderRequest>,
    subscriber: Subscriber,
    cancel: CancelToken,
    generation: Arc<AtomicU64>,
) {
    let emit = |event: HostEvent| {
        if let Ok(guard) = subscriber.lock() {
            if let Some(events) = guard.as_ref() {
                let _ = events.send(event);
            }
        }
    };

    let superseded =
        |request: &RenderRequest| generation.load(Ordering::SeqCst) != request.generation;

    for request in inbox {
        if superseded(&request) {
            tracing::debug!("Dropping abandoned request for {}", request.output.display());
            continue;
        }
        if cancel.is_cancelled() {
            emit(HostEvent::Cancelled);
            continue;
        }

        emit(HostEvent::Started(request.output.clone()));
        renderer.render_with_camera(width, height, &request.camera);

        if superseded(&request) {
            tracing::debug!("Discarding abandoned frame for {}", request.output.display());
            continue;
        }
        if cancel.is_cancelled() {
            emit(HostEvent::Cancelled);
            continue;
        }

        match renderer.save_to_file(&request.output) {
            Ok(()) => {
                tracing::debug!(
                    "{} wrote {}",
                    renderer.name(),
                    request.output.display()
                );
                emit(HostEvent::Finished(request.output));
            }
            Err(err) => emit(HostEvent::Failed {
                output: request.output,
                reason: err.to_string(),
            }),
        }
    }
}
