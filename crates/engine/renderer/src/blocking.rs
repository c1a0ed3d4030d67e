//! Synchronous render hosts
//!
//! Some hosts can only render in the foreground: the call returns once the file is
//! written. [`BlockingAdapter`] wraps such a host so the orchestrator can drive it
//! like an asynchronous one; it emits the start and finish notifications itself.

use crate::error::Result;
use crate::host::{EventSender, HostEvent, RenderHost};
use rig::Camera;
use std::path::Path;

/// Host whose render call blocks until the frame is on disk
pub trait SyncRenderHost {
    fn render(&mut self, camera: &Camera, output: &Path) -> Result<()>;
}

/// [`RenderHost`] over a [`SyncRenderHost`]
pub struct BlockingAdapter<S> {
    inner: S,
    active: Option<Camera>,
    subscriber: Option<EventSender>,
}

impl<S: SyncRenderHost> BlockingAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            active: None,
            subscriber: None,
        }
    }

    pub fn with_active_camera(mut self, camera: Camera) -> Self {
        self.active = Some(camera);
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn emit(&self, event: HostEvent) {
        if let Some(subscriber) = &self.subscriber {
            let _ = subscriber.send(event);
        }
    }
}

impl<S: SyncRenderHost> RenderHost for BlockingAdapter<S> {
    fn active_camera(&self) -> Option<Camera> {
        self.active.clone()
    }

    fn set_active_camera(&mut self, camera: Option<Camera>) {
        self.active = camera;
    }

    fn render_async(&mut self, camera: &Camera, output: &Path) -> Result<()> {
        self.emit(HostEvent::Started(output.to_path_buf()));
        match self.inner.render(camera, output) {
            Ok(()) => self.emit(HostEvent::Finished(output.to_path_buf())),
            Err(err) => self.emit(HostEvent::Failed {
                output: output.to_path_buf(),
                reason: err.to_string(),
            }),
        }
        Ok(())
    }

    fn subscribe(&mut self, events: EventSender) {
        self.subscriber = Some(events);
    }

    fn unsubscribe(&mut self) {
        self.subscriber = None;
    }
}
