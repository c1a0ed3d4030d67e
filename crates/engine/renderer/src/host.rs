//! Render host contract
//!
//! The host is an opaque, single-slot renderer. It accepts one camera + output path
//! at a time and reports progress asynchronously through [`HostEvent`]s sent to
//! whichever channel is currently subscribed.

use crate::error::Result;
use rig::Camera;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Notifications emitted by a render host
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Rendering of the frame for this output path has begun
    Started(PathBuf),
    /// The frame for this output path has been written
    Finished(PathBuf),
    /// The host gave up on this output path
    Failed { output: PathBuf, reason: String },
    /// The user (or host) cancelled rendering altogether
    Cancelled,
}

/// Channel end the host pushes notifications into
pub type EventSender = Sender<HostEvent>;

/// A render host with a single active-camera register and one render slot
pub trait RenderHost {
    /// Camera currently used for rendering
    fn active_camera(&self) -> Option<Camera>;

    /// Replace the active camera
    fn set_active_camera(&mut self, camera: Option<Camera>);

    /// Start rendering `camera` into `output` and return immediately.
    ///
    /// Progress arrives later as [`HostEvent`]s on the subscribed channel.
    fn render_async(&mut self, camera: &Camera, output: &Path) -> Result<()>;

    /// Route notifications to `events` until [`RenderHost::unsubscribe`]
    fn subscribe(&mut self, events: EventSender);

    /// Stop sending notifications
    fn unsubscribe(&mut self);

    /// Abandon the request in the render slot, if any.
    ///
    /// Called when a run halts while a frame is still being produced. A host that
    /// cannot interrupt itself may ignore it; the frame is then written late.
    fn cancel(&mut self) {}
}
