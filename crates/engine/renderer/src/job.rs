//! Render jobs

use rig::Camera;
use std::path::PathBuf;

/// Lifecycle of a single render job
///
/// `Queued → Dispatched → Rendering → Done`, or `Cancelled`/`Failed` from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Waiting in the queue
    Queued,
    /// Render requested, host has not confirmed the start yet
    Dispatched,
    /// Host reported the render started
    Rendering,
    /// Frame written
    Done,
    /// Dropped because rendering was cancelled
    Cancelled,
    /// Host reported a failure
    Failed,
}

impl JobState {
    /// True for `Done`, `Cancelled` and `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Cancelled | JobState::Failed)
    }

    /// True while the job occupies the host's render slot
    pub fn is_in_flight(self) -> bool {
        matches!(self, JobState::Dispatched | JobState::Rendering)
    }
}

/// One rig camera rendered to one output file
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Rig slot index
    pub index: usize,
    /// Camera snapshot taken when the queue was armed
    pub camera: Camera,
    /// Where the host writes the frame
    pub output_path: PathBuf,
    /// Current state
    pub state: JobState,
    /// Number of render requests issued for this job (1 unless re-issued)
    pub attempts: u32,
    /// Ticks spent in `Dispatched` since the last request
    pub(crate) waiting_ticks: u32,
}

impl RenderJob {
    pub fn new(index: usize, camera: Camera, output_path: PathBuf) -> Self {
        Self {
            index,
            camera,
            output_path,
            state: JobState::Queued,
            attempts: 0,
            waiting_ticks: 0,
        }
    }
}
