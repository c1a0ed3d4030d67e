//! Lenticular Render Orchestration
//!
//! Renders one frame per rig camera against a single-slot, asynchronous render host:
//! - **host**: the [`RenderHost`] contract and the notifications it emits
//! - **orchestrator**: [`RenderOrchestrator`], a poll-driven state machine that feeds
//!   the host one job at a time in camera index order
//! - **driver**: blocking loop standing in for the host's timer facility
//! - **blocking**: adapter for hosts that only render synchronously
//! - **offline**: [`OfflineHost`], a worker-thread host backed by a [`Renderer`]
//! - **tracer**: [`StudioTracer`], a CPU ray tracer for quick preview renders
//!
//! # Architecture
//!
//! ```text
//! Studio (rig cameras)
//!     ↓ execute()
//! RenderOrchestrator ──render_async──▶ RenderHost
//!     ▲                                   │
//!     └──── HostEvent (Started/Finished/Cancelled/Failed) ◀┘
//! ```

// Core modules
pub mod error;
pub mod host;
pub mod job;
pub mod orchestrator;

// Hosts and drivers
pub mod blocking;
pub mod driver;
pub mod offline;

// Software rendering
pub mod lighting;
pub mod renderer;
pub mod tracer;

// Re-export commonly used types at crate root
pub use blocking::{BlockingAdapter, SyncRenderHost};
pub use driver::run_to_completion;
pub use error::{RenderError, Result};
pub use host::{EventSender, HostEvent, RenderHost};
pub use job::{JobState, RenderJob};
pub use offline::{CancelToken, OfflineHost};
pub use orchestrator::{
    OrchestratorConfig, OrchestratorState, Poll, RenderOrchestrator, RenderOutcome,
    DEFAULT_POLL_INTERVAL, DEFAULT_REISSUE_AFTER_TICKS,
};
pub use renderer::Renderer;
pub use tracer::{SceneBox, StudioScene, StudioTracer};
