//! Blocking driver for the poll loop
//!
//! Stands in for the host's timer facility when there is no event loop: ticks the
//! orchestrator, sleeps for the configured poll interval and repeats until the run
//! terminates.

use crate::error::Result;
use crate::host::RenderHost;
use crate::orchestrator::{Poll, RenderOrchestrator, RenderOutcome};
use std::thread;

/// Tick `orchestrator` until it terminates.
///
/// `on_tick` runs after every pending tick (progress reporting, cancellation checks).
pub fn run_to_completion<H, F>(
    orchestrator: &mut RenderOrchestrator,
    host: &mut H,
    mut on_tick: F,
) -> Result<RenderOutcome>
where
    H: RenderHost + ?Sized,
    F: FnMut(&RenderOrchestrator),
{
    loop {
        match orchestrator.tick(host)? {
            Poll::Ready(outcome) => return Ok(outcome),
            Poll::Pending => {
                on_tick(orchestrator);
                thread::sleep(orchestrator.config().poll_interval);
            }
        }
    }
}
