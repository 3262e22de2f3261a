//! Progress notification port
//!
//! Defines the interface for reporting progress during a judged round.

use panel_domain::{BackendIdentity, Phase};

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer. Callbacks may arrive from
/// the collection loop while other backends are still running, so they must
/// not block.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a task completes within a phase
    fn on_task_complete(&self, phase: &Phase, identity: &BackendIdentity, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _identity: &BackendIdentity, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
