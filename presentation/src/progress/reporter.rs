//! Progress reporting for a judged round

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use panel_application::ProgressNotifier;
use panel_domain::{BackendIdentity, Phase};
use std::sync::Mutex;

/// Reports progress with one indicatif bar per phase (drawn on stderr)
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_label(phase: &Phase) -> String {
        let step = match phase {
            Phase::Question => 1,
            Phase::FanOut => 2,
            Phase::Judging => 3,
        };
        format!("Phase {}: {}", step, phase.display_name())
    }

    fn status_line(identity: &BackendIdentity, success: bool) -> String {
        if success {
            format!("{} {}", "✓".green(), identity)
        } else {
            format!("{} {}", "✗".red(), identity)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, identity: &BackendIdentity, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(Self::status_line(identity, success));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        let finished = self.phase_bar.lock().ok().and_then(|mut slot| slot.take());
        if let Some(pb) = finished {
            pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
        }
    }
}

/// Line-based progress (no bars), used when stderr is not a terminal
pub struct SimpleProgress;

impl SimpleProgress {
    fn phase_line(phase: &Phase, total_tasks: usize) -> String {
        format!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            total_tasks
        )
    }

    fn task_line(identity: &BackendIdentity, success: bool) -> String {
        let status = ProgressReporter::status_line(identity, success);
        if success {
            format!("  {}", status)
        } else {
            format!("  {} (failed)", status)
        }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!("{}", Self::phase_line(phase, total_tasks));
    }

    fn on_task_complete(&self, _phase: &Phase, identity: &BackendIdentity, success: bool) {
        eprintln!("{}", Self::task_line(identity, success));
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }
}
