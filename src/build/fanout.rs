//! Target build fan-out
//!
//! Launches every build task on its own thread, waits for all of them at a
//! single join barrier, and folds the per-task outcomes into one report.
//! A failing (or panicking) task never stops its siblings.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use indicatif::ProgressBar;

use crate::error::{TaskError, TaskFailure};
use crate::utils::terminal::{format_duration, tail_lines};

type TaskFn<'a> = Box<dyn FnOnce() -> Result<()> + Send + 'a>;

/// One labelled unit of work
pub struct BuildTask<'a> {
    label: String,
    run: TaskFn<'a>,
}

impl<'a> BuildTask<'a> {
    /// Wrap a closure as a task
    pub fn new(label: impl Into<String>, run: impl FnOnce() -> Result<()> + Send + 'a) -> Self {
        Self {
            label: label.into(),
            run: Box::new(run),
        }
    }

    /// Task label
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// What happened to one task
#[derive(Debug)]
pub struct TaskOutcome {
    /// Task label
    pub label: String,
    /// Wall time spent in the task
    pub duration: Duration,
    /// The failure, if any
    pub error: Option<anyhow::Error>,
}

impl TaskOutcome {
    /// Whether the task finished without error
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a fan-out, in submission order
#[derive(Debug)]
pub struct FanOutReport {
    outcomes: Vec<TaskOutcome>,
    elapsed: Duration,
}

impl FanOutReport {
    /// Per-task outcomes, indexed like the submitted task list
    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }

    /// Wall time from launch to join
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of tasks that succeeded
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Tasks that failed
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Print a summary table of the run
    pub fn print_summary(&self, title: &str) {
        eprintln!("\n{}", "=".repeat(80));
        eprintln!("{}", title);
        eprintln!("{}", "=".repeat(80));
        eprintln!("\nTotal tasks: {}", self.outcomes.len());
        eprintln!("Successful: {}", self.succeeded());
        eprintln!("Failed: {}", self.outcomes.len() - self.succeeded());

        if self.succeeded() > 0 {
            eprintln!("\n✅ Successful builds:");
            for outcome in self.outcomes.iter().filter(|o| o.succeeded()) {
                eprintln!("   - {} ({})", outcome.label, format_duration(outcome.duration));
            }
        }

        if self.failures().next().is_some() {
            eprintln!("\n❌ Failed builds:");
            for outcome in self.failures() {
                eprintln!("   - {} ({})", outcome.label, format_duration(outcome.duration));
            }
        }

        eprintln!("\n⏱️  Completed in {}", format_duration(self.elapsed));
    }

    /// Collapse the report into a single result listing every failed task
    pub fn into_result(self) -> Result<(), TaskError> {
        let failures: Vec<TaskFailure> = self
            .outcomes
            .into_iter()
            .filter_map(|outcome| {
                outcome.error.map(|err| TaskFailure {
                    label: outcome.label,
                    message: format!("{:#}", err),
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TaskError::BuildFailures { failures })
        }
    }
}

/// Concurrent launcher for a fixed set of tasks
pub struct FanOut<'a> {
    tasks: Vec<BuildTask<'a>>,
    progress: ProgressBar,
}

impl<'a> FanOut<'a> {
    /// Create a fan-out over `tasks` with no visible progress bar
    pub fn new(tasks: Vec<BuildTask<'a>>) -> Self {
        Self {
            tasks,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report completions through `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run every task on its own thread and block until all have finished
    pub fn run(self) -> FanOutReport {
        let total = self.tasks.len();
        let start = Instant::now();
        let completed = AtomicUsize::new(0);
        let progress = &self.progress;
        let mut slots: Vec<Option<TaskOutcome>> = (0..total).map(|_| None).collect();

        progress.set_length(total as u64);

        thread::scope(|scope| {
            for (task, slot) in self.tasks.into_iter().zip(slots.iter_mut()) {
                let completed = &completed;
                scope.spawn(move || {
                    let BuildTask { label, run } = task;
                    tracing::debug!(task = %label, "task started");

                    let started = Instant::now();
                    let error = match panic::catch_unwind(AssertUnwindSafe(run)) {
                        Ok(Ok(())) => None,
                        Ok(Err(err)) => Some(err),
                        Err(payload) => Some(anyhow!("task panicked: {}", panic_message(&*payload))),
                    };
                    let outcome = TaskOutcome {
                        label,
                        duration: started.elapsed(),
                        error,
                    };

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::debug!(task = %outcome.label, ok = outcome.succeeded(), "task finished");
                    report_completion(progress, &outcome, done, total);

                    *slot = Some(outcome);
                });
            }
        });

        progress.finish_and_clear();

        FanOutReport {
            outcomes: slots.into_iter().flatten().collect(),
            elapsed: start.elapsed(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn report_completion(progress: &ProgressBar, outcome: &TaskOutcome, done: usize, total: usize) {
    progress.suspend(|| {
        let (icon, status) = if outcome.succeeded() {
            ("✅", "completed")
        } else {
            ("❌", "failed")
        };
        eprintln!(
            "{} [{}/{}] {} {} ({})",
            icon,
            done,
            total,
            outcome.label.to_uppercase(),
            status,
            format_duration(outcome.duration)
        );

        if let Some(err) = &outcome.error {
            let message = format!("{:#}", err);
            let lines = tail_lines(&message, 10);
            eprintln!("   Error output (last {} lines):", lines.len());
            for line in lines {
                eprintln!("   | {}", line);
            }
        }
    });
    progress.inc(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::AtomicBool;

    fn sleeper<'a>(label: &str, ms: u64, counter: &'a AtomicUsize) -> BuildTask<'a> {
        BuildTask::new(label, move || {
            thread::sleep(Duration::from_millis(ms));
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_zero_tasks() {
        let report = FanOut::new(Vec::new()).run();
        assert!(report.outcomes().is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_all_tasks_complete_before_return() {
        let counter = AtomicUsize::new(0);
        let tasks = (0..8)
            .map(|i| sleeper(&format!("task-{}", i), 10 * (i % 3), &counter))
            .collect();

        let report = FanOut::new(tasks).run();

        assert_eq!(counter.load(Ordering::SeqCst), 8);
        assert_eq!(report.outcomes().len(), 8);
        assert_eq!(report.succeeded(), 8);
    }

    #[test]
    #[serial]
    fn test_tasks_run_concurrently() {
        let counter = AtomicUsize::new(0);
        let tasks = vec![
            sleeper("a", 100, &counter),
            sleeper("b", 100, &counter),
            sleeper("c", 100, &counter),
        ];

        let start = Instant::now();
        let report = FanOut::new(tasks).run();
        let elapsed = start.elapsed();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(elapsed >= Duration::from_millis(100));
        assert!(
            elapsed < Duration::from_millis(250),
            "fan-out took {:?}, expected roughly one task duration",
            elapsed
        );
        assert!(report.elapsed() <= elapsed);
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let good_ran = AtomicBool::new(false);
        let bad_ran = AtomicBool::new(false);

        let tasks = vec![
            BuildTask::new("bad", || {
                bad_ran.store(true, Ordering::SeqCst);
                Err(anyhow!("compile error"))
            }),
            BuildTask::new("good", || {
                thread::sleep(Duration::from_millis(20));
                good_ran.store(true, Ordering::SeqCst);
                Ok(())
            }),
        ];

        let report = FanOut::new(tasks).run();
        assert!(bad_ran.load(Ordering::SeqCst));
        assert!(good_ran.load(Ordering::SeqCst));

        let failed: Vec<&str> = report.failures().map(|o| o.label.as_str()).collect();
        assert_eq!(failed, vec!["bad"]);

        match report.into_result() {
            Err(TaskError::BuildFailures { failures }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].label, "bad");
                assert_eq!(failures[0].message, "compile error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_panicking_task_is_recorded() {
        let counter = AtomicUsize::new(0);
        let tasks = vec![
            BuildTask::new("explodes", || panic!("linker on fire")),
            sleeper("fine", 10, &counter),
        ];

        let report = FanOut::new(tasks).run();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let outcome = &report.outcomes()[0];
        assert_eq!(outcome.label, "explodes");
        let message = outcome.error.as_ref().unwrap().to_string();
        assert!(message.contains("linker on fire"));
        assert!(report.outcomes()[1].succeeded());
    }

    #[test]
    fn test_outcomes_keep_submission_order() {
        let counter = AtomicUsize::new(0);
        let tasks = vec![
            sleeper("slow", 60, &counter),
            sleeper("fast", 0, &counter),
            sleeper("medium", 30, &counter),
        ];

        let report = FanOut::new(tasks).run();
        let labels: Vec<&str> = report.outcomes().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["slow", "fast", "medium"]);
    }

    #[test]
    fn test_aggregate_lists_every_failure() {
        let tasks = vec![
            BuildTask::new("windows-amd64", || Err(anyhow!("a"))),
            BuildTask::new("linux-amd64", || Ok(())),
            BuildTask::new("darwin-arm64", || Err(anyhow!("b"))),
        ];

        let err = FanOut::new(tasks).run().into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "2 build task(s) failed: windows-amd64, darwin-arm64"
        );
    }
}
