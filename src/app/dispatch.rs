// Loganizer - app/dispatch.rs
//
// Concurrent batch dispatcher: fan out one inspection per descriptor, fan
// the results back in, return only when every unit is accounted for.
//
// Architecture:
//   - A rayon `ThreadPool` is built per call and sized from `EngineConfig`;
//     the engine keeps no global pool and no other process-wide state.
//   - `in_place_scope` spawns one task per descriptor. Each task owns a
//     clone of its descriptor and sends `(index, result)` over an mpsc
//     channel; the calling thread is the single consumer.
//   - The scope joins every task before returning, and the collector
//     fills one slot per input index, so the output has exactly one result
//     per descriptor in input order.
//
// Failure policy:
//   - File-level problems are already FAILED results from the inspector.
//   - A panic inside one inspection is caught and becomes a FAILED result
//     for that descriptor only.
//   - No unit can fail the batch call.

use crate::core::inspector::{self, InspectConfig};
use crate::core::model::{AnalysisResult, BatchSummary, LogDescriptor};
use crate::util::constants;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::{Duration, Instant};

// =============================================================================
// Configuration and output
// =============================================================================

/// Explicit engine configuration. Everything the dispatcher needs arrives
/// here; nothing is read from globals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pool size. 0 means one worker per file, capped at
    /// `ABSOLUTE_MAX_WORKER_THREADS`. The pool is never larger than the batch.
    pub worker_threads: usize,

    /// Per-file inspection settings.
    pub inspect: InspectConfig,
}

impl EngineConfig {
    /// Number of pool workers to start for a batch of `batch_len` files.
    ///
    /// Units spend their time sleeping and waiting on I/O, not on the CPU,
    /// so auto mode gives every file its own worker up to the hard cap.
    pub fn resolved_workers(&self, batch_len: usize) -> usize {
        let requested = if self.worker_threads == 0 {
            constants::ABSOLUTE_MAX_WORKER_THREADS
        } else {
            self.worker_threads
        };
        requested
            .min(batch_len)
            .min(constants::ABSOLUTE_MAX_WORKER_THREADS)
            .max(1)
    }
}

/// Complete result of one batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One result per input descriptor, in input order.
    pub results: Vec<AnalysisResult>,
    /// Wall-clock time from dispatch to join.
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.results)
    }
}

// =============================================================================
// Public entry points
// =============================================================================

/// Analyse every descriptor in parallel and block until all are done.
///
/// An empty batch returns an empty outcome.
pub fn analyze_concurrently(descriptors: &[LogDescriptor], config: &EngineConfig) -> BatchOutcome {
    analyze_with_progress(descriptors, config, |_, _, _| {})
}

/// Like [`analyze_concurrently`], calling `on_result(result, completed, total)`
/// on the calling thread as each result arrives (completion order).
pub fn analyze_with_progress<F>(
    descriptors: &[LogDescriptor],
    config: &EngineConfig,
    on_result: F,
) -> BatchOutcome
where
    F: FnMut(&AnalysisResult, usize, usize),
{
    dispatch(descriptors, config, inspector::inspect, on_result)
}

// =============================================================================
// Fan-out / fan-in
// =============================================================================

type Report = (usize, AnalysisResult);

fn dispatch<I, F>(
    descriptors: &[LogDescriptor],
    config: &EngineConfig,
    inspect: I,
    mut on_result: F,
) -> BatchOutcome
where
    I: Fn(&LogDescriptor, &InspectConfig) -> AnalysisResult + Sync,
    F: FnMut(&AnalysisResult, usize, usize),
{
    let start = Instant::now();
    let total = descriptors.len();

    if total == 0 {
        tracing::debug!("Empty batch, nothing to analyse");
        return BatchOutcome {
            results: Vec::new(),
            elapsed: start.elapsed(),
        };
    }

    let workers = config.resolved_workers(total);
    let inspect_config = config.inspect;
    let inspect = &inspect;

    tracing::info!(files = total, workers, "Batch analysis started");

    let (tx, rx) = mpsc::channel::<Report>();

    let results = match build_pool(workers) {
        Ok(pool) => pool.in_place_scope(|s| {
            for (index, descriptor) in descriptors.iter().enumerate() {
                let descriptor = descriptor.clone();
                let tx = tx.clone();
                s.spawn(move |_| run_unit(index, descriptor, &inspect_config, inspect, tx));
            }
            drop(tx);
            collect(rx, descriptors, &mut on_result)
        }),
        Err(e) => {
            tracing::warn!(
                error = %e,
                files = total,
                "Worker pool unavailable; analysing on the calling thread"
            );
            drop(tx);
            run_in_place(descriptors, &inspect_config, inspect, &mut on_result)
        }
    };

    let outcome = BatchOutcome {
        results,
        elapsed: start.elapsed(),
    };
    let summary = outcome.summary();

    tracing::info!(
        files = summary.total,
        ok = summary.ok,
        failed = summary.failed,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Batch analysis complete"
    );

    outcome
}

fn build_pool(workers: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("{}-{i}", constants::WORKER_THREAD_PREFIX))
        .build()
}

/// Degraded path when no pool can be built: run every unit on the calling
/// thread, in input order, through the same channel and collector. Starts
/// no threads, so it cannot fail for lack of them.
fn run_in_place<I, F>(
    descriptors: &[LogDescriptor],
    inspect_config: &InspectConfig,
    inspect: &I,
    on_result: &mut F,
) -> Vec<AnalysisResult>
where
    I: Fn(&LogDescriptor, &InspectConfig) -> AnalysisResult,
    F: FnMut(&AnalysisResult, usize, usize),
{
    let (tx, rx) = mpsc::channel::<Report>();
    for (index, descriptor) in descriptors.iter().enumerate() {
        run_unit(index, descriptor.clone(), inspect_config, inspect, tx.clone());
    }
    drop(tx);
    collect(rx, descriptors, on_result)
}

/// One unit of work: inspect, then report exactly once.
fn run_unit<I>(
    index: usize,
    descriptor: LogDescriptor,
    inspect_config: &InspectConfig,
    inspect: &I,
    tx: mpsc::Sender<Report>,
) where
    I: Fn(&LogDescriptor, &InspectConfig) -> AnalysisResult,
{
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| inspect(&descriptor, inspect_config)));
    let result = match attempt {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_detail(&*payload);
            tracing::warn!(id = %descriptor.id, panic = %detail, "Inspection panicked");
            AnalysisResult::failed(&descriptor, constants::MSG_INSPECTION_ABORTED, detail)
        }
    };

    // The receiver lives until the scope joins; a send error means the
    // collector itself is unwinding and there is nobody left to report to.
    let _ = tx.send((index, result));
}

/// Drain the channel until every sender is gone, then account for every
/// input index exactly once.
fn collect<F>(
    rx: mpsc::Receiver<Report>,
    descriptors: &[LogDescriptor],
    on_result: &mut F,
) -> Vec<AnalysisResult>
where
    F: FnMut(&AnalysisResult, usize, usize),
{
    let total = descriptors.len();
    let mut slots: Vec<Option<AnalysisResult>> = vec![None; total];
    let mut completed = 0usize;

    for (index, result) in rx {
        let slot = &mut slots[index];
        if slot.is_some() {
            tracing::warn!(index, id = %result.log_id, "Duplicate result discarded");
            continue;
        }
        completed += 1;
        on_result(&result, completed, total);
        *slot = Some(result);
    }

    slots
        .into_iter()
        .zip(descriptors)
        .map(|(slot, descriptor)| {
            slot.unwrap_or_else(|| {
                tracing::warn!(id = %descriptor.id, "Unit finished without reporting");
                AnalysisResult::failed(
                    descriptor,
                    constants::MSG_INSPECTION_ABORTED,
                    "worker exited without a result",
                )
            })
        })
        .collect()
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during inspection".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inspector::DelayRange;
    use crate::core::model::AnalysisStatus;
    use std::collections::HashSet;
    use std::fs;

    fn fast_config(workers: usize) -> EngineConfig {
        EngineConfig {
            worker_threads: workers,
            inspect: InspectConfig {
                delay: DelayRange::none(),
            },
        }
    }

    #[test]
    fn test_empty_batch_returns_empty() {
        let outcome = analyze_concurrently(&[], &EngineConfig::default());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.summary().total, 0);
    }

    #[test]
    fn test_results_follow_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let descriptors: Vec<_> = (0..12)
            .map(|i| {
                let path = dir.path().join(format!("f{i}.log"));
                fs::write(&path, "x".repeat(i + 1)).expect("write");
                LogDescriptor::new(format!("id-{i}"), path.to_string_lossy(), "app")
            })
            .collect();

        let outcome = analyze_concurrently(&descriptors, &fast_config(4));
        let ids: Vec<_> = outcome.results.iter().map(|r| r.log_id.clone()).collect();
        let expected: Vec<_> = descriptors.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_panicking_unit_is_isolated() {
        let descriptors: Vec<_> = ["a", "boom", "c"]
            .iter()
            .map(|id| LogDescriptor::new(*id, format!("{id}.log"), "app"))
            .collect();

        let outcome = dispatch(
            &descriptors,
            &fast_config(2),
            |d, _| {
                if d.id == "boom" {
                    panic!("inspector exploded");
                }
                AnalysisResult::ok(d, "fine")
            },
            |_, _, _| {},
        );

        assert_eq!(outcome.results.len(), 3);
        let boom = &outcome.results[1];
        assert_eq!(boom.status, AnalysisStatus::Failed);
        assert_eq!(boom.message, constants::MSG_INSPECTION_ABORTED);
        assert!(boom.error_details.contains("inspector exploded"));
        assert!(outcome.results[0].is_ok());
        assert!(outcome.results[2].is_ok());
    }

    #[test]
    fn test_progress_reports_every_unit_once() {
        let descriptors: Vec<_> = (0..20)
            .map(|i| LogDescriptor::new(format!("id-{i}"), format!("/nonexistent/{i}.log"), "app"))
            .collect();

        let mut seen = HashSet::new();
        let mut counts = Vec::new();
        let outcome = analyze_with_progress(&descriptors, &fast_config(3), |r, done, total| {
            assert_eq!(total, 20);
            assert!(seen.insert(r.log_id.clone()), "duplicate {}", r.log_id);
            counts.push(done);
        });

        assert_eq!(seen.len(), 20);
        assert_eq!(counts, (1..=20).collect::<Vec<_>>());
        assert_eq!(outcome.summary().failed, 20);
    }

    #[test]
    fn test_resolved_workers_bounds() {
        let auto = EngineConfig::default();
        assert_eq!(auto.resolved_workers(1), 1);
        assert_eq!(auto.resolved_workers(4), 4);
        assert_eq!(
            auto.resolved_workers(100_000),
            constants::ABSOLUTE_MAX_WORKER_THREADS
        );

        let fixed = fast_config(8);
        assert_eq!(fixed.resolved_workers(3), 3);
        assert_eq!(fixed.resolved_workers(100), 8);
        assert_eq!(fixed.resolved_workers(0), 1);
    }

    #[test]
    fn test_in_place_fallback_accounts_for_every_unit() {
        let descriptors: Vec<_> = ["a", "boom", "c", "d"]
            .iter()
            .map(|id| LogDescriptor::new(*id, format!("{id}.log"), "app"))
            .collect();

        let caller = std::thread::current().id();
        let mut progress = Vec::new();
        let results = run_in_place(
            &descriptors,
            &InspectConfig::default(),
            &|d: &LogDescriptor, _: &InspectConfig| {
                assert_eq!(std::thread::current().id(), caller);
                if d.id == "boom" {
                    panic!("inspector exploded");
                }
                AnalysisResult::ok(d, "fine")
            },
            &mut |r: &AnalysisResult, done, total| progress.push((r.log_id.clone(), done, total)),
        );

        let ids: Vec<_> = results.iter().map(|r| r.log_id.as_str()).collect();
        assert_eq!(ids, ["a", "boom", "c", "d"]);
        assert_eq!(results[1].message, constants::MSG_INSPECTION_ABORTED);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
        assert_eq!(progress.len(), 4);
        assert_eq!(progress[3].1, 4);
    }

    #[test]
    fn test_panic_detail_extracts_message() {
        assert_eq!(panic_detail(&"static msg"), "static msg");
        assert_eq!(panic_detail(&String::from("owned")), "owned");
        assert_eq!(panic_detail(&42u32), "panic during inspection");
    }
}
