//! Running both classifiers over one or many file pairs.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use refmine_core::panic_payload_to_str;
use refmine_syntax::{ExternalError, SourceParser, TreeDiff, TreeMatcher};
use thiserror::Error;

use crate::refactoring::{CodeRangeMapper, RefactoringSet};
use crate::rename::detect_renames;
use crate::type_change::detect_type_changes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOptions {
    /// Run the rename pass.
    pub renames: bool,
    /// Run the type-change pass.
    pub type_changes: bool,
    /// Worker threads for per-file parallelism; `None` uses the global rayon
    /// pool.
    pub threads: Option<usize>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            renames: true,
            type_changes: true,
            threads: None,
        }
    }
}

/// Why a file pair contributed no refactorings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("failed to diff `{path}`: {source}")]
    External {
        path: String,
        #[source]
        source: ExternalError,
    },
    #[error("diffing `{path}` panicked: {message}")]
    Panicked { path: String, message: String },
}

impl DiffError {
    pub fn path(&self) -> &str {
        match self {
            DiffError::External { path, .. } | DiffError::Panicked { path, .. } => path,
        }
    }
}

/// Everything detected over a batch of file pairs.
#[derive(Debug, Default)]
pub struct DetectionReport {
    pub refactorings: RefactoringSet,
    /// File pairs whose diff failed, in input order.
    pub failures: Vec<DiffError>,
}

impl DetectionReport {
    fn merge(results: Vec<Result<RefactoringSet, DiffError>>) -> Self {
        let mut report = DetectionReport::default();
        for result in results {
            match result {
                Ok(refactorings) => report.refactorings.extend(refactorings),
                Err(err) => {
                    tracing::warn!(path = err.path(), error = %err, "skipping file pair");
                    report.failures.push(err);
                }
            }
        }
        report
    }
}

/// Classify the edits of one file pair.
///
/// The two passes read the same diff and run concurrently; renames win over
/// type changes with the same description.
pub fn detect_refactorings(path: &str, diff: &TreeDiff, options: &DetectOptions) -> RefactoringSet {
    let ranges = CodeRangeMapper::new(path, diff);
    let (renames, type_changes) = rayon::join(
        || {
            if options.renames {
                detect_renames(&ranges, diff)
            } else {
                Vec::new()
            }
        },
        || {
            if options.type_changes {
                detect_type_changes(&ranges, diff)
            } else {
                Vec::new()
            }
        },
    );

    let mut refactorings = RefactoringSet::new();
    refactorings.extend(renames);
    refactorings.extend(type_changes);
    tracing::debug!(path, refactorings = refactorings.len(), "classified file pair");
    refactorings
}

/// [`detect_refactorings`], with panics turned into [`DiffError::Panicked`].
pub fn try_detect_refactorings(
    path: &str,
    diff: &TreeDiff,
    options: &DetectOptions,
) -> Result<RefactoringSet, DiffError> {
    contain(path, || detect_refactorings(path, diff, options))
}

/// Classify many already diffed file pairs in parallel.
///
/// Results merge in input order, so the first pair to produce a description
/// keeps its record.
pub fn detect_many<P>(diffs: &[(P, TreeDiff)], options: &DetectOptions) -> DetectionReport
where
    P: AsRef<str> + Sync,
{
    let results = install(options.threads, || {
        diffs
            .par_iter()
            .map(|(path, diff)| try_detect_refactorings(path.as_ref(), diff, options))
            .collect::<Vec<_>>()
    });
    DetectionReport::merge(results)
}

/// Parse, match and classify every path present in both snapshots.
///
/// Paths only present on one side are ignored. Parse or match failures and
/// panics are reported per path and do not affect other pairs.
pub fn diff_file_sets(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
    parser: &dyn SourceParser,
    matcher: &dyn TreeMatcher,
    options: &DetectOptions,
) -> DetectionReport {
    let pairs: Vec<(&str, &str, &str)> = before
        .iter()
        .filter_map(|(path, old)| {
            after
                .get(path)
                .map(|new| (path.as_str(), old.as_str(), new.as_str()))
        })
        .collect();
    tracing::debug!(
        before = before.len(),
        after = after.len(),
        pairs = pairs.len(),
        "diffing file sets"
    );

    let results = install(options.threads, || {
        pairs
            .par_iter()
            .map(|&(path, old, new)| {
                let diff = contain(path, || TreeDiff::compute(parser, matcher, old, new))?
                    .map_err(|source| DiffError::External {
                        path: path.to_string(),
                        source,
                    })?;
                try_detect_refactorings(path, &diff, options)
            })
            .collect::<Vec<_>>()
    });
    DetectionReport::merge(results)
}

fn contain<T>(path: &str, f: impl FnOnce() -> T) -> Result<T, DiffError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| DiffError::Panicked {
        path: path.to_string(),
        message: panic_payload_to_str(&*payload).to_string(),
    })
}

/// Run `op` on a dedicated pool of `threads` workers, halving the count when
/// the OS refuses threads and falling back to the caller's pool.
fn install<R, OP>(threads: Option<usize>, op: OP) -> R
where
    R: Send,
    OP: FnOnce() -> R + Send,
{
    let Some(threads) = threads else {
        return op();
    };

    let mut threads = threads.max(1);
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("refmine-detect-{idx}"))
            .build()
        {
            Ok(pool) => return pool.install(op),
            Err(err) if threads > 1 => {
                tracing::warn!(threads, error = %err, "failed to build worker pool, retrying with fewer threads");
                threads = (threads / 2).max(1);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to build worker pool, running on the current pool");
                return op();
            }
        }
    }
}
