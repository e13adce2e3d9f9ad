use crate::core::io::builder::{BuildError, SnapshotRecordBuilder};
use crate::core::io::scanner::SnapshotScanner;
use crate::core::models::trajectory::SimulationParameters;
use crate::store::{StoreError, TrajectoryStore};
use crate::workflows::progress::{Progress, ProgressReporter};
use std::io::{self, BufRead};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to read trajectory near line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Totals of a finished conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub snapshots: u64,
    pub atoms: u64,
    pub lines_read: usize,
    pub elapsed: Duration,
}

/// Converts the trajectory log `source` into `store`.
///
/// The parameters table is written first, then every snapshot block in stream order,
/// and finally the store is closed. The first error stops the run; tables written
/// before it stay on disk and the store is left unclosed.
#[instrument(skip_all, name = "conversion_workflow")]
pub fn run<R: BufRead>(
    source: R,
    params: &SimulationParameters,
    store: &mut TrajectoryStore,
    reporter: &ProgressReporter,
) -> Result<ConversionSummary, ConversionError> {
    let started = Instant::now();

    reporter.report(Progress::PhaseStart {
        name: "Parameters",
    });
    store.write_parameters(params)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Snapshots",
    });
    info!("Scanning trajectory for snapshot blocks.");

    let mut scanner = SnapshotScanner::new(source);
    while let Some(block) = scanner.next() {
        let raw = block.map_err(|source| ConversionError::Read {
            line: scanner.lines_read(),
            source,
        })?;
        let records = SnapshotRecordBuilder::build(&raw)?;
        store.write_snapshot(raw.index, &records)?;

        reporter.report(Progress::SnapshotWritten {
            index: raw.index,
            atoms: records.len(),
        });
    }
    let written = store.summary();
    reporter.report(Progress::PhaseFinish);

    store.close()?;
    debug!("Store summary: {:?}", written);

    let summary = ConversionSummary {
        snapshots: written.snapshots_written,
        atoms: written.atoms_written,
        lines_read: scanner.lines_read(),
        elapsed: started.elapsed(),
    };
    reporter.report(Progress::Message(format!(
        "Converted {} snapshot(s) with {} atom record(s).",
        summary.snapshots, summary.atoms
    )));
    info!(
        "Conversion finished: {} snapshot(s), {} atom record(s), {} line(s) read in {:.2?}.",
        summary.snapshots, summary.atoms, summary.lines_read, summary.elapsed
    );
    Ok(summary)
}
