use std::fs::File;
use std::path::Path;
use std::time::Instant;

use log::{error, info};
use rayon::prelude::*;

use crate::chunk::{self, FileBoundaries};
use crate::count::{count_range, CancelToken};
use crate::error::CountError;
use crate::merge::merge_tables;
use crate::top_k::{select_top_k, RankedEntry, SelectStrategy};
use crate::util::{format_mem, max_rss_bytes, FreqTable};

/// Runs plan → count → merge and returns the global table.
///
/// One worker per range on a pool of `workers` threads; workers share
/// nothing mutable while counting, the join barrier sits in the result
/// collection, and the merge folds single-threaded afterwards.
pub fn count_file(input: &Path, workers: usize) -> Result<FreqTable, CountError> {
    let file = File::open(input).map_err(CountError::Input)?;
    let file_size = file.metadata().map_err(CountError::Input)?.len();

    let mut bounds = FileBoundaries::new(file, file_size);
    let ranges = chunk::plan(file_size, workers, &mut bounds)?;
    info!("planned {} ranges over {} bytes", ranges.len(), file_size);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| CountError::Config(e.to_string()))?;

    let cancel = CancelToken::new();
    let results: Vec<Result<FreqTable, CountError>> = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(index, &range)| {
                let result = count_range(input, index, range, &cancel);
                if result.is_err() {
                    cancel.cancel();
                }
                result
            })
            .collect()
    });

    // Past the barrier. Report every failing range, then fail the run on
    // the lowest-index failure; cancelled workers carry no information of
    // their own.
    let mut tables = Vec::with_capacity(results.len());
    let mut first_failure: Option<CountError> = None;
    for result in results {
        match result {
            Ok(table) => tables.push(table),
            Err(CountError::Cancelled) => {}
            Err(err) => {
                error!("{}", err);
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }
    if let Some(err) = first_failure {
        return Err(err);
    }
    info!(
        "counting done, {} local tables (rss: {})",
        tables.len(),
        format_mem(max_rss_bytes())
    );

    let total = merge_tables(tables);
    info!("merge done, {} distinct records", total.len());

    Ok(total)
}

/// The full pipeline: count, then rank the top `k` entries.
pub fn run(
    input: &Path,
    workers: usize,
    k: usize,
    strategy: SelectStrategy,
) -> Result<Vec<RankedEntry>, CountError> {
    let total = count_file(input, workers)?;

    info!(
        "selecting top {} of {} ({:?})",
        k,
        total.len(),
        strategy
    );
    let started = Instant::now();
    let ranking = select_top_k(&total, k, strategy);
    info!(
        "selection done in {:?} (rss: {})",
        started.elapsed(),
        format_mem(max_rss_bytes())
    );

    Ok(ranking)
}
