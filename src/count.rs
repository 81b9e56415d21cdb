use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use log::debug;

use crate::chunk::ChunkRange;
use crate::error::CountError;
use crate::util::FreqTable;

const READ_BUFFER_SIZE: usize = 1024 * 1024;
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Shared abort flag; lets the coordinator stop outstanding range reads
/// once one of them has failed.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Counts every non-empty line of `text` into `frequency`. `text` must
/// end on a record boundary; the caller keeps any unterminated tail.
/// Returns the number of records counted.
pub fn count_lines(frequency: &mut FreqTable, text: &Bytes) -> u64 {
    let mut records = 0;
    let mut i_start: usize = 0;
    for i in 0..text.len() {
        if text[i] == b'\n' {
            if i > i_start {
                let record = text.slice(i_start..i);
                *frequency.entry(record).or_insert(0) += 1;
                records += 1;
            }
            i_start = i + 1;
        }
    }
    records
}

/// Counts a single unterminated record; empty records are dropped.
pub fn count_record(frequency: &mut FreqTable, record: Bytes) -> bool {
    if record.is_empty() {
        return false;
    }
    *frequency.entry(record).or_insert(0) += 1;
    true
}

/// Reads the records lying inside `range` and tallies them into a table
/// local to this call. Never reads a byte outside `[start, end)`; the
/// planner guarantees both ends sit on record boundaries.
pub fn count_range(
    path: &Path,
    index: usize,
    range: ChunkRange,
    cancel: &CancelToken,
) -> Result<FreqTable, CountError> {
    let mut frequency = FreqTable::new();
    if range.is_empty() {
        return Ok(frequency);
    }

    let io_err = |e| CountError::Range { index, source: e };

    let mut file = File::open(path).map_err(io_err)?;
    file.seek(SeekFrom::Start(range.start)).map_err(io_err)?;
    let mut reader = file.take(range.len());

    debug!("range {}: counting [{}, {})", index, range.start, range.end);

    let mut pending = BytesMut::with_capacity(READ_BUFFER_SIZE);
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut records: u64 = 0;
    let mut next_milestone = PROGRESS_INTERVAL;

    loop {
        if cancel.is_cancelled() {
            return Err(CountError::Cancelled);
        }

        let n = reader.read(&mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&buf[..n]);

        if let Some(last_feed) = pending.iter().rposition(|&b| b == b'\n') {
            let complete = pending.split_to(last_feed + 1).freeze();
            records += count_lines(&mut frequency, &complete);
            while records >= next_milestone {
                debug!("range {}: processed {} records", index, next_milestone);
                next_milestone += PROGRESS_INTERVAL;
            }
        }
    }

    // A trailing record without a line feed only occurs when the range
    // runs to the end of an unterminated file.
    if count_record(&mut frequency, pending.freeze()) {
        records += 1;
    }

    debug!(
        "range {}: done, {} records, {} distinct",
        index,
        records,
        frequency.len()
    );

    Ok(frequency)
}
