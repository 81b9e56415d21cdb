use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::CountError;

/// Half-open byte interval `[start, end)` of the input, assigned to one
/// worker. Boundaries always coincide with record boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Seam between the planner and the actual input, so planning stays a
/// pure function over offsets.
pub trait RecordBoundaries {
    /// First byte offset of the next complete record at or after `pos`:
    /// one past the first line feed found scanning forward, or the input
    /// size if none remains.
    fn next_record_start(&mut self, pos: u64) -> io::Result<u64>;
}

const SCAN_BUFFER_SIZE: usize = 8 * 1024;

pub struct FileBoundaries {
    file: File,
    size: u64,
}

impl FileBoundaries {
    pub fn new(file: File, size: u64) -> Self {
        FileBoundaries { file, size }
    }
}

impl RecordBoundaries for FileBoundaries {
    fn next_record_start(&mut self, pos: u64) -> io::Result<u64> {
        if pos >= self.size {
            return Ok(self.size);
        }

        self.file.seek(SeekFrom::Start(pos))?;
        let mut buf = [0u8; SCAN_BUFFER_SIZE];
        let mut offset = pos;
        loop {
            let n = self.file.read(&mut buf)?;
            if n == 0 {
                return Ok(self.size);
            }
            if let Some(idx) = buf[..n].iter().position(|&b| b == b'\n') {
                return Ok(offset + idx as u64 + 1);
            }
            offset += n as u64;
        }
    }
}

impl RecordBoundaries for &[u8] {
    fn next_record_start(&mut self, pos: u64) -> io::Result<u64> {
        let data = *self;
        let size = data.len() as u64;
        if pos >= size {
            return Ok(size);
        }
        match data[pos as usize..].iter().position(|&b| b == b'\n') {
            Some(idx) => Ok(pos + idx as u64 + 1),
            None => Ok(size),
        }
    }
}

/// Splits `[0, file_size)` into `workers` contiguous line-aligned ranges.
///
/// Slice 0 starts at 0; every later slice starts where the boundary
/// search lands from its nominal offset, and ends where the next slice
/// starts. The partition is exact: no gaps, no overlap, no record split
/// across two ranges. Ranges may come out empty when records are long
/// relative to the slice size.
pub fn plan<B>(file_size: u64, workers: usize, bounds: &mut B) -> Result<Vec<ChunkRange>, CountError>
where
    B: RecordBoundaries + ?Sized,
{
    if workers == 0 {
        return Err(CountError::Config(
            "worker count must be at least 1".to_string(),
        ));
    }

    let nominal_len = file_size / workers as u64;

    let mut starts = Vec::with_capacity(workers + 1);
    starts.push(0);
    for i in 1..workers {
        let nominal = nominal_len * i as u64;
        let start = if nominal >= file_size {
            file_size
        } else {
            bounds
                .next_record_start(nominal)
                .map_err(CountError::Input)?
                .min(file_size)
        };
        starts.push(start);
    }
    starts.push(file_size);

    let ranges = starts
        .windows(2)
        .map(|pair| ChunkRange {
            start: pair[0],
            end: pair[1],
        })
        .collect();

    Ok(ranges)
}
