//! Lazy detection of snapshot blocks inside a trajectory log.
//!
//! A trajectory log interleaves arbitrary simulation output with coordinate blocks.
//! A coordinate block is opened by two consecutive boundary marker lines (`#`
//! followed by exactly 80 `-`) and closed by the next marker line or by the end of
//! the stream:
//!
//! ```text
//! #--------------------------------------------------------------------------------
//! # ordinary output, discarded
//! #--------------------------------------------------------------------------------
//! #--------------------------------------------------------------------------------
//!  6   0.1021   1.5e-3        <- first line of snapshot 1
//!  6   0.2042  -2.1e-3
//!  ...
//! #--------------------------------------------------------------------------------
//! ```
//!
//! The scanner holds at most one block in memory, so the whole conversion runs in
//! memory proportional to a single snapshot regardless of the log size.

use std::io::{self, BufRead};
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Number of `-` characters following the `#` of a boundary marker.
pub const MARKER_DASH_COUNT: usize = 80;

/// Returns `true` if the trimmed line is `#` followed by exactly 80 `-`.
pub fn is_boundary_marker(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() == MARKER_DASH_COUNT + 1
        && trimmed.starts_with('#')
        && trimmed[1..].bytes().all(|b| b == b'-')
}

fn is_near_miss_marker(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("#-")
        && trimmed[1..].bytes().all(|b| b == b'-')
        && trimmed.len() != MARKER_DASH_COUNT + 1
}

/// One snapshot's worth of raw lines, as cut out of the trajectory stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSnapshot {
    /// 1-based snapshot index in stream order.
    pub index: u64,
    /// 1-based source line number of the first data line of the block.
    pub first_line: usize,
    /// The data lines, without line terminators.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for a boundary marker.
    Scanning,
    /// One marker seen; the next line decides whether a block opens.
    Armed,
    /// Collecting data lines of the current block.
    InSnapshot,
}

/// A pull-based state machine yielding one [`RawSnapshot`] per coordinate block.
///
/// The scanner implements [`Iterator`]; each call to `next` reads only as far as the
/// end of the next block. The marker line that closes a block is kept in a one-line
/// pushback buffer and re-processed on the following pull, since it may itself open
/// the next block. After an I/O error or the end of the stream the iterator is fused.
///
/// The scanner never fails on content: malformed marker lines are ordinary lines.
pub struct SnapshotScanner<R> {
    reader: R,
    buffer: Vec<u8>,
    pushback: Option<String>,
    state: ScanState,
    next_index: u64,
    block: Vec<String>,
    block_start: usize,
    lines_read: usize,
    finished: bool,
}

impl<R: BufRead> SnapshotScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            pushback: None,
            state: ScanState::Scanning,
            next_index: 1,
            block: Vec::new(),
            block_start: 0,
            lines_read: 0,
            finished: false,
        }
    }

    /// Number of physical lines consumed from the source so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pushback.take() {
            return Ok(Some(line));
        }
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        // Simulation output may carry non-UTF-8 bytes; only real I/O failures are errors.
        let line = String::from_utf8_lossy(&self.buffer);
        Ok(Some(line.trim_end_matches(&['\n', '\r'][..]).to_string()))
    }

    fn close_block(&mut self) -> RawSnapshot {
        let snapshot = RawSnapshot {
            index: self.next_index,
            first_line: self.block_start,
            lines: std::mem::take(&mut self.block),
        };
        debug!(
            "Closed snapshot {} ({} lines starting at line {}).",
            snapshot.index,
            snapshot.lines.len(),
            snapshot.first_line
        );
        self.next_index += 1;
        self.state = ScanState::Scanning;
        snapshot
    }
}

impl<R: BufRead> Iterator for SnapshotScanner<R> {
    type Item = io::Result<RawSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    // End of stream is a valid terminator for an open block.
                    if self.state == ScanState::InSnapshot {
                        return Some(Ok(self.close_block()));
                    }
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            let is_marker = is_boundary_marker(&line);
            if !is_marker && is_near_miss_marker(&line) {
                debug!(
                    "Line {} looks like a boundary marker but has {} dashes; treating it as ordinary text.",
                    self.lines_read,
                    line.trim().len() - 1
                );
            }

            match (self.state, is_marker) {
                (ScanState::Scanning, true) => self.state = ScanState::Armed,
                (ScanState::Scanning, false) => {}
                (ScanState::Armed, true) => {
                    trace!("Snapshot block opens after line {}.", self.lines_read);
                    self.state = ScanState::InSnapshot;
                    self.block_start = self.lines_read + 1;
                }
                (ScanState::Armed, false) => self.state = ScanState::Scanning,
                (ScanState::InSnapshot, false) => self.block.push(line),
                (ScanState::InSnapshot, true) => {
                    self.pushback = Some(line);
                    return Some(Ok(self.close_block()));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for SnapshotScanner<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn marker() -> String {
        format!("#{}", "-".repeat(MARKER_DASH_COUNT))
    }

    fn scan(text: &str) -> Vec<RawSnapshot> {
        SnapshotScanner::new(Cursor::new(text.to_string()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    fn join(lines: &[&str]) -> String {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    #[test]
    fn marker_detection_requires_exactly_eighty_dashes() {
        assert!(is_boundary_marker(&marker()));
        assert!(is_boundary_marker(&format!("   {}  \r", marker())));
        assert!(!is_boundary_marker(&format!("#{}", "-".repeat(79))));
        assert!(!is_boundary_marker(&format!("#{}", "-".repeat(81))));
        assert!(!is_boundary_marker(&format!("#{}=", "-".repeat(79))));
        assert!(!is_boundary_marker(&"-".repeat(81)));
        assert!(!is_boundary_marker(""));
    }

    #[test]
    fn single_block_closed_by_marker_is_emitted() {
        let m = marker();
        let text = join(&[&m, &m, "1 0.0,0.0,0.0 0.0,0.0,0.0", &m]);
        let snapshots = scan(&text);

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].index, 1);
        assert_eq!(snapshots[0].first_line, 3);
        assert_eq!(snapshots[0].lines, vec!["1 0.0,0.0,0.0 0.0,0.0,0.0"]);
    }

    #[test]
    fn block_terminated_by_end_of_stream_is_emitted() {
        let m = marker();
        let text = format!("{m}\n{m}\n6 0.1 0.2\n6 0.3 0.4");
        let snapshots = scan(&text);

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].lines, vec!["6 0.1 0.2", "6 0.3 0.4"]);
    }

    #[test]
    fn multiple_blocks_are_indexed_in_order_despite_noise() {
        let m = marker();
        let text = join(&[
            "Step 0 energy -123.4",
            &m,
            "# header that is not a block",
            &m,
            &m,
            "1 0.1 0.2",
            &m,
            "some solver chatter",
            &m,
            &m,
            "2 0.3 0.4",
            "2 0.5 0.6",
            &m,
            "final timings",
            &m,
            &m,
            "3 0.7 0.8",
        ]);
        let snapshots = scan(&text);

        let indices: Vec<u64> = snapshots.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(snapshots[0].lines, vec!["1 0.1 0.2"]);
        assert_eq!(snapshots[1].lines, vec!["2 0.3 0.4", "2 0.5 0.6"]);
        assert_eq!(snapshots[2].lines, vec!["3 0.7 0.8"]);
    }

    #[test]
    fn closing_marker_can_open_the_next_block() {
        let m = marker();
        let text = join(&[&m, &m, "a 1 2", &m, &m, "b 3 4", &m]);
        let snapshots = scan(&text);

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].lines, vec!["a 1 2"]);
        assert_eq!(snapshots[1].lines, vec!["b 3 4"]);
        assert_eq!(snapshots[1].first_line, 6);
    }

    #[test]
    fn block_without_data_lines_is_emitted_empty() {
        let m = marker();
        let text = join(&[&m, &m, &m, "trailing noise"]);
        let snapshots = scan(&text);

        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].lines.is_empty());
    }

    #[test]
    fn stream_without_markers_yields_nothing() {
        let text = join(&["no", "markers", "here"]);
        assert!(scan(&text).is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn single_marker_without_confirmation_yields_nothing() {
        let m = marker();
        let text = join(&["noise", &m, "1 0.1 0.2", "1 0.3 0.4"]);
        assert!(scan(&text).is_empty());

        let text = join(&["noise", &m]);
        assert!(scan(&text).is_empty());
    }

    #[test]
    fn near_miss_markers_are_ordinary_lines() {
        let m = marker();
        let short = format!("#{}", "-".repeat(79));
        let text = join(&[&short, &short, "1 0.1 0.2", &m, &short, "x"]);
        assert!(scan(&text).is_empty());

        let text = join(&[&m, &m, &short, "1 0.1 0.2"]);
        let snapshots = scan(&text);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].lines, vec![short.as_str(), "1 0.1 0.2"]);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let m = marker();
        let text = format!("{m}\r\n{m}\r\n1 0.1 0.2\r\n{m}\r\n");
        let snapshots = scan(&text);

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].lines, vec!["1 0.1 0.2"]);
    }

    #[test]
    fn scanner_is_lazy_and_counts_lines() {
        let m = marker();
        let text = join(&[&m, &m, "1 0.1 0.2", &m, &m, "2 0.3 0.4", &m]);
        let mut scanner = SnapshotScanner::new(Cursor::new(text));

        let first = scanner.next().unwrap().unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(scanner.lines_read(), 4);

        let second = scanner.next().unwrap().unwrap();
        assert_eq!(second.index, 2);
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
        assert_eq!(scanner.lines_read(), 7);
    }

    #[test]
    fn non_utf8_noise_lines_do_not_stop_the_scan() {
        let m = marker();
        let mut bytes = b"Box length 12.5 \xC5ngstr\xF6m\n".to_vec();
        bytes.extend_from_slice(
            format!("{m}\n{m}\n1 0.0,0.0,0.0 0.0,0.0,0.0\n{m}\n").as_bytes(),
        );
        bytes.extend_from_slice(b"trailing \xFF\xFE noise\n");

        let snapshots = SnapshotScanner::new(Cursor::new(bytes))
            .collect::<io::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].index, 1);
        assert_eq!(snapshots[0].lines, vec!["1 0.0,0.0,0.0 0.0,0.0,0.0"]);
        assert_eq!(snapshots[0].first_line, 4);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn io_error_is_surfaced_once_and_fuses_the_iterator() {
        let mut scanner = SnapshotScanner::new(io::BufReader::new(FailingReader));

        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
