//! CSV row source
//!
//! Census CSV downloads are Latin-1 encoded, sometimes carry a preamble line
//! above the header, and are large enough that callers like to drop
//! uninteresting lines (other states, say) before parsing.

use crate::error::Result;
use crate::row::RawRow;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Predicate over raw (undecoded-CSV) lines
pub type LineFilter = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// How to read a census CSV file
#[derive(Default)]
pub struct CsvOptions {
    /// Lines above the header to discard
    pub skip_lines: usize,
    /// Keep only data lines for which this returns true; the header is always kept
    pub line_filter: Option<LineFilter>,
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_lines(mut self, n: usize) -> Self {
        self.skip_lines = n;
        self
    }

    pub fn line_filter<F>(mut self, keep: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.line_filter = Some(Box::new(keep));
        self
    }
}

impl fmt::Debug for CsvOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvOptions")
            .field("skip_lines", &self.skip_lines)
            .field("line_filter", &self.line_filter.is_some())
            .finish()
    }
}

/// Every byte is its own code point in Latin-1
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn keep_lines(body: &str, keep: &LineFilter) -> String {
    let mut lines = body.lines();
    let mut out = String::with_capacity(body.len());
    if let Some(header) = lines.next() {
        out.push_str(header);
        out.push('\n');
    }
    for line in lines.filter(|line| keep(*line)) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Read all rows of a Latin-1 CSV stream, in file order
pub fn read_rows<R: Read>(mut reader: R, options: &CsvOptions) -> Result<Vec<RawRow>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode_latin1(&bytes);

    let mut body: &str = &text;
    for _ in 0..options.skip_lines {
        body = body.split_once('\n').map_or("", |(_, rest)| rest);
    }

    let filtered;
    let body = match &options.line_filter {
        Some(keep) => {
            filtered = keep_lines(body, keep);
            filtered.as_str()
        }
        None => body,
    };

    let mut csv_reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(headers.iter().zip(record.iter()).collect::<RawRow>());
    }

    debug!(rows = rows.len(), columns = headers.len(), "read csv rows");
    Ok(rows)
}

/// Read all rows of a Latin-1 CSV file
pub fn read_rows_from_path<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Vec<RawRow>> {
    let file = File::open(path.as_ref())?;
    read_rows(file, options)
}
