//! Parser for the per-pool `io` kstat files (`/proc/spl/kstat/zfs/<pool>/io`)
//!
//! The file carries one header line of column names starting with `nread`
//! followed by a single row of values in the same order.
//!
//! Records are yielded field by field. If a value in the middle of a row
//! fails to decode, the fields before it have already been handed out and
//! are not taken back.

use super::error::{ZfsError, ZfsResult};
use super::types::{StatRecord, StatValue};
use std::io::{BufRead, Lines};

const MIN_COLUMNS: usize = 12;
const FIRST_COLUMN: &str = "nread";

/// Split a pool kstat path into `(pool name, file name)`
pub fn pool_identity(path: &str) -> ZfsResult<(String, String)> {
    let elements: Vec<&str> = path.split('/').collect();
    let len = elements.len();
    if len < 2 {
        return Err(ZfsError::path_structure(path));
    }
    Ok((elements[len - 2].to_string(), elements[len - 1].to_string()))
}

/// Lazily yields one record per column of every data row in a pool `io` file
pub struct PoolIoReader<R> {
    lines: Lines<R>,
    path: String,
    pool: String,
    file: String,
    columns: Option<Vec<String>>,
    row: Vec<String>,
    cursor: usize,
    done: bool,
}

impl<R: BufRead> PoolIoReader<R> {
    pub fn new(reader: R, path: &str) -> ZfsResult<Self> {
        let (pool, file) = pool_identity(path)?;
        Ok(Self {
            lines: reader.lines(),
            path: path.to_string(),
            pool,
            file,
            columns: None,
            row: Vec::new(),
            cursor: 0,
            done: false,
        })
    }

    pub fn pool_name(&self) -> &str {
        &self.pool
    }

    /// Decode the field under the cursor of the current row
    fn next_field(&mut self, columns: &[String]) -> ZfsResult<StatRecord> {
        let column = &columns[self.cursor];
        let key = StatRecord::misc_key(&self.file, column);
        let token = self.row.get(self.cursor).map(String::as_str);
        self.cursor += 1;

        match token {
            Some(token) => token
                .parse::<u64>()
                .map(|value| StatRecord::new(key.clone(), StatValue::U64(value)))
                .map_err(|e| ZfsError::value_decode(&key, token, &e.to_string())),
            None => Err(ZfsError::value_decode(&key, "", "missing value")),
        }
    }
}

impl<R: BufRead> Iterator for PoolIoReader<R> {
    type Item = ZfsResult<StatRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(columns) = self.columns.take() {
                if self.cursor < columns.len() {
                    let result = self.next_field(&columns);
                    self.columns = Some(columns);
                    if result.is_err() {
                        self.done = true;
                    }
                    return Some(result);
                }
                self.columns = Some(columns);
            }

            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ZfsError::read(&self.path, e)));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };

            let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();

            if self.columns.is_none() {
                if parts.len() >= MIN_COLUMNS && parts[0] == FIRST_COLUMN {
                    self.columns = Some(parts);
                }
                continue;
            }

            if parts.is_empty() {
                continue;
            }
            self.row = parts;
            self.cursor = 0;
        }
    }
}

/// Parse a pool `io` file, invoking `handler(pool, record)` for every field
pub fn parse_pool_io<R, H>(reader: R, path: &str, mut handler: H) -> ZfsResult<()>
where
    R: BufRead,
    H: FnMut(&str, StatRecord) -> ZfsResult<()>,
{
    let mut records = PoolIoReader::new(reader, path)?;
    while let Some(record) = records.next() {
        handler(records.pool_name(), record?)?;
    }
    Ok(())
}
