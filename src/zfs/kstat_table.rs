//! Parser for the `name type data` tables under `/proc/spl/kstat/zfs`
//!
//! ```text
//! 13 1 0x01 147 39984 5263424547 1120353785577
//! name                            type data
//! hits                            4    42
//! misses                          4    3
//! ```

use super::error::{ZfsError, ZfsResult};
use super::types::{KstatDataType, StatRecord, StatValue};
use std::io::{BufRead, Lines};

const HEADER: [&str; 3] = ["name", "type", "data"];

/// Lazily yields the uint64 rows of a kstat table
pub struct KstatTableReader<R> {
    lines: Lines<R>,
    qualifier: String,
    header_seen: bool,
    done: bool,
}

impl<R: BufRead> KstatTableReader<R> {
    /// `qualifier` is the kstat file name (e.g. `arcstats`); it becomes part of every key
    pub fn new(reader: R, qualifier: &str) -> Self {
        Self {
            lines: reader.lines(),
            qualifier: qualifier.to_string(),
            header_seen: false,
            done: false,
        }
    }

    fn parse_row(&self, parts: &[&str]) -> Option<ZfsResult<StatRecord>> {
        if parts.len() < 3 {
            return None;
        }

        // Only KSTAT_DATA_UINT64 is surfaced
        if KstatDataType::from_code(parts[1]) != Some(KstatDataType::Uint64) {
            return None;
        }

        let key = StatRecord::misc_key(&self.qualifier, parts[0]);
        Some(match parts[2].parse::<u64>() {
            Ok(value) => Ok(StatRecord::new(key, StatValue::U64(value))),
            Err(e) => Err(ZfsError::value_decode(&key, parts[2], &e.to_string())),
        })
    }
}

impl<R: BufRead> Iterator for KstatTableReader<R> {
    type Item = ZfsResult<StatRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ZfsError::read(&self.qualifier, e)));
                }
                None => {
                    self.done = true;
                    if self.header_seen {
                        return None;
                    }
                    return Some(Err(ZfsError::malformed_header(&self.qualifier)));
                }
            };

            let parts: Vec<&str> = line.split_whitespace().collect();

            if !self.header_seen {
                if parts == HEADER {
                    self.header_seen = true;
                }
                continue;
            }

            if let Some(result) = self.parse_row(&parts) {
                if result.is_err() {
                    self.done = true;
                }
                return Some(result);
            }
        }
    }
}

/// Parse a kstat table, invoking `handler` for every uint64 row
pub fn parse_kstat_table<R, H>(reader: R, qualifier: &str, mut handler: H) -> ZfsResult<()>
where
    R: BufRead,
    H: FnMut(StatRecord) -> ZfsResult<()>,
{
    for record in KstatTableReader::new(reader, qualifier) {
        handler(record?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn collect(input: &str, qualifier: &str) -> ZfsResult<Vec<StatRecord>> {
        let mut records = Vec::new();
        parse_kstat_table(Cursor::new(input), qualifier, |record| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }

    #[test]
    fn test_skips_non_uint64_rows() {
        let records = collect("name type data\nhits 4 42\nmisses 0 3\n", "arcstats").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "kstat.zfs.misc.arcstats.hits");
        assert_eq!(records[0].value, StatValue::U64(42));
    }

    #[test]
    fn test_ignores_preamble_before_header() {
        let input = "\
13 1 0x01 147 39984 5263424547 1120353785577
name                            type data
hits                            4    8772461
misses                          4    1053278
c_max                           4    8317505536
";
        let records = collect(input, "arcstats").unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "kstat.zfs.misc.arcstats.hits",
                "kstat.zfs.misc.arcstats.misses",
                "kstat.zfs.misc.arcstats.c_max",
            ]
        );
    }

    #[test]
    fn test_skips_short_rows() {
        let records = collect("name type data\n\nhits 4\nmisses 4 9\n", "arcstats").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, StatValue::U64(9));
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let result = collect("hits 4 42\n", "zil");

        if let Err(ZfsError::MalformedHeader { source_name }) = result {
            assert_eq!(source_name, "zil");
        } else {
            panic!("Expected MalformedHeader error");
        }
    }

    #[test]
    fn test_reordered_header_is_malformed() {
        let result = collect("type name data\nhits 4 42\n", "arcstats");
        assert!(matches!(result, Err(ZfsError::MalformedHeader { .. })));
    }

    #[test]
    fn test_header_with_extra_column_is_not_matched() {
        let result = collect("name type data extra\nhits 4 42\n", "arcstats");
        assert!(matches!(result, Err(ZfsError::MalformedHeader { .. })));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(
            collect("", "dmu_tx"),
            Err(ZfsError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(collect("name type data\n", "fm").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_value_names_key() {
        let result = collect("name type data\nhits 4 lots\n", "arcstats");

        if let Err(ZfsError::ValueDecode { key, value, .. }) = result {
            assert_eq!(key, "kstat.zfs.misc.arcstats.hits");
            assert_eq!(value, "lots");
        } else {
            panic!("Expected ValueDecode error");
        }
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let result = collect("name type data\ndelta 4 -1\n", "arcstats");
        assert!(matches!(result, Err(ZfsError::ValueDecode { .. })));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut reader = KstatTableReader::new(
            Cursor::new("name type data\nhits 4 x\nmisses 4 3\n"),
            "arcstats",
        );

        assert!(matches!(reader.next(), Some(Err(ZfsError::ValueDecode { .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_handler_error_aborts() {
        let mut seen = 0;
        let result = parse_kstat_table(
            Cursor::new("name type data\na 4 1\nb 4 2\n"),
            "arcstats",
            |record| {
                seen += 1;
                Err(ZfsError::sink(&record.key, "full"))
            },
        );

        assert!(matches!(result, Err(ZfsError::Sink { .. })));
        assert_eq!(seen, 1);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_read_error_is_surfaced() {
        let result = parse_kstat_table(io::BufReader::new(FailingReader), "arcstats", |_| Ok(()));

        if let Err(ZfsError::Read { source, .. }) = result {
            assert_eq!(source.to_string(), "device gone");
        } else {
            panic!("Expected Read error");
        }
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let input = "name type data\nhits 4 42\nsize 4 1024\nname_str 7 foo\n";
        assert_eq!(
            collect(input, "arcstats").unwrap(),
            collect(input, "arcstats").unwrap()
        );
    }
}
