//! Decoder for `kstat -j` output on Solaris and illumos

use super::error::{ZfsError, ZfsResult};
use super::naming::MetricNamer;
use super::types::{KstatClass, KstatEntry};
use crate::sink::MetricSink;
use serde_json::Value;
use tracing::trace;

pub const KSTAT_COMMAND: &str = "kstat";
pub const KSTAT_ARGS: &[&str] = &["-j", "/zfs|zone_zfs/:::"];

const ZONENAME: &str = "zonename";

/// Decode the top-level JSON array printed by `kstat -j`
pub fn decode_kstat_output(output: &[u8]) -> ZfsResult<Vec<KstatEntry>> {
    serde_json::from_slice(output).map_err(|e| ZfsError::output_decode(KSTAT_COMMAND, e))
}

fn numeric_value(key: &str, value: &Value) -> ZfsResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ZfsError::value_decode(key, &value.to_string(), "not a number"))
}

/// Emit every field of `entry` according to its kstat class
pub fn dispatch_entry(
    entry: &KstatEntry,
    namer: &MetricNamer,
    sink: &mut dyn MetricSink,
) -> ZfsResult<()> {
    match KstatClass::from_name(&entry.class) {
        KstatClass::Misc => {
            for (key, value) in &entry.data {
                let value = numeric_value(key, value)?;
                sink.emit(namer.misc_entry_metric(&entry.name, key, value))?;
            }
        }
        KstatClass::Disk => {
            for (key, value) in &entry.data {
                let value = numeric_value(key, value)?;
                sink.emit(namer.disk_metric(&entry.name, key, value))?;
            }
        }
        KstatClass::ZoneZfs => {
            let zonename = entry
                .data
                .get(ZONENAME)
                .and_then(Value::as_str)
                .ok_or_else(|| ZfsError::missing_field(&entry.name, &entry.class, ZONENAME))?;

            for (key, value) in entry.data.iter().filter(|(key, _)| *key != ZONENAME) {
                let value = numeric_value(key, value)?;
                sink.emit(namer.zone_metric(zonename, key, value))?;
            }
        }
        KstatClass::Other => {
            trace!(
                "Ignoring kstat {}:{} of class {}",
                entry.module, entry.name, entry.class
            );
        }
    }
    Ok(())
}

/// Decode `kstat -j` output and emit every recognized entry in order
pub fn parse_kstat_output(
    output: &[u8],
    namer: &MetricNamer,
    sink: &mut dyn MetricSink,
) -> ZfsResult<()> {
    for entry in decode_kstat_output(output)? {
        dispatch_entry(&entry, namer, sink)?;
    }
    Ok(())
}
