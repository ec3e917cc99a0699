use serde::Deserialize;
use std::collections::BTreeMap;

/// kstat module every ZFS statistic lives under
pub const KSTAT_MODULE: &str = "zfs";

/// Numeric payload of a single statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    U64(u64),
}

impl StatValue {
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::U64(v) => v as f64,
        }
    }
}

/// One decoded statistic, keyed by its dotted kstat path
/// (e.g. `kstat.zfs.misc.arcstats.hits`)
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub key: String,
    pub value: StatValue,
}

impl StatRecord {
    pub fn new(key: String, value: StatValue) -> Self {
        Self { key, value }
    }

    /// Build the dotted key used by both text encodings
    pub fn misc_key(qualifier: &str, field: &str) -> String {
        format!("kstat.{}.misc.{}.{}", KSTAT_MODULE, qualifier, field)
    }
}

/// kstat data types, from `sys/kstat.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KstatDataType {
    Char,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Long,
    Ulong,
    String,
}

impl KstatDataType {
    /// Map the numeric type column of a kstat table
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(KstatDataType::Char),
            "1" => Some(KstatDataType::Int32),
            "2" => Some(KstatDataType::Uint32),
            "3" => Some(KstatDataType::Int64),
            "4" => Some(KstatDataType::Uint64),
            "5" => Some(KstatDataType::Long),
            "6" => Some(KstatDataType::Ulong),
            "7" => Some(KstatDataType::String),
            _ => None,
        }
    }
}

/// A named category of ZFS counters and the kstat file that exposes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsystem {
    pub name: String,
    pub source: String,
}

impl Subsystem {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
        }
    }
}

/// Subsystems exposed under `spl/kstat/zfs` on Linux
pub const DEFAULT_SUBSYSTEMS: &[(&str, &str)] = &[
    ("zfs_abd", "abdstats"),
    ("zfs_arc", "arcstats"),
    ("zfs_dbuf", "dbuf_stats"),
    ("zfs_dmu_tx", "dmu_tx"),
    ("zfs_dnode", "dnodestats"),
    ("zfs_fm", "fm"),
    ("zfs_vdev_cache", "vdev_cache_stats"), // deprecated upstream
    ("zfs_vdev_mirror", "vdev_mirror_stats"),
    ("zfs_xuio", "xuio_stats"),
    ("zfs_zfetch", "zfetchstats"),
    ("zfs_zil", "zil"),
];

pub fn default_subsystems() -> Vec<Subsystem> {
    DEFAULT_SUBSYSTEMS
        .iter()
        .map(|(name, source)| Subsystem::new(name, source))
        .collect()
}

/// One element of `kstat -j` output
#[derive(Debug, Clone, Deserialize)]
pub struct KstatEntry {
    #[serde(default)]
    pub module: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

/// kstat classes the structured decoder knows how to attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KstatClass {
    Misc,
    Disk,
    ZoneZfs,
    Other,
}

impl KstatClass {
    pub fn from_name(class: &str) -> Self {
        match class {
            "misc" => KstatClass::Misc,
            "disk" => KstatClass::Disk,
            "zone_zfs" => KstatClass::ZoneZfs,
            _ => KstatClass::Other,
        }
    }
}
