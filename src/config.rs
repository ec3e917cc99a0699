//! Collector configuration
//!
//! Defaults mirror the layout of ZFS on Linux and the Solaris `kstat` tool;
//! the binary overrides them from its command line.

use crate::zfs::kstat_json::{KSTAT_ARGS, KSTAT_COMMAND};
use crate::zfs::types::{Subsystem, default_subsystems};
use std::path::PathBuf;

pub const DEFAULT_NAMESPACE: &str = "node";
pub const DEFAULT_PROCFS: &str = "/proc";
pub const KSTAT_BASE: &str = "spl/kstat/zfs";
pub const POOL_IO_FILE: &str = "io";

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Prefix of every metric name
    pub namespace: String,
    /// Mount point of procfs
    pub procfs_root: PathBuf,
    /// kstat directory relative to `procfs_root`
    pub kstat_base: PathBuf,
    /// File name matched in every pool directory
    pub pool_io_file: String,
    /// Subsystem to kstat file mapping, read in order
    pub subsystems: Vec<Subsystem>,
    pub kstat_command: String,
    pub kstat_args: Vec<String>,
}

impl CollectorConfig {
    pub fn kstat_dir(&self) -> PathBuf {
        self.procfs_root.join(&self.kstat_base)
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_procfs_root(mut self, procfs_root: impl Into<PathBuf>) -> Self {
        self.procfs_root = procfs_root.into();
        self
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            procfs_root: PathBuf::from(DEFAULT_PROCFS),
            kstat_base: PathBuf::from(KSTAT_BASE),
            pool_io_file: POOL_IO_FILE.to_string(),
            subsystems: default_subsystems(),
            kstat_command: KSTAT_COMMAND.to_string(),
            kstat_args: KSTAT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
