//! Collects ZFS kernel statistics and turns them into labeled measurements.
//!
//! On Linux the kstats are text tables under `/proc/spl/kstat/zfs`; on
//! Solaris and illumos they come from `kstat -j`. Both end up as
//! [`zfs::Measurement`]s pushed into a [`sink::MetricSink`].

pub mod config;
pub mod demo;
pub mod sink;
pub mod system;
pub mod zfs;
