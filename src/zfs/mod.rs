//! ZFS kstat parsing, naming and collection

pub mod collector;
pub mod error;
pub mod kstat_json;
pub mod kstat_table;
pub mod naming;
pub mod pool_io;
pub mod types;


// Re-export commonly used items
pub use collector::{KstatCommandSource, ProcKstatSource, StatsSource, ZfsCollector};
pub use error::{ZfsError, ZfsResult};
pub use naming::{Label, Measurement, MetricIdentity, MetricNamer};
pub use types::{StatRecord, StatValue, Subsystem};
