use std::io;

/// Errors that can occur during ZFS statistics collection and parsing
#[derive(Debug, thiserror::Error)]
pub enum ZfsError {
    /// Expected kstat source is absent or cannot be opened
    #[error("cannot open {path} for reading")]
    SourceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The `name type data` header never appeared in a kstat table
    #[error("did not parse a single {source_name:?} metric")]
    MalformedHeader { source_name: String },

    /// A value failed to decode as the expected numeric type
    #[error("could not parse expected numeric value for {key:?} (got {value:?}): {reason}")]
    ValueDecode {
        key: String,
        value: String,
        reason: String,
    },

    /// A structured record is missing a field it cannot be attributed without
    #[error("no {field} in {class} stat {entry:?}")]
    MissingRequiredField {
        entry: String,
        class: String,
        field: String,
    },

    /// A pool source path is too short to derive the pool name from
    #[error("zpool path {path:?} did not return at least two elements")]
    PathStructure { path: String },

    /// The external kstat command could not be run or exited non-zero
    #[error("executing {command} {args:?}: {reason}")]
    SourceInvocation {
        command: String,
        args: Vec<String>,
        reason: String,
    },

    /// The external kstat command produced output that is not a kstat array
    #[error("parsing {command} output")]
    OutputDecode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// Transport-level read failure while a source was being parsed
    #[error("reading {source_name}")]
    Read {
        source_name: String,
        #[source]
        source: io::Error,
    },

    /// The metric sink rejected a measurement
    #[error("metric sink rejected {metric}: {reason}")]
    Sink { metric: String, reason: String },

    /// No statistics source exists for the running operating system
    #[error("ZFS statistics are not supported on {sysname}")]
    UnsupportedPlatform { sysname: String },
}

impl ZfsError {
    /// Create a source unavailable error
    pub fn source_unavailable(path: &str, source: io::Error) -> Self {
        ZfsError::SourceUnavailable {
            path: path.to_string(),
            source,
        }
    }

    /// Create a malformed header error
    pub fn malformed_header(source_name: &str) -> Self {
        ZfsError::MalformedHeader {
            source_name: source_name.to_string(),
        }
    }

    /// Create a value decode error
    pub fn value_decode(key: &str, value: &str, reason: &str) -> Self {
        ZfsError::ValueDecode {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(entry: &str, class: &str, field: &str) -> Self {
        ZfsError::MissingRequiredField {
            entry: entry.to_string(),
            class: class.to_string(),
            field: field.to_string(),
        }
    }

    /// Create a path structure error
    pub fn path_structure(path: &str) -> Self {
        ZfsError::PathStructure {
            path: path.to_string(),
        }
    }

    /// Create a command invocation error
    pub fn source_invocation(command: &str, args: &[&str], reason: &str) -> Self {
        ZfsError::SourceInvocation {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            reason: reason.to_string(),
        }
    }

    /// Create an output decode error
    pub fn output_decode(command: &str, source: serde_json::Error) -> Self {
        ZfsError::OutputDecode {
            command: command.to_string(),
            source,
        }
    }

    /// Create a read error
    pub fn read(source_name: &str, source: io::Error) -> Self {
        ZfsError::Read {
            source_name: source_name.to_string(),
            source,
        }
    }

    /// Create a sink error
    pub fn sink(metric: &str, reason: &str) -> Self {
        ZfsError::Sink {
            metric: metric.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported_platform(sysname: &str) -> Self {
        ZfsError::UnsupportedPlatform {
            sysname: sysname.to_string(),
        }
    }

    /// Whether a collection pass may skip this error and continue.
    ///
    /// Only an absent kstat file is soft, and only inside the per-subsystem
    /// loop; callers elsewhere still treat it as fatal.
    pub fn is_soft(&self) -> bool {
        matches!(self, ZfsError::SourceUnavailable { .. })
    }
}

/// Result type alias for ZFS operations
pub type ZfsResult<T> = Result<T, ZfsError>;
