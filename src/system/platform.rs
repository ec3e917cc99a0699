use crate::zfs::error::{ZfsError, ZfsResult};
use nix::sys::utsname::uname;
use std::fmt;

/// Operating system family, which decides how kstats are exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Text tables under `/proc/spl/kstat/zfs`
    Linux,
    /// JSON from `kstat -j` (Solaris, illumos)
    Solaris,
}

impl Platform {
    pub fn from_sysname(sysname: &str) -> ZfsResult<Self> {
        match sysname {
            "Linux" => Ok(Platform::Linux),
            "SunOS" => Ok(Platform::Solaris),
            other => Err(ZfsError::unsupported_platform(other)),
        }
    }

    /// Detect the running kernel through uname(2)
    pub fn detect() -> ZfsResult<Self> {
        let uts = uname().map_err(|e| ZfsError::unsupported_platform(&e.to_string()))?;
        Self::from_sysname(&uts.sysname().to_string_lossy())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Solaris => write!(f, "solaris"),
        }
    }
}
