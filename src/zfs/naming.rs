//! Metric identities for decoded kstat records

use super::types::StatRecord;

pub const ZPOOL_LABEL: &str = "zpool";
pub const ZONE_LABEL: &str = "zone";

/// The single label a ZFS measurement may carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricIdentity {
    pub name: String,
    pub label: Option<Label>,
}

/// A named, optionally labeled, untyped value ready for a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub identity: MetricIdentity,
    pub help: String,
    pub value: f64,
}

impl Measurement {
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn label(&self) -> Option<&Label> {
        self.identity.label.as_ref()
    }
}

/// Last dot-segment of a kstat key with hyphens made identifier-safe
pub fn metric_suffix(key: &str) -> String {
    key.rsplit('.').next().unwrap_or(key).replace('-', "_")
}

/// Join name parts with `_`, skipping empty ones. An empty name yields an empty result.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Maps records onto metric identities under one namespace
#[derive(Debug, Clone)]
pub struct MetricNamer {
    namespace: String,
}

impl MetricNamer {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    /// `<ns>_<subsystem>_<suffix>`, e.g. `node_zfs_arc_hits`
    pub fn subsystem_metric(&self, subsystem: &str, record: &StatRecord) -> Measurement {
        Measurement {
            identity: MetricIdentity {
                name: build_fq_name(&self.namespace, subsystem, &metric_suffix(&record.key)),
                label: None,
            },
            help: record.key.clone(),
            value: record.value.as_f64(),
        }
    }

    /// `<ns>_zfs_zpool_<suffix>{zpool="<pool>"}`
    pub fn pool_metric(&self, pool: &str, record: &StatRecord) -> Measurement {
        Measurement {
            identity: MetricIdentity {
                name: build_fq_name(&self.namespace, "zfs_zpool", &metric_suffix(&record.key)),
                label: Some(Label {
                    name: ZPOOL_LABEL,
                    value: pool.to_string(),
                }),
            },
            help: record.key.clone(),
            value: record.value.as_f64(),
        }
    }

    /// `<ns>_zfs_<entry>_<field>` for `misc` class kstats
    pub fn misc_entry_metric(&self, entry: &str, field: &str, value: f64) -> Measurement {
        let metric_name = format!("{}_{}", entry, field).replace('-', "_");
        Measurement {
            identity: MetricIdentity {
                name: build_fq_name(&self.namespace, "zfs", &metric_name),
                label: None,
            },
            help: metric_name,
            value,
        }
    }

    /// `<ns>_zfs_zpool_<field>{zpool="<entry>"}` for `disk` class kstats
    pub fn disk_metric(&self, pool: &str, field: &str, value: f64) -> Measurement {
        self.labeled("zfs_zpool", field, ZPOOL_LABEL, pool, value)
    }

    /// `<ns>_zfs_zone_<field>{zone="<zonename>"}` for `zone_zfs` class kstats
    pub fn zone_metric(&self, zone: &str, field: &str, value: f64) -> Measurement {
        self.labeled("zfs_zone", field, ZONE_LABEL, zone, value)
    }

    fn labeled(
        &self,
        subsystem: &str,
        field: &str,
        label: &'static str,
        label_value: &str,
        value: f64,
    ) -> Measurement {
        let metric_name = field.replace('-', "_");
        Measurement {
            identity: MetricIdentity {
                name: build_fq_name(&self.namespace, subsystem, &metric_name),
                label: Some(Label {
                    name: label,
                    value: label_value.to_string(),
                }),
            },
            help: metric_name,
            value,
        }
    }
}
