use zfs_kstat_exporter::zfs::{Label, Measurement};

/// Integral values print without a fractional part, everything else as-is
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// `{zpool="tank"}` style label suffix, empty when unlabeled
pub fn format_label(label: Option<&Label>) -> String {
    match label {
        Some(label) => format!("{{{}=\"{}\"}}", label.name, label.value),
        None => String::new(),
    }
}

/// Metric name with its label, e.g. `node_zfs_zpool_nread{zpool="tank"}`
pub fn format_identity(measurement: &Measurement) -> String {
    format!(
        "{}{}",
        measurement.name(),
        format_label(measurement.label())
    )
}
