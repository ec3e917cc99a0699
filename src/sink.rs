//! Destinations for measurements produced by a collection pass

use crate::zfs::error::{ZfsError, ZfsResult};
use crate::zfs::naming::Measurement;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

/// Receives measurements one at a time as a pass decodes them
pub trait MetricSink: Send {
    fn emit(&mut self, measurement: Measurement) -> ZfsResult<()>;
}

/// Keeps every measurement in arrival order
#[derive(Debug, Default)]
pub struct MeasurementBuffer {
    measurements: Vec<Measurement>,
}

impl MeasurementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

impl MetricSink for MeasurementBuffer {
    fn emit(&mut self, measurement: Measurement) -> ZfsResult<()> {
        self.measurements.push(measurement);
        Ok(())
    }
}

/// Publishes measurements as gauges in a Prometheus registry.
///
/// Meant to live for a single pass; build a new one for the next pass.
pub struct PrometheusSink {
    registry: Registry,
    families: HashMap<String, GaugeVec>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            families: HashMap::new(),
        }
    }

    /// Render everything emitted so far in text exposition format
    pub fn encode(&self) -> ZfsResult<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| ZfsError::sink("registry", &e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| ZfsError::sink("registry", &e.to_string()))
    }

    fn family(&mut self, measurement: &Measurement) -> ZfsResult<&GaugeVec> {
        let name = measurement.name();
        if !self.families.contains_key(name) {
            let label_names: Vec<&str> = measurement.label().map(|l| l.name).into_iter().collect();
            let gauge_vec = GaugeVec::new(Opts::new(name, measurement.help.as_str()), &label_names)
                .map_err(|e| ZfsError::sink(name, &e.to_string()))?;
            self.registry
                .register(Box::new(gauge_vec.clone()))
                .map_err(|e| ZfsError::sink(name, &e.to_string()))?;
            self.families.insert(name.to_string(), gauge_vec);
        }
        self.families
            .get(name)
            .ok_or_else(|| ZfsError::sink(name, "family not registered"))
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSink for PrometheusSink {
    fn emit(&mut self, measurement: Measurement) -> ZfsResult<()> {
        let family = self.family(&measurement)?;
        let label_values: Vec<&str> = measurement
            .label()
            .map(|l| l.value.as_str())
            .into_iter()
            .collect();
        let gauge = family
            .get_metric_with_label_values(&label_values)
            .map_err(|e| ZfsError::sink(measurement.name(), &e.to_string()))?;
        gauge.set(measurement.value);
        Ok(())
    }
}
