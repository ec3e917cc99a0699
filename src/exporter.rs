use crate::display::Terminal;
use clap::ValueEnum;
use std::error::Error;
use std::io::Write;
use std::time::Duration;
use tracing::{error, info};
use zfs_kstat_exporter::sink::{MeasurementBuffer, MetricSink, PrometheusSink};
use zfs_kstat_exporter::zfs::ZfsCollector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Prometheus text exposition format
    Prometheus,
    /// Aligned, colored listing for humans
    Pretty,
}

#[derive(Debug, Clone)]
pub struct ExporterOptions {
    pub format: OutputFormat,
    /// Repeat passes at this interval until Ctrl+C; a single pass when unset
    pub interval: Option<Duration>,
    /// Abandon a pass that runs longer than this
    pub timeout: Option<Duration>,
}

/// Run one pass, or one pass per interval until interrupted
pub async fn run(
    collector: &ZfsCollector,
    options: &ExporterOptions,
) -> Result<(), Box<dyn Error>> {
    let terminal = Terminal::new();

    let Some(interval) = options.interval else {
        return run_pass(collector, options, &terminal).await;
    };

    // Set up signal handler for Ctrl+C
    let (tx, mut rx) = tokio::sync::mpsc::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(()).await;
        }
    });

    info!(
        "Collecting from {} every {:?}",
        collector.source_name(),
        interval
    );
    loop {
        // A failed pass is reported and the next one still runs
        if let Err(e) = run_pass(collector, options, &terminal).await {
            error!("Collection pass failed: {}", e);
        }

        tokio::select! {
            _ = rx.recv() => {
                info!("Interrupted, stopping");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn run_pass(
    collector: &ZfsCollector,
    options: &ExporterOptions,
    terminal: &Terminal,
) -> Result<(), Box<dyn Error>> {
    match options.format {
        OutputFormat::Prometheus => {
            let mut sink = PrometheusSink::new();
            collect(collector, &mut sink, options.timeout).await?;

            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", sink.encode()?)?;
            stdout.flush()?;
        }
        OutputFormat::Pretty => {
            let mut sink = MeasurementBuffer::new();
            collect(collector, &mut sink, options.timeout).await?;

            let mut stdout = std::io::stdout().lock();
            terminal.write_header(&mut stdout, collector.source_name())?;
            terminal.write_measurements(&mut stdout, sink.measurements())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn collect(
    collector: &ZfsCollector,
    sink: &mut dyn MetricSink,
    timeout: Option<Duration>,
) -> Result<usize, Box<dyn Error>> {
    let count = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, collector.update(sink))
            .await
            .map_err(|_| format!("collection pass timed out after {:?}", timeout))??,
        None => collector.update(sink).await?,
    };
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zfs_kstat_exporter::config::CollectorConfig;
    use zfs_kstat_exporter::system::Platform;
    use zfs_kstat_exporter::zfs::{StatsSource, ZfsResult};

    struct SlowSource;

    #[async_trait]
    impl StatsSource for SlowSource {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn collect(&self, _sink: &mut dyn MetricSink) -> ZfsResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    fn demo_collector() -> ZfsCollector {
        ZfsCollector::for_platform(Platform::Linux, &CollectorConfig::default(), true)
    }

    #[tokio::test]
    async fn test_pass_timeout_is_reported() {
        let collector = ZfsCollector::new(Box::new(SlowSource));
        let mut sink = MeasurementBuffer::new();

        let err = collect(&collector, &mut sink, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("timed out after 10ms"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_pass_within_timeout_counts_measurements() {
        let collector = demo_collector();
        let mut sink = MeasurementBuffer::new();

        let count = collect(&collector, &mut sink, Some(Duration::from_secs(5)))
            .await
            .unwrap();

        assert!(count > 0);
        assert_eq!(sink.len(), count);
    }

    #[tokio::test]
    async fn test_single_pass_in_each_format() {
        let collector = demo_collector();
        for format in [OutputFormat::Prometheus, OutputFormat::Pretty] {
            let options = ExporterOptions {
                format,
                interval: None,
                timeout: None,
            };
            run(&collector, &options).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_single_pass_propagates_timeout() {
        let collector = ZfsCollector::new(Box::new(SlowSource));
        let options = ExporterOptions {
            format: OutputFormat::Prometheus,
            interval: None,
            timeout: Some(Duration::from_millis(10)),
        };

        let err = run(&collector, &options).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
