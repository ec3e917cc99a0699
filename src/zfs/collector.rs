use super::error::{ZfsError, ZfsResult};
use super::kstat_json::parse_kstat_output;
use super::kstat_table::parse_kstat_table;
use super::naming::{Measurement, MetricNamer};
use super::pool_io::parse_pool_io;
use super::types::Subsystem;
use crate::config::CollectorConfig;
use crate::sink::MetricSink;
use crate::system::commands::{DemoCommandExecutor, RealCommandExecutor};
use crate::system::filesystem::{MemoryFilesystemReader, RealFilesystemReader};
use crate::system::{CommandExecutor, FilesystemReader, Platform};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Instrument, debug, debug_span};

/// A way of reading ZFS kstats on one kind of host
#[async_trait]
pub trait StatsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run one read-parse-emit pass, stopping at the first hard error
    async fn collect(&self, sink: &mut dyn MetricSink) -> ZfsResult<()>;
}

/// Reads the text kstat tables exposed by ZFS on Linux.
///
/// Subsystem files appear as ZFS gains features, so a missing one is skipped.
/// Pool `io` files are enumerated first, so one that cannot be opened fails
/// the pass, including when the pool is exported between listing and opening.
pub struct ProcKstatSource<F: FilesystemReader> {
    filesystem: F,
    kstat_dir: PathBuf,
    pool_io_file: String,
    subsystems: Vec<Subsystem>,
    namer: MetricNamer,
}

impl<F: FilesystemReader> ProcKstatSource<F> {
    pub fn new(filesystem: F, config: &CollectorConfig) -> Self {
        Self {
            filesystem,
            kstat_dir: config.kstat_dir(),
            pool_io_file: config.pool_io_file.clone(),
            subsystems: config.subsystems.clone(),
            namer: MetricNamer::new(&config.namespace),
        }
    }

    fn update_subsystem(&self, subsystem: &Subsystem, sink: &mut dyn MetricSink) -> ZfsResult<()> {
        let path = self.kstat_dir.join(&subsystem.source);
        let reader = self
            .filesystem
            .open(&path)
            .map_err(|e| ZfsError::source_unavailable(&path.to_string_lossy(), e))?;

        parse_kstat_table(reader, &subsystem.source, |record| {
            sink.emit(self.namer.subsystem_metric(&subsystem.name, &record))
        })
    }

    /// Equivalent of globbing `<kstat_dir>/*/io`, sorted by path
    pub fn pool_sources(&self) -> Vec<PathBuf> {
        match self.filesystem.list_dir(&self.kstat_dir) {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| entry.join(&self.pool_io_file))
                .filter(|path| self.filesystem.exists(path))
                .collect(),
            Err(e) => {
                debug!("Cannot list {:?}: {}", self.kstat_dir, e);
                Vec::new()
            }
        }
    }

    fn update_pool(&self, path: &Path, sink: &mut dyn MetricSink) -> ZfsResult<()> {
        let path_name = path.to_string_lossy();
        let reader = self.filesystem.open(path).map_err(|e| {
            debug!("Cannot open {:?} for reading", path_name);
            ZfsError::source_unavailable(&path_name, e)
        })?;

        parse_pool_io(reader, &path_name, |pool, record| {
            sink.emit(self.namer.pool_metric(pool, &record))
        })
    }
}

#[async_trait]
impl<F: FilesystemReader> StatsSource for ProcKstatSource<F> {
    fn name(&self) -> &'static str {
        "procfs"
    }

    async fn collect(&self, sink: &mut dyn MetricSink) -> ZfsResult<()> {
        for subsystem in &self.subsystems {
            match self.update_subsystem(subsystem, sink) {
                Err(e) if e.is_soft() => {
                    debug!("Skipping {}: {}", subsystem.name, e);
                    continue;
                }
                result => result?,
            }
        }

        for path in self.pool_sources() {
            self.update_pool(&path, sink)?;
        }
        Ok(())
    }
}

/// Runs `kstat -j` once per pass, as on Solaris and illumos
pub struct KstatCommandSource<E: CommandExecutor> {
    executor: E,
    command: String,
    args: Vec<String>,
    namer: MetricNamer,
}

impl<E: CommandExecutor> KstatCommandSource<E> {
    pub fn new(executor: E, config: &CollectorConfig) -> Self {
        Self {
            executor,
            command: config.kstat_command.clone(),
            args: config.kstat_args.clone(),
            namer: MetricNamer::new(&config.namespace),
        }
    }
}

#[async_trait]
impl<E: CommandExecutor> StatsSource for KstatCommandSource<E> {
    fn name(&self) -> &'static str {
        "kstat"
    }

    async fn collect(&self, sink: &mut dyn MetricSink) -> ZfsResult<()> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let output = self
            .executor
            .execute(&self.command, &args)
            .await
            .map_err(|e| ZfsError::source_invocation(&self.command, &args, &e.to_string()))?;

        parse_kstat_output(output.as_bytes(), &self.namer, sink)
    }
}

/// Pick the source for `platform`, backed by the host or by canned demo data
pub fn build_source(
    platform: Platform,
    config: &CollectorConfig,
    demo: bool,
) -> Box<dyn StatsSource> {
    match (platform, demo) {
        (Platform::Linux, false) => Box::new(ProcKstatSource::new(RealFilesystemReader, config)),
        (Platform::Linux, true) => Box::new(ProcKstatSource::new(
            MemoryFilesystemReader::demo(&config.kstat_dir()),
            config,
        )),
        (Platform::Solaris, false) => {
            Box::new(KstatCommandSource::new(RealCommandExecutor, config))
        }
        (Platform::Solaris, true) => Box::new(KstatCommandSource::new(DemoCommandExecutor, config)),
    }
}

struct CountingSink<'a> {
    inner: &'a mut dyn MetricSink,
    count: usize,
}

impl MetricSink for CountingSink<'_> {
    fn emit(&mut self, measurement: Measurement) -> ZfsResult<()> {
        self.inner.emit(measurement)?;
        self.count += 1;
        Ok(())
    }
}

/// Runs collection passes against one statistics source
pub struct ZfsCollector {
    source: Box<dyn StatsSource>,
}

impl ZfsCollector {
    pub fn new(source: Box<dyn StatsSource>) -> Self {
        Self { source }
    }

    pub fn for_platform(platform: Platform, config: &CollectorConfig, demo: bool) -> Self {
        Self::new(build_source(platform, config, demo))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Run exactly one pass, returning how many measurements reached `sink`
    pub async fn update(&self, sink: &mut dyn MetricSink) -> ZfsResult<usize> {
        let started = Instant::now();
        let mut counter = CountingSink { inner: sink, count: 0 };

        self.source
            .collect(&mut counter)
            .instrument(debug_span!("zfs_pass", source = self.source.name()))
            .await?;

        debug!(
            "Collected {} measurements in {:?}",
            counter.count,
            started.elapsed()
        );
        Ok(counter.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MeasurementBuffer;
    use crate::system::commands::CommandResult;

    const KSTAT_DIR: &str = "/proc/spl/kstat/zfs";

    const POOL_IO: &str = "\
nread nwritten reads writes wtime wlentime wupdate rtime rlentime rupdate wcnt rcnt
1 2 3 4 5 6 7 8 9 10 11 12
";

    fn config() -> CollectorConfig {
        CollectorConfig::default()
    }

    fn source(fs: MemoryFilesystemReader) -> ProcKstatSource<MemoryFilesystemReader> {
        ProcKstatSource::new(fs, &config())
    }

    fn kstat(name: &str) -> String {
        format!("{}/{}", KSTAT_DIR, name)
    }

    #[tokio::test]
    async fn test_missing_subsystems_are_skipped() {
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("arcstats"), "name type data\nhits 4 42\nmisses 0 3\n");
        let mut sink = MeasurementBuffer::new();

        source(fs).collect(&mut sink).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.measurements()[0].name(), "node_zfs_arc_hits");
        assert_eq!(sink.measurements()[0].help, "kstat.zfs.misc.arcstats.hits");
        assert_eq!(sink.measurements()[0].value, 42.0);
    }

    #[tokio::test]
    async fn test_no_sources_at_all_succeeds() {
        let mut sink = MeasurementBuffer::new();
        source(MemoryFilesystemReader::new())
            .collect(&mut sink)
            .await
            .unwrap();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_subsystem_fails_pass() {
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("arcstats"), "hits 4 42\n")
            .with_file(kstat("zil"), "name type data\nzil_commit_count 4 1\n");
        let mut sink = MeasurementBuffer::new();

        let result = source(fs).collect(&mut sink).await;

        assert!(matches!(result, Err(ZfsError::MalformedHeader { .. })));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_subsystems_then_pools_in_order() {
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("zil"), "name type data\nzil_commit_count 4 1\n")
            .with_file(kstat("arcstats"), "name type data\nhits 4 2\n")
            .with_file(kstat("tank/io"), POOL_IO)
            .with_file(kstat("backup/io"), POOL_IO)
            .with_file(kstat("tank/txgs"), "txg birth state\n");
        let mut sink = MeasurementBuffer::new();

        source(fs).collect(&mut sink).await.unwrap();

        let measurements = sink.measurements();
        assert_eq!(measurements.len(), 2 + 24);
        assert_eq!(measurements[0].name(), "node_zfs_arc_hits");
        assert_eq!(measurements[1].name(), "node_zfs_zil_zil_commit_count");
        assert_eq!(measurements[2].name(), "node_zfs_zpool_nread");
        assert_eq!(
            measurements[2].label().map(|l| l.value.as_str()),
            Some("backup")
        );
        assert_eq!(
            measurements[14].label().map(|l| l.value.as_str()),
            Some("tank")
        );
    }

    #[test]
    fn test_pool_sources_glob() {
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("arcstats"), "")
            .with_file(kstat("tank/io"), "")
            .with_file(kstat("tank/objset-0x36"), "")
            .with_file(kstat("empty/txgs"), "");

        assert_eq!(
            source(fs).pool_sources(),
            vec![PathBuf::from(kstat("tank/io"))]
        );
    }

    /// Lists pools that can no longer be opened, like a pool exported mid-pass
    struct VanishingPool;

    impl FilesystemReader for VanishingPool {
        fn open(&self, path: &Path) -> std::io::Result<Box<dyn std::io::BufRead + Send>> {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            ))
        }

        fn list_dir(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
            Ok(vec![path.join("tank")])
        }

        fn exists(&self, _path: &Path) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_unreadable_pool_fails_pass() {
        let source = ProcKstatSource::new(VanishingPool, &config());
        let mut sink = MeasurementBuffer::new();

        let result = source.collect(&mut sink).await;

        if let Err(ZfsError::SourceUnavailable { path, .. }) = result {
            assert_eq!(path, kstat("tank/io"));
        } else {
            panic!("Expected SourceUnavailable error");
        }
    }

    #[tokio::test]
    async fn test_pool_decode_error_keeps_partial_emission() {
        let bad = "\
nread nwritten reads writes wtime wlentime wupdate rtime rlentime rupdate wcnt rcnt
1 2 x 4 5 6 7 8 9 10 11 12
";
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("alpha/io"), bad)
            .with_file(kstat("beta/io"), POOL_IO);
        let mut sink = MeasurementBuffer::new();

        let result = source(fs).collect(&mut sink).await;

        assert!(matches!(result, Err(ZfsError::ValueDecode { .. })));
        assert_eq!(sink.len(), 2);
        assert!(
            sink.measurements()
                .iter()
                .all(|m| m.label().map(|l| l.value.as_str()) == Some("alpha"))
        );
    }

    struct FixedOutput(&'static str);

    #[async_trait]
    impl CommandExecutor for FixedOutput {
        async fn execute(&self, _command: &str, _args: &[&str]) -> CommandResult {
            Ok(self.0.to_string())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl CommandExecutor for FailingCommand {
        async fn execute(&self, command: &str, _args: &[&str]) -> CommandResult {
            Err(format!("{}: exit status 1", command).into())
        }
    }

    #[tokio::test]
    async fn test_kstat_command_source() {
        let source = KstatCommandSource::new(
            FixedOutput(r#"[{"name":"tank","class":"disk","data":{"nread":100}}]"#),
            &config(),
        );
        let mut sink = MeasurementBuffer::new();

        source.collect(&mut sink).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.measurements()[0].name(), "node_zfs_zpool_nread");
        assert_eq!(sink.measurements()[0].value, 100.0);
    }

    #[tokio::test]
    async fn test_kstat_command_failure() {
        let source = KstatCommandSource::new(FailingCommand, &config());
        let mut sink = MeasurementBuffer::new();

        let result = source.collect(&mut sink).await;

        if let Err(ZfsError::SourceInvocation { command, args, reason }) = result {
            assert_eq!(command, "kstat");
            assert_eq!(args, vec!["-j", "/zfs|zone_zfs/:::"]);
            assert!(reason.contains("exit status 1"));
        } else {
            panic!("Expected SourceInvocation error");
        }
    }

    #[tokio::test]
    async fn test_kstat_command_garbage_output() {
        let source = KstatCommandSource::new(FixedOutput("not json"), &config());
        let mut sink = MeasurementBuffer::new();

        let result = source.collect(&mut sink).await;
        assert!(matches!(result, Err(ZfsError::OutputDecode { .. })));
    }

    #[tokio::test]
    async fn test_collector_counts_measurements() {
        let fs = MemoryFilesystemReader::new()
            .with_file(kstat("arcstats"), "name type data\nhits 4 1\nmisses 4 2\n");
        let collector = ZfsCollector::new(Box::new(source(fs)));
        let mut sink = MeasurementBuffer::new();

        assert_eq!(collector.source_name(), "procfs");
        assert_eq!(collector.update(&mut sink).await.unwrap(), 2);
        assert_eq!(sink.len(), 2);
    }
}
