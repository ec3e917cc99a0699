use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Abstraction for filesystem access to enable testing without real files
pub trait FilesystemReader: Send + Sync {
    /// Open a file for buffered line reading; the handle is closed on drop
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>>;
    /// Immediate children of a directory, sorted by path
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem reader using std::fs
pub struct RealFilesystemReader;

impl FilesystemReader for RealFilesystemReader {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory filesystem holding file contents by absolute path
#[derive(Debug, Default, Clone)]
pub struct MemoryFilesystemReader {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFilesystemReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    /// Canned kstat tree rooted at `kstat_dir`, used by demo mode
    pub fn demo(kstat_dir: &Path) -> Self {
        crate::demo::DEMO_KSTAT_FILES
            .iter()
            .fold(Self::new(), |fs, (relative, contents)| {
                fs.with_file(kstat_dir.join(relative), contents)
            })
    }
}

impl FilesystemReader for MemoryFilesystemReader {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        match self.files.get(path) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone().into_bytes()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Demo: File not mocked: {}", path.display()),
            )),
        }
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let children: BTreeSet<PathBuf> = self
            .files
            .keys()
            .filter_map(|file| file.strip_prefix(path).ok())
            .filter_map(|relative| relative.components().next())
            .map(|first| path.join(first))
            .collect();

        if children.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Demo: Directory not mocked: {}", path.display()),
            ));
        }
        Ok(children.into_iter().collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.keys().any(|file| file.starts_with(path))
    }
}
