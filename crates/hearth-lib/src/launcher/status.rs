/// Publishing the resolved manifest path for other tools to pick up
use std::path::{Path, PathBuf};

/// Receives the absolute path of the manifest that is about to be launched.
///
/// Publishing is best effort: implementations log their own failures and must
/// never stop the launch.
pub trait StatusSink {
    fn publish(&self, manifest_path: &Path);
}

/// Writes the manifest path, without a trailing newline, to a file
#[derive(Debug, Clone)]
pub struct FileStatusSink {
    file: PathBuf,
}

impl FileStatusSink {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    fn write(&self, manifest_path: &Path) -> std::io::Result<()> {
        if let Some(parent) = self.file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.file, manifest_path.to_string_lossy().as_bytes())
    }
}

impl StatusSink for FileStatusSink {
    fn publish(&self, manifest_path: &Path) {
        match self.write(manifest_path) {
            Ok(()) => log::debug!("Wrote {:?} to {:?}", manifest_path, self.file),
            Err(e) => log::warn!("Failed to write status file {:?}: {}", self.file, e),
        }
    }
}

/// Discards the path
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
    fn publish(&self, _manifest_path: &Path) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_path() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FileStatusSink::new(tmp.path().join("libraries").join("version.txt"));
        let manifest = tmp.path().join("unix_args.txt");

        sink.publish(&manifest);

        let written = std::fs::read_to_string(sink.file()).unwrap();
        assert_eq!(written, manifest.to_string_lossy());
    }

    #[test]
    fn file_sink_failure_is_swallowed() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail
        let target = tmp.path().join("version.txt");
        std::fs::create_dir_all(&target).unwrap();

        FileStatusSink::new(&target).publish(Path::new("/srv/unix_args.txt"));
        assert!(target.is_dir());
    }
}
