//! Descriptor persistence under `machines/<name>/config.json`.
//!
//! Writes go straight to the final path: there is no temp-file-and-rename and
//! no locking, so a crash mid-write can leave a truncated descriptor behind.
//! Re-running the provisioner rewrites it.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::descriptor::HostDescriptor;
use crate::error::{HostcertError, Result};
use crate::files;
use crate::layout::{OutputLayout, DESCRIPTOR_FILE};

/// Reads and writes host descriptors below an output root.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    layout: OutputLayout,
}

impl DescriptorStore {
    /// Store rooted at `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: OutputLayout::new(output_root),
        }
    }

    /// Descriptor path for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.layout.machine_file(name, DESCRIPTOR_FILE)
    }

    /// Whether a descriptor exists for `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Serialize `host` and overwrite its `config.json`.
    pub fn save(&self, host: &HostDescriptor) -> Result<PathBuf> {
        if host.name.is_empty() {
            return Err(HostcertError::validation("descriptor has no machine name"));
        }

        let json = to_docker_json(host)?;
        files::ensure_dir(&self.layout.machine_dir(&host.name))?;
        let path = self.path_for(&host.name);
        files::write_public(&path, &json)?;

        info!(path = %path.display(), machine = %host.name, "host descriptor saved");
        Ok(path)
    }

    /// Load the descriptor saved for `name`.
    pub fn load(&self, name: &str) -> Result<HostDescriptor> {
        let path = self.path_for(name);
        let bytes = fs::read(&path).map_err(|e| HostcertError::io(&path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Four-space indented JSON, the way docker-machine writes its store.
fn to_docker_json(host: &HostDescriptor) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    host.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let store = DescriptorStore::new("/out");
        assert_eq!(store.path_for("node1"), PathBuf::from("/out/machines/node1/config.json"));
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DescriptorStore::new(dir.path());
        assert!(!store.exists("ghost"));
        assert_eq!(store.load("ghost").unwrap_err().kind(), crate::ErrorKind::Io);
    }

    #[test]
    fn test_load_corrupt_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DescriptorStore::new(dir.path());
        let path = store.path_for("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"ConfigVersion\": 3, \"Na").unwrap();

        assert_eq!(store.load("broken").unwrap_err().kind(), crate::ErrorKind::Serialization);
    }
}
