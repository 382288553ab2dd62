use crate::core::hospital::Hospital;
use crate::domain::ports::SnapshotStore;
use crate::utils::error::{HospitalError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_MAGIC: &[u8; 8] = b"WRDRND01";

/// Stores the hospital graph in a single binary file.
///
/// Layout: 8-byte magic followed by the bincode encoding of [`Hospital`].
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: impl Into<String>) -> HospitalError {
        HospitalError::SnapshotCorrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn write_temp(&self, temp: &Path, hospital: &Hospital) -> std::io::Result<()> {
        if let Some(parent) = temp.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(temp)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(SNAPSHOT_MAGIC)?;
        bincode::serialize_into(&mut writer, hospital)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn write(&self, hospital: &Hospital) -> Result<()> {
        let temp = self.temp_path();
        let written = self
            .write_temp(&temp, hospital)
            .and_then(|_| fs::rename(&temp, &self.path));

        if let Err(source) = written {
            let _ = fs::remove_file(&temp);
            return Err(HospitalError::SnapshotWrite {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }

    fn read(&self) -> Result<Hospital> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HospitalError::SnapshotMissing {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(self.corrupt(e.to_string())),
        };
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        reader
            .read_exact(&mut magic)
            .map_err(|_| self.corrupt("file is too short"))?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(self.corrupt("invalid snapshot magic"));
        }

        let hospital: Hospital = bincode::deserialize_from(&mut reader)
            .map_err(|e| self.corrupt(format!("cannot decode snapshot: {}", e)))?;
        hospital
            .check_invariants()
            .map_err(|e| self.corrupt(e.to_string()))?;
        Ok(hospital)
    }
}
