//! Process-wide access to the hospital.
//!
//! The first call to [`get_hospital`] restores the hospital from its snapshot,
//! or builds it from the setup file and saves it straight away when there is
//! no usable snapshot. Later calls return the same instance until [`reset`].

use crate::adapters::snapshot::FileSnapshotStore;
use crate::config::HospitalConfig;
use crate::core::hospital::Hospital;
use crate::core::loader::load_setup;
use crate::utils::error::{HospitalError, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static HOSPITAL: Mutex<Option<SharedHospital>> = Mutex::new(None);

/// Handle to the process-wide hospital. Clones share one instance.
#[derive(Debug, Clone)]
pub struct SharedHospital {
    hospital: Arc<Mutex<Hospital>>,
    store: Arc<FileSnapshotStore>,
}

impl SharedHospital {
    fn new(hospital: Hospital, store: FileSnapshotStore) -> Self {
        Self {
            hospital: Arc::new(Mutex::new(hospital)),
            store: Arc::new(store),
        }
    }

    /// Serialises access to the hospital; callers on other threads wait here.
    pub fn lock(&self) -> MutexGuard<'_, Hospital> {
        self.hospital.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the current state to the snapshot file.
    pub fn save(&self) -> Result<()> {
        self.lock().save_to(self.store.as_ref())
    }

    pub fn same_instance(&self, other: &SharedHospital) -> bool {
        Arc::ptr_eq(&self.hospital, &other.hospital)
    }

    pub fn snapshot_path(&self) -> &Path {
        self.store.path()
    }
}

/// Returns the process-wide hospital, creating it on first use from `config`.
///
/// Only the first successful call reads `config`; later calls hand back the
/// existing instance.
pub fn get_hospital(config: &HospitalConfig) -> Result<SharedHospital> {
    let mut slot = HOSPITAL.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = slot.as_ref() {
        return Ok(existing.clone());
    }

    let store = FileSnapshotStore::new(config.snapshot_file.clone());
    let hospital = open_hospital(&store, &config.setup_file)?;
    let shared = SharedHospital::new(hospital, store);
    *slot = Some(shared.clone());
    Ok(shared)
}

/// Drops the process-wide hospital so the next [`get_hospital`] starts afresh.
pub fn reset() {
    HOSPITAL
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

/// Restores from `store`, falling back to the setup file when the snapshot is
/// missing or unusable. A freshly built hospital is saved before returning.
pub fn open_hospital(store: &FileSnapshotStore, setup_file: &Path) -> Result<Hospital> {
    match Hospital::restore_from(store) {
        Ok(hospital) => Ok(hospital),
        Err(e) => {
            match &e {
                HospitalError::SnapshotMissing { .. } => {
                    tracing::info!("{}", e.user_friendly_message());
                }
                _ => tracing::warn!("{}: {}", e.user_friendly_message(), e),
            }
            tracing::info!("Hospital will be initialised to default state");

            let hospital = bootstrap(setup_file);
            hospital.save_to(store)?;
            Ok(hospital)
        }
    }
}

/// Builds a hospital from the setup file. An unreadable file leaves the
/// hospital with whatever was read before the failure.
pub fn bootstrap(setup_file: &Path) -> Hospital {
    let mut hospital = Hospital::new();
    if let Err(e) = load_setup(&mut hospital, setup_file) {
        tracing::error!("❌ {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    }
    hospital
}
