use crate::core::hospital::Hospital;
use crate::utils::error::Result;

/// Whole-graph persistence for the hospital.
///
/// `write` replaces any previous snapshot in one step; `read` returns the
/// graph exactly as written, or an error the caller treats as "no snapshot".
pub trait SnapshotStore: Send + Sync {
    fn write(&self, hospital: &Hospital) -> Result<()>;
    fn read(&self) -> Result<Hospital>;
}
