//! At most one live facade per process

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{BootstrapUiError, Result};

static LIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide facade slot, released on drop
#[derive(Debug)]
pub(crate) struct InstanceSlot(());

impl InstanceSlot {
    /// Claim the slot
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapUiError::SingletonViolation`] while another claim is alive.
    pub(crate) fn claim() -> Result<Self> {
        LIVE.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(()))
            .map_err(|_| BootstrapUiError::SingletonViolation)
    }

    /// Whether a claim is currently alive
    pub(crate) fn is_claimed() -> bool {
        LIVE.load(Ordering::Acquire)
    }
}

impl Drop for InstanceSlot {
    fn drop(&mut self) {
        LIVE.store(false, Ordering::Release);
    }
}
