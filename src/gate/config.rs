//! Process-wide gate settings.

use std::sync::atomic::{AtomicBool, Ordering};

/// Reply sent to valid invocations while maintenance mode is on.
pub const MAINTENANCE_NOTICE: &str = "Bot is in maintenance. Please try again later.";

/// Owners and the maintenance switch.
#[derive(Debug, Default)]
pub struct GateConfig {
    owner_ids: Vec<u64>,
    maintenance: AtomicBool,
}

impl GateConfig {
    pub fn new(owner_ids: Vec<u64>, maintenance: bool) -> Self {
        Self {
            owner_ids,
            maintenance: AtomicBool::new(maintenance),
        }
    }

    #[inline]
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }

    pub fn owner_ids(&self) -> &[u64] {
        &self.owner_ids
    }

    pub fn maintenance(&self) -> bool {
        self.maintenance.load(Ordering::Relaxed)
    }

    /// Returns the previous value.
    pub fn set_maintenance(&self, on: bool) -> bool {
        self.maintenance.swap(on, Ordering::Relaxed)
    }
}
