//! Shared emergency-pause status.
//!
//! One value spans every component: state-changing entry points check it
//! first and fail while paused; views stay readable.

use serde::{Deserialize, Serialize};

/// Operational status of the whole system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    /// Normal operation.
    #[default]
    Active,
    /// Emergency pause: all state-changing operations are rejected.
    Paused,
}

impl SystemStatus {
    /// Whether the system is paused.
    pub fn is_paused(self) -> bool {
        matches!(self, SystemStatus::Paused)
    }
}
