//! Background key rotation service
//!
//! Rotation is time-driven, not request-driven: a single task rotates the
//! signing key set on a fixed period. One tick fully completes, including
//! retirement and purge, before the next becomes eligible.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::errors::DomainError;

use super::key_store::{RotationSummary, SigningKeyStore};
use super::settings::JwksSettings;

/// Service driving the signing key lifecycle on a schedule
pub struct KeyRotationService {
    store: Arc<SigningKeyStore>,
    settings: JwksSettings,
}

impl KeyRotationService {
    pub fn new(store: Arc<SigningKeyStore>, settings: JwksSettings) -> Self {
        Self { store, settings }
    }

    /// Runs a single rotation tick
    ///
    /// # Returns
    /// * `Ok(RotationSummary)` - What the tick activated, demoted, retired,
    ///   and purged
    /// * `Err(DomainError)` - Rotation failed; the previous key set stays in
    ///   effect
    pub fn run_rotation(&self) -> Result<RotationSummary, DomainError> {
        let summary = self.store.rotate()?;
        info!(
            activated = %summary.activated,
            demoted = ?summary.demoted,
            retired = summary.retired.len(),
            purged = summary.purged.len(),
            "signing key rotation completed"
        );
        Ok(summary)
    }

    /// Spawns the rotation loop as a background task.
    ///
    /// The returned handle can be aborted on shutdown. The first rotation
    /// happens one full period after startup; the store already holds an
    /// active key from construction.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = match self.settings.key_rotation_period.to_std() {
                Ok(period) => period,
                Err(_) => {
                    error!(
                        period = %self.settings.key_rotation_period,
                        "invalid key rotation period, rotation disabled"
                    );
                    return;
                }
            };

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; skip it
            interval.tick().await;

            loop {
                interval.tick().await;
                if let Err(e) = self.run_rotation() {
                    error!("signing key rotation failed: {}", e);
                }
            }
        })
    }
}
