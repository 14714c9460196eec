//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup; each task is detached with
//! `tokio::spawn` and runs on its own schedule.

use crate::config::SweepConfig;
use crate::services::TrialExpiryService;
use chrono::Utc;

/// Spawn all background tasks.
pub fn spawn_all(sweep: &SweepConfig, trial_expiry_service: TrialExpiryService) {
    if !sweep.enabled {
        log::info!("Trial expiry sweep disabled");
        return;
    }

    let interval = std::time::Duration::from_secs(sweep.interval_secs.max(1));
    tokio::spawn(async move {
        loop {
            match trial_expiry_service.expire_trial_cards(Utc::now()).await {
                Ok(n) if n > 0 => log::info!("Trial expiry sweep hid {n} card(s)"),
                Ok(_) => log::debug!("Trial expiry sweep found nothing to hide"),
                Err(e) => log::error!("Trial expiry sweep failed: {e:?}"),
            }
            tokio::time::sleep(interval).await;
        }
    });
}
