use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::domain::AlertSeverity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub u64);

/// A dismissible banner. `expires_at` is measured on the wizard clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub message: String,
    pub severity: AlertSeverity,
    pub expires_at: Duration,
}

/// Banner stack plus the modal loading overlay.
///
/// The overlay is a counter rather than a flag: showing it twice stacks two
/// overlays and each hide removes one. Hiding with nothing shown is a no-op.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    alerts: Vec<Alert>,
    next_alert: u64,
    overlays: usize,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        message: impl Into<String>,
        severity: AlertSeverity,
        expires_at: Duration,
    ) -> &Alert {
        self.next_alert += 1;
        let alert = Alert {
            id: AlertId(self.next_alert),
            message: message.into(),
            severity,
            expires_at,
        };
        self.alerts.push(alert);
        &self.alerts[self.alerts.len() - 1]
    }

    /// Remove a banner. Returns `None` when it was already dismissed or expired.
    pub fn dismiss(&mut self, id: AlertId) -> Option<Alert> {
        let index = self.alerts.iter().position(|alert| alert.id == id)?;
        Some(self.alerts.remove(index))
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn show_loading(&mut self) {
        self.overlays += 1;
    }

    /// Returns whether an overlay was actually removed.
    pub fn hide_loading(&mut self) -> bool {
        if self.overlays == 0 {
            return false;
        }
        self.overlays -= 1;
        true
    }

    pub fn is_busy(&self) -> bool {
        self.overlays > 0
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays
    }
}
