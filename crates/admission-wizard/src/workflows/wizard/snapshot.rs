use serde::Serialize;

use super::controller::WizardController;
use super::domain::{AlertSeverity, SearchQuery, StudentRecord, UploadedFile, WizardView};
use super::notifications::AlertId;
use super::presenter::Presenter;
use super::sections::SectionState;
use super::timeline::Clock;

/// Serializable view of the wizard for HTTP clients and the demo output.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub view: WizardView,
    pub sections: Vec<SectionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StudentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<UploadedFile>,
    pub submission_enabled: bool,
    pub busy: bool,
    pub chrome_visible: bool,
    pub confetti_active: bool,
    pub alerts: Vec<AlertView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    pub id: AlertId,
    pub message: String,
    pub severity: AlertSeverity,
    pub expires_in_ms: u64,
}

impl WizardSnapshot {
    pub fn capture<C, P>(controller: &WizardController<C, P>) -> Self
    where
        C: Clock,
        P: Presenter,
    {
        let now = controller.now();
        let alerts = controller
            .alerts()
            .iter()
            .map(|alert| AlertView {
                id: alert.id,
                message: alert.message.clone(),
                severity: alert.severity,
                expires_in_ms: alert.expires_at.saturating_sub(now).as_millis() as u64,
            })
            .collect();

        Self {
            view: controller.view(),
            sections: controller.sections().to_vec(),
            query: controller.query().cloned(),
            record: controller.record().cloned(),
            attachment: controller.attachment().cloned(),
            submission_enabled: controller.submission_unlocked(),
            busy: controller.is_busy(),
            chrome_visible: controller.chrome_visible(),
            confetti_active: !controller.active_confetti().is_empty(),
            alerts,
        }
    }
}
