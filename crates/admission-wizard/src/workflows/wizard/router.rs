use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::controller::{Outcome, WizardController, WizardEvent};
use super::error::WizardError;
use super::presenter::Presenter;
use super::snapshot::WizardSnapshot;
use super::timeline::Clock;

/// The single wizard session served by one process.
pub type SharedWizard<C, P> = Arc<Mutex<WizardController<C, P>>>;

#[derive(Debug, Serialize)]
pub(crate) struct EventResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<ErrorBody>,
    pub(crate) snapshot: WizardSnapshot,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) code: &'static str,
    pub(crate) message: String,
    pub(crate) user_message: String,
}

impl From<&WizardError> for ErrorBody {
    fn from(err: &WizardError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            user_message: err.user_message(),
        }
    }
}

/// Router builder exposing the wizard's snapshot and event endpoints.
pub fn wizard_router<C, P>(wizard: SharedWizard<C, P>) -> Router
where
    C: Clock + 'static,
    P: Presenter + 'static,
{
    Router::new()
        .route("/api/v1/wizard", get(snapshot_handler::<C, P>))
        .route("/api/v1/wizard/events", post(event_handler::<C, P>))
        .with_state(wizard)
}

fn lock<C, P>(wizard: &SharedWizard<C, P>) -> MutexGuard<'_, WizardController<C, P>> {
    wizard.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) async fn snapshot_handler<C, P>(
    State(wizard): State<SharedWizard<C, P>>,
) -> Json<WizardSnapshot>
where
    C: Clock + 'static,
    P: Presenter + 'static,
{
    let mut controller = lock(&wizard);
    controller.tick();
    Json(WizardSnapshot::capture(&controller))
}

pub(crate) async fn event_handler<C, P>(
    State(wizard): State<SharedWizard<C, P>>,
    Json(event): Json<WizardEvent>,
) -> Response
where
    C: Clock + 'static,
    P: Presenter + 'static,
{
    let mut controller = lock(&wizard);
    controller.tick();
    let result = controller.handle(event);
    controller.tick();
    let snapshot = WizardSnapshot::capture(&controller);
    drop(controller);

    match result {
        Ok(outcome) => {
            let status = match outcome {
                Outcome::Pending { .. } => StatusCode::ACCEPTED,
                Outcome::Ignored { .. } => StatusCode::CONFLICT,
                _ => StatusCode::OK,
            };
            let body = EventResponse {
                outcome: Some(outcome),
                error: None,
                snapshot,
            };
            (status, Json(body)).into_response()
        }
        Err(err) => {
            let body = EventResponse {
                outcome: None,
                error: Some(ErrorBody::from(&err)),
                snapshot,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    }
}
