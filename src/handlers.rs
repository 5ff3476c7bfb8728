use crate::client::OfferApi;
use crate::errors::{ApiError, AppError, ValidationError};
use crate::models::{
    ApiResponse, ApplicationState, DashboardView, OfferDraftPatch, OfferInput, OfferSubmission,
    StatisticsSnapshot, View, ViewRequest,
};
use crate::state::AppState;
use crate::stats::build_dashboard;
use crate::ui::{render_dashboard, render_empty_dashboard, render_form};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::warn;

const SUBMIT_FAILED_NOTICE: &str = "Submission failed, please try again.";
const SUBMIT_BUSY_NOTICE: &str = "A submission is already in progress.";
const STATS_FAILED_NOTICE: &str = "Statistics are unavailable right now.";

/// Raw fields posted by the HTML form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageForm {
    #[serde(default)]
    pub offer_count: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub industry: String,
}

impl PageForm {
    fn draft_patch(&self) -> OfferDraftPatch {
        OfferDraftPatch {
            offer_count: self.offer_count.trim().parse::<u32>().ok(),
            salary_range: Some(self.salary_range.trim().to_string()),
            industry: Some(self.industry.trim().to_string()),
        }
    }

    fn into_input(self) -> Result<OfferInput, ValidationError> {
        let raw = self.offer_count.trim();
        let offer_count = raw
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidOfferCount(raw.to_string()))?;
        Ok(OfferInput {
            offer_count,
            salary_range: self.salary_range,
            industry: self.industry,
        })
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.store.snapshot();
    match snapshot.current_view {
        View::Form => Html(render_form(&snapshot, None)),
        View::Dashboard => match snapshot.last_submitted {
            None => Html(render_empty_dashboard()),
            Some(submission) => {
                match load_dashboard(state.api.as_ref(), Some(submission.clone())).await {
                    Ok(view) => Html(render_dashboard(&view, None)),
                    Err(err) => {
                        warn!("rendering dashboard without statistics: {err}");
                        let view = build_dashboard(&StatisticsSnapshot::default(), Some(submission));
                        Html(render_dashboard(&view, Some(STATS_FAILED_NOTICE)))
                    }
                }
            }
        },
    }
}

pub async fn submit_page_form(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Response {
    state.store.update_form_data(form.draft_patch());

    let submission = match form.into_input().and_then(OfferInput::validate) {
        Ok(submission) => submission,
        Err(err) => {
            let status = AppError::from(err.clone()).status;
            return form_with_notice(&state, status, &err.to_string());
        }
    };

    match state.store.submit_form(submission).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => {
            let status = AppError::from(err).status;
            let notice = if status == StatusCode::CONFLICT {
                SUBMIT_BUSY_NOTICE
            } else {
                SUBMIT_FAILED_NOTICE
            };
            form_with_notice(&state, status, notice)
        }
    }
}

pub async fn reset_page(State(state): State<AppState>) -> Redirect {
    state.store.reset_form();
    Redirect::to("/")
}

pub async fn switch_view_page(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Redirect, AppError> {
    let view = view.parse::<View>().map_err(AppError::bad_request)?;
    state.store.set_current_view(view);
    Ok(Redirect::to("/"))
}

pub async fn get_state(State(state): State<AppState>) -> Json<ApplicationState> {
    Json(state.store.snapshot())
}

pub async fn update_draft(
    State(state): State<AppState>,
    Json(patch): Json<OfferDraftPatch>,
) -> Json<ApplicationState> {
    state.store.update_form_data(patch);
    Json(state.store.snapshot())
}

pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<OfferInput>,
) -> Result<Json<ApplicationState>, AppError> {
    let submission = input.validate()?;
    state.store.submit_form(submission).await?;
    Ok(Json(state.store.snapshot()))
}

pub async fn reset(State(state): State<AppState>) -> Json<ApplicationState> {
    state.store.reset_form();
    Json(state.store.snapshot())
}

pub async fn set_view(
    State(state): State<AppState>,
    Json(request): Json<ViewRequest>,
) -> Json<ApplicationState> {
    state.store.set_current_view(request.view);
    Json(state.store.snapshot())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    let submission = state.store.snapshot().last_submitted;
    let view = load_dashboard(state.api.as_ref(), submission).await?;
    Ok(Json(view))
}

pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    Ok(Json(state.api.check_health().await?))
}

/// Fetches a fresh snapshot filtered by the submission's industry and salary
/// range, and reshapes it for display.
pub async fn load_dashboard(
    api: &dyn OfferApi,
    submission: Option<OfferSubmission>,
) -> Result<DashboardView, ApiError> {
    let (industry, salary_range) = match &submission {
        Some(s) => (Some(s.industry.as_str()), Some(s.salary_range.as_str())),
        None => (None, None),
    };
    let response = api.get_stats(industry, salary_range).await?;
    let snapshot = response.data.unwrap_or_default();
    Ok(build_dashboard(&snapshot, submission))
}

fn form_with_notice(state: &AppState, status: StatusCode, notice: &str) -> Response {
    let snapshot = state.store.snapshot();
    (status, Html(render_form(&snapshot, Some(notice)))).into_response()
}
