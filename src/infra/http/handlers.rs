use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use spurgo_api_types::{
    ConfirmRequest, EdgeSettingsUpdateRequest, EdgeSettingsView, HistoryEntry, HistoryPage,
    PurgeSubmittedResponse, PurgeUrlRequest, StatusTransitionRequest,
};
use tracing::info;

use crate::application::settings::EdgeSettingsUpdate;
use crate::domain::content::{ContentKind, ContentRef, ContentStatus};
use crate::domain::history::HistoryRecord;
use crate::domain::purge::{PurgeKind, PurgeReceipt};
use crate::domain::settings::EdgeSettingsRecord;

use super::AdminState;
use super::error::ApiError;

pub(super) async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Lifecycle webhook. Always answers 202: the dispatch outcome must never
/// leak back into the platform's save operation.
pub(super) async fn content_status(
    State(state): State<AdminState>,
    Json(event): Json<StatusTransitionRequest>,
) -> StatusCode {
    let new_status = ContentStatus::parse(&event.new_status);
    let old_status = ContentStatus::parse(&event.old_status);
    let content = ContentRef {
        id: event.content.id,
        kind: ContentKind::parse(&event.content.kind),
        permalink: event.content.permalink,
    };

    state
        .dispatcher
        .on_status_transition(new_status, old_status, &content)
        .await;

    StatusCode::ACCEPTED
}

pub(super) async fn purge_url(
    State(state): State<AdminState>,
    Json(request): Json<PurgeUrlRequest>,
) -> Result<Json<PurgeSubmittedResponse>, ApiError> {
    let receipt = state.dispatcher.purge_url(&request.url).await?;
    Ok(Json(submitted(PurgeKind::Url, request.url, receipt)))
}

pub(super) async fn purge_all(
    State(state): State<AdminState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<PurgeSubmittedResponse>, ApiError> {
    if !request.confirm {
        return Err(ApiError::confirmation_required("a site-wide purge"));
    }
    let receipt = state.dispatcher.purge_all().await?;
    Ok(Json(submitted(PurgeKind::All, "all".to_string(), receipt)))
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    limit: Option<usize>,
}

pub(super) async fn history_list(
    State(state): State<AdminState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, ApiError> {
    let records = state.history.recent(query.limit).await?;
    Ok(Json(HistoryPage {
        entries: records.into_iter().map(history_entry).collect(),
    }))
}

pub(super) async fn history_clear(
    State(state): State<AdminState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<StatusCode, ApiError> {
    if !request.confirm {
        return Err(ApiError::confirmation_required("clearing the purge history"));
    }
    state.history.clear().await?;
    info!(target = "spurgo::admin", "purge history cleared");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn settings_show(
    State(state): State<AdminState>,
) -> Result<Json<EdgeSettingsView>, ApiError> {
    let record = state.settings.load().await?;
    Ok(Json(settings_view(record)))
}

pub(super) async fn settings_update(
    State(state): State<AdminState>,
    Json(update): Json<EdgeSettingsUpdateRequest>,
) -> Result<Json<EdgeSettingsView>, ApiError> {
    let record = state
        .settings
        .update(EdgeSettingsUpdate {
            secret_id: update.secret_id,
            secret_key: update.secret_key,
            zone_id: update.zone_id,
            default_host: update.default_host,
        })
        .await?;
    Ok(Json(settings_view(record)))
}

fn submitted(kind: PurgeKind, target: String, receipt: PurgeReceipt) -> PurgeSubmittedResponse {
    PurgeSubmittedResponse {
        kind: kind.as_str().to_string(),
        target,
        request_id: receipt.request_id,
        task_id: receipt.task_id,
        message: "purge task submitted".to_string(),
    }
}

fn history_entry(record: HistoryRecord) -> HistoryEntry {
    HistoryEntry {
        id: record.id,
        kind: record.kind.as_str().to_string(),
        target: record.target,
        success: record.success,
        message: record.message,
        created_at: record.created_at,
    }
}

fn settings_view(record: EdgeSettingsRecord) -> EdgeSettingsView {
    EdgeSettingsView {
        secret_id: record.secret_id,
        secret_key_set: !record.secret_key.trim().is_empty(),
        zone_id: record.zone_id,
        default_host: record.default_host,
    }
}
