//! History API handlers: owner-scoped listing and the live change feed

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{future, Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use adalchemy_auth::AuthUser;
use adalchemy_common::Result;

use super::generations::HistoryEntryResponse;
use crate::api::middleware::GenerationsState;

/// Query parameters for listing history
#[derive(Debug, Deserialize)]
pub struct ListHistoryParams {
    pub limit: Option<i64>,
}

/// List the caller's recent generation history, newest first
pub async fn list_history(
    AuthUser(principal): AuthUser,
    State(state): State<GenerationsState>,
    Query(params): Query<ListHistoryParams>,
) -> Result<Json<Vec<HistoryEntryResponse>>> {
    let entries = state
        .workflow
        .list_recent(&principal.uid, params.limit)
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Server-sent events feed of the caller's history changes.
///
/// Each successfully saved generation produces one `history.changed`
/// event; signals for other users are filtered out. Lagged receivers
/// silently skip missed signals, which is acceptable because clients
/// re-fetch the full list on every event.
pub async fn history_events(
    AuthUser(principal): AuthUser,
    State(state): State<GenerationsState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let uid = principal.uid;
    let receiver = state.notifier.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(move |message| {
        let event = match message {
            Ok(m) if m.user_id == uid => Event::default()
                .event("history.changed")
                .json_data(&m)
                .ok()
                .map(Ok),
            _ => None,
        };
        future::ready(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
