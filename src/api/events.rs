use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::server::AppState;

/// Stream render outcomes
///
/// Each finished render pass is sent as a `render` event with the JSON
/// outcome as data. Slow clients that fall behind receive a `lagged` event
/// and should re-fetch the preview.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Server-sent event stream of `render` events"),
    ),
    tag = "Preview"
)]
pub async fn handle_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.session.subscribe();

    let stream = BroadcastStream::new(rx).map(|result| match result {
        Ok(event) => Ok(Event::default()
            .event("render")
            .data(serde_json::to_string(&event).unwrap_or_default())),
        Err(_) => Ok(Event::default().event("lagged").data("lagged")),
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
