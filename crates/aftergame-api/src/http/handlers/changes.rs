//! Change feed over SSE.
//!
//! GET /api/v1/changes[?table=journal_entries]
//!
//! Streams the caller's row-level changes as `change` events carrying
//! `{ table, kind, user_id, row_id }`. The subscription ends when the client
//! disconnects and the stream is dropped.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;

use aftergame_types::event::ChangeFilter;

use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::ChangesQuery;
use crate::state::AppState;

/// GET /api/v1/changes
pub async fn stream_changes(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ChangesQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut filter = ChangeFilter::for_user(auth.ctx.user_id.clone());
    if let Some(table) = query.table {
        filter = filter.with_table(table);
    }
    let mut subscription = state.feed.subscribe(filter);
    tracing::debug!(user_id = %auth.ctx.user_id, table = ?query.table, "change feed subscribed");

    let stream = async_stream::stream! {
        while let Some(change) = subscription.next().await {
            match Event::default().event("change").json_data(&change) {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!(error = %e, "failed to encode change event"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
