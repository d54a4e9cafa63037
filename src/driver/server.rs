use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::calendar::export::Client;
use crate::calendar::{Timezone, TimezonePolicy};
use crate::config::Config;

#[derive(Debug)]
pub struct AppState {
    client: Client,
    timezone: Timezone,
    policy: TimezonePolicy,
    public_url: url::Url,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(
                config.export.base_url.clone(),
                Duration::from_secs(config.export.timeout),
            ),
            timezone: config.export.timezone,
            policy: config.export.timezone_policy,
            public_url: config.server.public_url.clone(),
        }
    }

    fn usage(&self) -> String {
        let url = &self.public_url;

        format!(
            "No valid arguments specified. Usage: {url}?ARGS\n\
             E.g., {url}?school=4&owner=15&showndays=200\n\
             See {}?type=sample for details on valid args.\n",
            self.client.base_url()
        )
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(fix_feed))
        .route("/penncalfixer", get(fix_feed))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn serve(config: &Config, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /?ARGS - the export listing for ARGS with corrected locations
async fn fix_feed(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return plain(StatusCode::OK, state.usage());
    };

    let result = tokio::task::spawn_blocking(move || {
        let urls = state.client.passthrough_urls(&query);
        state.client.get_fixed(&urls, state.timezone, state.policy)
    })
    .await;

    match result {
        Ok(Ok((feed, _report))) => {
            ([(header::CONTENT_TYPE, "text/calendar; charset=utf-8")], feed.to_ical()).into_response()
        }
        Ok(Err(e)) => {
            log::error!("Could not fix feed: {e}");
            plain(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            log::error!("Feed worker failed: {e}");
            plain(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn plain(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
