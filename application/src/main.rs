use std::{io, sync::OnceLock, time};

use application::{Args, Config, Service};
use axum::extract::MatchedPath;
use axum_client_ip::InsecureClientIp;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt_layer(io::stdout, false))
        .with(fmt_layer(io::stderr, true))
        .init();

    _ = start().await;
}

/// Creates a compact log layer writing either [`STDERR_LEVELS`] events or all
/// the other ones, up to the configured [`LOG_LEVEL`].
fn fmt_layer<S, W>(writer: W, stderr: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'s> LookupSpan<'s>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| {
            let level = LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO);
            meta.is_span()
                || (STDERR_LEVELS.contains(meta.level()) == stderr
                    && level >= *meta.level())
        }))
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;
    let cookie = config.cookie();
    let Config {
        service,
        server,
        log,
    } = config;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    if !server.secure_cookies {
        log::warn!(
            "`server.secure_cookies` is disabled, \
             session cookie will be sent over plain HTTP",
        );
    }

    let (service, directory) = service.into_parts().map_err(|e| {
        log::error!("invalid `service` configuration: {e}");
    })?;
    if directory.is_empty() {
        log::warn!("no users configured, nobody can sign in");
    }
    let service = Service::new(service, directory);

    let mut cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([http::header::CONTENT_TYPE]);
    for origin in server.cors.origins {
        cors = cors.allow_origin(
            origin.parse::<http::header::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not current CORS origin: {e}");
            })?,
        );
    }

    let app = application::router(service, cookie).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(|r: &http::Request<_>| {
                tracing::info_span!(
                    "HTTP request",
                    http.client_ip = InsecureClientIp::from(
                        r.headers(),
                        r.extensions()
                    )
                        .map(|ip| ip.0.to_string())
                        .ok(),
                    http.flavor = ?r.version(),
                    http.host = r.uri().host(),
                    http.method = r.method().as_str(),
                    http.route = r
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str),
                    http.scheme = r
                        .uri()
                        .scheme()
                        .map(http::uri::Scheme::as_str),
                    http.target = r
                        .uri()
                        .path_and_query()
                        .map(http::uri::PathAndQuery::as_str),
                    http.user_agent = r
                        .headers()
                        .get("User-Agent")
                        .and_then(|h| h.to_str().ok()),
                    http.status_code = tracing::field::Empty,
                )
            })
            .on_response(
                |r: &http::Response<_>,
                 dur: time::Duration,
                 span: &tracing::Span| {
                    span.record(
                        "http.status_code",
                        tracing::field::display(r.status().as_u16()),
                    );

                    if r.status().is_server_error() {
                        tracing::error!(
                            duration = format!("{}ms", dur.as_millis()),
                        );
                    } else {
                        tracing::info!(
                            duration = format!("{}ms", dur.as_millis()),
                        );
                    }
                },
            ),
    );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}
