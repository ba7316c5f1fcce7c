//! Live server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;

use folio_static::{escape_html, AssetPipeline, PageRenderer, RenderError, Route, SiteRenderer};

/// Configuration for the live server.
#[derive(Debug, Clone)]
pub struct LiveServerConfig {
    /// Asset root, served under `/portfolio`
    pub asset_dir: PathBuf,

    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Minify the built-in stylesheet
    pub minify: bool,
}

impl Default for LiveServerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("portfolio"),
            static_dir: Some(PathBuf::from("static")),
            port: 5000,
            host: "127.0.0.1".to_string(),
            open: true,
            minify: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error on {0}: {1}")]
    ServeError(SocketAddr, String),
}

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    renderer: Arc<SiteRenderer>,
    css: Arc<str>,
}

/// Live portfolio server.
pub struct LiveServer {
    config: LiveServerConfig,
    renderer: Arc<SiteRenderer>,
}

impl LiveServer {
    /// Create a new live server around a renderer.
    pub fn new(config: LiveServerConfig, renderer: Arc<SiteRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let state = AppState {
            renderer: Arc::clone(&self.renderer),
            css: AssetPipeline::css(self.config.minify).into(),
        };

        // Existing files are served as-is; anything else is an asset page.
        let portfolio = ServeDir::new(&self.config.asset_dir)
            .append_index_html_on_directories(false)
            .fallback(get(asset_page_handler).with_state(state.clone()));

        let mut app = Router::new()
            .route("/", get(home_handler))
            .route("/gallery", get(gallery_handler))
            .route("/assets/folio.css", get(css_handler))
            .route("/assets/folio.js", get(js_handler))
            .route("/{page}", get(custom_page_handler))
            .nest_service("/portfolio", portfolio);

        if let Some(static_dir) = &self.config.static_dir {
            app = app.nest_service("/static", ServeDir::new(static_dir));
        }

        app.with_state(state)
    }

    /// Start the server and run until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!(
            "Serving {} assets at http://{}",
            self.renderer.index().len(),
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Render a route into a response.
fn render(state: &AppState, route: Route) -> Response {
    match state.renderer.render(&route) {
        Ok(html) => Html(html).into_response(),
        Err(RenderError::NotFound(path)) => {
            tracing::debug!("Not found: {}", path);
            (
                StatusCode::NOT_FOUND,
                Html(format!(
                    "<h1>Not found</h1><p>Nothing lives at {}.</p>",
                    escape_html(&path)
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to render {}: {}", route, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>".to_string()),
            )
                .into_response()
        }
    }
}

async fn home_handler(State(state): State<AppState>) -> Response {
    render(&state, Route::Home)
}

async fn gallery_handler(State(state): State<AppState>) -> Response {
    render(&state, Route::Gallery)
}

async fn custom_page_handler(
    State(state): State<AppState>,
    axum::extract::Path(page): axum::extract::Path<String>,
) -> Response {
    render(&state, Route::CustomPage(page))
}

/// Fallback of the `/portfolio` file service; `uri` has the prefix stripped.
async fn asset_page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let identifier = percent_decode_str(uri.path().trim_start_matches('/'))
        .decode_utf8()
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_default();

    render(&state, Route::AssetPage(identifier))
}

async fn css_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.css.to_string(),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::js(),
    )
}
