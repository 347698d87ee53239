//! Integration test harness for Sheetstall.
//!
//! Runs the storefront router and in-process mock collaborators (the
//! spreadsheet feed and the order endpoint) on ephemeral local ports, so
//! the whole catalog-to-cart-to-order pipeline is exercised over real HTTP
//! without any external service.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//!
//! let grid = ctx.get("/products").await;
//! assert!(grid.contains("Widget"));
//! ```

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

use sheetstall_storefront::config::{FeedConfig, OrderConfig, StorefrontConfig, SuccessConvention};
use sheetstall_storefront::feed::ColumnMap;
use sheetstall_storefront::routes;
use sheetstall_storefront::state::AppState;

/// Default gviz wrapper prefix length used by the harness.
pub const PREFIX_LEN: usize = 47;

/// Default gviz wrapper suffix length used by the harness.
pub const SUFFIX_LEN: usize = 2;

/// Frame a gviz document the way the spreadsheet endpoint does.
#[must_use]
pub fn frame(json: &str) -> String {
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({json});")
}

/// Build a gviz document from string rows (first row is the header).
#[must_use]
pub fn gviz_document(rows: &[&[&str]]) -> String {
    let rows: Vec<Value> = rows
        .iter()
        .map(|cells| {
            let cells: Vec<Value> = cells.iter().map(|v| json!({ "v": v })).collect();
            json!({ "c": cells })
        })
        .collect();
    json!({ "table": { "rows": rows } }).to_string()
}

/// The two-product feed most tests start from.
#[must_use]
pub fn default_feed() -> String {
    gviz_document(&[
        &["id", "name", "category", "price", "desc", "img"],
        &["1", "Widget", "Tools", "9.99", "A widget", ""],
        &["2", "Gadget", "Gizmos", "25", "Shiny", ""],
    ])
}

/// Serve a router on an ephemeral local port, returning its base URL.
pub async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    Url::parse(&format!("http://{addr}/")).expect("base url")
}

// =============================================================================
// Mock feed endpoint
// =============================================================================

/// In-process spreadsheet feed with a swappable response body.
#[derive(Clone)]
pub struct MockFeed {
    pub url: Url,
    body: Arc<Mutex<String>>,
}

impl MockFeed {
    /// Start serving the framed form of `document`.
    pub async fn start(document: &str) -> Self {
        let body = Arc::new(Mutex::new(frame(document)));

        let app = Router::new()
            .route("/feed", get(feed_handler))
            .with_state(Arc::clone(&body));
        let base = serve(app).await;

        Self {
            url: base.join("feed").expect("feed url"),
            body,
        }
    }

    /// Swap in a new document for subsequent fetches.
    pub fn set_document(&self, document: &str) {
        self.set_raw(&frame(document));
    }

    /// Swap in raw (possibly malformed) response text.
    pub fn set_raw(&self, raw: &str) {
        *self.body.lock().expect("feed body lock") = raw.to_string();
    }
}

async fn feed_handler(State(body): State<Arc<Mutex<String>>>) -> String {
    body.lock().expect("feed body lock").clone()
}

// =============================================================================
// Mock order endpoint
// =============================================================================

type OrderEndpointState = Arc<OrderEndpointInner>;

struct OrderEndpointInner {
    status: StatusCode,
    body: Value,
    received: Mutex<Vec<Value>>,
}

/// In-process order endpoint recording every submission it receives.
#[derive(Clone)]
pub struct MockOrders {
    pub url: Url,
    inner: OrderEndpointState,
}

impl MockOrders {
    /// Start an endpoint answering `status` with `body`.
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let inner = Arc::new(OrderEndpointInner {
            status,
            body,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/orders", post(order_handler))
            .with_state(Arc::clone(&inner));
        let base = serve(app).await;

        Self {
            url: base.join("orders").expect("orders url"),
            inner,
        }
    }

    /// A happy endpoint using the status convention.
    pub async fn accepting() -> Self {
        Self::start(StatusCode::OK, json!({ "status": "ok" })).await
    }

    /// Orders received so far, in arrival order.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.inner.received.lock().expect("orders lock").clone()
    }
}

async fn order_handler(
    State(state): State<OrderEndpointState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    state.received.lock().expect("orders lock").push(payload);
    (state.status, Json(state.body.clone()))
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to mock collaborators.
pub struct TestContext {
    pub base_url: Url,
    pub client: reqwest::Client,
    pub feed: MockFeed,
    pub orders: MockOrders,
    // Holds the cart slot directory alive for the storefront's lifetime.
    _cart_dir: TempDir,
}

impl TestContext {
    /// Storefront over the default feed and an accepting order endpoint.
    pub async fn new() -> Self {
        Self::with_collaborators(
            MockFeed::start(&default_feed()).await,
            MockOrders::accepting().await,
        )
        .await
    }

    /// Storefront over the default feed and a given order endpoint.
    pub async fn with_orders(orders: MockOrders) -> Self {
        Self::with_collaborators(MockFeed::start(&default_feed()).await, orders).await
    }

    /// Storefront wired to explicit collaborators.
    pub async fn with_collaborators(feed: MockFeed, orders: MockOrders) -> Self {
        let cart_dir = TempDir::new().expect("cart dir");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            feed: FeedConfig {
                url: feed.url.clone(),
                prefix_len: PREFIX_LEN,
                suffix_len: SUFFIX_LEN,
                columns: ColumnMap::default(),
            },
            order: OrderConfig {
                url: Some(orders.url.clone()),
                success: SuccessConvention::Status,
            },
            cart_path: cart_dir.path().join("cart.json"),
            sentry_dsn: None,
        };

        let state = AppState::new(config);
        state
            .reload_catalog()
            .await
            .expect("initial catalog load against the mock feed");

        let app = routes::routes().with_state(state);
        let base_url = serve(app).await;

        Self {
            base_url,
            client: reqwest::Client::new(),
            feed,
            orders,
            _cart_dir: cart_dir,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .expect("storefront url")
    }

    /// GET a path and return its body, asserting success.
    pub async fn get(&self, path: &str) -> String {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.text().await.expect("GET body")
    }

    /// POST a form and return the response.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }
}
