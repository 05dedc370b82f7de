//! Maps requests under `/transactions` to the reporting operations and renders their results as
//! JSON.

use crate::api::{self, Feed};
use crate::error::{Error, ErrorType, IntoResult, Result};
use crate::model::{Month, PageRequest, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use crate::report;
use crate::store::Store;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const ROOT: &str = "/transactions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Initialize,
    List,
    Statistics,
    BarChart,
    PieChart,
    Combined,
}

impl Endpoint {
    fn from_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(ROOT)?;
        Some(match rest.trim_end_matches('/') {
            "" => Endpoint::List,
            "/initialize" => Endpoint::Initialize,
            "/statistics" => Endpoint::Statistics,
            "/barchart" => Endpoint::BarChart,
            "/piechart" => Endpoint::PieChart,
            "/combined" => Endpoint::Combined,
            _ => return None,
        })
    }

    /// What the caller is told when the operation fails for a reason other than a bad request.
    fn failure_message(self) -> &'static str {
        match self {
            Endpoint::Initialize => "Error initializing database",
            Endpoint::List => "Error fetching transactions",
            Endpoint::Statistics => "Error fetching statistics",
            Endpoint::BarChart => "Error fetching bar chart data",
            Endpoint::PieChart => "Error fetching pie chart data",
            Endpoint::Combined => "Error fetching combined data",
        }
    }
}

/// Decoded query string parameters. Later duplicates win.
struct Params(HashMap<String, String>);

impl Params {
    fn parse(query: Option<&str>) -> Self {
        let pairs = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()).into_owned();
        Self(pairs.collect())
    }

    /// The value of `key`, treating an empty value as absent.
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn month(&self) -> Result<Option<Month>> {
        self.get("month")
            .map(|m| Month::from_str(m).map_err(Error::request))
            .transpose()
    }

    fn required_month(&self) -> Result<Month> {
        report::require_month(self.month()?)
    }

    fn page(&self) -> Result<PageRequest> {
        let page = self.positive_int("page", DEFAULT_PAGE)?;
        let per_page = self.positive_int("perPage", DEFAULT_PER_PAGE)?;
        PageRequest::new(page, per_page)
    }

    fn positive_int(&self, key: &str, default: u32) -> Result<u32> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v.trim().parse().map_err(|_| {
                Error::request(format!("{key} must be a positive integer, got '{v}'"))
            }),
        }
    }
}

/// Routes requests to the reporting operations. Every operation is bounded by `timeout`; when it
/// expires all of the operation's queries are dropped and the request fails.
pub struct Router {
    store: Arc<dyn Store>,
    feed: Arc<dyn Feed>,
    timeout: Duration,
}

impl Router {
    pub fn new(store: Arc<dyn Store>, feed: Arc<dyn Feed>, timeout: Duration) -> Self {
        Self {
            store,
            feed,
            timeout,
        }
    }

    /// Handles one request. Failures are rendered as `{"error": "..."}` with a matching status;
    /// this never fails.
    pub async fn route<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let Some(endpoint) = Endpoint::from_path(&path) else {
            info!("{method} {path} -> 404");
            return error_response(StatusCode::NOT_FOUND, "Not found");
        };
        if method != Method::GET {
            info!("{method} {path} -> 405");
            return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let params = Params::parse(req.uri().query());
        let result = match tokio::time::timeout(self.timeout, self.dispatch(endpoint, &params)).await
        {
            Ok(result) => result,
            Err(_) => Err(Error::new(
                ErrorType::Service,
                anyhow::anyhow!("Timed out after {:?}", self.timeout),
            )),
        };

        match result {
            Ok(body) => {
                info!("{method} {path} -> 200");
                json_response(StatusCode::OK, &body)
            }
            Err(e) => {
                let status = e.error_type().status_code();
                error!("{method} {path} -> {}: {e}", status.as_u16());
                error_response(status, &e.public_message(endpoint.failure_message()))
            }
        }
    }

    async fn dispatch(&self, endpoint: Endpoint, params: &Params) -> Result<serde_json::Value> {
        let store = self.store.as_ref();
        match endpoint {
            Endpoint::Initialize => {
                let stored = api::seed(store, self.feed.as_ref()).await?;
                Ok(json!({
                    "message": "Database initialized with seed data",
                    "count": stored,
                }))
            }
            Endpoint::List => {
                let month = params.month()?;
                let page = params.page()?;
                let listing = report::listing(store, month, params.get("search"), page)
                    .await
                    .pub_result(ErrorType::Database)?;
                to_json(&listing)
            }
            Endpoint::Statistics => {
                let month = params.required_month()?;
                let statistics = report::statistics(store, month)
                    .await
                    .pub_result(ErrorType::Database)?;
                to_json(&statistics)
            }
            Endpoint::BarChart => {
                let month = params.required_month()?;
                let chart = report::bar_chart(store, month)
                    .await
                    .pub_result(ErrorType::Database)?;
                to_json(&chart)
            }
            Endpoint::PieChart => {
                let month = params.required_month()?;
                let chart = report::pie_chart(store, month)
                    .await
                    .pub_result(ErrorType::Database)?;
                to_json(&chart)
            }
            Endpoint::Combined => {
                let month = params.required_month()?;
                let combined = report::combined(store, month)
                    .await
                    .pub_result(ErrorType::Database)?;
                to_json(&combined)
            }
        }
    }
}

fn to_json(value: &impl Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(value).pub_result(ErrorType::Service)
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &json!({ "error": message }))
}
