use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Assumptions, BreakEvenConfig, BreakEvenResult, GoalType, ProjectionResult, RawAssumptions,
    Summary, SweepField, SweepPoint, normalize, run_projection, run_projection_with_schedule,
    run_sweep, solve_break_even, summarize, sweep_values,
};
use crate::report::EMPTY_PROJECTION;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGoalType {
    #[serde(alias = "monthlyRent", alias = "monthly_rent", alias = "rent")]
    MonthlyRent,
    #[serde(alias = "homePrice", alias = "home_price", alias = "price")]
    HomePrice,
    #[serde(alias = "appreciationRate", alias = "appreciation_rate", alias = "appreciation")]
    AppreciationRate,
}

impl From<ApiGoalType> for GoalType {
    fn from(value: ApiGoalType) -> Self {
        match value {
            ApiGoalType::MonthlyRent => GoalType::MonthlyRent,
            ApiGoalType::HomePrice => GoalType::HomePrice,
            ApiGoalType::AppreciationRate => GoalType::AppreciationRate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSweepField {
    #[serde(alias = "homePrice", alias = "home_price")]
    HomePrice,
    #[serde(alias = "downPercent", alias = "down_percent")]
    DownPercent,
    #[serde(alias = "interestRate", alias = "interest_rate")]
    InterestRate,
    #[serde(alias = "appreciationRate", alias = "appreciation_rate")]
    AppreciationRate,
    #[serde(alias = "monthlyRent", alias = "monthly_rent")]
    MonthlyRent,
    #[serde(alias = "rentGrowthRate", alias = "rent_growth_rate")]
    RentGrowthRate,
    #[serde(alias = "investmentReturn", alias = "investment_return")]
    InvestmentReturn,
}

impl From<ApiSweepField> for SweepField {
    fn from(value: ApiSweepField) -> Self {
        match value {
            ApiSweepField::HomePrice => SweepField::HomePrice,
            ApiSweepField::DownPercent => SweepField::DownPercent,
            ApiSweepField::InterestRate => SweepField::InterestRate,
            ApiSweepField::AppreciationRate => SweepField::AppreciationRate,
            ApiSweepField::MonthlyRent => SweepField::MonthlyRent,
            ApiSweepField::RentGrowthRate => SweepField::RentGrowthRate,
            ApiSweepField::InvestmentReturn => SweepField::InvestmentReturn,
        }
    }
}

/// Query-string pairs in arrival order.
type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Default, Clone, Copy)]
struct ViewOptions {
    schedule: bool,
}

impl ViewOptions {
    /// `schedule=true` (or `1`) turns the monthly schedule on; anything else leaves it off.
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let schedule = pairs
            .iter()
            .rev()
            .find(|(key, _)| key == "schedule")
            .is_some_and(|(_, value)| {
                let value = value.trim();
                value.eq_ignore_ascii_case("true") || value == "1"
            });
        Self { schedule }
    }
}

/// Rate bounds for `appreciation-rate` are in percent, like every other rate the API accepts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolvePayload {
    #[serde(default)]
    assumptions: RawAssumptions,
    goal: ApiGoalType,
    search_min: Option<f64>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SweepPayload {
    #[serde(default)]
    assumptions: RawAssumptions,
    field: ApiSweepField,
    from: f64,
    to: f64,
    step: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    assumptions: Assumptions,
    #[serde(flatten)]
    result: ProjectionResult,
    summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    assumptions: Assumptions,
    #[serde(flatten)]
    result: BreakEvenResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepResponse {
    assumptions: Assumptions,
    field: SweepField,
    points: Vec<SweepPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/solve", post(solve_handler))
        .route("/api/sweep", post(sweep_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("rent-vs-own HTTP API listening on http://{addr} (local: http://127.0.0.1:{port}/)");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(query: Result<Query<QueryPairs>, QueryRejection>) -> Response {
    info!("GET /api/project");
    let result = query
        .map_err(|rejection| rejection.body_text())
        .and_then(|Query(pairs)| project_from_query(pairs));
    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn project_post_handler(
    query: Result<Query<QueryPairs>, QueryRejection>,
    payload: Result<Json<RawAssumptions>, JsonRejection>,
) -> Response {
    info!("POST /api/project");
    let options = match query {
        Ok(Query(pairs)) => ViewOptions::from_pairs(&pairs),
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };
    match payload {
        Ok(Json(raw)) => json_response(StatusCode::OK, build_project_response(&raw, options)),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn solve_handler(payload: Result<Json<SolvePayload>, JsonRejection>) -> Response {
    info!("POST /api/solve");
    let result = payload
        .map_err(|rejection| rejection.body_text())
        .and_then(|Json(payload)| solve_from_payload(payload));
    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn sweep_handler(payload: Result<Json<SweepPayload>, JsonRejection>) -> Response {
    info!("POST /api/sweep");
    let result = payload
        .map_err(|rejection| rejection.body_text())
        .and_then(|Json(payload)| sweep_from_payload(payload));
    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

/// Raw assumptions from query pairs. A repeated key keeps its last value.
fn project_from_query(pairs: QueryPairs) -> Result<ProjectResponse, String> {
    let options = ViewOptions::from_pairs(&pairs);
    let params: serde_json::Map<String, serde_json::Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();
    let raw = RawAssumptions::deserialize(serde_json::Value::Object(params))
        .map_err(|e| format!("Invalid query string: {e}"))?;
    Ok(build_project_response(&raw, options))
}

fn build_project_response(raw: &RawAssumptions, options: ViewOptions) -> ProjectResponse {
    let assumptions = normalize(raw);
    let result = if options.schedule {
        run_projection_with_schedule(&assumptions)
    } else {
        run_projection(&assumptions)
    };
    let summary = summarize(&assumptions, &result);
    let message = result.is_empty().then_some(EMPTY_PROJECTION);

    ProjectResponse {
        assumptions,
        result,
        summary,
        message,
    }
}

fn solve_from_payload(payload: SolvePayload) -> Result<SolveResponse, String> {
    let assumptions = normalize(&payload.assumptions);
    let goal_type = GoalType::from(payload.goal);
    let scale = |v: f64| {
        if goal_type == GoalType::AppreciationRate {
            v / 100.0
        } else {
            v
        }
    };

    let defaults = BreakEvenConfig::for_goal(goal_type, &assumptions);
    let config = BreakEvenConfig {
        search_min: payload.search_min.map_or(defaults.search_min, scale),
        search_max: payload.search_max.map_or(defaults.search_max, scale),
        tolerance: payload.tolerance.map_or(defaults.tolerance, scale),
        max_iterations: payload.max_iterations.unwrap_or(defaults.max_iterations),
        ..defaults
    };

    let result = solve_break_even(&assumptions, config).map_err(|e| e.to_string())?;
    Ok(SolveResponse {
        assumptions,
        result,
    })
}

fn sweep_from_payload(payload: SweepPayload) -> Result<SweepResponse, String> {
    let assumptions = normalize(&payload.assumptions);
    let field = SweepField::from(payload.field);
    let divisor = if field.is_rate() { 100.0 } else { 1.0 };

    let values = sweep_values(
        payload.from / divisor,
        payload.to / divisor,
        payload.step / divisor,
    )
    .map_err(|e| e.to_string())?;
    let points = run_sweep(&assumptions, field, &values);

    Ok(SweepResponse {
        assumptions,
        field,
        points,
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn project_response_from_json(json: &str, schedule: bool) -> Result<ProjectResponse, String> {
    let raw = serde_json::from_str::<RawAssumptions>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(build_project_response(&raw, ViewOptions { schedule }))
}

#[cfg(test)]
fn project_response_from_uri(uri: &str) -> Result<ProjectResponse, String> {
    let uri: axum::http::Uri = uri.parse().map_err(|e| format!("Invalid URI: {e}"))?;
    let Query(pairs) =
        Query::<QueryPairs>::try_from_uri(&uri).map_err(|rejection| rejection.body_text())?;
    project_from_query(pairs)
}
