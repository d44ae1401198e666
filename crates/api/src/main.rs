use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use navpick_core::domain::recommendation::{InvestorInputs, RecommendationResult};
use navpick_core::engine::{recommend_funds, FixedRate};
use navpick_core::ingest::error::FetchFailure;
use navpick_core::ingest::source::{load_universe, HttpNavSource, NavSource};

mod page;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = navpick_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let source = HttpNavSource::from_settings(&settings)?;
    tracing::info!(
        url = source.url(),
        timeout_secs = settings.nav_feed_timeout_secs,
        assumed_annual_return = settings.assumed_annual_return,
        "NAV source configured"
    );

    let state = AppState {
        source: Arc::new(source),
        returns: FixedRate(settings.assumed_annual_return),
    };

    let app = router(state);

    let port: u16 = match std::env::var("PORT") {
        Ok(v) => v
            .parse()
            .with_context(|| format!("PORT must be a port number (got {v:?})"))?,
        Err(_) => 3000,
    };
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/recommendations", get(get_recommendations))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    source: Arc<dyn NavSource>,
    returns: FixedRate,
}

/// Form fields as submitted. Kept as strings so bad input can be echoed back.
#[derive(Debug, Default, Deserialize)]
struct InputsQuery {
    monthly_investment: Option<String>,
    target_amount: Option<String>,
    horizon_years: Option<String>,
}

impl InputsQuery {
    fn is_submitted(&self) -> bool {
        self.monthly_investment.is_some()
            || self.target_amount.is_some()
            || self.horizon_years.is_some()
    }

    /// Missing fields fall back to the form defaults.
    fn to_inputs(&self) -> anyhow::Result<InvestorInputs> {
        let defaults = InvestorInputs::default();

        let monthly_investment = match non_blank(&self.monthly_investment) {
            Some(s) => s
                .parse::<f64>()
                .with_context(|| format!("monthly investment must be a number (got {s:?})"))?,
            None => defaults.monthly_investment,
        };
        let target_amount = match non_blank(&self.target_amount) {
            Some(s) => s
                .parse::<f64>()
                .with_context(|| format!("target amount must be a number (got {s:?})"))?,
            None => defaults.target_amount,
        };
        let horizon_years = match non_blank(&self.horizon_years) {
            Some(s) => s
                .parse::<u32>()
                .with_context(|| format!("investment horizon must be whole years (got {s:?})"))?,
            None => defaults.horizon_years,
        };

        let inputs = InvestorInputs {
            monthly_investment,
            target_amount,
            horizon_years,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    fn form_values(&self) -> page::FormValues {
        let defaults = InvestorInputs::default();
        page::FormValues {
            monthly_investment: non_blank(&self.monthly_investment)
                .map(str::to_string)
                .unwrap_or_else(|| defaults.monthly_investment.to_string()),
            target_amount: non_blank(&self.target_amount)
                .map(str::to_string)
                .unwrap_or_else(|| defaults.target_amount.to_string()),
            horizon_years: non_blank(&self.horizon_years)
                .map(str::to_string)
                .unwrap_or_else(|| defaults.horizon_years.to_string()),
        }
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn compute(
    state: &AppState,
    funds: &[navpick_core::domain::fund::FundRecord],
    inputs: &InvestorInputs,
) -> anyhow::Result<Vec<RecommendationResult>> {
    let results = recommend_funds(
        funds,
        inputs.monthly_investment,
        inputs.target_amount,
        f64::from(inputs.horizon_years),
        &state.returns,
    )?;
    Ok(results)
}

async fn index(State(state): State<AppState>, Query(query): Query<InputsQuery>) -> Html<String> {
    let universe = match load_universe(state.source.as_ref()).await {
        Ok(u) => u,
        Err(err) => {
            report_fetch_failure(&err);
            return Html(page::render_fetch_failure(&err));
        }
    };

    let form = query.form_values();
    if !query.is_submitted() {
        return Html(page::render_page(
            universe.len(),
            &form,
            page::Outcome::NotRequested,
        ));
    }

    let computed = query
        .to_inputs()
        .and_then(|inputs| compute(&state, &universe.records, &inputs));

    let html = match computed {
        Ok(results) => {
            tracing::info!(qualifying = results.len(), "rendered recommendations");
            page::render_page(universe.len(), &form, page::Outcome::Results(&results))
        }
        Err(err) => {
            tracing::info!(error = %err, "rejected recommendation inputs");
            page::render_page(
                universe.len(),
                &form,
                page::Outcome::Invalid(format!("{err:#}")),
            )
        }
    };

    Html(html)
}

#[derive(Debug, Serialize)]
struct ApiRecommendations {
    fetched_at: DateTime<Utc>,
    loaded: usize,
    skipped_lines: usize,
    inputs: InvestorInputs,
    results: Vec<RecommendationResult>,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<InputsQuery>,
) -> Response {
    let inputs = match query.to_inputs() {
        Ok(inputs) => inputs,
        Err(err) => return api_error(StatusCode::BAD_REQUEST, format!("{err:#}")),
    };

    let universe = match load_universe(state.source.as_ref()).await {
        Ok(u) => u,
        Err(err) => {
            report_fetch_failure(&err);
            return api_error(StatusCode::BAD_GATEWAY, err.to_string());
        }
    };

    let results = match compute(&state, &universe.records, &inputs) {
        Ok(results) => results,
        Err(err) => return api_error(StatusCode::BAD_REQUEST, format!("{err:#}")),
    };

    Json(ApiRecommendations {
        fetched_at: universe.fetched_at,
        loaded: universe.len(),
        skipped_lines: universe.skipped_lines,
        inputs,
        results,
    })
    .into_response()
}

fn api_error(status: StatusCode, error: String) -> Response {
    (status, Json(ApiError { error })).into_response()
}

fn report_fetch_failure(err: &FetchFailure) {
    sentry_anyhow::capture_anyhow(&anyhow::Error::new(err.clone()));
    tracing::error!(
        source = err.source,
        stage = err.stage,
        detail = %err.detail,
        "NAV feed fetch failed"
    );
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &navpick_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    const FEED: &str = "Scheme Code;ISIN Div Payout/ ISIN Growth;ISIN Div Reinvestment;Scheme Name;Net Asset Value;Date\n\
                        119551;-;-;Banking & PSU Debt Fund - Direct;104.5329;17-Oct-2026\n\
                        120437;-;-;Axis Liquid Fund - Growth;2511.0672;17-Oct-2026\n\
                        120438;-;-;Broken Fund;N.A.;17-Oct-2026\n";

    struct StaticSource(Result<String, FetchFailure>);

    #[async_trait::async_trait]
    impl NavSource for StaticSource {
        fn source_name(&self) -> &'static str {
            "static"
        }

        async fn fetch_raw(&self) -> Result<String, FetchFailure> {
            self.0.clone()
        }
    }

    fn state_with(feed: Result<String, FetchFailure>) -> AppState {
        AppState {
            source: Arc::new(StaticSource(feed)),
            returns: FixedRate(0.12),
        }
    }

    fn query(monthly: &str, target: &str, horizon: &str) -> InputsQuery {
        InputsQuery {
            monthly_investment: Some(monthly.to_string()),
            target_amount: Some(target.to_string()),
            horizon_years: Some(horizon.to_string()),
        }
    }

    #[test]
    fn missing_fields_use_defaults() {
        let inputs = InputsQuery::default().to_inputs().unwrap();
        assert_eq!(inputs, InvestorInputs::default());
        assert!(!InputsQuery::default().is_submitted());
    }

    #[test]
    fn rejects_unparseable_and_out_of_range_fields() {
        assert!(query("lots", "1000000", "10").to_inputs().is_err());
        assert!(query("10000", "1000000", "2.5").to_inputs().is_err());
        assert!(query("50", "1000000", "10").to_inputs().is_err());
        assert!(query("10000", "1000000", "31").to_inputs().is_err());
        assert!(query(" 10000 ", "1000000", "10").to_inputs().is_ok());
    }

    #[test]
    fn form_echoes_submitted_values() {
        let values = query("abc", "5000", "3").form_values();
        assert_eq!(values.monthly_investment, "abc");
        assert_eq!(values.target_amount, "5000");
        assert_eq!(values.horizon_years, "3");
    }

    #[tokio::test]
    async fn index_without_submission_shows_loaded_count() {
        let state = state_with(Ok(FEED.to_string()));
        let Html(html) = index(State(state), Query(InputsQuery::default())).await;

        assert!(html.contains("Loaded 2 mutual funds from AMFI."));
        assert!(!html.contains("Recommended Mutual Funds:"));
    }

    #[tokio::test]
    async fn index_lists_recommendations_when_submitted() {
        let state = state_with(Ok(FEED.to_string()));
        let Html(html) = index(State(state), Query(query("10000", "1000000", "10"))).await;

        assert!(html.contains("Recommended Mutual Funds:"));
        assert!(html.contains(
            "Scheme Name: Banking &amp; PSU Debt Fund - Direct, NAV: 104.53, Time to Target: 5.83 years"
        ));
        assert!(html.contains("Axis Liquid Fund - Growth, NAV: 2511.07"));
        assert!(!html.contains("Broken Fund"));
    }

    #[tokio::test]
    async fn index_reports_when_nothing_qualifies() {
        let state = state_with(Ok(FEED.to_string()));
        let Html(html) = index(State(state), Query(query("100", "1000000", "1"))).await;
        assert!(html.contains("No suitable mutual funds found for the given criteria."));
    }

    #[tokio::test]
    async fn index_shows_fetch_failure_and_stops() {
        let state = state_with(Err(FetchFailure::new("static", "status", "HTTP 500")));
        let Html(html) = index(State(state), Query(query("10000", "1000000", "10"))).await;

        assert!(html.contains("Error fetching AMFI NAV data."));
        assert!(!html.contains("Get Recommendations"));
    }

    #[tokio::test]
    async fn api_returns_sorted_results_as_json() {
        let state = state_with(Ok(FEED.to_string()));
        let res = get_recommendations(State(state), Query(query("10000", "1000000", "10"))).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["loaded"], 2);
        assert_eq!(v["skipped_lines"], 1);
        assert_eq!(v["results"].as_array().unwrap().len(), 2);
        assert_eq!(v["results"][0]["code"], "119551");
        assert_eq!(v["results"][0]["years_to_target"], 70.0 / 12.0);
    }

    #[tokio::test]
    async fn api_maps_errors_to_status_codes() {
        let state = state_with(Ok(FEED.to_string()));
        let res = get_recommendations(State(state), Query(query("10", "1000000", "10"))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let state = state_with(Err(FetchFailure::new("static", "request", "timed out")));
        let res = get_recommendations(State(state), Query(query("10000", "1000000", "10"))).await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }
}
