use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use career_pathways::config::AppConfig;
use career_pathways::error::AppError;
use career_pathways::telemetry;
use career_pathways::workflows::guidance::{
    CareerAssessment, CareerCatalog, RecommendationComposer, RecommendationFailure,
    RecommendationSet, StudentProfile,
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    composer: Arc<RecommendationComposer>,
    catalog: Arc<CareerCatalog>,
    timeout: Duration,
}

#[derive(Parser, Debug)]
#[command(
    name = "Career Pathways",
    about = "Screen careers, rank university programs and match bursaries for a learner profile",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate recommendations for a learner profile stored as JSON
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Path to the learner profile JSON
    #[arg(long)]
    profile: PathBuf,
    /// Path to a catalog JSON replacing the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Print the full recommendation set as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    profile: StudentProfile,
    #[serde(default)]
    catalog: Option<CareerCatalog>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    success: bool,
    recommendations: RecommendationSet,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommend(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/recommendations", post(recommendations_endpoint))
        .with_state(state)
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        composer: Arc::new(RecommendationComposer::new(&config.recommendations)),
        catalog: Arc::new(CareerCatalog::standard()),
        timeout: config.request_timeout,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "career guidance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        profile,
        catalog,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let student: StudentProfile = read_json(&profile)?;
    let catalog = match catalog {
        Some(path) => read_json(&path)?,
        None => CareerCatalog::standard(),
    };
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let composer = RecommendationComposer::new(&config.recommendations);
    let set = composer.generate(&student, &catalog, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
    } else {
        render_recommendations(&set);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn recommendations_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let RecommendationRequest {
        profile,
        catalog,
        today,
    } = payload;

    let composer = state.composer.clone();
    let catalog = catalog.map(Arc::new).unwrap_or_else(|| state.catalog.clone());
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let task =
        tokio::task::spawn_blocking(move || composer.generate(&profile, &catalog, today));

    let outcome = match tokio::time::timeout(state.timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(RecommendationFailure::new(format!(
            "recommendation task failed: {join_error}"
        ))),
        Err(_) => {
            warn!(timeout_ms = state.timeout.as_millis() as u64, "recommendation timed out");
            return Err(AppError::Timeout(state.timeout));
        }
    };

    match outcome {
        Ok(recommendations) => Ok(Json(RecommendationResponse {
            success: true,
            recommendations,
        })),
        Err(failure) => {
            warn!(error = %failure.error, "recommendation failed");
            Err(failure.into())
        }
    }
}

fn render_assessment(assessment: &CareerAssessment) {
    println!(
        "- {} ({})",
        assessment.career_name,
        assessment.category.label()
    );
    for block in &assessment.critical_blocks {
        let fix = if block.fixable { "fixable" } else { "not fixable" };
        println!("    [{}] {} ({fix})", block.gate.label(), block.reason);
        if !block.alternatives.is_empty() {
            println!("    alternatives: {}", block.alternatives.join(", "));
        }
    }
    for warning in &assessment.warnings {
        println!("    [{}] {}", warning.gate.label(), warning.reason);
    }
}

fn render_recommendations(set: &RecommendationSet) {
    println!("Career guidance report");
    println!(
        "Evaluated {} | APS {} (projected {}-{})",
        set.generated_on, set.aps.current, set.aps.projection.min, set.aps.projection.max
    );
    println!(
        "Careers screened: {} eligible, {} blocked of {}",
        set.summary.eligible, set.summary.blocked, set.summary.total
    );

    if !set.interest_categories.is_empty() {
        let interests: Vec<&str> = set
            .interest_categories
            .iter()
            .map(|category| category.label())
            .collect();
        println!("Interests: {}", interests.join(", "));
    }

    println!("\nEligible careers");
    for assessment in &set.eligible_careers {
        render_assessment(assessment);
    }

    if set.blocked_careers.is_empty() {
        println!("\nBlocked careers: none");
    } else {
        println!("\nBlocked careers");
        for assessment in &set.blocked_careers {
            render_assessment(assessment);
        }
    }

    if set.ranked_programs.is_empty() {
        println!("\nUniversity programs: none within reach");
    } else {
        println!("\nUniversity programs");
        for (rank, program) in set.ranked_programs.iter().enumerate() {
            println!(
                "{}. {} at {} ({}), APS {}: {}% ({})",
                rank + 1,
                program.program,
                program.university,
                program.province,
                program.required_aps,
                program.admission_probability,
                program.feasibility.label()
            );
        }
    }

    if set.ranked_bursaries.is_empty() {
        println!("\nBursaries: none matched");
    } else {
        println!("\nBursaries");
        for bursary in &set.ranked_bursaries {
            let deadline = match (bursary.deadline, bursary.days_until_deadline) {
                (Some(date), Some(days)) => format!(", closes {date} ({days} days)"),
                _ => String::new(),
            };
            println!(
                "- {} [{}] score {}: {}{}",
                bursary.name,
                bursary.urgency.label(),
                bursary.score,
                bursary.amount,
                deadline
            );
        }
    }

    println!(
        "\nTimeline: {} ({})",
        set.timeline.phase_label,
        set.timeline.urgency.label()
    );
    if let Some(days) = set.timeline.days_until_finals {
        println!("Final examinations start in {days} days");
    }
    for action in &set.timeline.actions {
        let due = action
            .due_by
            .map(|date| format!(" (by {date})"))
            .unwrap_or_default();
        println!("{}. {}{}", action.priority, action.action, due);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state(timeout: Duration) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
            composer: Arc::new(RecommendationComposer::standard()),
            catalog: Arc::new(CareerCatalog::standard()),
            timeout,
        }
    }

    fn profile() -> Value {
        json!({
            "grade": 12,
            "math_type": "pure_math",
            "math_mark": 78,
            "subjects": [
                "Mathematics",
                "Physical Sciences",
                "English Home Language",
                "Life Sciences",
                "Life Orientation",
                "isiZulu Home Language"
            ],
            "marks": {
                "Mathematics": 78,
                "Physical Sciences": 71,
                "English Home Language": 69,
                "Life Sciences": 74,
                "Life Orientation": 85,
                "isiZulu Home Language": 80
            },
            "budget_limit": "low",
            "household_income": 150000,
            "knows_about_nsfas": false,
            "career_interest_text": "I want to become an engineer"
        })
    }

    async fn post_json(state: AppState, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/recommendations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");

        let response = router(state).oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn recommendations_endpoint_returns_ranked_results() {
        let (status, body) = post_json(
            test_state(Duration::from_secs(5)),
            json!({ "profile": profile(), "today": "2026-05-04" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let recommendations = &body["recommendations"];
        assert_eq!(recommendations["generated_on"], json!("2026-05-04"));
        assert!(!recommendations["ranked_programs"]
            .as_array()
            .expect("programs")
            .is_empty());
        assert_eq!(
            recommendations["timeline"]["phase"],
            json!("finals_preparation")
        );
    }

    #[tokio::test]
    async fn invalid_catalog_yields_fallback_payload() {
        let catalog = json!({
            "careers": [{
                "id": "",
                "name": "Unnamed",
                "category": "engineering",
                "universities": []
            }]
        });

        let (status, body) = post_json(
            test_state(Duration::from_secs(5)),
            json!({ "profile": profile(), "catalog": catalog, "today": "2026-05-04" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["fallback"], json!(true));
        assert!(body["error"]
            .as_str()
            .expect("error text")
            .contains("invalid catalog"));
    }

    #[tokio::test]
    async fn health_and_readiness_respond() {
        let state = test_state(Duration::from_secs(1));
        state.readiness.store(false, Ordering::Relaxed);

        let health = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);

        let ready = router(state)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");
        assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn request_rejects_malformed_dates() {
        let result = serde_json::from_value::<RecommendationRequest>(json!({
            "profile": profile(),
            "today": "04/05/2026"
        }));
        assert!(result.is_err());
    }
}
