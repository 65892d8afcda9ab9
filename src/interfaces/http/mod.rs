use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, ResponseError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::application::{AnalyticsService, QuestionQuery, RowQuery};
use crate::domain::error::AppError;
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvParser;

pub struct HttpState {
    pub service: Arc<AnalyticsService>,
    pub log: ActivityLog,
    pub config: Arc<AppConfig>,
}

#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    code: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(AppError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(ErrorBody {
            success: false,
            error: self.message(),
            code: self.code(),
        })
    }
}

fn fail(data: &HttpState, source: &str, err: AppError) -> HttpResponse {
    if err.is_operational() {
        data.log.warn(source, &err.to_string());
    } else {
        data.log.error(source, &err.to_string());
    }
    err.error_response()
}

fn invalid(errors: validator::ValidationErrors) -> AppError {
    AppError::ValidationError(format!("Invalid query parameters: {}", errors))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProcessCsvQuery {
    pub company: Option<String>,
    pub difficulty: Option<String>,
    pub timeframe: Option<String>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub offset: Option<usize>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessCsvParams {
    #[serde(rename = "useLocalFile", default)]
    pub use_local_file: bool,
}

const MAX_SEARCH_CHARS: usize = 200;

#[get("/process-csv")]
async fn process_csv(
    data: web::Data<HttpState>,
    query: web::Query<ProcessCsvQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return fail(&data, "Process CSV", invalid(errors));
    }

    let query = query.into_inner();
    let rows = RowQuery {
        company: query.company,
        difficulty: query.difficulty,
        timeframe: query.timeframe,
        search: query.search,
    };

    match data
        .service
        .query_rows(&rows, query.offset.unwrap_or(0), query.limit)
        .await
    {
        Ok(page) => ApiResponse::ok(page),
        Err(err) => fail(&data, "Process CSV", err),
    }
}

#[post("/process-csv")]
async fn upload_csv(
    data: web::Data<HttpState>,
    params: web::Query<ProcessCsvParams>,
    body: web::Bytes,
) -> impl Responder {
    let result = if params.use_local_file {
        data.log.info("Process CSV", "Reloading local CSV file");
        data.service.reload_local().await
    } else {
        data.log.info(
            "Process CSV",
            &format!("Processing uploaded CSV ({} bytes)", body.len()),
        );
        data.service.install_upload(CsvParser::decode(&body)).await
    };

    match result {
        Ok(snapshot) => ApiResponse::ok(&*snapshot),
        Err(err) => fail(&data, "Process CSV", err),
    }
}

#[post("/questions/query")]
async fn query_questions(
    data: web::Data<HttpState>,
    req: web::Json<QuestionQuery>,
) -> impl Responder {
    if req.filters.search_term.chars().count() > MAX_SEARCH_CHARS {
        return fail(
            &data,
            "Query",
            AppError::ValidationError("Search term is too long".to_string()),
        );
    }
    if req.limit == Some(0) {
        return fail(
            &data,
            "Query",
            AppError::ValidationError("limit must be at least 1".to_string()),
        );
    }

    match data.service.query(&req).await {
        Ok(result) => ApiResponse::ok(result),
        Err(err) => fail(&data, "Query", err),
    }
}

#[get("/analytics")]
async fn analytics(data: web::Data<HttpState>) -> Result<HttpResponse, AppError> {
    let snapshot = data.service.current_or_load().await?;
    Ok(ApiResponse::ok(&*snapshot))
}

#[get("/ranges")]
async fn ranges(data: web::Data<HttpState>) -> Result<HttpResponse, AppError> {
    Ok(ApiResponse::ok(data.service.ranges().await?))
}

#[get("/metadata")]
async fn metadata(data: web::Data<HttpState>) -> Result<HttpResponse, AppError> {
    Ok(ApiResponse::ok(data.service.metadata().await?))
}

#[post("/refresh")]
async fn refresh(data: web::Data<HttpState>) -> impl Responder {
    data.log.info("Refresh", "Manual refresh requested");
    match data.service.refresh().await {
        Ok(snapshot) => ApiResponse::ok(&snapshot.metadata),
        Err(err) => fail(&data, "Refresh", err),
    }
}

#[post("/webhook")]
async fn webhook(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            data.log.warn("Webhook", &format!("Invalid JSON payload: {}", err));
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": "Invalid JSON payload" }));
        }
    };

    let pushed_ref = payload.get("ref").and_then(|r| r.as_str()).unwrap_or_default();
    if pushed_ref == data.config.webhook.branch_ref {
        data.log.info(
            "Webhook",
            &format!("Push to {} received, refreshing data", pushed_ref),
        );
        let service = data.service.clone();
        let log = data.log.clone();
        actix_web::rt::spawn(async move {
            match service.refresh().await {
                Ok(snapshot) => log.info(
                    "Webhook",
                    &format!("Refresh finished ({} questions)", snapshot.questions.len()),
                ),
                Err(err) => log.error("Webhook", &format!("Refresh failed: {}", err)),
            }
        });
    } else {
        data.log.info(
            "Webhook",
            &format!("Ignoring event for ref '{}'", pushed_ref),
        );
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Webhook processed",
    }))
}

#[get("/webhook")]
async fn webhook_status() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Webhook endpoint is active",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.log.entries())
}

pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(process_csv)
        .service(upload_csv)
        .service(query_questions)
        .service(analytics)
        .service(ranges)
        .service(metadata)
        .service(refresh)
        .service(webhook)
        .service(webhook_status)
        .service(get_logs)
}

pub fn start_server(
    service: Arc<AnalyticsService>,
    log: ActivityLog,
    config: Arc<AppConfig>,
) -> std::io::Result<Server> {
    let bind = (config.server.host.clone(), config.server.port);
    let upload_limit = config.source.max_upload_bytes;
    let cors_permissive = config.server.cors_permissive;
    let state = web::Data::new(HttpState {
        service,
        log,
        config,
    });

    let server = HttpServer::new(move || {
        let cors = if cors_permissive {
            Cors::permissive()
        } else {
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(upload_limit))
            .service(api_scope())
    })
    .bind(bind)?
    .run();

    Ok(server)
}
