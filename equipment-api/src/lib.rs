//! HTTP surface for equipment CSV uploads, history and PDF reports.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use equipment_stats::{
    CsvTable, Error, HistoryStore, RETAIN_LAST, Summary, UploadRecord, report, validate_columns,
};

/// Build the application router around a shared history store.
pub fn router(store: Arc<HistoryStore>) -> Router {
    Router::new()
        .route("/api/upload/", post(upload_csv))
        .route("/api/history/", get(get_history))
        .route("/api/report/", get(generate_report))
        .with_state(store)
}

/// Body of a successful upload: the persisted record plus the parsed rows
/// for client-side charting.
#[derive(Serialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub record: UploadRecord,
    pub raw_data: Vec<Map<String, Value>>,
}

async fn upload_csv(
    State(store): State<Arc<HistoryStore>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.csv").to_string();
            let bytes = field.bytes().await.map_err(bad_upload)?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(Error::validation("No file provided").into());
    };
    if !filename.ends_with(".csv") {
        return Err(Error::validation("File must be a CSV").into());
    }

    let table = CsvTable::parse(&bytes)?;
    validate_columns(&table)?;
    let readings = table.readings()?;
    let summary = Summary::from_readings(&readings)?;
    let record = store.append(&filename, summary);
    info!(
        "processed {} ({} rows) as record {}",
        filename, record.total_records, record.id
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            raw_data: table.raw_rows(),
            record,
        }),
    ))
}

async fn get_history(State(store): State<Arc<HistoryStore>>) -> Json<Vec<UploadRecord>> {
    Json(store.list(RETAIN_LAST))
}

#[derive(Deserialize)]
struct ReportQuery {
    id: Option<u64>,
}

async fn generate_report(
    State(store): State<Arc<HistoryStore>>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let record = match query.id {
        Some(id) => store
            .get(id)
            .ok_or_else(|| Error::not_found("Upload not found"))?,
        None => store
            .latest()
            .ok_or_else(|| Error::not_found("No data available"))?,
    };

    let pdf = report::render(&record)?;
    let disposition = format!("attachment; filename=\"{}\"", record.report_filename());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// Wrapper turning library errors into `{"error": ...}` JSON responses.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) | Error::EmptyInput => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn bad_upload(err: MultipartError) -> ApiError {
    Error::validation(format!("Invalid upload: {err}")).into()
}
