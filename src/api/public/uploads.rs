use axum::routing::get;
use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Router,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::api::AppState;
use crate::error::CatalogError;
use crate::middleware::logging::to_response;
use crate::storage::USER_CONTENT_FOLDER_NAME;

pub fn uploads_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("/{USER_CONTENT_FOLDER_NAME}/:file_name"),
            get(serve_file),
        )
        .layer(Extension(state))
}

pub async fn serve_file(
    Path(file_name): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let not_found = || CatalogError::NotFound(format!("File {file_name} not found"));

    let path = state.storage.file_path(&file_name).map_err(|_| not_found())?;
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(err) => return Err(err.into()),
    };

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    Ok(to_response((StatusCode::OK, headers, body), Ok(())))
}
