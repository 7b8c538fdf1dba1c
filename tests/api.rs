mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{TestCatalog, FILE_SIZE_LIMIT};
use eshop_catalog::api::create_api_router;

const BOUNDARY: &str = "catalog-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("Failed to build multipart request")
}

fn json_request(method: Method, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("Failed to build json request")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to call router");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).expect("Response is not JSON");
    (status, value)
}

fn product_parts<'a>(name: &'a str, thumbnail: Option<&'a [u8]>) -> Vec<Part<'a>> {
    let mut parts = vec![
        Part::Text("price", "100.5"),
        Part::Text("original_price", "80.5"),
        Part::Text("stock", "3"),
        Part::Text("name", name),
        Part::Text("description", "Fresh"),
        Part::Text("language_id", "en-US"),
    ];
    if let Some(data) = thumbnail {
        parts.push(Part::File {
            name: "thumbnail_image",
            file_name: "thumb.png",
            content_type: "image/png",
            data,
        });
    }
    parts
}

#[tokio::test]
async fn test_product_lifecycle_over_http() {
    let catalog = TestCatalog::new().await;
    let app = create_api_router(catalog.state.clone());

    // Step 1: Create a product with a thumbnail
    let (status, body) = send_json(
        &app,
        multipart_request(
            Method::POST,
            "/api/admin/product",
            &product_parts("Bagel", Some(b"png bytes")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id not found in response");

    // Step 2: Read it back through the public API
    let (status, body) = send_json(
        &app,
        empty_request(Method::GET, &format!("/api/product/{id}?language_id=en-US")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bagel");
    assert_eq!(body["view_count"], 1);
    let thumbnail = body["thumbnail_image"]
        .as_str()
        .expect("thumbnail not found")
        .to_owned();

    // Step 3: The thumbnail is served from the user content folder
    let (status, bytes) = send(
        &app,
        empty_request(Method::GET, &format!("/user_content/{thumbnail}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"png bytes");

    // Step 4: Change price and stock
    let (status, body) = send_json(
        &app,
        empty_request(Method::PATCH, &format!("/api/admin/product/{id}/price/99.5")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (status, _) = send_json(
        &app,
        empty_request(Method::PATCH, &format!("/api/admin/product/{id}/stock/-2")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(
        &app,
        empty_request(
            Method::GET,
            &format!("/api/admin/product/{id}?language_id=en-US"),
        ),
    )
    .await;
    assert_eq!(body["stock"], 1);

    // Step 5: Delete it
    let (status, _) = send_json(
        &app,
        empty_request(Method::DELETE, &format!("/api/admin/product/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalog.stored_files().is_empty());

    let (status, body) = send_json(
        &app,
        empty_request(Method::DELETE, &format!("/api/admin/product/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_paging_over_http() {
    let catalog = TestCatalog::new().await;
    for n in 1..=3 {
        catalog.create_product(&format!("Product {n}"), "en-US").await;
    }
    let app = create_api_router(catalog.state.clone());

    let (status, body) = send_json(
        &app,
        empty_request(
            Method::GET,
            "/api/admin/product?language_id=en-US&page_index=2&page_size=2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["name"], "Product 3");

    let (status, body) = send_json(
        &app,
        empty_request(Method::GET, "/api/product?language_id=en-US"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_index"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(3));

    let (status, body) = send_json(
        &app,
        empty_request(
            Method::GET,
            "/api/product?language_id=en-US&page_index=18446744073709551615&page_size=100",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_records"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));

    let (status, _) = send_json(
        &app,
        empty_request(
            Method::GET,
            "/api/admin/product?language_id=en-US&page_size=500",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categories_over_http() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let app = create_api_router(catalog.state.clone());

    let (status, body) = send_json(
        &app,
        json_request(
            Method::POST,
            "/api/admin/category",
            json!({ "name": "Bread", "language_id": "en-US", "sort_order": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());

    let (status, body) = send_json(
        &app,
        empty_request(Method::GET, "/api/category?language_id=en-US"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Bread");
    assert_eq!(body[0]["status"], "active");

    let (status, body) = send_json(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/product/{product_id}/categories"),
            json!({ "categories": [{ "name": "Bread", "selected": true }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_success"], true);

    let (status, body) = send_json(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/product/{product_id}/categories"),
            json!({ "categories": [{ "name": "Cakes", "selected": true }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
}

#[tokio::test]
async fn test_images_over_http() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let app = create_api_router(catalog.state.clone());
    let images_uri = format!("/api/admin/product/{product_id}/images");

    let (status, body) = send_json(
        &app,
        multipart_request(
            Method::POST,
            &images_uri,
            &[
                Part::Text("caption", "Side"),
                Part::Text("is_default", "true"),
                Part::Text("sort_order", "2"),
                Part::File {
                    name: "image_file",
                    file_name: "side.jpeg",
                    content_type: "image/jpeg",
                    data: b"jpeg bytes",
                },
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let image_id = body["id"].as_i64().expect("id not found in response");

    let (status, body) = send_json(&app, empty_request(Method::GET, &images_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["caption"], "Side");
    assert_eq!(body[0]["is_default"], true);
    assert!(body[0]["image_path"]
        .as_str()
        .is_some_and(|path| path.ends_with(".jpg")));

    let (status, body) = send_json(
        &app,
        multipart_request(
            Method::PUT,
            &format!("{images_uri}/{image_id}"),
            &[Part::Text("caption", "Front")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send_json(
        &app,
        empty_request(Method::GET, &format!("{images_uri}/{image_id}")),
    )
    .await;
    assert_eq!(body["caption"], "Front");
    assert_eq!(body["sort_order"], 2);
    assert_eq!(body["is_default"], true);

    let (status, _) = send_json(
        &app,
        empty_request(Method::DELETE, &format!("{images_uri}/{image_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalog.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_rejections() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let app = create_api_router(catalog.state.clone());
    let images_uri = format!("/api/admin/product/{product_id}/images");

    let (status, _) = send_json(
        &app,
        multipart_request(
            Method::POST,
            &images_uri,
            &[Part::File {
                name: "image_file",
                file_name: "notes.txt",
                content_type: "text/plain",
                data: b"not an image",
            }],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let oversized = vec![0u8; FILE_SIZE_LIMIT + 1];
    let (status, _) = send_json(
        &app,
        multipart_request(
            Method::POST,
            &images_uri,
            &[Part::File {
                name: "image_file",
                file_name: "big.png",
                content_type: "image/png",
                data: &oversized,
            }],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _) = send_json(
        &app,
        multipart_request(Method::POST, &images_uri, &[Part::Text("caption", "x")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(catalog.stored_files().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let catalog = TestCatalog::new().await;
    let app = create_api_router(catalog.state.clone());

    let (status, body) = send_json(
        &app,
        empty_request(Method::GET, "/user_content/missing.png"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
