//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use part_store::InMemoryPartStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state(InMemoryPartStore::new());
    api::create_app(state, get_metrics_handle())
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn patch(uri: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_part(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/parts")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn part_body(material: &str, serial: &str, supplier: &str) -> serde_json::Value {
    serde_json::json!({
        "materialNumber": material,
        "serialNumber": serial,
        "supplierNumber": supplier
    })
}

fn assert_error_body(json: &serde_json::Value, status: StatusCode) {
    assert_eq!(json["status"], status.as_u16());
    assert!(json["message"].as_str().is_some());
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn add_part_returns_created_with_zero_quantity() {
        let app = setup();

        let (status, json) = send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["id"], part_body("M1", "S1", "SUP1"));
        assert_eq!(json["quantity"], 0);
        assert!(json.get("version").is_none());
    }

    #[tokio::test]
    async fn get_unknown_part_is_not_found() {
        let app = setup();

        let (status, json) = send(&app, get("/api/v1/parts/M2/S2/SUP2")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_body(&json, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn increase_and_decrease_quantity() {
        let app = setup();
        send(&app, post_part(part_body("M3", "S3", "SUP3"))).await;

        let (status, json) = send(&app, patch("/api/v1/parts/M3/S3/SUP3/add?amount=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["quantity"], 5);

        let (_, json) = send(&app, patch("/api/v1/parts/M3/S3/SUP3/add?amount=10")).await;
        assert_eq!(json["quantity"], 15);

        let (status, json) =
            send(&app, patch("/api/v1/parts/M3/S3/SUP3/subtract?amount=3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["quantity"], 12);

        let (_, json) = send(&app, get("/api/v1/parts/M3/S3/SUP3")).await;
        assert_eq!(json["quantity"], 12);
    }

    #[tokio::test]
    async fn delete_empty_part_then_get_is_not_found() {
        let app = setup();
        send(&app, post_part(part_body("M5", "S5", "SUP5"))).await;

        let (status, json) = send(&app, delete("/api/v1/parts/M5/S5/SUP5")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(json.is_null());

        let (status, _) = send(&app, get("/api/v1/parts/M5/S5/SUP5")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_part_with_stock_is_a_conflict() {
        let app = setup();
        send(&app, post_part(part_body("M4", "S4", "SUP4"))).await;
        send(&app, patch("/api/v1/parts/M4/S4/SUP4/add?amount=10")).await;

        let (status, json) = send(&app, delete("/api/v1/parts/M4/S4/SUP4")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_error_body(&json, StatusCode::CONFLICT);

        let (status, json) = send(&app, get("/api/v1/parts/M4/S4/SUP4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["quantity"], 10);
    }
}

mod rejections {
    use super::*;

    #[tokio::test]
    async fn duplicate_add_is_a_conflict() {
        let app = setup();
        send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;

        let (status, json) = send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("already exists")
        );
    }

    #[tokio::test]
    async fn subtracting_more_than_available_is_a_conflict() {
        let app = setup();
        send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;
        send(&app, patch("/api/v1/parts/M1/S1/SUP1/add?amount=2")).await;

        let (status, _) = send(&app, patch("/api/v1/parts/M1/S1/SUP1/subtract?amount=3")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, json) = send(&app, get("/api/v1/parts/M1/S1/SUP1")).await;
        assert_eq!(json["quantity"], 2);
    }

    #[tokio::test]
    async fn non_positive_amount_is_a_bad_request() {
        let app = setup();
        send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;

        let (status, json) = send(&app, patch("/api/v1/parts/M1/S1/SUP1/add?amount=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&json, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, patch("/api/v1/parts/M1/S1/SUP1/subtract?amount=-4")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_or_malformed_amount_is_a_bad_request() {
        let app = setup();
        send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;

        let (status, json) = send(&app, patch("/api/v1/parts/M1/S1/SUP1/add")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&json, StatusCode::BAD_REQUEST);
        assert!(json.get("fieldErrors").is_none());

        let (status, _) = send(&app, patch("/api/v1/parts/M1/S1/SUP1/add?amount=many")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_on_empty_warehouse_is_not_found() {
        let app = setup();

        let (status, json) = send(&app, get("/api/v1/parts")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "No parts found in the warehouse");
    }

    #[tokio::test]
    async fn unknown_part_operations_are_not_found() {
        let app = setup();

        let (status, _) = send(&app, delete("/api/v1/parts/X/Y/Z")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, patch("/api/v1/parts/X/Y/Z/add?amount=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, patch("/api/v1/parts/X/Y/Z/subtract?amount=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn blank_body_fields_are_reported_per_field() {
        let app = setup();

        let (status, json) = send(&app, post_part(part_body("", "S1", "   "))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["fieldErrors"]["materialNumber"], "must not be blank");
        assert_eq!(json["fieldErrors"]["supplierNumber"], "must not be blank");
        assert!(json["fieldErrors"].get("serialNumber").is_none());

        let (status, _) = send(&app, get("/api/v1/parts")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_body_fields_are_reported_per_field() {
        let app = setup();

        let (status, json) =
            send(&app, post_part(serde_json::json!({ "materialNumber": "M1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fieldErrors"]["serialNumber"], "must not be blank");
        assert_eq!(json["fieldErrors"]["supplierNumber"], "must not be blank");
    }

    #[tokio::test]
    async fn null_body_fields_are_reported_per_field() {
        let app = setup();

        let body = serde_json::json!({
            "materialNumber": null,
            "serialNumber": "S",
            "supplierNumber": "SUP"
        });
        let (status, json) = send(&app, post_part(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["fieldErrors"]["materialNumber"], "must not be blank");
        assert!(json["fieldErrors"].get("serialNumber").is_none());
        assert!(json["fieldErrors"].get("supplierNumber").is_none());
    }

    #[tokio::test]
    async fn overlong_fields_are_rejected() {
        let app = setup();
        let long = "x".repeat(51);

        let (status, json) = send(&app, post_part(part_body(&long, "S1", "SUP1"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["fieldErrors"]["materialNumber"],
            "size must be between 1 and 50"
        );

        let (status, json) = send(&app, get(&format!("/api/v1/parts/M1/{long}/SUP1"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["fieldErrors"]["serialNumber"],
            "size must be between 1 and 50"
        );
    }

    #[tokio::test]
    async fn blank_path_segments_are_rejected() {
        let app = setup();

        let (status, json) = send(&app, get("/api/v1/parts/M1/%20/SUP1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fieldErrors"]["serialNumber"], "must not be blank");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = setup();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/parts")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&json, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_list_parts() {
    let app = setup();
    send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;
    send(&app, post_part(part_body("M2", "S2", "SUP2"))).await;

    let (status, json) = send(&app, get("/api/v1/parts")).await;
    assert_eq!(status, StatusCode::OK);
    let parts = json.as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| p["quantity"] == 0));
}

#[tokio::test]
async fn test_path_segments_are_percent_decoded() {
    let app = setup();
    send(&app, post_part(part_body("MAT 1", "SER/1", "SUP1"))).await;

    let (status, json) = send(&app, get("/api/v1/parts/MAT%201/SER%2F1/SUP1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"]["serialNumber"], "SER/1");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    send(&app, post_part(part_body("M1", "S1", "SUP1"))).await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("inventory_operations_total"));
}
