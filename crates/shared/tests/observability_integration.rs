//! 可观测性模块集成测试
//!
//! 测试 metrics 记录函数与 HTTP 中间件的核心行为。

mod metrics_tests {
    use league_shared::observability::metrics::{record_entity_mutation, record_http_request};

    #[test]
    fn test_record_http_request() {
        // 未安装 recorder 时记录为空操作，不应 panic
        record_http_request("GET", "/Franchise/ListFranchises", 200, 0.05);
        record_http_request("POST", "/Team/CreateTeam", 201, 0.12);
        record_http_request("PUT", "/Player/UpdatePlayer/{id}", 409, 0.08);
        record_http_request("DELETE", "/Sponsor/DeleteSponsor/{id}", 404, 0.01);
    }

    #[test]
    fn test_record_entity_mutation() {
        record_entity_mutation("franchise", "create", "ok");
        record_entity_mutation("team", "update", "CONCURRENCY_CONFLICT");
        record_entity_mutation("franchise", "delete", "DELETE_RESTRICTED");
    }
}

mod middleware_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use league_shared::observability::middleware::{
        REQUEST_ID_HEADER, RequestId, http_tracing, request_id,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/echo",
                get(|axum::Extension(id): axum::Extension<RequestId>| async move {
                    id.as_str().to_string()
                }),
            )
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"req-42");
    }

    #[tokio::test]
    async fn test_request_id_is_generated_when_missing() {
        let response = app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(header).is_ok());
    }
}
