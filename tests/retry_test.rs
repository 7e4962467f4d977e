#[cfg(test)]
mod retry_fetch {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use immo::{clients::retry::RetryFetch, Error};
    use reqwest::header::HeaderMap;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn counting_app(hits: Arc<AtomicUsize>) -> Router {
        let slow_hits = hits.clone();
        let missing_hits = hits.clone();
        let ok_hits = hits;
        Router::new()
            .route(
                "/slow",
                get(move || {
                    let hits = slow_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        "late"
                    }
                }),
            )
            .route(
                "/missing",
                get(move || {
                    let hits = missing_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        (StatusCode::NOT_FOUND, "nothing here")
                    }
                }),
            )
            .route(
                "/echo",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let hits = ok_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "params": params }))
                    }
                }),
            )
    }

    #[tokio::test]
    async fn timeouts_are_retried_until_exhausted() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_app(hits.clone())).await;
        let fetch = RetryFetch::with_timeout(Duration::from_millis(100), 3).unwrap();

        let err = fetch
            .get(&format!("{base}/slow"), &[], HeaderMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_200_stops_at_first_answer() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_app(hits.clone())).await;
        let fetch = RetryFetch::with_timeout(Duration::from_secs(2), 3).unwrap();

        let err = fetch
            .get(&format!("{base}/missing"), &[], HeaderMap::new())
            .await
            .unwrap_err();

        match err {
            Error::Status { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "nothing here");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn json_body_is_returned_with_query() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_app(hits.clone())).await;
        let fetch = RetryFetch::with_timeout(Duration::from_secs(2), 3).unwrap();

        let body: Value = fetch
            .get_json(&format!("{base}/echo"), &[("format", "json")], HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(body["params"]["format"], "json");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connection_errors_are_not_retried() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetch = RetryFetch::with_timeout(Duration::from_secs(2), 3).unwrap();
        let err = fetch
            .get(&format!("http://{addr}/"), &[], HeaderMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Reqwest(_)));
    }
}
