use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use flake::{LockFlakeGenerator, TimeSource};
use tower_http::trace::TraceLayer;

use crate::error::Result;

/// Shared handler state: the single generator every request goes through.
pub struct AppState<T>
where
    T: TimeSource,
{
    generator: Arc<LockFlakeGenerator<T>>,
}

impl<T> Clone for AppState<T>
where
    T: TimeSource,
{
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

/// Builds the service router around an already constructed generator.
///
/// - `GET /` returns a new ID as a decimal string
/// - `GET /stats` returns the generator counters as JSON
pub fn router<T>(generator: Arc<LockFlakeGenerator<T>>) -> Router
where
    T: TimeSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(next_id::<T>))
        .route("/stats", get(stats::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { generator })
}

async fn next_id<T>(State(state): State<AppState<T>>) -> Result<String>
where
    T: TimeSource + Send + Sync + 'static,
{
    let id = state.generator.generate()?;
    Ok(id.to_string())
}

async fn stats<T>(State(state): State<AppState<T>>) -> Result<Response>
where
    T: TimeSource + Send + Sync + 'static,
{
    let stats = state.generator.stats()?;
    let body = serde_json::to_vec(&stats)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use flake::{FLAKE_EPOCH, FlakeId};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tower::ServiceExt;

    const EPOCH_MS: u64 = FLAKE_EPOCH.as_millis() as u64;
    const T0: u64 = EPOCH_MS + 1_000;

    #[derive(Clone)]
    struct MockTime {
        millis: Arc<AtomicU64>,
    }

    impl MockTime {
        fn at(millis: u64) -> Self {
            Self {
                millis: Arc::new(AtomicU64::new(millis)),
            }
        }

        fn set(&self, millis: u64) {
            self.millis.store(millis, Ordering::SeqCst);
        }
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis.load(Ordering::SeqCst)
        }
    }

    async fn send_get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    fn app_at(worker_id: u64, time: &MockTime) -> Router {
        let generator = LockFlakeGenerator::new(worker_id, time.clone()).unwrap();
        router(Arc::new(generator))
    }

    #[tokio::test]
    async fn root_returns_decimal_id() {
        let time = MockTime::at(T0);
        let app = app_at(5, &time);

        let (status, _, body) = send_get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);

        let id = FlakeId::from_raw(body.parse().unwrap());
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.worker_id(), 5);
        assert_eq!(id.sequence(), 1);
    }

    #[tokio::test]
    async fn root_ids_increase() {
        let time = MockTime::at(T0);
        let app = app_at(0, &time);

        let (_, _, first) = send_get(&app, "/").await;
        time.set(T0 + 1);
        let (_, _, second) = send_get(&app, "/").await;
        assert!(first.parse::<u64>().unwrap() < second.parse::<u64>().unwrap());
    }

    #[tokio::test]
    async fn clock_regression_is_a_500() {
        let time = MockTime::at(T0);
        let app = app_at(0, &time);

        time.set(T0 - 1);
        let (status, _, body) = send_get(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "The clock went backwards!");
    }

    #[tokio::test]
    async fn sequence_overflow_is_a_500() {
        let time = MockTime::at(T0);
        let generator =
            LockFlakeGenerator::from_components(T0, 0, FlakeId::MAX_SEQUENCE, FLAKE_EPOCH, time)
                .unwrap();
        let app = router(Arc::new(generator));

        let (status, _, body) = send_get(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Sequence Overflow!");
    }

    #[tokio::test]
    async fn stats_report_counters_as_json() {
        let time = MockTime::at(T0);
        let app = app_at(7, &time);

        send_get(&app, "/").await;
        send_get(&app, "/").await;
        time.set(T0 - 1);
        send_get(&app, "/").await;
        time.set(T0 + 5);

        let (status, content_type, body) = send_get(&app, "/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Timestamp": T0 + 5,
                "GeneratedIds": 2,
                "Errors": 1,
                "MaxTime": T0,
                "WorkerId": 7,
            })
        );
    }

    #[tokio::test]
    async fn unknown_route_is_a_404() {
        let time = MockTime::at(T0);
        let app = app_at(0, &time);

        let (status, _, _) = send_get(&app, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_get_unique_ids() {
        const REQUESTS: usize = 256;

        let time = MockTime::at(T0);
        let generator = Arc::new(LockFlakeGenerator::new(1, time).unwrap());
        let app = router(Arc::clone(&generator));

        let handles: Vec<_> = (0..REQUESTS)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send_get(&app, "/").await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let (status, _, body) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK);
            assert!(ids.insert(body.parse::<u64>().unwrap()));
        }

        assert_eq!(ids.len(), REQUESTS);
        let stats = generator.stats().unwrap();
        assert_eq!(stats.generated_ids, REQUESTS as u64);
        assert_eq!(stats.errors, 0);
    }
}
