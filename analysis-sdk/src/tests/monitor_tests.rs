//! Mock tests for the connectivity monitor
//!
//! A probe counts as connected only when the health endpoint answers 200 with
//! `status == "running"`; everything else leaves the flag false.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::core::Transport;
    use crate::monitor::{ConnectivityMonitor, HealthState};
    use crate::tests::common::settings_for;
    use crate::transport::HttpTransport;

    async fn mount_health(mock_server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(response)
            .mount(mock_server)
            .await;
    }

    fn create_monitor(base_url: &str, timeout: Duration) -> ConnectivityMonitor {
        let settings = settings_for(base_url).with_timeout(timeout);
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(settings).unwrap());
        ConnectivityMonitor::new(transport)
    }

    #[tokio::test]
    async fn test_running_server_is_connected() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(json!({
                "status": "running",
                "timestamp": "2024-05-01T10:00:00Z",
                "version": "1.2.0"
            })),
        )
        .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_secs(5));
        assert!(!monitor.state().is_connected());

        assert!(monitor.probe().await);
        assert!(monitor.state().is_connected());
    }

    #[tokio::test]
    async fn test_other_status_is_disconnected() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(json!({"status": "stopped"})),
        )
        .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_secs(5));

        assert!(!monitor.probe().await);
        assert!(!monitor.state().is_connected());

        let health = monitor.check().await.unwrap();
        assert_eq!(health.status, "stopped");
    }

    #[tokio::test]
    async fn test_status_match_is_exact() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(json!({"status": "Running"})),
        )
        .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_secs(5));
        assert!(!monitor.probe().await);
    }

    #[tokio::test]
    async fn test_server_error_is_disconnected() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(500).set_body_json(json!({"status": "running"})),
        )
        .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_secs(5));
        assert!(!monitor.probe().await);
    }

    #[tokio::test]
    async fn test_timeout_is_disconnected() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "running"}))
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_millis(200));
        assert!(!monitor.probe().await);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_disconnected() {
        let monitor = create_monitor("http://127.0.0.1:1", Duration::from_secs(2));
        assert!(!monitor.probe().await);
    }

    #[tokio::test]
    async fn test_probe_flips_flag_back_to_false() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let monitor = create_monitor(&mock_server.uri(), Duration::from_secs(5));

        assert!(monitor.probe().await);
        assert!(!monitor.probe().await);
        assert!(!monitor.state().is_connected());
    }

    #[tokio::test]
    async fn test_startup_probe_updates_shared_state() {
        let mock_server = MockServer::start().await;
        mount_health(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(json!({"status": "running"})),
        )
        .await;

        let settings = settings_for(&mock_server.uri());
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(settings).unwrap());
        let state = HealthState::new();
        let monitor = Arc::new(ConnectivityMonitor::with_state(transport, state.clone()));

        let handle = monitor.spawn_startup_probe();
        assert!(handle.await.unwrap());
        assert!(state.is_connected());
    }
}
