//! Integration tests for the keep-alive pinger, with a wiremock server
//! standing in for the backend's health endpoint.

use std::time::Duration;

use metameal_keepalive::{Environment, KeepAlive};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHORT_PERIOD: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_probes_immediately_then_periodically() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3..)
        .mount(&server)
        .await;

    let mut pinger = KeepAlive::with_interval(&server.uri(), Environment::Deployed, SHORT_PERIOD);
    pinger.start();
    assert!(pinger.is_active());

    // Probes land at t=0, 50, 100, 150...
    tokio::time::sleep(Duration::from_millis(180)).await;
    pinger.stop();
    assert!(!pinger.is_active());
}

#[tokio::test]
async fn test_double_start_arms_single_timer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // A period far beyond the test's lifetime: only the immediate probe of
    // a single armed timer can arrive.
    let mut pinger =
        KeepAlive::with_interval(&server.uri(), Environment::Deployed, Duration::from_secs(3600));
    pinger.start();
    pinger.start();
    assert!(pinger.is_active());

    tokio::time::sleep(Duration::from_millis(150)).await;
    pinger.stop();
}

#[tokio::test]
async fn test_stop_without_start_is_noop() {
    let mut pinger = KeepAlive::new("http://127.0.0.1:1", Environment::Deployed);
    assert!(!pinger.is_active());
    pinger.stop();
    assert!(!pinger.is_active());
}

#[tokio::test]
async fn test_stop_disarms_timer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut pinger = KeepAlive::with_interval(&server.uri(), Environment::Deployed, SHORT_PERIOD);
    pinger.start();
    tokio::time::sleep(Duration::from_millis(120)).await;
    pinger.stop();

    tokio::time::sleep(Duration::from_millis(60)).await;
    let probes_after_stop = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        probes_after_stop
    );
}

#[tokio::test]
async fn test_local_environment_never_activates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut pinger = KeepAlive::with_interval(&server.uri(), Environment::Local, SHORT_PERIOD);
    pinger.start();
    assert!(!pinger.is_active());

    tokio::time::sleep(Duration::from_millis(120)).await;
}

#[tokio::test]
async fn test_unhealthy_responses_keep_the_timer_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2..)
        .mount(&server)
        .await;

    let mut pinger = KeepAlive::with_interval(&server.uri(), Environment::Deployed, SHORT_PERIOD);
    pinger.start();
    tokio::time::sleep(Duration::from_millis(130)).await;
    assert!(pinger.is_active());
    pinger.stop();
}

#[tokio::test]
async fn test_unreachable_backend_keeps_the_timer_running() {
    // Nothing listens on this address; every probe fails at the network level.
    let mut pinger =
        KeepAlive::with_interval("http://127.0.0.1:1", Environment::Deployed, SHORT_PERIOD);
    pinger.start();
    tokio::time::sleep(Duration::from_millis(130)).await;
    assert!(pinger.is_active());
    pinger.stop();
    assert!(!pinger.is_active());
}
