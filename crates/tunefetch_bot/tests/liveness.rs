mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{candidate, DownloadGate, FakeSource, RecordingTransport};
use tempfile::TempDir;
use tunefetch_bot::liveness::{self, LIVENESS_BODY};
use tunefetch_bot::Orchestrator;
use tunefetch_core::{Msg, Phase};

async fn get_root(port: u16) -> (reqwest::StatusCode, String) {
    let response = reqwest::get(format!("http://127.0.0.1:{port}/"))
        .await
        .unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn spawned_endpoint_answers_over_http() {
    let server = liveness::spawn(0).unwrap();
    let (status, body) = get_root(server.local_addr().port()).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, LIVENESS_BODY);
}

#[tokio::test]
async fn answers_while_a_download_is_in_flight() {
    let server = liveness::spawn(0).unwrap();
    let gate = Arc::new(DownloadGate::default());
    let source = FakeSource {
        candidates: vec![candidate("Believer", "https://site/song/1", Some("https://cdn/b.mp3"))],
        download_ok: true,
        gate: Some(gate.clone()),
        ..FakeSource::default()
    };
    let scratch = TempDir::new().unwrap();
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(source),
        Arc::new(RecordingTransport::new()),
        scratch.path(),
    ));

    orchestrator
        .handle(9, Msg::TextReceived("Believer".into()))
        .await;
    let menu = orchestrator
        .sessions()
        .snapshot(9)
        .await
        .and_then(|state| state.results().and_then(|results| results.menu()));

    let delivery = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move {
            orchestrator
                .handle(
                    9,
                    Msg::ChoicePressed {
                        menu,
                        payload: "choose|0".into(),
                    },
                )
                .await;
        }
    });
    tokio::time::timeout(Duration::from_secs(5), gate.started.notified())
        .await
        .expect("download started");

    let (status, body) = get_root(server.local_addr().port()).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, LIVENESS_BODY);
    assert!(!delivery.is_finished());

    gate.release.notify_one();
    delivery.await.unwrap();
    let state = orchestrator.sessions().snapshot(9).await.unwrap();
    assert_eq!(state.phase(), Phase::Idle);
}
