mod common;

use std::sync::Arc;

use common::{RecordingTransport, Sent};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tunefetch_bot::Orchestrator;
use tunefetch_core::{ChoiceButton, Msg, Notice, Phase};
use tunefetch_engine::{EngineConfig, ScrapeEngine};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT: i64 = 42;
const AUDIO: &[u8] = b"ID3\x04\x00fake-mp3-body";

struct Harness {
    server: MockServer,
    scratch: TempDir,
    transport: Arc<RecordingTransport>,
    orchestrator: Orchestrator,
}

/// The mock server acts as search engine, track site and file host at once.
async fn harness() -> Harness {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();
    let engine = ScrapeEngine::new(EngineConfig {
        search_endpoint: format!("{}/html/", server.uri()),
        site_domain: server.uri().trim_start_matches("http://").to_string(),
        ..EngineConfig::default()
    })
    .unwrap();
    let transport = Arc::new(RecordingTransport::new());
    let orchestrator = Orchestrator::new(Arc::new(engine), transport.clone(), scratch.path());
    Harness {
        server,
        scratch,
        transport,
        orchestrator,
    }
}

async fn mount_search(server: &MockServer, song_ids: &[&str]) {
    let anchors: String = song_ids
        .iter()
        .map(|id| format!(r#"<a class="result__a" href="{}/song/{id}">{id}</a>"#, server.uri()))
        .collect();
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("<html><body>{anchors}</body></html>"),
            "text/html; charset=utf-8",
        ))
        .mount(server)
        .await;
}

async fn mount_believer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/song/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><h1>Believer</h1><a href="/files/believer.mp3">Download</a></body></html>"#,
            "text/html",
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/believer.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(AUDIO))
        .mount(server)
        .await;
}

fn text(chat: i64, id: i32, notice: Notice) -> Sent {
    Sent::Text {
        chat,
        id,
        text: notice.text(),
    }
}

fn edit(chat: i64, id: i32, notice: Notice) -> Sent {
    Sent::Edit {
        chat,
        id,
        text: notice.text(),
    }
}

#[tokio::test]
async fn query_to_delivered_audio() {
    let h = harness().await;
    mount_search(&h.server, &["1"]).await;
    mount_believer(&h.server).await;

    h.orchestrator
        .handle(CHAT, Msg::TextReceived("Imagine Dragons Believer".into()))
        .await;

    assert_eq!(
        h.transport.sent(),
        vec![
            text(
                CHAT,
                1,
                Notice::Searching {
                    query: "Imagine Dragons Believer".into()
                }
            ),
            edit(CHAT, 1, Notice::Found { count: 1 }),
            Sent::Menu {
                chat: CHAT,
                id: 2,
                text: Notice::ChooseTrack.text(),
                buttons: vec![ChoiceButton::new(0, "Believer")],
            },
        ]
    );
    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.phase(), Phase::PresentingChoices);
    assert_eq!(state.results().unwrap().menu(), Some(2));

    h.transport.clear();
    h.orchestrator
        .handle(
            CHAT,
            Msg::ChoicePressed {
                menu: Some(2),
                payload: "choose|0".into(),
            },
        )
        .await;

    let sent = h.transport.sent();
    let audio_path = common::audio_path(&sent).expect("audio uploaded");
    assert_eq!(audio_path.file_name().unwrap(), "Believer.mp3");
    assert!(audio_path.starts_with(h.scratch.path()));
    assert_eq!(
        sent,
        vec![
            text(
                CHAT,
                3,
                Notice::Downloading {
                    title: "Believer".into()
                }
            ),
            Sent::Audio {
                chat: CHAT,
                path: audio_path.clone(),
                title: "Believer".into(),
                bytes: Some(AUDIO.to_vec()),
            },
            edit(
                CHAT,
                3,
                Notice::Delivered {
                    title: "Believer".into()
                }
            ),
        ]
    );
    assert!(!audio_path.exists());
    assert!(common::is_empty_dir(h.scratch.path()));

    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.results().map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn nothing_found_sends_one_message() {
    let h = harness().await;
    mount_search(&h.server, &[]).await;

    h.orchestrator
        .handle(CHAT, Msg::TextReceived("zzzz qqqq".into()))
        .await;

    let sent = h.transport.sent();
    assert_eq!(
        sent,
        vec![
            text(
                CHAT,
                1,
                Notice::Searching {
                    query: "zzzz qqqq".into()
                }
            ),
            edit(CHAT, 1, Notice::NothingFound),
        ]
    );
    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.results().is_none());
}

#[tokio::test]
async fn search_engine_outage_reads_as_nothing_found() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    h.orchestrator
        .handle(CHAT, Msg::TextReceived("Believer".into()))
        .await;

    let sent = h.transport.sent();
    assert_eq!(sent.last(), Some(&edit(CHAT, 1, Notice::NothingFound)));
    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.phase(), Phase::Idle);
}

#[tokio::test]
async fn stale_menu_is_rejected_after_new_search() {
    let h = harness().await;
    mount_search(&h.server, &["1"]).await;
    mount_believer(&h.server).await;

    h.orchestrator
        .handle(CHAT, Msg::TextReceived("Believer".into()))
        .await;
    h.orchestrator
        .handle(CHAT, Msg::TextReceived("Believer again".into()))
        .await;
    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.results().unwrap().menu(), Some(4));

    h.transport.clear();
    h.orchestrator
        .handle(
            CHAT,
            Msg::ChoicePressed {
                menu: Some(2),
                payload: "choose|0".into(),
            },
        )
        .await;

    assert_eq!(
        h.transport.sent(),
        vec![text(CHAT, 5, Notice::InvalidSelection)]
    );
    let after = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(after, state);
    assert_eq!(after.phase(), Phase::PresentingChoices);
}

#[tokio::test]
async fn failed_download_reports_and_cleans_up() {
    let h = harness().await;
    mount_search(&h.server, &["9"]).await;
    Mock::given(method("GET"))
        .and(path("/song/9"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<h1>Thunder</h1><a href="/files/thunder.mp3">Download</a>"#,
            "text/html",
        ))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/thunder.mp3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    h.orchestrator
        .handle(CHAT, Msg::TextReceived("Thunder".into()))
        .await;
    h.transport.clear();
    h.orchestrator
        .handle(
            CHAT,
            Msg::ChoicePressed {
                menu: Some(2),
                payload: "choose|0".into(),
            },
        )
        .await;

    assert_eq!(
        h.transport.sent(),
        vec![
            text(
                CHAT,
                3,
                Notice::Downloading {
                    title: "Thunder".into()
                }
            ),
            edit(
                CHAT,
                3,
                Notice::DownloadFailed {
                    title: "Thunder".into()
                }
            ),
        ]
    );
    assert!(common::is_empty_dir(h.scratch.path()));
    let state = h.orchestrator.sessions().snapshot(CHAT).await.unwrap();
    assert_eq!(state.phase(), Phase::Idle);
}
