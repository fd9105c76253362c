//! End-to-end pipeline tests: wiremock BOSS servers plus an in-process
//! mock oracle whose transform is the identity (and whose self-test
//! answers correctly).

use boss_client::HttpClient;
use crypto_client::OracleClient;
use gift_fetch::{FetchOrchestrator, Layout, RunLog, SizeClassDecoder, Source};
use gift_formats::NameTables;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENVELOPE_LEN: usize = 0x296;
const GIFT_CONTENT_LEN: usize = 0x310;
const CUP_CONTAINER_LEN: usize = 0x4C0;
const REGULATION_LEN: usize = 0x4A8;
const SELF_TEST_MODE: u32 = 0xEC;

/// Spawn a mock oracle that serves any number of sessions. Archive
/// sessions echo the body unchanged; self-test sessions return zeros.
async fn spawn_oracle(honest_self_test: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut header = [0u8; 1024];
                if stream.read_exact(&mut header).await.is_err() {
                    return;
                }
                let payload_len =
                    u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
                let mode = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

                let chunk_size = 0x100u32;
                if stream.write_all(&chunk_size.to_le_bytes()).await.is_err() {
                    return;
                }

                let mut remaining = payload_len;
                while remaining > 0 {
                    let len = (chunk_size as usize).min(remaining);
                    let mut buf = vec![0u8; len];
                    if stream.read_exact(&mut buf).await.is_err() {
                        return;
                    }
                    if mode == SELF_TEST_MODE && honest_self_test {
                        buf.fill(0);
                    }
                    if stream.write_all(&buf).await.is_err() {
                        return;
                    }
                    remaining -= len;
                }

                let mut sentinel = [0u8; 8];
                let _ = stream.read_exact(&mut sentinel).await;
            });
        }
    });

    addr
}

/// An archive whose decrypted form (identity transform) carries `content`
/// after the 0x296-byte envelope.
fn archive_with_content(content: &[u8]) -> Vec<u8> {
    let mut archive = vec![0u8; ENVELOPE_LEN];
    // Recognizable IV seed in the BOSS header region.
    for (i, b) in archive[0x1C..0x28].iter_mut().enumerate() {
        *b = 0xC0 + i as u8;
    }
    archive.extend_from_slice(content);
    archive
}

fn gift_content() -> Vec<u8> {
    vec![0x11u8; GIFT_CONTENT_LEN]
}

/// A cup container holding one all-zero regulation record.
fn cup_content() -> Vec<u8> {
    let mut content = vec![0u8; CUP_CONTAINER_LEN];
    content[4..8].copy_from_slice(&1u32.to_le_bytes()); // record count
    content[0x10..0x14].copy_from_slice(&0x18u32.to_le_bytes()); // offset
    content[0x14..0x18].copy_from_slice(&(REGULATION_LEN as u32).to_le_bytes()); // length
    content
}

fn test_source() -> Source {
    Source::new("TestGame", "gameid", 7)
}

fn orchestrator(server: &MockServer, oracle_addr: &str, layout: Layout) -> FetchOrchestrator {
    let http = HttpClient::new()
        .unwrap()
        .with_filelist_base(format!("{}/fl", server.uri()))
        .with_file_base(format!("{}/f", server.uri()));
    FetchOrchestrator::new(
        http,
        OracleClient::new(oracle_addr.to_string()),
        layout,
        NameTables::indexed(16, 8, 8),
        Box::new(SizeClassDecoder),
    )
}

async fn mount_filelist(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/fl/gameid/FGONLYT"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_archive(server: &MockServer, name: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/f/gameid/FGONLYT/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

const FILELIST_V1: &str = "gift1\tX\tEvent\tID1\tY\t1446\t1700000000\n\
                           springcup\tX\tEvent\tID2\tY\t1878\t1700000000\n";
const FILELIST_V2: &str = "gift1\tX\tEvent\tID1\tY\t1446\t1700000500\n\
                           springcup\tX\tEvent\tID2\tY\t1878\t1700000000\n";

#[tokio::test]
async fn full_pipeline_fetches_decrypts_and_routes() {
    let server = MockServer::start().await;
    let oracle_addr = spawn_oracle(true).await;
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(dir.path());

    mount_filelist(&server, FILELIST_V1).await;
    mount_archive(&server, "gift1", archive_with_content(&gift_content())).await;
    mount_archive(&server, "springcup", archive_with_content(&cup_content())).await;

    let orch = orchestrator(&server, &oracle_addr, layout.clone());
    let source = test_source();

    let mut log = RunLog::create(&layout.log_dir(), "run1").await.unwrap();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    assert!(log.is_noteworthy());
    log.finish().await.unwrap();

    let root = dir.path();

    // Snapshot and archive stores.
    assert_eq!(
        tokio::fs::read_to_string(root.join("data/TestGame/list.txt"))
            .await
            .unwrap(),
        FILELIST_V1
    );
    assert!(root
        .join("data/TestGame/boss/gift1-_-Event-_-ID1-_-1700000000")
        .exists());

    // Decrypted store (identity transform preserves length).
    let dec = tokio::fs::read(root.join("data/TestGame/boss_dec/gift1_Event_1700000000"))
        .await
        .unwrap();
    assert_eq!(dec.len(), ENVELOPE_LEN + GIFT_CONTENT_LEN);

    // Gift route.
    let full = tokio::fs::read(
        root.join("wondercards/TestGame/wc7full/gift1_Event_1700000000.wc7full"),
    )
    .await
    .unwrap();
    assert_eq!(full, gift_content());
    assert!(root
        .join("wondercards/TestGame/wc7/gift1_Event_1700000000.wc7")
        .exists());

    // Cup route: one regulation, binary and rendered text.
    let bin = tokio::fs::read(root.join("cups/TestGame/bin/springcup_Event_1700000000_1.bin"))
        .await
        .unwrap();
    assert_eq!(bin.len(), REGULATION_LEN);
    let txt =
        tokio::fs::read_to_string(root.join("cups/TestGame/txt/springcup_Event_1700000000_1.txt"))
            .await
            .unwrap();
    assert!(txt.contains("Regulation"));
    assert!(txt.contains("Allowed Pokemon"));
}

#[tokio::test]
async fn unchanged_manifest_is_a_quiet_run() {
    let server = MockServer::start().await;
    let oracle_addr = spawn_oracle(true).await;
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(dir.path());

    mount_filelist(&server, FILELIST_V1).await;
    mount_archive(&server, "gift1", archive_with_content(&gift_content())).await;
    mount_archive(&server, "springcup", archive_with_content(&cup_content())).await;

    let orch = orchestrator(&server, &oracle_addr, layout.clone());
    let source = test_source();

    let mut log = RunLog::create(&layout.log_dir(), "run1").await.unwrap();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    log.finish().await.unwrap();

    // Second run sees the identical filelist: nothing to do, log deleted.
    let mut log = RunLog::create(&layout.log_dir(), "run2").await.unwrap();
    let log_path = log.path().to_path_buf();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    assert!(!log.is_noteworthy());
    log.finish().await.unwrap();
    assert!(!log_path.exists());
}

#[tokio::test]
async fn updated_entry_triggers_redownload_and_update_notice() {
    let server = MockServer::start().await;
    let oracle_addr = spawn_oracle(true).await;
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(dir.path());

    mount_filelist(&server, FILELIST_V1).await;
    mount_archive(&server, "gift1", archive_with_content(&gift_content())).await;
    mount_archive(&server, "springcup", archive_with_content(&cup_content())).await;

    let orch = orchestrator(&server, &oracle_addr, layout.clone());
    let source = test_source();

    let mut log = RunLog::create(&layout.log_dir(), "run1").await.unwrap();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    log.finish().await.unwrap();

    // The server publishes a newer gift1 with a larger timestamp.
    server.reset().await;
    mount_filelist(&server, FILELIST_V2).await;
    mount_archive(&server, "gift1", archive_with_content(&gift_content())).await;

    let mut log = RunLog::create(&layout.log_dir(), "run2").await.unwrap();
    let log_path = log.path().to_path_buf();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    log.finish().await.unwrap();

    assert!(dir
        .path()
        .join("data/TestGame/boss/gift1-_-Event-_-ID1-_-1700000500")
        .exists());

    let log_text = tokio::fs::read_to_string(&log_path).await.unwrap();
    assert!(log_text.contains("gift1_Event_1700000500 is an updated version of an old archive!"));
}

#[tokio::test]
async fn failed_self_test_disables_extraction_but_not_fetch() {
    let server = MockServer::start().await;
    // Dishonest oracle: echoes the self-test vector back unchanged.
    let oracle_addr = spawn_oracle(false).await;
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(dir.path());

    mount_filelist(&server, FILELIST_V1).await;
    mount_archive(&server, "gift1", archive_with_content(&gift_content())).await;
    mount_archive(&server, "springcup", archive_with_content(&cup_content())).await;

    let orch = orchestrator(&server, &oracle_addr, layout.clone());
    let source = test_source();

    let mut log = RunLog::create(&layout.log_dir(), "run1").await.unwrap();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    log.finish().await.unwrap();

    // Fetch completed...
    assert!(dir
        .path()
        .join("data/TestGame/boss/gift1-_-Event-_-ID1-_-1700000000")
        .exists());
    // ...but nothing was decrypted.
    assert!(!dir.path().join("data/TestGame/boss_dec").exists());
}

#[tokio::test]
async fn failed_download_skips_that_archive_and_continues() {
    let server = MockServer::start().await;
    let oracle_addr = spawn_oracle(true).await;
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(dir.path());

    // gift1 is missing from the file server; springcup downloads fine.
    mount_filelist(&server, FILELIST_V1).await;
    mount_archive(&server, "springcup", archive_with_content(&cup_content())).await;

    let orch = orchestrator(&server, &oracle_addr, layout.clone());
    let source = test_source();

    let mut log = RunLog::create(&layout.log_dir(), "run1").await.unwrap();
    orch.run(std::slice::from_ref(&source), &mut log).await.unwrap();
    log.finish().await.unwrap();

    assert!(!dir
        .path()
        .join("data/TestGame/boss/gift1-_-Event-_-ID1-_-1700000000")
        .exists());
    assert!(dir
        .path()
        .join("cups/TestGame/bin/springcup_Event_1700000000_1.bin")
        .exists());
}
