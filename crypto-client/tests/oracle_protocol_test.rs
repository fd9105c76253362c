//! Oracle protocol tests against an in-process mock oracle
//!
//! The mock speaks the server side of the session protocol: read the
//! 1024-byte request header, announce a chunk size, echo transformed
//! chunks, and require the session-end sentinel.

use crypto_client::{Error, OracleClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const HEADER_LEN: usize = 1024;
const SENTINEL: u64 = 0xDEAD_CAFE;

struct MockOracle {
    addr: String,
    handle: JoinHandle<()>,
}

/// Spawn a one-session mock oracle.
///
/// `transform` is applied byte-wise to everything streamed through it.
/// With `fragment` set, each chunk is echoed back in two writes to
/// exercise the client's short-read accumulation.
async fn spawn_oracle(
    chunk_size: u32,
    transform: fn(u8) -> u8,
    fragment: bool,
) -> MockOracle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await.unwrap();
        assert_eq!(&header[0..4], &0xCAFE_BABEu32.to_le_bytes());
        let payload_len =
            u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

        stream.write_all(&chunk_size.to_le_bytes()).await.unwrap();

        let mut remaining = payload_len;
        while remaining > 0 {
            let len = (chunk_size as usize).min(remaining);
            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).await.unwrap();
            for b in &mut buf {
                *b = transform(*b);
            }
            if fragment && len > 1 {
                let split = len / 2;
                stream.write_all(&buf[..split]).await.unwrap();
                stream.flush().await.unwrap();
                stream.write_all(&buf[split..]).await.unwrap();
            } else {
                stream.write_all(&buf).await.unwrap();
            }
            remaining -= len;
        }

        let mut sentinel = [0u8; 8];
        stream.read_exact(&mut sentinel).await.unwrap();
        assert_eq!(u64::from_le_bytes(sentinel), SENTINEL);
    });

    MockOracle { addr, handle }
}

/// A test archive: 0x28-byte BOSS header with a recognizable IV seed,
/// followed by `body`.
fn test_archive(body: &[u8]) -> Vec<u8> {
    let mut archive = vec![0u8; 0x28];
    for (i, b) in archive[0x1C..0x28].iter_mut().enumerate() {
        *b = 0xD0 + i as u8;
    }
    archive.extend_from_slice(body);
    archive
}

#[tokio::test]
async fn decrypt_streams_body_and_preserves_archive_header() {
    let body: Vec<u8> = (0u8..23).collect();
    let archive = test_archive(&body);

    // Chunk size 5 forces several chunks plus a short tail.
    let oracle = spawn_oracle(5, |b| !b, false).await;
    let client = OracleClient::new(oracle.addr.clone());

    let decrypted = client.decrypt_archive(&archive).await.unwrap();
    oracle.handle.await.unwrap();

    assert_eq!(decrypted.len(), archive.len());
    assert_eq!(&decrypted[..0x28], &archive[..0x28]);
    let expected: Vec<u8> = body.iter().map(|&b| !b).collect();
    assert_eq!(&decrypted[0x28..], &expected[..]);
}

#[tokio::test]
async fn decrypt_accumulates_fragmented_replies() {
    let body: Vec<u8> = (0u8..64).collect();
    let archive = test_archive(&body);

    let oracle = spawn_oracle(16, |b| b.wrapping_add(1), true).await;
    let client = OracleClient::new(oracle.addr.clone());

    let decrypted = client.decrypt_archive(&archive).await.unwrap();
    oracle.handle.await.unwrap();

    let expected: Vec<u8> = body.iter().map(|&b| b.wrapping_add(1)).collect();
    assert_eq!(&decrypted[0x28..], &expected[..]);
}

#[tokio::test]
async fn self_test_accepts_all_zero_output() {
    let oracle = spawn_oracle(4, |_| 0, false).await;
    let client = OracleClient::new(oracle.addr.clone());

    client.self_test().await.unwrap();
    oracle.handle.await.unwrap();
}

#[tokio::test]
async fn self_test_rejects_nonzero_output() {
    // An identity oracle returns the ciphertext unchanged, which is not
    // the expected all-zero plaintext.
    let oracle = spawn_oracle(16, |b| b, false).await;
    let client = OracleClient::new(oracle.addr.clone());

    let err = client.self_test().await.unwrap_err();
    assert!(matches!(err, Error::SelfTestMismatch));
    oracle.handle.await.unwrap();
}

#[tokio::test]
async fn connection_refused_is_reported() {
    // Bind then drop to get an address nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = OracleClient::new(addr);
    let err = client.self_test().await.unwrap_err();
    assert!(matches!(err, Error::ConnectionFailed { .. }));
}

#[tokio::test]
async fn short_archive_is_rejected_without_connecting() {
    let client = OracleClient::new("127.0.0.1:1".to_string());
    let err = client.decrypt_archive(&[0u8; 0x10]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::ArchiveTooShort { len: 0x10, min: 0x28 }
    ));
}

#[tokio::test]
async fn mid_transfer_close_aborts_the_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await.unwrap();
        stream.write_all(&8u32.to_le_bytes()).await.unwrap();

        // Echo half of the first chunk, then hang up.
        let mut buf = [0u8; 8];
        stream.read_exact(&mut buf).await.unwrap();
        stream.write_all(&buf[..4]).await.unwrap();
        stream.flush().await.unwrap();
    });

    let archive = test_archive(&[0u8; 32]);
    let client = OracleClient::new(addr);
    let err = client.decrypt_archive(&archive).await.unwrap_err();
    handle.await.unwrap();

    match err {
        Error::UnexpectedEof { remaining } => assert_eq!(remaining, 4),
        Error::Io(_) => {}
        other => panic!("unexpected error: {other}"),
    }
}
