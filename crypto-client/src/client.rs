//! Oracle session client

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::{
    self, BOSS_HEADER_LEN, MODE_BOSS_DECRYPT, MODE_SELF_TEST, SELF_TEST_VECTOR,
    SESSION_END_SENTINEL, SUBMODE_BOSS_DECRYPT, SUBMODE_SELF_TEST,
};

/// Client for the external decryption oracle.
///
/// Holds only the oracle's address; every operation opens its own TCP
/// connection and tears it down when the session ends.
#[derive(Debug, Clone)]
pub struct OracleClient {
    addr: String,
}

impl OracleClient {
    /// Create a client for the oracle at `addr` (`host:port`).
    #[must_use]
    pub fn new(addr: String) -> Self {
        Self { addr }
    }

    /// The oracle address this client connects to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Decrypt a BOSS archive by streaming its body through the oracle.
    ///
    /// The first 0x28 bytes of the input are the archive's own header; they
    /// seed the IV and are copied into the output verbatim. Everything
    /// after them is transformed chunk by chunk at the negotiated size.
    ///
    /// # Errors
    ///
    /// Any connection or transfer failure aborts the whole operation; no
    /// partial output is returned. The caller is expected to log the
    /// failure and continue with the next archive.
    pub async fn decrypt_archive(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.len() < BOSS_HEADER_LEN {
            return Err(Error::ArchiveTooShort {
                len: input.len(),
                min: BOSS_HEADER_LEN,
            });
        }

        let payload_len = (input.len() - BOSS_HEADER_LEN) as u32;
        let iv = protocol::boss_iv(input);
        let header = protocol::request_header(
            payload_len,
            MODE_BOSS_DECRYPT,
            SUBMODE_BOSS_DECRYPT,
            &[0u8; 16],
            &iv,
        );

        let mut stream = self.connect().await?;
        let chunk_size = Self::handshake(&mut stream, &header).await?;

        let mut output = input.to_vec();
        Self::transform_body(&mut stream, input, &mut output, BOSS_HEADER_LEN, chunk_size).await?;

        Self::finish(&mut stream).await?;
        Ok(output)
    }

    /// Run the oracle self-test.
    ///
    /// Streams a fixed 16-byte ciphertext with an all-zero test key and IV
    /// and requires 16 zero bytes back. Validates that the oracle is
    /// reachable and configured with the right keys before any real
    /// archive is processed.
    pub async fn self_test(&self) -> Result<()> {
        let header = protocol::request_header(
            SELF_TEST_VECTOR.len() as u32,
            MODE_SELF_TEST,
            SUBMODE_SELF_TEST,
            &[0u8; 16],
            &[0u8; 16],
        );

        let mut stream = self.connect().await?;
        let chunk_size = Self::handshake(&mut stream, &header).await?;

        // Start from a non-zero buffer so an oracle that echoes nothing
        // back cannot pass by accident.
        let mut output = [0xFFu8; SELF_TEST_VECTOR.len()];
        Self::transform_body(&mut stream, &SELF_TEST_VECTOR, &mut output, 0, chunk_size).await?;

        Self::finish(&mut stream).await?;

        if output.iter().all(|&b| b == 0) {
            debug!("Oracle self-test succeeded");
            Ok(())
        } else {
            Err(Error::SelfTestMismatch)
        }
    }

    async fn connect(&self) -> Result<TcpStream> {
        debug!("Connecting to decryption oracle at {}", self.addr);
        TcpStream::connect(&self.addr)
            .await
            .map_err(|_| Error::ConnectionFailed {
                addr: self.addr.clone(),
            })
    }

    /// Send the request header and read the negotiated chunk size.
    async fn handshake(stream: &mut TcpStream, header: &[u8]) -> Result<usize> {
        stream.write_all(header).await?;

        let mut announced = [0u8; 4];
        stream.read_exact(&mut announced).await?;
        let chunk_size = u32::from_le_bytes(announced);
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }

        trace!("Oracle negotiated chunk size: {chunk_size}");
        Ok(chunk_size as usize)
    }

    /// Stream `input[start..]` through the oracle in chunks of at most
    /// `chunk_size` bytes, writing each transformed chunk into `output` at
    /// the same offset.
    ///
    /// The oracle may return a chunk in smaller fragments; reads are
    /// accumulated until the full chunk length is satisfied.
    async fn transform_body(
        stream: &mut TcpStream,
        input: &[u8],
        output: &mut [u8],
        start: usize,
        chunk_size: usize,
    ) -> Result<()> {
        let mut offset = start;
        while offset < input.len() {
            let len = chunk_size.min(input.len() - offset);
            stream.write_all(&input[offset..offset + len]).await?;

            let mut received = 0;
            while received < len {
                let n = stream.read(&mut output[offset + received..offset + len]).await?;
                if n == 0 {
                    return Err(Error::UnexpectedEof {
                        remaining: len - received,
                    });
                }
                received += n;
            }
            trace!("Transformed chunk at {offset:#x} ({len} bytes)");
            offset += len;
        }
        Ok(())
    }

    /// Send the session-end sentinel.
    async fn finish(stream: &mut TcpStream) -> Result<()> {
        stream
            .write_all(&SESSION_END_SENTINEL.to_le_bytes())
            .await?;
        Ok(())
    }
}
