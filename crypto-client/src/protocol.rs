//! Wire protocol constants and request header assembly
//!
//! The request header is a fixed 1024-byte block. All integers are
//! little-endian.
//!
//! | offset | width | meaning                                  |
//! |--------|-------|------------------------------------------|
//! | 0x00   | 4     | magic (`0xCAFEBABE`)                     |
//! | 0x04   | 4     | payload length                           |
//! | 0x08   | 4     | mode selector                            |
//! | 0x0C   | 4     | secondary mode selector                  |
//! | 0x10   | 16    | key material (key-Y; zeroed outside test)|
//! | 0x20   | 16    | initialization vector                    |

/// Size of the request header in bytes.
pub const REQUEST_HEADER_LEN: usize = 1024;

/// Magic constant opening every request header.
pub const REQUEST_MAGIC: u32 = 0xCAFE_BABE;

/// Session-end sentinel, sent as an 8-byte little-endian value.
pub const SESSION_END_SENTINEL: u64 = 0xDEAD_CAFE;

/// Length of the header that BOSS archives themselves carry; only the
/// bytes after it are streamed through the oracle.
pub const BOSS_HEADER_LEN: usize = 0x28;

/// Offset within a BOSS archive of the 12 bytes that seed the IV.
pub const BOSS_IV_SEED_OFFSET: usize = 0x1C;

/// Number of IV bytes taken from the archive.
pub const BOSS_IV_SEED_LEN: usize = 0xC;

/// Mode selector for decrypting a BOSS archive body.
pub const MODE_BOSS_DECRYPT: u32 = 3;

/// Secondary mode selector for decrypting a BOSS archive body.
pub const SUBMODE_BOSS_DECRYPT: u32 = 3;

/// Mode selector for the self-test transform.
pub const MODE_SELF_TEST: u32 = 0x2C | 0x80 | 0x40;

/// Secondary mode selector for the self-test transform.
pub const SUBMODE_SELF_TEST: u32 = 1;

/// Ciphertext streamed during the self-test. With the all-zero test key
/// and IV it must decrypt to 16 zero bytes.
pub const SELF_TEST_VECTOR: [u8; 16] = [
    0xBC, 0xC4, 0x16, 0x2C, 0x2A, 0x06, 0x91, 0xEE, 0x47, 0x18, 0x86, 0xB8, 0xEB, 0x2F, 0xB5, 0x48,
];

/// Assemble a request header.
///
/// `key_y` and `iv` land at offsets 0x10 and 0x20; everything else in the
/// 1024-byte block stays zero.
pub fn request_header(
    payload_len: u32,
    mode: u32,
    submode: u32,
    key_y: &[u8; 16],
    iv: &[u8; 16],
) -> [u8; REQUEST_HEADER_LEN] {
    let mut header = [0u8; REQUEST_HEADER_LEN];
    header[0..4].copy_from_slice(&REQUEST_MAGIC.to_le_bytes());
    header[4..8].copy_from_slice(&payload_len.to_le_bytes());
    header[8..0xC].copy_from_slice(&mode.to_le_bytes());
    header[0xC..0x10].copy_from_slice(&submode.to_le_bytes());
    header[0x10..0x20].copy_from_slice(key_y);
    header[0x20..0x30].copy_from_slice(iv);
    header
}

/// Derive the IV for a BOSS archive: 12 bytes copied from the archive at
/// offset 0x1C, the final byte set to 1 (counter-start convention), the
/// rest zero.
pub fn boss_iv(archive: &[u8]) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..BOSS_IV_SEED_LEN]
        .copy_from_slice(&archive[BOSS_IV_SEED_OFFSET..BOSS_IV_SEED_OFFSET + BOSS_IV_SEED_LEN]);
    iv[0xF] = 1;
    iv
}
