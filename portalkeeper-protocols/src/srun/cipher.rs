//! SRUN portal cipher primitives
//!
//! Reproduces the portal vendor's encoding exactly: an MD5 password
//! digest, a word-based block cipher keyed by the challenge token, a
//! base64 variant over the vendor's 64-character alphabet, and the SHA-1
//! checksum chain. The constants are protocol-fixed; the server silently
//! rejects any deviation, so they are kept as literals and never derived.

use base64::alphabet::Alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::Engine;
use md5::{Digest, Md5};
use portalkeeper_core::{Error, Result};
use sha1::Sha1;

/// Mixing constant accumulated once per cipher round
const DELTA: u32 = 0x9E37_79B9;

/// The portal's base64 alphabet. Not the RFC alphabet; substitution only,
/// standard bit grouping.
const ALPHABET_CHARS: &str = "LVoJPiCN2R8G90yg+hmFHuacZ1OWMnrsSTXkYpUq/3dlbfKwv6xztjI7DeBE45QA";

const ALPHABET: Alphabet = match Alphabet::new(ALPHABET_CHARS) {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("portal alphabet must be 64 unique ASCII characters"),
};

const PORTAL_B64: GeneralPurpose = GeneralPurpose::new(&ALPHABET, PAD);

/// Reject empty or non-hex challenge tokens before any cipher use.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::InvalidChallenge("token is empty".to_string()));
    }
    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidChallenge(
            "token contains non-hex characters".to_string(),
        ));
    }
    Ok(())
}

/// Lowercase hex MD5 of `password || token`.
///
/// The concatenation order is a protocol contract; the server computes
/// the same digest to verify the password field.
pub fn password_digest(password: &str, token: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Lowercase hex SHA-1 over the portal's interleaved checksum chain.
///
/// The token is prepended to every field, in this exact field order;
/// the server rebuilds the same concatenation and compares digests.
#[allow(clippy::too_many_arguments)]
pub fn checksum(
    token: &str,
    username: &str,
    password_digest: &str,
    ac_id: &str,
    ip: &str,
    n: &str,
    client_type: &str,
    info: &str,
) -> String {
    let mut hasher = Sha1::new();
    for field in [username, password_digest, ac_id, ip, n, client_type, info] {
        hasher.update(token.as_bytes());
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Encode bytes with the portal alphabet.
pub fn encode(data: &[u8]) -> String {
    PORTAL_B64.encode(data)
}

/// Decode a portal-alphabet string back to bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    PORTAL_B64
        .decode(encoded)
        .map_err(|e| Error::protocol(format!("portal base64: {e}")))
}

/// Pack bytes into little-endian 32-bit words, zero-padding the final
/// partial word. With `append_len` the byte length is pushed as one
/// trailing word.
fn pack_words(data: &[u8], append_len: bool) -> Vec<u32> {
    let mut words = Vec::with_capacity(data.len() / 4 + 2);
    for chunk in data.chunks(4) {
        let mut bytes = [0u8; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        words.push(u32::from_le_bytes(bytes));
    }
    if append_len {
        words.push(data.len() as u32);
    }
    words
}

/// Unpack words back to bytes. With `trim_len` the final word carries the
/// original byte length, which must be consistent with the word count.
fn unpack_words(words: &[u32], trim_len: bool) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    if trim_len {
        let payload_words = words
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::protocol("cipher block too short"))?;
        let declared = words[payload_words] as usize;
        let upper = payload_words * 4;
        if declared + 3 < upper || declared > upper {
            return Err(Error::protocol("cipher length word out of range"));
        }
        bytes.truncate(declared);
    }
    Ok(bytes)
}

fn key_words(token: &str) -> Vec<u32> {
    let mut key = pack_words(token.as_bytes(), false);
    if key.len() < 4 {
        key.resize(4, 0);
    }
    key
}

/// Portal block cipher, forward direction.
///
/// The plaintext is word-packed with its length appended, then mixed for
/// `6 + 52/(n+1)` rounds with the token-derived key schedule. Empty input
/// encodes to empty output, matching the reference encoder.
pub fn xencode(plaintext: &[u8], token: &str) -> Result<Vec<u8>> {
    validate_token(token)?;
    if plaintext.is_empty() {
        return Ok(Vec::new());
    }

    let mut v = pack_words(plaintext, true);
    let key = key_words(token);

    let n = v.len() - 1;
    let rounds = 6 + 52 / (n + 1);
    let mut d: u32 = 0;
    let mut z = v[n];
    for _ in 0..rounds {
        d = d.wrapping_add(DELTA);
        let e = ((d >> 2) & 3) as usize;
        for p in 0..=n {
            let y = v[(p + 1) % (n + 1)];
            let mut m = (z >> 5) ^ (y << 2);
            m = m.wrapping_add(((y >> 3) ^ (z << 4)) ^ (d ^ y));
            m = m.wrapping_add(key[(p & 3) ^ e] ^ z);
            v[p] = v[p].wrapping_add(m);
            z = v[p];
        }
    }

    unpack_words(&v, false)
}

/// Portal block cipher, inverse direction.
///
/// Validates the embedded length word and fails on corrupt input.
pub fn xdecode(ciphertext: &[u8], token: &str) -> Result<Vec<u8>> {
    validate_token(token)?;
    if ciphertext.is_empty() {
        return Ok(Vec::new());
    }
    if ciphertext.len() % 4 != 0 || ciphertext.len() < 8 {
        return Err(Error::protocol(
            "cipher block must be at least two full words",
        ));
    }

    let mut v = pack_words(ciphertext, false);
    let key = key_words(token);

    let n = v.len() - 1;
    let rounds = (6 + 52 / (n + 1)) as u32;
    let mut d = DELTA.wrapping_mul(rounds);
    let mut y = v[0];
    while d != 0 {
        let e = ((d >> 2) & 3) as usize;
        for p in (0..=n).rev() {
            let z = if p == 0 { v[n] } else { v[p - 1] };
            let mut m = (z >> 5) ^ (y << 2);
            m = m.wrapping_add(((y >> 3) ^ (z << 4)) ^ (d ^ y));
            m = m.wrapping_add(key[(p & 3) ^ e] ^ z);
            v[p] = v[p].wrapping_sub(m);
            y = v[p];
        }
        d = d.wrapping_sub(DELTA);
    }

    unpack_words(&v, true)
}
