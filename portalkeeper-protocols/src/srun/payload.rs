//! Encrypted login payload assembly

use super::challenge::Challenge;
use super::cipher;
use portalkeeper_core::{Credentials, Error, Result, ZoneConfig};
use serde::Serialize;
use std::net::IpAddr;

/// Marker tagging the info blob with the cipher/encoding version
pub const INFO_MARKER: &str = "{SRBX1}";

/// Info blob fields, serialized in exactly this order.
///
/// The server recomputes the checksum over these bytes, so the compact
/// serde_json layout (declaration order, no whitespace) is load-bearing.
#[derive(Serialize)]
struct InfoBlob<'a> {
    username: &'a str,
    password: &'a str,
    ip: String,
    acid: &'a str,
    enc_ver: &'a str,
}

/// Encrypted payload derived from one credentials/challenge pair.
///
/// A pure value: identical inputs always produce the identical triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// Marker-prefixed, cipher-encoded info blob
    pub info: String,
    /// Hex MD5 password digest
    pub password_digest: String,
    /// Hex SHA-1 over the checksum chain
    pub checksum: String,
}

/// Assemble the encrypted payload for one SRUN login attempt.
///
/// No network I/O; fails only on a malformed token.
pub fn build(
    credentials: &Credentials,
    ip: IpAddr,
    challenge: &Challenge,
    config: &ZoneConfig,
) -> Result<EncryptedPayload> {
    let token = challenge.token.as_str();
    cipher::validate_token(token)?;

    let ip_text = ip.to_string();
    let blob = InfoBlob {
        username: credentials.username(),
        password: credentials.password(),
        ip: ip_text.clone(),
        acid: &config.ac_id,
        enc_ver: &config.enc_ver,
    };
    let json = serde_json::to_string(&blob).map_err(|e| Error::protocol(e.to_string()))?;

    let encrypted = cipher::xencode(json.as_bytes(), token)?;
    let info = format!("{INFO_MARKER}{}", cipher::encode(&encrypted));
    let password_digest = cipher::password_digest(credentials.password(), token);
    let checksum = cipher::checksum(
        token,
        credentials.username(),
        &password_digest,
        &config.ac_id,
        &ip_text,
        &config.n,
        &config.client_type,
        &info,
    );

    Ok(EncryptedPayload {
        info,
        password_digest,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::SystemTime;

    fn test_inputs() -> (Credentials, IpAddr, Challenge, ZoneConfig) {
        (
            Credentials::new("alice", "secret").unwrap(),
            IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)),
            Challenge {
                token: "aabbccdd00112233".to_string(),
                issued_at: SystemTime::now(),
            },
            ZoneConfig::default(),
        )
    }

    #[test]
    fn test_info_blob_layout() {
        let blob = InfoBlob {
            username: "u",
            password: "p",
            ip: "1.2.3.4".to_string(),
            acid: "12",
            enc_ver: "srun_bx1",
        };
        assert_eq!(
            serde_json::to_string(&blob).unwrap(),
            r#"{"username":"u","password":"p","ip":"1.2.3.4","acid":"12","enc_ver":"srun_bx1"}"#
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let (creds, ip, challenge, config) = test_inputs();
        let a = build(&creds, ip, &challenge, &config).unwrap();
        let b = build(&creds, ip, &challenge, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_shapes() {
        let (creds, ip, challenge, config) = test_inputs();
        let payload = build(&creds, ip, &challenge, &config).unwrap();

        assert!(payload.info.starts_with(INFO_MARKER));
        assert_eq!(payload.password_digest.len(), 32);
        assert_eq!(payload.checksum.len(), 40);
    }

    #[test]
    fn test_build_info_round_trips_through_cipher() {
        let (creds, ip, challenge, config) = test_inputs();
        let payload = build(&creds, ip, &challenge, &config).unwrap();

        let encoded = payload.info.strip_prefix(INFO_MARKER).unwrap();
        let decrypted = cipher::xdecode(
            &cipher::decode(encoded).unwrap(),
            &challenge.token,
        )
        .unwrap();
        let json = String::from_utf8(decrypted).unwrap();
        assert_eq!(
            json,
            r#"{"username":"alice","password":"secret","ip":"10.1.2.3","acid":"12","enc_ver":"srun_bx1"}"#
        );
    }

    #[test]
    fn test_build_token_dependence() {
        let (creds, ip, challenge, config) = test_inputs();
        let other = Challenge {
            token: "112233aabbccdd00".to_string(),
            issued_at: SystemTime::now(),
        };

        let a = build(&creds, ip, &challenge, &config).unwrap();
        let b = build(&creds, ip, &other, &config).unwrap();
        assert_ne!(a.info, b.info);
        assert_ne!(a.password_digest, b.password_digest);
        assert_ne!(a.checksum, b.checksum);
    }

    #[test]
    fn test_build_rejects_malformed_token() {
        let (creds, ip, _, config) = test_inputs();
        let stale = Challenge {
            token: String::new(),
            issued_at: SystemTime::now(),
        };
        assert!(build(&creds, ip, &stale, &config).is_err());
    }
}
