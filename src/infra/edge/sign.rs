//! TC3-HMAC-SHA256 request signing for the remote purge API.
//!
//! The scheme hashes a canonical representation of the request, derives a
//! signing key from the account secret through a chain of HMAC steps (date,
//! service, fixed suffix), and emits the final `Authorization` header value.

use sha2::{Digest, Sha256};
use time::OffsetDateTime;

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Everything the signature covers.
pub(crate) struct SigningInput<'a> {
    pub secret_id: &'a str,
    pub secret_key: &'a str,
    pub host: &'a str,
    pub service: &'a str,
    pub action: &'a str,
    pub timestamp: i64,
    pub payload: &'a str,
}

/// Build the `Authorization` header value for a signed `POST /`.
pub(crate) fn authorization(input: &SigningInput<'_>) -> String {
    let date = utc_date(input.timestamp);
    let credential_scope = format!("{date}/{}/tc3_request", input.service);
    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{credential_scope}\n{}",
        input.timestamp,
        sha256_hex(canonical_request(input).as_bytes())
    );

    let secret_date = hmac_sha256(format!("TC3{}", input.secret_key).as_bytes(), date.as_bytes());
    let secret_service = hmac_sha256(&secret_date, input.service.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        input.secret_id
    )
}

fn canonical_request(input: &SigningInput<'_>) -> String {
    format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{}\nx-tc-action:{}\n\n{SIGNED_HEADERS}\n{}",
        input.host,
        input.action.to_ascii_lowercase(),
        sha256_hex(input.payload.as_bytes())
    )
}

/// UTC calendar date of the signing timestamp, `YYYY-MM-DD`.
fn utc_date(timestamp: i64) -> String {
    let moment =
        OffsetDateTime::from_unix_timestamp(timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let (year, month, day) = moment.to_calendar_date();
    format!("{year:04}-{:02}-{day:02}", month as u8)
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// HMAC-SHA256 per RFC 2104 over the `sha2` digest; keys longer than one
/// block are pre-hashed.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    const BLOCK_LEN: usize = 64;

    let mut block = [0u8; BLOCK_LEN];
    if key.len() > BLOCK_LEN {
        let digest = Sha256::digest(key);
        block[..digest.len()].copy_from_slice(&digest);
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut ipad = [0x36u8; BLOCK_LEN];
    let mut opad = [0x5cu8; BLOCK_LEN];
    for i in 0..BLOCK_LEN {
        ipad[i] ^= block[i];
        opad[i] ^= block[i];
    }

    let inner = Sha256::new()
        .chain_update(ipad)
        .chain_update(message)
        .finalize();
    let outer = Sha256::new().chain_update(opad).chain_update(inner).finalize();
    outer.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(payload: &'a str, secret_key: &'a str) -> SigningInput<'a> {
        SigningInput {
            secret_id: "AKIDexample",
            secret_key,
            host: "teo.tencentcloudapi.com",
            service: "teo",
            action: "CreatePurgeTask",
            timestamp: 1_700_000_000,
            payload,
        }
    }

    #[test]
    fn hmac_matches_rfc_4231_vectors() {
        // RFC 4231 test case 1.
        let digest = hmac_sha256(&[0x0b; 20], b"Hi There");
        assert_eq!(
            hex::encode(digest),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );

        // RFC 4231 test case 2.
        let digest = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(digest),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn utc_date_is_derived_from_the_timestamp() {
        assert_eq!(utc_date(0), "1970-01-01");
        assert_eq!(utc_date(1_700_000_000), "2023-11-14");
    }

    #[test]
    fn canonical_request_embeds_the_payload_hash_not_the_payload() {
        let payload = r#"{"ZoneId":"zone-1"}"#;
        let canonical = canonical_request(&input(payload, "secret"));

        assert!(canonical.starts_with("POST\n/\n\n"));
        assert!(canonical.contains("x-tc-action:createpurgetask\n"));
        assert!(canonical.contains("host:teo.tencentcloudapi.com\n"));
        assert!(!canonical.contains("zone-1"));
        let hash = canonical.rsplit('\n').next().expect("hash line");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn authorization_carries_scope_and_signature() {
        let header = authorization(&input("{}", "secret"));

        assert!(header.starts_with("TC3-HMAC-SHA256 Credential=AKIDexample/2023-11-14/teo/tc3_request, "));
        assert!(header.contains("SignedHeaders=content-type;host;x-tc-action, "));
        let signature = header.rsplit("Signature=").next().expect("signature");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_deterministic_and_keyed() {
        let first = authorization(&input("{}", "secret"));
        let second = authorization(&input("{}", "secret"));
        assert_eq!(first, second);

        let other_key = authorization(&input("{}", "different"));
        assert_ne!(first, other_key);

        let other_payload = authorization(&input(r#"{"Type":"purge_all"}"#, "secret"));
        assert_ne!(first, other_payload);
    }
}
