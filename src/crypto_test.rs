// Unit tests for the encrypted blob format

use super::*;

const SECRET: &str = "correct horse battery staple";
const PLAINTEXT: &[u8] = br#"{"li_at":{"name":"li_at","value":"tok","domain":".linkedin.com","path":"/"},"saved_at":"2025-01-01T00:00:00Z"}"#;

#[test]
fn test_seal_open_roundtrip() {
    let blob = seal(PLAINTEXT, SECRET).unwrap();
    let recovered = open(&blob, SECRET).unwrap();
    assert_eq!(recovered, PLAINTEXT);
}

#[test]
fn test_open_with_wrong_secret_fails_closed() {
    let blob = seal(PLAINTEXT, SECRET).unwrap();
    assert!(open(&blob, "wrong secret").is_none());
}

#[test]
fn test_open_tampered_ciphertext_fails_closed() {
    let blob = seal(PLAINTEXT, SECRET).unwrap();

    let mut ciphertext = BASE64.decode(&blob.ct).unwrap();
    ciphertext[0] ^= 0x01;
    let tampered = EncryptedBlob {
        s: blob.s.clone(),
        n: blob.n.clone(),
        ct: BASE64.encode(ciphertext),
    };

    assert!(open(&tampered, SECRET).is_none());
}

#[test]
fn test_open_with_swapped_salt_fails_closed() {
    let blob = seal(PLAINTEXT, SECRET).unwrap();
    let other = seal(PLAINTEXT, SECRET).unwrap();

    let spliced = EncryptedBlob {
        s: other.s,
        n: blob.n.clone(),
        ct: blob.ct.clone(),
    };
    assert!(open(&spliced, SECRET).is_none());
}

#[test]
fn test_open_malformed_fields_fail_closed() {
    let blob = EncryptedBlob {
        s: "not base64 !!!".to_string(),
        n: "also not".to_string(),
        ct: "nope".to_string(),
    };
    assert!(open(&blob, SECRET).is_none());

    let empty = EncryptedBlob {
        s: String::new(),
        n: String::new(),
        ct: String::new(),
    };
    assert!(open(&empty, SECRET).is_none());
}

#[test]
fn test_seal_never_reuses_salt_or_nonce() {
    let a = seal(PLAINTEXT, SECRET).unwrap();
    let b = seal(PLAINTEXT, SECRET).unwrap();
    assert_ne!(a.s, b.s);
    assert_ne!(a.n, b.n);
    assert_ne!(a.ct, b.ct);
}

#[test]
fn test_blob_json_shape() {
    let blob = seal(PLAINTEXT, SECRET).unwrap();
    let json = serde_json::to_string(&blob).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["s", "n", "ct"] {
        let encoded = value.get(field).and_then(|v| v.as_str()).unwrap();
        assert!(BASE64.decode(encoded).is_ok(), "{} is not base64", field);
    }
}
