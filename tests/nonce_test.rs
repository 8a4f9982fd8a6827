//! Nonce service integration tests.

use httpdigest::{extract_timestamp, generate_nonce, validate_nonce};
use std::thread;

#[test]
fn test_nonce_bound_to_secret() {
    let nonce = generate_nonce(1_700_000_000.0, "alpha", None);
    assert!(validate_nonce(&nonce, "alpha"));
    assert!(!validate_nonce(&nonce, "beta"));
    assert!(!validate_nonce(&nonce, ""));
}

#[test]
fn test_nonce_timestamp_cannot_be_moved() {
    let nonce = generate_nonce(100.0, "secret", Some("1A2B"));
    let forged = nonce.replacen("100", "999", 1);
    assert_eq!(extract_timestamp(&forged), Some(999.0));
    assert!(!validate_nonce(&forged, "secret"));
}

#[test]
fn test_same_salt_same_nonce() {
    let a = generate_nonce(3.5, "secret", Some("BEEF"));
    let b = generate_nonce(3.5, "secret", Some("BEEF"));
    assert_eq!(a, b);
}

#[test]
fn test_concurrent_generation() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let t = f64::from(i) * 10.0;
                (0..100)
                    .map(|_| generate_nonce(t, "shared", None))
                    .all(|nonce| {
                        validate_nonce(&nonce, "shared") && extract_timestamp(&nonce) == Some(t)
                    })
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
