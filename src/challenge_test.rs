// Unit tests for challenge URL detection

use super::*;

#[test]
fn test_challenge_urls_match() {
    assert!(is_challenge_url(
        "https://www.linkedin.com/checkpoint/challenge"
    ));
    assert!(is_challenge_url(
        "https://www.linkedin.com/checkpoint/challenge/verify?foo=bar"
    ));
    assert!(is_challenge_url(
        "https://www.linkedin.com/checkpoint/challengesV2/AQHxxx"
    ));
}

#[test]
fn test_normal_urls_do_not_match() {
    assert!(!is_challenge_url("https://www.linkedin.com/feed/"));
    assert!(!is_challenge_url("https://www.linkedin.com/login"));
    assert!(!is_challenge_url("https://www.linkedin.com/"));
    assert!(!is_challenge_url(""));
}

#[test]
fn test_prefix_matching_is_exact() {
    // Same path on a different host must not be treated as a challenge
    assert!(!is_challenge_url(
        "https://example.com/checkpoint/challenge"
    ));
    // Other checkpoint pages (e.g. logout confirmation) are not challenges
    assert!(!is_challenge_url(
        "https://www.linkedin.com/checkpoint/other"
    ));
}
