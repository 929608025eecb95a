//! Twilio webhook signature validation.
//!
//! The provider signs each webhook with HMAC-SHA1 over the full request URL
//! followed by the form parameters sorted by key, each appended as
//! `key` + `value` with no separator. The base64 digest travels in the
//! `X-Twilio-Signature` header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Computes the signature the provider would produce for this request.
pub fn expected_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes())
        .expect("hmac accepts any key length");
    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies a webhook signature in constant time. An undecodable header
/// fails closed.
pub fn validate(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    provided: &str,
) -> bool {
    let Ok(provided_bytes) = BASE64.decode(provided) else {
        return false;
    };

    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes())
        .expect("hmac accepts any key length");
    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    mac.verify_slice(&provided_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // Fixture from the provider's documented signing example.
    const DOC_URL: &str = "https://mycompany.com/myapp.php?foo=1&bar=2";
    const DOC_TOKEN: &str = "12345";

    fn doc_params() -> Vec<(String, String)> {
        params(&[
            ("Digits", "1234"),
            ("To", "+18005551212"),
            ("From", "+14158675310"),
            ("Caller", "+14158675310"),
            ("CallSid", "CA1234567890ABCDE"),
        ])
    }

    #[test]
    fn test_documented_example_signature() {
        let sig = expected_signature(DOC_TOKEN, DOC_URL, &doc_params());
        assert_eq!(sig, "GvWf1cFY/Q7PnoempGyD5oXAezc=");
    }

    #[test]
    fn test_validate_accepts_matching_signature() {
        let params = doc_params();
        let sig = expected_signature(DOC_TOKEN, DOC_URL, &params);
        assert!(validate(DOC_TOKEN, DOC_URL, &params, &sig));
    }

    #[test]
    fn test_validate_rejects_tampered_params() {
        let mut tampered = doc_params();
        let sig = expected_signature(DOC_TOKEN, DOC_URL, &tampered);
        tampered[0].1 = "9999".to_string();
        assert!(!validate(DOC_TOKEN, DOC_URL, &tampered, &sig));
    }

    #[test]
    fn test_validate_rejects_wrong_token() {
        let params = doc_params();
        let sig = expected_signature(DOC_TOKEN, DOC_URL, &params);
        assert!(!validate("67890", DOC_URL, &params, &sig));
    }

    #[test]
    fn test_validate_rejects_garbage_header() {
        assert!(!validate(DOC_TOKEN, DOC_URL, &doc_params(), "not base64 %%%"));
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let mut shuffled = doc_params();
        shuffled.reverse();
        let sig = expected_signature(DOC_TOKEN, DOC_URL, &doc_params());
        assert!(validate(DOC_TOKEN, DOC_URL, &shuffled, &sig));
    }
}
