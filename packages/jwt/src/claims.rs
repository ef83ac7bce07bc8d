//! Claims stamping and time-claim validation

use crate::error::{JwtError, JwtResult};
use serde_json::{Map, Value};

/// Parse decoded claims bytes as a JSON object
pub(crate) fn parse_claims_object(bytes: &[u8]) -> JwtResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        _ => Err(JwtError::invalid_claims("JWT Claims Set must be a top-level JSON object")),
    }
}

/// Set `iat` to `now` and `exp` to `now + lifetime_secs`, replacing any
/// values already present
pub fn stamp_issued(claims: &mut Map<String, Value>, now: i64, lifetime_secs: i64) {
    claims.insert("iat".to_string(), Value::from(now));
    claims.insert("exp".to_string(), Value::from(now.saturating_add(lifetime_secs)));
}

/// Check the registered time claims against `now` (seconds since the epoch)
///
/// - `exp`, if present, must be a number greater than `now`
/// - `nbf`, if present, must be a number not greater than `now`
/// - `iat`, if present, must be a number
///
/// # Errors
/// `InvalidClaims` for non-numeric claims, `TokenExpired` or
/// `TokenNotYetValid` for failed checks.
pub fn validate_time_claims(claims: &Map<String, Value>, now: i64) -> JwtResult<()> {
    if let Some(exp) = numeric_claim(claims, "exp")? {
        if exp <= now as f64 {
            return Err(JwtError::TokenExpired);
        }
    }

    if let Some(nbf) = numeric_claim(claims, "nbf")? {
        if nbf > now as f64 {
            return Err(JwtError::TokenNotYetValid);
        }
    }

    numeric_claim(claims, "iat")?;
    Ok(())
}

fn numeric_claim(claims: &Map<String, Value>, name: &str) -> JwtResult<Option<f64>> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| JwtError::InvalidClaims(format!("\"{name}\" claim must be a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn claims(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_stamp_overwrites_existing_times() {
        let mut c = claims(json!({"sub": "x", "iat": 1, "exp": 2}));
        stamp_issued(&mut c, NOW, 7200);
        assert_eq!(c["iat"], json!(NOW));
        assert_eq!(c["exp"], json!(NOW + 7200));
        assert_eq!(c.keys().next().map(String::as_str), Some("sub"));
    }

    #[test]
    fn test_absent_claims_pass() {
        assert!(validate_time_claims(&claims(json!({"sub": "x"})), NOW).is_ok());
    }

    #[test]
    fn test_exp_boundary() {
        assert_eq!(
            validate_time_claims(&claims(json!({"exp": NOW})), NOW),
            Err(JwtError::TokenExpired)
        );
        assert!(validate_time_claims(&claims(json!({"exp": NOW + 1})), NOW).is_ok());
    }

    #[test]
    fn test_nbf_boundary() {
        assert!(validate_time_claims(&claims(json!({"nbf": NOW})), NOW).is_ok());
        assert_eq!(
            validate_time_claims(&claims(json!({"nbf": NOW + 1})), NOW),
            Err(JwtError::TokenNotYetValid)
        );
    }

    #[test]
    fn test_non_numeric_claims_are_rejected() {
        for name in ["exp", "nbf", "iat"] {
            let mut c = Map::new();
            c.insert(name.to_string(), json!("soon"));
            let err = validate_time_claims(&c, NOW).unwrap_err();
            assert_eq!(err.to_string(), format!("\"{name}\" claim must be a number"));
        }
    }

    #[test]
    fn test_non_object_claims_are_rejected() {
        assert!(parse_claims_object(b"[1,2]").is_err());
        assert!(parse_claims_object(b"not json").is_err());
        assert!(parse_claims_object(br#"{"a":1}"#).is_ok());
    }
}
