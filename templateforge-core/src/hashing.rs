//! Hashing - job and content fingerprints
//!
//! A job hash identifies the request; a content hash identifies the pixels.
//! Equal inputs must give equal hashes on every run.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::templates::GenerationInputs;

/// SHA-256 of bytes as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// JSON with object keys sorted at every depth and no whitespace
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    to_string(&sort_keys(v))
}

fn sort_keys(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// job_hash = sha256(canonical inputs + ":" + engine version)
pub fn compute_job_hash(inputs: &GenerationInputs, engine_version: &str) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(inputs)?;
    Ok(sha256_hex(format!("{}:{}", canonical, engine_version).as_bytes()))
}

/// Fingerprint of raw RGBA pixels, prefixed with the surface size so that
/// equal byte runs at different shapes do not collide.
pub fn content_hash(width: u32, height: u32, rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(width.to_be_bytes());
    hasher.update(height.to_be_bytes());
    hasher.update(rgba);
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{ColorScheme, DesignTone, TemplateType};
    use serde_json::json;

    fn inputs() -> GenerationInputs {
        GenerationInputs::new("Launch Post", "founders", TemplateType::Flyer, DesignTone::Bold, ColorScheme::Warm)
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": {"y": 2, "b": 3}, "m": [{"k": 1, "c": 2}]});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":{"b":3,"y":2},"m":[{"c":2,"k":1}],"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_job_hash_stable_and_input_sensitive() {
        let h1 = compute_job_hash(&inputs(), "1.0.0").unwrap();
        let h2 = compute_job_hash(&inputs(), "1.0.0").unwrap();
        assert_eq!(h1, h2);

        let mut other = inputs();
        other.target_audience = "investors".to_string();
        assert_ne!(h1, compute_job_hash(&other, "1.0.0").unwrap());
        assert_ne!(h1, compute_job_hash(&inputs(), "1.0.1").unwrap());
    }

    #[test]
    fn test_content_hash_includes_shape() {
        let pixels = [0u8; 16];
        assert_ne!(content_hash(2, 2, &pixels), content_hash(4, 1, &pixels));
        assert_eq!(content_hash(2, 2, &pixels), content_hash(2, 2, &pixels));
    }
}
