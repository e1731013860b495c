//! Compact string form of a [`FocusDescriptor`].
//!
//! The encoded form is meant to live in a single HTML attribute, so it is
//! short and free of `=` padding. Version 1 layout:
//!
//! ```text
//! base64( json( [1, round(x*100), round(y*100), width, height, fit, blurhash|null] ) )
//! ```
//!
//! `fit` is `1` for cover and `0` for contain. Focus axes keep two decimal
//! digits; that is enough for human-perceptible cropping and keeps the string
//! small.
//!
//! Decoding is lenient about individual fields (missing or wrong-typed fields
//! fall back to defaults) but strict about shape: text that is not a base64
//! JSON array is [`CodecError::Malformed`], and any version other than 1 is
//! [`CodecError::UnsupportedVersion`].

use crate::focus::{Fit, FocusDescriptor, FocusPoint};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;
use thiserror::Error;

/// The only format version this crate reads or writes.
pub const CURRENT_VERSION: u32 = 1;

const CONFIG: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, CONFIG);
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, CONFIG);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unsupported focus encoding version: {0}")]
    UnsupportedVersion(String),
    #[error("malformed focus string: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Encode a descriptor with the given format version.
///
/// Only [`CURRENT_VERSION`] is accepted.
pub fn encode_version(focus: &FocusDescriptor, version: u32) -> Result<String> {
    if version != CURRENT_VERSION {
        return Err(CodecError::UnsupportedVersion(version.to_string()));
    }

    let tuple = Value::Array(vec![
        Value::from(version),
        Value::from(percent(focus.x())),
        Value::from(percent(focus.y())),
        Value::from(focus.width),
        Value::from(focus.height),
        Value::from(match focus.fit {
            Fit::Cover => 1,
            Fit::Contain => 0,
        }),
        focus
            .blurhash
            .as_deref()
            .filter(|h| !h.is_empty())
            .map_or(Value::Null, Value::from),
    ]);

    Ok(STANDARD.encode(tuple.to_string()))
}

/// Encode a descriptor in the current format.
pub fn encode(focus: &FocusDescriptor) -> String {
    // CURRENT_VERSION is always accepted.
    encode_version(focus, CURRENT_VERSION).unwrap_or_default()
}

/// Decode a string produced by [`encode`] (or any other version-1 encoder).
pub fn decode(data: &str) -> Result<FocusDescriptor> {
    let data = data.trim();
    let bytes = STANDARD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data))
        .map_err(|e| CodecError::Malformed(format!("not base64: {e}")))?;

    let fields = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(fields)) => fields,
        Ok(other) => {
            return Err(CodecError::Malformed(format!(
                "expected a JSON array, found {}",
                kind(&other)
            )));
        }
        Err(e) => return Err(CodecError::Malformed(format!("not JSON: {e}"))),
    };

    match fields.first() {
        Some(v) if v.as_f64() == Some(f64::from(CURRENT_VERSION)) => {}
        Some(v) => return Err(CodecError::UnsupportedVersion(v.to_string())),
        None => return Err(CodecError::UnsupportedVersion("missing".into())),
    }

    let field = |i: usize| fields.get(i).unwrap_or(&Value::Null);

    let point = FocusPoint::new(
        field(1).as_f64().map_or(0.0, |v| v / 100.0),
        field(2).as_f64().map_or(0.0, |v| v / 100.0),
    );
    let fit = match field(5).as_f64() {
        Some(f) if f == 0.0 => Fit::Contain,
        _ => Fit::Cover,
    };
    let blurhash = field(6)
        .as_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    Ok(FocusDescriptor {
        point,
        width: dimension(field(3)),
        height: dimension(field(4)),
        fit,
        blurhash,
    })
}

/// `round(v * 100)` with ties toward positive infinity, so `-0.125` becomes
/// `-12` as it does in JavaScript encoders.
fn percent(v: f64) -> i64 {
    (v * 100.0 + 0.5).floor() as i64
}

fn dimension(v: &Value) -> u32 {
    v.as_f64()
        .filter(|d| d.is_finite() && *d > 0.0)
        .map_or(0, |d| d.round().min(u32::MAX as f64) as u32)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> String {
        STANDARD.encode(json)
    }

    fn sample() -> FocusDescriptor {
        FocusDescriptor::new(FocusPoint::new(0.28, -0.33))
            .with_size(2400, 1400)
            .with_fit(Fit::Cover)
            .with_blurhash("L6Pj0^i:u2T0")
    }

    #[test]
    fn roundtrip_reproduces_sample_descriptor() {
        let decoded = decode(&encode(&sample())).unwrap();
        assert!((decoded.x() - 0.28).abs() <= 0.01);
        assert!((decoded.y() + 0.33).abs() <= 0.01);
        assert_eq!(decoded.width, 2400);
        assert_eq!(decoded.height, 1400);
        assert_eq!(decoded.fit, Fit::Cover);
        assert_eq!(decoded.blurhash.as_deref(), Some("L6Pj0^i:u2T0"));
    }

    #[test]
    fn roundtrip_contain_without_blurhash() {
        let d = FocusDescriptor::new(FocusPoint::new(-1.0, 1.0))
            .with_size(640, 480)
            .with_fit(Fit::Contain);
        assert_eq!(decode(&encode(&d)).unwrap(), d);
    }

    #[test]
    fn encoded_form_has_no_padding() {
        // 7 fields of varying width hit every padding remainder eventually.
        for w in 1..20u32 {
            let d = sample().with_size(w, w * 3);
            assert!(!encode(&d).contains('='), "padding in {}", encode(&d));
        }
    }

    #[test]
    fn encoded_payload_is_the_v1_tuple() {
        let bytes = STANDARD.decode(encode(&sample())).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[1,28,-33,2400,1400,1,"L6Pj0^i:u2T0"]"#
        );
    }

    #[test]
    fn precision_is_two_decimals() {
        let d = FocusDescriptor::new(FocusPoint::new(0.123456, -0.987654));
        let back = decode(&encode(&d)).unwrap();
        assert_eq!(back.x(), 0.12);
        assert_eq!(back.y(), -0.99);
    }

    #[test]
    fn ties_round_toward_positive_infinity() {
        assert_eq!(percent(0.125), 13);
        assert_eq!(percent(-0.125), -12);
        assert_eq!(percent(-0.5), -50);
    }

    #[test]
    fn encode_rejects_other_versions() {
        assert_eq!(
            encode_version(&sample(), 2),
            Err(CodecError::UnsupportedVersion("2".into()))
        );
        assert!(encode_version(&sample(), 0).is_err());
    }

    #[test]
    fn decode_rejects_other_versions_regardless_of_fields() {
        for json in [
            r#"[2,28,-33,2400,1400,1,"L6Pj0^i:u2T0"]"#,
            r#"[0]"#,
            r#"["1",0,0,10,10,1,null]"#,
            r#"[1.5,0,0,10,10,1,null]"#,
            r#"[null]"#,
            r#"[]"#,
        ] {
            assert!(
                matches!(decode(&raw(json)), Err(CodecError::UnsupportedVersion(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn decode_accepts_float_version_one() {
        let d = decode(&raw(r#"[1.0,28,-33,2400,1400,1,"L6Pj0^i:u2T0"]"#)).unwrap();
        assert_eq!(d, sample());
    }

    #[test]
    fn decode_rejects_unparsable_input() {
        assert!(matches!(decode("!!!"), Err(CodecError::Malformed(_))));
        assert!(matches!(decode(&raw("not json")), Err(CodecError::Malformed(_))));
        assert!(matches!(decode(&raw("null")), Err(CodecError::Malformed(_))));
        assert!(matches!(
            decode(&raw(r#"{"version":1}"#)),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn decode_defaults_missing_fields() {
        let d = decode(&raw("[1]")).unwrap();
        assert_eq!(d, FocusDescriptor::default());
    }

    #[test]
    fn decode_defaults_falsy_fields() {
        let d = decode(&raw(r#"[1,null,"a",0,-5,"x",""]"#)).unwrap();
        assert_eq!(d.x(), 0.0);
        assert_eq!(d.y(), 0.0);
        assert_eq!(d.width, 0);
        assert_eq!(d.height, 0);
        assert_eq!(d.fit, Fit::Cover);
        assert_eq!(d.blurhash, None);
    }

    #[test]
    fn decode_fit_zero_is_contain() {
        assert_eq!(decode(&raw("[1,0,0,1,1,0]")).unwrap().fit, Fit::Contain);
        assert_eq!(decode(&raw("[1,0,0,1,1,1]")).unwrap().fit, Fit::Cover);
        assert_eq!(decode(&raw("[1,0,0,1,1,7]")).unwrap().fit, Fit::Cover);
    }

    #[test]
    fn decode_clamps_out_of_range_focus() {
        let d = decode(&raw("[1,250,-400,10,10,1,null]")).unwrap();
        assert_eq!(d.x(), 1.0);
        assert_eq!(d.y(), -1.0);
    }

    #[test]
    fn decode_accepts_padded_and_url_safe_input() {
        let json = r#"[1,10,-10,99,99,1,"L?~~"]"#;
        let padded = base64::engine::general_purpose::STANDARD.encode(json);
        let url_safe = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json);
        assert_eq!(decode(&padded).unwrap(), decode(&url_safe).unwrap());
        assert_eq!(decode(&padded).unwrap().blurhash.as_deref(), Some("L?~~"));
    }
}
