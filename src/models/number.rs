// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lenient numeric fields.
//!
//! Form inputs arrive as strings, and older snapshots stored edited values as
//! strings too. Both forms are accepted and normalized to `f64`; validation
//! decides whether the value is usable.

use serde::{Deserialize, Deserializer};

/// Parse a form value the way a browser number coercion does:
/// blank reads as zero, anything unparseable reads as NaN.
pub fn parse_form_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// Deserialize a JSON number or a numeric string into `f64`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(f64),
        Text(String),
    }

    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(n) => n,
        RawNumber::Text(s) => parse_form_number(&s),
    })
}
