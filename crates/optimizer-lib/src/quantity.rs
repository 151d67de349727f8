//! Kubernetes quantity parsing
//!
//! Collectors hand over either already-normalized numbers or the raw
//! quantity strings found in manifests (`"250m"`, `"512Mi"`, `"10Gi"`).
//! Everything is normalized here: CPU to cores, memory to bytes, storage to GB.

use serde::{Deserialize, Deserializer};

use crate::error::SnapshotError;

/// Bytes in one KiB
pub const KIB: u64 = 1024;
/// Bytes in one MiB
pub const MIB: u64 = KIB * 1024;
/// Bytes in one GiB
pub const GIB: u64 = MIB * 1024;

/// Memory suffixes, binary first so `Mi` wins over `M`
const MEMORY_UNITS: &[(&str, u64)] = &[
    ("Ki", KIB),
    ("Mi", MIB),
    ("Gi", GIB),
    ("Ti", GIB * 1024),
    ("K", 1_000),
    ("k", 1_000),
    ("M", 1_000_000),
    ("G", 1_000_000_000),
    ("T", 1_000_000_000_000),
];

/// Parse a CPU quantity into cores
pub fn parse_cpu(raw: &str) -> Result<f64, SnapshotError> {
    let value = raw.trim();
    if value.is_empty() || value == "0" {
        return Ok(0.0);
    }

    let cores = if let Some(milli) = value.strip_suffix('m') {
        parse_number(milli, raw)? / 1_000.0
    } else if let Some(nano) = value.strip_suffix('n') {
        parse_number(nano, raw)? / 1_000_000_000.0
    } else {
        parse_number(value, raw)?
    };

    non_negative(cores, raw)
}

/// Parse a memory quantity into bytes
pub fn parse_memory(raw: &str) -> Result<u64, SnapshotError> {
    let value = raw.trim();
    if value.is_empty() || value == "0" {
        return Ok(0);
    }

    for (suffix, multiplier) in MEMORY_UNITS {
        if let Some(number) = value.strip_suffix(suffix) {
            let bytes = non_negative(parse_number(number, raw)?, raw)?;
            return Ok((bytes * *multiplier as f64) as u64);
        }
    }

    let bytes = non_negative(parse_number(value, raw)?, raw)?;
    Ok(bytes as u64)
}

/// Parse a storage quantity into GB
///
/// `Gi` and `G` are both treated as one GB of billable disk, which is how
/// persistent disk pricing is quoted.
pub fn parse_storage_gb(raw: &str) -> Result<f64, SnapshotError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0.0);
    }

    let upper = value.to_ascii_uppercase();
    let gb = if let Some(n) = upper.strip_suffix("GI") {
        parse_number(n, raw)?
    } else if let Some(n) = upper.strip_suffix("TI") {
        parse_number(n, raw)? * 1024.0
    } else if let Some(n) = upper.strip_suffix("MI") {
        parse_number(n, raw)? / 1024.0
    } else if let Some(n) = upper.strip_suffix('G') {
        parse_number(n, raw)?
    } else if let Some(n) = upper.strip_suffix('T') {
        parse_number(n, raw)? * 1000.0
    } else if let Some(n) = upper.strip_suffix('M') {
        parse_number(n, raw)? / 1000.0
    } else {
        parse_number(&upper, raw)? / GIB as f64
    };

    non_negative(gb, raw)
}

/// Convert bytes to GiB as a float
pub fn bytes_to_gib(bytes: f64) -> f64 {
    bytes / GIB as f64
}

fn parse_number(number: &str, raw: &str) -> Result<f64, SnapshotError> {
    number
        .trim()
        .parse::<f64>()
        .map_err(|e| SnapshotError::invalid_quantity(raw, e.to_string()))
}

/// Negative zero is folded into `0.0` so downstream orderings see one zero
fn non_negative(value: f64, raw: &str) -> Result<f64, SnapshotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value.abs())
    } else {
        Err(SnapshotError::invalid_quantity(
            raw,
            "quantity must be a finite, non-negative number",
        ))
    }
}

/// A quantity as it appears in collector JSON
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityValue {
    Number(f64),
    Text(String),
}

/// Serde adapters for quantity fields; `null` and absent fields become zero
pub(crate) mod de {
    use super::*;
    use serde::de::Error;

    fn read<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<QuantityValue>, D::Error> {
        Option::<QuantityValue>::deserialize(deserializer)
    }

    fn checked<E: Error>(value: f64) -> Result<f64, E> {
        if value.is_finite() && value >= 0.0 {
            Ok(value.abs())
        } else {
            Err(E::custom(format!("quantity must be non-negative, got {value}")))
        }
    }

    pub fn cpu<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(optional_cpu(deserializer)?.unwrap_or(0.0))
    }

    pub fn memory<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Ok(optional_memory(deserializer)?.unwrap_or(0))
    }

    pub fn storage_gb<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match read(deserializer)? {
            None => Ok(0.0),
            Some(QuantityValue::Number(gb)) => checked(gb),
            Some(QuantityValue::Text(raw)) => parse_storage_gb(&raw).map_err(D::Error::custom),
        }
    }

    pub fn optional_cpu<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match read(deserializer)? {
            None => Ok(None),
            Some(QuantityValue::Number(cores)) => checked(cores).map(Some),
            Some(QuantityValue::Text(raw)) => parse_cpu(&raw).map(Some).map_err(D::Error::custom),
        }
    }

    pub fn optional_memory<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        match read(deserializer)? {
            None => Ok(None),
            Some(QuantityValue::Number(bytes)) => checked(bytes).map(|b| Some(b as u64)),
            Some(QuantityValue::Text(raw)) => {
                parse_memory(&raw).map(Some).map_err(D::Error::custom)
            }
        }
    }
}
