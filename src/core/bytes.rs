//! Human-readable byte quantities ("5 GB", "512 MiB", "1,024 kB")

use regex_lite::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Display units, powers of 1000
const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Errors from parsing a byte quantity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytesError {
    #[error("empty byte quantity")]
    Empty,

    #[error("not a byte quantity: {0:?}")]
    Malformed(String),

    #[error("unknown byte unit {0:?}")]
    UnknownUnit(String),

    #[error("byte quantity {0:?} does not fit in 64 bits")]
    Overflow(String),
}

/// Parse a human-readable byte quantity.
///
/// Accepts SI units (`kB`, `MB`, `GB`, ...; powers of 1000) and IEC units
/// (`KiB`, `MiB`, `GiB`, ...; powers of 1024), case-insensitively, with or
/// without whitespace between number and unit. A bare number is bytes.
/// Commas are treated as thousands separators.
pub fn parse_bytes(text: &str) -> Result<u64, BytesError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.is_empty() {
        return Err(BytesError::Empty);
    }

    static QUANTITY: OnceLock<Regex> = OnceLock::new();
    let regex = QUANTITY
        .get_or_init(|| Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*([a-z]*)$").unwrap());

    let caps = regex
        .captures(&cleaned)
        .ok_or_else(|| BytesError::Malformed(text.trim().to_string()))?;
    let number = &caps[1];
    let unit = &caps[2];

    let multiplier =
        unit_multiplier(unit).ok_or_else(|| BytesError::UnknownUnit(unit.to_string()))?;

    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| BytesError::Overflow(text.trim().to_string()));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| BytesError::Malformed(text.trim().to_string()))?;
    let bytes = (value * multiplier as f64).round();
    if bytes >= u64::MAX as f64 {
        return Err(BytesError::Overflow(text.trim().to_string()));
    }
    Ok(bytes as u64)
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit {
        "" | "b" => 1,
        "k" | "kb" => 1000,
        "ki" | "kib" => 1 << 10,
        "m" | "mb" => 1000u64.pow(2),
        "mi" | "mib" => 1 << 20,
        "g" | "gb" => 1000u64.pow(3),
        "gi" | "gib" => 1 << 30,
        "t" | "tb" => 1000u64.pow(4),
        "ti" | "tib" => 1 << 40,
        "p" | "pb" => 1000u64.pow(5),
        "pi" | "pib" => 1 << 50,
        "e" | "eb" => 1000u64.pow(6),
        "ei" | "eib" => 1 << 60,
        _ => return None,
    };
    Some(multiplier)
}

/// Format a byte count with SI units, e.g. `82854982` -> `"83 MB"`.
///
/// One decimal place below 10 in the chosen unit, none above.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1000 && exponent < SI_UNITS.len() - 1 {
        scaled /= 1000;
        exponent += 1;
    }

    let mut value = rounded(bytes as f64 / 1000f64.powi(exponent as i32));
    if value >= 1000.0 && exponent < SI_UNITS.len() - 1 {
        exponent += 1;
        value = rounded(bytes as f64 / 1000f64.powi(exponent as i32));
    }

    if value < 10.0 {
        format!("{:.1} {}", value, SI_UNITS[exponent])
    } else {
        format!("{:.0} {}", value, SI_UNITS[exponent])
    }
}

/// Round to the precision `format_bytes` displays
fn rounded(value: f64) -> f64 {
    let tenths = (value * 10.0 + 0.5).floor() / 10.0;
    if tenths < 10.0 {
        tenths
    } else {
        value.round()
    }
}
