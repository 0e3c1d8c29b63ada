use jiff::Timestamp;
use rand::Rng;

use crate::error::{QaError, Result};
use crate::types::TestCaseId;

/// Prefix shared by all generated test case IDs.
pub const ID_PREFIX: &str = "tc";

/// Generate a random hex hash of the specified length
///
/// Generates random bytes and hex-encodes them directly, returning the first
/// `length` hex characters.
pub fn generate_hash(length: usize) -> String {
    // Each byte produces 2 hex characters, so we need ceil(length / 2) bytes
    let num_bytes = length.div_ceil(2);
    let mut buf = vec![0u8; num_bytes];
    rand::rng().fill(&mut buf[..]);
    let hex: String = buf.iter().map(|b| format!("{b:02x}")).collect();
    hex[..length].to_string()
}

/// Encode a non-negative number in lowercase base 36.
fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Generate a timestamp-based ID: `tc-<base36 millis>-<hex>`.
pub fn generate_case_id(at: Timestamp, hash_len: usize) -> TestCaseId {
    let millis = u64::try_from(at.as_millisecond()).unwrap_or(0);
    TestCaseId::new_unchecked(format!(
        "{ID_PREFIX}-{}-{}",
        to_base36(millis),
        generate_hash(hash_len)
    ))
}

/// Generate an ID that `is_taken` does not report as already in use.
///
/// The random suffix grows from 4 to 8 characters if collisions keep
/// happening.
pub fn generate_unique_case_id<F>(at: Timestamp, is_taken: F) -> Result<TestCaseId>
where
    F: Fn(&TestCaseId) -> bool,
{
    const RETRIES_PER_LENGTH: u32 = 40;

    for length in 4..=8 {
        for _ in 0..RETRIES_PER_LENGTH {
            let candidate = generate_case_id(at, length);
            if !is_taken(&candidate) {
                return Ok(candidate);
            }
        }
    }

    Err(QaError::Store(format!(
        "Failed to generate unique ID after trying hash lengths 4-8 with {RETRIES_PER_LENGTH} retries each"
    )))
}
