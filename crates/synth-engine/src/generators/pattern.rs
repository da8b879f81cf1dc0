//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - number of values this generator produced before
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number

use crate::policies::random_uuid;
use rand::Rng;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &random_uuid(rng).to_string(), 1);
    }

    // Replace {rand:N} patterns
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(end) = result[start..].find('}').map(|end| start + end) else {
            break;
        };

        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result.replace_range(start..=end, &random_num);
                search_from = start + random_num.len();
            }
            // Invalid format, leave it in place
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    (0..digits)
        .map(|i| {
            // First digit should be 1-9 to avoid leading zeros
            let low = if i == 0 { b'1' } else { b'0' };
            char::from(rng.random_range(low..=b'9'))
        })
        .collect()
}
