//! Numeric one-time code generation.

use rand::Rng;

/// Returns `length` random decimal digits, leading zeros included.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
