//! Secret key generation.

use rand::rngs::OsRng;
use rand::Rng;

/// Characters the framework accepts in a secret key.
const SECRET_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";

/// Length of the generated secret key.
const SECRET_KEY_LENGTH: usize = 50;

/// Generate a random secret key from the OS entropy source.
///
/// The key gates framework sessions and signed cookies, so it is drawn
/// from `OsRng` rather than a seeded PRNG.
pub fn generate_secret_key() -> String {
    let mut rng = OsRng;
    (0..SECRET_KEY_LENGTH)
        .map(|_| SECRET_CHARSET[rng.gen_range(0..SECRET_CHARSET.len())] as char)
        .collect()
}
