//! Random credentials for negative login cases.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// `length` characters drawn uniformly from `[a-zA-Z0-9]`
#[must_use]
pub fn random_string(length: usize) -> String {
    random_string_with(&mut rand::thread_rng(), length)
}

/// Same as [`random_string`] with a caller-supplied generator
pub fn random_string_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
