use rand::distributions::Alphanumeric;
use rand::Rng;

/// Returns `length` characters drawn uniformly from `[0-9A-Za-z]`.
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
