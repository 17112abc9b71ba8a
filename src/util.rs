use sha2::{Digest, Sha256};

/// Hex SHA-256 of a layout's defining tokens, joined by `-`.
pub fn content_hash<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, t) in tokens.iter().enumerate() {
        if i > 0 {
            hasher.update(b"-");
        }
        hasher.update(t.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}
