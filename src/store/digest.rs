//! Secret digest computation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};

/// Hash a secret with SHA-512 and encode the result as padded standard base64.
///
/// The output is always 88 characters long.
pub fn compute_digest(secret: impl AsRef<[u8]>) -> String {
    let hash = Sha512::digest(secret.as_ref());
    STANDARD.encode(hash)
}
