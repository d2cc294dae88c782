//! Random string generation and the PKCE code challenge derivation ([RFC 7636](https://www.rfc-editor.org/rfc/rfc7636)).

use std::fmt::Debug;

use rand::{distributions::Uniform, Rng};
use sha2::{Digest, Sha256};

use crate::encoding::base64url_encode;

/// The unreserved URI characters `A-Z a-z 0-9 - . _ ~`, from which both code verifiers and state values are drawn.
pub const UNRESERVED_CHARACTERS: &[u8; 66] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Length of generated code verifiers. This is the maximum Spotify allows.
pub const CODE_VERIFIER_LENGTH: usize = 128;

/// Length of generated state values.
pub const STATE_LENGTH: usize = 64;

/// The `code_challenge_method` sent alongside a challenge from [code_challenge_from_verifier].
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// The SHA-256 implementation used to derive code challenges. The default is [Sha2Digest]; a different
/// implementation can be given to the [client builder](crate::client::SpotifyClientBuilder::challenge_digest).
pub trait ChallengeDigest: Debug + Send + Sync {
    fn sha256(&self, input: &[u8]) -> [u8; 32];
}

/// [ChallengeDigest] backed by the `sha2` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha2Digest;

impl ChallengeDigest for Sha2Digest {
    fn sha256(&self, input: &[u8]) -> [u8; 32] {
        let mut digest = [0; 32];
        digest.copy_from_slice(&Sha256::digest(input));
        digest
    }
}

/// Returns `length` characters sampled uniformly from [UNRESERVED_CHARACTERS].
pub fn generate_random_string(length: usize) -> String {
    let distribution = Uniform::from(0..UNRESERVED_CHARACTERS.len());

    rand::thread_rng()
        .sample_iter(distribution)
        .take(length)
        .map(|index| char::from(UNRESERVED_CHARACTERS[index]))
        .collect()
}

/// Returns a fresh code verifier of [CODE_VERIFIER_LENGTH] characters.
pub fn code_verifier() -> String {
    generate_random_string(CODE_VERIFIER_LENGTH)
}

/// Returns a fresh state value of [STATE_LENGTH] characters.
pub fn state() -> String {
    generate_random_string(STATE_LENGTH)
}

/// Derives the S256 code challenge for a verifier: `base64url(SHA256(verifier))` without padding.
pub fn code_challenge_from_verifier(verifier: &str) -> String {
    code_challenge_with(&Sha2Digest, verifier)
}

/// Like [code_challenge_from_verifier], with an explicit digest implementation.
pub fn code_challenge_with(digest: &dyn ChallengeDigest, verifier: &str) -> String {
    base64url_encode(digest.sha256(verifier.as_bytes()))
}
