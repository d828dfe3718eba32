//! Short code generation.
//!
//! Codes are six characters from `[A-Za-z0-9]`, derived from cryptographically
//! random bytes. The generator is stateless apart from its byte source, which
//! is injectable so tests can run against a seeded RNG.

use std::sync::{Arc, Mutex};

use base64::Engine as _;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde_json::json;

use crate::error::AppError;

/// Exact length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Random bytes drawn per encoding round (never fewer than four).
const RANDOM_BYTES_PER_ROUND: usize = 6;

/// Upper bound on encoding rounds for a single candidate.
///
/// Each round yields about eight alphanumeric characters, so this is only
/// reached if the byte source is broken.
const MAX_ROUNDS: usize = 16;

/// Codes that would be shadowed by static routes.
const RESERVED_CODES: &[&str] = &["health"];

/// Source of random bytes for code generation.
pub trait ByteSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError>;
}

/// Operating-system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        getrandom::fill(buf).map_err(|e| {
            AppError::internal(
                "Failed to generate random bytes",
                json!({ "reason": e.to_string() }),
            )
        })
    }
}

/// Deterministic byte source backed by a seeded [`StdRng`].
///
/// Intended for tests and reproducible fixtures, never for serving traffic.
pub struct SeededByteSource {
    rng: Mutex<StdRng>,
}

impl SeededByteSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ByteSource for SeededByteSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::internal("Random source poisoned", json!({})))?;
        rng.fill_bytes(buf);
        Ok(())
    }
}

/// Produces candidate short codes. Uniqueness is not checked here.
#[derive(Clone)]
pub struct CodeGenerator {
    source: Arc<dyn ByteSource>,
}

impl CodeGenerator {
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self { source }
    }

    /// Generator backed by the operating system CSPRNG.
    pub fn os() -> Self {
        Self::new(Arc::new(OsByteSource))
    }

    /// Generates one candidate code.
    ///
    /// Random bytes are base64-encoded, stripped of everything outside the
    /// alphanumeric alphabet, and topped up with further rounds until at
    /// least [`CODE_LENGTH`] characters are available, then truncated.
    /// Candidates equal to a reserved route segment are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the byte source fails.
    pub fn generate(&self) -> Result<String, AppError> {
        let mut code = String::with_capacity(CODE_LENGTH * 2);
        let mut buf = [0u8; RANDOM_BYTES_PER_ROUND];

        for _ in 0..MAX_ROUNDS {
            self.source.fill(&mut buf)?;

            let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(buf);
            code.extend(encoded.chars().filter(char::is_ascii_alphanumeric));

            if code.len() >= CODE_LENGTH {
                code.truncate(CODE_LENGTH);

                if RESERVED_CODES.contains(&code.as_str()) {
                    code.clear();
                    continue;
                }

                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate short code",
            json!({ "reason": "Random source yielded too few usable characters" }),
        ))
    }
}

/// Returns true if `code` has the shape of a generated short code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
