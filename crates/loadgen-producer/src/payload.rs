//! Synthetic data-plane events.

use rand::Rng;

/// Default size of the filler payload in bytes.
pub const DEFAULT_PAYLOAD_SIZE: usize = 1024;

const VIN_PREFIX: &str = "WDDZF";
const VIN_SUFFIX_MAX: u32 = 999_999;
const FILLER_BYTE: u8 = b'X';

/// Produces vehicle-identifier-like keys and a fixed filler payload.
#[derive(Debug, Clone)]
pub struct PayloadGenerator {
    filler: Vec<u8>,
}

impl PayloadGenerator {
    pub fn new(payload_size: usize) -> Self {
        Self {
            filler: vec![FILLER_BYTE; payload_size],
        }
    }

    /// A fresh random key such as `WDDZF48213`.
    pub fn next_key(&self) -> String {
        let suffix = rand::rng().random_range(1..VIN_SUFFIX_MAX);
        format!("{VIN_PREFIX}{suffix}")
    }

    pub fn payload(&self) -> &[u8] {
        &self.filler
    }
}

impl Default for PayloadGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PAYLOAD_SIZE)
    }
}
