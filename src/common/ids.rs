//! Content fingerprints for loaded model artefacts.

/// 32-bit FNV-1a hash, enough to tell two artefact files apart in the logs.
#[derive(Copy, Clone, Debug)]
pub struct Fingerprint(u32);

impl Fingerprint {
    const OFFSET_BASIS: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;

    /// Create a new hash state with the FNV offset basis.
    pub fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ u32::from(*b)).wrapping_mul(Self::PRIME);
        }
    }

    /// Hash a whole buffer in one call.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hash = Self::new();
        hash.update(bytes);
        hash
    }

    /// Finalise the hash and return an 8-character lowercase hex string.
    pub fn finish_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}
