//! Deterministic schema fingerprints.
//!
//! [`SchemaHash`] computes an order-sensitive 64-bit digest of everything that makes up a
//! schema: property names, declared types, internal flags and accessor signatures. Two
//! extractions of the same type from the same member list always produce the same
//! fingerprint, which makes idempotence cheap to assert and to log.
//! The mixing does not go through `std::hash::Hasher`, so fingerprints are stable across
//! Rust releases.

/// Hash builder using FNV-1a inspired mixing with an additional avalanche step
pub struct SchemaHash {
    /// Current hash state
    state: u64,
}

impl SchemaHash {
    /// Create a new hash builder
    ///
    /// Initializes with the FNV-1a offset basis
    #[must_use]
    pub fn new() -> Self {
        SchemaHash {
            state: 0xcbf2_9ce4_8422_2325_u64, // FNV-1a 64-bit offset basis
        }
    }

    fn mix(&mut self, value: u64) {
        self.state ^= value;
        self.state = self.state.wrapping_mul(0x0100_0000_01b3_u64); // FNV-1a 64-bit prime

        self.state ^= self.state >> 33;
        self.state = self.state.wrapping_mul(0xff51_afd7_ed55_8ccd_u64);
        self.state ^= self.state >> 33;
    }

    /// Add a string component. The length is mixed in first so that `("ab", "c")` and
    /// `("a", "bc")` differ.
    #[must_use]
    pub fn add_str(mut self, component: &str) -> Self {
        self.mix(component.len() as u64);
        for byte in component.bytes() {
            self.mix(u64::from(byte));
        }
        self
    }

    /// Add a boolean component
    #[must_use]
    pub fn add_bool(mut self, component: bool) -> Self {
        self.mix(u64::from(component));
        self
    }

    /// Add an integer component
    #[must_use]
    pub fn add_u64(mut self, component: u64) -> Self {
        self.mix(component);
        self
    }

    /// Finalize the hash and return the computed fingerprint
    #[must_use]
    pub fn finalize(self) -> u64 {
        self.state
    }
}

impl Default for SchemaHash {
    fn default() -> Self {
        Self::new()
    }
}
