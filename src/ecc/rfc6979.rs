//! Deterministic nonce generation for ECDSA (RFC 6979).
//!
//! The nonce is derived from the private key and message digest alone, so
//! signing the same message with the same key always yields the same
//! signature and no OS randomness enters the signing path. Optional extra
//! entropy extends the seed for the short-r re-signing loop.

use crate::ecc::curve::{curve_order, to_bytes32};
use bitcoin_hashes::{sha256, Hash, HashEngine, Hmac, HmacEngine};
use num_bigint::BigUint;
use num_traits::Zero;

/// HMAC-SHA256 based deterministic K generator.
pub struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
}

impl NonceGenerator {
    /// Seeds the generator from a private scalar, a 32-byte message digest
    /// and optional extra entropy.
    #[must_use]
    pub fn new(private_key: &BigUint, digest: &[u8; 32], extra_entropy: Option<&[u8]>) -> NonceGenerator {
        let n = curve_order();
        let x = to_bytes32(private_key);
        // Reduce the message once if it exceeds the group order
        let mut m_int = BigUint::from_bytes_be(digest);
        if m_int > n {
            m_int -= &n;
        }
        let m = to_bytes32(&m_int);

        let mut gen = NonceGenerator { k: [0x00; 32], v: [0x01; 32] };
        gen.update(0x00, &x, &m, extra_entropy);
        gen.update(0x01, &x, &m, extra_entropy);
        gen
    }

    // K = HMAC(K, V || tag || x || m || extra); V = HMAC(K, V)
    fn update(&mut self, tag: u8, x: &[u8; 32], m: &[u8; 32], extra: Option<&[u8]>) {
        let mut engine = HmacEngine::<sha256::Hash>::new(&self.k);
        engine.input(&self.v);
        engine.input(&[tag]);
        engine.input(x);
        engine.input(m);
        if let Some(extra) = extra {
            engine.input(extra);
        }
        self.k = Hmac::from_engine(engine).to_byte_array();
        let mut engine = HmacEngine::<sha256::Hash>::new(&self.k);
        engine.input(&self.v);
        self.v = Hmac::from_engine(engine).to_byte_array();
    }

    /// Produces the next candidate nonce in the range 1..n-1.
    #[must_use]
    pub fn next_k(&mut self) -> BigUint {
        let n = curve_order();
        loop {
            let mut engine = HmacEngine::<sha256::Hash>::new(&self.k);
            engine.input(&self.v);
            self.v = Hmac::from_engine(engine).to_byte_array();
            let k = BigUint::from_bytes_be(&self.v);
            if !k.is_zero() && k < n {
                return k;
            }
            // Candidate out of range: stir and retry
            let mut engine = HmacEngine::<sha256::Hash>::new(&self.k);
            engine.input(&self.v);
            engine.input(&[0x00]);
            self.k = Hmac::from_engine(engine).to_byte_array();
            let mut engine = HmacEngine::<sha256::Hash>::new(&self.k);
            engine.input(&self.v);
            self.v = Hmac::from_engine(engine).to_byte_array();
        }
    }
}
