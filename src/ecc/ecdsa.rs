//! Deterministic ECDSA signing, DER encoding and public key recovery.

use crate::ecc::curve::{
    self, base_mul, curve_order, decode_point, field_prime, is_valid_private_key, point_add,
    point_mul, to_bytes32, Point,
};
use crate::ecc::rfc6979::NonceGenerator;
use crate::util::{Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;

/// Upper bound on re-signing attempts in [`sign_input`]. Exceeding it
/// means something is badly wrong; each attempt fails with probability
/// around one half.
const MAX_SIGN_ATTEMPTS: u32 = 50;

/// An ECDSA signature as a scalar pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// x coordinate of the nonce point, mod n.
    pub r: BigUint,
    /// Proof scalar, always low-S normalized.
    pub s: BigUint,
}

/// Signs a 32-byte digest with RFC 6979 deterministic nonces.
///
/// `s` is normalized to the low half of the group order before returning,
/// as standard relay policy requires. Identical inputs always produce the
/// identical signature.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range private key.
pub fn sign(private_key: &[u8], digest: &[u8; 32], extra_entropy: Option<&[u8]>) -> Result<Signature> {
    if !is_valid_private_key(private_key) {
        return Err(Error::BadArgument("Invalid private key".to_string()));
    }
    let n = curve_order();
    let d = BigUint::from_bytes_be(private_key);
    let e = BigUint::from_bytes_be(digest);
    let mut nonces = NonceGenerator::new(&d, digest, extra_entropy);
    loop {
        let k = nonces.next_k();
        let nonce_point = match base_mul(&k) {
            Some(point) => point,
            None => continue,
        };
        let r = nonce_point.x % &n;
        if r.is_zero() {
            continue;
        }
        let k_inv = curve::mod_inv(&k, &n);
        let s = k_inv * (&e + &r * &d) % &n;
        if s.is_zero() {
            continue;
        }
        let s = if s > (&n >> 1) { &n - s } else { s };
        return Ok(Signature { r, s });
    }
}

/// Signs a digest and returns the 64-byte compact form `r || s`, used by
/// the text-message signing format.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range private key.
pub fn sign_compact(private_key: &[u8], digest: &[u8; 32]) -> Result<[u8; 64]> {
    let sig = sign(private_key, digest, None)?;
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&to_bytes32(&sig.r));
    out[32..].copy_from_slice(&to_bytes32(&sig.s));
    Ok(out)
}

/// Encodes a signature as a DER SEQUENCE of two INTEGERs, each minimal
/// and zero-padded when its leading byte has the high bit set.
#[must_use]
pub fn der_encode(sig: &Signature) -> Vec<u8> {
    let r = der_integer(&sig.r);
    let s = der_integer(&sig.s);
    let mut out = Vec::with_capacity(2 + r.len() + s.len());
    out.push(0x30);
    out.push((r.len() + s.len()) as u8);
    out.extend_from_slice(&r);
    out.extend_from_slice(&s);
    out
}

fn der_integer(value: &BigUint) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let pad = bytes[0] & 0x80 != 0;
    let len = bytes.len() + usize::from(pad);
    let mut out = Vec::with_capacity(2 + len);
    out.push(0x02);
    out.push(len as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes);
    out
}

/// Signs a transaction digest and appends the sighash flag, re-signing
/// with an incremented entropy counter until the DER-encoded `r` needs no
/// padding byte. This keeps the final scriptSig/witness length fixed.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range private key;
/// `Error::IllegalState` if the attempt budget is exhausted.
pub fn sign_input(private_key: &[u8], digest: &[u8; 32], sighash_flag: u8) -> Result<Vec<u8>> {
    let mut attempt: u32 = 0;
    loop {
        let extra = attempt_entropy(attempt);
        let sig = sign(private_key, digest, extra.as_ref().map(|e| &e[..]))?;
        let mut der = der_encode(&sig);
        if der[3] != 33 {
            der.push(sighash_flag);
            return Ok(der);
        }
        attempt += 1;
        if attempt > MAX_SIGN_ATTEMPTS {
            return Err(Error::IllegalState("Re-signing attempts exhausted".to_string()));
        }
    }
}

fn attempt_entropy(attempt: u32) -> Option<[u8; 32]> {
    if attempt == 0 {
        return None;
    }
    let mut extra = [0u8; 32];
    extra[28..].copy_from_slice(&attempt.to_be_bytes());
    Some(extra)
}

/// Recovers the candidate public point for a compact signature and a
/// recovery id in 0..=3.
///
/// # Errors
/// `Error::BadArgument` for a malformed signature or recovery id;
/// `Error::BadData` when no valid point exists for the candidate x.
pub fn recover_public_key(rec_id: u8, signature: &[u8], digest: &[u8; 32]) -> Result<Point> {
    if rec_id > 3 {
        return Err(Error::BadArgument(format!("Invalid recovery id: {}", rec_id)));
    }
    if signature.len() != 64 {
        return Err(Error::BadArgument(format!("Invalid signature length: {}", signature.len())));
    }
    let n = curve_order();
    let p = field_prime();
    let r = BigUint::from_bytes_be(&signature[..32]);
    let s = BigUint::from_bytes_be(&signature[32..]);
    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return Err(Error::BadArgument("Signature scalar out of range".to_string()));
    }
    let x = &r + &n * BigUint::from(rec_id / 2);
    if x >= p {
        return Err(Error::BadData("Recovery x out of field range".to_string()));
    }
    let mut encoded = Vec::with_capacity(33);
    encoded.push(if rec_id & 1 == 1 { 0x03 } else { 0x02 });
    encoded.extend_from_slice(&to_bytes32(&x));
    let nonce_point = decode_point(&encoded)?;
    if point_mul(&n, &nonce_point).is_some() {
        return Err(Error::BadData("Recovery point has wrong order".to_string()));
    }
    let e = BigUint::from_bytes_be(digest);
    let r_inv = curve::mod_inv(&r, &n);
    let u1 = (&n - (e % &n)) * &r_inv % &n;
    let u2 = s * &r_inv % &n;
    let q = point_add(base_mul(&u1).as_ref(), point_mul(&u2, &nonce_point).as_ref());
    q.ok_or_else(|| Error::BadData("Recovered point at infinity".to_string()))
}
