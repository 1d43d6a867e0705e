//! BIP-340 Schnorr signing and verification.

use crate::ecc::curve::{
    base_mul, curve_order, field_prime, is_valid_private_key, lift_x, point_add, point_mul,
    to_bytes32, Point,
};
use crate::util::{tagged_hash, Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;

/// Signs a 32-byte message with a BIP-340 Schnorr signature.
///
/// The scalar is negated when its public point has an odd y so the
/// signature always commits to the even-y key. The auxiliary randomness
/// is mixed into the nonce derivation; passing the same `aux_rand` yields
/// a deterministic signature. The produced signature is verified before
/// it is returned.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range private key;
/// `Error::IllegalState` if the nonce degenerates or the signature fails
/// self-verification, which indicates a logic bug.
pub fn sign(message: &[u8; 32], private_key: &[u8], aux_rand: &[u8; 32]) -> Result<[u8; 64]> {
    if !is_valid_private_key(private_key) {
        return Err(Error::BadArgument("Invalid private key".to_string()));
    }
    let n = curve_order();
    let mut secret = BigUint::from_bytes_be(private_key);
    let public = base_mul(&secret)
        .ok_or_else(|| Error::IllegalState("Public point at infinity".to_string()))?;
    if public.is_odd_y() {
        secret = &n - secret;
    }
    let px = public.x_bytes();

    let aux_hash = tagged_hash("BIP0340/aux", aux_rand);
    let secret_bytes = to_bytes32(&secret);
    let mut t = [0u8; 32];
    for (i, byte) in t.iter_mut().enumerate() {
        *byte = secret_bytes[i] ^ aux_hash.0[i];
    }

    let mut nonce_input = Vec::with_capacity(96);
    nonce_input.extend_from_slice(&t);
    nonce_input.extend_from_slice(&px);
    nonce_input.extend_from_slice(message);
    let mut k = BigUint::from_bytes_be(&tagged_hash("BIP0340/nonce", &nonce_input).0) % &n;
    if k.is_zero() {
        return Err(Error::IllegalState("Nonce is zero".to_string()));
    }
    let nonce_point = base_mul(&k)
        .ok_or_else(|| Error::IllegalState("Nonce point at infinity".to_string()))?;
    if nonce_point.is_odd_y() {
        k = &n - k;
    }
    let rx = nonce_point.x_bytes();

    let mut challenge_input = Vec::with_capacity(96);
    challenge_input.extend_from_slice(&rx);
    challenge_input.extend_from_slice(&px);
    challenge_input.extend_from_slice(message);
    let e = BigUint::from_bytes_be(&tagged_hash("BIP0340/challenge", &challenge_input).0) % &n;

    let s = (k + e * secret) % &n;
    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&rx);
    signature[32..].copy_from_slice(&to_bytes32(&s));

    if !verify(message, &px, &signature) {
        return Err(Error::IllegalState(
            "Produced signature failed verification".to_string(),
        ));
    }
    Ok(signature)
}

/// Verifies a BIP-340 Schnorr signature against an x-only public key.
#[must_use]
pub fn verify(message: &[u8; 32], x_only_public_key: &[u8; 32], signature: &[u8]) -> bool {
    if signature.len() != 64 {
        return false;
    }
    let p = field_prime();
    let n = curve_order();
    let public = match lift_x(&BigUint::from_bytes_be(x_only_public_key)) {
        Ok(point) => point,
        Err(_) => return false,
    };
    let r = BigUint::from_bytes_be(&signature[..32]);
    let s = BigUint::from_bytes_be(&signature[32..]);
    if r >= p || s >= n {
        return false;
    }
    let mut challenge_input = Vec::with_capacity(96);
    challenge_input.extend_from_slice(&signature[..32]);
    challenge_input.extend_from_slice(x_only_public_key);
    challenge_input.extend_from_slice(message);
    let e = BigUint::from_bytes_be(&tagged_hash("BIP0340/challenge", &challenge_input).0) % &n;

    let s_g = base_mul(&s);
    let e_p = point_mul(&((&n - e) % &n), &public);
    let nonce_point = match point_add(s_g.as_ref(), e_p.as_ref()) {
        Some(point) => point,
        None => return false,
    };
    !nonce_point.is_odd_y() && nonce_point.x == r
}

/// Convenience wrapper for verifying against a full public point.
#[must_use]
pub fn verify_with_point(message: &[u8; 32], public: &Point, signature: &[u8]) -> bool {
    verify(message, &public.x_bytes(), signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).unwrap()
    }

    #[test]
    fn sign_verify_round_trip() {
        let private_key = key("a2bc5baf18c6ebe09324e95cf3385ad245d942f3f23d9c262e246e7dd3cc46bb");
        let message = [0x42u8; 32];
        let aux = [7u8; 32];
        let sig = sign(&message, &private_key, &aux).unwrap();
        let public = base_mul(&BigUint::from_bytes_be(&private_key)).unwrap();
        assert!(verify(&message, &public.x_bytes(), &sig));
        assert!(verify_with_point(&message, &public, &sig));
    }

    #[test]
    fn deterministic_for_fixed_aux() {
        let private_key = key("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let message = [0x01u8; 32];
        let aux = [0u8; 32];
        let a = sign(&message, &private_key, &aux).unwrap();
        let b = sign(&message, &private_key, &aux).unwrap();
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn tampered_signature_fails() {
        let private_key = key("290fcc5457792514a1e1bbba32e7329c5018a0a76a09751f4f97084dc7aaa176");
        let message = [0x10u8; 32];
        let aux = [3u8; 32];
        let mut sig = sign(&message, &private_key, &aux).unwrap();
        let public = base_mul(&BigUint::from_bytes_be(&private_key)).unwrap();
        sig[40] ^= 0x01;
        assert!(!verify(&message, &public.x_bytes(), &sig));
        let mut other = message;
        other[0] ^= 0xff;
        let sig = sign(&message, &private_key, &aux).unwrap();
        assert!(!verify(&other, &public.x_bytes(), &sig));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let message = [0u8; 32];
        assert!(sign(&message, &[0u8; 32], &[0u8; 32]).is_err());
        assert!(!verify(&message, &[0xffu8; 32], &[0u8; 64]));
        assert!(!verify(&message, &[1u8; 32], &[0u8; 63]));
    }
}
