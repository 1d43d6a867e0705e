//! secp256k1 point and scalar arithmetic.
//!
//! Affine arithmetic over the curve `y^2 = x^3 + 7` used by every signing
//! scheme in this crate. Scalars and coordinates are `BigUint` values;
//! the point at infinity is `None` in the group operations.

use crate::util::{Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};

const P_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];
const N_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];
const GX_BYTES: [u8; 32] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac,
    0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
    0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];
const GY_BYTES: [u8; 32] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65,
    0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19,
    0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

/// The field prime p of secp256k1.
#[must_use]
pub fn field_prime() -> BigUint {
    BigUint::from_bytes_be(&P_BYTES)
}

/// The group order n of secp256k1.
#[must_use]
pub fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&N_BYTES)
}

/// The generator point G.
#[must_use]
pub fn generator() -> Point {
    Point {
        x: BigUint::from_bytes_be(&GX_BYTES),
        y: BigUint::from_bytes_be(&GY_BYTES),
    }
}

/// An affine point on secp256k1. The point at infinity is represented as
/// `None` wherever group operations can produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    /// x coordinate.
    pub x: BigUint,
    /// y coordinate.
    pub y: BigUint,
}

impl Point {
    /// Whether the y coordinate is odd.
    #[must_use]
    #[inline]
    pub fn is_odd_y(&self) -> bool {
        self.y.bit(0)
    }

    /// The x coordinate as 32 big-endian bytes.
    #[must_use]
    #[inline]
    pub fn x_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.x)
    }
}

/// Left-pads a big integer to 32 big-endian bytes. Values wider than 256
/// bits keep their low 32 bytes.
#[must_use]
pub fn to_bytes32(n: &BigUint) -> [u8; 32] {
    let bytes = n.to_bytes_be();
    let mut out = [0u8; 32];
    if bytes.len() >= 32 {
        out.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        out[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}

// Modular inverse by Fermat's little theorem; the modulus is prime here.
pub(crate) fn mod_inv(a: &BigUint, modulus: &BigUint) -> BigUint {
    let exp = modulus - BigUint::from(2u8);
    a.modpow(&exp, modulus)
}

// (a - b) mod m; operands may be unreduced.
fn mod_sub(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    ((a % modulus) + modulus - (b % modulus)) % modulus
}

/// Adds two points, either of which may be infinity.
#[must_use]
pub fn point_add(a: Option<&Point>, b: Option<&Point>) -> Option<Point> {
    let p = field_prime();
    let (a, b) = match (a, b) {
        (None, None) => return None,
        (Some(a), None) => return Some(a.clone()),
        (None, Some(b)) => return Some(b.clone()),
        (Some(a), Some(b)) => (a, b),
    };
    if a.x == b.x {
        if mod_sub(&p, &a.y, &p) == &b.y % &p {
            // Mirror points; the sum is infinity
            return None;
        }
        return point_double(a);
    }
    let lam = mod_sub(&b.y, &a.y, &p) * mod_inv(&mod_sub(&b.x, &a.x, &p), &p) % &p;
    let x3 = mod_sub(&(&lam * &lam % &p), &(&a.x + &b.x), &p);
    let y3 = mod_sub(&(lam * mod_sub(&a.x, &x3, &p) % &p), &a.y, &p);
    Some(Point { x: x3, y: y3 })
}

fn point_double(a: &Point) -> Option<Point> {
    let p = field_prime();
    if a.y.is_zero() {
        return None;
    }
    let three = BigUint::from(3u8);
    let two = BigUint::from(2u8);
    let lam = three * &a.x % &p * &a.x % &p * mod_inv(&(two * &a.y % &p), &p) % &p;
    let x3 = mod_sub(&(&lam * &lam % &p), &(&a.x + &a.x), &p);
    let y3 = mod_sub(&(lam * mod_sub(&a.x, &x3, &p) % &p), &a.y, &p);
    Some(Point { x: x3, y: y3 })
}

/// Multiplies a point by a scalar with double-and-add.
#[must_use]
pub fn point_mul(k: &BigUint, point: &Point) -> Option<Point> {
    let mut result: Option<Point> = None;
    let mut addend = Some(point.clone());
    for i in 0..k.bits() {
        if k.bit(i) {
            result = point_add(result.as_ref(), addend.as_ref());
        }
        addend = point_add(addend.as_ref(), addend.as_ref());
    }
    result
}

/// Multiplies the generator by a scalar.
#[must_use]
pub fn base_mul(k: &BigUint) -> Option<Point> {
    point_mul(k, &generator())
}

/// Whether the point satisfies the curve equation.
#[must_use]
pub fn is_on_curve(point: &Point) -> bool {
    let p = field_prime();
    let y2 = &point.y * &point.y % &p;
    let x3 = &point.x * &point.x % &p * &point.x % &p;
    y2 == (x3 + BigUint::from(7u8)) % &p
}

/// Reconstructs the even-y point for an x coordinate (BIP-340 lift_x).
///
/// # Errors
/// `Error::BadArgument` if x is out of range or has no square root on the
/// curve.
pub fn lift_x(x: &BigUint) -> Result<Point> {
    let p = field_prime();
    if *x >= p {
        return Err(Error::BadArgument("x out of field range".to_string()));
    }
    let y_sq = (x.modpow(&BigUint::from(3u8), &p) + BigUint::from(7u8)) % &p;
    // sqrt via (p+1)/4, valid because p % 4 == 3
    let exp = (&p + BigUint::one()) >> 2;
    let y = y_sq.modpow(&exp, &p);
    if y.modpow(&BigUint::from(2u8), &p) != y_sq {
        return Err(Error::BadArgument("No square root for x".to_string()));
    }
    if y.bit(0) {
        Ok(Point { x: x.clone(), y: &p - y })
    } else {
        Ok(Point { x: x.clone(), y })
    }
}

/// Encodes a point in compressed (33 byte) or uncompressed (65 byte) form.
#[must_use]
pub fn encode_point(point: &Point, compressed: bool) -> Vec<u8> {
    if compressed {
        let mut out = Vec::with_capacity(33);
        out.push(if point.is_odd_y() { 0x03 } else { 0x02 });
        out.extend_from_slice(&point.x_bytes());
        out
    } else {
        let mut out = Vec::with_capacity(65);
        out.push(0x04);
        out.extend_from_slice(&point.x_bytes());
        out.extend_from_slice(&to_bytes32(&point.y));
        out
    }
}

/// Decodes a 33 or 65 byte point encoding, validating curve membership.
///
/// # Errors
/// `Error::BadArgument` for a wrong length, prefix, or a point not on the
/// curve.
pub fn decode_point(bytes: &[u8]) -> Result<Point> {
    match bytes.first() {
        Some(0x02) | Some(0x03) if bytes.len() == 33 => {
            let x = BigUint::from_bytes_be(&bytes[1..33]);
            let even = lift_x(&x)?;
            if (bytes[0] == 0x03) == even.is_odd_y() {
                Ok(even)
            } else {
                let p = field_prime();
                let y = &p - &even.y;
                Ok(Point { x: even.x, y })
            }
        }
        Some(0x04) if bytes.len() == 65 => {
            let x = BigUint::from_bytes_be(&bytes[1..33]);
            let y = BigUint::from_bytes_be(&bytes[33..65]);
            let p = field_prime();
            if x >= p || y >= p {
                return Err(Error::BadArgument("Coordinate out of range".to_string()));
            }
            let point = Point { x, y };
            if !is_on_curve(&point) {
                return Err(Error::BadArgument("Point not on curve".to_string()));
            }
            Ok(point)
        }
        _ => Err(Error::BadArgument("Invalid point encoding".to_string())),
    }
}

/// Whether the bytes are a canonical 33 or 65 byte curve point.
#[must_use]
pub fn is_point(bytes: &[u8]) -> bool {
    decode_point(bytes).is_ok()
}

/// Whether the bytes are a valid private scalar (32 bytes, 1 <= d <= n-1).
#[must_use]
pub fn is_valid_private_key(bytes: &[u8]) -> bool {
    if bytes.len() != 32 {
        return false;
    }
    let d = BigUint::from_bytes_be(bytes);
    !d.is_zero() && d < curve_order()
}
