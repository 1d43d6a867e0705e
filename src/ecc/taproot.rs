//! Taproot key tweaking and script-tree hashing (BIP-341).

use crate::ecc::curve::{
    base_mul, curve_order, is_valid_private_key, point_add, to_bytes32, Point,
};
use crate::script::Script;
use crate::util::{tagged_hash, Error, Hash256, Result};
use num_bigint::BigUint;
use num_traits::Zero;

/// A taproot script tree. Branches hold at most two children; the
/// lexicographic ordering of branch hashes makes the supplied order
/// irrelevant to the resulting root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTree {
    /// A single tapscript leaf.
    Leaf(Script),
    /// An inner node combining up to two subtrees.
    Branch(Vec<ScriptTree>),
}

/// Computes the merkle root of a script tree, or None for an empty
/// branch (a key-path-only commitment).
///
/// # Errors
/// `Error::BadArgument` when a branch has more than two children.
pub fn merkle_root(tree: &ScriptTree) -> Result<Option<Hash256>> {
    match tree {
        ScriptTree::Leaf(script) => Ok(Some(script.tapleaf_hash())),
        ScriptTree::Branch(children) => match children.as_slice() {
            [] => Ok(None),
            [only] => merkle_root(only),
            [left, right] => {
                let left = merkle_root(left)?
                    .ok_or_else(|| Error::BadArgument("Empty branch in script tree".to_string()))?;
                let right = merkle_root(right)?
                    .ok_or_else(|| Error::BadArgument("Empty branch in script tree".to_string()))?;
                Ok(Some(tap_branch(&left, &right)))
            }
            _ => Err(Error::BadArgument(
                "Script tree branch cannot have more than 2 children".to_string(),
            )),
        },
    }
}

// Branch hashes are sorted before concatenation so sibling order never
// changes the root.
fn tap_branch(a: &Hash256, b: &Hash256) -> Hash256 {
    let mut buf = Vec::with_capacity(64);
    if a.0 <= b.0 {
        buf.extend_from_slice(&a.0);
        buf.extend_from_slice(&b.0);
    } else {
        buf.extend_from_slice(&b.0);
        buf.extend_from_slice(&a.0);
    }
    tagged_hash("TapBranch", &buf)
}

/// Computes the TapTweak value for an internal key and an optional script
/// tree.
///
/// # Errors
/// `Error::BadArgument` for an invalid script tree.
pub fn calculate_tweak(x_only_public_key: &[u8; 32], tree: Option<&ScriptTree>) -> Result<[u8; 32]> {
    let root = match tree {
        None => None,
        Some(tree) => merkle_root(tree)?,
    };
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(x_only_public_key);
    if let Some(root) = root {
        buf.extend_from_slice(&root.0);
    }
    Ok(tagged_hash("TapTweak", &buf).0)
}

/// Tweaks an internal public point into the taproot output point.
///
/// The internal key is normalized to even y before the tweak is applied,
/// and the result is returned in its even-y form; its x coordinate is the
/// v1 witness program.
///
/// # Errors
/// `Error::BadArgument` for a tweak outside the group order;
/// `Error::IllegalState` if the sum lands at infinity.
pub fn tweak_public_point(public: &Point, tweak: &[u8; 32]) -> Result<Point> {
    let n = curve_order();
    let p = crate::ecc::curve::field_prime();
    let t = BigUint::from_bytes_be(tweak);
    if t >= n {
        return Err(Error::BadArgument("Tweak exceeds group order".to_string()));
    }
    let internal = if public.is_odd_y() {
        Point { x: public.x.clone(), y: &p - &public.y }
    } else {
        public.clone()
    };
    let tweak_point = base_mul(&t);
    let sum = point_add(Some(&internal), tweak_point.as_ref())
        .ok_or_else(|| Error::IllegalState("Tweaked point at infinity".to_string()))?;
    if sum.is_odd_y() {
        Ok(Point { y: &p - &sum.y, x: sum.x })
    } else {
        Ok(sum)
    }
}

/// Tweaks a private scalar for a taproot key-path spend.
///
/// The scalar is negated first when its public point has an odd y, per
/// BIP-341, then the tweak is added mod n.
///
/// # Errors
/// `Error::BadArgument` for invalid inputs;
/// `Error::IllegalState` if the tweaked scalar degenerates to zero.
pub fn tweak_private_scalar(private_key: &[u8], tweak: &[u8; 32]) -> Result<[u8; 32]> {
    if !is_valid_private_key(private_key) {
        return Err(Error::BadArgument("Invalid private key".to_string()));
    }
    let n = curve_order();
    let t = BigUint::from_bytes_be(tweak);
    if t >= n {
        return Err(Error::BadArgument("Tweak exceeds group order".to_string()));
    }
    let mut secret = BigUint::from_bytes_be(private_key);
    let public = base_mul(&secret)
        .ok_or_else(|| Error::IllegalState("Public point at infinity".to_string()))?;
    if public.is_odd_y() {
        secret = &n - secret;
    }
    let tweaked = (secret + t) % n;
    if tweaked.is_zero() {
        return Err(Error::IllegalState("Tweaked key is zero".to_string()));
    }
    Ok(to_bytes32(&tweaked))
}
