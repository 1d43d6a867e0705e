#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*! # Sigil

A Bitcoin transaction construction and signing toolkit. Provides byte-exact
primitives for scripts and transactions, the three consensus sighash
algorithms (legacy, BIP-143 segwit v0, BIP-341 taproot), deterministic ECDSA
(RFC 6979) with low-S normalization, BIP-340 Schnorr signatures, and taproot
key tweaking.

## Usage
use sigil::keys::PrivateKey;
use sigil::transaction::{Tx, TxIn, TxOut, sighash};
Build a `Tx` skeleton, compute each input's digest with the matching
sighash function, sign with `PrivateKey::sign_input` or
`PrivateKey::sign_taproot`, write the result back into the unlock script
or witness stack, then serialize.

## Scope
Address encoding (Base58Check, Bech32), BIP-39/BIP-32 derivation and any
networking live outside this crate; it consumes raw key material and
locking scripts and produces wire-format transaction bytes.

## Security
- Nonces are deterministic (RFC 6979 / BIP-340); the only randomness
  consumed is for key generation.
- Every Schnorr signature is self-verified before it is returned.
*/

pub mod ecc;
pub mod keys;
pub mod script;
pub mod transaction;
pub mod util;
