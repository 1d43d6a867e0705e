//! Private and public keys and the signing facade.
//!
//! Binds a private scalar, a computed sighash digest and a signing scheme
//! (low-S deterministic ECDSA or BIP-340 Schnorr with optional taproot
//! tweak) into the final signature strings written into unlock scripts
//! and witness stacks. Also implements the historical "Bitcoin Signed
//! Message" format for arbitrary text.

use crate::ecc::curve::{
    base_mul, decode_point, encode_point, is_valid_private_key, Point,
};
use crate::ecc::taproot::{calculate_tweak, tweak_private_scalar, tweak_public_point, ScriptTree};
use crate::ecc::{ecdsa, schnorr};
use crate::transaction::sighash::TAPROOT_SIGHASH_ALL;
use crate::util::{hash160, sha256, sha256d, var_int, Error, Hash160, Hash256, Result};
use num_bigint::BigUint;
use rand::RngCore;

const MESSAGE_MAGIC: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// A validated secp256k1 private key with its derived public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: [u8; 32],
    public: Point,
}

/// A validated secp256k1 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
}

impl PrivateKey {
    /// Creates a private key from 32 bytes, validating the scalar range.
    ///
    /// # Errors
    /// `Error::BadArgument` for an out-of-range scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<PrivateKey> {
        if !is_valid_private_key(bytes) {
            return Err(Error::BadArgument("Invalid private key".to_string()));
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(bytes);
        let public = base_mul(&BigUint::from_bytes_be(&secret))
            .ok_or_else(|| Error::IllegalState("Public point at infinity".to_string()))?;
        Ok(PrivateKey { secret, public })
    }

    /// Creates a private key from a hex string.
    ///
    /// # Errors
    /// `Error::FromHexError` or `Error::BadArgument`.
    pub fn from_hex(s: &str) -> Result<PrivateKey> {
        let bytes = hex::decode(s)?;
        PrivateKey::from_bytes(&bytes)
    }

    /// Generates a fresh random private key.
    #[must_use]
    pub fn generate() -> PrivateKey {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Ok(key) = PrivateKey::from_bytes(&bytes) {
                return key;
            }
        }
    }

    /// Returns the raw 32-byte scalar.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret
    }

    /// Returns the scalar as a hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.secret)
    }

    /// The derived public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey { point: self.public.clone() }
    }

    /// Signs a transaction digest with deterministic low-S ECDSA and
    /// appends the sighash flag, returning the hex signature for an
    /// unlock script or witness item.
    ///
    /// # Errors
    /// `Error::IllegalState` if the bounded re-signing loop is exhausted.
    pub fn sign_input(&self, digest: &Hash256, sighash_flag: u8) -> Result<String> {
        let sig = ecdsa::sign_input(&self.secret, &digest.0, sighash_flag)?;
        Ok(hex::encode(sig))
    }

    /// Signs a taproot digest with a BIP-340 Schnorr signature.
    ///
    /// Key-path spends tweak the private key with the script tree
    /// (`apply_tweak` true); script-path spends sign with the untweaked
    /// internal key. The sighash byte is appended only when it differs
    /// from the taproot default. The auxiliary randomness is derived from
    /// the digest and signing key, so signatures are deterministic.
    ///
    /// # Errors
    /// `Error::BadArgument` for an invalid script tree;
    /// `Error::IllegalState` if self-verification fails.
    pub fn sign_taproot(
        &self,
        digest: &Hash256,
        sighash_flag: u8,
        script_tree: Option<&ScriptTree>,
        apply_tweak: bool,
    ) -> Result<String> {
        let signing_key = if apply_tweak {
            let tweak = calculate_tweak(&self.public.x_bytes(), script_tree)?;
            tweak_private_scalar(&self.secret, &tweak)?
        } else {
            self.secret
        };
        let mut aux_input = Vec::with_capacity(64);
        aux_input.extend_from_slice(&digest.0);
        aux_input.extend_from_slice(&signing_key);
        let aux = sha256(&aux_input);
        let mut signature = schnorr::sign(&digest.0, &signing_key, &aux.0)?.to_vec();
        if sighash_flag != TAPROOT_SIGHASH_ALL {
            signature.push(sighash_flag);
        }
        Ok(hex::encode(signature))
    }

    /// Signs an arbitrary text message in the historical recovery-prefixed
    /// compact format, returned as hex.
    ///
    /// The recovery prefix (27-30, or 31-34 for a compressed key) is
    /// brute-forced until public key recovery reproduces this key's hash.
    ///
    /// # Errors
    /// `Error::IllegalState` if no recovery prefix validates, which
    /// indicates a logic bug.
    pub fn sign_message(&self, message: &str, compressed: bool) -> Result<String> {
        let digest = magic_message_digest(message);
        let compact = ecdsa::sign_compact(&self.secret, &digest.0)?;
        let own_hash = self.public_key().hash160(compressed);
        let base: u8 = if compressed { 31 } else { 27 };
        for prefix in base..base + 4 {
            let mut candidate = Vec::with_capacity(65);
            candidate.push(prefix);
            candidate.extend_from_slice(&compact);
            if let Some(public) = recover_message_key(message, &candidate) {
                if public.hash160(compressed) == own_hash {
                    return Ok(hex::encode(candidate));
                }
            }
        }
        Err(Error::IllegalState("Cannot validate message signature".to_string()))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Never expose the scalar
        write!(f, "PrivateKey({})", self.public_key().to_hex(true))
    }
}

impl PublicKey {
    /// Creates a public key from a 33 or 65 byte encoding.
    ///
    /// # Errors
    /// `Error::BadArgument` for an invalid point.
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey> {
        Ok(PublicKey { point: decode_point(bytes)? })
    }

    /// Creates a public key from a hex string.
    ///
    /// # Errors
    /// `Error::FromHexError` or `Error::BadArgument`.
    pub fn from_hex(s: &str) -> Result<PublicKey> {
        let bytes = hex::decode(s)?;
        PublicKey::from_bytes(&bytes)
    }

    /// Encodes the key in compressed or uncompressed form.
    #[must_use]
    pub fn to_bytes(&self, compressed: bool) -> Vec<u8> {
        encode_point(&self.point, compressed)
    }

    /// Encodes the key as hex.
    #[must_use]
    pub fn to_hex(&self, compressed: bool) -> String {
        hex::encode(self.to_bytes(compressed))
    }

    /// The x coordinate, as used by taproot and BIP-340.
    #[must_use]
    pub fn x_only(&self) -> [u8; 32] {
        self.point.x_bytes()
    }

    /// The HASH160 of the chosen encoding.
    #[must_use]
    pub fn hash160(&self, compressed: bool) -> Hash160 {
        hash160(&self.to_bytes(compressed))
    }

    /// The underlying curve point.
    #[must_use]
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Computes the TapTweak for this key and an optional script tree.
    ///
    /// # Errors
    /// `Error::BadArgument` for an invalid script tree.
    pub fn calculate_tweak(&self, script_tree: Option<&ScriptTree>) -> Result<[u8; 32]> {
        calculate_tweak(&self.x_only(), script_tree)
    }

    /// The tweaked x-only output key: the taproot (v1) witness program
    /// committing to this internal key and script tree.
    ///
    /// # Errors
    /// `Error::BadArgument` for an invalid script tree;
    /// `Error::IllegalState` if the tweak degenerates.
    pub fn taproot_output_key(&self, script_tree: Option<&ScriptTree>) -> Result<[u8; 32]> {
        let tweak = self.calculate_tweak(script_tree)?;
        let output = tweak_public_point(&self.point, &tweak)?;
        Ok(output.x_bytes())
    }

    /// Verifies a recovery-prefixed message signature produced by
    /// [`PrivateKey::sign_message`].
    #[must_use]
    pub fn verify_message(&self, message: &str, signature_hex: &str) -> bool {
        let signature = match hex::decode(signature_hex) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        match recover_message_key(message, &signature) {
            Some(recovered) => recovered.point == self.point,
            None => false,
        }
    }
}

/// Digest of the magic signed-message envelope:
/// double SHA256 of `"\x18Bitcoin Signed Message:\n" || varint(len) || text`.
#[must_use]
pub fn magic_message_digest(message: &str) -> Hash256 {
    let mut buf = Vec::with_capacity(MESSAGE_MAGIC.len() + 9 + message.len());
    buf.extend_from_slice(MESSAGE_MAGIC);
    buf.extend_from_slice(&var_int::prepend(message.as_bytes()));
    sha256d(&buf)
}

// Recovers the signer of a prefixed compact message signature.
fn recover_message_key(message: &str, signature: &[u8]) -> Option<PublicKey> {
    if signature.len() != 65 {
        return None;
    }
    let prefix = signature[0];
    if !(27..=34).contains(&prefix) {
        return None;
    }
    let rec_id = if prefix >= 31 { prefix - 31 } else { prefix - 27 };
    let digest = magic_message_digest(message);
    let point = ecdsa::recover_public_key(rec_id, &signature[1..], &digest.0).ok()?;
    Some(PublicKey { point })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::op_codes::{OP_2, OP_CHECKMULTISIG, OP_CHECKSIG};
    use crate::script::ScriptElement::{Data, Op};
    use crate::script::{
        p2pkh_lock_script, p2pkh_unlock_script, p2tr_lock_script, p2wpkh_lock_script, Script,
    };
    use crate::transaction::sighash::{
        bip143_sighash, legacy_sighash, taproot_sighash, SigHashCache, SIGHASH_ALL, SIGHASH_NONE,
        TAPROOT_SIGHASH_ALL,
    };
    use crate::transaction::{ControlBlock, OutPoint, Tx, TxIn, TxOut, TxWitness};
    use pretty_assertions::assert_eq;

    fn input(txid: &str, index: u32) -> TxIn {
        TxIn::new(OutPoint {
            hash: Hash256::decode(txid).unwrap(),
            index,
        })
    }

    fn h160(hex_str: &str) -> Hash160 {
        let mut h = Hash160([0; 20]);
        h.0.copy_from_slice(&hex::decode(hex_str).unwrap());
        h
    }

    fn key(hex_str: &str) -> PrivateKey {
        PrivateKey::from_hex(hex_str).unwrap()
    }

    #[test]
    fn key_round_trip() {
        let k = key("a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        assert_eq!(k.to_hex(), "a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        assert_eq!(
            k.public_key().to_hex(true),
            "02d82c9860e36f15d7b72aa59e29347f951277c21cd4d34822acdeeadbcff8a546"
        );
        let uncompressed = k.public_key().to_hex(false);
        assert_eq!(PublicKey::from_hex(&uncompressed).unwrap(), k.public_key());
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn generate_produces_usable_keys() {
        let k = PrivateKey::generate();
        let digest = Hash256([9; 32]);
        let sig = k.sign_input(&digest, SIGHASH_ALL).unwrap();
        assert!(!sig.is_empty());
    }

    #[test]
    fn signed_p2pkh_vector() {
        // Spend of ...f448fb with fee-adjusted outputs 0x989680/0x1ba8140
        let sk = key("81c70e36ffa5e3e6425dc19c7c35315d3d72dc60b79cb78fe009a335de29dd22");
        let mut tx = Tx::new(
            vec![input("fb48f4e23bf6ddf606714141ac78c3e921c8c0bebeb7c8abb2c799e9ff96ce6c", 0)],
            vec![
                TxOut::new(10000000, p2pkh_lock_script(&h160("fd337ad3bf81e086d96a68e1f8d6a0a510f8c24a"))),
                TxOut::new(29000000, p2pkh_lock_script(&h160("c992931350c9ba48538003706953831402ea34ea"))),
            ],
            false,
        );
        let script_code = p2pkh_lock_script(&h160("c3f8e5b0f8455a2b02c29c4488a550278209b669"));
        let digest = legacy_sighash(&tx, 0, &script_code.to_bytes(), SIGHASH_ALL).unwrap();
        let sig = sk.sign_input(&digest, SIGHASH_ALL).unwrap();
        let unlock = p2pkh_unlock_script(
            &hex::decode(&sig).unwrap(),
            &sk.public_key().to_bytes(true),
        );
        tx.set_unlock_script(0, unlock).unwrap();
        assert_eq!(
            tx.to_hex().unwrap(),
            "02000000016cce96ffe999c7b2abc8b7bebec0c821e9c378ac41417106f6ddf63be2f448fb\
             000000006a473044022079dad1afef077fa36dcd3488708dd05ef37888ef550b45eb00cdb0\
             4ba3fc980e02207a19f6261e69b604a92e2bffdf6ddbed0c64f55d5003e9dfb58b874b07ae\
             f3d7012103a2fef1829e0742b89c218c51898d9e7cb9d51201ba2bf9d9e9214ebb6af32708\
             ffffffff0280969800000000001976a914fd337ad3bf81e086d96a68e1f8d6a0a510f8c24a\
             88ac4081ba01000000001976a914c992931350c9ba48538003706953831402ea34ea88ac00\
             000000"
        );
    }

    #[test]
    fn signed_p2pkh_signone_vector() {
        let sk = key("81c70e36ffa5e3e6425dc19c7c35315d3d72dc60b79cb78fe009a335de29dd22");
        let mut tx = Tx::new(
            vec![input("fb48f4e23bf6ddf606714141ac78c3e921c8c0bebeb7c8abb2c799e9ff96ce6c", 0)],
            vec![
                TxOut::new(10000000, p2pkh_lock_script(&h160("fd337ad3bf81e086d96a68e1f8d6a0a510f8c24a"))),
                TxOut::new(29000000, p2pkh_lock_script(&h160("42151d0c21442c2b038af0ad5ee64b9d6f4f4e49"))),
            ],
            false,
        );
        let script_code = p2pkh_lock_script(&h160("c3f8e5b0f8455a2b02c29c4488a550278209b669"));
        let digest = legacy_sighash(&tx, 0, &script_code.to_bytes(), SIGHASH_NONE).unwrap();
        let sig = sk.sign_input(&digest, SIGHASH_NONE).unwrap();
        let unlock = p2pkh_unlock_script(
            &hex::decode(&sig).unwrap(),
            &sk.public_key().to_bytes(true),
        );
        tx.set_unlock_script(0, unlock).unwrap();
        assert_eq!(
            tx.to_hex().unwrap(),
            "02000000016cce96ffe999c7b2abc8b7bebec0c821e9c378ac41417106f6ddf63be2f448fb\
             000000006a47304402201e4b7a2ed516485fdde697ba63f6670d43aa6f18d82f18bae12d5f\
             d228363ac10220670602bec9df95d7ec4a619a2f44e0b8dcf522fdbe39530dd78d738c0ed0\
             c430022103a2fef1829e0742b89c218c51898d9e7cb9d51201ba2bf9d9e9214ebb6af32708\
             ffffffff0280969800000000001976a914fd337ad3bf81e086d96a68e1f8d6a0a510f8c24a\
             88ac4081ba01000000001976a91442151d0c21442c2b038af0ad5ee64b9d6f4f4e4988ac00\
             000000"
        );
        assert_eq!(
            tx.txid().encode(),
            "105933681b0ca37ae0c0af43ae6f111803c899232b7fd586584b532dbe21ae6f"
        );
    }

    #[test]
    fn signed_p2wpkh_vector() {
        // BIP-143 P2WPKH spend at 990000 sat
        let sk = key("a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        let owner = sk.public_key().hash160(true);
        let script_code = p2pkh_lock_script(&owner);
        let mut tx = Tx::new(
            vec![input("b3ca1c4cc778380d1e5376a5517445104e46e97176e40741508a3b07a6483ad3", 0)],
            vec![TxOut::new(980000, p2pkh_lock_script(&owner))],
            true,
        );
        let mut cache = SigHashCache::new();
        let digest =
            bip143_sighash(&tx, 0, &script_code.to_bytes(), 990000, SIGHASH_ALL, &mut cache).unwrap();
        let sig = sk.sign_input(&digest, SIGHASH_ALL).unwrap();
        tx.add_witness(TxWitness(vec![
            hex::decode(&sig).unwrap(),
            sk.public_key().to_bytes(true),
        ]));
        assert_eq!(
            tx.to_hex().unwrap(),
            "02000000000101d33a48a6073b8a504107e47671e9464e10457451a576531e0d3878c74c1c\
             cab30000000000ffffffff0120f40e00000000001976a914fd337ad3bf81e086d96a68e1f8\
             d6a0a510f8c24a88ac0247304402201c7ec9b049daa99c78675810b5e36b0b61add3f84180\
             eaeaa613f8525904bdc302204854830d463a4699b6d69e37c08b8d3c6158185d46499170cf\
             cc24d4a9e9a37f012102d82c9860e36f15d7b72aa59e29347f951277c21cd4d34822acdeea\
             dbcff8a54600000000"
        );
    }

    fn multisig_2_of_2(a: &PublicKey, b: &PublicKey) -> Script {
        Script(vec![
            Op(OP_2),
            Data(a.to_bytes(true)),
            Data(b.to_bytes(true)),
            Op(OP_2),
            Op(OP_CHECKMULTISIG),
        ])
    }

    #[test]
    fn signed_p2wsh_multisig_vector() {
        // 2-of-2 multisig witness script spent at 970000 sat
        let sk1 = key("a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        let sk2 = key("81c70e36ffa5e3e6425dc19c7c35315d3d72dc60b79cb78fe009a335de29dd22");
        let witness_script = multisig_2_of_2(&sk1.public_key(), &sk2.public_key());
        let mut tx = Tx::new(
            vec![input("6233aca9f2d6165da2d7b4e35d73b039a22b53f58ce5af87dddee7682be937ea", 0)],
            vec![TxOut::new(960000, p2pkh_lock_script(&sk1.public_key().hash160(true)))],
            true,
        );
        let mut cache = SigHashCache::new();
        let digest = bip143_sighash(
            &tx,
            0,
            &witness_script.to_bytes(),
            970000,
            SIGHASH_ALL,
            &mut cache,
        )
        .unwrap();
        let sig1 = sk1.sign_input(&digest, SIGHASH_ALL).unwrap();
        let sig2 = sk2.sign_input(&digest, SIGHASH_ALL).unwrap();
        // CHECKMULTISIG pops an extra stack item; the empty first element
        tx.add_witness(TxWitness(vec![
            vec![],
            hex::decode(&sig1).unwrap(),
            hex::decode(&sig2).unwrap(),
            witness_script.to_bytes(),
        ]));
        assert_eq!(
            tx.to_hex().unwrap(),
            "02000000000101ea37e92b68e7dedd87afe58cf5532ba239b0735de3b4d7a25d16d6f2a9ac\
             33620000000000ffffffff0100a60e00000000001976a914fd337ad3bf81e086d96a68e1f8\
             d6a0a510f8c24a88ac040047304402205c88b6c247c6b59e1cc48493b66629b6c011d97b99\
             ecf991b595e891542cf1a802204fa0e3c238818a65adc87a0b2511ba780e4b57ff6c1ba6b2\
             7815b1dca7b72c1c01473044022012840e38d61972f32208c23a05c73952cc36503112b0c2\
             250fc8428b1e9c5fe4022051758dc7ce32567e2b71efb9df6dc161c9ec4bc0c2e8116c4228\
             d27810cdb4d70147522102d82c9860e36f15d7b72aa59e29347f951277c21cd4d34822acde\
             eadbcff8a5462103a2fef1829e0742b89c218c51898d9e7cb9d51201ba2bf9d9e9214ebb6a\
             f3270852ae00000000"
        );
    }

    #[test]
    fn signed_mixed_inputs_vector() {
        // Legacy, P2WSH and P2WPKH inputs in one segwit transaction; the
        // legacy input carries an empty witness stack
        let sk1 = key("a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        let sk2 = key("81c70e36ffa5e3e6425dc19c7c35315d3d72dc60b79cb78fe009a335de29dd22");
        let owner = sk1.public_key().hash160(true);
        let witness_script = multisig_2_of_2(&sk1.public_key(), &sk2.public_key());
        let mut tx = Tx::new(
            vec![
                input("24d949f8c77d7fc0cd09c8d5fccf7a0249178c16170c738da19f6c4b176c9f4b", 0),
                input("65f4d69c91a8de54dc11096eaa315e84ef91a389d1d1c17a691b72095100a3a4", 0),
                input("6c8fc6453a2a3039c2b5b55dcc59587e8b0afa52f92607385b5f4c7e84f38aa2", 0),
            ],
            vec![
                TxOut::new(100000, witness_script.to_p2wsh_lock_script()),
                TxOut::new(100000, p2wpkh_lock_script(&owner)),
                TxOut::new(1770000, p2pkh_lock_script(&owner)),
            ],
            true,
        );
        let script_code = p2pkh_lock_script(&owner);
        // All digests are independent of the unlock scripts and witnesses
        // written back afterwards
        let digest0 = legacy_sighash(&tx, 0, &script_code.to_bytes(), SIGHASH_ALL).unwrap();
        let mut cache = SigHashCache::new();
        let digest1 =
            bip143_sighash(&tx, 1, &witness_script.to_bytes(), 690000, SIGHASH_ALL, &mut cache)
                .unwrap();
        let digest2 =
            bip143_sighash(&tx, 2, &script_code.to_bytes(), 790000, SIGHASH_ALL, &mut cache)
                .unwrap();

        let sig0 = sk1.sign_input(&digest0, SIGHASH_ALL).unwrap();
        tx.set_unlock_script(
            0,
            p2pkh_unlock_script(&hex::decode(&sig0).unwrap(), &sk1.public_key().to_bytes(true)),
        )
        .unwrap();
        tx.add_witness(TxWitness::new());
        let sig1a = sk1.sign_input(&digest1, SIGHASH_ALL).unwrap();
        let sig1b = sk2.sign_input(&digest1, SIGHASH_ALL).unwrap();
        tx.add_witness(TxWitness(vec![
            vec![],
            hex::decode(&sig1a).unwrap(),
            hex::decode(&sig1b).unwrap(),
            witness_script.to_bytes(),
        ]));
        let sig2 = sk1.sign_input(&digest2, SIGHASH_ALL).unwrap();
        tx.add_witness(TxWitness(vec![
            hex::decode(&sig2).unwrap(),
            sk1.public_key().to_bytes(true),
        ]));
        assert_eq!(
            tx.to_hex().unwrap(),
            "020000000001034b9f6c174b6c9fa18d730c17168c1749027acffcd5c809cdc07f7dc7f849\
             d924000000006a47304402206932c93458a6ebb85f9fd6f69666cd383a3b8c8d517a096501\
             438840d90493070220544d996a737ca9affda3573635b09e215be1ffddbee9b1260fc3d85d\
             61d90ae5012102d82c9860e36f15d7b72aa59e29347f951277c21cd4d34822acdeeadbcff8\
             a546ffffffffa4a3005109721b697ac1d1d189a391ef845e31aa6e0911dc54dea8919cd6f4\
             650000000000ffffffffa28af3847e4c5f5b380726f952fa0a8b7e5859cc5db5b5c239302\
             a3a45c68f6c0000000000ffffffff03a0860100000000002200203956f9730cf7275000f4e\
             3faf5db0505b216222c1f7ca1bdfb81a877003fcb93a086010000000000160014fd337ad3b\
             f81e086d96a68e1f8d6a0a510f8c24a10021b00000000001976a914fd337ad3bf81e086d96\
             a68e1f8d6a0a510f8c24a88ac00040047304402206503d3610d916835412449f262c862314\
             6503d6f58c9b0343e8d1670b906c4da02200b2b8db13ddc9f157bb95e74c28d273adce4994\
             4307aa6a041dba1ed7c528d610147304402207ea74eff48e56f2c0d9afb70b2a90ebf6fcd3\
             ce1e084350f3c061f88dde5eff402203c841f7bf969d04b383ebb1dee4118724bfc9da0260\
             b10f64a0ba7ef3a8d43f00147522102d82c9860e36f15d7b72aa59e29347f951277c21cd4d\
             34822acdeeadbcff8a5462103a2fef1829e0742b89c218c51898d9e7cb9d51201ba2bf9d9e\
             9214ebb6af3270852ae024730440220733fcbd21517a1559e9561668e480ffd0a24b62520c\
             fa16ca7689b20f7f82be402204f053a27f19e0bd1346676c74c65e9e452515bc6510ab307a\
             c3a3fb6d3c89ca7012102d82c9860e36f15d7b72aa59e29347f951277c21cd4d34822acdee\
             adbcff8a54600000000"
        );
        let parsed = Tx::from_hex(&tx.to_hex().unwrap()).unwrap();
        assert_eq!(parsed.txid(), tx.txid());
    }

    fn taproot_leaf(private_hex: &str) -> Script {
        let xonly = key(private_hex).public_key().x_only();
        Script(vec![Data(xonly.to_vec()), Op(OP_CHECKSIG)])
    }

    #[test]
    fn signed_taproot_key_path_vector() {
        // Key-path spend of an output carrying one tapscript alternative
        let from = key("a2bc5baf18c6ebe09324e95cf3385ad245d942f3f23d9c262e246e7dd3cc46bb");
        let to = key("290fcc5457792514a1e1bbba32e7329c5018a0a76a09751f4f97084dc7aaa176");
        let leaf = taproot_leaf("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let tree = ScriptTree::Leaf(leaf);

        let from_program = from.public_key().taproot_output_key(Some(&tree)).unwrap();
        let to_program = to.public_key().taproot_output_key(None).unwrap();
        let prevouts = vec![TxOut::new(3500, p2tr_lock_script(&from_program))];
        let mut tx = Tx::new(
            vec![input("3d4c9d73c4c65772e645ff26493590ae4913d9c37125b72398222a553b73fa66", 0)],
            vec![TxOut::new(3000, p2tr_lock_script(&to_program))],
            true,
        );
        let digest = taproot_sighash(&tx, 0, &prevouts, None, TAPROOT_SIGHASH_ALL).unwrap();
        let sig = from
            .sign_taproot(&digest, TAPROOT_SIGHASH_ALL, Some(&tree), true)
            .unwrap();
        tx.add_witness(TxWitness(vec![hex::decode(&sig).unwrap()]));
        let raw = tx.to_hex().unwrap();
        assert_eq!(
            raw,
            "0200000000010166fa733b552a229823b72571c3d91349ae90354926ff45e67257c6c4739d\
             4c3d0000000000ffffffff01b80b000000000000225120d4213cd57207f22a9e905302007b\
             99b84491534729bd5f4065bdcb42ed10fcd50140f1776ddef90a87b646a45ad4821b8dd33e\
             01c5036cbe071a2e1e609ae0c0963685cb8749001944dbe686662dd7c95178c85c4f59c685\
             b646ab27e34df766b7b100000000"
        );
        let parsed = Tx::from_hex(&raw).unwrap();
        assert_eq!(parsed.txid(), tx.txid());
    }

    #[test]
    fn signed_taproot_script_path_vector() {
        let from = key("a2bc5baf18c6ebe09324e95cf3385ad245d942f3f23d9c262e246e7dd3cc46bb");
        let to = key("290fcc5457792514a1e1bbba32e7329c5018a0a76a09751f4f97084dc7aaa176");
        let script_key = key("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let leaf = taproot_leaf("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let tree = ScriptTree::Leaf(leaf.clone());

        let from_program = from.public_key().taproot_output_key(Some(&tree)).unwrap();
        let to_program = to.public_key().taproot_output_key(None).unwrap();
        let prevouts = vec![TxOut::new(3500, p2tr_lock_script(&from_program))];
        let mut tx = Tx::new(
            vec![input("3d4c9d73c4c65772e645ff26493590ae4913d9c37125b72398222a553b73fa66", 0)],
            vec![TxOut::new(3000, p2tr_lock_script(&to_program))],
            true,
        );
        let digest = taproot_sighash(&tx, 0, &prevouts, Some(&leaf), TAPROOT_SIGHASH_ALL).unwrap();
        // Script-path spends sign with the untweaked leaf key
        let sig = script_key
            .sign_taproot(&digest, TAPROOT_SIGHASH_ALL, Some(&tree), false)
            .unwrap();
        let control_block = ControlBlock::new(from.public_key().x_only(), vec![]);
        tx.add_witness(TxWitness(vec![
            hex::decode(&sig).unwrap(),
            leaf.to_bytes(),
            control_block.to_bytes(),
        ]));
        let raw = tx.to_hex().unwrap();
        assert_eq!(
            raw,
            "0200000000010166fa733b552a229823b72571c3d91349ae90354926ff45e67257c6c4739d\
             4c3d0000000000ffffffff01b80b000000000000225120d4213cd57207f22a9e905302007b\
             99b84491534729bd5f4065bdcb42ed10fcd50340bf0a391574b56651923abdb25673105900\
             8a08b5a3406cd81ce10ef5e7f936c6b9f7915ec1054e2a480e4552fa177aed868dc8b28c62\
             63476871b21584690ef8222013f523102815e9fbbe132ffb8329b0fef5a9e4836d216dce18\
             24633287b0abc6ac21c01036a7ed8d24eac9057e114f22342ebf20c16d37f0d25cfd2c900b\
             f401ec09c900000000"
        );
        let parsed = Tx::from_hex(&raw).unwrap();
        assert_eq!(parsed.txid(), tx.txid());
    }

    #[test]
    fn signed_taproot_two_leaf_script_path_vector() {
        let from = key("a2bc5baf18c6ebe09324e95cf3385ad245d942f3f23d9c262e246e7dd3cc46bb");
        let to = key("290fcc5457792514a1e1bbba32e7329c5018a0a76a09751f4f97084dc7aaa176");
        let script_key_a = key("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let leaf_a = taproot_leaf("92c8c1e89bd600be686741fb979bb9b15af8ec76b8125fa5079009aa37f788a9");
        let leaf_b = taproot_leaf("9f249e025cb2f9c5cf1bbec44e0766c839d862865f8b1a71d386eacb6225d4ef");
        let tree = ScriptTree::Branch(vec![
            ScriptTree::Leaf(leaf_a.clone()),
            ScriptTree::Leaf(leaf_b.clone()),
        ]);

        let from_program = from.public_key().taproot_output_key(Some(&tree)).unwrap();
        let to_program = to.public_key().taproot_output_key(None).unwrap();
        let prevouts = vec![TxOut::new(3500, p2tr_lock_script(&from_program))];
        let mut tx = Tx::new(
            vec![input("808ec85db7b005f1292cea744b24e9d72ba4695e065e2d968ca17744b5c5c14d", 0)],
            vec![TxOut::new(3000, p2tr_lock_script(&to_program))],
            true,
        );
        let digest = taproot_sighash(&tx, 0, &prevouts, Some(&leaf_a), TAPROOT_SIGHASH_ALL).unwrap();
        let sig = script_key_a
            .sign_taproot(&digest, TAPROOT_SIGHASH_ALL, Some(&tree), false)
            .unwrap();
        let control_block =
            ControlBlock::new(from.public_key().x_only(), vec![leaf_b.tapleaf_hash()]);
        tx.add_witness(TxWitness(vec![
            hex::decode(&sig).unwrap(),
            leaf_a.to_bytes(),
            control_block.to_bytes(),
        ]));
        assert_eq!(
            tx.to_hex().unwrap(),
            "020000000001014dc1c5b54477a18c962d5e065e69a42bd7e9244b74ea2c29f105b0b75dc8\
             8e800000000000ffffffff01b80b000000000000225120d4213cd57207f22a9e905302007b\
             99b84491534729bd5f4065bdcb42ed10fcd50340ab89d20fee5557e57b7cf85840721ef28d\
             68e91fd162b2d520e553b71d604388ea7c4b2fcc4d946d5d3be3c12ef2d129ffb92594bc1f\
             42cdaec8280d0c83ecc2222013f523102815e9fbbe132ffb8329b0fef5a9e4836d216dce18\
             24633287b0abc6ac41c01036a7ed8d24eac9057e114f22342ebf20c16d37f0d25cfd2c900b\
             f401ec09c9682f0e85d59cb20fd0e4503c035d609f127c786136f276d475e8321ec9e77e6c\
             00000000"
        );
    }

    #[test]
    fn message_sign_verify() {
        let sk = key("a67d3c308333c63f5e83a75e42a5533d0ac27153ecf443dd75cd4306d0c68fba");
        let signature = sk.sign_message("hello", true).unwrap();
        assert_eq!(signature.len(), 130);
        let prefix = u8::from_str_radix(&signature[..2], 16).unwrap();
        assert!((31..=34).contains(&prefix));
        assert!(sk.public_key().verify_message("hello", &signature));
        assert!(!sk.public_key().verify_message("hullo", &signature));
        let other = key("81c70e36ffa5e3e6425dc19c7c35315d3d72dc60b79cb78fe009a335de29dd22");
        assert!(!other.public_key().verify_message("hello", &signature));
    }

    #[test]
    fn message_sign_uncompressed_prefix() {
        let sk = key("f0ef687ea00a50936b659748b89a5b65dff8b3cea215d33f5d8c0917faab9c43");
        let signature = sk.sign_message("test message", false).unwrap();
        let prefix = u8::from_str_radix(&signature[..2], 16).unwrap();
        assert!((27..=30).contains(&prefix));
        assert!(sk.public_key().verify_message("test message", &signature));
    }

    #[test]
    fn magic_digest_vector() {
        assert_eq!(
            hex::encode(magic_message_digest("hello").0),
            "cf0447ec85f0ce7150a257db32ebfcb7523dae17c36dbd1be598779fec0484f4"
        );
    }
}
