//! Transaction sighash computation for signing.
//!
//! Three digest algorithms: legacy (pre-segwit), BIP-143 (segwit v0) and
//! BIP-341 (taproot). Each takes an immutable transaction snapshot plus
//! per-input parameters and returns the 32-byte digest a signature
//! commits to. BIP-143 intermediates are cached for multi-input
//! efficiency.
use crate::script::{op_codes::OP_CODESEPARATOR, next_op, Script, ScriptTemplate};
use crate::transaction::tx::Tx;
use crate::transaction::tx_out::TxOut;
use crate::util::{sha256, sha256d, tagged_hash, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, WriteBytesExt};

/// Signs all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs (anyone spend).
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only matching output.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Anyone can add inputs.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;
/// Taproot default sighash byte, equivalent to ALL.
pub const TAPROOT_SIGHASH_ALL: u8 = 0x00;

/// Cache for BIP-143 sighash intermediates (prevouts/sequences/outputs).
///
/// Reuse across inputs of the same transaction (O(1) after the first).
#[derive(Default, Debug)]
pub struct SigHashCache {
    hash_prevouts: Option<Hash256>,
    hash_sequence: Option<Hash256>,
    hash_outputs: Option<Hash256>,
}

impl SigHashCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// The digest algorithm covering an input, chosen from its locking
/// script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendClass {
    /// Pre-segwit inputs: legacy digest.
    Legacy,
    /// Segwit v0 witness programs and their P2SH-wrapped forms: BIP-143.
    WitnessV0,
    /// Taproot outputs: BIP-341 with the default sighash byte.
    Taproot,
}

/// Selects the digest algorithm for a locking script. P2SH scripts map to
/// [`SpendClass::Legacy`]; a P2SH-wrapped witness spend must state
/// [`SpendClass::WitnessV0`] explicitly via [`sighash_with_class`], since
/// the script hash hides the wrapped program.
#[must_use]
pub fn spend_class(lock_script: &Script) -> SpendClass {
    match lock_script.classify() {
        ScriptTemplate::P2tr => SpendClass::Taproot,
        ScriptTemplate::P2wpkh | ScriptTemplate::P2wsh => SpendClass::WitnessV0,
        _ => SpendClass::Legacy,
    }
}

/// Computes the digest for one input under the closed SIGHASH_ALL policy,
/// dispatching on the input's locking-script template: taproot inputs use
/// the BIP-341 digest with the default sighash byte, other witness
/// programs use BIP-143, and everything else the legacy algorithm.
///
/// `prevouts` must hold the spent output for every input, in input order.
/// Other sighash flags are reachable through the digest functions
/// directly.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range input index or a prevout
/// vector that does not match the inputs.
pub fn sighash(
    tx: &Tx,
    n_input: usize,
    prevouts: &[TxOut],
    script_code: &Script,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    if prevouts.len() != tx.inputs.len() {
        return Err(Error::BadArgument(format!(
            "Prevout count {} does not match input count {}",
            prevouts.len(),
            tx.inputs.len()
        )));
    }
    sighash_with_class(tx, n_input, prevouts, script_code, spend_class(&prevouts[n_input].lock_script), cache)
}

/// Computes the digest for one input with an explicitly stated spend
/// class, for P2SH-wrapped witness inputs the locking script cannot
/// reveal.
///
/// # Errors
/// As [`sighash`].
pub fn sighash_with_class(
    tx: &Tx,
    n_input: usize,
    prevouts: &[TxOut],
    script_code: &Script,
    class: SpendClass,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    if prevouts.len() != tx.inputs.len() {
        return Err(Error::BadArgument(format!(
            "Prevout count {} does not match input count {}",
            prevouts.len(),
            tx.inputs.len()
        )));
    }
    match class {
        SpendClass::Taproot => taproot_sighash(tx, n_input, prevouts, None, TAPROOT_SIGHASH_ALL),
        SpendClass::WitnessV0 => bip143_sighash(
            tx,
            n_input,
            &script_code.to_bytes(),
            prevouts[n_input].satoshis,
            SIGHASH_ALL,
            cache,
        ),
        SpendClass::Legacy => legacy_sighash(tx, n_input, &script_code.to_bytes(), SIGHASH_ALL),
    }
}

/// Legacy (pre-segwit) sighash.
///
/// Serializes a modified copy of the transaction: every input's unlock
/// script blanked except the target, which carries the script code;
/// NONE/SINGLE strip outputs and zero other sequences; SINGLE replaces
/// preceding outputs with the amount `-1` empty-script placeholder that
/// consensus hashes; ANYONECANPAY keeps only the target input. The
/// little-endian sighash flag is appended and the result double hashed.
///
/// # Errors
/// `Error::BadArgument` for an input index out of range or a
/// SIGHASH_SINGLE target without a matching output.
pub fn legacy_sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    sighash_type: u8,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    let base_type = sighash_type & 0x1f;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    if base_type == SIGHASH_SINGLE && n_input >= tx.outputs.len() {
        return Err(Error::BadArgument(
            "Input index is greater than the available outputs".to_string(),
        ));
    }
    // Signed script code never contains code separators
    let mut sub_script = Vec::with_capacity(script_code.len());
    let mut i = 0;
    while i < script_code.len() {
        let next = next_op(i, script_code);
        if script_code[i] != OP_CODESEPARATOR {
            sub_script.extend_from_slice(&script_code[i..next]);
        }
        i = next;
    }

    let mut s = Vec::with_capacity(256);
    s.write_u32::<LittleEndian>(tx.version)?;
    let n_inputs = if anyone_can_pay { 1 } else { tx.inputs.len() };
    var_int::write(n_inputs as u64, &mut s)?;
    for i in 0..tx.inputs.len() {
        let input_idx = if anyone_can_pay { n_input } else { i };
        let tx_in = &tx.inputs[input_idx];
        tx_in.prev_output.write(&mut s)?;
        if input_idx == n_input {
            var_int::write(sub_script.len() as u64, &mut s)?;
            s.extend_from_slice(&sub_script);
            s.write_u32::<LittleEndian>(tx_in.sequence)?;
        } else {
            var_int::write(0, &mut s)?;
            let sequence = if base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
                0
            } else {
                tx_in.sequence
            };
            s.write_u32::<LittleEndian>(sequence)?;
        }
        if anyone_can_pay {
            break;
        }
    }
    let num_outputs = match base_type {
        SIGHASH_NONE => 0,
        SIGHASH_SINGLE => n_input + 1,
        _ => tx.outputs.len(),
    };
    var_int::write(num_outputs as u64, &mut s)?;
    for i in 0..num_outputs {
        if base_type == SIGHASH_SINGLE && i < n_input {
            // Placeholder hashed in place of dropped outputs
            let empty = TxOut {
                satoshis: -1,
                lock_script: Script::new(),
            };
            empty.write(&mut s)?;
        } else {
            tx.outputs[i].write(&mut s)?;
        }
    }
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>(u32::from(sighash_type))?;
    Ok(sha256d(&s))
}

/// BIP-143 segwit v0 sighash.
///
/// Serializes: version | hashPrevouts | hashSequence | outpoint |
/// scriptCode | value | sequence | hashOutputs | locktime | LE32 flag,
/// double hashed. The intermediate hashes are zeroed under
/// ANYONECANPAY/NONE/SINGLE exactly as the BIP prescribes.
///
/// # Errors
/// `Error::BadArgument` for an input index out of range.
pub fn bip143_sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: i64,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    let mut s = Vec::with_capacity(200);
    let base_type = sighash_type & 0x1f;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    // 1. nVersion
    s.write_u32::<LittleEndian>(tx.version)?;
    // 2. hashPrevouts
    if !anyone_can_pay {
        if cache.hash_prevouts.is_none() {
            let mut prevouts = Vec::with_capacity(36 * tx.inputs.len());
            for input in &tx.inputs {
                input.prev_output.write(&mut prevouts)?;
            }
            cache.hash_prevouts = Some(sha256d(&prevouts));
        }
        s.extend_from_slice(&cache.hash_prevouts.as_ref().unwrap().0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 3. hashSequence
    if !anyone_can_pay && base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        if cache.hash_sequence.is_none() {
            let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
            for input in &tx.inputs {
                sequences.write_u32::<LittleEndian>(input.sequence)?;
            }
            cache.hash_sequence = Some(sha256d(&sequences));
        }
        s.extend_from_slice(&cache.hash_sequence.as_ref().unwrap().0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 4. outpoint
    tx.inputs[n_input].prev_output.write(&mut s)?;
    // 5. scriptCode len + code
    var_int::write(script_code.len() as u64, &mut s)?;
    s.extend_from_slice(script_code);
    // 6. value
    s.write_i64::<LittleEndian>(satoshis)?;
    // 7. nSequence
    s.write_u32::<LittleEndian>(tx.inputs[n_input].sequence)?;
    // 8. hashOutputs
    if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        if cache.hash_outputs.is_none() {
            let mut outputs = Vec::new();
            for out in &tx.outputs {
                out.write(&mut outputs)?;
            }
            cache.hash_outputs = Some(sha256d(&outputs));
        }
        s.extend_from_slice(&cache.hash_outputs.as_ref().unwrap().0);
    } else if base_type == SIGHASH_SINGLE && n_input < tx.outputs.len() {
        let mut single_out = Vec::with_capacity(tx.outputs[n_input].size());
        tx.outputs[n_input].write(&mut single_out)?;
        s.extend_from_slice(&sha256d(&single_out).0);
    } else {
        s.extend_from_slice(&[0u8; 32]);
    }
    // 9. nLockTime
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    // 10. sighash type
    s.write_u32::<LittleEndian>(u32::from(sighash_type))?;
    Ok(sha256d(&s))
}

/// BIP-341 taproot sighash, for key-path and script-path spends.
///
/// Single SHA-256 throughout, domain tagged "TapSighash". Requires the
/// spent output (amount and locking script) of every input even when
/// signing a single one. A `leaf_script` selects the script-path
/// extension: its tapleaf hash, a zero key-version byte and the
/// 0xFFFFFFFF codesep position are appended.
///
/// # Errors
/// `Error::BadArgument` when the prevout vector does not cover the
/// inputs, the input index is out of range, or SIGHASH_SINGLE has no
/// matching output.
pub fn taproot_sighash(
    tx: &Tx,
    n_input: usize,
    prevouts: &[TxOut],
    leaf_script: Option<&Script>,
    sighash_type: u8,
) -> Result<Hash256> {
    if n_input >= tx.inputs.len() {
        return Err(Error::BadArgument("Input index out of range".to_string()));
    }
    if prevouts.len() != tx.inputs.len() {
        return Err(Error::BadArgument(format!(
            "Prevout count {} does not match input count {}",
            prevouts.len(),
            tx.inputs.len()
        )));
    }
    let sighash_none = sighash_type & 0x03 == SIGHASH_NONE;
    let sighash_single = sighash_type & 0x03 == SIGHASH_SINGLE;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    if sighash_single && n_input >= tx.outputs.len() {
        return Err(Error::BadArgument(
            "Input index is greater than the available outputs".to_string(),
        ));
    }

    let mut s = Vec::with_capacity(256);
    // Epoch, then the sighash byte
    s.push(0x00);
    s.push(sighash_type);
    s.write_u32::<LittleEndian>(tx.version)?;
    s.write_u32::<LittleEndian>(tx.lock_time)?;

    if !anyone_can_pay {
        let mut prevout_bytes = Vec::with_capacity(36 * tx.inputs.len());
        for input in &tx.inputs {
            input.prev_output.write(&mut prevout_bytes)?;
        }
        s.extend_from_slice(&sha256(&prevout_bytes).0);

        let mut amounts = Vec::with_capacity(8 * prevouts.len());
        for prevout in prevouts {
            amounts.write_i64::<LittleEndian>(prevout.satoshis)?;
        }
        s.extend_from_slice(&sha256(&amounts).0);

        let mut script_pubkeys = Vec::new();
        for prevout in prevouts {
            script_pubkeys.extend_from_slice(&var_int::prepend(&prevout.lock_script.to_bytes()));
        }
        s.extend_from_slice(&sha256(&script_pubkeys).0);

        let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
        for input in &tx.inputs {
            sequences.write_u32::<LittleEndian>(input.sequence)?;
        }
        s.extend_from_slice(&sha256(&sequences).0);
    }

    if !(sighash_none || sighash_single) {
        let mut outputs = Vec::new();
        for out in &tx.outputs {
            out.write(&mut outputs)?;
        }
        s.extend_from_slice(&sha256(&outputs).0);
    }

    let ext_flag: u8 = u8::from(leaf_script.is_some());
    s.push(ext_flag * 2);

    if anyone_can_pay {
        tx.inputs[n_input].prev_output.write(&mut s)?;
        s.write_i64::<LittleEndian>(prevouts[n_input].satoshis)?;
        s.extend_from_slice(&var_int::prepend(&prevouts[n_input].lock_script.to_bytes()));
        s.write_u32::<LittleEndian>(tx.inputs[n_input].sequence)?;
    } else {
        s.write_u32::<LittleEndian>(n_input as u32)?;
    }

    if sighash_single {
        let mut single_out = Vec::with_capacity(tx.outputs[n_input].size());
        tx.outputs[n_input].write(&mut single_out)?;
        s.extend_from_slice(&sha256(&single_out).0);
    }

    if let Some(script) = leaf_script {
        s.extend_from_slice(&script.tapleaf_hash().0);
        s.push(0x00);
        s.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
    }

    Ok(tagged_hash("TapSighash", &s))
}
