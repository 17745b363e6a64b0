/*
    Standard script templates and the P2PKH script sig.
*/

use super::{
    opcodes::*,
    Command,
    Script,
    ScriptError,
    Signature
};
use crate::{
    curve::{CurveOps, CurvePoint},
    encoding::sec1::{self, EncodedPublicKey}
};

fn hash20(hash: &[u8]) -> Result<Vec<u8>, ScriptError> {
    if hash.len() != 20 {
        return Err(ScriptError::InvalidHashLength(hash.len()));
    }
    Ok(hash.to_vec())
}

/// OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
pub fn create_p2pkh(hash: &[u8]) -> Result<Script, ScriptError> {
    Ok(Script {
        commands: vec![
            Command::Opcode(OP_DUP),
            Command::Opcode(OP_HASH160),
            Command::Data(hash20(hash)?),
            Command::Opcode(OP_EQUALVERIFY),
            Command::Opcode(OP_CHECKSIG)
        ]
    })
}

/// <compressed key> OP_CHECKSIG
pub fn create_p2pk(point: &CurvePoint) -> Result<Script, ScriptError> {
    let key = sec1::encode_compressed(point)?;
    Ok(Script {
        commands: vec![Command::Data(key.to_vec()), Command::Opcode(OP_CHECKSIG)]
    })
}

/// OP_HASH160 <hash> OP_EQUAL
pub fn create_p2sh(hash: &[u8]) -> Result<Script, ScriptError> {
    Ok(Script {
        commands: vec![
            Command::Opcode(OP_HASH160),
            Command::Data(hash20(hash)?),
            Command::Opcode(OP_EQUAL)
        ]
    })
}

/// <DER signature || sighash> <public key>
pub fn create_p2pkh_script_sig(signature: &Signature, sighash: u8, public_key: &EncodedPublicKey) -> Script {
    let mut sig = signature.to_der();
    sig.push(sighash);
    Script {
        commands: vec![Command::Data(sig), Command::Data(public_key.as_bytes().to_vec())]
    }
}

/**
    Splits a P2PKH script sig into its signature, public key and sighash byte.
    The signature must be strict DER and the key must be a valid point.
*/
pub fn parse_p2pkh_script_sig<C>(curve: &C, bytes: &[u8]) -> Result<(Signature, EncodedPublicKey, u8), ScriptError>
where C: CurveOps + ?Sized
{
    let script = Script::parse(bytes)?;
    let (sig, key) = match script.commands() {
        [Command::Data(sig), Command::Data(key)] => (sig, key),
        [_, _] => return Err(ScriptError::MalformedScriptSig("expected two data pushes")),
        _ => return Err(ScriptError::MalformedScriptSig("expected exactly two commands"))
    };

    let (sighash, der) = sig
        .split_last()
        .ok_or(ScriptError::MalformedScriptSig("empty signature push"))?;
    let signature = Signature::from_der(der)?;
    let public_key = EncodedPublicKey::validate(curve, key)?;

    Ok((signature, public_key, *sighash))
}
