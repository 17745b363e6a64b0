/*
    M-of-N multisig redeem scripts wrapped in P2SH.

    Keys are embedded in compressed form. The order given by the caller is
    kept unless the BIP-67 constructor is used.
*/

use thiserror::Error;

use crate::{
    address::Address,
    curve::CurvePoint,
    encoding::sec1::{self, Sec1Error},
    error::ErrorKind,
    script::{
        opcodes,
        Opcode,
        Script,
        ScriptBuilder,
        ScriptError
    },
    util::Network
};

pub const MAX_KEYS: usize = 16;
pub const MIN_KEYS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultisigError {
    #[error("threshold {threshold} is out of range for {keys} keys")]
    InvalidThreshold { threshold: usize, keys: usize },
    #[error("{0} keys given, at most 16 are allowed")]
    TooManyKeys(usize),
    #[error("{0} keys given, at least 2 are required")]
    TooFewKeys(usize),
    #[error(transparent)]
    Sec1(#[from] Sec1Error),
    #[error(transparent)]
    Script(#[from] ScriptError)
}

impl MultisigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sec1(e) => e.kind(),
            Self::Script(e) => e.kind(),
            _ => ErrorKind::PolicyViolation
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisig {
    threshold: usize,
    keys: Vec<[u8; 33]>,
    redeem_script: Script
}

fn small_int(n: usize) -> Opcode {
    //Callers have checked 1 <= n <= 16
    Opcode::small_int(n as u8).unwrap_or(opcodes::OP_INVALIDOPCODE)
}

impl Multisig {
    /**
        Creates the redeem script for a m-of-n multisig wallet.
        Key order is preserved exactly as given.
    */
    pub fn new(threshold: usize, keys: &[CurvePoint]) -> Result<Self, MultisigError> {
        let keys = keys
            .iter()
            .map(sec1::encode_compressed)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_encoded(threshold, keys)
    }

    /// Same as [`Multisig::new`] but sorts the compressed keys lexicographically (BIP-67).
    pub fn sorted(threshold: usize, keys: &[CurvePoint]) -> Result<Self, MultisigError> {
        let mut keys = keys
            .iter()
            .map(sec1::encode_compressed)
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort();
        Self::from_encoded(threshold, keys)
    }

    fn from_encoded(threshold: usize, keys: Vec<[u8; 33]>) -> Result<Self, MultisigError> {
        let n = keys.len();
        if threshold < 1 || threshold > n {
            return Err(MultisigError::InvalidThreshold { threshold, keys: n });
        }
        if n > MAX_KEYS {
            return Err(MultisigError::TooManyKeys(n));
        }
        if n < MIN_KEYS {
            return Err(MultisigError::TooFewKeys(n));
        }

        let mut builder = ScriptBuilder::new().push_opcode(small_int(threshold));
        for key in &keys {
            builder = builder.push_slice(key);
        }
        let redeem_script = builder
            .push_opcode(small_int(n))
            .push_opcode(opcodes::OP_CHECKMULTISIG)
            .into_script()?;

        log::trace!("built {}-of-{} multisig redeem script", threshold, n);
        Ok(Self { threshold, keys, redeem_script })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Compressed SEC1 keys in script order
    pub fn keys(&self) -> &[[u8; 33]] {
        &self.keys
    }

    pub fn redeem_script(&self) -> &Script {
        &self.redeem_script
    }

    /// Hash160 of the serialized redeem script
    pub fn script_hash(&self) -> [u8; 20] {
        self.redeem_script.hash160()
    }

    pub fn address(&self, network: Network) -> Address {
        Address::from_script(&self.redeem_script, network)
    }
}
