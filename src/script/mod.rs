/*
    Bitcoin Script.

    A script is an ordered list of commands, each either a bare opcode
    or a data push. Push encodings are chosen from the data length alone,
    so every list of commands has exactly one serialization.
*/

pub mod builder;
pub mod opcodes;
pub mod signature;
pub mod templates;

use thiserror::Error;

use crate::{
    encoding::sec1::Sec1Error,
    error::ErrorKind,
    hash
};

pub use builder::{Builder, Builder as ScriptBuilder};
pub use opcodes::Opcode;
pub use signature::{Signature, SigHashType, SIGHASH_ALL};
pub use templates::{
    create_p2pk,
    create_p2pkh,
    create_p2pkh_script_sig,
    create_p2sh,
    parse_p2pkh_script_sig
};

use opcodes::*;

/// Largest push a direct length byte can express
pub const MAX_DIRECT_PUSH: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("script truncated at byte {position}: needed {needed} bytes, {available} available")]
    Truncated { position: usize, needed: usize, available: usize },
    #[error("push length does not fit in memory or in a 4 byte length prefix")]
    Overflow,
    #[error("opcode {0:#04x} introduces a data push and cannot be used bare")]
    InvalidCommand(u8),
    #[error("expected a 20 byte hash, found {0} bytes")]
    InvalidHashLength(usize),
    #[error("malformed DER signature: {0}")]
    MalformedSignature(&'static str),
    #[error("malformed script sig: {0}")]
    MalformedScriptSig(&'static str),
    #[error(transparent)]
    Key(#[from] Sec1Error)
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Key(e) => e.kind(),
            _ => ErrorKind::MalformedInput
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Opcode(Opcode),
    Data(Vec<u8>)
}

impl From<Opcode> for Command {
    fn from(opcode: Opcode) -> Self {
        Command::Opcode(opcode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Script {
    commands: Vec<Command>
}

//Empty pushes serialize to 0x00 which reads back as OP_0, so store them that way
fn normalize(command: Command) -> Result<Command, ScriptError> {
    match command {
        Command::Data(data) if data.is_empty() => Ok(Command::Opcode(OP_0)),
        Command::Data(data) => {
            u32::try_from(data.len()).map_err(|_| ScriptError::Overflow)?;
            Ok(Command::Data(data))
        },
        Command::Opcode(op) if op.is_push() => Err(ScriptError::InvalidCommand(op.into_u8())),
        command => Ok(command)
    }
}

fn write_push_prefix(out: &mut Vec<u8>, len: usize) {
    match len {
        0..=MAX_DIRECT_PUSH => out.push(len as u8),
        0x4c..=0xff => {
            out.push(OP_PUSHDATA1.into_u8());
            out.push(len as u8);
        },
        0x100..=0xffff => {
            out.push(OP_PUSHDATA2.into_u8());
            out.extend_from_slice(&(len as u16).to_le_bytes());
        },
        _ => {
            out.push(OP_PUSHDATA4.into_u8());
            out.extend_from_slice(&(len as u32).to_le_bytes());
        }
    }
}

fn prefix_len(len: usize) -> usize {
    match len {
        0..=MAX_DIRECT_PUSH => 1,
        0x4c..=0xff => 2,
        0x100..=0xffff => 3,
        _ => 5
    }
}

/// Reads a little endian push length of `width` bytes and advances the cursor.
fn read_push_len(bytes: &[u8], cursor: &mut usize, width: usize) -> Result<usize, ScriptError> {
    let field = bytes.get(*cursor..*cursor + width).ok_or(ScriptError::Truncated {
        position: *cursor,
        needed: width,
        available: bytes.len() - *cursor
    })?;
    *cursor += width;

    let len = field
        .iter()
        .rev()
        .fold(0u32, |acc, b| (acc << 8) | *b as u32);
    usize::try_from(len).map_err(|_| ScriptError::Overflow)
}

impl Script {
    /// Builds a script from commands. Empty data pushes become OP_0.
    pub fn new(commands: Vec<Command>) -> Result<Self, ScriptError> {
        let commands = commands
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn serialized_len(&self) -> usize {
        self.commands.iter().map(|c| match c {
            Command::Opcode(_) => 1,
            Command::Data(data) => prefix_len(data.len()) + data.len()
        }).sum()
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        for command in &self.commands {
            match command {
                Command::Opcode(op) => out.push(op.into_u8()),
                Command::Data(data) => {
                    write_push_prefix(&mut out, data.len());
                    out.extend_from_slice(data);
                }
            }
        }
        out
    }

    /**
        Parses raw script bytes.
        Every declared push length is checked against the remaining input
        before anything is copied.
    */
    pub fn parse(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let byte = bytes[cursor];
            cursor += 1;

            let len = match byte {
                0x01..=0x4b => byte as usize,
                0x4c => read_push_len(bytes, &mut cursor, 1)?,
                0x4d => read_push_len(bytes, &mut cursor, 2)?,
                0x4e => read_push_len(bytes, &mut cursor, 4)?,
                _ => {
                    commands.push(Command::Opcode(Opcode::from(byte)));
                    continue;
                }
            };

            let end = cursor.checked_add(len).ok_or(ScriptError::Overflow)?;
            if end > bytes.len() {
                return Err(ScriptError::Truncated {
                    position: cursor,
                    needed: len,
                    available: bytes.len() - cursor
                });
            }
            let data = &bytes[cursor..end];
            cursor = end;

            commands.push(if data.is_empty() {
                Command::Opcode(OP_0)
            } else {
                Command::Data(data.to_vec())
            });
        }

        Ok(Self { commands })
    }

    /// Hash160 of the serialized script, as committed to by P2SH.
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.serialize())
    }

    /// OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        self.p2pkh_hash().is_some()
    }

    /// <key> OP_CHECKSIG
    pub fn is_p2pk(&self) -> bool {
        matches!(self.commands.as_slice(), [_, Command::Opcode(OP_CHECKSIG)])
    }

    /// OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        self.p2sh_hash().is_some()
    }

    /// OP_m <key>... OP_n OP_CHECKMULTISIG with 1 <= m <= n <= 16
    pub fn is_multisig(&self) -> bool {
        let [Command::Opcode(m), keys @ .., Command::Opcode(n), Command::Opcode(OP_CHECKMULTISIG)] = self.commands.as_slice() else {
            return false;
        };
        let (Some(m), Some(n)) = (m.to_small_int(), n.to_small_int()) else {
            return false;
        };
        m >= 1
            && m <= n
            && keys.len() == n as usize
            && keys.iter().all(|k| matches!(k, Command::Data(_)))
    }

    pub fn p2pkh_hash(&self) -> Option<[u8; 20]> {
        match self.commands.as_slice() {
            [Command::Opcode(OP_DUP), Command::Opcode(OP_HASH160), Command::Data(hash), Command::Opcode(OP_EQUALVERIFY), Command::Opcode(OP_CHECKSIG)] => {
                hash.as_slice().try_into().ok()
            },
            _ => None
        }
    }

    pub fn p2sh_hash(&self) -> Option<[u8; 20]> {
        match self.commands.as_slice() {
            [Command::Opcode(OP_HASH160), Command::Data(hash), Command::Opcode(OP_EQUAL)] => {
                hash.as_slice().try_into().ok()
            },
            _ => None
        }
    }
}
