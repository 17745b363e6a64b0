/*

    Script builder module.

*/

use super::{
    opcodes::{self, Opcode},
    Command,
    Script,
    ScriptError
};

#[derive(Debug, Clone, Default)]
pub struct Builder {
    commands: Vec<Command>
}

/// Minimal script number encoding: little endian magnitude with the sign in the top bit.
fn script_num(n: i64) -> Vec<u8> {
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut bytes = Vec::new();
    while abs > 0 {
        bytes.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    match bytes.last_mut() {
        Some(last) if *last & 0x80 != 0 => bytes.push(if negative { 0x80 } else { 0x00 }),
        Some(last) if negative => *last |= 0x80,
        _ => {}
    }
    bytes
}

impl Builder {
    /// Return a new instance of self
    pub fn new() -> Self  {
        Self { commands: Vec::new() }
    }

    /// Push an opcode into self
    pub fn push_opcode(mut self, opcode: Opcode) -> Self {
        self.commands.push(Command::Opcode(opcode));
        self
    }

    //Push a slice as data, the push prefix is chosen on serialization
    pub fn push_slice(mut self, slice: &[u8]) -> Self {
        self.commands.push(Command::Data(slice.to_vec()));
        self
    }

    /// Push a number, using OP_1NEGATE and OP_0..OP_16 where possible
    pub fn push_int(self, n: i64) -> Self {
        match n {
            -1 => self.push_opcode(opcodes::OP_1NEGATE),
            0..=16 => match Opcode::small_int(n as u8) {
                Some(op) => self.push_opcode(op),
                None => self.push_slice(&script_num(n))
            },
            _ => self.push_slice(&script_num(n))
        }
    }

    /// Convert self into a script
    pub fn into_script(self) -> Result<Script, ScriptError> {
        Script::new(self.commands)
    }
}
