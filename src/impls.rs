/**
    This module combines all the boilerplate
    implementations of fmt::Display and more.
*/

use crate::{
    address::Address,
    key::Wif,
    script::{Command, Opcode, Script},
    util::Network
};
use std::fmt;

/*
    util module impls
*/
impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet"
        };
        write!(f, "{}", name)
    }
}

/*
    address module impls
*/
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/*
    key module impls
*/
impl fmt::Display for Wif {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/*
    script module impls
*/
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "OP_UNKNOWN_{:#04x}", self.into_u8())
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Opcode(op) => write!(f, "{}", op),
            Command::Data(data) => write!(f, "{}", hex::encode(data))
        }
    }
}

//ASM form, e.g. "OP_DUP OP_HASH160 <hex> OP_EQUALVERIFY OP_CHECKSIG"
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, command) in self.commands().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}
