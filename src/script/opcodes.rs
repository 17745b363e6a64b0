/*
    Script opcodes.

    The table is static data. Bytes 0x01..=0x4b are direct push lengths and
    never appear as bare opcodes in a parsed `Script`, so
    they have no named constant here.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode {
    code: u8
}

impl Opcode {
    pub const fn from_u8(code: u8) -> Self {
        Self { code }
    }

    pub const fn into_u8(self) -> u8 {
        self.code
    }

    /// Mnemonic of a named opcode, e.g. "OP_CHECKSIG"
    pub fn name(self) -> Option<&'static str> {
        name_of(self.code)
    }

    /// OP_0 and OP_1 through OP_16
    pub fn small_int(n: u8) -> Option<Self> {
        match n {
            0 => Some(OP_0),
            1..=16 => Some(Self { code: OP_1.code + n - 1 }),
            _ => None
        }
    }

    /// Inverse of small_int
    pub fn to_small_int(self) -> Option<u8> {
        match self.code {
            0x00 => Some(0),
            0x51..=0x60 => Some(self.code - OP_1.code + 1),
            _ => None
        }
    }

    /// True for 0x01..=0x4e, the bytes that introduce a data push
    pub fn is_push(self) -> bool {
        (0x01..=OP_PUSHDATA4.code).contains(&self.code)
    }
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Self {
        Self { code }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode.code
    }
}

macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $code:literal;)*) => {
        $(
            $(#[$doc])*
            pub const $name: Opcode = Opcode { code: $code };
        )*

        fn name_of(code: u8) -> Option<&'static str> {
            match code {
                $($code => Some(stringify!($name)),)*
                _ => None
            }
        }
    };
}

opcodes! {
    /// Push an empty array
    OP_0 = 0x00;
    /// Next byte is the push length
    OP_PUSHDATA1 = 0x4c;
    /// Next 2 bytes (little endian) are the push length
    OP_PUSHDATA2 = 0x4d;
    /// Next 4 bytes (little endian) are the push length
    OP_PUSHDATA4 = 0x4e;
    OP_1NEGATE = 0x4f;
    OP_RESERVED = 0x50;
    OP_1 = 0x51;
    OP_2 = 0x52;
    OP_3 = 0x53;
    OP_4 = 0x54;
    OP_5 = 0x55;
    OP_6 = 0x56;
    OP_7 = 0x57;
    OP_8 = 0x58;
    OP_9 = 0x59;
    OP_10 = 0x5a;
    OP_11 = 0x5b;
    OP_12 = 0x5c;
    OP_13 = 0x5d;
    OP_14 = 0x5e;
    OP_15 = 0x5f;
    OP_16 = 0x60;

    //Flow control
    OP_NOP = 0x61;
    OP_VER = 0x62;
    OP_IF = 0x63;
    OP_NOTIF = 0x64;
    OP_VERIF = 0x65;
    OP_VERNOTIF = 0x66;
    OP_ELSE = 0x67;
    OP_ENDIF = 0x68;
    OP_VERIFY = 0x69;
    /// Marks an output as provably unspendable
    OP_RETURN = 0x6a;

    //Stack
    OP_TOALTSTACK = 0x6b;
    OP_FROMALTSTACK = 0x6c;
    OP_2DROP = 0x6d;
    OP_2DUP = 0x6e;
    OP_3DUP = 0x6f;
    OP_2OVER = 0x70;
    OP_2ROT = 0x71;
    OP_2SWAP = 0x72;
    OP_IFDUP = 0x73;
    OP_DEPTH = 0x74;
    OP_DROP = 0x75;
    /// Duplicates the top stack item
    OP_DUP = 0x76;
    OP_NIP = 0x77;
    OP_OVER = 0x78;
    OP_PICK = 0x79;
    OP_ROLL = 0x7a;
    OP_ROT = 0x7b;
    OP_SWAP = 0x7c;
    OP_TUCK = 0x7d;

    //Splice
    OP_CAT = 0x7e;
    OP_SUBSTR = 0x7f;
    OP_LEFT = 0x80;
    OP_RIGHT = 0x81;
    OP_SIZE = 0x82;

    //Bitwise logic
    OP_INVERT = 0x83;
    OP_AND = 0x84;
    OP_OR = 0x85;
    OP_XOR = 0x86;
    /// Pushes 1 if the top two items are equal, 0 otherwise
    OP_EQUAL = 0x87;
    /// OP_EQUAL followed by OP_VERIFY
    OP_EQUALVERIFY = 0x88;
    OP_RESERVED1 = 0x89;
    OP_RESERVED2 = 0x8a;

    //Arithmetic
    OP_1ADD = 0x8b;
    OP_1SUB = 0x8c;
    OP_2MUL = 0x8d;
    OP_2DIV = 0x8e;
    OP_NEGATE = 0x8f;
    OP_ABS = 0x90;
    OP_NOT = 0x91;
    OP_0NOTEQUAL = 0x92;
    OP_ADD = 0x93;
    OP_SUB = 0x94;
    OP_MUL = 0x95;
    OP_DIV = 0x96;
    OP_MOD = 0x97;
    OP_LSHIFT = 0x98;
    OP_RSHIFT = 0x99;
    OP_BOOLAND = 0x9a;
    OP_BOOLOR = 0x9b;
    OP_NUMEQUAL = 0x9c;
    OP_NUMEQUALVERIFY = 0x9d;
    OP_NUMNOTEQUAL = 0x9e;
    OP_LESSTHAN = 0x9f;
    OP_GREATERTHAN = 0xa0;
    OP_LESSTHANOREQUAL = 0xa1;
    OP_GREATERTHANOREQUAL = 0xa2;
    OP_MIN = 0xa3;
    OP_MAX = 0xa4;
    OP_WITHIN = 0xa5;

    //Crypto
    OP_RIPEMD160 = 0xa6;
    OP_SHA1 = 0xa7;
    OP_SHA256 = 0xa8;
    /// RIPEMD160(SHA256(top))
    OP_HASH160 = 0xa9;
    OP_HASH256 = 0xaa;
    OP_CODESEPARATOR = 0xab;
    OP_CHECKSIG = 0xac;
    OP_CHECKSIGVERIFY = 0xad;
    /// Pops N, N keys, M, M signatures and a dummy element
    OP_CHECKMULTISIG = 0xae;
    OP_CHECKMULTISIGVERIFY = 0xaf;

    //Locktime
    OP_NOP1 = 0xb0;
    /// BIP-65
    OP_CHECKLOCKTIMEVERIFY = 0xb1;
    /// BIP-112
    OP_CHECKSEQUENCEVERIFY = 0xb2;
    OP_NOP4 = 0xb3;
    OP_NOP5 = 0xb4;
    OP_NOP6 = 0xb5;
    OP_NOP7 = 0xb6;
    OP_NOP8 = 0xb7;
    OP_NOP9 = 0xb8;
    OP_NOP10 = 0xb9;

    OP_INVALIDOPCODE = 0xff;
}
