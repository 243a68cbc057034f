//! Opcode definitions: one byte tag plus a fixed, per-opcode number of
//! big-endian operand widths.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Constant = 0,
    Add,
    Sub,
    Mul,
    Div,
    Pop,
    True,
    False,
    Equal,
    NotEqual,
    GreaterThan,
    Minus,
    Bang,
    JumpNotTruthy,
    Jump,
    Null,
    SetGlobal,
    GetGlobal,
    Array,
    Hash,
    Index,
    Call,
    ReturnValue,
    Return,
    SetLocal,
    GetLocal,
    GetBuiltin,
    Closure,
    GetFree,
    CurrentClosure,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown opcode byte {0}")]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match byte {
            0 => Constant,
            1 => Add,
            2 => Sub,
            3 => Mul,
            4 => Div,
            5 => Pop,
            6 => True,
            7 => False,
            8 => Equal,
            9 => NotEqual,
            10 => GreaterThan,
            11 => Minus,
            12 => Bang,
            13 => JumpNotTruthy,
            14 => Jump,
            15 => Null,
            16 => SetGlobal,
            17 => GetGlobal,
            18 => Array,
            19 => Hash,
            20 => Index,
            21 => Call,
            22 => ReturnValue,
            23 => Return,
            24 => SetLocal,
            25 => GetLocal,
            26 => GetBuiltin,
            27 => Closure,
            28 => GetFree,
            29 => CurrentClosure,
            other => return Err(UnknownOpcode(other)),
        })
    }
}

/// An opcode's mnemonic and the byte width of each of its operands, in
/// order. An empty slice means the opcode takes no operands.
pub struct Definition {
    pub name: &'static str,
    pub operand_widths: &'static [usize],
}

impl Opcode {
    pub fn definition(self) -> Definition {
        use Opcode::*;
        let (name, operand_widths): (&'static str, &'static [usize]) = match self {
            Constant => ("OpConstant", &[2]),
            Add => ("OpAdd", &[]),
            Sub => ("OpSub", &[]),
            Mul => ("OpMul", &[]),
            Div => ("OpDiv", &[]),
            Pop => ("OpPop", &[]),
            True => ("OpTrue", &[]),
            False => ("OpFalse", &[]),
            Equal => ("OpEqual", &[]),
            NotEqual => ("OpNotEqual", &[]),
            GreaterThan => ("OpGreaterThan", &[]),
            Minus => ("OpMinus", &[]),
            Bang => ("OpBang", &[]),
            JumpNotTruthy => ("OpJumpNotTruthy", &[2]),
            Jump => ("OpJump", &[2]),
            Null => ("OpNull", &[]),
            SetGlobal => ("OpSetGlobal", &[2]),
            GetGlobal => ("OpGetGlobal", &[2]),
            Array => ("OpArray", &[2]),
            Hash => ("OpHash", &[2]),
            Index => ("OpIndex", &[]),
            Call => ("OpCall", &[1]),
            ReturnValue => ("OpReturnValue", &[]),
            Return => ("OpReturn", &[]),
            SetLocal => ("OpSetLocal", &[1]),
            GetLocal => ("OpGetLocal", &[1]),
            GetBuiltin => ("OpGetBuiltin", &[1]),
            Closure => ("OpClosure", &[2, 1]),
            GetFree => ("OpGetFree", &[1]),
            CurrentClosure => ("OpCurrentClosure", &[]),
        };
        Definition {
            name,
            operand_widths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_opcode_through_its_byte_value() {
        for byte in 0..=29u8 {
            let op = Opcode::try_from(byte).unwrap();
            assert_eq!(op as u8, byte);
        }
    }

    #[test]
    fn unknown_byte_is_rejected() {
        assert_eq!(Opcode::try_from(255), Err(UnknownOpcode(255)));
    }

    #[test]
    fn closure_takes_a_wide_and_a_narrow_operand() {
        assert_eq!(Opcode::Closure.definition().operand_widths, &[2, 1]);
    }
}
