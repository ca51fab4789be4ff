use crate::error::Ls8Error;
use crate::vm::MEMORY_SIZE;
use std::fmt::{Display, Formatter};

// Opcode byte values, written in binary to match program listings
pub const LDI: u8 = 0b1000_0010;
pub const PRN: u8 = 0b0100_0111;
pub const HLT: u8 = 0b0000_0001;
pub const MUL: u8 = 0b1010_0010;
pub const ADD: u8 = 0b1010_0000;
pub const PUSH: u8 = 0b0100_0101;
pub const POP: u8 = 0b0100_0110;
pub const CALL: u8 = 0b0101_0000;
pub const RET: u8 = 0b0001_0001;

/// The LS-8 instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Load an immediate into a register
    Ldi,
    /// Print a register value in decimal
    Prn,
    /// Halt the machine
    Hlt,
    /// Multiply two registers, result into the first
    Mul,
    /// Add two registers, result into the first
    Add,
    /// Push a register onto the stack
    Push,
    /// Pop the top of the stack into a register
    Pop,
    /// Push the return address and jump to a register value
    Call,
    /// Pop the return address into the PC
    Ret,
}

impl Opcode {
    /// Map an opcode byte to its instruction, if it has one
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            LDI => Some(Opcode::Ldi),
            PRN => Some(Opcode::Prn),
            HLT => Some(Opcode::Hlt),
            MUL => Some(Opcode::Mul),
            ADD => Some(Opcode::Add),
            PUSH => Some(Opcode::Push),
            POP => Some(Opcode::Pop),
            CALL => Some(Opcode::Call),
            RET => Some(Opcode::Ret),
            _ => None,
        }
    }

    /// Number of operand bytes following the opcode byte
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Ldi | Opcode::Mul | Opcode::Add => 2,
            Opcode::Prn | Opcode::Push | Opcode::Pop | Opcode::Call => 1,
            Opcode::Hlt | Opcode::Ret => 0,
        }
    }

    /// Total instruction width in bytes
    pub fn size(&self) -> usize {
        1 + self.operand_count()
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Hlt => "HLT",
            Opcode::Mul => "MUL",
            Opcode::Add => "ADD",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
        }
    }
}

/// A decoded LS-8 instruction
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    /// The decoded opcode
    pub opcode: Opcode,
    /// First operand byte (register index for every current opcode)
    pub operand_a: u8,
    /// Second operand byte (immediate or second register index)
    pub operand_b: u8,
    /// Address this instruction was fetched from
    pub addr: usize,
}

impl Instruction {
    /// Decode the instruction at `pc`.
    ///
    /// The two bytes after the opcode are always fetched, wrapping within
    /// the 256-byte address space; opcodes that take fewer operands simply
    /// never look at them.
    pub fn decode(memory: &[u8; MEMORY_SIZE], pc: usize) -> Result<Self, Ls8Error> {
        if pc >= MEMORY_SIZE {
            return Err(Ls8Error::OutOfBounds { address: pc });
        }
        let ir = memory[pc];
        let opcode = Opcode::from_byte(ir).ok_or(Ls8Error::IllegalInstruction { opcode: ir, pc })?;

        Ok(Instruction {
            opcode,
            operand_a: memory[(pc + 1) % MEMORY_SIZE],
            operand_b: memory[(pc + 2) % MEMORY_SIZE],
            addr: pc,
        })
    }

    /// Width of this instruction in bytes
    pub fn size(&self) -> usize {
        self.opcode.size()
    }
}

impl Display for Instruction {
    /// Disassembly-style rendering, e.g. `LDI R0, 8`
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.opcode.operand_count() {
            2 if self.opcode == Opcode::Ldi => {
                write!(f, "LDI R{}, {}", self.operand_a, self.operand_b)
            }
            2 => write!(
                f,
                "{} R{}, R{}",
                self.opcode.mnemonic(),
                self.operand_a,
                self.operand_b
            ),
            1 => write!(f, "{} R{}", self.opcode.mnemonic(), self.operand_a),
            _ => write!(f, "{}", self.opcode.mnemonic()),
        }
    }
}
