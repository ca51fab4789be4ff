use thiserror::Error;

/// Errors surfaced by the program loader and the execution engine.
///
/// Loader errors (`FileNotFound`, `InvalidLiteral`, `Io`) abort before
/// execution begins; the rest abort a run in progress. None of them are
/// retried, the machine is single-pass.
#[derive(Debug, Error)]
pub enum Ls8Error {
    #[error("program file not found: {path}")]
    FileNotFound { path: String },

    #[error("line {line}: invalid binary literal \"{text}\"")]
    InvalidLiteral { line: usize, text: String },

    #[error("illegal instruction 0x{opcode:02X} at PC 0x{pc:02X}")]
    IllegalInstruction { opcode: u8, pc: usize },

    #[error("unsupported ALU operation: {mnemonic}")]
    UnsupportedOperation { mnemonic: &'static str },

    #[error("address {address} out of bounds")]
    OutOfBounds { address: usize },

    #[error("register R{register} out of bounds")]
    RegisterOutOfBounds { register: u8 },

    #[error("PC 0x{pc:02X} ran past the end of the loaded program without HLT")]
    UnexpectedEnd { pc: usize },

    #[error("stack overflow at PC 0x{pc:02X}")]
    StackOverflow { pc: usize },

    #[error("stack underflow at PC 0x{pc:02X}")]
    StackUnderflow { pc: usize },

    #[error("cannot read program file: {0}")]
    Io(#[from] std::io::Error),
}
