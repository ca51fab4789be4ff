use crate::error::Ls8Error;
use log::debug;

/// Size of the addressable memory, in bytes
pub const MEMORY_SIZE: usize = 256;

/// Number of general-purpose registers
pub const NUM_REGISTERS: usize = 8;

/// Register reserved by convention as the stack-pointer seed
pub const SP_REGISTER: usize = 7;

/// Initial stack pointer, top of memory; the stack grows downward
pub const STACK_TOP: usize = MEMORY_SIZE - 1;

/// The LS-8 machine state: memory, register file, PC and SP.
///
/// The engine owns its own SP; R7 only seeds it. The two diverge as soon
/// as a push happens without anything writing R7 back, which matches the
/// machine's documented behavior.
pub struct VM {
    /// The addressable memory
    pub memory: [u8; MEMORY_SIZE],
    /// General-purpose registers R0-R7
    pub registers: [u8; NUM_REGISTERS],
    /// Program counter - address of the next instruction
    pub pc: usize,
    /// Stack pointer - address of the current top of stack
    pub sp: usize,
    /// Number of bytes the loader placed in memory
    pub program_len: usize,
}

impl VM {
    /// Create a new VM with empty memory and the stack pointer at the top
    pub fn new() -> Self {
        let mut registers = [0u8; NUM_REGISTERS];
        registers[SP_REGISTER] = STACK_TOP as u8;

        VM {
            memory: [0u8; MEMORY_SIZE],
            registers,
            pc: 0,
            sp: STACK_TOP,
            program_len: 0,
        }
    }

    /// Copy a loaded program into memory starting at address 0
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Ls8Error> {
        if program.len() > MEMORY_SIZE {
            return Err(Ls8Error::OutOfBounds {
                address: program.len() - 1,
            });
        }
        self.memory[..program.len()].copy_from_slice(program);
        self.program_len = program.len();
        debug!("loaded {} bytes into memory", program.len());
        Ok(())
    }

    /// Read the byte at a memory address
    pub fn read_byte(&self, address: usize) -> Result<u8, Ls8Error> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Ls8Error::OutOfBounds { address })
    }

    /// Write a byte to a memory address
    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), Ls8Error> {
        match self.memory.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Ls8Error::OutOfBounds { address }),
        }
    }

    /// Read a register by operand index
    pub fn read_register(&self, register: u8) -> Result<u8, Ls8Error> {
        self.registers
            .get(register as usize)
            .copied()
            .ok_or(Ls8Error::RegisterOutOfBounds { register })
    }

    /// Write a register by operand index. Register cells are byte-wide,
    /// so every write lands already masked to 8 bits.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Ls8Error> {
        match self.registers.get_mut(register as usize) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Ls8Error::RegisterOutOfBounds { register }),
        }
    }

    /// Push a value onto the stack (SP pre-decrements)
    pub fn push(&mut self, value: u8) -> Result<(), Ls8Error> {
        if self.sp == 0 {
            return Err(Ls8Error::StackOverflow { pc: self.pc });
        }
        self.sp -= 1;
        self.memory[self.sp] = value;
        Ok(())
    }

    /// Pop the value at the top of the stack (SP post-increments)
    pub fn pop(&mut self) -> Result<u8, Ls8Error> {
        if self.sp >= STACK_TOP {
            debug!(
                "stack underflow: pop with SP at 0x{:02X}, PC 0x{:02X}",
                self.sp, self.pc
            );
            return Err(Ls8Error::StackUnderflow { pc: self.pc });
        }
        let value = self.memory[self.sp];
        self.sp += 1;
        Ok(value)
    }
}

impl Default for VM {
    fn default() -> Self {
        VM::new()
    }
}
