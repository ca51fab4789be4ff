use crate::error::Ls8Error;
use crate::instruction::{Instruction, Opcode};
use crate::vm::{MEMORY_SIZE, VM};
use log::{debug, info};

/// Result of executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Continue execution; PC advances by the instruction width
    Continue,
    /// Control transfer; PC was set directly by the instruction
    Jumped,
    /// HLT executed; the run loop stops
    Halted,
}

/// The LS-8 execution engine: fetch, decode, dispatch.
pub struct Interpreter {
    /// The machine state
    pub vm: VM,
    /// Instructions executed so far
    instruction_count: u64,
}

impl Interpreter {
    /// Create a new interpreter around a loaded VM
    pub fn new(vm: VM) -> Self {
        Interpreter {
            vm,
            instruction_count: 0,
        }
    }

    /// Instructions executed so far
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Run until HLT or an execution error
    pub fn run(&mut self) -> Result<(), Ls8Error> {
        self.run_with_limit(None)
    }

    /// Run until HLT, an execution error, or an optional instruction
    /// limit. Hitting the limit stops the run without an error; it is a
    /// guard against runaway programs, not part of the machine contract.
    pub fn run_with_limit(&mut self, max_instructions: Option<u64>) -> Result<(), Ls8Error> {
        info!("starting execution, {} bytes loaded", self.vm.program_len);

        loop {
            let pc = self.vm.pc;

            // Falling off the end of the loaded program without HLT is an
            // error, covering the empty-program case on the first fetch.
            if pc >= self.vm.program_len {
                return Err(Ls8Error::UnexpectedEnd { pc });
            }

            self.trace();

            let instruction = Instruction::decode(&self.vm.memory, pc)?;

            match self.execute_instruction(&instruction)? {
                ExecutionResult::Continue => {
                    self.vm.pc = pc + instruction.size();
                }
                ExecutionResult::Jumped => {
                    // PC already set by CALL/RET
                }
                ExecutionResult::Halted => {
                    self.vm.pc = pc + instruction.size();
                    self.instruction_count += 1;
                    info!("halted after {} instructions", self.instruction_count);
                    return Ok(());
                }
            }

            self.instruction_count += 1;

            if let Some(limit) = max_instructions {
                if self.instruction_count >= limit {
                    info!("reached instruction limit of {}", limit);
                    return Ok(());
                }
            }
        }
    }

    /// Execute a single decoded instruction
    pub fn execute_instruction(&mut self, inst: &Instruction) -> Result<ExecutionResult, Ls8Error> {
        let (a, b) = (inst.operand_a, inst.operand_b);

        match inst.opcode {
            Opcode::Ldi => {
                self.vm.write_register(a, b)?;
                Ok(ExecutionResult::Continue)
            }
            Opcode::Prn => {
                // The machine's only program-visible output
                println!("{}", self.vm.read_register(a)?);
                Ok(ExecutionResult::Continue)
            }
            Opcode::Hlt => Ok(ExecutionResult::Halted),
            Opcode::Mul | Opcode::Add => {
                self.alu(inst.opcode, a, b)?;
                Ok(ExecutionResult::Continue)
            }
            Opcode::Push => {
                let value = self.vm.read_register(a)?;
                self.vm.push(value)?;
                Ok(ExecutionResult::Continue)
            }
            Opcode::Pop => {
                let value = self.vm.pop()?;
                self.vm.write_register(a, value)?;
                Ok(ExecutionResult::Continue)
            }
            Opcode::Call => {
                // Return address is the byte past this instruction
                let return_addr = ((inst.addr + 2) % MEMORY_SIZE) as u8;
                self.vm.push(return_addr)?;
                self.vm.pc = self.vm.read_register(a)? as usize;
                debug!(
                    "CALL R{} -> 0x{:02X}, return 0x{:02X}",
                    a, self.vm.pc, return_addr
                );
                Ok(ExecutionResult::Jumped)
            }
            Opcode::Ret => {
                self.vm.pc = self.vm.pop()? as usize;
                debug!("RET -> 0x{:02X}", self.vm.pc);
                Ok(ExecutionResult::Jumped)
            }
        }
    }

    /// ALU sub-operation: apply a binary operator to two registers and
    /// store the result, wrapped modulo 256, back into the first.
    pub(crate) fn alu(&mut self, op: Opcode, reg_a: u8, reg_b: u8) -> Result<(), Ls8Error> {
        let a = self.vm.read_register(reg_a)?;
        let b = self.vm.read_register(reg_b)?;

        let result = match op {
            Opcode::Add => a.wrapping_add(b),
            Opcode::Mul => a.wrapping_mul(b),
            _ => {
                return Err(Ls8Error::UnsupportedOperation {
                    mnemonic: op.mnemonic(),
                })
            }
        };

        debug!("{} R{}, R{} = {}", op.mnemonic(), reg_a, reg_b, result);
        self.vm.write_register(reg_a, result)
    }

    /// Log the machine state before a fetch: PC, the three bytes at PC,
    /// and the register file.
    fn trace(&self) {
        let pc = self.vm.pc;
        debug!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} | {}",
            pc,
            self.vm.memory[pc],
            self.vm.memory[(pc + 1) % MEMORY_SIZE],
            self.vm.memory[(pc + 2) % MEMORY_SIZE],
            self.vm
                .registers
                .iter()
                .map(|r| format!("{r:02X}"))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
}
