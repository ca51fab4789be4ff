use crate::error::Ls8Error;
use crate::instruction::{self, Opcode};
use crate::interpreter::Interpreter;
use crate::vm::{STACK_TOP, VM};
use test_log::test;

fn machine(program: &[u8]) -> Interpreter {
    let mut vm = VM::new();
    vm.load_program(program).unwrap();
    Interpreter::new(vm)
}

#[test]
fn test_ldi_stores_immediate_and_advances_pc() {
    let mut interp = machine(&[instruction::LDI, 0, 8, instruction::HLT]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[0], 8);
    // LDI advanced PC by 3, HLT by 1
    assert_eq!(interp.vm.pc, 4);
    assert_eq!(interp.instruction_count(), 2);
}

#[test]
fn test_add_masks_to_eight_bits() {
    // 200 + 100 = 300 -> 44 mod 256
    let mut interp = machine(&[
        instruction::LDI,
        0,
        200,
        instruction::LDI,
        1,
        100,
        instruction::ADD,
        0,
        1,
        instruction::HLT,
    ]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[0], 44);
    assert_eq!(interp.vm.registers[1], 100);
}

#[test]
fn test_mul_masks_to_eight_bits() {
    // 16 * 16 = 256 -> 0 mod 256
    let mut interp = machine(&[
        instruction::LDI,
        0,
        16,
        instruction::LDI,
        1,
        16,
        instruction::MUL,
        0,
        1,
        instruction::HLT,
    ]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[0], 0);
}

#[test]
fn test_mul_basic() {
    let mut interp = machine(&[
        instruction::LDI,
        0,
        8,
        instruction::LDI,
        1,
        9,
        instruction::MUL,
        0,
        1,
        instruction::HLT,
    ]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[0], 72);
}

#[test]
fn test_push_pop_round_trip() {
    // PUSH R0 then POP into R1; R0 unchanged, SP back where it started
    let mut interp = machine(&[
        instruction::LDI,
        0,
        42,
        instruction::PUSH,
        0,
        instruction::LDI,
        0,
        0,
        instruction::POP,
        1,
        instruction::HLT,
    ]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[1], 42);
    assert_eq!(interp.vm.sp, STACK_TOP);
}

#[test]
fn test_call_pushes_return_address_and_ret_restores() {
    // 0: LDI R1, 6
    // 3: CALL R1      pushes 5, jumps to 6
    // 5: HLT
    // 6: LDI R0, 99
    // 9: RET          pops 5
    let mut interp = machine(&[
        instruction::LDI,
        1,
        6,
        instruction::CALL,
        1,
        instruction::HLT,
        instruction::LDI,
        0,
        99,
        instruction::RET,
    ]);

    // Step to just after CALL to observe the pushed return address
    let inst = crate::instruction::Instruction::decode(&interp.vm.memory, 0).unwrap();
    interp.execute_instruction(&inst).unwrap();
    interp.vm.pc = 3;
    let call = crate::instruction::Instruction::decode(&interp.vm.memory, 3).unwrap();
    interp.execute_instruction(&call).unwrap();

    assert_eq!(interp.vm.pc, 6);
    assert_eq!(interp.vm.sp, STACK_TOP - 1);
    assert_eq!(interp.vm.memory[interp.vm.sp], 5);

    // Run the rest: subroutine body, RET back to the HLT
    interp.run().unwrap();
    assert_eq!(interp.vm.registers[0], 99);
    assert_eq!(interp.vm.sp, STACK_TOP);
    assert_eq!(interp.vm.pc, 6); // HLT at 5, plus 1
}

#[test]
fn test_print8_program_halts() {
    // The canonical print8 program from the source format docs
    let mut interp = machine(&[
        0b1000_0010, // LDI R0, 8
        0b0000_0000,
        0b0000_1000,
        0b0100_0111, // PRN R0
        0b0000_0000,
        0b0000_0001, // HLT
    ]);
    interp.run().unwrap();

    assert_eq!(interp.vm.registers[0], 8);
    assert_eq!(interp.instruction_count(), 3);
}

#[test]
fn test_illegal_instruction_is_an_error() {
    let mut interp = machine(&[0b1111_1111]);
    match interp.run() {
        Err(Ls8Error::IllegalInstruction { opcode, pc }) => {
            assert_eq!(opcode, 0xFF);
            assert_eq!(pc, 0);
        }
        other => panic!("expected IllegalInstruction, got {other:?}"),
    }
}

#[test]
fn test_empty_program_is_unexpected_end() {
    let mut interp = machine(&[]);
    assert!(matches!(
        interp.run(),
        Err(Ls8Error::UnexpectedEnd { pc: 0 })
    ));
}

#[test]
fn test_running_off_the_end_is_unexpected_end() {
    // LDI with no HLT after it
    let mut interp = machine(&[instruction::LDI, 0, 8]);
    assert!(matches!(
        interp.run(),
        Err(Ls8Error::UnexpectedEnd { pc: 3 })
    ));
}

#[test]
fn test_pop_without_push_underflows() {
    let mut interp = machine(&[instruction::POP, 0, instruction::HLT]);
    assert!(matches!(
        interp.run(),
        Err(Ls8Error::StackUnderflow { .. })
    ));
}

#[test]
fn test_ret_without_call_underflows() {
    let mut interp = machine(&[instruction::RET]);
    assert!(matches!(
        interp.run(),
        Err(Ls8Error::StackUnderflow { .. })
    ));
}

#[test]
fn test_alu_rejects_non_arithmetic_opcode() {
    let mut interp = machine(&[instruction::HLT]);
    assert!(matches!(
        interp.alu(Opcode::Ldi, 0, 1),
        Err(Ls8Error::UnsupportedOperation { mnemonic: "LDI" })
    ));
}

#[test]
fn test_operand_register_out_of_range() {
    let mut interp = machine(&[instruction::PRN, 12, instruction::HLT]);
    assert!(matches!(
        interp.run(),
        Err(Ls8Error::RegisterOutOfBounds { register: 12 })
    ));
}

#[test]
fn test_step_limit_stops_infinite_loop() {
    // CALL R0 with R0 = 0 loops forever; the limit must stop it cleanly
    let mut interp = machine(&[instruction::CALL, 0]);
    // Pushing a return address each iteration would overflow first, so
    // keep the limit small
    interp.run_with_limit(Some(10)).unwrap();
    assert_eq!(interp.instruction_count(), 10);
}
