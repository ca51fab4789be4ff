#![crate_name = "ls8"]

//! An LS-8 virtual machine: 256 bytes of RAM, eight byte-wide
//! general-purpose registers, and a stack growing down from the top of
//! memory. Programs are text files of base-2 literals, one byte per line.

pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod vm;

#[cfg(test)]
mod interpreter_tests;
