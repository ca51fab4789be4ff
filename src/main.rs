use log::{debug, info};
use ls8::error::Ls8Error;
use ls8::interpreter::Interpreter;
use ls8::loader;
use ls8::vm::VM;
use std::env;
use std::path::Path;
use std::process;

/// Guard against programs that never reach HLT
const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <program.ls8>", args[0]);
        process::exit(1);
    }

    let program_path = &args[1];
    debug!("loading LS-8 program: {}", program_path);

    let program = match loader::load_program(Path::new(program_path)) {
        Ok(program) => program,
        Err(e @ Ls8Error::FileNotFound { .. }) => {
            eprintln!("{}: {}", args[0], e);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("{}: {}", args[0], e);
            process::exit(1);
        }
    };

    let mut vm = VM::new();
    if let Err(e) = vm.load_program(&program) {
        eprintln!("{}: {}", args[0], e);
        process::exit(1);
    }

    let mut interpreter = Interpreter::new(vm);
    match interpreter.run_with_limit(Some(DEFAULT_STEP_LIMIT)) {
        Ok(()) => {
            info!(
                "program finished after {} instructions",
                interpreter.instruction_count()
            );
        }
        Err(e) => {
            eprintln!("error during execution: {e}");
            process::exit(1);
        }
    }
}
