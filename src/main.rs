//! Rangsi CLI: run a script file, evaluate an inline snippet, or start a
//! minimal REPL (spec.md §6 "CLI/wire format/env vars": not part of the
//! core, but needed for the crate to be a usable tool — SPEC_FULL.md A.5).

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use colored::Colorize;
use mimalloc::MiMalloc;

use rangsi::error::RangsiError;
use rangsi::vm::{disassemble, Vm};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// CLI command to execute (SPEC_FULL.md A.5: deliberately just these three,
/// not the teacher's web-framework command set).
enum Command {
    Run { file: String, disassemble: bool },
    Eval { code: String },
    Repl,
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(message) => {
            eprintln!("{} {message}", "error:".red().bold());
            print_usage();
            process::exit(64);
        }
    };

    let exit_code = match command {
        Command::Run { file, disassemble } => run_file(&file, disassemble),
        Command::Eval { code } => run_source(&code),
        Command::Repl => run_repl(),
    };

    process::exit(exit_code);
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Repl),
        [flag] if flag == "--help" || flag == "-h" => {
            print_usage();
            process::exit(0);
        }
        [flag, file] if flag == "--disassemble" => Ok(Command::Run {
            file: file.clone(),
            disassemble: true,
        }),
        [flag, code] if flag == "-e" || flag == "--eval" => Ok(Command::Eval { code: code.clone() }),
        [file] => Ok(Command::Run {
            file: file.clone(),
            disassemble: false,
        }),
        _ => Err(format!("unrecognized arguments: {}", args.join(" "))),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  rangsi                     start the REPL");
    eprintln!("  rangsi <file>              run a script file");
    eprintln!("  rangsi --disassemble <file> print compiled bytecode instead of running it");
    eprintln!("  rangsi -e <code>           evaluate an inline snippet");
}

fn run_file(path: &str, disassemble: bool) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} could not read '{path}': {e}", "error:".red().bold());
            return 66;
        }
    };

    if disassemble {
        return disassemble_source(&source);
    }

    run_source(&source)
}

fn disassemble_source(source: &str) -> i32 {
    match rangsi::compile(source) {
        Ok(module) => {
            print!("{}", disassemble(&module.main));
            0
        }
        Err(err) => {
            report_error(&err);
            65
        }
    }
}

fn run_source(source: &str) -> i32 {
    let mut vm = Vm::new();
    for native in rangsi::vm::natives::standard_natives() {
        vm.register_native(native);
    }

    match rangsi::run_with_vm(source, &mut vm) {
        Ok(()) => {
            io::stdout().flush().ok();
            0
        }
        Err(err) => {
            let code = err_exit_code(&err);
            report_error(&err);
            code
        }
    }
}

fn err_exit_code(err: &RangsiError) -> i32 {
    match err {
        RangsiError::Lex(_) | RangsiError::Parse(_) | RangsiError::Compile(_) => 65,
        RangsiError::Runtime(_) => 70,
        RangsiError::Io(_) => 66,
    }
}

/// Print a colored diagnostic line (SPEC_FULL.md A.4): the `colored` crate,
/// not a logging framework, matches the teacher's own choice for its
/// language core.
fn report_error(err: &RangsiError) {
    eprintln!("{} {err}", "error:".red().bold());
}

/// A minimal line-at-a-time REPL (SPEC_FULL.md A.9): each line is compiled
/// and run against one persistent `Vm` so globals survive across lines.
fn run_repl() -> i32 {
    let mut vm = Vm::new();
    for native in rangsi::vm::natives::standard_natives() {
        vm.register_native(native);
    }

    println!("rangsi {} — {}", env!("CARGO_PKG_VERSION"), "Ctrl-D to exit".dimmed());

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".cyan());
        io::stdout().flush().ok();

        let mut line = String::new();
        let bytes_read = match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                break;
            }
        };
        if bytes_read == 0 || line.trim().is_empty() {
            continue;
        }

        if let Err(err) = rangsi::run_with_vm(&line, &mut vm) {
            report_error(&err);
        }
    }
    0
}
