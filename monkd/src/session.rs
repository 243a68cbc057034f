//! Driver session: one pipeline invocation's worth of shared state.
//!
//! `Session` owns whatever state has to survive across the lines of a
//! REPL - an `Environment` for the tree-walking engine, or a symbol
//! table/constant pool/globals triple for the bytecode engine - so `monkd
//! run` and `monkd repl` are both just "parse a chunk of source, hand it
//! to the session, print what comes back".

use std::io::Write;

use clap::ValueEnum;

use monk_compiler::{Compiler, SymbolTable};
use monk_object::{Environment, Object};
use monk_parser::Parser;
use monk_vm::VM;

use crate::error::{MonkdError, Result};

/// Which half of the pipeline executes a parsed, macro-expanded program.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    /// The tree-walking evaluator (`monk-eval`).
    Eval,
    /// Compile to bytecode and run it on the stack machine (`monk-compiler`
    /// + `monk-vm`).
    Vm,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Eval => write!(f, "eval"),
            Engine::Vm => write!(f, "vm"),
        }
    }
}

pub struct Session {
    engine: Engine,
    env: Environment,
    macro_env: Environment,
    vm_symbol_table: SymbolTable,
    vm_constants: Vec<Object>,
    vm_globals: Vec<Object>,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            env: Environment::new(),
            macro_env: Environment::new(),
            vm_symbol_table: SymbolTable::new(),
            vm_constants: Vec::new(),
            vm_globals: Vec::new(),
        }
    }

    /// Parses, macro-expands, and runs one chunk of source through the
    /// session's engine, returning the value of its final statement. State
    /// mutated along the way (globals, `let`-bound macros, ...) persists
    /// on `self` for the next call.
    pub fn eval(&mut self, source: &str, out: &mut dyn Write) -> Result<Object> {
        let mut parser = Parser::new(source);
        let mut program = parser.parse_program();
        let errors = parser.errors();
        if !errors.is_empty() {
            return Err(MonkdError::Parse(errors.join("\n")));
        }

        monk_macro::define_macros(&mut program, &self.macro_env);
        let program = monk_macro::expand_macros(program, &self.macro_env)?;

        match self.engine {
            Engine::Eval => Ok(monk_eval::eval_program(&program, &self.env, out)?),
            Engine::Vm => self.run_on_vm(&program),
        }
    }

    fn run_on_vm(&mut self, program: &monk_parser::Program) -> Result<Object> {
        let symbol_table = std::mem::replace(&mut self.vm_symbol_table, SymbolTable::new());
        let constants = std::mem::take(&mut self.vm_constants);
        let mut compiler = Compiler::new_with_state(symbol_table, constants);
        compiler.compile_program(program)?;
        let (bytecode, symbol_table, constants) = compiler.into_bytecode_and_state();
        self.vm_symbol_table = symbol_table;
        self.vm_constants = constants;

        let globals = std::mem::take(&mut self.vm_globals);
        let mut vm =
            VM::new_with_global_store(bytecode, globals).with_output(Box::new(StdoutSink));
        vm.run()?;
        let result = vm.last_popped_stack_elem();
        self.vm_globals = vm.take_globals();
        Ok(result)
    }
}

/// `Box<dyn Write>` has to be `'static`, so `VM::with_output` can't borrow
/// the caller's `out` directly the way `eval_program` does. `puts` output
/// from the VM engine always goes straight to the process's real stdout
/// instead.
struct StdoutSink;

impl Write for StdoutSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stdout().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
