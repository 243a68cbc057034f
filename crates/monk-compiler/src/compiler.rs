//! AST-to-bytecode compiler.
//!
//! Each compiled function body gets its own `CompilationScope` (its own
//! instruction buffer and its own view of the last two emitted
//! instructions, used to elide a trailing `OpPop` in favor of
//! `OpReturnValue`); `enter_scope`/`leave_scope` push and pop that stack
//! in lockstep with `SymbolTable::push`/`pop`.

use std::rc::Rc;

use monk_code::{make, Instructions, Opcode};
use monk_object::{CompiledFunctionObj, Object};
use monk_parser::{BlockStatement, Expression, Program, Statement};
use monk_util::Symbol;

use crate::error::CompileError;
use crate::symbol_table::{Scope, SymbolEntry, SymbolTable};

#[derive(Clone, Debug, PartialEq)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Object>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

struct CompilationScope {
    instructions: Instructions,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

impl CompilationScope {
    fn new() -> Self {
        Self {
            instructions: Instructions::new(),
            last_instruction: None,
            previous_instruction: None,
        }
    }
}

pub struct Compiler {
    constants: Vec<Object>,
    symbol_table: SymbolTable,
    scopes: Vec<CompilationScope>,
}

impl Compiler {
    pub fn new() -> Self {
        let mut symbol_table = SymbolTable::new();
        for (index, builtin) in monk_eval::all_builtins().iter().enumerate() {
            symbol_table.define_builtin(index, Symbol::intern(builtin.name));
        }

        Self {
            constants: Vec::new(),
            symbol_table,
            scopes: vec![CompilationScope::new()],
        }
    }

    /// Resumes compilation against a symbol table and constant pool carried
    /// over from a previous call - what the REPL uses so a `let` on one
    /// line is visible (at the same global index) on the next.
    pub fn new_with_state(symbol_table: SymbolTable, constants: Vec<Object>) -> Self {
        Self {
            constants,
            symbol_table,
            scopes: vec![CompilationScope::new()],
        }
    }

    pub fn bytecode(mut self) -> Bytecode {
        let scope = self.scopes.pop().expect("monk-compiler: no active scope");
        Bytecode {
            instructions: scope.instructions,
            constants: self.constants,
        }
    }

    /// Same as [`Compiler::bytecode`], but also hands back the symbol table
    /// and constant pool so the caller can feed them into the next
    /// `new_with_state` call - what the REPL does to keep `let` bindings
    /// and constants alive across lines.
    pub fn into_bytecode_and_state(mut self) -> (Bytecode, SymbolTable, Vec<Object>) {
        let scope = self.scopes.pop().expect("monk-compiler: no active scope");
        let bytecode = Bytecode {
            instructions: scope.instructions,
            constants: self.constants.clone(),
        };
        (bytecode, self.symbol_table, self.constants)
    }

    pub fn compile_program(&mut self, program: &Program) -> Result<(), CompileError> {
        for stmt in &program.statements {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, stmt: &Statement) -> Result<(), CompileError> {
        match stmt {
            Statement::Expression(s) => {
                self.compile_expression(&s.expression)?;
                self.emit(Opcode::Pop, &[]);
            }
            Statement::Let(s) => {
                let symbol = self.symbol_table.define(s.name.value);
                self.compile_expression(&s.value)?;
                match symbol.scope {
                    Scope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
                    _ => self.emit(Opcode::SetLocal, &[symbol.index]),
                };
            }
            Statement::Return(s) => {
                self.compile_expression(&s.value)?;
                self.emit(Opcode::ReturnValue, &[]);
            }
            Statement::Block(block) => self.compile_block(block)?,
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &BlockStatement) -> Result<(), CompileError> {
        for stmt in &block.statements {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    fn compile_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        match expr {
            Expression::IntegerLiteral(lit) => {
                let idx = self.add_constant(Object::Integer(lit.value));
                self.emit(Opcode::Constant, &[idx]);
            }
            Expression::StringLiteral(lit) => {
                let idx = self.add_constant(Object::string(lit.value.clone()));
                self.emit(Opcode::Constant, &[idx]);
            }
            Expression::Boolean(lit) => {
                self.emit(if lit.value { Opcode::True } else { Opcode::False }, &[]);
            }
            Expression::Prefix(expr) => {
                self.compile_expression(&expr.right)?;
                match expr.operator.as_str() {
                    "!" => self.emit(Opcode::Bang, &[]),
                    "-" => self.emit(Opcode::Minus, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
            }
            Expression::Infix(expr) => {
                if expr.operator == "<" {
                    self.compile_expression(&expr.right)?;
                    self.compile_expression(&expr.left)?;
                    self.emit(Opcode::GreaterThan, &[]);
                    return Ok(());
                }
                self.compile_expression(&expr.left)?;
                self.compile_expression(&expr.right)?;
                match expr.operator.as_str() {
                    "+" => self.emit(Opcode::Add, &[]),
                    "-" => self.emit(Opcode::Sub, &[]),
                    "*" => self.emit(Opcode::Mul, &[]),
                    "/" => self.emit(Opcode::Div, &[]),
                    "==" => self.emit(Opcode::Equal, &[]),
                    "!=" => self.emit(Opcode::NotEqual, &[]),
                    ">" => self.emit(Opcode::GreaterThan, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
            }
            Expression::If(expr) => {
                self.compile_expression(&expr.condition)?;
                let jump_not_truthy_pos = self.emit(Opcode::JumpNotTruthy, &[9999]);

                self.compile_block(&expr.consequence)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }
                let jump_pos = self.emit(Opcode::Jump, &[9999]);

                let after_consequence = self.current_instructions().len();
                self.change_operand(jump_not_truthy_pos, after_consequence);

                match &expr.alternative {
                    Some(alt) => {
                        self.compile_block(alt)?;
                        if self.last_instruction_is(Opcode::Pop) {
                            self.remove_last_pop();
                        }
                    }
                    None => {
                        self.emit(Opcode::Null, &[]);
                    }
                }
                let after_alternative = self.current_instructions().len();
                self.change_operand(jump_pos, after_alternative);
            }
            Expression::Identifier(ident) => {
                let symbol = self
                    .symbol_table
                    .resolve(ident.value)
                    .ok_or_else(|| CompileError::UndefinedVariable(ident.value.to_string()))?;
                self.load_symbol(symbol);
            }
            Expression::ArrayLiteral(lit) => {
                for element in &lit.elements {
                    self.compile_expression(element)?;
                }
                self.emit(Opcode::Array, &[lit.elements.len()]);
            }
            Expression::HashLiteral(lit) => {
                for (key, value) in &lit.pairs {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit(Opcode::Hash, &[lit.pairs.len() * 2]);
            }
            Expression::Index(expr) => {
                self.compile_expression(&expr.left)?;
                self.compile_expression(&expr.index)?;
                self.emit(Opcode::Index, &[]);
            }
            Expression::FunctionLiteral(lit) => {
                self.enter_scope();

                if let Some(name) = lit.name {
                    self.symbol_table.define_function_name(name);
                }
                for param in &lit.parameters {
                    self.symbol_table.define(param.value);
                }

                self.compile_block(&lit.body)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.replace_last_pop_with_return();
                }
                if !self.last_instruction_is(Opcode::ReturnValue) {
                    self.emit(Opcode::Return, &[]);
                }

                let free_symbols = self.symbol_table.free_symbols().to_vec();
                let num_locals = self.symbol_table.num_definitions();
                let instructions = self.leave_scope();

                for symbol in &free_symbols {
                    self.load_symbol(*symbol);
                }

                let compiled = Object::CompiledFunction(Rc::new(CompiledFunctionObj {
                    instructions,
                    num_locals,
                    num_parameters: lit.parameters.len(),
                }));
                let idx = self.add_constant(compiled);
                self.emit(Opcode::Closure, &[idx, free_symbols.len()]);
            }
            Expression::Call(expr) => {
                self.compile_expression(&expr.function)?;
                for arg in &expr.arguments {
                    self.compile_expression(arg)?;
                }
                self.emit(Opcode::Call, &[expr.arguments.len()]);
            }
            Expression::MacroLiteral(_) => {
                return Err(CompileError::UnknownOperator(
                    "macro literal survived macro expansion".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn load_symbol(&mut self, symbol: SymbolEntry) {
        match symbol.scope {
            Scope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
            Scope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
            Scope::Builtin => self.emit(Opcode::GetBuiltin, &[symbol.index]),
            Scope::Free => self.emit(Opcode::GetFree, &[symbol.index]),
            Scope::Function => self.emit(Opcode::CurrentClosure, &[]),
        };
    }

    fn add_constant(&mut self, obj: Object) -> usize {
        self.constants.push(obj);
        self.constants.len() - 1
    }

    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = make(op, operands);
        let position = self.current_instructions().len();
        self.current_scope_mut().instructions.0.extend(instruction);
        self.set_last_instruction(op, position);
        position
    }

    fn set_last_instruction(&mut self, op: Opcode, position: usize) {
        let scope = self.current_scope_mut();
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction { opcode: op, position });
    }

    fn last_instruction_is(&self, op: Opcode) -> bool {
        self.current_scope()
            .last_instruction
            .is_some_and(|i| i.opcode == op)
    }

    fn remove_last_pop(&mut self) {
        let scope = self.current_scope_mut();
        let last = scope.last_instruction.expect("monk-compiler: no instruction to remove");
        scope.instructions.0.truncate(last.position);
        scope.last_instruction = scope.previous_instruction;
    }

    fn replace_instruction(&mut self, position: usize, new_instruction: Vec<u8>) {
        let instructions = &mut self.current_scope_mut().instructions.0;
        for (offset, byte) in new_instruction.into_iter().enumerate() {
            instructions[position + offset] = byte;
        }
    }

    fn replace_last_pop_with_return(&mut self) {
        let last_pos = self
            .current_scope()
            .last_instruction
            .expect("monk-compiler: no instruction to replace")
            .position;
        let new_instruction = make(Opcode::ReturnValue, &[]);
        self.replace_instruction(last_pos, new_instruction);
        self.current_scope_mut().last_instruction = Some(EmittedInstruction {
            opcode: Opcode::ReturnValue,
            position: last_pos,
        });
    }

    /// Rewrites a jump's placeholder operand once its target is known.
    /// Only ever used on a fixed-width two-byte operand (`OpJump`/
    /// `OpJumpNotTruthy`), so re-encoding via `make` is safe.
    fn change_operand(&mut self, op_position: usize, operand: usize) {
        let op = Opcode::try_from(self.current_instructions().0[op_position])
            .expect("monk-compiler: patched position is not an opcode byte");
        let new_instruction = make(op, &[operand]);
        self.replace_instruction(op_position, new_instruction);
    }

    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::new());
        let table = std::mem::replace(&mut self.symbol_table, SymbolTable::new());
        self.symbol_table = table.push();
    }

    fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().expect("monk-compiler: no scope to leave");
        let table = std::mem::replace(&mut self.symbol_table, SymbolTable::new());
        self.symbol_table = table.pop();
        scope.instructions
    }

    fn current_scope(&self) -> &CompilationScope {
        self.scopes.last().expect("monk-compiler: no active scope")
    }

    fn current_scope_mut(&mut self) -> &mut CompilationScope {
        self.scopes.last_mut().expect("monk-compiler: no active scope")
    }

    fn current_instructions(&self) -> &Instructions {
        &self.current_scope().instructions
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monk_code::make;
    use monk_parser::Parser;

    fn compile(input: &str) -> Bytecode {
        let mut parser = Parser::new(input);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
        let mut compiler = Compiler::new();
        compiler.compile_program(&program).expect("compile error");
        compiler.bytecode()
    }

    fn concat(chunks: Vec<Vec<u8>>) -> Vec<u8> {
        chunks.into_iter().flatten().collect()
    }

    #[test]
    fn integer_arithmetic_emits_constants_and_add() {
        let bytecode = compile("1 + 2");
        assert_eq!(bytecode.constants, vec![Object::Integer(1), Object::Integer(2)]);
        let expected = concat(vec![
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::Pop, &[]),
        ]);
        assert_eq!(bytecode.instructions.0, expected);
    }

    #[test]
    fn less_than_is_compiled_as_greater_than_with_swapped_operands() {
        let bytecode = compile("1 < 2");
        assert_eq!(bytecode.constants, vec![Object::Integer(2), Object::Integer(1)]);
        let expected = concat(vec![
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::GreaterThan, &[]),
            make(Opcode::Pop, &[]),
        ]);
        assert_eq!(bytecode.instructions.0, expected);
    }

    #[test]
    fn if_without_alternative_jumps_over_an_implicit_null() {
        let bytecode = compile("if (true) { 10 }; 3333;");
        let expected = concat(vec![
            make(Opcode::True, &[]),
            make(Opcode::JumpNotTruthy, &[10]),
            make(Opcode::Constant, &[0]),
            make(Opcode::Jump, &[11]),
            make(Opcode::Null, &[]),
            make(Opcode::Pop, &[]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Pop, &[]),
        ]);
        assert_eq!(bytecode.instructions.0, expected);
    }

    #[test]
    fn global_let_defines_and_reads_back_via_symbol_index() {
        let bytecode = compile("let one = 1; let two = 2; one + two;");
        let expected = concat(vec![
            make(Opcode::Constant, &[0]),
            make(Opcode::SetGlobal, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::SetGlobal, &[1]),
            make(Opcode::GetGlobal, &[0]),
            make(Opcode::GetGlobal, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::Pop, &[]),
        ]);
        assert_eq!(bytecode.instructions.0, expected);
    }

    #[test]
    fn undefined_variable_is_a_compile_error() {
        let mut parser = Parser::new("foobar;");
        let program = parser.parse_program();
        let mut compiler = Compiler::new();
        let err = compiler.compile_program(&program).unwrap_err();
        assert_eq!(err, CompileError::UndefinedVariable("foobar".to_string()));
    }

    #[test]
    fn string_concatenation_shares_one_opcode_with_integer_addition() {
        let bytecode = compile(r#""mon" + "key""#);
        assert_eq!(
            bytecode.constants,
            vec![Object::string("mon"), Object::string("key")]
        );
    }

    #[test]
    fn compiled_function_body_ends_in_return_value_not_pop() {
        let bytecode = compile("fn() { 5 + 10 }");
        let Object::CompiledFunction(func) = &bytecode.constants[2] else {
            panic!("expected a compiled function constant");
        };
        let expected = concat(vec![
            make(Opcode::Constant, &[0]),
            make(Opcode::Constant, &[1]),
            make(Opcode::Add, &[]),
            make(Opcode::ReturnValue, &[]),
        ]);
        assert_eq!(func.instructions.0, expected);
    }

    #[test]
    fn empty_function_body_compiles_to_a_bare_return() {
        let bytecode = compile("fn() { }");
        let Object::CompiledFunction(func) = &bytecode.constants[0] else {
            panic!("expected a compiled function constant");
        };
        assert_eq!(func.instructions.0, make(Opcode::Return, &[]));
    }

    #[test]
    fn call_with_no_arguments_emits_arg_count_zero() {
        let bytecode = compile("fn() { 24 }();");
        let call_bytes = make(Opcode::Call, &[0]);
        assert!(bytecode
            .instructions
            .0
            .windows(call_bytes.len())
            .any(|w| w == call_bytes[..]));
    }

    #[test]
    fn let_bound_locals_use_set_get_local_inside_a_function() {
        let bytecode = compile("fn() { let num = 55; num }");
        let Object::CompiledFunction(func) = &bytecode.constants[1] else {
            panic!("expected a compiled function constant");
        };
        let expected = concat(vec![
            make(Opcode::Constant, &[0]),
            make(Opcode::SetLocal, &[0]),
            make(Opcode::GetLocal, &[0]),
            make(Opcode::ReturnValue, &[]),
        ]);
        assert_eq!(func.instructions.0, expected);
    }

    #[test]
    fn free_variables_are_loaded_before_op_closure() {
        let bytecode = compile(
            "fn(a) { fn(b) { a + b } }",
        );
        let Object::CompiledFunction(inner) = &bytecode.constants[0] else {
            panic!("expected the inner compiled function constant first");
        };
        let expected_inner = concat(vec![
            make(Opcode::GetFree, &[0]),
            make(Opcode::GetLocal, &[0]),
            make(Opcode::Add, &[]),
            make(Opcode::ReturnValue, &[]),
        ]);
        assert_eq!(inner.instructions.0, expected_inner);
    }

    #[test]
    fn builtins_resolve_to_get_builtin() {
        let bytecode = compile("len([1, 2, 3])");
        assert!(bytecode
            .instructions
            .0
            .windows(2)
            .any(|w| w == make(Opcode::GetBuiltin, &[0])[..]));
    }

    #[test]
    fn recursive_let_bound_function_resolves_its_own_name_via_current_closure() {
        let bytecode = compile("let countDown = fn(x) { countDown(x - 1) }; countDown(1);");
        let Object::CompiledFunction(func) = &bytecode.constants[1] else {
            panic!("expected a compiled function constant");
        };
        assert!(func.instructions.0.contains(&(Opcode::CurrentClosure as u8)));
    }
}
