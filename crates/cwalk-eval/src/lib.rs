//! cwalk-eval - Tree-walking evaluation.
//!
//! The evaluator dispatches on node kind with one exhaustive match,
//! walking the arena tree against a [`Memory`] of frames and scopes.
//!
//! Startup populates the global frame in two passes over the program's
//! declarations: includes bind native callables, then function
//! declarations bind their node ids. Remaining top-level declarations
//! (global variables and their initializers) run in source order.
//! Finally a `main` frame is pushed and the binding of `main` is
//! invoked; its result, as an `int`, is the termination status.
//!
//! Statement execution yields a [control-flow signal](Flow) so that
//! `break`, `continue`, and `return` unwind through nested compound
//! statements: loops consume break/continue, calls consume return.
//! Frames and scopes are popped on every exit path, error propagation
//! included, so a failed run leaves no partially-built frames.
//!
//! The evaluator is generic over its standard input and output so
//! tests can drive `printf`/`scanf` against in-memory buffers.

pub mod builtins;
mod memory;
mod number;

pub use builtins::{Arg, BuiltinCtx, NativeFn};
pub use memory::{Callable, Memory, Slot};
pub use number::Number;

use std::io::{BufRead, Write};

use cwalk_par::{AssignOp, Ast, BinOp, CType, Node, NodeId, NumLit, UnOp};
use cwalk_util::{CwalkError, Result};

/// Signal produced by executing one statement.
enum Flow {
    /// Fell through; continue with the next statement.
    Normal,

    /// `break`, carrying its source line.
    Break(u32),

    /// `continue`, carrying its source line.
    Continue(u32),

    /// `return`, with its value (`None` for a bare `return;`) and line.
    Return(Option<Number>, u32),
}

/// Walks the tree and produces the program's termination status.
pub struct Evaluator<'a, R, W> {
    ast: &'a Ast,
    memory: Memory,
    stdin: R,
    stdout: W,
}

impl<'a, R: BufRead, W: Write> Evaluator<'a, R, W> {
    /// Creates an evaluator over `ast`, reading from `stdin` and
    /// writing to `stdout`.
    pub fn new(ast: &'a Ast, stdin: R, stdout: W) -> Self {
        Self {
            ast,
            memory: Memory::new(),
            stdin,
            stdout,
        }
    }

    /// The evaluator's memory, for inspecting balance invariants.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Runs the program: preload libraries and functions, execute the
    /// global declarations, then call `main`.
    pub fn interpret(&mut self) -> Result<i32> {
        let (decls, line) = match self.ast.node(self.ast.root()) {
            Node::Program { decls, line } => (decls, *line),
            other => {
                return Err(CwalkError::runtime(
                    "root node is not a program",
                    other.line(),
                ));
            }
        };

        self.load_libraries(decls)?;
        self.load_functions(decls);

        for &id in decls {
            match self.ast.node(id) {
                Node::IncludeLibrary { .. } | Node::FunctionDeclaration { .. } => {}
                _ => {
                    self.exec(id)?;
                }
            }
        }

        let main = match self.memory.lookup_callable("main", line)? {
            Callable::Function(id) => id,
            Callable::Native(_) => {
                return Err(CwalkError::runtime("'main' is not a function", line));
            }
        };

        let status = self.call_function(main, Vec::new(), line)?;
        Ok(status.to_i64() as i32)
    }

    /// Pass 1: bind each included library's natives into the global
    /// frame.
    fn load_libraries(&mut self, decls: &[NodeId]) -> Result<()> {
        for &id in decls {
            if let Node::IncludeLibrary { name, line, .. } = self.ast.node(id) {
                let natives = builtins::library(name).ok_or_else(|| {
                    CwalkError::runtime(format!("unknown library <{}.h>", name), *line)
                })?;
                for (export, native) in natives {
                    self.memory.bind(export, Slot::Native(native));
                }
            }
        }
        Ok(())
    }

    /// Pass 2: bind each function declaration's node id.
    fn load_functions(&mut self, decls: &[NodeId]) {
        for &id in decls {
            if let Node::FunctionDeclaration { name, .. } = self.ast.node(id) {
                self.memory.bind(name, Slot::Func(id));
            }
        }
    }

    /// Calls the function declared at `fn_id` with already-evaluated
    /// arguments. Pushes a frame, binds parameters, runs the body,
    /// and pops the frame on every exit path.
    fn call_function(
        &mut self,
        fn_id: NodeId,
        args: Vec<Number>,
        call_line: u32,
    ) -> Result<Number> {
        let (name, ret_type, params, body) = match self.ast.node(fn_id) {
            Node::FunctionDeclaration {
                name,
                ret_type,
                params,
                body,
                ..
            } => (name.as_str(), *ret_type, params, *body),
            other => {
                return Err(CwalkError::runtime(
                    "call target is not a function",
                    other.line(),
                ));
            }
        };

        if args.len() != params.len() {
            return Err(CwalkError::runtime(
                format!(
                    "'{}' expects {} argument(s), got {}",
                    name,
                    params.len(),
                    args.len()
                ),
                call_line,
            ));
        }

        self.memory.new_frame(name);
        let result = self.run_function(name, ret_type, params, args, body, call_line);
        self.memory.del_frame();
        result
    }

    /// Body of a call, inside the callee frame: declare and assign
    /// each parameter in order, then run the body statements.
    fn run_function(
        &mut self,
        name: &str,
        ret_type: CType,
        params: &[NodeId],
        args: Vec<Number>,
        body: NodeId,
        call_line: u32,
    ) -> Result<Number> {
        for (&param, value) in params.iter().zip(args) {
            if let Node::Param { name, .. } = self.ast.node(param) {
                self.memory.declare(name);
                self.memory.set(name, value, call_line)?;
            }
        }

        let children = match self.ast.node(body) {
            Node::FunctionBody { children, .. } => children,
            other => {
                return Err(CwalkError::runtime(
                    "function body is malformed",
                    other.line(),
                ));
            }
        };

        let mut returned = None;
        let mut return_line = call_line;
        for &child in children {
            match self.exec(child)? {
                Flow::Normal => {}
                Flow::Return(value, line) => {
                    returned = value;
                    return_line = line;
                    if returned.is_none() && ret_type != CType::Void {
                        // A bare `return;` yields the zero of the
                        // declared type.
                        returned = Some(Number::Int(0));
                    }
                    break;
                }
                Flow::Break(line) => {
                    return Err(CwalkError::runtime("'break' outside of a loop", line));
                }
                Flow::Continue(line) => {
                    return Err(CwalkError::runtime("'continue' outside of a loop", line));
                }
            }
        }

        match (ret_type, returned) {
            (CType::Void, Some(_)) => Err(CwalkError::runtime(
                format!("return type mismatch: '{}' returns void", name),
                return_line,
            )),
            (CType::Void, None) => Ok(Number::Int(0)),
            (ty, Some(value)) => value.cast(ty, return_line),
            (ty, None) => Number::Int(0).cast(ty, call_line),
        }
    }

    /// Executes one statement, yielding its control-flow signal.
    fn exec(&mut self, id: NodeId) -> Result<Flow> {
        match self.ast.node(id) {
            Node::VarDeclaration { name, .. } => {
                self.memory.declare(name);
                Ok(Flow::Normal)
            }
            Node::CompoundStatement { children, .. } => {
                self.memory.new_scope();
                let result = self.exec_block(children);
                self.memory.del_scope();
                result
            }
            Node::IfStatement {
                cond,
                then_body,
                else_body,
                ..
            } => {
                if self.eval_cond(*cond)? {
                    self.exec(*then_body)
                } else {
                    self.exec(*else_body)
                }
            }
            Node::WhileStatement { cond, body, .. } => {
                while self.eval_cond(*cond)? {
                    match self.exec(*body)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Node::DoWhileStatement { cond, body, .. } => {
                loop {
                    match self.exec(*body)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                    if !self.eval_cond(*cond)? {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            Node::ForStatement {
                setup,
                cond,
                step,
                body,
                ..
            } => {
                self.exec(*setup)?;
                loop {
                    if !self.eval_cond(*cond)? {
                        break;
                    }
                    match self.exec(*body)? {
                        // `continue` still runs the step expression.
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        flow @ Flow::Return(..) => return Ok(flow),
                    }
                    self.exec(*step)?;
                }
                Ok(Flow::Normal)
            }
            Node::ReturnStmt { expr, line } => {
                let value = match self.ast.node(*expr) {
                    Node::NoOp { .. } => None,
                    _ => Some(self.eval(*expr)?),
                };
                Ok(Flow::Return(value, *line))
            }
            Node::BreakStatement { line } => Ok(Flow::Break(*line)),
            Node::ContinueStatement { line } => Ok(Flow::Continue(*line)),
            Node::NoOp { .. } => Ok(Flow::Normal),
            _ => {
                self.eval(id)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Executes statements in order, stopping at the first signal.
    fn exec_block(&mut self, children: &[NodeId]) -> Result<Flow> {
        for &child in children {
            match self.exec(child)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// A condition's truth value. An absent condition (`NoOp`, from an
    /// empty `for` header section) is true.
    fn eval_cond(&mut self, id: NodeId) -> Result<bool> {
        match self.ast.node(id) {
            Node::NoOp { .. } => Ok(true),
            _ => Ok(self.eval(id)?.is_truthy()),
        }
    }

    /// Evaluates an expression to a value.
    fn eval(&mut self, id: NodeId) -> Result<Number> {
        match self.ast.node(id) {
            Node::Num { value, .. } => Ok(match value {
                NumLit::Int(v) => Number::Int(*v),
                NumLit::Real(v) => Number::Double(*v),
                NumLit::Char(c) => Number::Char(*c),
            }),
            Node::Var { name, line } => self.memory.get(name, *line),
            Node::Str { line, .. } => Err(CwalkError::type_error(
                "string literal is not a numeric value",
                *line,
            )),
            Node::Expression { children, .. } => {
                let mut value = Number::Int(0);
                for &child in children {
                    value = self.eval(child)?;
                }
                Ok(value)
            }
            Node::Assign {
                target,
                op,
                value,
                line,
            } => self.eval_assign(*target, *op, *value, *line),
            Node::BinaryOperator {
                op,
                left,
                right,
                line,
            } => self.eval_binary(*op, *left, *right, *line),
            Node::UnaryOperator {
                op,
                expr,
                prefix,
                line,
            } => self.eval_unary(*op, *expr, *prefix, *line),
            Node::TernaryOperator {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                if self.eval(*cond)?.is_truthy() {
                    self.eval(*then_expr)
                } else {
                    self.eval(*else_expr)
                }
            }
            Node::FunctionCall { name, args, line } => self.eval_call(name, args, *line),
            other => Err(CwalkError::runtime(
                "statement found where an expression was expected",
                other.line(),
            )),
        }
    }

    fn eval_assign(
        &mut self,
        target: NodeId,
        op: AssignOp,
        value: NodeId,
        line: u32,
    ) -> Result<Number> {
        let name = match self.ast.node(target) {
            Node::Var { name, .. } => name,
            other => {
                return Err(CwalkError::runtime(
                    "assignment target must be a variable",
                    other.line(),
                ));
            }
        };

        let rhs = self.eval(value)?;
        let new_value = match op {
            AssignOp::Assign => rhs,
            AssignOp::Add => self.memory.get(name, line)?.add(rhs, line)?,
            AssignOp::Sub => self.memory.get(name, line)?.sub(rhs, line)?,
            AssignOp::Mul => self.memory.get(name, line)?.mul(rhs, line)?,
            AssignOp::Div => self.memory.get(name, line)?.div(rhs, line)?,
        };

        self.memory.set(name, new_value, line)?;
        Ok(new_value)
    }

    /// Binary operators. `&&` and `||` short-circuit here: the right
    /// operand is evaluated only when the left does not decide the
    /// result.
    fn eval_binary(&mut self, op: BinOp, left: NodeId, right: NodeId, line: u32) -> Result<Number> {
        match op {
            BinOp::And => {
                let lhs = self.eval(left)?;
                if !lhs.is_truthy() {
                    return Ok(Number::Int(0));
                }
                let rhs = self.eval(right)?;
                Ok(Number::Int(rhs.is_truthy() as i64))
            }
            BinOp::Or => {
                let lhs = self.eval(left)?;
                if lhs.is_truthy() {
                    return Ok(Number::Int(1));
                }
                let rhs = self.eval(right)?;
                Ok(Number::Int(rhs.is_truthy() as i64))
            }
            _ => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                match op {
                    BinOp::Add => lhs.add(rhs, line),
                    BinOp::Sub => lhs.sub(rhs, line),
                    BinOp::Mul => lhs.mul(rhs, line),
                    BinOp::Div => lhs.div(rhs, line),
                    BinOp::Mod => lhs.rem(rhs, line),
                    BinOp::BitAnd => lhs.bitand(rhs, line),
                    BinOp::BitOr => lhs.bitor(rhs, line),
                    BinOp::BitXor => lhs.bitxor(rhs, line),
                    BinOp::Shl => lhs.shl(rhs, line),
                    BinOp::Shr => lhs.shr(rhs, line),
                    BinOp::Lt => Ok(lhs.lt(rhs)),
                    BinOp::Gt => Ok(lhs.gt(rhs)),
                    BinOp::LtEq => Ok(lhs.le(rhs)),
                    BinOp::GtEq => Ok(lhs.ge(rhs)),
                    BinOp::Eq => Ok(lhs.eq_num(rhs)),
                    BinOp::NotEq => Ok(lhs.ne_num(rhs)),
                    BinOp::And | BinOp::Or => unreachable!("handled above"),
                }
            }
        }
    }

    fn eval_unary(&mut self, op: UnOp, expr: NodeId, prefix: bool, line: u32) -> Result<Number> {
        match op {
            UnOp::Plus => self.eval(expr),
            UnOp::Minus => Ok(self.eval(expr)?.neg()),
            UnOp::Not => Ok(self.eval(expr)?.not()),
            UnOp::Cast(ty) => self.eval(expr)?.cast(ty, line),
            UnOp::Addr => Err(CwalkError::runtime(
                "'&' is only valid on a scanf argument",
                line,
            )),
            UnOp::Inc | UnOp::Dec => {
                let name = match self.ast.node(expr) {
                    Node::Var { name, .. } => name,
                    _ => {
                        return Err(CwalkError::runtime(
                            "'++' and '--' require a variable operand",
                            line,
                        ));
                    }
                };

                let old = self.memory.get(name, line)?;
                let one = Number::Int(1);
                let new = if op == UnOp::Inc {
                    old.add(one, line)?
                } else {
                    old.sub(one, line)?
                };
                self.memory.set(name, new, line)?;

                Ok(if prefix { new } else { old })
            }
        }
    }

    /// Evaluates a call: arguments left to right in the caller's
    /// frame, then either a user function (new frame) or a native.
    fn eval_call(&mut self, name: &str, args: &[NodeId], line: u32) -> Result<Number> {
        match self.memory.lookup_callable(name, line)? {
            Callable::Function(fn_id) => {
                let mut values = Vec::with_capacity(args.len());
                for &arg in args {
                    match self.eval_arg(arg)? {
                        Arg::Num(value) => values.push(value),
                        Arg::Str(_) => {
                            return Err(CwalkError::type_error(
                                format!("'{}' cannot take a string argument", name),
                                line,
                            ));
                        }
                        Arg::Ref(_) => {
                            return Err(CwalkError::runtime(
                                "'&' is only valid on a scanf argument",
                                line,
                            ));
                        }
                    }
                }
                self.call_function(fn_id, values, line)
            }
            Callable::Native(native) => {
                let mut values = Vec::with_capacity(args.len());
                for &arg in args {
                    values.push(self.eval_arg(arg)?);
                }

                let mut ctx = BuiltinCtx {
                    args: &values,
                    memory: &mut self.memory,
                    stdout: &mut self.stdout,
                    stdin: &mut self.stdin,
                    line,
                };
                native(&mut ctx)
            }
        }
    }

    /// Evaluates one call argument. String literals pass through as
    /// text and `&x` degrades to the variable's name; everything else
    /// evaluates to a value.
    fn eval_arg(&mut self, id: NodeId) -> Result<Arg> {
        match self.ast.node(id) {
            Node::Str { value, .. } => Ok(Arg::Str(value.clone())),
            Node::UnaryOperator {
                op: UnOp::Addr,
                expr,
                line,
                ..
            } => match self.ast.node(*expr) {
                Node::Var { name, .. } => Ok(Arg::Ref(name.clone())),
                _ => Err(CwalkError::runtime(
                    "'&' requires a variable operand",
                    *line,
                )),
            },
            _ => Ok(Arg::Num(self.eval(id)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwalk_lex::Lexer;
    use cwalk_par::Parser;
    use cwalk_sem::SemanticAnalyzer;
    use std::io::Cursor;

    /// Full pipeline against in-memory stdio.
    fn run_with_input(source: &str, input: &str) -> Result<(i32, String)> {
        let ast = Parser::new(Lexer::new(source))?.parse()?;
        SemanticAnalyzer::analyze(&ast)?;

        let mut output = Vec::new();
        let status = {
            let mut evaluator =
                Evaluator::new(&ast, Cursor::new(input.as_bytes().to_vec()), &mut output);
            let status = evaluator.interpret()?;
            assert_eq!(evaluator.memory().frame_depth(), 1, "unbalanced frames");
            assert_eq!(evaluator.memory().scope_depth(), 1, "unbalanced scopes");
            status
        };

        Ok((status, String::from_utf8(output).unwrap()))
    }

    fn run(source: &str) -> Result<(i32, String)> {
        run_with_input(source, "")
    }

    fn status_of(source: &str) -> i32 {
        run(source).unwrap().0
    }

    fn output_of(source: &str) -> String {
        run(source).unwrap().1
    }

    #[test]
    fn test_trivial_main() {
        assert_eq!(status_of("int main() { return 0; }"), 0);
    }

    #[test]
    fn test_arithmetic_status() {
        assert_eq!(status_of("int main() { return 2 + 3 * 4; }"), 14);
    }

    #[test]
    fn test_printf_scenario() {
        let (status, out) = run(
            "#include <stdio.h>\nint main() { printf(\"%d\\n\", 2 + 3 * 4); return 0; }",
        )
        .unwrap();
        assert_eq!(out, "14\n");
        assert_eq!(status, 0);
    }

    #[test]
    fn test_function_call_scenario() {
        assert_eq!(
            status_of("int add(int a, int b) { return a + b; } int main() { return add(40, 2); }"),
            42
        );
    }

    #[test]
    fn test_for_loop_scenario() {
        assert_eq!(
            status_of("int main() { int x = 0; for (x = 0; x < 5; x = x + 1) { } return x; }"),
            5
        );
    }

    #[test]
    fn test_if_else_scenario() {
        assert_eq!(
            status_of("int main() { int a = 1; int b = 2; if (a < b) return 10; else return 20; }"),
            10
        );
    }

    #[test]
    fn test_while_factorial_scenario() {
        assert_eq!(
            status_of(
                "int main() { int i = 3; int f = 1; while (i > 1) { f = f * i; i = i - 1; } return f; }"
            ),
            6
        );
    }

    #[test]
    fn test_uninitialized_read() {
        let err = run("int main() { int x; return x; }").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_division_by_zero() {
        let err = run("int main() { return 1 / 0; }").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_modulo_on_real_is_a_type_error() {
        let err = run("int main() { return 1 % 2.0; }").unwrap_err();
        assert_eq!(err.kind(), "TypeError");
    }

    #[test]
    fn test_missing_main() {
        let err = run("int f() { return 1; }").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_short_circuit_and_or() {
        // bump() must not run on `0 &&` nor on `1 ||`.
        let source = "int calls = 0;\n\
                      int bump() { calls = calls + 1; return 1; }\n\
                      int main() { 0 && bump(); 1 || bump(); return calls; }";
        assert_eq!(status_of(source), 0);
    }

    #[test]
    fn test_logical_operands_do_evaluate_when_needed() {
        let source = "int calls = 0;\n\
                      int bump() { calls = calls + 1; return 1; }\n\
                      int main() { 1 && bump(); 0 || bump(); return calls; }";
        assert_eq!(status_of(source), 2);
    }

    #[test]
    fn test_break_terminates_loop() {
        assert_eq!(
            status_of(
                "int main() { int i = 0; while (1) { i = i + 1; if (i == 4) break; } return i; }"
            ),
            4
        );
    }

    #[test]
    fn test_continue_skips_and_runs_for_step() {
        // Sum the odd numbers below 10.
        let source = "int main() {\n\
                      int i; int sum = 0;\n\
                      for (i = 0; i < 10; i = i + 1) {\n\
                      if (i % 2 == 0) continue;\n\
                      sum = sum + i;\n\
                      }\n\
                      return sum;\n\
                      }";
        assert_eq!(status_of(source), 25);
    }

    #[test]
    fn test_break_only_leaves_inner_loop() {
        let source = "int main() {\n\
                      int i; int j; int count = 0;\n\
                      for (i = 0; i < 3; i = i + 1) {\n\
                      for (j = 0; j < 10; j = j + 1) {\n\
                      if (j == 2) break;\n\
                      count = count + 1;\n\
                      }\n\
                      }\n\
                      return count;\n\
                      }";
        assert_eq!(status_of(source), 6);
    }

    #[test]
    fn test_break_outside_loop() {
        let err = run("int main() { break; return 0; }").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_do_while_runs_at_least_once() {
        assert_eq!(
            status_of("int main() { int i = 10; do { i = i + 1; } while (0); return i; }"),
            11
        );
    }

    #[test]
    fn test_do_while_loops() {
        assert_eq!(
            status_of(
                "int main() { int i = 0; do { i = i + 1; } while (i < 5); return i; }"
            ),
            5
        );
    }

    #[test]
    fn test_empty_for_condition_is_true() {
        assert_eq!(
            status_of("int main() { int i = 0; for (;;) { i = i + 1; if (i == 3) break; } return i; }"),
            3
        );
    }

    #[test]
    fn test_recursion() {
        let source = "int fib(int n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
                      int main() { return fib(10); }";
        assert_eq!(status_of(source), 55);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = run("int f(int a) { return a; } int main() { return f(1, 2); }");
        // The analyzer admits this; the call itself fails.
        assert_eq!(err.unwrap_err().kind(), "RuntimeError");
    }

    #[test]
    fn test_globals_and_shadowing() {
        let source = "int g = 10;\n\
                      int main() { int x = g; { int g = 1; x = x + g; } return x + g; }";
        assert_eq!(status_of(source), 21);
    }

    #[test]
    fn test_comma_expression_value() {
        assert_eq!(status_of("int main() { int x; return (x = 1, x + 9); }"), 10);
    }

    #[test]
    fn test_ternary_evaluates_one_branch() {
        let source = "int calls = 0;\n\
                      int bump() { calls = calls + 1; return 7; }\n\
                      int main() { int x = 1 ? 3 : bump(); return x + calls; }";
        assert_eq!(status_of(source), 3);
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(
            status_of("int main() { int x = 5; int a = ++x; int b = x--; return a * 100 + b * 10 + x; }"),
            // a = 6, b = 6, x = 5
            665
        );
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(
            status_of("int main() { int x = 10; x += 5; x -= 3; x *= 2; x /= 4; return x; }"),
            6
        );
    }

    #[test]
    fn test_cast_truncates() {
        assert_eq!(status_of("int main() { return (int)2.9; }"), 2);
        assert_eq!(status_of("int main() { return (int)(char)321; }"), 65);
    }

    #[test]
    fn test_return_value_converts_to_declared_type() {
        assert_eq!(status_of("int main() { return 2.9; }"), 2);
    }

    #[test]
    fn test_void_function_returning_value_fails() {
        let err = run("void f() { return 1; } int main() { f(); return 0; }").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_void_function_bare_return() {
        assert_eq!(
            status_of("void f() { return; } int main() { f(); return 0; }"),
            0
        );
    }

    #[test]
    fn test_missing_return_yields_zero() {
        assert_eq!(status_of("int main() { int x = 5; x = x + 1; }"), 0);
    }

    #[test]
    fn test_char_literals_and_arithmetic() {
        assert_eq!(status_of("int main() { char c = 'a'; return c - 'a' + 1; }"), 1);
    }

    #[test]
    fn test_scanf_stores_into_caller() {
        let (status, out) = run_with_input(
            "#include <stdio.h>\n\
             int main() { int x; scanf(\"%d\", &x); printf(\"%d\\n\", x * 2); return x; }",
            "21\n",
        )
        .unwrap();
        assert_eq!(out, "42\n");
        assert_eq!(status, 21);
    }

    #[test]
    fn test_scanf_return_count() {
        assert_eq!(
            run_with_input(
                "#include <stdio.h>\nint main() { int a; int b; return scanf(\"%d %d\", &a, &b); }",
                "1 2",
            )
            .unwrap()
            .0,
            2
        );
    }

    #[test]
    fn test_math_library() {
        assert_eq!(
            status_of("#include <math.h>\nint main() { return (int)sqrt(16.0) + (int)pow(2.0, 3.0); }"),
            12
        );
    }

    #[test]
    fn test_printf_returns_byte_count() {
        assert_eq!(
            status_of("#include <stdio.h>\nint main() { return printf(\"hi\\n\"); }"),
            3
        );
    }

    #[test]
    fn test_output_ordering_matches_source_order() {
        let out = output_of(
            "#include <stdio.h>\n\
             void one() { printf(\"1\"); }\n\
             void two() { printf(\"2\"); }\n\
             int main() { one(); two(); printf(\"3\"); return 0; }",
        );
        assert_eq!(out, "123");
    }

    #[test]
    fn test_global_initializers_run_before_main() {
        let source = "int g = 2 * 21;\nint main() { return g; }";
        assert_eq!(status_of(source), 42);
    }

    #[test]
    fn test_frames_isolate_locals() {
        let source = "int f() { int hidden = 1; return hidden; }\n\
                      int main() { f(); return hidden; }";
        // The analyzer already rejects this as an undeclared name.
        let err = run(source).unwrap_err();
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_error_propagation_leaves_memory_balanced() {
        let source = "int f() { { int x; return x; } }\n\
                      int main() { return f(); }";
        let ast = Parser::new(Lexer::new(source)).unwrap().parse().unwrap();
        SemanticAnalyzer::analyze(&ast).unwrap();

        let mut output = Vec::new();
        let mut evaluator =
            Evaluator::new(&ast, Cursor::new(Vec::new()), &mut output);
        let err = evaluator.interpret().unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
        assert_eq!(evaluator.memory().frame_depth(), 1);
        assert_eq!(evaluator.memory().scope_depth(), 1);
    }
}
