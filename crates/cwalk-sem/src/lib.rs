//! cwalk-sem - Scoped name resolution and declaration checks.
//!
//! The analyzer walks the parsed tree with a stack of symbol tables
//! mirroring the lexical scopes the evaluator will create: one global
//! scope, one scope per function body, one per compound statement. It
//! produces no new tree; it either completes silently or fails with a
//! `SemanticError`.
//!
//! Two passes over the top-level declarations:
//!
//! 1. **Collect.** Includes bind their exported built-in names and
//!    function declarations bind their names into the global scope, so
//!    functions may call each other regardless of source order.
//! 2. **Check.** Every body is walked: variables must be declared
//!    before use and at most once per scope, calls must target a bound
//!    function or built-in, `&x` may appear only as a `scanf` argument.

mod libs;
mod scope;

pub use libs::library_exports;
pub use scope::{Symbol, SymbolTable};

use cwalk_par::{Ast, CType, Node, NodeId, UnOp};
use cwalk_util::{CwalkError, Result};

/// Walks the tree and rejects programs with name or declaration errors.
pub struct SemanticAnalyzer<'a> {
    ast: &'a Ast,
    table: SymbolTable,
}

impl<'a> SemanticAnalyzer<'a> {
    /// Analyzes a whole program.
    pub fn analyze(ast: &'a Ast) -> Result<()> {
        let mut analyzer = Self {
            ast,
            table: SymbolTable::new(),
        };

        let decls = match ast.node(ast.root()) {
            Node::Program { decls, .. } => decls.clone(),
            other => {
                return Err(CwalkError::semantic(
                    "root node is not a program",
                    other.line(),
                ));
            }
        };

        analyzer.collect_globals(&decls)?;
        analyzer.check_decls(&decls)?;
        Ok(())
    }

    /// Pass 1: bind built-ins and function names into the global scope.
    fn collect_globals(&mut self, decls: &[NodeId]) -> Result<()> {
        for &id in decls {
            match self.ast.node(id) {
                Node::IncludeLibrary {
                    name, ext, line, ..
                } => {
                    if ext != "h" {
                        return Err(CwalkError::semantic(
                            format!("cannot include '{}.{}': only .h files", name, ext),
                            *line,
                        ));
                    }
                    let exports = libs::library_exports(name).ok_or_else(|| {
                        CwalkError::semantic(format!("unknown library <{}.h>", name), *line)
                    })?;
                    for export in exports {
                        // Including the same library twice is harmless.
                        self.table.declare(export, Symbol::Builtin);
                    }
                }
                Node::FunctionDeclaration {
                    ret_type,
                    name,
                    params,
                    line,
                    ..
                } => {
                    let symbol = Symbol::Function {
                        ret_type: *ret_type,
                        arity: params.len(),
                    };
                    if !self.table.declare(name, symbol) {
                        return Err(CwalkError::semantic(
                            format!("function '{}' is already defined", name),
                            *line,
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Pass 2: walk every declaration body in source order.
    fn check_decls(&mut self, decls: &[NodeId]) -> Result<()> {
        for &id in decls {
            match self.ast.node(id) {
                Node::IncludeLibrary { .. } => {}
                Node::FunctionDeclaration { params, body, .. } => {
                    self.check_function(params, *body)?;
                }
                _ => self.check_stmt(id)?,
            }
        }
        Ok(())
    }

    /// Function scope: parameters and body share one scope. The scope
    /// is popped on every exit path.
    fn check_function(&mut self, params: &[NodeId], body: NodeId) -> Result<()> {
        self.table.enter_scope();
        let result = self.check_function_scoped(params, body);
        self.table.exit_scope();
        result
    }

    fn check_function_scoped(&mut self, params: &[NodeId], body: NodeId) -> Result<()> {
        for &param in params {
            if let Node::Param { ty, name, line } = self.ast.node(param) {
                self.declare_variable(name, *ty, *line)?;
            }
        }

        match self.ast.node(body) {
            Node::FunctionBody { children, .. } => {
                for &child in children {
                    self.check_stmt(child)?;
                }
                Ok(())
            }
            other => Err(CwalkError::semantic(
                "function body is malformed",
                other.line(),
            )),
        }
    }

    fn declare_variable(&mut self, name: &str, ty: CType, line: u32) -> Result<()> {
        if ty == CType::Void {
            return Err(CwalkError::semantic(
                format!("variable '{}' declared void", name),
                line,
            ));
        }
        if !self.table.declare(name, Symbol::Variable { ty }) {
            return Err(CwalkError::semantic(
                format!("duplicate declaration of '{}'", name),
                line,
            ));
        }
        Ok(())
    }

    fn check_stmt(&mut self, id: NodeId) -> Result<()> {
        match self.ast.node(id) {
            Node::VarDeclaration { ty, name, line } => {
                self.declare_variable(name, *ty, *line)
            }
            Node::CompoundStatement { children, .. } => {
                self.table.enter_scope();
                let result = children.iter().try_for_each(|&child| self.check_stmt(child));
                self.table.exit_scope();
                result
            }
            Node::FunctionBody { children, .. } => {
                children.iter().try_for_each(|&child| self.check_stmt(child))
            }
            Node::IfStatement {
                cond,
                then_body,
                else_body,
                ..
            } => {
                self.check_expr(*cond)?;
                self.check_stmt(*then_body)?;
                self.check_stmt(*else_body)
            }
            Node::WhileStatement { cond, body, .. }
            | Node::DoWhileStatement { cond, body, .. } => {
                self.check_expr(*cond)?;
                self.check_stmt(*body)
            }
            Node::ForStatement {
                setup,
                cond,
                step,
                body,
                ..
            } => {
                self.check_stmt(*setup)?;
                self.check_stmt(*cond)?;
                self.check_stmt(*step)?;
                self.check_stmt(*body)
            }
            Node::ReturnStmt { expr, .. } => self.check_stmt(*expr),
            Node::BreakStatement { .. } | Node::ContinueStatement { .. } | Node::NoOp { .. } => {
                Ok(())
            }
            _ => self.check_expr(id),
        }
    }

    fn check_expr(&mut self, id: NodeId) -> Result<()> {
        match self.ast.node(id) {
            Node::Expression { children, .. } => {
                children.iter().try_for_each(|&child| self.check_expr(child))
            }
            Node::Assign { target, value, .. } => {
                self.check_assign_target(*target)?;
                self.check_expr(*value)
            }
            Node::BinaryOperator { left, right, .. } => {
                self.check_expr(*left)?;
                self.check_expr(*right)
            }
            Node::UnaryOperator { op, expr, line, .. } => match op {
                UnOp::Addr => Err(CwalkError::semantic(
                    "'&' is only valid on a scanf argument",
                    *line,
                )),
                UnOp::Inc | UnOp::Dec => {
                    if matches!(self.ast.node(*expr), Node::Var { .. }) {
                        self.check_expr(*expr)
                    } else {
                        Err(CwalkError::semantic(
                            format!("'{}' requires a variable operand", op),
                            *line,
                        ))
                    }
                }
                _ => self.check_expr(*expr),
            },
            Node::TernaryOperator {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                self.check_expr(*cond)?;
                self.check_expr(*then_expr)?;
                self.check_expr(*else_expr)
            }
            Node::FunctionCall { name, args, line } => self.check_call(name, args, *line),
            Node::Var { name, line } => match self.table.resolve(name) {
                Some(Symbol::Variable { .. }) => Ok(()),
                Some(_) => Err(CwalkError::semantic(
                    format!("'{}' is not a variable", name),
                    *line,
                )),
                None => Err(CwalkError::semantic(
                    format!("undeclared variable '{}'", name),
                    *line,
                )),
            },
            Node::Num { .. } | Node::Str { .. } | Node::NoOp { .. } => Ok(()),
            other => Err(CwalkError::semantic(
                "statement found where an expression was expected",
                other.line(),
            )),
        }
    }

    fn check_assign_target(&mut self, target: NodeId) -> Result<()> {
        match self.ast.node(target) {
            Node::Var { name, line } => match self.table.resolve(name) {
                Some(Symbol::Variable { .. }) => Ok(()),
                Some(_) => Err(CwalkError::semantic(
                    format!("cannot assign to '{}': not a variable", name),
                    *line,
                )),
                None => Err(CwalkError::semantic(
                    format!("undeclared variable '{}'", name),
                    *line,
                )),
            },
            other => Err(CwalkError::semantic(
                "assignment target must be a variable",
                other.line(),
            )),
        }
    }

    /// A call must target a bound function or built-in. `&x` arguments
    /// are allowed only when calling `scanf`, and must name variables.
    fn check_call(&mut self, name: &str, args: &[NodeId], line: u32) -> Result<()> {
        match self.table.resolve(name) {
            Some(Symbol::Function { .. }) | Some(Symbol::Builtin) => {}
            Some(Symbol::Variable { .. }) => {
                return Err(CwalkError::semantic(
                    format!("'{}' is not a function", name),
                    line,
                ));
            }
            None => {
                return Err(CwalkError::semantic(
                    format!("call to undefined function '{}'", name),
                    line,
                ));
            }
        }

        for &arg in args {
            match self.ast.node(arg) {
                Node::UnaryOperator {
                    op: UnOp::Addr,
                    expr,
                    line,
                    ..
                } if name == "scanf" => match self.ast.node(*expr) {
                    Node::Var { name, line } => match self.table.resolve(name) {
                        Some(Symbol::Variable { .. }) => {}
                        _ => {
                            return Err(CwalkError::semantic(
                                format!("undeclared variable '{}'", name),
                                *line,
                            ));
                        }
                    },
                    _ => {
                        return Err(CwalkError::semantic(
                            "'&' requires a variable operand",
                            *line,
                        ));
                    }
                },
                _ => self.check_expr(arg)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwalk_lex::Lexer;
    use cwalk_par::Parser;

    fn analyze(source: &str) -> Result<()> {
        let ast = Parser::new(Lexer::new(source)).unwrap().parse().unwrap();
        SemanticAnalyzer::analyze(&ast)
    }

    fn analyze_err(source: &str) -> CwalkError {
        analyze(source).expect_err("expected a semantic error")
    }

    #[test]
    fn test_valid_program() {
        analyze(
            "#include <stdio.h>\n\
             int add(int a, int b) { return a + b; }\n\
             int main() { int x = add(1, 2); printf(\"%d\", x); return 0; }",
        )
        .unwrap();
    }

    #[test]
    fn test_undeclared_variable() {
        let err = analyze_err("int main() { return x; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_assignment_to_undeclared() {
        let err = analyze_err("int main() { x = 1; return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let err = analyze_err("int main() { int x; int x; return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_shadowing_is_allowed() {
        analyze("int main() { int x = 1; { int x = 2; } return x; }").unwrap();
    }

    #[test]
    fn test_sibling_scopes_can_reuse_names() {
        analyze("int main() { { int x; } { int x; } return 0; }").unwrap();
    }

    #[test]
    fn test_scope_ends_at_block() {
        let err = analyze_err("int main() { { int x = 1; } return x; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_params_share_body_scope() {
        let err = analyze_err("int f(int a) { int a; return a; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_duplicate_function() {
        let err = analyze_err("int f() { return 1; } int f() { return 2; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_call_to_unknown_function() {
        let err = analyze_err("int main() { return mystery(); }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_call_before_textual_definition() {
        analyze("int main() { return late(); } int late() { return 1; }").unwrap();
    }

    #[test]
    fn test_printf_requires_include() {
        let err = analyze_err("int main() { printf(\"hi\"); return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_include_non_h_extension() {
        let err = analyze_err("#include <stdio.txt>\nint main() { return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_unknown_library() {
        let err = analyze_err("#include <conio.h>\nint main() { return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_double_include_is_harmless() {
        analyze("#include <stdio.h>\n#include <stdio.h>\nint main() { return 0; }").unwrap();
    }

    #[test]
    fn test_address_of_outside_scanf() {
        let err = analyze_err("int main() { int x = 0; return &x; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_address_of_in_scanf_is_allowed() {
        analyze(
            "#include <stdio.h>\n\
             int main() { int x; scanf(\"%d\", &x); return x; }",
        )
        .unwrap();
    }

    #[test]
    fn test_address_of_undeclared_in_scanf() {
        let err = analyze_err(
            "#include <stdio.h>\n\
             int main() { scanf(\"%d\", &x); return 0; }",
        );
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_void_variable_rejected() {
        let err = analyze_err("int main() { void x; return 0; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_increment_requires_variable() {
        let err = analyze_err("int main() { return ++1; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_variable_used_as_function() {
        let err = analyze_err("int main() { int f = 1; return f(); }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_function_used_as_variable() {
        let err = analyze_err("int f() { return 1; } int main() { return f + 1; }");
        assert_eq!(err.kind(), "SemanticError");
    }

    #[test]
    fn test_global_variables_visible_in_functions() {
        analyze("int g = 1;\nint main() { return g; }").unwrap();
    }

    #[test]
    fn test_for_loop_counter() {
        analyze("int main() { int i; for (i = 0; i < 3; i = i + 1) { } return i; }").unwrap();
    }
}
