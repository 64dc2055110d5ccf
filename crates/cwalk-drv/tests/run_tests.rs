//! End-to-end interpretation scenarios through the real binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn cwalk_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cwalk"))
}

fn run_code(source: &str) -> Command {
    let mut cmd = Command::new(cwalk_bin());
    cmd.args(["-c", source]);
    cmd
}

fn status_line(status: i32) -> predicates::str::ContainsPredicate {
    predicate::str::contains(format!("Process terminated with status {}", status))
}

#[test]
fn test_trivial_program() {
    run_code("int main() { return 0; }")
        .assert()
        .success()
        .stdout(status_line(0));
}

#[test]
fn test_printf_precedence() {
    run_code("#include <stdio.h>\nint main() { printf(\"%d\\n\", 2 + 3 * 4); return 0; }")
        .assert()
        .success()
        .stdout(predicate::str::contains("14\n").and(status_line(0)));
}

#[test]
fn test_function_call() {
    run_code("int add(int a, int b) { return a + b; } int main() { return add(40, 2); }")
        .assert()
        .success()
        .stdout(status_line(42));
}

#[test]
fn test_for_loop() {
    run_code("int main() { int x = 0; for (x = 0; x < 5; x = x + 1) { } return x; }")
        .assert()
        .success()
        .stdout(status_line(5));
}

#[test]
fn test_if_else() {
    run_code("int main() { int a = 1; int b = 2; if (a < b) return 10; else return 20; }")
        .assert()
        .success()
        .stdout(status_line(10));
}

#[test]
fn test_while_factorial() {
    run_code("int main() { int i = 3; int f = 1; while (i > 1) { f = f * i; i = i - 1; } return f; }")
        .assert()
        .success()
        .stdout(status_line(6));
}

#[test]
fn test_scanf_from_stdin() {
    run_code(
        "#include <stdio.h>\nint main() { int x; scanf(\"%d\", &x); printf(\"%d\\n\", x * 2); return 0; }",
    )
    .write_stdin("21\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("42\n").and(status_line(0)));
}

#[test]
fn test_undeclared_variable_reports_semantic_error() {
    run_code("int main() { return x; }")
        .assert()
        .success()
        .stdout(status_line(-1))
        .stderr(predicate::str::contains("[SemanticError]"));
}

#[test]
fn test_division_by_zero_reports_runtime_error() {
    run_code("int main() { return 1 / 0; }")
        .assert()
        .success()
        .stdout(status_line(-1))
        .stderr(predicate::str::contains("[RuntimeError]"));
}

#[test]
fn test_float_modulo_reports_type_error() {
    run_code("int main() { return 1 % 2.0; }")
        .assert()
        .success()
        .stdout(status_line(-1))
        .stderr(predicate::str::contains("[TypeError]"));
}

#[test]
fn test_unknown_character_reports_lexer_error() {
    run_code("int main() { return $; }")
        .assert()
        .success()
        .stdout(status_line(-1))
        .stderr(predicate::str::contains("[LexerError]"));
}

#[test]
fn test_unbalanced_braces_report_syntax_error() {
    run_code("int main() { return 0;")
        .assert()
        .success()
        .stdout(status_line(-1))
        .stderr(predicate::str::contains("[SyntaxError]"));
}

#[test]
fn test_error_message_carries_line_number() {
    run_code("int main() {\nreturn x;\n}")
        .assert()
        .success()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_math_library() {
    run_code(
        "#include <stdio.h>\n#include <math.h>\nint main() { printf(\"%d\\n\", (int)sqrt(81.0)); return 0; }",
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("9\n").and(status_line(0)));
}

#[test]
fn test_recursive_program_output() {
    let source = "#include <stdio.h>\n\
                  int fact(int n) { if (n < 2) return 1; return n * fact(n - 1); }\n\
                  int main() {\n\
                  int i;\n\
                  for (i = 1; i <= 5; i = i + 1) printf(\"%d\\n\", fact(i));\n\
                  return 0;\n\
                  }";
    run_code(source)
        .assert()
        .success()
        .stdout(predicate::str::contains("1\n2\n6\n24\n120\n").and(status_line(0)));
}
