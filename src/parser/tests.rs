//! Unit tests for the parser module.
//!
//! Expression tests run the grammar directly on a parser whose symbol table
//! is seeded with a few variables and functions:
//!
//! - `a`, `b`, `c`, `d`: int
//! - `ch`: char, `s`: char[], `v`: int[]
//! - `two(int, int) -> int`, `put(char) -> void`
//!
//! Statement tests go through `parse` on complete programs.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, Stmt},
        expressions::FuncExpr,
        rules::StandardRules,
        types::Type,
    },
    errors::{
        diagnostics::{DiagnosticKind, SemanticError},
        errors::{Error, ErrorImpl},
    },
    lexer::{lexer::tokenize, tokens::TokenKind},
    symbols::symbols::{FunctionSignature, Symbol},
};

use super::{
    expr::{parse_expr, parse_expr_after, Pending},
    factor::parse_array_sub,
    parser::{parse, Parser, ParserOptions},
};

fn seeded_parser(source: &str, options: ParserOptions) -> Parser {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    let mut parser = Parser::with_options(
        tokens,
        Rc::new("test.c".to_string()),
        options,
        Box::new(StandardRules),
    );

    let symbols = parser.symbols_mut();
    for name in ["a", "b", "c", "d"] {
        symbols.declare(Symbol::variable(name, Type::Int)).unwrap();
    }
    symbols.declare(Symbol::variable("ch", Type::Char)).unwrap();
    symbols.declare(Symbol::variable("s", Type::CharArray)).unwrap();
    symbols.declare(Symbol::variable("v", Type::IntArray)).unwrap();
    symbols
        .declare(Symbol::function(
            "two",
            FunctionSignature::new(Type::Int, vec![Type::Int, Type::Int]),
        ))
        .unwrap();
    symbols
        .declare(Symbol::function(
            "put",
            FunctionSignature::new(Type::Void, vec![Type::Char]),
        ))
        .unwrap();

    parser
}

fn try_expr(source: &str) -> (Parser, Result<Option<ExprWrapper>, Error>) {
    let mut parser = seeded_parser(source, ParserOptions::default());
    let result = parse_expr(&mut parser);
    (parser, result)
}

fn expr(source: &str) -> (Parser, ExprWrapper) {
    let (parser, result) = try_expr(source);
    let expr = result.unwrap().unwrap();
    (parser, expr)
}

fn semantic_errors(parser: &Parser) -> Vec<SemanticError> {
    parser
        .diagnostics()
        .iter()
        .filter_map(|diagnostic| match &diagnostic.kind {
            DiagnosticKind::Semantic(error) => Some(error.clone()),
            DiagnosticKind::Syntax(_) => None,
        })
        .collect()
}

#[test]
fn test_same_level_operators_associate_left() {
    let (parser, tree) = expr("a - b - c");
    assert_eq!(tree.sexpr(), "(- (- a b) c)");
    assert!(parser.diagnostics().is_empty());

    let (_, tree) = expr("a * b / c % d");
    assert_eq!(tree.sexpr(), "(% (/ (* a b) c) d)");

    let (_, tree) = expr("a || b || c");
    assert_eq!(tree.sexpr(), "(|| (|| a b) c)");

    let (_, tree) = expr("a < b == c");
    assert_eq!(tree.sexpr(), "(== (< a b) c)");
}

#[test]
fn test_tighter_levels_bind_first() {
    let (_, tree) = expr("a + b * c");
    assert_eq!(tree.sexpr(), "(+ a (* b c))");

    let (_, tree) = expr("a || b && c == d + 1");
    assert_eq!(tree.sexpr(), "(|| a (&& b (== c (+ d 1))))");

    let (_, tree) = expr("(a + b) * c");
    assert_eq!(tree.sexpr(), "(* (+ a b) c)");
}

#[test]
fn test_lone_primary_is_returned_unwrapped() {
    let (parser, tree) = expr("a");
    assert_eq!(tree.get_expr_type(), ExprType::Identifier);
    assert_eq!(tree.sexpr(), "a");
    assert_eq!(tree.get_type(), Type::Int);
    assert!(!parser.has_tokens());

    let (_, tree) = expr("42");
    assert_eq!(tree.get_expr_type(), ExprType::Constant);
}

#[test]
fn test_no_match_is_not_an_error() {
    let (parser, result) = try_expr(")");
    assert!(result.unwrap().is_none());
    assert_eq!(parser.current_token_kind(), TokenKind::CloseParen);
}

#[test]
fn test_missing_right_operand_is_fatal() {
    let (_, result) = try_expr("a + ;");
    let error = result.unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::OperandMissing {
            operator: TokenKind::Plus
        }
    );
    assert_eq!(error.get_position().column, 3);
    assert_eq!(error.get_impl().to_string(), "missing operand for operator `+`");

    let (_, result) = try_expr("a * b &&");
    assert!(matches!(
        result.unwrap_err().get_impl(),
        ErrorImpl::OperandMissing {
            operator: TokenKind::And
        }
    ));
}

#[test]
fn test_type_error_keeps_the_tree() {
    let (parser, tree) = expr("s + a");
    assert_eq!(tree.sexpr(), "(+ s a)");
    assert_eq!(tree.get_type(), Type::Error);

    let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position.column, 3);
    assert_eq!(
        diagnostics[0].message(),
        "cannot perform operation between type `char[]` and `int`"
    );
}

#[test]
fn test_error_operand_does_not_cascade() {
    let (parser, tree) = expr("s + a * b - c");
    assert_eq!(tree.sexpr(), "(- (+ s (* a b)) c)");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(parser.diagnostics().semantic_count(), 1);
}

#[test]
fn test_undeclared_identifier_reported_once() {
    let (parser, tree) = expr("x + x");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::UndeclaredIdentifier {
            name: String::from("x")
        }]
    );
}

#[test]
fn test_char_operands_are_widened() {
    let (parser, tree) = expr("ch + 1");
    assert_eq!(tree.sexpr(), "(+ (int ch) 1)");
    assert_eq!(tree.get_type(), Type::Int);
    assert!(parser.diagnostics().is_empty());

    let (_, tree) = expr("s[0]");
    assert_eq!(tree.sexpr(), "(int (index s 0))");
}

#[test]
fn test_logical_not() {
    let (_, tree) = expr("!a && b");
    assert_eq!(tree.sexpr(), "(&& (! a) b)");
    assert_eq!(tree.get_type(), Type::Int);

    let (parser, tree) = expr("!v");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::InvalidOperand {
            operand: Type::IntArray
        }]
    );

    let (_, result) = try_expr("! ;");
    assert_eq!(
        result.unwrap_err().get_impl(),
        &ErrorImpl::syntax("`!` must be followed by an expression")
    );
}

#[test]
fn test_prefix_steps() {
    let (_, tree) = expr("++a + --b");
    assert_eq!(tree.sexpr(), "(+ (++ a) (-- b))");

    let (_, tree) = expr("++ch");
    assert_eq!(tree.sexpr(), "(int (++ ch))");

    let (parser, tree) = expr("--s");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(parser.diagnostics().semantic_count(), 1);

    let (_, result) = try_expr("++ 1");
    assert_eq!(
        result.unwrap_err().get_impl(),
        &ErrorImpl::syntax("`++` must be followed by an identifier")
    );
}

#[test]
fn test_address_of_array_element() {
    let (parser, tree) = expr("&v[a + 1]");
    assert_eq!(tree.sexpr(), "(& (index v (+ a 1)))");
    assert_eq!(tree.get_expr_type(), ExprType::AddressOfArrayElement);
    assert_eq!(tree.get_type(), Type::IntArray);
    assert!(parser.diagnostics().is_empty());

    let (_, result) = try_expr("&v");
    assert!(result.is_err());

    let (_, result) = try_expr("& 3");
    assert!(result.is_err());
}

#[test]
fn test_parenthesis_requires_an_expression() {
    let (_, result) = try_expr("( )");
    assert_eq!(
        result.unwrap_err().get_impl(),
        &ErrorImpl::syntax("not a valid expression inside parenthesis")
    );

    let (_, result) = try_expr("(a + b");
    assert!(result.is_err());
}

#[test]
fn test_string_literals_are_interned() {
    let (parser, tree) = expr("printf(\"hi\", \"hi\")");
    assert_eq!(tree.sexpr(), "(call printf \"hi\" \"hi\")");
    assert_eq!(parser.strings().len(), 1);
    assert_eq!(parser.strings().get(0), Some("hi"));
}

#[test]
fn test_subscript() {
    let (parser, tree) = expr("v[a + 1] * 2");
    assert_eq!(tree.sexpr(), "(* (index v (+ a 1)) 2)");
    assert_eq!(tree.get_type(), Type::Int);
    assert!(parser.diagnostics().is_empty());

    let (parser, _) = expr("v[s]");
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::SubscriptType {
            received: Type::CharArray
        }]
    );
}

#[test]
fn test_subscript_of_non_array_substitutes_placeholder() {
    let (parser, tree) = expr("a[b + 1] + c");
    assert_eq!(tree.sexpr(), "(+ @@variable c)");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::NotAnArray {
            name: String::from("a")
        }]
    );
}

#[test]
fn test_malformed_subscript_is_contained() {
    let (parser, tree) = expr("v[a +] + b");
    assert_eq!(tree.sexpr(), "(+ @@variable b)");
    assert_eq!(parser.diagnostics().len(), 1);
    assert_eq!(parser.diagnostics().syntax_count(), 1);
    assert!(!parser.has_tokens());
}

#[test]
fn test_recovery_running_off_the_end_is_fatal() {
    let (_, result) = try_expr("v[a +");
    let error = result.unwrap_err();
    assert!(error.is_eof());
}

#[test]
fn test_call_with_too_many_arguments() {
    let (parser, tree) = expr("two(a, b, c)");
    let call = tree.downcast_ref::<FuncExpr>().unwrap();
    assert_eq!(call.num_args(), 3);
    assert_eq!(tree.get_type(), Type::Int);

    let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "function two takes only 2 arguments");

    let (parser, _) = expr("two(a, b, c, d)");
    let names: Vec<_> = parser
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.get_error_name())
        .collect();
    assert_eq!(names, vec!["TooManyArguments", "TooManyArguments"]);
}

#[test]
fn test_call_with_too_few_arguments() {
    let (parser, tree) = expr("two(a)");
    assert_eq!(tree.sexpr(), "(call two a)");

    let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "function two requires 2 arguments");
}

#[test]
fn test_int_argument_narrowed_for_char_parameter() {
    let (parser, tree) = expr("put(a + 1)");
    assert!(parser.diagnostics().is_empty());
    assert_eq!(tree.sexpr(), "(call put (char (+ a 1)))");

    let call = tree.downcast_ref::<FuncExpr>().unwrap();
    assert_eq!(call.args()[0].get_expr_type(), ExprType::ToChar);
    assert_eq!(tree.get_type(), Type::Void);
}

#[test]
fn test_argument_type_mismatch() {
    let (parser, _) = expr("two(s, ch)");
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::ArgumentType {
            expected: Type::Int
        }]
    );
}

#[test]
fn test_calling_a_variable() {
    let (parser, tree) = expr("a(1) + b");
    assert_eq!(tree.sexpr(), "(+ @@variable b)");
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::NotAFunction {
            name: String::from("a")
        }]
    );
}

#[test]
fn test_undeclared_callee_is_not_checked_further() {
    let (parser, tree) = expr("missing(1, 2, 3)");
    assert_eq!(tree.sexpr(), "(call missing 1 2 3)");
    assert_eq!(tree.get_type(), Type::Error);
    assert_eq!(parser.diagnostics().len(), 1);
}

#[test]
fn test_malformed_argument_still_builds_the_call() {
    let (parser, tree) = expr("printf(\"%d\", a *) + 1");
    assert_eq!(tree.sexpr(), "(+ (call printf \"%d\") 1)");
    assert_eq!(parser.diagnostics().syntax_count(), 1);
    assert!(parser.needs_printf());
}

#[test]
fn test_malformed_argument_still_checks_arity() {
    let (parser, tree) = expr("two(a, ) + 1");
    assert_eq!(tree.sexpr(), "(+ (call two a) 1)");

    let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::Syntax(ErrorImpl::syntax("expected an argument expression"))
    );
    assert_eq!(diagnostics[1].message(), "function two requires 2 arguments");

    let (parser, _) = expr("printf(*)");
    assert_eq!(parser.diagnostics().syntax_count(), 1);
    assert_eq!(semantic_errors(&parser), vec![SemanticError::FormatArgumentsRequired]);
}

#[test]
fn test_printf_arguments() {
    let (parser, tree) = expr("printf(\"%d %c\\n\", a, ch)");
    assert_eq!(tree.sexpr(), "(call printf \"%d %c\\n\" a (int ch))");
    assert!(parser.diagnostics().is_empty());
    assert!(parser.needs_printf());

    let (parser, _) = expr("printf(a)");
    assert_eq!(semantic_errors(&parser), vec![SemanticError::FormatStringRequired]);

    let (parser, _) = expr("printf()");
    assert_eq!(semantic_errors(&parser), vec![SemanticError::FormatArgumentsRequired]);
}

#[test]
fn test_pending_identifier_is_consumed_once() {
    let mut parser = seeded_parser("a + b", ParserOptions::default());
    let token = parser.advance().clone();
    let ident = parser.symbols().lookup("a").unwrap();

    let pending = Pending::Ident {
        ident,
        span: token.span,
    };
    let tree = parse_expr_after(&mut parser, Some(pending)).unwrap().unwrap();
    assert_eq!(tree.sexpr(), "(+ a b)");
    assert!(!parser.has_tokens());
}

#[test]
fn test_pending_function_identifier_is_called() {
    let mut parser = seeded_parser("(a, b) * 2", ParserOptions::default());
    let ident = parser.symbols().lookup("two").unwrap();
    let span = parser.current_token().span.clone();

    let pending = Pending::Ident { ident, span };
    let tree = parse_expr_after(&mut parser, Some(pending)).unwrap().unwrap();
    assert_eq!(tree.sexpr(), "(* (call two a b) 2)");
}

#[test]
fn test_pending_array_reference() {
    let mut parser = seeded_parser("v[1] - 2", ParserOptions::default());
    let token = parser.advance().clone();
    let ident = parser.symbols().lookup("v").unwrap();
    let array = parse_array_sub(&mut parser, ident, token.span).unwrap();

    let tree = parse_expr_after(&mut parser, Some(Pending::Array(array)))
        .unwrap()
        .unwrap();
    assert_eq!(tree.sexpr(), "(- (index v 1) 2)");
    assert!(!parser.has_tokens());
}

#[test]
fn test_semantic_checks_can_be_disabled() {
    let options = ParserOptions {
        check_semantics: false,
    };

    let mut parser = seeded_parser("s + a[1] + two(1, 2, 3)", options);
    let tree = parse_expr(&mut parser).unwrap().unwrap();
    assert_eq!(tree.get_type(), Type::Error);
    assert!(parser.diagnostics().is_empty());
}

// Statements

fn parse_source(source: &str) -> (Parser, Result<crate::ast::statements::Program, Error>) {
    let tokens = tokenize(source.to_string(), Some("test.c".to_string())).unwrap();
    parse(tokens, Rc::new("test.c".to_string()))
}

fn body_of(program: &crate::ast::statements::Program, name: &str) -> String {
    program.function(name).unwrap().body.sexpr()
}

#[test]
fn test_parse_function() {
    let (parser, result) = parse_source("int main(void) { int x; x = 1; return x; }");
    let program = result.unwrap();

    assert!(parser.diagnostics().is_empty());
    assert_eq!(body_of(&program, "main"), "(block (decl int x) (= x 1) (return x))");
    assert!(program.function("main").unwrap().params.is_empty());
}

#[test]
fn test_parse_params_and_recursion() {
    let source = "int sum(int v[], int n) { if (n < 1) return 0; return v[n - 1] + sum(v, n - 1); }";
    let (parser, result) = parse_source(source);
    let program = result.unwrap();

    assert!(parser.diagnostics().is_empty());
    let function = program.function("sum").unwrap();
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.params[0].get_type(), Type::IntArray);
    assert_eq!(
        function.body.sexpr(),
        "(block (if (< n 1) (return 0)) (return (+ (index v (- n 1)) (call sum v (- n 1)))))"
    );
}

#[test]
fn test_globals_and_initializers() {
    let (parser, result) = parse_source("int count = 3; char buf[16]; char c = 65;");
    let program = result.unwrap();

    assert!(parser.diagnostics().is_empty());
    assert_eq!(program.globals.len(), 3);
    assert_eq!(program.globals[1].size, Some(16));
    assert_eq!(program.globals[1].sexpr(), "(decl char[] buf 16)");
    assert_eq!(program.globals[2].sexpr(), "(decl char c (char 65))");
}

#[test]
fn test_assignment_coercion() {
    let source = "int main() { char c; int n; int v[2]; c = n + 1; n = 'a'; v = 1; return 0; }";
    let (parser, result) = parse_source(source);
    let program = result.unwrap();

    assert_eq!(
        body_of(&program, "main"),
        "(block (decl char c) (decl int n) (decl int[] v 2) (= c (char (+ n 1))) (= n (int 'a')) (= v 1) (return 0))"
    );
    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::AssignmentType {
            target: Type::IntArray,
            value: Type::Int
        }]
    );
}

#[test]
fn test_identifier_statements_hand_over_lookahead() {
    let source = "int f(int a) { return a; } int main() { int v[3]; v[1] = f(2); f(1); v[2] + 1; return 0; }";
    let (parser, result) = parse_source(source);
    let program = result.unwrap();

    assert!(parser.diagnostics().is_empty());
    assert_eq!(
        body_of(&program, "main"),
        "(block (decl int[] v 3) (= (index v 1) (call f 2)) (call f 1) (+ (index v 2) 1) (return 0))"
    );
}

#[test]
fn test_statement_recovery() {
    let (parser, result) = parse_source("int main() { int x; x = ; x = 2; return x; }");
    let program = result.unwrap();

    assert_eq!(parser.diagnostics().len(), 1);
    assert_eq!(parser.diagnostics().syntax_count(), 1);
    assert_eq!(
        body_of(&program, "main"),
        "(block (decl int x) (null) (= x 2) (return x))"
    );
}

#[test]
fn test_malformed_subscript_starting_a_statement_is_contained() {
    let (parser, result) =
        parse_source("int main() { int v[4]; int a; v[a +] + 1; v[*] = 3; a = 2; return a; }");
    let program = result.unwrap();

    assert_eq!(parser.diagnostics().len(), 2);
    assert_eq!(parser.diagnostics().syntax_count(), 2);
    assert_eq!(
        body_of(&program, "main"),
        "(block (decl int[] v 4) (decl int a) (+ @@variable 1) (= @@variable 3) (= a 2) (return a))"
    );
}

#[test]
fn test_missing_semicolon() {
    let (parser, result) = parse_source("int main() { int x; x = 1 x = 2; return x; }");
    assert!(result.is_ok());

    let diagnostic = parser.diagnostics().iter().next().unwrap();
    assert_eq!(
        diagnostic.kind,
        DiagnosticKind::Syntax(ErrorImpl::UnexpectedToken {
            token: String::from("x")
        })
    );
}

#[test]
fn test_unterminated_input_is_fatal() {
    let (_, result) = parse_source("int main() { int x; x = 1");
    let error = result.unwrap_err();
    assert!(error.is_eof());
}

#[test]
fn test_statement_semantic_checks() {
    let source = "void f() { return 1; } int g() { int v[2]; int v; if (v) return; while (v) ; }";
    let (parser, result) = parse_source(source);
    assert!(result.is_ok());

    assert_eq!(
        semantic_errors(&parser),
        vec![
            SemanticError::ReturnType {
                expected: Type::Void,
                received: Type::Int
            },
            SemanticError::Redeclaration {
                name: String::from("v")
            },
            SemanticError::ConditionType {
                received: Type::IntArray
            },
            SemanticError::ReturnType {
                expected: Type::Int,
                received: Type::Void
            },
            SemanticError::ConditionType {
                received: Type::IntArray
            },
        ]
    );
}

#[test]
fn test_subscripted_scalar_as_assignment_target() {
    let (parser, result) = parse_source("int main() { int x; x[0] = 1; return 0; }");
    let program = result.unwrap();

    assert_eq!(
        semantic_errors(&parser),
        vec![SemanticError::NotAnArray {
            name: String::from("x")
        }]
    );
    assert_eq!(
        body_of(&program, "main"),
        "(block (decl int x) (= @@variable 1) (return 0))"
    );
}

#[test]
fn test_program_collects_strings_and_printf() {
    let source = "int main() { printf(\"a\"); printf(\"b\"); printf(\"a\"); return 0; }";
    let (parser, result) = parse_source(source);
    let program = result.unwrap();

    assert!(parser.diagnostics().is_empty());
    assert!(program.needs_printf);
    assert_eq!(program.strings.len(), 2);
}
