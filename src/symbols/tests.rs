//! Unit tests for the symbol and string tables.

use crate::ast::types::Type;

use super::{
    strings::StringTable,
    symbols::{FunctionSignature, Symbol, SymbolTable, DUMMY_VARIABLE, PRINTF},
};

#[test]
fn test_builtins_are_preseeded() {
    let table = SymbolTable::new();

    let printf = table.lookup(PRINTF).unwrap();
    assert_eq!(printf.get_type(), Type::Function);
    assert!(printf.signature().unwrap().variadic);

    let dummy = table.dummy_variable();
    assert!(dummy.is_dummy());
    assert_eq!(dummy.name(), DUMMY_VARIABLE);
    assert_eq!(dummy.get_type(), Type::Error);
}

#[test]
fn test_declare_and_lookup_through_scopes() {
    let mut table = SymbolTable::new();
    table.declare(Symbol::variable("x", Type::Int)).unwrap();

    table.enter_scope();
    table.declare(Symbol::variable("x", Type::Char)).unwrap();
    assert_eq!(table.lookup("x").unwrap().get_type(), Type::Char);

    table.exit_scope();
    assert_eq!(table.lookup("x").unwrap().get_type(), Type::Int);
}

#[test]
fn test_redeclaration_in_same_scope() {
    let mut table = SymbolTable::new();
    table.declare(Symbol::variable("x", Type::Int)).unwrap();

    let existing = table.declare(Symbol::variable("x", Type::Char)).unwrap_err();
    assert_eq!(existing.get_type(), Type::Int);
}

#[test]
fn test_global_scope_survives_exit() {
    let mut table = SymbolTable::new();
    table.exit_scope();
    table.exit_scope();

    assert_eq!(table.depth(), 1);
    assert!(table.lookup(PRINTF).is_some());
}

#[test]
fn test_declare_global_from_nested_scope() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table
        .declare_global(Symbol::function("f", FunctionSignature::new(Type::Void, vec![])))
        .unwrap();
    table.exit_scope();

    assert_eq!(table.lookup("f").unwrap().get_type(), Type::Function);
}

#[test]
fn test_resolve_unknown_name_yields_dummy_once() {
    let mut table = SymbolTable::new();

    let first = table.resolve("missing").unwrap_err();
    assert!(first.is_dummy());
    assert_eq!(first.name(), "missing");

    // The dummy is now known, so the second resolution is silent
    let second = table.resolve("missing").unwrap();
    assert!(second.is_dummy());
}

#[test]
fn test_signature_argument_checks() {
    let signature = FunctionSignature::new(Type::Int, vec![Type::Int, Type::Char]);

    assert_eq!(signature.num_args(), 2);
    assert!(signature.check_arg_type(0, Type::Int));
    assert!(signature.check_arg_type(0, Type::Char));
    assert!(!signature.check_arg_type(1, Type::Int));
    assert!(!signature.check_arg_type(0, Type::IntArray));
    assert!(signature.check_arg_type(1, Type::Error));
    assert!(!signature.check_arg_type(2, Type::Int));
    assert_eq!(signature.arg_type(1), Some(Type::Char));
    assert_eq!(signature.arg_type(2), None);
}

#[test]
fn test_string_table_interns() {
    let mut strings = StringTable::new();
    assert!(strings.is_empty());

    let hello = strings.intern("hello");
    let world = strings.intern("world");
    assert_eq!(strings.intern("hello"), hello);
    assert_ne!(hello, world);

    assert_eq!(strings.len(), 2);
    assert_eq!(strings.get(world), Some("world"));
    assert_eq!(strings.iter().collect::<Vec<_>>(), vec![(0, "hello"), (1, "world")]);
}

#[test]
fn test_declaration_replaces_dummy() {
    let mut table = SymbolTable::new();
    table.resolve("late").unwrap_err();

    let declared = table.declare(Symbol::variable("late", Type::Int)).unwrap();
    assert!(!declared.is_dummy());
    assert_eq!(table.lookup("late").unwrap().get_type(), Type::Int);
}
