use std::{collections::HashMap, rc::Rc};

use crate::ast::types::Type;

/// Reserved name of the placeholder variable substituted after a misuse error.
pub const DUMMY_VARIABLE: &str = "@@variable";
/// The one built-in function, special-cased during call checking.
pub const PRINTF: &str = "printf";

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: Type,
    pub params: Vec<Type>,
    /// Accepts arguments beyond `params`
    pub variadic: bool,
}

impl FunctionSignature {
    pub fn new(return_type: Type, params: Vec<Type>) -> Self {
        FunctionSignature {
            return_type,
            params,
            variadic: false,
        }
    }

    pub fn num_args(&self) -> usize {
        self.params.len()
    }

    /// Declared type of the parameter at `index` (0-based).
    pub fn arg_type(&self, index: usize) -> Option<Type> {
        self.params.get(index).copied()
    }

    /// Whether an argument of type `ty` fits the parameter at `index`.
    ///
    /// A `char` fits an `int` parameter; an `Error` argument fits anything
    /// so that a broken argument is only reported once.
    pub fn check_arg_type(&self, index: usize, ty: Type) -> bool {
        match self.arg_type(index) {
            Some(expected) => {
                ty.is_error() || expected == ty || (expected == Type::Int && ty == Type::Char)
            }
            None => self.variadic,
        }
    }
}

/// Identifier descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable { name: String, ty: Type },
    Function { name: String, signature: FunctionSignature },
    /// Stand-in for a name that already produced an error. Checks against a
    /// dummy are skipped so the error does not cascade.
    Dummy { name: String },
}

impl Symbol {
    pub fn variable(name: &str, ty: Type) -> Self {
        Symbol::Variable {
            name: String::from(name),
            ty,
        }
    }

    pub fn function(name: &str, signature: FunctionSignature) -> Self {
        Symbol::Function {
            name: String::from(name),
            signature,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable { name, .. } | Symbol::Function { name, .. } | Symbol::Dummy { name } => name,
        }
    }

    pub fn get_type(&self) -> Type {
        match self {
            Symbol::Variable { ty, .. } => *ty,
            Symbol::Function { .. } => Type::Function,
            Symbol::Dummy { .. } => Type::Error,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, Symbol::Dummy { .. })
    }

    pub fn signature(&self) -> Option<&FunctionSignature> {
        match self {
            Symbol::Function { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, Rc<Symbol>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.symbols.get(name)
    }
}

/// Stack of lexical scopes; index 0 is the global scope.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Creates a table whose global scope holds the reserved dummy variable
    /// and the `printf` built-in.
    pub fn new() -> Self {
        let mut global = Scope::new();

        let dummy = Symbol::Dummy {
            name: String::from(DUMMY_VARIABLE),
        };
        global.symbols.insert(String::from(DUMMY_VARIABLE), Rc::new(dummy));

        let printf = Symbol::function(
            PRINTF,
            FunctionSignature {
                return_type: Type::Int,
                params: vec![Type::CharArray],
                variadic: true,
            },
        );
        global.symbols.insert(String::from(PRINTF), Rc::new(printf));

        SymbolTable {
            scopes: vec![global],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn exit_scope(&mut self) {
        // The global scope lives as long as the table
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `symbol` in the innermost scope.
    ///
    /// Returns `Err` with the existing symbol when the name is already
    /// declared in that same scope. A `Dummy` left by an earlier undeclared
    /// use is replaced.
    pub fn declare(&mut self, symbol: Symbol) -> Result<Rc<Symbol>, Rc<Symbol>> {
        let scope = self.current_scope_mut();

        if let Some(existing) = scope.symbols.get(symbol.name()) {
            if !existing.is_dummy() {
                return Err(Rc::clone(existing));
            }
        }

        let symbol = Rc::new(symbol);
        scope.symbols.insert(symbol.name().to_string(), Rc::clone(&symbol));
        Ok(symbol)
    }

    /// Declares `symbol` in the global scope, whatever the current depth.
    pub fn declare_global(&mut self, symbol: Symbol) -> Result<Rc<Symbol>, Rc<Symbol>> {
        let global = &mut self.scopes[0];

        if let Some(existing) = global.symbols.get(symbol.name()) {
            return Err(Rc::clone(existing));
        }

        let symbol = Rc::new(symbol);
        global.symbols.insert(symbol.name().to_string(), Rc::clone(&symbol));
        Ok(symbol)
    }

    /// Innermost symbol with this name.
    pub fn lookup(&self, name: &str) -> Option<Rc<Symbol>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(Rc::clone)
    }

    /// Resolves `name`, never coming back empty-handed.
    ///
    /// An unknown name yields `Err` holding a fresh `Dummy` that is also
    /// recorded in the current scope, so later uses resolve to it silently.
    pub fn resolve(&mut self, name: &str) -> Result<Rc<Symbol>, Rc<Symbol>> {
        if let Some(symbol) = self.lookup(name) {
            return Ok(symbol);
        }

        let dummy = Rc::new(Symbol::Dummy {
            name: String::from(name),
        });
        self.current_scope_mut()
            .symbols
            .insert(String::from(name), Rc::clone(&dummy));
        Err(dummy)
    }

    /// The reserved placeholder variable.
    pub fn dummy_variable(&self) -> Rc<Symbol> {
        match self.scopes[0].get(DUMMY_VARIABLE) {
            Some(dummy) => Rc::clone(dummy),
            None => Rc::new(Symbol::Dummy {
                name: String::from(DUMMY_VARIABLE),
            }),
        }
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
