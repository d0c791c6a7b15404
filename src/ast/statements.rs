use std::{any::Any, rc::Rc};

use crate::{symbols::{strings::StringTable, symbols::Symbol}, Span};

use super::{
    ast::{Expr, ExprWrapper, Stmt, StmtType, StmtWrapper},
    expressions::ArraySub,
};

/// Declaration Statement
/// `int x;`, `char buf[16];`, `int y = expr;`
#[derive(Debug)]
pub struct DeclStmt {
    pub symbol: Rc<Symbol>,
    /// Element count for arrays with an explicit size
    pub size: Option<usize>,
    pub initializer: Option<ExprWrapper>,
    pub span: Span,
}

impl Stmt for DeclStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Decl
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        let mut out = format!("(decl {} {}", self.symbol.get_type(), self.symbol.name());
        if let Some(size) = self.size {
            out.push_str(&format!(" {}", size));
        }
        if let Some(initializer) = &self.initializer {
            out.push(' ');
            out.push_str(&initializer.sexpr());
        }
        out.push(')');
        out
    }
}

/// Assignment Statement
/// `id = expr;`
#[derive(Debug)]
pub struct AssignStmt {
    pub target: Rc<Symbol>,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Stmt for AssignStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Assign
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("(= {} {})", self.target.name(), self.value.sexpr())
    }
}

/// Array Assignment Statement
/// `id [ expr ] = expr;`
#[derive(Debug)]
pub struct ArrayAssignStmt {
    pub target: ArraySub,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Stmt for ArrayAssignStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ArrayAssign
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("(= {} {})", self.target.sexpr(), self.value.sexpr())
    }
}

/// Expression Statement
/// An expression evaluated for its side effects.
#[derive(Debug)]
pub struct ExpressionStmt {
    pub expression: ExprWrapper,
    pub span: Span,
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Expression
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        self.expression.sexpr()
    }
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub value: Option<ExprWrapper>,
    pub span: Span,
}

impl Stmt for ReturnStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Return
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        match &self.value {
            Some(value) => format!("(return {})", value.sexpr()),
            None => String::from("(return)"),
        }
    }
}

#[derive(Debug)]
pub struct IfStmt {
    pub condition: ExprWrapper,
    pub then_body: StmtWrapper,
    pub else_body: Option<StmtWrapper>,
    pub span: Span,
}

impl Stmt for IfStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::If
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        match &self.else_body {
            Some(else_body) => format!(
                "(if {} {} {})",
                self.condition.sexpr(),
                self.then_body.sexpr(),
                else_body.sexpr()
            ),
            None => format!("(if {} {})", self.condition.sexpr(), self.then_body.sexpr()),
        }
    }
}

#[derive(Debug)]
pub struct WhileStmt {
    pub condition: ExprWrapper,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for WhileStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::While
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("(while {} {})", self.condition.sexpr(), self.body.sexpr())
    }
}

/// Compound Statement
/// A braced block; opens its own scope.
#[derive(Debug)]
pub struct CompoundStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl Stmt for CompoundStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Compound
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        let mut out = String::from("(block");
        for stmt in &self.body {
            out.push(' ');
            out.push_str(&stmt.sexpr());
        }
        out.push(')');
        out
    }
}

/// Null Statement
/// A lone `;`, also substituted for a statement that failed to parse.
#[derive(Debug)]
pub struct NullStmt {
    pub span: Span,
}

impl Stmt for NullStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Null
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        String::from("(null)")
    }
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub symbol: Rc<Symbol>,
    pub params: Vec<Rc<Symbol>>,
    pub body: CompoundStmt,
    pub span: Span,
}

impl FunctionDecl {
    pub fn sexpr(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| format!("{} {}", param.get_type(), param.name()))
            .collect::<Vec<_>>()
            .join(", ");

        format!("(fn {} ({}) {})", self.symbol.name(), params, self.body.sexpr())
    }
}

/// A fully parsed translation unit.
#[derive(Debug)]
pub struct Program {
    pub globals: Vec<DeclStmt>,
    pub functions: Vec<FunctionDecl>,
    pub strings: StringTable,
    /// Set when `printf` is referenced, so the runtime support gets linked
    pub needs_printf: bool,
    pub span: Span,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|function| function.symbol.name() == name)
    }
}
