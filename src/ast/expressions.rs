use std::{any::Any, rc::Rc};

use crate::{errors::errors::ErrorImpl, lexer::lexer::unescape, symbols::symbols::Symbol, Span};

use super::{
    ast::{Expr, ExprType, ExprWrapper},
    operators::{BinaryOperator, Step},
    rules::TypeRules,
    types::Type,
};

// LITERALS

/// Constant Expression
/// An integer or character constant.
#[derive(Debug, Clone)]
pub struct ConstantExpr {
    pub value: i32,
    pub ty: Type,
    pub span: Span,
}

impl ConstantExpr {
    /// Builds a constant from its source text: `42` or `'a'`.
    pub fn from_literal(text: &str, span: Span) -> Result<Self, ErrorImpl> {
        let parse_error = || ErrorImpl::NumberParseError {
            token: String::from(text),
        };

        if let Some(body) = text.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
            let ch = unescape(body).chars().next().ok_or_else(parse_error)?;

            return Ok(ConstantExpr {
                value: ch as i32,
                ty: Type::Char,
                span,
            });
        }

        let value = text.parse::<i32>().map_err(|_| parse_error())?;

        Ok(ConstantExpr {
            value,
            ty: Type::Int,
            span,
        })
    }
}

impl Expr for ConstantExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Constant
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ty
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        match self.ty {
            Type::Char => {
                let ch = char::from_u32(self.value as u32).unwrap_or('?');
                format!("'{}'", ch.escape_default())
            }
            _ => self.value.to_string(),
        }
    }
}

/// String Expression
/// A string literal; `id` is its slot in the string table.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub id: usize,
    pub span: Span,
}

impl Expr for StringExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::String
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        Type::CharArray
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("{:?}", self.value)
    }
}

// REFERENCES

/// Identifier Expression
/// A bare reference to a scalar or array variable.
#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub ident: Rc<Symbol>,
    pub span: Span,
}

impl IdentExpr {
    pub fn new(ident: Rc<Symbol>, span: Span) -> Self {
        IdentExpr { ident, span }
    }
}

impl Expr for IdentExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::Identifier
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ident.get_type()
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        self.ident.name().to_string()
    }
}

/// `id [ Expr ]`
///
/// Not an expression by itself: it is wrapped by `ArrayExpr` when read and
/// by `AddrOfArray` when its address is taken, and used directly as an
/// assignment target.
#[derive(Debug)]
pub struct ArraySub {
    ident: Rc<Symbol>,
    index: ExprWrapper,
    span: Span,
}

impl ArraySub {
    pub fn new(ident: Rc<Symbol>, index: ExprWrapper, span: Span) -> Self {
        ArraySub { ident, index, span }
    }

    pub fn ident(&self) -> &Rc<Symbol> {
        &self.ident
    }

    pub fn index(&self) -> &ExprWrapper {
        &self.index
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// Element type, `Error` when the identifier is not an array.
    pub fn get_type(&self) -> Type {
        self.ident.get_type().element().unwrap_or(Type::Error)
    }

    pub fn sexpr(&self) -> String {
        format!("(index {} {})", self.ident.name(), self.index.sexpr())
    }
}

/// Array Expression
/// Reads one element of an array.
#[derive(Debug)]
pub struct ArrayExpr {
    pub array: ArraySub,
}

impl ArrayExpr {
    pub fn new(array: ArraySub) -> Self {
        ArrayExpr { array }
    }
}

impl Expr for ArrayExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::ArraySubscript
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.array.get_type()
    }
    fn get_span(&self) -> &Span {
        self.array.get_span()
    }
    fn sexpr(&self) -> String {
        self.array.sexpr()
    }
}

/// Address-of Expression
/// `& id [ Expr ]`, evaluating to the array type itself.
#[derive(Debug)]
pub struct AddrOfArray {
    pub array: ArraySub,
    pub span: Span,
}

impl AddrOfArray {
    pub fn new(array: ArraySub, span: Span) -> Self {
        AddrOfArray { array, span }
    }
}

impl Expr for AddrOfArray {
    fn get_expr_type(&self) -> ExprType {
        ExprType::AddressOfArrayElement
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        let ty = self.array.ident().get_type();
        if ty.is_array() {
            ty
        } else {
            Type::Error
        }
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("(& {})", self.array.sexpr())
    }
}

/// Function Call Expression
#[derive(Debug)]
pub struct FuncExpr {
    ident: Rc<Symbol>,
    args: Vec<ExprWrapper>,
    span: Span,
}

impl FuncExpr {
    pub fn new(ident: Rc<Symbol>, span: Span) -> Self {
        FuncExpr {
            ident,
            args: vec![],
            span,
        }
    }

    pub fn add_arg(&mut self, arg: ExprWrapper) {
        self.args.push(arg);
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &[ExprWrapper] {
        &self.args
    }

    pub fn ident(&self) -> &Rc<Symbol> {
        &self.ident
    }

    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }
}

impl Expr for FuncExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::FunctionCall
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ident
            .signature()
            .map(|signature| signature.return_type)
            .unwrap_or(Type::Error)
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        let mut out = format!("(call {}", self.ident.name());
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.sexpr());
        }
        out.push(')');
        out
    }
}

// OPERATORS

/// Prefix increment / decrement of an identifier.
#[derive(Debug)]
pub struct StepExpr {
    step: Step,
    ident: Rc<Symbol>,
    ty: Type,
    span: Span,
}

impl StepExpr {
    pub fn new(step: Step, ident: Rc<Symbol>, span: Span) -> Self {
        StepExpr {
            step,
            ident,
            ty: Type::Void,
            span,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn ident(&self) -> &Rc<Symbol> {
        &self.ident
    }

    /// Resolves the node type. Returns false on an invalid operand.
    pub fn finalize_op(&mut self, rules: &dyn TypeRules) -> bool {
        let operand = self.ident.get_type();
        if operand.is_error() {
            self.ty = Type::Error;
            return true;
        }

        match rules.step(operand) {
            Some(ty) => {
                self.ty = ty;
                true
            }
            None => {
                self.ty = Type::Error;
                false
            }
        }
    }
}

impl Expr for StepExpr {
    fn get_expr_type(&self) -> ExprType {
        match self.step {
            Step::Increment => ExprType::Increment,
            Step::Decrement => ExprType::Decrement,
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ty
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("({} {})", self.step.symbol(), self.ident.name())
    }
}

/// Logical Not Expression
#[derive(Debug)]
pub struct NotExpr {
    operand: ExprWrapper,
    ty: Type,
    span: Span,
}

impl NotExpr {
    pub fn new(operand: ExprWrapper, span: Span) -> Self {
        NotExpr {
            operand,
            ty: Type::Void,
            span,
        }
    }

    pub fn operand(&self) -> &ExprWrapper {
        &self.operand
    }

    /// Resolves the node type. Returns false on an invalid operand.
    pub fn finalize_op(&mut self, rules: &dyn TypeRules) -> bool {
        let operand = self.operand.get_type();
        if operand.is_error() {
            self.ty = Type::Error;
            return true;
        }

        match rules.not(operand) {
            Some(ty) => {
                self.ty = ty;
                true
            }
            None => {
                self.ty = Type::Error;
                false
            }
        }
    }
}

impl Expr for NotExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::LogicalNot
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ty
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("(! {})", self.operand.sexpr())
    }
}

/// Binary Expression
/// Any of the logical, relational, additive and multiplicative operators.
/// The node kind follows from the operator.
///
/// Operands are fixed at construction; `finalize_op` resolves the type once
/// both are in place, after which the node is only read.
#[derive(Debug)]
pub struct BinaryExpr {
    operator: BinaryOperator,
    lhs: ExprWrapper,
    rhs: ExprWrapper,
    ty: Type,
    span: Span,
}

impl BinaryExpr {
    pub fn new(operator: BinaryOperator, lhs: ExprWrapper, rhs: ExprWrapper) -> Self {
        let span = lhs.get_span().to(rhs.get_span());

        BinaryExpr {
            operator,
            lhs,
            rhs,
            ty: Type::Void,
            span,
        }
    }

    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    pub fn lhs(&self) -> &ExprWrapper {
        &self.lhs
    }

    pub fn rhs(&self) -> &ExprWrapper {
        &self.rhs
    }

    /// Folds the operand types into the node type.
    ///
    /// Returns false when the operand types are invalid for the operator;
    /// the node then carries `Type::Error`. An operand that is already
    /// `Error` yields `Error` and counts as success.
    pub fn finalize_op(&mut self, rules: &dyn TypeRules) -> bool {
        let (lhs, rhs) = (self.lhs.get_type(), self.rhs.get_type());
        if lhs.is_error() || rhs.is_error() {
            self.ty = Type::Error;
            return true;
        }

        match rules.binary(self.operator, lhs, rhs) {
            Some(ty) => {
                self.ty = ty;
                true
            }
            None => {
                self.ty = Type::Error;
                false
            }
        }
    }
}

impl Expr for BinaryExpr {
    fn get_expr_type(&self) -> ExprType {
        self.operator.expr_type()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        self.ty
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
    fn sexpr(&self) -> String {
        format!("({} {} {})", self.operator, self.lhs.sexpr(), self.rhs.sexpr())
    }
}

// CONVERSIONS

/// Implicit `char` -> `int` widening.
#[derive(Debug)]
pub struct ToIntExpr {
    pub operand: ExprWrapper,
}

impl Expr for ToIntExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::ToInt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        Type::Int
    }
    fn get_span(&self) -> &Span {
        self.operand.get_span()
    }
    fn sexpr(&self) -> String {
        format!("(int {})", self.operand.sexpr())
    }
}

/// Implicit `int` -> `char` narrowing.
#[derive(Debug)]
pub struct ToCharExpr {
    pub operand: ExprWrapper,
}

impl Expr for ToCharExpr {
    fn get_expr_type(&self) -> ExprType {
        ExprType::ToChar
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_type(&self) -> Type {
        Type::Char
    }
    fn get_span(&self) -> &Span {
        self.operand.get_span()
    }
    fn sexpr(&self) -> String {
        format!("(char {})", self.operand.sexpr())
    }
}
