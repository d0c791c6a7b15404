//! Parser state and token-stream cursor.
//!
//! The `Parser` owns the token stream and everything a single parse
//! accumulates: the symbol table, the string-literal table, the diagnostics
//! sink and the `printf` usage flag. Grammar rules live in `expr`, `factor`
//! and `stmt` and drive the parser through the cursor methods here.

use std::rc::Rc;

use log::{debug, trace};

use crate::{
    ast::{
        rules::{StandardRules, TypeRules},
        statements::Program,
        types::Type,
    },
    errors::{
        diagnostics::{Diagnostics, SemanticError},
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    symbols::{
        strings::StringTable,
        symbols::{Symbol, SymbolTable},
    },
    Position,
};

use super::stmt::parse_program;

#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Run the array/function/argument checks and record semantic errors
    pub check_semantics: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            check_semantics: true,
        }
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    options: ParserOptions,
    /// Type-compatibility policy used when finalizing operator nodes
    rules: Box<dyn TypeRules>,
    symbols: SymbolTable,
    strings: StringTable,
    diagnostics: Diagnostics,
    needs_printf: bool,
    /// Return type of the function whose body is being parsed
    return_type: Option<Type>,
}

impl Parser {
    /// Creates a parser with default options and `StandardRules`.
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser::with_options(tokens, file, ParserOptions::default(), Box::new(StandardRules))
    }

    pub fn with_options(
        mut tokens: Vec<Token>,
        file: Rc<String>,
        options: ParserOptions,
        rules: Box<dyn TypeRules>,
    ) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position {
                    file: Rc::clone(&file),
                    ..Position::null()
                });
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: crate::Span { start: end.clone(), end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            options,
            rules,
            symbols: SymbolTable::new(),
            strings: StringTable::new(),
            diagnostics: Diagnostics::new(),
            needs_printf: false,
            return_type: None,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None if expected_kind == TokenKind::Semicolon => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.to_string(),
                    },
                    token.span.start.clone(),
                )),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.to_string(),
                        message: format!("expected `{}`", expected_kind),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it is of the given kind.
    pub fn peek_and_consume(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips tokens until one of the given kind (left unconsumed) or `EOF`.
    pub fn consume_until(&mut self, kind: TokenKind) {
        while self.current_token_kind() != kind && self.current_token_kind() != TokenKind::EOF {
            self.advance();
        }
    }

    /// Skips to the next `kind` token after an error.
    ///
    /// Running off the end of the input is unrecoverable.
    pub fn resync(&mut self, kind: TokenKind) -> Result<(), Error> {
        trace!("resynchronizing to `{}` from {}", kind, self.get_position());
        self.consume_until(kind);

        if self.current_token_kind() == TokenKind::EOF && kind != TokenKind::EOF {
            return Err(Error::new(ErrorImpl::UnexpectedEof, self.get_position()));
        }

        Ok(())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn rules(&self) -> &dyn TypeRules {
        self.rules.as_ref()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut StringTable {
        &mut self.strings
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn needs_printf(&self) -> bool {
        self.needs_printf
    }

    pub fn mark_printf(&mut self) {
        self.needs_printf = true;
    }

    pub fn return_type(&self) -> Option<Type> {
        self.return_type
    }

    pub fn set_return_type(&mut self, return_type: Option<Type>) {
        self.return_type = return_type;
    }

    /// Records a semantic error; parsing carries on.
    pub fn report_semantic(&mut self, error: SemanticError, position: Position) {
        if self.options.check_semantics {
            self.diagnostics.semantic(error, position);
        }
    }

    /// Records a fatal error that the caller has recovered from.
    pub fn report_error(&mut self, error: Error) {
        self.diagnostics.syntax(error);
    }

    /// Resolves a variable name, reporting it the first time it is unknown.
    pub fn get_variable(&mut self, name: &str, position: Position) -> Rc<Symbol> {
        match self.symbols.resolve(name) {
            Ok(symbol) => symbol,
            Err(dummy) => {
                self.report_semantic(
                    SemanticError::UndeclaredIdentifier {
                        name: String::from(name),
                    },
                    position,
                );
                dummy
            }
        }
    }

    /// Moves the string table out into a finished `Program`.
    pub(crate) fn take_strings(&mut self) -> StringTable {
        std::mem::take(&mut self.strings)
    }
}

/// Parses a stream of tokens into a `Program`.
///
/// This is the main entry point. It returns the parser alongside the result
/// so the caller can inspect the diagnostics gathered on the way; a fatal
/// error that could not be recovered from is returned as `Err`.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Program, Error>) {
    parse_with_options(tokens, file, ParserOptions::default())
}

pub fn parse_with_options(
    tokens: Vec<Token>,
    file: Rc<String>,
    options: ParserOptions,
) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::with_options(tokens, file, options, Box::new(StandardRules));

    debug!("parsing {} ({} tokens)", parser.file(), parser.tokens.len());
    let program = parse_program(&mut parser);
    debug!(
        "finished parsing {}: {} diagnostics",
        parser.file(),
        parser.diagnostics().len()
    );

    (parser, program)
}
