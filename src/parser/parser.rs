//! Recursive descent parser for declaration sources
//!
//! Builds the typed AST from tokens. Newlines are handled the way Go does
//! it: a semicolon is inserted after a line's final token when that token
//! can end a statement. Errors are collected rather than aborting, and the
//! parser always makes progress.

use super::ast::*;
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Parse result containing the AST and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub file: SourceFile,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse a declaration source file
pub fn parse(input: &str) -> Parse {
    let tokens = significant_tokens(input);
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    let file = parser.parse_source_file();
    Parse {
        file,
        errors: parser.errors,
    }
}

/// Drop trivia and insert the semicolons implied by line breaks.
fn significant_tokens(input: &str) -> Vec<Token<'_>> {
    let mut out: Vec<Token<'_>> = Vec::new();
    let mut pending_newline: Option<TextSize> = None;

    for token in Lexer::new(input) {
        if token.kind.is_trivia() {
            if pending_newline.is_none() {
                if let Some(pos) = token.text.find('\n') {
                    pending_newline = Some(token.offset + TextSize::new(pos as u32));
                }
            }
            continue;
        }
        if let Some(offset) = pending_newline.take() {
            if out.last().is_some_and(|last| ends_statement(last.kind)) {
                out.push(Token {
                    kind: SyntaxKind::SEMICOLON,
                    text: "",
                    offset,
                });
            }
        }
        out.push(token);
    }
    out
}

fn ends_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IDENT
            | SyntaxKind::INT
            | SyntaxKind::FLOAT
            | SyntaxKind::STRING
            | SyntaxKind::RAW_STRING
            | SyntaxKind::RUNE
            | SyntaxKind::R_PAREN
            | SyntaxKind::R_BRACKET
            | SyntaxKind::R_BRACE
    )
}

/// The parser state
struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    end: TextSize,
    errors: Vec<SyntaxError>,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], end: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            errors: Vec::new(),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::EOF)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(Token::range)
            .unwrap_or_else(|| TextRange::empty(self.end))
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}, found {:?}", kind, self.current_kind()));
            false
        }
    }

    fn expect_ident(&mut self) -> Option<Ident> {
        if self.at(SyntaxKind::IDENT) {
            let ident = Ident::new(self.current_text(), self.current_range());
            self.bump();
            Some(ident)
        } else {
            self.error(format!("expected identifier, found {:?}", self.current_kind()));
            None
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and skip to the next statement boundary.
    fn error_recover(&mut self, message: impl Into<String>) {
        self.error(message);
        let start = self.pos;
        while !self.at_eof()
            && !self.at(SyntaxKind::SEMICOLON)
            && !self.current_kind().is_top_level_keyword()
        {
            self.bump();
        }
        if self.pos == start {
            self.bump();
        }
    }

    /// Skip a bracketed group starting at the current opening token.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.error("unterminated bracket");
    }

    // =========================================================================
    // Grammar rules: file level
    // =========================================================================

    /// SourceFile = PackageClause? TopLevelDecl*
    fn parse_source_file(&mut self) -> SourceFile {
        let mut file = SourceFile::default();

        while self.eat(SyntaxKind::SEMICOLON) {}
        if self.eat(SyntaxKind::PACKAGE_KW) {
            file.package = self.expect_ident().map(|i| i.text);
        }

        while !self.at_eof() {
            let pos_before = self.pos;
            match self.current_kind() {
                SyntaxKind::SEMICOLON => self.bump(),
                SyntaxKind::IMPORT_KW => self.parse_import_decl(&mut file.imports),
                SyntaxKind::VAR_KW => self.parse_value_decl(BindingKind::Var, &mut file.bindings),
                SyntaxKind::CONST_KW => {
                    self.parse_value_decl(BindingKind::Const, &mut file.bindings)
                }
                SyntaxKind::TYPE_KW | SyntaxKind::FUNC_KW => self.skip_declaration(),
                kind => self.error_recover(format!("expected declaration, found {:?}", kind)),
            }
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }

        file
    }

    /// ImportDecl = "import" ( ImportSpec | "(" ImportSpec* ")" )
    fn parse_import_decl(&mut self, imports: &mut Vec<Import>) {
        self.bump();
        if self.eat(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                if self.eat(SyntaxKind::SEMICOLON) {
                    continue;
                }
                match self.parse_import_spec() {
                    Some(import) => imports.push(import),
                    None => self.error_recover("invalid import"),
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        } else if let Some(import) = self.parse_import_spec() {
            imports.push(import);
        } else {
            self.error_recover("invalid import");
        }
    }

    /// ImportSpec = ( "." | "_" | Ident )? String
    fn parse_import_spec(&mut self) -> Option<Import> {
        let start = self.current_range().start();
        let alias = match self.current_kind() {
            SyntaxKind::DOT => {
                self.bump();
                Some(SmolStr::new("."))
            }
            SyntaxKind::IDENT => {
                let text = SmolStr::new(self.current_text());
                self.bump();
                Some(text)
            }
            _ => None,
        };
        let path = match self.current_kind() {
            SyntaxKind::STRING => unquote(self.current_text())?,
            SyntaxKind::RAW_STRING => unquote_raw(self.current_text()),
            _ => return None,
        };
        let end = self.current_range().end();
        self.bump();
        Some(Import {
            alias,
            path,
            range: TextRange::new(start, end),
        })
    }

    /// VarDecl / ConstDecl = kw ( ValueSpec | "(" ValueSpec* ")" )
    fn parse_value_decl(&mut self, kind: BindingKind, bindings: &mut Vec<Binding>) {
        self.bump();
        if self.eat(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                if self.eat(SyntaxKind::SEMICOLON) {
                    continue;
                }
                let pos_before = self.pos;
                self.parse_value_spec(kind, bindings);
                if self.pos == pos_before {
                    self.error_recover("expected value specification");
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        } else {
            self.parse_value_spec(kind, bindings);
        }
    }

    /// ValueSpec = IdentList Type? ( "=" ExprList )?
    fn parse_value_spec(&mut self, kind: BindingKind, bindings: &mut Vec<Binding>) {
        let mut names = Vec::new();
        match self.expect_ident() {
            Some(name) => names.push(name),
            None => return,
        }
        while self.eat(SyntaxKind::COMMA) {
            match self.expect_ident() {
                Some(name) => names.push(name),
                None => return,
            }
        }

        let ty = if self.at_any(&[
            SyntaxKind::EQ,
            SyntaxKind::SEMICOLON,
            SyntaxKind::R_PAREN,
            SyntaxKind::EOF,
        ]) {
            None
        } else {
            self.parse_type()
        };

        let mut values = Vec::new();
        if self.eat(SyntaxKind::EQ) {
            values.push(self.parse_expr());
            while self.eat(SyntaxKind::COMMA) {
                values.push(self.parse_expr());
            }
        }

        // `var a, b = f()` binds a multi-value call: no per-name initializer
        let paired = values.len() == names.len();
        let mut values = values.into_iter();
        for name in names {
            bindings.push(Binding {
                kind,
                name,
                ty: ty.clone(),
                value: if paired { values.next().flatten() } else { None },
            });
        }
    }

    /// `type` and `func` declarations: skip up to the next top-level keyword.
    fn skip_declaration(&mut self) {
        self.bump();
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current_kind();
            if depth == 0 && kind.is_top_level_keyword() {
                break;
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    if depth == 0 {
                        self.error("unbalanced closing bracket");
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.bump();
        }
    }

    // =========================================================================
    // Grammar rules: expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_binary(1)
    }

    /// Precedence climbing over Go's five binary levels
    fn parse_binary(&mut self, min_prec: u8) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some(prec) = self.current_kind().binary_precedence() {
            if prec < min_prec {
                break;
            }
            let op = binary_op(self.current_kind())?;
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current_kind() {
            SyntaxKind::PLUS => UnaryOp::Plus,
            SyntaxKind::MINUS => UnaryOp::Neg,
            SyntaxKind::BANG => UnaryOp::Not,
            SyntaxKind::CARET => UnaryOp::BitNot,
            SyntaxKind::STAR => UnaryOp::Deref,
            SyntaxKind::AMP => UnaryOp::Addr,
            SyntaxKind::ARROW => UnaryOp::Recv,
            _ => return self.parse_postfix(),
        };
        self.bump();
        let operand = self.parse_unary()?;
        Some(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.current_kind() {
                SyntaxKind::DOT => {
                    self.bump();
                    if self.at(SyntaxKind::L_PAREN) {
                        // type assertion `x.(T)`: the asserted type is irrelevant
                        self.skip_balanced();
                        continue;
                    }
                    let field = self.expect_ident()?;
                    expr = Expr::Selector {
                        base: Box::new(expr),
                        field,
                    };
                }
                SyntaxKind::L_PAREN => {
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                SyntaxKind::L_BRACKET => expr = self.parse_index_or_slice(expr)?,
                SyntaxKind::L_BRACE => match literal_type(&expr) {
                    Some(ty) => expr = Expr::Composite(self.parse_composite_body(Some(ty))?),
                    None => break,
                },
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_operand(&mut self) -> Option<Expr> {
        let range = self.current_range();
        let text = self.current_text();
        let expr = match self.current_kind() {
            SyntaxKind::IDENT => {
                self.bump();
                Expr::Ident(Ident::new(text, range))
            }
            SyntaxKind::INT => {
                self.bump();
                Expr::Literal(Literal::Int(SmolStr::new(text)))
            }
            SyntaxKind::FLOAT => {
                self.bump();
                Expr::Literal(Literal::Float(SmolStr::new(text)))
            }
            SyntaxKind::RUNE => {
                self.bump();
                Expr::Literal(Literal::Rune(SmolStr::new(text)))
            }
            SyntaxKind::STRING => {
                let Some(value) = unquote(text) else {
                    self.error("invalid escape in string literal");
                    self.bump();
                    return None;
                };
                self.bump();
                Expr::Literal(Literal::String(value))
            }
            SyntaxKind::RAW_STRING => {
                self.bump();
                Expr::Literal(Literal::String(unquote_raw(text)))
            }
            SyntaxKind::L_PAREN => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(SyntaxKind::R_PAREN);
                Expr::Paren(Box::new(inner))
            }
            SyntaxKind::FUNC_KW => return self.parse_func_lit(),
            SyntaxKind::L_BRACKET
            | SyntaxKind::MAP_KW
            | SyntaxKind::CHAN_KW
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::INTERFACE_KW => {
                let ty = self.parse_type()?;
                if self.at(SyntaxKind::L_BRACE) {
                    Expr::Composite(self.parse_composite_body(Some(ty))?)
                } else {
                    Expr::Type(ty)
                }
            }
            kind => {
                self.error(format!("expected expression, found {:?}", kind));
                return None;
            }
        };
        Some(expr)
    }

    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        self.expect(SyntaxKind::L_PAREN);
        let mut args = Vec::new();
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            args.push(self.parse_expr()?);
            self.eat(SyntaxKind::ELLIPSIS);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN).then_some(args)
    }

    fn parse_index_or_slice(&mut self, base: Expr) -> Option<Expr> {
        self.expect(SyntaxKind::L_BRACKET);
        let low = if self.at(SyntaxKind::COLON) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        if !self.at(SyntaxKind::COLON) {
            self.expect(SyntaxKind::R_BRACKET);
            let Some(index) = low else {
                self.error("empty index");
                return None;
            };
            return Some(Expr::Index {
                base: Box::new(base),
                index,
            });
        }

        let mut bounds = [None, None];
        for bound in bounds.iter_mut() {
            if !self.eat(SyntaxKind::COLON) {
                break;
            }
            if !self.at_any(&[SyntaxKind::COLON, SyntaxKind::R_BRACKET]) {
                *bound = Some(Box::new(self.parse_expr()?));
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        let [high, max] = bounds;
        Some(Expr::Slice {
            base: Box::new(base),
            low,
            high,
            max,
        })
    }

    /// FuncLit = "func" Signature Block; the body is skipped
    fn parse_func_lit(&mut self) -> Option<Expr> {
        self.bump();
        if self.at(SyntaxKind::L_PAREN) {
            self.skip_balanced();
        }
        while !self.at_eof() && !self.at(SyntaxKind::L_BRACE) {
            if self.at(SyntaxKind::L_PAREN) {
                self.skip_balanced();
            } else if self.at_any(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON]) {
                // a func type, not a literal
                return Some(Expr::Type(TypeExpr::Opaque));
            } else {
                self.bump();
            }
        }
        self.skip_balanced();
        Some(Expr::FuncLit)
    }

    /// CompositeBody = "{" ( Element ( "," Element )* ","? )? "}"
    fn parse_composite_body(&mut self, ty: Option<TypeExpr>) -> Option<CompositeLit> {
        let start = self.current_range().start();
        self.expect(SyntaxKind::L_BRACE);
        let mut elements = Vec::new();

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let first = self.parse_element_value()?;
            let element = if self.eat(SyntaxKind::COLON) {
                let key = match first {
                    Expr::Ident(ident) => ElementKey::Field(ident.text),
                    Expr::Literal(Literal::String(s)) => ElementKey::Field(SmolStr::new(s)),
                    other => ElementKey::Expr(other),
                };
                Element {
                    key: Some(key),
                    value: self.parse_element_value()?,
                }
            } else {
                Element {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }

        let end = self.current_range().end();
        if !self.expect(SyntaxKind::R_BRACE) {
            return None;
        }
        Some(CompositeLit {
            ty,
            elements,
            range: TextRange::new(start, end),
        })
    }

    /// Element values may be elided-type literals: `{...}`
    fn parse_element_value(&mut self) -> Option<Expr> {
        if self.at(SyntaxKind::L_BRACE) {
            Some(Expr::Composite(self.parse_composite_body(None)?))
        } else {
            self.parse_expr()
        }
    }

    // =========================================================================
    // Grammar rules: types
    // =========================================================================

    fn parse_type(&mut self) -> Option<TypeExpr> {
        match self.current_kind() {
            SyntaxKind::IDENT => {
                let first = SmolStr::new(self.current_text());
                self.bump();
                if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                    self.bump();
                    let name = SmolStr::new(self.current_text());
                    self.bump();
                    Some(TypeExpr::Named {
                        namespace: Some(first),
                        name,
                    })
                } else {
                    Some(TypeExpr::Named {
                        namespace: None,
                        name: first,
                    })
                }
            }
            SyntaxKind::STAR => {
                self.bump();
                Some(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            SyntaxKind::L_BRACKET => {
                self.bump();
                if self.eat(SyntaxKind::R_BRACKET) {
                    return Some(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                if !self.eat(SyntaxKind::ELLIPSIS) {
                    self.parse_expr()?;
                }
                self.expect(SyntaxKind::R_BRACKET);
                Some(TypeExpr::Array(Box::new(self.parse_type()?)))
            }
            SyntaxKind::MAP_KW => {
                self.bump();
                self.expect(SyntaxKind::L_BRACKET);
                let key = self.parse_type()?;
                self.expect(SyntaxKind::R_BRACKET);
                let value = self.parse_type()?;
                Some(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            SyntaxKind::CHAN_KW => {
                self.bump();
                self.eat(SyntaxKind::ARROW);
                self.parse_type()?;
                Some(TypeExpr::Opaque)
            }
            SyntaxKind::ARROW => {
                self.bump();
                self.expect(SyntaxKind::CHAN_KW);
                self.parse_type()?;
                Some(TypeExpr::Opaque)
            }
            SyntaxKind::STRUCT_KW | SyntaxKind::INTERFACE_KW => {
                self.bump();
                if self.at(SyntaxKind::L_BRACE) {
                    self.skip_balanced();
                } else {
                    self.error("expected '{'");
                }
                Some(TypeExpr::Opaque)
            }
            SyntaxKind::FUNC_KW => {
                self.bump();
                if self.at(SyntaxKind::L_PAREN) {
                    self.skip_balanced();
                }
                if self.at(SyntaxKind::L_PAREN) {
                    self.skip_balanced();
                } else if self.at_any(&[
                    SyntaxKind::IDENT,
                    SyntaxKind::STAR,
                    SyntaxKind::L_BRACKET,
                    SyntaxKind::MAP_KW,
                ]) {
                    self.parse_type()?;
                }
                Some(TypeExpr::Opaque)
            }
            SyntaxKind::L_PAREN => {
                self.bump();
                let ty = self.parse_type()?;
                self.expect(SyntaxKind::R_PAREN);
                Some(ty)
            }
            kind => {
                self.error(format!("expected type, found {:?}", kind));
                None
            }
        }
    }
}

/// The literal type an operand denotes when followed by `{`.
fn literal_type(expr: &Expr) -> Option<TypeExpr> {
    match expr {
        Expr::Ident(ident) => Some(TypeExpr::Named {
            namespace: None,
            name: ident.text.clone(),
        }),
        Expr::Selector { base, field } => match base.as_ref() {
            Expr::Ident(ns) => Some(TypeExpr::Named {
                namespace: Some(ns.text.clone()),
                name: field.text.clone(),
            }),
            _ => None,
        },
        Expr::Type(ty) => Some(ty.clone()),
        _ => None,
    }
}

fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    use SyntaxKind::*;
    Some(match kind {
        STAR => BinaryOp::Mul,
        SLASH => BinaryOp::Div,
        PERCENT => BinaryOp::Rem,
        SHL => BinaryOp::Shl,
        SHR => BinaryOp::Shr,
        AMP => BinaryOp::BitAnd,
        AMP_CARET => BinaryOp::AndNot,
        PLUS => BinaryOp::Add,
        MINUS => BinaryOp::Sub,
        PIPE => BinaryOp::BitOr,
        CARET => BinaryOp::BitXor,
        EQ_EQ => BinaryOp::Eq,
        BANG_EQ => BinaryOp::Ne,
        LT => BinaryOp::Lt,
        LT_EQ => BinaryOp::Le,
        GT => BinaryOp::Gt,
        GT_EQ => BinaryOp::Ge,
        AMP_AMP => BinaryOp::And,
        PIPE_PIPE => BinaryOp::Or,
        _ => return None,
    })
}

// ============================================================================
// STRING LITERALS
// ============================================================================

/// Decode an interpreted string literal, including its quotes.
///
/// `\x` and octal escapes denote bytes; the decoded bytes are read as UTF-8
/// with invalid sequences replaced. Returns `None` on a malformed escape.
pub fn unquote(literal: &str) -> Option<String> {
    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }
        let decoded = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => {
                out.push(u8::try_from(hex_value(&mut chars, 2)?).ok()?);
                continue;
            }
            'u' => char::from_u32(hex_value(&mut chars, 4)?)?,
            'U' => char::from_u32(hex_value(&mut chars, 8)?)?,
            d @ '0'..='7' => {
                let rest: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&format!("{d}{rest}"), 8).ok()?;
                out.push(byte);
                continue;
            }
            _ => return None,
        };
        push_char(&mut out, decoded);
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn hex_value(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

/// Raw strings keep their content verbatim, minus carriage returns.
pub fn unquote_raw(literal: &str) -> String {
    literal.trim_matches('`').replace('\r', "")
}
