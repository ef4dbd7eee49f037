//! Token kinds for declaration sources
//!
//! The scanner only needs tokens (the AST is built directly by the
//! recursive-descent parser), so this enum covers trivia, literals,
//! punctuation, operators and the handful of keywords the grammar uses.

/// All token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,       // identifier
    INT,         // 42, 0x2A
    FLOAT,       // 3.14, 1e9
    STRING,      // "hello"
    RAW_STRING,  // `hello`
    RUNE,        // 'a'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COLON,       // :
    COMMA,       // ,
    DOT,         // .
    ELLIPSIS,    // ...
    EQ,          // =
    COLON_EQ,    // :=

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    PERCENT,     // %
    AMP,         // &
    PIPE,        // |
    CARET,       // ^
    SHL,         // <<
    SHR,         // >>
    AMP_CARET,   // &^
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||
    ARROW,       // <-
    EQ_EQ,       // ==
    BANG_EQ,     // !=
    LT,          // <
    LT_EQ,       // <=
    GT,          // >
    GT_EQ,       // >=
    BANG,        // !
    TILDE,       // ~

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    PACKAGE_KW,
    IMPORT_KW,
    VAR_KW,
    CONST_KW,
    TYPE_KW,
    FUNC_KW,
    MAP_KW,
    CHAN_KW,
    STRUCT_KW,
    INTERFACE_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    EOF,
}

impl SyntaxKind {
    /// Whitespace and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    /// Keywords that start a top-level declaration
    pub fn is_top_level_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::IMPORT_KW
                | SyntaxKind::VAR_KW
                | SyntaxKind::CONST_KW
                | SyntaxKind::TYPE_KW
                | SyntaxKind::FUNC_KW
        )
    }

    /// Binary operator precedence (Go rules), `None` if not a binary operator
    pub fn binary_precedence(self) -> Option<u8> {
        use SyntaxKind::*;
        match self {
            STAR | SLASH | PERCENT | SHL | SHR | AMP | AMP_CARET => Some(5),
            PLUS | MINUS | PIPE | CARET => Some(4),
            EQ_EQ | BANG_EQ | LT | LT_EQ | GT | GT_EQ => Some(3),
            AMP_AMP => Some(2),
            PIPE_PIPE => Some(1),
            _ => None,
        }
    }
}
