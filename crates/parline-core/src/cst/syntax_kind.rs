//! Syntax kind enumeration for the C# CST
//!
//! This module defines all possible node and token types in the syntax tree.

use std::fmt;

/// Syntax kind for C# language elements
///
/// This enum represents all possible types of nodes and tokens in the CST.
/// It includes:
/// - Trivia (whitespace, comments)
/// - Keywords the parser needs to recognise structure
/// - Punctuation and operators
/// - Structural nodes (declarations, lists, expressions)
/// - Literals and identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum CsSyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Whitespace (spaces, tabs)
    Whitespace = 0,
    /// Line comment starting with //
    CommentLine = 1,
    /// Block comment /* ... */
    CommentBlock = 2,
    /// Newline (`\n`, `\r\n` or a lone `\r`)
    Newline = 3,

    // ==================
    // Keywords (10-99)
    // ==================
    /// "using"
    UsingKw = 10,
    /// "namespace"
    NamespaceKw = 11,
    /// "class"
    ClassKw = 12,
    /// "struct"
    StructKw = 13,
    /// "interface"
    InterfaceKw = 14,
    /// "record"
    RecordKw = 15,
    /// "enum"
    EnumKw = 16,
    /// "new"
    NewKw = 17,
    /// "delegate"
    DelegateKw = 18,
    /// "else"
    ElseKw = 19,
    /// "catch"
    CatchKw = 20,
    /// "finally"
    FinallyKw = 21,
    /// Any other reserved word that may be followed by a parenthesised
    /// group without forming a call (`if`, `while`, `typeof`, ...)
    Keyword = 22,

    // ==================
    // Punctuation (100-149)
    // ==================
    LParen = 100,
    RParen = 101,
    LBrace = 102,
    RBrace = 103,
    LBracket = 104,
    RBracket = 105,
    Comma = 106,
    Semicolon = 107,
    Dot = 108,
    Colon = 109,
    Equals = 110,
    /// "=>"
    FatArrow = 111,
    Lt = 112,
    Gt = 113,
    Question = 114,
    /// Any other operator (`+`, `==`, `&&`, `??=`, ...)
    Operator = 115,

    // ==================
    // Literals & Identifiers (150-199)
    // ==================
    Ident = 150,
    Number = 151,
    String = 152,
    Char = 153,

    // ==================
    // Structure nodes (200-399)
    // ==================
    CompilationUnit = 200,
    UsingDirective = 201,
    NamespaceDecl = 202,
    TypeDecl = 203,
    AttributeList = 204,
    /// Method, constructor, destructor or operator declaration
    MethodDecl = 210,
    /// `: base(...)` / `: this(...)` after a constructor's parameters
    ConstructorInitializer = 211,
    /// Field, property, event, delegate or any other non-method member
    MemberDecl = 212,
    ParameterList = 213,
    Parameter = 214,
    Block = 220,
    Statement = 221,
    InvocationExpr = 230,
    ObjectCreationExpr = 231,
    ArgumentList = 232,
    Argument = 233,
    ParenExpr = 234,

    // ==================
    // Special (400+)
    // ==================
    /// Error node/token for recovery
    Error = 400,
    /// End of file
    Eof = 401,
    /// Unrecognised character
    Unknown = 402,
}

impl CsSyntaxKind {
    /// Check if this is trivia (whitespace, newlines or comments)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::CommentLine | Self::CommentBlock | Self::Newline
        )
    }

    /// Check if this is a comment
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::CommentLine | Self::CommentBlock)
    }

    /// Check if this is a keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Check if this is punctuation
    pub const fn is_punct(self) -> bool {
        (self as u16) >= 100 && (self as u16) < 150
    }

    /// Check if this is a literal
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Char)
    }

    /// Check if this is a structural node
    pub const fn is_node(self) -> bool {
        (self as u16) >= 200 && (self as u16) < 400
    }

    /// Check if this keyword opens a type declaration
    pub const fn is_type_keyword(self) -> bool {
        matches!(
            self,
            Self::ClassKw | Self::StructKw | Self::InterfaceKw | Self::RecordKw | Self::EnumKw
        )
    }

    /// Map an identifier-like word to its keyword kind
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "using" => Self::UsingKw,
            "namespace" => Self::NamespaceKw,
            "class" => Self::ClassKw,
            "struct" => Self::StructKw,
            "interface" => Self::InterfaceKw,
            "record" => Self::RecordKw,
            "enum" => Self::EnumKw,
            "new" => Self::NewKw,
            "delegate" => Self::DelegateKw,
            "else" => Self::ElseKw,
            "catch" => Self::CatchKw,
            "finally" => Self::FinallyKw,
            "if" | "while" | "for" | "foreach" | "switch" | "lock" | "fixed" | "return"
            | "throw" | "typeof" | "sizeof" | "default" | "checked" | "unchecked" | "when"
            | "stackalloc" => Self::Keyword,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for CsSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<CsSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: CsSyntaxKind) -> Self {
        Self(kind as u16)
    }
}
