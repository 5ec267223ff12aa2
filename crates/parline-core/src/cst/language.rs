//! Rowan language implementation for C#
//!
//! This module implements the `rowan::Language` trait, which connects
//! our CsSyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::CsSyntaxKind;

/// Language implementation for C# sources
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

impl Language for CsLanguage {
    type Kind = CsSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => CsSyntaxKind::Whitespace,
            1 => CsSyntaxKind::CommentLine,
            2 => CsSyntaxKind::CommentBlock,
            3 => CsSyntaxKind::Newline,

            // Keywords (10-99)
            10 => CsSyntaxKind::UsingKw,
            11 => CsSyntaxKind::NamespaceKw,
            12 => CsSyntaxKind::ClassKw,
            13 => CsSyntaxKind::StructKw,
            14 => CsSyntaxKind::InterfaceKw,
            15 => CsSyntaxKind::RecordKw,
            16 => CsSyntaxKind::EnumKw,
            17 => CsSyntaxKind::NewKw,
            18 => CsSyntaxKind::DelegateKw,
            19 => CsSyntaxKind::ElseKw,
            20 => CsSyntaxKind::CatchKw,
            21 => CsSyntaxKind::FinallyKw,
            22 => CsSyntaxKind::Keyword,

            // Punctuation (100-149)
            100 => CsSyntaxKind::LParen,
            101 => CsSyntaxKind::RParen,
            102 => CsSyntaxKind::LBrace,
            103 => CsSyntaxKind::RBrace,
            104 => CsSyntaxKind::LBracket,
            105 => CsSyntaxKind::RBracket,
            106 => CsSyntaxKind::Comma,
            107 => CsSyntaxKind::Semicolon,
            108 => CsSyntaxKind::Dot,
            109 => CsSyntaxKind::Colon,
            110 => CsSyntaxKind::Equals,
            111 => CsSyntaxKind::FatArrow,
            112 => CsSyntaxKind::Lt,
            113 => CsSyntaxKind::Gt,
            114 => CsSyntaxKind::Question,
            115 => CsSyntaxKind::Operator,

            // Literals & Identifiers (150-199)
            150 => CsSyntaxKind::Ident,
            151 => CsSyntaxKind::Number,
            152 => CsSyntaxKind::String,
            153 => CsSyntaxKind::Char,

            // Structure nodes (200-399)
            200 => CsSyntaxKind::CompilationUnit,
            201 => CsSyntaxKind::UsingDirective,
            202 => CsSyntaxKind::NamespaceDecl,
            203 => CsSyntaxKind::TypeDecl,
            204 => CsSyntaxKind::AttributeList,
            210 => CsSyntaxKind::MethodDecl,
            211 => CsSyntaxKind::ConstructorInitializer,
            212 => CsSyntaxKind::MemberDecl,
            213 => CsSyntaxKind::ParameterList,
            214 => CsSyntaxKind::Parameter,
            220 => CsSyntaxKind::Block,
            221 => CsSyntaxKind::Statement,
            230 => CsSyntaxKind::InvocationExpr,
            231 => CsSyntaxKind::ObjectCreationExpr,
            232 => CsSyntaxKind::ArgumentList,
            233 => CsSyntaxKind::Argument,
            234 => CsSyntaxKind::ParenExpr,

            // Special (400+)
            400 => CsSyntaxKind::Error,
            401 => CsSyntaxKind::Eof,
            402 => CsSyntaxKind::Unknown,

            _ => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                CsSyntaxKind::Unknown
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
