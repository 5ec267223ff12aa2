//! Hierarchical parser for C# sources
//!
//! Builds a structured, lossless CST from the trivia-preserving token
//! stream. The parser is error tolerant: it never fails and always produces
//! a tree whose text equals the input, which lets rules run on incomplete
//! code while the user is still typing.
//!
//! Only the structure lint rules care about is modelled precisely:
//! declarations with parameter lists, invocations with argument lists and
//! the blocks/statements that contain them. Everything else is kept as
//! flat tokens inside the closest enclosing node.
//!
//! Trivia placement: a node never starts or ends with trivia. Whitespace
//! and comments between two children belong to the parent, so the text
//! range of a list item is exactly the item without its surroundings.

use super::lexer::LexerError;
use super::{CsSyntaxKind, CsSyntaxNode, CstBuilder, CstToken};

/// Parse C# source into a hierarchical CST
///
/// # Example
///
/// ```rust,ignore
/// use parline_core::cst::parse_cs;
///
/// let source = "class C { void M(int a, int b) { } }";
/// let (cst, errors) = parse_cs(source);
/// assert!(errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_cs(source: &str) -> (CsSyntaxNode, Vec<LexerError>) {
    let (tokens, errors) = super::lex_with_trivia(source);
    let cst = parse_tokens(&tokens);
    (cst, errors)
}

/// Parse a token stream into a hierarchical CST
fn parse_tokens(tokens: &[CstToken]) -> CsSyntaxNode {
    let mut parser = Parser::new(tokens);
    parser.parse_compilation_unit();
    parser.finish()
}

/// Where a member is being parsed; decides how `(`-first headers are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberContext {
    TopLevel,
    Namespace,
    Type,
}

/// What a member header turned out to be after lookahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberShape {
    Type,
    Method,
    Statement,
    Other,
}

/// How an expression run treats a few ambiguous tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprMode {
    /// Directly inside a statement: a completed `{ }` block ends the run
    Statement,
    /// Inside a parameter: `<...>` is a type argument group until `=`
    Parameter,
    /// Anywhere else
    Nested,
}

const ARGUMENT_STOPS: &[CsSyntaxKind] = &[
    CsSyntaxKind::Comma,
    CsSyntaxKind::RParen,
    CsSyntaxKind::Semicolon,
];

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
        }
    }

    fn finish(self) -> CsSyntaxNode {
        self.builder.finish()
    }

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(CsSyntaxKind::CompilationUnit);
        self.parse_members(MemberContext::TopLevel);
        while !self.at_end() {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Parse members until `}` (nested contexts) or end of input
    fn parse_members(&mut self, context: MemberContext) {
        loop {
            let kind = self.peek();
            match kind {
                CsSyntaxKind::Eof => break,
                CsSyntaxKind::RBrace if context != MemberContext::TopLevel => break,
                _ => {}
            }

            self.eat_trivia();
            let before = self.pos;

            match kind {
                CsSyntaxKind::UsingKw
                    if context != MemberContext::Type
                        && self.peek_nth(1) != CsSyntaxKind::LParen =>
                {
                    self.parse_using_directive()
                }
                CsSyntaxKind::NamespaceKw => self.parse_namespace(),
                CsSyntaxKind::LBracket => self.parse_attribute_list(),
                CsSyntaxKind::Semicolon | CsSyntaxKind::RBrace => self.bump(),
                _ => match self.scan_member_shape(context) {
                    MemberShape::Type => self.parse_type_decl(),
                    MemberShape::Method => self.parse_method_decl(),
                    MemberShape::Statement => self.parse_statement(),
                    MemberShape::Other => self.parse_member_decl(),
                },
            }

            if self.pos == before {
                self.bump();
            }
        }
    }

    /// Grammar: using <name-or-alias> ;
    fn parse_using_directive(&mut self) {
        self.builder.start_node(CsSyntaxKind::UsingDirective);
        self.bump();
        self.bump_until(&[CsSyntaxKind::Semicolon, CsSyntaxKind::LBrace]);
        self.eat_if(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    /// Grammar: namespace <name> ( { members } | ; )
    fn parse_namespace(&mut self) {
        self.builder.start_node(CsSyntaxKind::NamespaceDecl);
        self.bump();
        self.bump_until(&[CsSyntaxKind::LBrace, CsSyntaxKind::Semicolon]);

        match self.peek() {
            CsSyntaxKind::LBrace => {
                self.eat_trivia();
                self.bump();
                self.parse_members(MemberContext::Namespace);
                self.expect(CsSyntaxKind::RBrace);
            }
            CsSyntaxKind::Semicolon => {
                // File-scoped namespace: the remaining members stay top-level
                self.eat_trivia();
                self.bump();
            }
            _ => {}
        }

        self.builder.finish_node();
    }

    /// Grammar: [ attribute, ... ]
    fn parse_attribute_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::AttributeList);
        self.bump_balanced(CsSyntaxKind::LBracket, CsSyntaxKind::RBracket);
        self.builder.finish_node();
    }

    /// Grammar: <modifiers> (class|struct|interface|record|enum) <name> <header>* { members }
    fn parse_type_decl(&mut self) {
        self.builder.start_node(CsSyntaxKind::TypeDecl);
        let mut is_enum = false;

        loop {
            match self.peek() {
                CsSyntaxKind::LBrace
                | CsSyntaxKind::Semicolon
                | CsSyntaxKind::RBrace
                | CsSyntaxKind::Eof => break,
                CsSyntaxKind::LParen => {
                    // Record primary constructor or base arguments
                    self.eat_trivia();
                    self.parse_parameter_list();
                }
                CsSyntaxKind::Lt => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                kind => {
                    is_enum |= kind == CsSyntaxKind::EnumKw;
                    self.eat_trivia();
                    self.bump();
                }
            }
        }

        match self.peek() {
            CsSyntaxKind::LBrace if is_enum => {
                self.eat_trivia();
                self.bump_balanced(CsSyntaxKind::LBrace, CsSyntaxKind::RBrace);
                self.eat_if(CsSyntaxKind::Semicolon);
            }
            CsSyntaxKind::LBrace => {
                self.eat_trivia();
                self.bump();
                self.parse_members(MemberContext::Type);
                self.expect(CsSyntaxKind::RBrace);
                self.eat_if(CsSyntaxKind::Semicolon);
            }
            CsSyntaxKind::Semicolon => {
                self.eat_trivia();
                self.bump();
            }
            _ => {}
        }

        self.builder.finish_node();
    }

    /// Grammar: <modifiers> <type>? <name> <type-params>? ( params ) <tail>
    ///
    /// Covers methods, constructors, destructors and operators.
    fn parse_method_decl(&mut self) {
        self.builder.start_node(CsSyntaxKind::MethodDecl);

        loop {
            match self.peek() {
                CsSyntaxKind::LParen
                | CsSyntaxKind::LBrace
                | CsSyntaxKind::Semicolon
                | CsSyntaxKind::RBrace
                | CsSyntaxKind::Eof => break,
                CsSyntaxKind::Lt if !self.after_operator_keyword() => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                _ => {
                    self.eat_trivia();
                    self.bump();
                }
            }
        }

        if self.peek() == CsSyntaxKind::LParen {
            self.eat_trivia();
            self.parse_parameter_list();
        }

        loop {
            match self.peek() {
                CsSyntaxKind::LBrace => {
                    self.eat_trivia();
                    self.parse_block();
                    break;
                }
                CsSyntaxKind::FatArrow => {
                    self.eat_trivia();
                    self.bump();
                    self.parse_expression(&[CsSyntaxKind::Semicolon], ExprMode::Nested);
                    self.eat_if(CsSyntaxKind::Semicolon);
                    break;
                }
                CsSyntaxKind::Semicolon => {
                    self.eat_trivia();
                    self.bump();
                    break;
                }
                CsSyntaxKind::Colon if self.at_constructor_initializer() => {
                    self.parse_constructor_initializer();
                }
                CsSyntaxKind::Lt => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                CsSyntaxKind::RBrace | CsSyntaxKind::Eof => break,
                _ => {
                    // Generic constraints: where T : class
                    self.eat_trivia();
                    self.bump();
                }
            }
        }

        self.builder.finish_node();
    }

    /// Grammar: : (base|this) ( args )
    fn parse_constructor_initializer(&mut self) {
        self.eat_trivia();
        self.builder.start_node(CsSyntaxKind::ConstructorInitializer);
        self.bump();
        self.eat_trivia();
        self.bump();
        self.eat_trivia();
        self.parse_argument_list();
        self.builder.finish_node();
    }

    /// Fields, properties, events, delegates and top-level assignments
    fn parse_member_decl(&mut self) {
        self.builder.start_node(CsSyntaxKind::MemberDecl);

        loop {
            match self.peek() {
                CsSyntaxKind::Eof | CsSyntaxKind::RBrace => break,
                CsSyntaxKind::Semicolon => {
                    self.eat_trivia();
                    self.bump();
                    break;
                }
                CsSyntaxKind::LBrace => {
                    // Property accessors, optionally followed by an initializer
                    self.eat_trivia();
                    self.parse_block();
                    if self.peek() != CsSyntaxKind::Equals {
                        break;
                    }
                }
                CsSyntaxKind::Equals | CsSyntaxKind::FatArrow => {
                    self.eat_trivia();
                    self.bump();
                    self.parse_expression(&[CsSyntaxKind::Semicolon], ExprMode::Nested);
                }
                CsSyntaxKind::LParen => {
                    self.eat_trivia();
                    self.parse_paren_expr();
                }
                CsSyntaxKind::LBracket => {
                    self.eat_trivia();
                    self.parse_bracket_group();
                }
                CsSyntaxKind::Lt => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                _ => {
                    self.eat_trivia();
                    self.bump();
                }
            }
        }

        self.builder.finish_node();
    }

    /// Grammar: ( parameter, ... )
    fn parse_parameter_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::ParameterList);
        self.bump();
        self.parse_separated_items(CsSyntaxKind::Parameter, ExprMode::Parameter);
        self.expect(CsSyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// Grammar: ( argument, ... )
    fn parse_argument_list(&mut self) {
        self.builder.start_node(CsSyntaxKind::ArgumentList);
        self.bump();
        self.parse_separated_items(CsSyntaxKind::Argument, ExprMode::Nested);
        self.expect(CsSyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// Items separated by commas, up to (not including) the closing `)`
    ///
    /// Trivia before each item and around each comma is attached to the
    /// list. A missing item (`f(a, )`) becomes an empty item node.
    fn parse_separated_items(&mut self, item_kind: CsSyntaxKind, mode: ExprMode) {
        if self.peek() == CsSyntaxKind::RParen {
            return;
        }

        loop {
            self.eat_trivia();
            self.builder.start_node(item_kind);
            self.parse_expression(ARGUMENT_STOPS, mode);
            self.builder.finish_node();

            if self.peek() == CsSyntaxKind::Comma {
                self.eat_trivia();
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Grammar: { statement* }
    fn parse_block(&mut self) {
        self.builder.start_node(CsSyntaxKind::Block);
        self.bump();

        loop {
            let kind = self.peek();
            if matches!(kind, CsSyntaxKind::RBrace | CsSyntaxKind::Eof) {
                break;
            }

            self.eat_trivia();
            let before = self.pos;
            if kind == CsSyntaxKind::LBrace {
                self.parse_block();
            } else {
                self.parse_statement();
            }
            if self.pos == before {
                self.bump();
            }
        }

        self.expect(CsSyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        self.builder.start_node(CsSyntaxKind::Statement);
        self.parse_expression(&[CsSyntaxKind::Semicolon], ExprMode::Statement);
        self.eat_if(CsSyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    /// Parse a run of expression tokens until one of `stops`
    ///
    /// `}` and end of input always stop the run. Nested groups are parsed
    /// recursively so their contents never trigger an outer stop.
    fn parse_expression(&mut self, stops: &[CsSyntaxKind], mode: ExprMode) {
        let mut type_groups = mode == ExprMode::Parameter;

        loop {
            let kind = self.peek();
            if matches!(kind, CsSyntaxKind::Eof | CsSyntaxKind::RBrace) || stops.contains(&kind) {
                return;
            }

            self.eat_trivia();
            match kind {
                CsSyntaxKind::LParen => self.parse_paren_expr(),
                CsSyntaxKind::LBracket => self.parse_bracket_group(),
                CsSyntaxKind::LBrace => {
                    self.parse_block();
                    if mode == ExprMode::Statement && !self.continues_after_block() {
                        return;
                    }
                }
                CsSyntaxKind::NewKw => self.parse_object_creation(),
                CsSyntaxKind::Ident => self.parse_primary(),
                CsSyntaxKind::Lt if type_groups => {
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt)
                }
                CsSyntaxKind::Equals if type_groups => {
                    // Default value: ordinary expression from here on
                    type_groups = false;
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    /// Identifier followed by member accesses, indexers and calls
    ///
    /// Every `(` directly after the chain wraps everything parsed so far in
    /// an `InvocationExpr`, so `a.B(1).C(2)` nests two invocations.
    fn parse_primary(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.bump();

        loop {
            match self.peek() {
                CsSyntaxKind::Dot => {
                    self.eat_trivia();
                    self.bump();
                    if self.peek() == CsSyntaxKind::Ident {
                        self.eat_trivia();
                        self.bump();
                    }
                }
                CsSyntaxKind::Operator if matches!(self.peek_text(0), "?." | "::" | "->") => {
                    self.eat_trivia();
                    self.bump();
                    if self.peek() == CsSyntaxKind::Ident {
                        self.eat_trivia();
                        self.bump();
                    }
                }
                CsSyntaxKind::Lt if self.generic_call_ahead() => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                CsSyntaxKind::LParen => {
                    self.builder
                        .start_node_at(checkpoint, CsSyntaxKind::InvocationExpr);
                    self.eat_trivia();
                    self.parse_argument_list();
                    self.builder.finish_node();
                }
                CsSyntaxKind::LBracket => {
                    self.eat_trivia();
                    self.parse_bracket_group();
                }
                _ => break,
            }
        }
    }

    /// Grammar: new <type>? ( args )? { initializer }?
    fn parse_object_creation(&mut self) {
        self.builder.start_node(CsSyntaxKind::ObjectCreationExpr);
        self.bump();

        loop {
            match self.peek() {
                CsSyntaxKind::Ident | CsSyntaxKind::Dot | CsSyntaxKind::Question => {
                    self.eat_trivia();
                    self.bump();
                }
                CsSyntaxKind::Lt => {
                    self.eat_trivia();
                    self.bump_balanced(CsSyntaxKind::Lt, CsSyntaxKind::Gt);
                }
                CsSyntaxKind::LBracket => {
                    self.eat_trivia();
                    self.parse_bracket_group();
                }
                _ => break,
            }
        }

        if self.peek() == CsSyntaxKind::LParen {
            self.eat_trivia();
            self.parse_argument_list();
        }
        if self.peek() == CsSyntaxKind::LBrace {
            self.eat_trivia();
            self.parse_block();
        }

        self.builder.finish_node();
    }

    /// Parenthesised expression, tuple, lambda parameters or keyword group
    fn parse_paren_expr(&mut self) {
        self.builder.start_node(CsSyntaxKind::ParenExpr);
        self.bump();
        self.parse_expression(&[CsSyntaxKind::RParen], ExprMode::Nested);
        self.expect(CsSyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// `[ ... ]` kept as flat tokens in the current node
    fn parse_bracket_group(&mut self) {
        self.bump();
        self.parse_expression(&[CsSyntaxKind::RBracket], ExprMode::Nested);
        self.expect(CsSyntaxKind::RBracket);
    }

    // Lookahead

    /// Classify the member starting at the current token
    fn scan_member_shape(&self, context: MemberContext) -> MemberShape {
        let mut idx = self.pos;
        let mut header: Vec<usize> = Vec::new();

        while let Some(i) = self.significant_from(idx) {
            let token = &self.tokens[i];
            match token.kind {
                kind if kind.is_type_keyword() => return MemberShape::Type,
                CsSyntaxKind::DelegateKw => return MemberShape::Other,
                CsSyntaxKind::LParen => {
                    return if self.is_method_header(context, &header, i) {
                        MemberShape::Method
                    } else if context == MemberContext::Type {
                        MemberShape::Other
                    } else {
                        MemberShape::Statement
                    };
                }
                CsSyntaxKind::LBrace
                | CsSyntaxKind::Semicolon
                | CsSyntaxKind::Equals
                | CsSyntaxKind::FatArrow
                | CsSyntaxKind::RBrace
                | CsSyntaxKind::RParen
                | CsSyntaxKind::RBracket => return MemberShape::Other,
                CsSyntaxKind::Lt if !self.is_operator_word(header.last().copied()) => {
                    match self.matching_close(i, CsSyntaxKind::Lt, CsSyntaxKind::Gt) {
                        Some(close) => {
                            header.push(close);
                            idx = close + 1;
                            continue;
                        }
                        None => return MemberShape::Other,
                    }
                }
                CsSyntaxKind::LBracket => {
                    match self.matching_close(i, CsSyntaxKind::LBracket, CsSyntaxKind::RBracket) {
                        Some(close) => {
                            header.push(close);
                            idx = close + 1;
                            continue;
                        }
                        None => return MemberShape::Other,
                    }
                }
                _ => header.push(i),
            }
            idx = i + 1;
        }

        MemberShape::Other
    }

    /// Decide whether a `(`-first header declares a method
    ///
    /// Inside a type body every such member is a method, constructor,
    /// destructor or operator. Outside of one (top-level statements) the
    /// header must look like `<type> <name>` and be followed by a body.
    fn is_method_header(&self, context: MemberContext, header: &[usize], paren: usize) -> bool {
        let Some(&last) = header.last() else {
            return false;
        };
        if context == MemberContext::Type {
            return true;
        }

        if header.len() < 2 {
            return false;
        }
        if !matches!(self.tokens[last].kind, CsSyntaxKind::Ident | CsSyntaxKind::Gt) {
            return false;
        }
        let plain_header = header.iter().all(|&i| {
            matches!(
                self.tokens[i].kind,
                CsSyntaxKind::Ident
                    | CsSyntaxKind::Gt
                    | CsSyntaxKind::RBracket
                    | CsSyntaxKind::Question
                    | CsSyntaxKind::NewKw
            )
        });
        if !plain_header {
            return false;
        }

        let Some(close) = self.matching_close(paren, CsSyntaxKind::LParen, CsSyntaxKind::RParen)
        else {
            return false;
        };
        match self.significant_from(close + 1) {
            Some(next) => {
                let token = &self.tokens[next];
                matches!(token.kind, CsSyntaxKind::LBrace | CsSyntaxKind::FatArrow)
                    || (token.kind == CsSyntaxKind::Ident && token.text == "where")
            }
            None => false,
        }
    }

    /// `: base(` or `: this(` after a constructor's parameter list
    fn at_constructor_initializer(&self) -> bool {
        matches!(self.peek_text(1), "base" | "this") && self.peek_nth(2) == CsSyntaxKind::LParen
    }

    /// `Foo<int, string>(...)`: a type argument list followed by a call
    fn generic_call_ahead(&self) -> bool {
        let Some(open) = self.significant_from(self.pos) else {
            return false;
        };
        let mut depth = 0usize;
        let mut idx = open;

        while let Some(i) = self.significant_from(idx) {
            match self.tokens[i].kind {
                CsSyntaxKind::Lt => depth += 1,
                CsSyntaxKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return self
                            .significant_from(i + 1)
                            .is_some_and(|next| self.tokens[next].kind == CsSyntaxKind::LParen);
                    }
                }
                CsSyntaxKind::Ident
                | CsSyntaxKind::Comma
                | CsSyntaxKind::Dot
                | CsSyntaxKind::Question
                | CsSyntaxKind::LBracket
                | CsSyntaxKind::RBracket => {}
                _ => return false,
            }
            idx = i + 1;
        }

        false
    }

    /// After a `{ }` block inside a statement, does the statement go on?
    fn continues_after_block(&self) -> bool {
        matches!(
            self.peek(),
            CsSyntaxKind::ElseKw
                | CsSyntaxKind::CatchKw
                | CsSyntaxKind::FinallyKw
                | CsSyntaxKind::Semicolon
                | CsSyntaxKind::Dot
                | CsSyntaxKind::Comma
                | CsSyntaxKind::RParen
                | CsSyntaxKind::Operator
                | CsSyntaxKind::Question
        )
    }

    fn after_operator_keyword(&self) -> bool {
        let previous = self.tokens[..self.pos]
            .iter()
            .rposition(|t| !t.kind.is_trivia());
        self.is_operator_word(previous)
    }

    fn is_operator_word(&self, index: Option<usize>) -> bool {
        index.is_some_and(|i| self.tokens[i].text == "operator")
    }

    /// Index of the token closing the group opened at `open`
    fn matching_close(&self, open: usize, open_kind: CsSyntaxKind, close_kind: CsSyntaxKind) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind == open_kind {
                depth += 1;
            } else if token.kind == close_kind {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            } else if token.kind == CsSyntaxKind::Semicolon && open_kind == CsSyntaxKind::Lt {
                return None;
            }
        }
        None
    }

    /// Index of the first non-trivia token at or after `from`
    fn significant_from(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// Index of the n-th (0-based) non-trivia token from the cursor
    fn significant_nth(&self, n: usize) -> Option<usize> {
        let mut idx = self.significant_from(self.pos)?;
        for _ in 0..n {
            idx = self.significant_from(idx + 1)?;
        }
        Some(idx)
    }

    // Helper methods

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_kind(&self) -> CsSyntaxKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(CsSyntaxKind::Eof)
    }

    /// Kind of the next non-trivia token
    fn peek(&self) -> CsSyntaxKind {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> CsSyntaxKind {
        self.significant_nth(n)
            .map(|i| self.tokens[i].kind)
            .unwrap_or(CsSyntaxKind::Eof)
    }

    fn peek_text(&self, n: usize) -> &str {
        self.significant_nth(n)
            .map(|i| self.tokens[i].text.as_str())
            .unwrap_or("")
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    fn eat_trivia(&mut self) {
        while self.current_kind().is_trivia() {
            self.bump();
        }
    }

    /// Consume the next significant token if it has the given kind
    fn eat_if(&mut self, kind: CsSyntaxKind) {
        if self.peek() == kind {
            self.eat_trivia();
            self.bump();
        }
    }

    /// Consume the expected token or insert a zero-width error token
    fn expect(&mut self, kind: CsSyntaxKind) {
        if self.peek() == kind {
            self.eat_trivia();
            self.bump();
        } else {
            self.builder.token(CsSyntaxKind::Error, "");
        }
    }

    /// Consume tokens up to (not including) one of `stops` or a `}`
    fn bump_until(&mut self, stops: &[CsSyntaxKind]) {
        loop {
            let kind = self.peek();
            if matches!(kind, CsSyntaxKind::Eof | CsSyntaxKind::RBrace) || stops.contains(&kind) {
                break;
            }
            self.eat_trivia();
            self.bump();
        }
    }

    /// Consume a balanced `open ... close` group as flat tokens
    ///
    /// The cursor must be on `open`.
    fn bump_balanced(&mut self, open: CsSyntaxKind, close: CsSyntaxKind) {
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            if kind == CsSyntaxKind::Eof {
                break;
            }
            // An unbalanced `<` must not swallow the rest of the member
            if open == CsSyntaxKind::Lt
                && matches!(
                    kind,
                    CsSyntaxKind::Semicolon | CsSyntaxKind::LBrace | CsSyntaxKind::RBrace
                )
            {
                break;
            }
            self.eat_trivia();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CsSyntaxNode {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "Lexer errors: {errors:?}");
        assert_eq!(cst.text().to_string(), source, "CST must be lossless");
        cst
    }

    fn nodes_of(cst: &CsSyntaxNode, kind: CsSyntaxKind) -> Vec<String> {
        cst.descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[test]
    fn test_parse_method_declaration() {
        let cst = parse("class C\n{\n    void M(int a, string b) { }\n}\n");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl), vec!["void M(int a, string b) { }"]);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::ParameterList), vec!["(int a, string b)"]);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::Parameter), vec!["int a", "string b"]);
    }

    #[test]
    fn test_items_exclude_surrounding_trivia() {
        let cst = parse("class C { void M( int a ,\n  /* c */ string b ) { } }");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::Parameter), vec!["int a", "string b"]);
    }

    #[test]
    fn test_parse_invocation_chain() {
        let cst = parse("class C { void M() { a.B(1, 2).C(3); } }");

        assert_eq!(
            nodes_of(&cst, CsSyntaxKind::InvocationExpr),
            vec!["a.B(1, 2).C(3)", "a.B(1, 2)"]
        );
        assert_eq!(nodes_of(&cst, CsSyntaxKind::Argument), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_nested_call_arguments() {
        let cst = parse("class C { void M() { Outer(Inner(1, 2), x => { Log(x, 3); }); } }");

        let calls = nodes_of(&cst, CsSyntaxKind::InvocationExpr);
        assert_eq!(calls.len(), 3);
        let arguments = nodes_of(&cst, CsSyntaxKind::Argument);
        assert!(arguments.contains(&"Inner(1, 2)".to_string()));
        assert!(arguments.contains(&"x => { Log(x, 3); }".to_string()));
    }

    #[test]
    fn test_generic_parameters_are_not_split() {
        let cst = parse("class C { void M(Dictionary<string, int> map, Func<int, int> f = null) { } }");

        assert_eq!(
            nodes_of(&cst, CsSyntaxKind::Parameter),
            vec!["Dictionary<string, int> map", "Func<int, int> f = null"]
        );
    }

    #[test]
    fn test_generic_call() {
        let cst = parse("class C { void M() { Convert<int, string>(a, b); } }");
        assert_eq!(
            nodes_of(&cst, CsSyntaxKind::InvocationExpr),
            vec!["Convert<int, string>(a, b)"]
        );
    }

    #[test]
    fn test_object_creation_is_not_invocation() {
        let cst = parse("class C { void M() { var p = new Point(1, 2); } }");

        assert!(nodes_of(&cst, CsSyntaxKind::InvocationExpr).is_empty());
        assert_eq!(nodes_of(&cst, CsSyntaxKind::ObjectCreationExpr), vec!["new Point(1, 2)"]);
        let list = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::ArgumentList)
            .unwrap();
        assert_eq!(list.parent().unwrap().kind(), CsSyntaxKind::ObjectCreationExpr);
    }

    #[test]
    fn test_keyword_groups_are_not_invocations() {
        let cst = parse("class C { void M() { if (a) { Run(1, 2); } else { while (b) { } } } }");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::InvocationExpr), vec!["Run(1, 2)"]);
    }

    #[test]
    fn test_constructor_and_initializer() {
        let cst = parse("class C : B { public C(int a, int b) : base(a, b) { } }");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl).len(), 1);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::ConstructorInitializer), vec![": base(a, b)"]);
        assert!(nodes_of(&cst, CsSyntaxKind::InvocationExpr).is_empty());
    }

    #[test]
    fn test_operator_declaration() {
        let cst = parse("struct V { public static bool operator <(V a, V b) => a.X < b.X; }");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl).len(), 1);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::Parameter), vec!["V a", "V b"]);
    }

    #[test]
    fn test_fields_and_properties_with_calls() {
        let cst = parse(
            "class C {\n    int x = Compute(1, 2);\n    int P { get { return Read(a, b); } }\n}\n",
        );

        assert!(nodes_of(&cst, CsSyntaxKind::MethodDecl).is_empty());
        assert_eq!(
            nodes_of(&cst, CsSyntaxKind::InvocationExpr),
            vec!["Compute(1, 2)", "Read(a, b)"]
        );
    }

    #[test]
    fn test_attributes_are_not_calls() {
        let cst = parse("class C { [Obsolete(\"x\", true)] void M(int a) { } }");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::AttributeList), vec!["[Obsolete(\"x\", true)]"]);
        assert!(nodes_of(&cst, CsSyntaxKind::InvocationExpr).is_empty());
    }

    #[test]
    fn test_top_level_statements() {
        let cst = parse("using System;\n\nConsole.WriteLine(a, b);\nvoid Local(int x, int y) { }\n");

        assert_eq!(nodes_of(&cst, CsSyntaxKind::UsingDirective), vec!["using System;"]);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::InvocationExpr), vec!["Console.WriteLine(a, b)"]);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl), vec!["void Local(int x, int y) { }"]);
    }

    #[test]
    fn test_namespaces() {
        let cst = parse("namespace A.B\n{\n    class C { void M(int a) { } }\n}\n");
        assert_eq!(nodes_of(&cst, CsSyntaxKind::NamespaceDecl).len(), 1);
        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl).len(), 1);

        let cst = parse("namespace A.B;\n\nclass C { void M(int a) { } }\n");
        assert_eq!(nodes_of(&cst, CsSyntaxKind::MethodDecl).len(), 1);
    }

    #[test]
    fn test_missing_argument_is_empty_item() {
        let cst = parse("class C { void M() { F(a, ); } }");

        let arguments: Vec<_> = cst
            .descendants()
            .filter(|n| n.kind() == CsSyntaxKind::Argument)
            .collect();
        assert_eq!(arguments.len(), 2);
        assert!(arguments[1].text_range().is_empty());
    }

    #[test]
    fn test_incomplete_code_is_lossless() {
        for source in [
            "class C { void M(int a, ",
            "class C { void M() { F(1, 2",
            "}}} ) ] F(",
            "class { (",
            "void",
            "",
        ] {
            let (cst, _) = parse_cs(source);
            assert_eq!(cst.text().to_string(), source);
        }
    }

    #[test]
    fn test_empty_lists() {
        let cst = parse("class C { void M( ) { F(); } }");

        assert!(nodes_of(&cst, CsSyntaxKind::Parameter).is_empty());
        assert!(nodes_of(&cst, CsSyntaxKind::Argument).is_empty());
    }
}
