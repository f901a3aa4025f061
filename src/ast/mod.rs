//! Syntax tree boundary between AST providers and the model builder.
//!
//! Providers turn source text into an ordered list of owned [`Node`]s. Each
//! node carries a closed [`Syntax`] union for the declaration kinds the
//! builder knows about, plus `Syntax::Other` so providers can hand over
//! anything else for extension strategies to pick up.
//!
//! Referenced names inside syntax (`extends`, `implements`, trait uses,
//! class types) are expected to be fully qualified already; resolving them
//! is the provider's job (see [`NameResolver`]).

mod names;
#[cfg(feature = "tree-sitter")]
mod php;

pub use names::NameResolver;
#[cfg(feature = "tree-sitter")]
pub use php::PhpAstProvider;

use std::fmt;

use crate::error::ParseError;
use crate::model::{Location, Visibility};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    #[cfg(feature = "tree-sitter")]
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.start_line,
            column: self.start_col,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A comment token attached in front of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
    /// `/** ... */` documentation comment rather than an ordinary one.
    pub is_doc: bool,
}

impl Comment {
    /// Classify a raw comment token by its opening delimiter.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let is_doc = text.starts_with("/**") && !text.starts_with("/**/");
        Self { text, span, is_doc }
    }

    pub fn doc(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: Span::default(),
            is_doc: true,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: Span::default(),
            is_doc: false,
        }
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub visibility: Option<Visibility>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_readonly: bool,
}

/// A formal parameter of a function or method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    /// Name without the leading `$`.
    pub name: String,
    pub type_hint: Option<String>,
    pub default: Option<String>,
    pub by_reference: bool,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceSyntax {
    /// `A\B` without leading backslash; `None` for `namespace { }`.
    pub name: Option<String>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassSyntax {
    pub name: Option<String>,
    pub modifiers: Modifiers,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub members: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceSyntax {
    pub name: Option<String>,
    pub extends: Vec<String>,
    pub members: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitSyntax {
    pub name: Option<String>,
    pub members: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionSyntax {
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

/// `const NAME = value` at namespace level or inside a class body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantSyntax {
    pub name: Option<String>,
    pub value: String,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodSyntax {
    pub name: Option<String>,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertySyntax {
    /// Name without the leading `$`.
    pub name: Option<String>,
    pub modifiers: Modifiers,
    pub type_hint: Option<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitUseSyntax {
    pub traits: Vec<String>,
}

/// Closed set of syntax shapes handed to construction strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syntax {
    Namespace(NamespaceSyntax),
    Class(ClassSyntax),
    Interface(InterfaceSyntax),
    Trait(TraitSyntax),
    Function(FunctionSyntax),
    Constant(ConstantSyntax),
    Method(MethodSyntax),
    Property(PropertySyntax),
    ClassConstant(ConstantSyntax),
    TraitUse(TraitUseSyntax),
    /// A comment token selected for doc-block parsing.
    DocComment(Comment),
    /// Anything the provider emits that has no dedicated shape.
    Other { kind: String, text: String },
}

/// Discriminant of [`Syntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Namespace,
    Class,
    Interface,
    Trait,
    Function,
    Constant,
    Method,
    Property,
    ClassConstant,
    TraitUse,
    DocComment,
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Trait => "trait",
            NodeKind::Function => "function",
            NodeKind::Constant => "constant",
            NodeKind::Method => "method",
            NodeKind::Property => "property",
            NodeKind::ClassConstant => "class constant",
            NodeKind::TraitUse => "trait use",
            NodeKind::DocComment => "doc comment",
            NodeKind::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One syntax node with its leading comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub syntax: Syntax,
    pub span: Span,
    pub comments: Vec<Comment>,
}

impl Node {
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            span: Span::default(),
            comments: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    /// Wrap a comment token so it can be dispatched like any other node.
    pub fn doc_comment(comment: Comment) -> Self {
        let span = comment.span;
        Self::new(Syntax::DocComment(comment)).with_span(span)
    }

    pub fn kind(&self) -> NodeKind {
        match &self.syntax {
            Syntax::Namespace(_) => NodeKind::Namespace,
            Syntax::Class(_) => NodeKind::Class,
            Syntax::Interface(_) => NodeKind::Interface,
            Syntax::Trait(_) => NodeKind::Trait,
            Syntax::Function(_) => NodeKind::Function,
            Syntax::Constant(_) => NodeKind::Constant,
            Syntax::Method(_) => NodeKind::Method,
            Syntax::Property(_) => NodeKind::Property,
            Syntax::ClassConstant(_) => NodeKind::ClassConstant,
            Syntax::TraitUse(_) => NodeKind::TraitUse,
            Syntax::DocComment(_) => NodeKind::DocComment,
            Syntax::Other { .. } => NodeKind::Other,
        }
    }

    /// Kind name for diagnostics; the raw provider kind for `Other` nodes.
    pub fn kind_name(&self) -> &str {
        match &self.syntax {
            Syntax::Other { kind, .. } => kind,
            _ => self.kind().as_str(),
        }
    }

    /// The last documentation comment in front of this node, if any.
    pub fn last_doc_comment(&self) -> Option<&Comment> {
        self.comments.iter().rev().find(|c| c.is_doc)
    }
}

/// Turns source text into the ordered top-level nodes of a file.
pub trait AstProvider: Send + Sync {
    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError>;
}
