//! PHP AST provider backed by tree-sitter-php.
//!
//! Lowers the concrete syntax tree into owned [`Node`]s:
//! - namespaces (braced and semicolon form)
//! - class, interface and trait declarations with their members
//! - function definitions
//! - `const` declarations, one node per element
//!
//! `use` imports are consumed to qualify referenced names. Other
//! declarations, such as `enum`, are emitted as `Syntax::Other`. Executable
//! statements and inline HTML are not structural and are dropped unless
//! `keep_other_statements` is set; their leading comments move on to the
//! next emitted node.

use tree_sitter::{Language, Parser, Tree};

use super::{
    AstProvider, ClassSyntax, Comment, ConstantSyntax, FunctionSyntax, InterfaceSyntax,
    MethodSyntax, Modifiers, NameResolver, NamespaceSyntax, Node, Parameter, PropertySyntax, Span,
    Syntax, TraitSyntax, TraitUseSyntax,
};
use crate::error::ParseError;
use crate::model::Visibility;

type TsNode<'t> = tree_sitter::Node<'t>;

/// PHP language provider.
pub struct PhpAstProvider {
    language: Language,
    strict: bool,
    keep_other_statements: bool,
}

impl Default for PhpAstProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PhpAstProvider {
    /// Create a provider that rejects files with syntax errors.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_php::LANGUAGE_PHP.into(),
            strict: true,
            keep_other_statements: false,
        }
    }

    /// When disabled, files with syntax errors are lowered from the
    /// recovered tree instead of failing.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Emit non-structural top-level statements as `Syntax::Other` nodes.
    pub fn keep_other_statements(mut self, keep: bool) -> Self {
        self.keep_other_statements = keep;
        self
    }

    /// Create a new parser for this call; `tree_sitter::Parser` is not `Sync`.
    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }

    fn parse_tree(&self, source: &str) -> Result<Tree, ParseError> {
        let mut parser = self.create_parser()?;
        parser.parse(source, None).ok_or(ParseError::Aborted)
    }
}

impl AstProvider for PhpAstProvider {
    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();

        if self.strict && root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let span = Span::from_node(bad);
            let snippet: String = text(bad, source).chars().take(40).collect();
            return Err(ParseError::Syntax {
                line: span.start_line,
                column: span.start_col,
                snippet,
            });
        }

        let mut lowering = Lowering {
            source,
            resolver: NameResolver::new(),
            keep_other: self.keep_other_statements,
            extra: Vec::new(),
        };
        Ok(lowering.program(root))
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn text<'s>(node: TsNode, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn child_of_kind<'t>(node: TsNode<'t>, kinds: &[&str]) -> Option<TsNode<'t>> {
    named_children(node)
        .into_iter()
        .find(|c| kinds.contains(&c.kind()))
}

/// Statement kinds that leave no trace in a file model.
const SILENT_KINDS: &[&str] = &["php_tag", "text_interpolation", "text", "empty_statement", "?>"];

/// Declarations without a dedicated lowering, such as `enum`. They are
/// always emitted so that a missing strategy fails the build.
fn is_unlowered_declaration(kind: &str) -> bool {
    kind.ends_with("_declaration")
        && !matches!(kind, "global_declaration" | "function_static_declaration")
}

struct Lowering<'s> {
    source: &'s str,
    resolver: NameResolver,
    keep_other: bool,
    /// Sibling nodes produced by the last statement beyond its first one.
    extra: Vec<Node>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: TsNode) -> &'s str {
        text(node, self.source)
    }

    fn field_text(&self, node: TsNode, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .filter(|s| !s.is_empty())
    }

    /// Lower the program root; semicolon namespaces own the statements that
    /// follow them up to the next namespace.
    fn program(&mut self, root: TsNode) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut open: Option<Node> = None;
        let mut pending = Vec::new();

        for child in children(root) {
            match child.kind() {
                "comment" => {
                    pending.push(Comment::new(self.text(child), Span::from_node(child)));
                }
                "namespace_definition" if child.child_by_field_name("body").is_none() => {
                    nodes.extend(open.take());
                    let name = self.field_text(child, "name");
                    self.resolver.enter_namespace(name.as_deref());
                    open = Some(
                        Node::new(Syntax::Namespace(NamespaceSyntax { name, body: Vec::new() }))
                            .with_span(Span::from_node(child))
                            .with_comments(std::mem::take(&mut pending)),
                    );
                }
                _ => {
                    if let Some(node) = self.statement(child, &mut pending) {
                        if let Syntax::Namespace(_) = node.syntax {
                            nodes.extend(open.take());
                            nodes.push(node);
                        } else if let Some(Node {
                            syntax: Syntax::Namespace(ns),
                            ..
                        }) = open.as_mut()
                        {
                            ns.body.push(node);
                        } else {
                            nodes.push(node);
                        }
                    }
                    // const declarations lower to several nodes
                    for extra in self.take_extra() {
                        match open.as_mut() {
                            Some(Node {
                                syntax: Syntax::Namespace(ns),
                                ..
                            }) => ns.body.push(extra),
                            _ => nodes.push(extra),
                        }
                    }
                }
            }
        }

        nodes.extend(open.take());
        nodes
    }

    /// Lower the statements of a braced namespace body.
    fn block(&mut self, body: TsNode) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut pending = Vec::new();
        for child in children(body) {
            match child.kind() {
                "comment" => pending.push(Comment::new(self.text(child), Span::from_node(child))),
                "{" | "}" => {}
                _ => {
                    nodes.extend(self.statement(child, &mut pending));
                    nodes.extend(self.take_extra());
                }
            }
        }
        nodes
    }

    fn take_extra(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.extra)
    }

    /// Lower one statement. Leading comments are taken from `pending` only
    /// when a node is emitted; otherwise they stay for the next statement.
    fn statement(&mut self, node: TsNode, pending: &mut Vec<Comment>) -> Option<Node> {
        let span = Span::from_node(node);
        let syntax = match node.kind() {
            "namespace_definition" => {
                let name = self.field_text(node, "name");
                self.resolver.enter_namespace(name.as_deref());
                let body = node
                    .child_by_field_name("body")
                    .map(|b| self.block(b))
                    .unwrap_or_default();
                // code after a braced block is global again
                self.resolver.enter_namespace(None);
                Syntax::Namespace(NamespaceSyntax { name, body })
            }
            "namespace_use_declaration" => {
                self.imports(node);
                return None;
            }
            "class_declaration" => Syntax::Class(self.class(node)),
            "interface_declaration" => Syntax::Interface(InterfaceSyntax {
                name: self.field_text(node, "name"),
                extends: self.base_names(node, "base_clause"),
                members: self.members(node),
            }),
            "trait_declaration" => Syntax::Trait(TraitSyntax {
                name: self.field_text(node, "name"),
                members: self.members(node),
            }),
            "function_definition" => Syntax::Function(FunctionSyntax {
                name: self.field_text(node, "name"),
                parameters: self.parameters(node),
                return_type: self.return_type(node),
            }),
            "const_declaration" => {
                let mut constants = self
                    .constants(node)
                    .into_iter()
                    .map(|c| Node::new(Syntax::Constant(c)).with_span(span));
                let first = constants.next()?.with_comments(std::mem::take(pending));
                self.extra.extend(constants);
                return Some(first);
            }
            kind if SILENT_KINDS.contains(&kind) => return None,
            kind if is_unlowered_declaration(kind) => Syntax::Other {
                kind: kind.to_string(),
                text: self.text(node).to_string(),
            },
            kind => {
                if !self.keep_other {
                    tracing::trace!(kind, line = span.start_line, "skipping non-structural statement");
                    return None;
                }
                Syntax::Other {
                    kind: kind.to_string(),
                    text: self.text(node).to_string(),
                }
            }
        };
        Some(
            Node::new(syntax)
                .with_span(span)
                .with_comments(std::mem::take(pending)),
        )
    }

    fn imports(&mut self, node: TsNode) {
        // `use function` / `use const` import no class names
        if let Some(kind) = node.child_by_field_name("type") {
            tracing::trace!(kind = self.text(kind), "ignoring non-class import");
            return;
        }

        let prefix = child_of_kind(node, &["namespace_name"]).map(|n| self.text(n).to_string());
        let group = child_of_kind(node, &["namespace_use_group"]);

        let clauses = match group {
            Some(group) => named_children(group),
            None => named_children(node),
        };
        for clause in clauses {
            if !matches!(
                clause.kind(),
                "namespace_use_clause" | "namespace_use_group_clause"
            ) {
                continue;
            }
            if clause.child_by_field_name("type").is_some() {
                continue;
            }
            let mut parts = named_children(clause)
                .into_iter()
                .filter(|n| matches!(n.kind(), "name" | "qualified_name" | "namespace_name"))
                .map(|n| self.text(n).to_string());
            let Some(target) = parts.next() else {
                continue;
            };
            let alias = self.field_text(clause, "alias").or_else(|| parts.next());
            let target = match &prefix {
                Some(prefix) => format!("{}\\{}", prefix.trim_matches('\\'), target),
                None => target,
            };
            self.resolver.add_import(&target, alias.as_deref());
        }
    }

    fn class(&mut self, node: TsNode) -> ClassSyntax {
        let mut modifiers = Modifiers::default();
        for child in children(node) {
            match child.kind() {
                "abstract_modifier" => modifiers.is_abstract = true,
                "final_modifier" => modifiers.is_final = true,
                "readonly_modifier" => modifiers.is_readonly = true,
                _ => {}
            }
        }
        ClassSyntax {
            name: self.field_text(node, "name"),
            modifiers,
            extends: self.base_names(node, "base_clause").into_iter().next(),
            implements: self.base_names(node, "class_interface_clause"),
            members: self.members(node),
        }
    }

    /// Resolved names listed in an `extends` / `implements` clause.
    fn base_names(&self, node: TsNode, clause_kind: &str) -> Vec<String> {
        child_of_kind(node, &[clause_kind])
            .map(|clause| {
                named_children(clause)
                    .into_iter()
                    .filter(|n| matches!(n.kind(), "name" | "qualified_name"))
                    .map(|n| self.resolver.resolve_class(self.text(n)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn members(&mut self, node: TsNode) -> Vec<Node> {
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut members = Vec::new();
        let mut pending = Vec::new();
        for child in children(body) {
            let span = Span::from_node(child);
            let syntaxes = match child.kind() {
                "comment" => {
                    pending.push(Comment::new(self.text(child), span));
                    continue;
                }
                "method_declaration" => vec![Syntax::Method(MethodSyntax {
                    name: self.field_text(child, "name"),
                    modifiers: self.modifiers(child),
                    parameters: self.parameters(child),
                    return_type: self.return_type(child),
                })],
                "property_declaration" => self
                    .properties(child)
                    .into_iter()
                    .map(Syntax::Property)
                    .collect(),
                "const_declaration" => self
                    .constants(child)
                    .into_iter()
                    .map(Syntax::ClassConstant)
                    .collect(),
                "use_declaration" => vec![Syntax::TraitUse(TraitUseSyntax {
                    traits: named_children(child)
                        .into_iter()
                        .filter(|n| matches!(n.kind(), "name" | "qualified_name"))
                        .map(|n| self.resolver.resolve_class(self.text(n)))
                        .collect(),
                })],
                _ => {
                    pending.clear();
                    continue;
                }
            };
            let comments = std::mem::take(&mut pending);
            for syntax in syntaxes {
                members.push(Node::new(syntax).with_span(span).with_comments(comments.clone()));
            }
        }
        members
    }

    fn modifiers(&self, node: TsNode) -> Modifiers {
        let mut modifiers = Modifiers::default();
        for child in children(node) {
            match child.kind() {
                "visibility_modifier" => {
                    modifiers.visibility = match self.text(child).to_lowercase().as_str() {
                        "private" => Some(Visibility::Private),
                        "protected" => Some(Visibility::Protected),
                        _ => Some(Visibility::Public),
                    }
                }
                "var_modifier" => modifiers.visibility = Some(Visibility::Public),
                "static_modifier" => modifiers.is_static = true,
                "abstract_modifier" => modifiers.is_abstract = true,
                "final_modifier" => modifiers.is_final = true,
                "readonly_modifier" => modifiers.is_readonly = true,
                _ => {}
            }
        }
        modifiers
    }

    fn constants(&self, node: TsNode) -> Vec<ConstantSyntax> {
        let modifiers = self.modifiers(node);
        named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "const_element")
            .map(|element| {
                let parts = named_children(element);
                let name = parts
                    .iter()
                    .find(|n| n.kind() == "name")
                    .map(|n| self.text(*n).to_string());
                let value = element
                    .child_by_field_name("value")
                    .or_else(|| parts.last().copied().filter(|n| n.kind() != "name"))
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                ConstantSyntax {
                    name,
                    value,
                    modifiers,
                }
            })
            .collect()
    }

    fn properties(&self, node: TsNode) -> Vec<PropertySyntax> {
        let modifiers = self.modifiers(node);
        let type_hint = node
            .child_by_field_name("type")
            .map(|t| self.resolver.resolve_type(self.text(t)));
        named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "property_element")
            .map(|element| {
                let name = element
                    .child_by_field_name("name")
                    .or_else(|| child_of_kind(element, &["variable_name"]))
                    .map(|n| self.text(n).trim_start_matches('$').to_string());
                let default = element
                    .child_by_field_name("default_value")
                    .map(|n| self.text(n).to_string())
                    .or_else(|| {
                        child_of_kind(element, &["property_initializer"])
                            .map(|n| self.text(n).trim_start_matches('=').trim().to_string())
                    });
                PropertySyntax {
                    name,
                    modifiers,
                    type_hint: type_hint.clone(),
                    default,
                }
            })
            .collect()
    }

    fn parameters(&self, node: TsNode) -> Vec<Parameter> {
        let Some(list) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .filter(|p| {
                matches!(
                    p.kind(),
                    "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
                )
            })
            .map(|p| {
                let name = p
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or("")
                    .trim_start_matches('&')
                    .trim()
                    .trim_start_matches('$')
                    .to_string();
                let by_reference = p.child_by_field_name("reference_modifier").is_some()
                    || children(p).iter().any(|c| c.kind() == "reference_modifier")
                    || p
                        .child_by_field_name("name")
                        .map(|n| n.kind() == "by_ref")
                        .unwrap_or(false);
                Parameter {
                    name,
                    type_hint: p
                        .child_by_field_name("type")
                        .map(|t| self.resolver.resolve_type(self.text(t))),
                    default: self.field_text(p, "default_value"),
                    by_reference,
                    variadic: p.kind() == "variadic_parameter",
                }
            })
            .collect()
    }

    fn return_type(&self, node: TsNode) -> Option<String> {
        node.child_by_field_name("return_type").map(|t| {
            let raw = self.text(t).trim_start_matches(':').trim();
            self.resolver.resolve_type(raw)
        })
    }
}
