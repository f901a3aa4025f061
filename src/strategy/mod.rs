//! Construction strategies turning syntax nodes into model elements.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  find_matching  ┌──────────────────┐  create   ┌─────────┐
//! │  Node    │────────────────▶│ StrategyRegistry │──────────▶│ Element │
//! └──────────┘                 └──────────────────┘           └─────────┘
//!                                       ▲                          │
//!                                       │ nested nodes             │ insert
//!                                       │                          ▼
//!                                ┌──────────────┐           ┌───────────┐
//!                                │   Context    │──────────▶│ FileModel │
//!                                └──────────────┘  &mut     └───────────┘
//! ```
//!
//! # Adding a New Node Kind
//!
//! 1. Implement [`ProjectFactoryStrategy`] for the node shape
//! 2. Register it with [`StrategyRegistryBuilder::register`]; earlier
//!    registrations win when several strategies support the same node

mod class_like;
mod constant;
mod doc_block;
mod function;
mod members;
mod namespace;
mod registry;

pub use class_like::{ClassStrategy, InterfaceStrategy, TraitStrategy};
pub use constant::{ClassConstantStrategy, ConstantStrategy};
pub use doc_block::DocBlockStrategy;
pub use function::FunctionStrategy;
pub use members::{MethodStrategy, PropertyStrategy, TraitUseStrategy};
pub use namespace::NamespaceStrategy;
pub use registry::{StrategyRegistry, StrategyRegistryBuilder};

use crate::ast::{Comment, Node, Parameter};
use crate::error::{BuildError, StrategyError};
use crate::model::{Argument, DocBlock, DuplicatePolicy, Element, FileModel, Fqsen};

/// Converts one kind of syntax node into one model element.
///
/// Implementations must be cheap to query and must not keep per-build state;
/// a single registry is shared by every build, possibly across threads.
pub trait ProjectFactoryStrategy: Send + Sync {
    /// Short name used in diagnostics (e.g. "class").
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `node`. Must be side-effect free.
    fn supports(&self, node: &Node) -> bool;

    /// Build exactly one element from `node`.
    ///
    /// Nested declarations are dispatched through `strategies` again; the ones
    /// that belong in file-level collections are inserted via `context`.
    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError>;
}

/// Build-scoped state handed to strategies.
///
/// Strategies read the file path and naming scope; the only mutation they
/// perform is narrowing the scope for nested nodes and inserting elements
/// into the file model being built.
pub struct Context<'m> {
    path: &'m str,
    namespace: Fqsen,
    owner: Option<Fqsen>,
    policy: DuplicatePolicy,
    model: &'m mut FileModel,
}

impl<'m> Context<'m> {
    /// Context for the global scope of a file.
    pub fn new(path: &'m str, model: &'m mut FileModel, policy: DuplicatePolicy) -> Self {
        Self {
            path,
            namespace: Fqsen::root(),
            owner: None,
            policy,
            model,
        }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// The namespace new declarations are qualified with.
    pub fn namespace(&self) -> &Fqsen {
        &self.namespace
    }

    /// The class-like element whose members are being built, if any.
    pub fn owner(&self) -> Option<&Fqsen> {
        self.owner.as_ref()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Narrow the scope to `namespace` for the nodes of a namespace body.
    pub fn enter(&mut self, namespace: Fqsen) -> Context<'_> {
        Context {
            path: self.path,
            namespace,
            owner: None,
            policy: self.policy,
            model: &mut *self.model,
        }
    }

    /// Narrow the scope to the members of `owner`.
    pub fn enter_owner(&mut self, owner: Fqsen) -> Context<'_> {
        Context {
            path: self.path,
            namespace: self.namespace.clone(),
            owner: Some(owner),
            policy: self.policy,
            model: &mut *self.model,
        }
    }

    /// Store a file-level element in the model under construction.
    pub fn insert(&mut self, element: Element) -> Result<(), BuildError> {
        self.model.insert(element, self.policy)
    }
}

/// Dispatch `node` through the registry and build its element.
pub fn create_element(
    node: &Node,
    strategies: &StrategyRegistry,
    context: &mut Context<'_>,
) -> Result<Element, BuildError> {
    let strategy = strategies.find_matching(node)?;
    tracing::trace!(strategy = strategy.name(), line = node.span.start_line, "dispatching node");
    strategy.create(node, strategies, context)
}

/// Build a doc block from a comment token through the registry.
pub fn create_doc_block(
    comment: &Comment,
    strategies: &StrategyRegistry,
    context: &mut Context<'_>,
) -> Result<DocBlock, BuildError> {
    let node = Node::doc_comment(comment.clone());
    match create_element(&node, strategies, context)? {
        Element::DocBlock(doc) => Ok(doc),
        other => Err(BuildError::strategy(
            strategies.find_matching(&node)?.name(),
            StrategyError::UnexpectedElement {
                expected: "doc block",
                found: other.kind(),
            },
        )),
    }
}

/// Doc block of the last documentation comment in front of `node`.
pub fn doc_block_for(
    node: &Node,
    strategies: &StrategyRegistry,
    context: &mut Context<'_>,
) -> Result<Option<DocBlock>, BuildError> {
    node.last_doc_comment()
        .map(|comment| create_doc_block(comment, strategies, context))
        .transpose()
}

fn required_name<'n>(
    strategy: &'static str,
    name: &'n Option<String>,
) -> Result<&'n str, BuildError> {
    name.as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| BuildError::strategy(strategy, StrategyError::MissingName { kind: strategy }))
}

fn unsupported(strategy: &'static str) -> BuildError {
    BuildError::strategy(strategy, StrategyError::UnsupportedNode { expected: strategy })
}

fn to_arguments(parameters: &[Parameter]) -> Vec<Argument> {
    parameters
        .iter()
        .map(|p| Argument {
            name: p.name.clone(),
            type_hint: p.type_hint.clone(),
            default: p.default.clone(),
            by_reference: p.by_reference,
            variadic: p.variadic,
        })
        .collect()
}
