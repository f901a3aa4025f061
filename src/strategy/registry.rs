//! Ordered strategy lookup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{
    ClassConstantStrategy, ClassStrategy, ConstantStrategy, DocBlockStrategy, FunctionStrategy,
    InterfaceStrategy, MethodStrategy, NamespaceStrategy, ProjectFactoryStrategy,
    PropertyStrategy, TraitStrategy, TraitUseStrategy,
};
use crate::ast::Node;
use crate::docblock::{DocBlockParser, StandardDocBlockParser};
use crate::error::BuildError;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable, ordered set of construction strategies.
///
/// Lookup walks strategies in registration order and returns the first one
/// whose `supports` accepts the node, so ties are always broken in favour of
/// the earlier registration.
pub struct StrategyRegistry {
    id: u64,
    strategies: Vec<Box<dyn ProjectFactoryStrategy>>,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Registry with every built-in strategy, parsing doc comments with
    /// `parser`.
    pub fn standard(parser: Arc<dyn DocBlockParser>) -> Self {
        Self::builder().with_standard(parser).build()
    }

    /// Find the strategy for `node`.
    pub fn find_matching(&self, node: &Node) -> Result<&dyn ProjectFactoryStrategy, BuildError> {
        self.strategies
            .iter()
            .find(|s| s.supports(node))
            .map(|s| s.as_ref())
            .ok_or_else(|| BuildError::NoMatchingStrategy {
                kind: node.kind_name().to_string(),
            })
    }

    /// Identifier unique to this registry within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy names in lookup order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard(Arc::new(StandardDocBlockParser::new()))
    }
}

/// Collects strategies in the order they should be consulted.
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: Vec<Box<dyn ProjectFactoryStrategy>>,
}

impl StrategyRegistryBuilder {
    /// Append a strategy; it is consulted after everything registered so far.
    pub fn register<S>(mut self, strategy: S) -> Self
    where
        S: ProjectFactoryStrategy + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn register_boxed(mut self, strategy: Box<dyn ProjectFactoryStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Append the built-in strategies for every known node kind.
    pub fn with_standard(self, parser: Arc<dyn DocBlockParser>) -> Self {
        self.register(NamespaceStrategy)
            .register(ClassStrategy)
            .register(InterfaceStrategy)
            .register(TraitStrategy)
            .register(FunctionStrategy)
            .register(ConstantStrategy)
            .register(MethodStrategy)
            .register(PropertyStrategy)
            .register(ClassConstantStrategy)
            .register(TraitUseStrategy)
            .register(DocBlockStrategy::new(parser))
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            strategies: self.strategies,
        }
    }
}
