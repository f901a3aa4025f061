use std::sync::Arc;

use super::{unsupported, Context, ProjectFactoryStrategy, StrategyRegistry};
use crate::ast::{Node, Syntax};
use crate::docblock::DocBlockParser;
use crate::error::BuildError;
use crate::model::Element;

/// Parses documentation comments with the configured [`DocBlockParser`].
pub struct DocBlockStrategy {
    parser: Arc<dyn DocBlockParser>,
}

impl DocBlockStrategy {
    pub fn new(parser: Arc<dyn DocBlockParser>) -> Self {
        Self { parser }
    }
}

impl ProjectFactoryStrategy for DocBlockStrategy {
    fn name(&self) -> &'static str {
        "doc block"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::DocComment(_))
    }

    fn create(
        &self,
        node: &Node,
        _strategies: &StrategyRegistry,
        _context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::DocComment(comment) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        self.parser
            .parse(&comment.text)
            .map(Element::DocBlock)
            .map_err(|e| BuildError::strategy(self.name(), e))
    }
}
