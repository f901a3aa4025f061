use super::members::member_fqsen;
use super::{
    doc_block_for, required_name, unsupported, Context, ProjectFactoryStrategy, StrategyRegistry,
};
use crate::ast::{Node, Syntax};
use crate::error::BuildError;
use crate::model::{ClassConstant, Constant, Element};

/// Builds `const` declarations at namespace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantStrategy;

impl ProjectFactoryStrategy for ConstantStrategy {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Constant(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Constant(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;
        let fqsen = context
            .namespace()
            .child(name)
            .map_err(|e| BuildError::strategy(self.name(), e))?;

        Ok(Element::Constant(Constant {
            fqsen,
            doc_block: doc_block_for(node, strategies, context)?,
            value: syntax.value.clone(),
            location: node.span.location(),
        }))
    }
}

/// Builds `const` declarations inside class and interface bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassConstantStrategy;

impl ProjectFactoryStrategy for ClassConstantStrategy {
    fn name(&self) -> &'static str {
        "class constant"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::ClassConstant(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::ClassConstant(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;
        let fqsen = member_fqsen(self.name(), name, context)?;

        Ok(Element::ClassConstant(ClassConstant {
            fqsen,
            doc_block: doc_block_for(node, strategies, context)?,
            value: syntax.value.clone(),
            visibility: syntax.modifiers.visibility.unwrap_or_default(),
            location: node.span.location(),
        }))
    }
}
