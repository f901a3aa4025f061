use super::{
    doc_block_for, required_name, to_arguments, unsupported, Context, ProjectFactoryStrategy,
    StrategyRegistry,
};
use crate::ast::{Node, Syntax};
use crate::error::BuildError;
use crate::model::{Element, Function};

/// Builds global and namespaced functions, named `\Ns\name()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionStrategy;

impl ProjectFactoryStrategy for FunctionStrategy {
    fn name(&self) -> &'static str {
        "function"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Function(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Function(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;
        let fqsen = context
            .namespace()
            .child(&format!("{}()", name))
            .map_err(|e| BuildError::strategy(self.name(), e))?;

        let mut function = Function::new(fqsen);
        function.doc_block = doc_block_for(node, strategies, context)?;
        function.arguments = to_arguments(&syntax.parameters);
        function.return_type = syntax.return_type.clone();
        function.location = node.span.location();
        Ok(Element::Function(function))
    }
}
