//! Methods, properties and trait uses inside class-like bodies.

use super::class_like::referenced;
use super::{
    doc_block_for, required_name, to_arguments, unsupported, Context, ProjectFactoryStrategy,
    StrategyRegistry,
};
use crate::ast::{Node, Syntax};
use crate::error::{BuildError, StrategyError};
use crate::model::{Element, Fqsen, Method, Property, TraitUse};

/// FQSEN of the member `member` of the element currently being built.
pub(super) fn member_fqsen(
    strategy: &'static str,
    member: &str,
    context: &Context<'_>,
) -> Result<Fqsen, BuildError> {
    let owner = context
        .owner()
        .ok_or_else(|| BuildError::strategy(strategy, StrategyError::MissingOwner { kind: strategy }))?;
    owner
        .member(member)
        .map_err(|e| BuildError::strategy(strategy, e))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MethodStrategy;

impl ProjectFactoryStrategy for MethodStrategy {
    fn name(&self) -> &'static str {
        "method"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Method(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Method(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;
        let fqsen = member_fqsen(self.name(), &format!("{}()", name), context)?;

        Ok(Element::Method(Method {
            fqsen,
            doc_block: doc_block_for(node, strategies, context)?,
            visibility: syntax.modifiers.visibility.unwrap_or_default(),
            is_static: syntax.modifiers.is_static,
            is_abstract: syntax.modifiers.is_abstract,
            is_final: syntax.modifiers.is_final,
            arguments: to_arguments(&syntax.parameters),
            return_type: syntax.return_type.clone(),
            location: node.span.location(),
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyStrategy;

impl ProjectFactoryStrategy for PropertyStrategy {
    fn name(&self) -> &'static str {
        "property"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Property(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Property(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;
        let fqsen = member_fqsen(self.name(), &format!("${}", name.trim_start_matches('$')), context)?;

        Ok(Element::Property(Property {
            fqsen,
            doc_block: doc_block_for(node, strategies, context)?,
            visibility: syntax.modifiers.visibility.unwrap_or_default(),
            is_static: syntax.modifiers.is_static,
            type_hint: syntax.type_hint.clone(),
            default: syntax.default.clone(),
            location: node.span.location(),
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TraitUseStrategy;

impl ProjectFactoryStrategy for TraitUseStrategy {
    fn name(&self) -> &'static str {
        "trait use"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::TraitUse(_))
    }

    fn create(
        &self,
        node: &Node,
        _strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::TraitUse(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        if context.owner().is_none() {
            return Err(BuildError::strategy(
                self.name(),
                StrategyError::MissingOwner { kind: self.name() },
            ));
        }

        let traits = syntax
            .traits
            .iter()
            .map(|t| referenced(self.name(), t, context))
            .collect::<Result<_, _>>()?;
        Ok(Element::TraitUse(TraitUse { traits }))
    }
}
