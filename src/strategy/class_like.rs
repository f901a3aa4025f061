//! Classes, interfaces and traits.

use super::{
    create_element, doc_block_for, required_name, unsupported, Context, ProjectFactoryStrategy,
    StrategyRegistry,
};
use crate::ast::{Node, Syntax};
use crate::error::{BuildError, StrategyError};
use crate::model::{Class, Element, Fqsen, Interface, Trait};

/// Qualify a declared name with the current namespace.
fn declared(strategy: &'static str, name: &str, context: &Context<'_>) -> Result<Fqsen, BuildError> {
    context
        .namespace()
        .child(name)
        .map_err(|e| BuildError::strategy(strategy, e))
}

/// Turn a referenced name into an FQSEN.
///
/// Providers normally hand over absolute names; anything relative is taken
/// to live in the current namespace.
pub(super) fn referenced(
    strategy: &'static str,
    name: &str,
    context: &Context<'_>,
) -> Result<Fqsen, BuildError> {
    let fqsen = if name.starts_with('\\') {
        Fqsen::new(name)
    } else {
        context.namespace().child(name)
    };
    fqsen.map_err(|e| BuildError::strategy(strategy, e))
}

/// Build every member node of `owner` in the owner's scope.
fn members(
    nodes: &[Node],
    owner: &Fqsen,
    strategies: &StrategyRegistry,
    context: &mut Context<'_>,
) -> Result<Vec<Element>, BuildError> {
    let mut scope = context.enter_owner(owner.clone());
    nodes
        .iter()
        .map(|node| create_element(node, strategies, &mut scope))
        .collect()
}

fn unexpected(strategy: &'static str, element: &Element) -> BuildError {
    BuildError::strategy(
        strategy,
        StrategyError::UnexpectedElement {
            expected: "class member",
            found: element.kind(),
        },
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassStrategy;

impl ProjectFactoryStrategy for ClassStrategy {
    fn name(&self) -> &'static str {
        "class"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Class(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Class(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;

        let mut class = Class::new(declared(self.name(), name, context)?);
        class.doc_block = doc_block_for(node, strategies, context)?;
        class.location = node.span.location();
        class.is_abstract = syntax.modifiers.is_abstract;
        class.is_final = syntax.modifiers.is_final;
        class.parent = syntax
            .extends
            .as_deref()
            .map(|parent| referenced(self.name(), parent, context))
            .transpose()?;
        class.interfaces = syntax
            .implements
            .iter()
            .map(|i| referenced(self.name(), i, context))
            .collect::<Result<_, _>>()?;

        for member in members(&syntax.members, &class.fqsen, strategies, context)? {
            match member {
                Element::Method(m) => class.methods.push(m),
                Element::Property(p) => class.properties.push(p),
                Element::ClassConstant(c) => class.constants.push(c),
                Element::TraitUse(u) => class.used_traits.extend(u.traits),
                other => return Err(unexpected(self.name(), &other)),
            }
        }

        Ok(Element::Class(class))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceStrategy;

impl ProjectFactoryStrategy for InterfaceStrategy {
    fn name(&self) -> &'static str {
        "interface"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Interface(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Interface(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;

        let mut interface = Interface::new(declared(self.name(), name, context)?);
        interface.doc_block = doc_block_for(node, strategies, context)?;
        interface.location = node.span.location();
        interface.parents = syntax
            .extends
            .iter()
            .map(|p| referenced(self.name(), p, context))
            .collect::<Result<_, _>>()?;

        for member in members(&syntax.members, &interface.fqsen, strategies, context)? {
            match member {
                Element::Method(m) => interface.methods.push(m),
                Element::ClassConstant(c) => interface.constants.push(c),
                other => return Err(unexpected(self.name(), &other)),
            }
        }

        Ok(Element::Interface(interface))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TraitStrategy;

impl ProjectFactoryStrategy for TraitStrategy {
    fn name(&self) -> &'static str {
        "trait"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Trait(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Trait(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };
        let name = required_name(self.name(), &syntax.name)?;

        let mut item = Trait::new(declared(self.name(), name, context)?);
        item.doc_block = doc_block_for(node, strategies, context)?;
        item.location = node.span.location();

        for member in members(&syntax.members, &item.fqsen, strategies, context)? {
            match member {
                Element::Method(m) => item.methods.push(m),
                Element::Property(p) => item.properties.push(p),
                Element::TraitUse(u) => item.used_traits.extend(u.traits),
                other => return Err(unexpected(self.name(), &other)),
            }
        }

        Ok(Element::Trait(item))
    }
}
