use super::{create_element, unsupported, Context, ProjectFactoryStrategy, StrategyRegistry};
use crate::ast::{Node, Syntax};
use crate::error::BuildError;
use crate::model::{Element, Fqsen, Namespace};

/// Builds namespaces and folds their declarations into the file model.
///
/// Nested elements are stored in the file's flat collections under their
/// absolute FQSEN; the returned [`Namespace`] only lists their names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceStrategy;

impl ProjectFactoryStrategy for NamespaceStrategy {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(node.syntax, Syntax::Namespace(_))
    }

    fn create(
        &self,
        node: &Node,
        strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Namespace(syntax) = &node.syntax else {
            return Err(unsupported(self.name()));
        };

        let fqsen = match &syntax.name {
            Some(name) => Fqsen::root()
                .child(name)
                .map_err(|e| BuildError::strategy(self.name(), e))?,
            None => Fqsen::root(),
        };

        let mut namespace = Namespace::new(fqsen.clone());
        let mut scope = context.enter(fqsen);
        for child in &syntax.body {
            let element = create_element(child, strategies, &mut scope)?;
            namespace.record(&element);
            scope.insert(element)?;
        }

        tracing::debug!(
            path = scope.path(),
            namespace = %namespace.fqsen,
            members = syntax.body.len(),
            "built namespace"
        );
        Ok(Element::Namespace(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassSyntax, FunctionSyntax, NamespaceSyntax};
    use crate::model::{DuplicatePolicy, FileModel};

    fn fqsen(value: &str) -> Fqsen {
        Fqsen::new(value).unwrap()
    }

    #[test]
    fn test_nested_declarations_are_flattened() {
        let node = Node::new(Syntax::Namespace(NamespaceSyntax {
            name: Some("My\\Space".to_string()),
            body: vec![
                Node::new(Syntax::Class(ClassSyntax {
                    name: Some("Foo".to_string()),
                    ..Default::default()
                })),
                Node::new(Syntax::Function(FunctionSyntax {
                    name: Some("bar".to_string()),
                    ..Default::default()
                })),
            ],
        }));

        let strategies = StrategyRegistry::default();
        let mut model = FileModel::new("a.php", "h");
        let element = {
            let mut context = Context::new("a.php", &mut model, DuplicatePolicy::Overwrite);
            NamespaceStrategy.create(&node, &strategies, &mut context).unwrap()
        };

        let Element::Namespace(ns) = element else {
            panic!("expected namespace");
        };
        assert_eq!(ns.fqsen, fqsen("\\My\\Space"));
        assert_eq!(ns.classes, vec![fqsen("\\My\\Space\\Foo")]);
        assert_eq!(ns.functions, vec![fqsen("\\My\\Space\\bar()")]);

        assert!(model.classes().contains_key(&fqsen("\\My\\Space\\Foo")));
        assert!(model.functions().contains_key(&fqsen("\\My\\Space\\bar()")));
        // the namespace itself is stored by the caller
        assert!(model.namespaces().is_empty());
    }

    #[test]
    fn test_unnamed_namespace_is_global() {
        let node = Node::new(Syntax::Namespace(NamespaceSyntax::default()));
        let strategies = StrategyRegistry::default();
        let mut model = FileModel::new("a.php", "h");
        let mut context = Context::new("a.php", &mut model, DuplicatePolicy::Overwrite);
        let element = NamespaceStrategy.create(&node, &strategies, &mut context).unwrap();
        assert_eq!(element.fqsen(), Some(&Fqsen::root()));
    }

    #[test]
    fn test_invalid_name_fails() {
        let node = Node::new(Syntax::Namespace(NamespaceSyntax {
            name: Some("Not Valid".to_string()),
            body: Vec::new(),
        }));
        let strategies = StrategyRegistry::default();
        let mut model = FileModel::new("a.php", "h");
        let mut context = Context::new("a.php", &mut model, DuplicatePolicy::Overwrite);
        let err = NamespaceStrategy.create(&node, &strategies, &mut context).unwrap_err();
        assert!(matches!(err, BuildError::Strategy { strategy: "namespace", .. }));
    }
}
