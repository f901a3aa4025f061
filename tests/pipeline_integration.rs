//! Integration tests for extending the builder from outside the crate.
//!
//! A scripted provider stands in for a parser so these tests do not depend
//! on the tree-sitter feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use phpreflect::ast::{ClassSyntax, Comment};
use phpreflect::error::{BuildError, ParseError};
use phpreflect::model::{Class, DocBlock, Element};
use phpreflect::pipeline::{CacheMiddleware, Next, TraceMiddleware};
use phpreflect::strategy::create_element;
use phpreflect::{
    AstProvider, Context, CreateCommand, FileFactory, FileModel, Fqsen, InMemoryFile, Middleware,
    MiddlewareCatalog, Node, PipelineConfig, ProjectFactoryStrategy, StandardDocBlockParser,
    StrategyRegistry, Syntax,
};

struct Scripted {
    nodes: Vec<Node>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(nodes: Vec<Node>) -> Arc<Self> {
        Arc::new(Self {
            nodes,
            calls: AtomicUsize::new(0),
        })
    }
}

impl AstProvider for Scripted {
    fn parse(&self, _source: &str) -> Result<Vec<Node>, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.nodes.clone())
    }
}

/// Models `enum` declarations as final classes.
struct EnumStrategy;

impl ProjectFactoryStrategy for EnumStrategy {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn supports(&self, node: &Node) -> bool {
        matches!(&node.syntax, Syntax::Other { kind, .. } if kind == "enum_declaration")
    }

    fn create(
        &self,
        node: &Node,
        _strategies: &StrategyRegistry,
        context: &mut Context<'_>,
    ) -> Result<Element, BuildError> {
        let Syntax::Other { text, .. } = &node.syntax else {
            unreachable!("supports only accepts enum declarations");
        };
        let name = text
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .trim_end_matches('{');
        let fqsen = context
            .namespace()
            .child(name)
            .map_err(|e| BuildError::strategy(self.name(), e))?;
        let mut class = Class::new(fqsen);
        class.is_final = true;
        Ok(Element::Class(class))
    }
}

/// Fills in a placeholder doc block for undocumented files.
struct DefaultDocBlock;

impl Middleware for DefaultDocBlock {
    fn execute(&self, command: CreateCommand<'_>, next: Next<'_>) -> Result<FileModel, BuildError> {
        let model = next(command)?;
        if model.doc_block().is_some() {
            return Ok(model);
        }
        Ok(model.with_doc_block(Some(DocBlock::new("Undocumented file."))))
    }
}

fn enum_node(source: &str) -> Node {
    Node::new(Syntax::Other {
        kind: "enum_declaration".to_string(),
        text: source.to_string(),
    })
}

fn class_node(name: &str) -> Node {
    Node::new(Syntax::Class(ClassSyntax {
        name: Some(name.to_string()),
        ..Default::default()
    }))
}

#[test]
fn test_extension_strategy_handles_other_nodes() {
    let provider = Scripted::new(vec![class_node("Card"), enum_node("enum Suit {}")]);
    let factory = FileFactory::new(provider, Vec::new());
    let file = InMemoryFile::new("cards.php", "<?php");

    // without the extension the enum has no strategy
    let standard = StrategyRegistry::default();
    assert!(matches!(
        factory.create(&file, &standard),
        Err(BuildError::NoMatchingStrategy { .. })
    ));

    let extended = StrategyRegistry::builder()
        .with_standard(Arc::new(StandardDocBlockParser::new()))
        .register(EnumStrategy)
        .build();
    let model = factory.create(&file, &extended).unwrap();
    let suit = &model.classes()[&Fqsen::new("\\Suit").unwrap()];
    assert!(suit.is_final);
    assert_eq!(model.classes().len(), 2);
}

#[test]
fn test_extension_strategy_is_used_for_nested_nodes() {
    let provider = Scripted::new(vec![Node::new(Syntax::Namespace(
        phpreflect::ast::NamespaceSyntax {
            name: Some("Game".to_string()),
            body: vec![enum_node("enum Rank {}")],
        },
    ))]);
    let factory = FileFactory::new(provider, Vec::new());
    let registry = StrategyRegistry::builder()
        .register(EnumStrategy)
        .with_standard(Arc::new(StandardDocBlockParser::new()))
        .build();

    let model = factory
        .create(&InMemoryFile::new("game.php", "<?php"), &registry)
        .unwrap();
    assert!(model.classes().contains_key(&Fqsen::new("\\Game\\Rank").unwrap()));
    assert_eq!(model.namespaces()[&Fqsen::new("\\Game").unwrap()].classes.len(), 1);
}

#[test]
fn test_transforming_middleware() {
    let documented = class_node("A").with_comments(vec![Comment::doc("/** Has docs. */")]);
    let strategies = StrategyRegistry::default();
    let stage: Arc<dyn Middleware> = Arc::new(DefaultDocBlock);

    let factory = FileFactory::new(Scripted::new(vec![class_node("A")]), vec![stage.clone()]);
    let model = factory
        .create(&InMemoryFile::new("a.php", ""), &strategies)
        .unwrap();
    assert_eq!(model.doc_block().unwrap().summary, "Undocumented file.");
    assert_eq!(model.classes().len(), 1);

    let factory = FileFactory::new(Scripted::new(vec![documented]), vec![stage]);
    let model = factory
        .create(&InMemoryFile::new("a.php", ""), &strategies)
        .unwrap();
    assert_eq!(model.doc_block().unwrap().summary, "Has docs.");
}

#[test]
fn test_typed_and_named_stages_compose() {
    let provider = Scripted::new(vec![class_node("A")]);
    let trace: Arc<dyn Middleware> = Arc::new(TraceMiddleware);
    let cache: Arc<dyn Middleware> = Arc::new(CacheMiddleware::new());
    let typed = FileFactory::new(provider.clone(), vec![trace, cache]);

    let catalog = MiddlewareCatalog::with_defaults().register("docs", || Arc::new(DefaultDocBlock));
    let named = FileFactory::from_config(
        provider.clone(),
        &PipelineConfig::new(["trace", "docs", "cache"]),
        &catalog,
        Default::default(),
    )
    .unwrap();

    let file = InMemoryFile::new("a.php", "<?php class A {}");
    let strategies = StrategyRegistry::default();
    let plain = typed.create(&file, &strategies).unwrap();
    typed.create(&file, &strategies).unwrap();
    assert!(plain.doc_block().is_none());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let documented = named.create(&file, &strategies).unwrap();
    assert!(documented.doc_block().is_some());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_strategies_can_dispatch_through_the_registry() {
    let strategies = StrategyRegistry::default();
    let mut model = FileModel::new("a.php", "h");
    let mut context = Context::new("a.php", &mut model, Default::default());

    let element = create_element(&class_node("Direct"), &strategies, &mut context).unwrap();
    context.insert(element).unwrap();
    assert!(model.classes().contains_key(&Fqsen::new("\\Direct").unwrap()));
}

#[test]
fn test_cached_model_is_not_shared_across_registries() {
    let provider = Scripted::new(vec![class_node("A")]);
    let cache: Arc<dyn Middleware> = Arc::new(CacheMiddleware::new());
    let factory = FileFactory::new(provider.clone(), vec![cache]);
    let file = InMemoryFile::new("a.php", "<?php class A {}");

    let standard = StrategyRegistry::default();
    factory.create(&file, &standard).unwrap();

    let empty = StrategyRegistry::builder().build();
    assert!(matches!(
        factory.create(&file, &empty),
        Err(BuildError::NoMatchingStrategy { .. })
    ));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}
