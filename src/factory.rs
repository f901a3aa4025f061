//! The file model builder.
//!
//! [`FileFactory`] parses one source file through an [`AstProvider`],
//! dispatches every top-level node to the strategy registry and collects the
//! resulting elements in a [`FileModel`]. The build runs at the centre of the
//! middleware pipeline configured at construction.

use std::sync::Arc;

use crate::ast::{AstProvider, Node};
use crate::error::{BuildError, ConfigError};
use crate::model::{DuplicatePolicy, FileModel};
use crate::pipeline::{compose, handler, CreateCommand, Handler, Middleware, MiddlewareCatalog, PipelineConfig};
use crate::source::{Candidate, SourceFile};
use crate::strategy::{create_doc_block, create_element, Context, StrategyRegistry};

/// Knobs of the default build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub duplicates: DuplicatePolicy,
}

/// Builds [`FileModel`]s from source files.
pub struct FileFactory {
    handler: Handler,
    stages: usize,
}

impl FileFactory {
    /// Factory running `middlewares` (outermost first) around the default build.
    pub fn new(provider: Arc<dyn AstProvider>, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self::with_options(provider, middlewares, BuildOptions::default())
    }

    pub fn with_options(
        provider: Arc<dyn AstProvider>,
        middlewares: Vec<Arc<dyn Middleware>>,
        options: BuildOptions,
    ) -> Self {
        let stages = middlewares.len();
        let terminal = handler(move |command| build(provider.as_ref(), command, options));
        Self {
            handler: compose(middlewares, terminal),
            stages,
        }
    }

    /// Factory whose middlewares are named in configuration.
    ///
    /// Every stage is resolved through `catalog` up front; an unknown or empty
    /// name fails here and no factory is created.
    pub fn from_config(
        provider: Arc<dyn AstProvider>,
        pipeline: &PipelineConfig,
        catalog: &MiddlewareCatalog,
        options: BuildOptions,
    ) -> Result<Self, ConfigError> {
        let middlewares = catalog.resolve(pipeline)?;
        Ok(Self::with_options(provider, middlewares, options))
    }

    /// Number of middlewares wrapped around the default build.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Whether this factory can build a model for `candidate`.
    ///
    /// Concrete source files qualify: any loaded [`SourceFile`], on disk or
    /// in memory, and a path naming an existing regular file. Bare text has
    /// no path to key a model by and is refused.
    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        match candidate {
            Candidate::File(_) => true,
            Candidate::Path(path) => path.is_file(),
            Candidate::Text(_) => false,
        }
    }

    /// Build the model of `file`.
    pub fn create(
        &self,
        file: &dyn SourceFile,
        strategies: &StrategyRegistry,
    ) -> Result<FileModel, BuildError> {
        (self.handler)(CreateCommand::new(file, strategies))
    }
}

/// The default build at the centre of the pipeline.
fn build(
    provider: &dyn AstProvider,
    command: CreateCommand<'_>,
    options: BuildOptions,
) -> Result<FileModel, BuildError> {
    let file = command.file;
    let nodes = provider.parse(file.contents())?;

    let mut model = FileModel::new(file.path(), file.hash());
    let doc_block = {
        let mut context = Context::new(file.path(), &mut model, options.duplicates);
        for node in &nodes {
            let element = create_element(node, command.strategies, &mut context)?;
            context.insert(element)?;
        }

        // only the first node can carry the file-level doc block
        match nodes.first().and_then(Node::last_doc_comment) {
            Some(comment) => Some(create_doc_block(comment, command.strategies, &mut context)?),
            None => None,
        }
    };
    model.set_doc_block(doc_block);

    tracing::trace!(path = file.path(), nodes = nodes.len(), "default build finished");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        ClassSyntax, Comment, FunctionSyntax, InterfaceSyntax, NamespaceSyntax, Syntax,
        TraitSyntax,
    };
    use crate::docblock::{DocBlockParser, StandardDocBlockParser};
    use crate::error::ParseError;
    use crate::model::{DocBlock, Fqsen};
    use crate::pipeline::Next;
    use crate::source::InMemoryFile;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns fixed nodes and counts how often it was asked to parse.
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

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AstProvider for Scripted {
        fn parse(&self, _source: &str) -> Result<Vec<Node>, ParseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.nodes.clone())
        }
    }

    struct Failing;

    impl AstProvider for Failing {
        fn parse(&self, _source: &str) -> Result<Vec<Node>, ParseError> {
            Err(ParseError::Syntax {
                line: 1,
                column: 7,
                snippet: "class".to_string(),
            })
        }
    }

    /// Returns a fixed model without calling `next`.
    struct Fixed(FileModel);

    impl Middleware for Fixed {
        fn execute(&self, _command: CreateCommand<'_>, _next: Next<'_>) -> Result<FileModel, BuildError> {
            Ok(self.0.clone())
        }
    }

    fn fqsen(value: &str) -> Fqsen {
        Fqsen::new(value).unwrap()
    }

    fn named(syntax: Syntax) -> Node {
        Node::new(syntax)
    }

    fn build_with(provider: Arc<dyn AstProvider>) -> Result<FileModel, BuildError> {
        let factory = FileFactory::new(provider, Vec::new());
        let file = InMemoryFile::new("src/a.php", "<?php");
        factory.create(&file, &StrategyRegistry::default())
    }

    fn parsed(comment: &str) -> DocBlock {
        StandardDocBlockParser::new().parse(comment).unwrap()
    }

    #[test]
    fn test_single_node_per_kind() {
        let cases = vec![
            (
                named(Syntax::Class(ClassSyntax {
                    name: Some("Foo".to_string()),
                    ..Default::default()
                })),
                "\\Foo",
            ),
            (
                named(Syntax::Interface(InterfaceSyntax {
                    name: Some("Bar".to_string()),
                    ..Default::default()
                })),
                "\\Bar",
            ),
            (
                named(Syntax::Trait(TraitSyntax {
                    name: Some("Baz".to_string()),
                    ..Default::default()
                })),
                "\\Baz",
            ),
            (
                named(Syntax::Function(FunctionSyntax {
                    name: Some("qux".to_string()),
                    ..Default::default()
                })),
                "\\qux()",
            ),
            (
                named(Syntax::Namespace(NamespaceSyntax {
                    name: Some("Vendor\\Pkg".to_string()),
                    body: Vec::new(),
                })),
                "\\Vendor\\Pkg",
            ),
        ];

        for (node, expected) in cases {
            let kind = node.kind();
            let model = build_with(Scripted::new(vec![node])).unwrap();
            let key = fqsen(expected);
            let found = match kind.as_str() {
                "class" => model.classes().contains_key(&key),
                "interface" => model.interfaces().contains_key(&key),
                "trait" => model.traits().contains_key(&key),
                "function" => model.functions().contains_key(&key),
                "namespace" => model.namespaces().contains_key(&key),
                other => panic!("unexpected kind {}", other),
            };
            assert!(found, "{} not stored under {}", kind, expected);
            assert_eq!(model.element_count(), 1, "{}", kind);
        }
    }

    #[test]
    fn test_empty_node_list() {
        let model = build_with(Scripted::new(Vec::new())).unwrap();
        assert!(model.is_empty());
        assert!(model.doc_block().is_none());
        assert_eq!(model.path(), "src/a.php");
        assert_eq!(model.hash(), InMemoryFile::new("", "<?php").hash());
    }

    fn function_with(comments: Vec<Comment>) -> Node {
        named(Syntax::Function(FunctionSyntax {
            name: Some("f".to_string()),
            ..Default::default()
        }))
        .with_comments(comments)
    }

    #[test]
    fn test_file_doc_block_from_only_comment() {
        let text = "/**\n * File summary.\n *\n * @package Demo\n */";
        let model = build_with(Scripted::new(vec![function_with(vec![Comment::doc(text)])])).unwrap();
        assert_eq!(model.doc_block(), Some(&parsed(text)));
    }

    #[test]
    fn test_file_doc_block_skips_ordinary_comment() {
        let model = build_with(Scripted::new(vec![function_with(vec![
            Comment::plain("// @codingStandardsIgnoreStart"),
            Comment::doc("/** Real doc. */"),
        ])]))
        .unwrap();
        assert_eq!(model.doc_block(), Some(&parsed("/** Real doc. */")));
    }

    #[test]
    fn test_file_doc_block_is_last_doc_comment() {
        let model = build_with(Scripted::new(vec![function_with(vec![
            Comment::doc("/** First. */"),
            Comment::doc("/** Second. */"),
        ])]))
        .unwrap();
        assert_eq!(model.doc_block().unwrap().summary, "Second.");
    }

    #[test]
    fn test_only_first_node_provides_file_doc_block() {
        let model = build_with(Scripted::new(vec![
            function_with(Vec::new()),
            named(Syntax::Class(ClassSyntax {
                name: Some("Later".to_string()),
                ..Default::default()
            }))
            .with_comments(vec![Comment::doc("/** Not the file. */")]),
        ]))
        .unwrap();
        assert!(model.doc_block().is_none());
        assert!(model.classes()[&fqsen("\\Later")].doc_block.is_some());
    }

    #[test]
    fn test_zero_middlewares_matches_default_build() {
        let nodes = vec![
            named(Syntax::Namespace(NamespaceSyntax {
                name: Some("App".to_string()),
                body: vec![function_with(vec![Comment::doc("/** Run. */")])],
            }))
            .with_comments(vec![Comment::doc("/** File. */")]),
        ];
        let provider = Scripted::new(nodes);
        let file = InMemoryFile::new("a.php", "<?php");
        let strategies = StrategyRegistry::default();

        let plain = FileFactory::new(provider.clone(), Vec::new());
        let direct = build(provider.as_ref(), CreateCommand::new(&file, &strategies), BuildOptions::default());
        assert_eq!(plain.create(&file, &strategies), direct);
        assert_eq!(plain.stages(), 0);
    }

    #[test]
    fn test_short_circuit_skips_default_build() {
        let provider = Scripted::new(vec![named(Syntax::Other {
            kind: "enum_declaration".to_string(),
            text: String::new(),
        })]);
        let fixed = FileModel::new("fixed.php", "cafe");
        let stage: Arc<dyn Middleware> = Arc::new(Fixed(fixed.clone()));
        let factory = FileFactory::new(provider.clone(), vec![stage]);

        let file = InMemoryFile::new("a.php", "<?php");
        let model = factory.create(&file, &StrategyRegistry::default()).unwrap();
        assert_eq!(model, fixed);
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_invalid_middleware_configuration() {
        let provider = Scripted::new(Vec::new());
        let result = FileFactory::from_config(
            provider.clone(),
            &PipelineConfig::new(["trace", "not-a-middleware"]),
            &MiddlewareCatalog::with_defaults(),
            BuildOptions::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidConfiguration { .. })));
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_from_config_builds_through_named_stages() {
        let provider = Scripted::new(vec![function_with(Vec::new())]);
        let factory = FileFactory::from_config(
            provider.clone(),
            &PipelineConfig::new(["trace", "cache"]),
            &MiddlewareCatalog::with_defaults(),
            BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(factory.stages(), 2);

        let file = InMemoryFile::new("a.php", "<?php");
        let strategies = StrategyRegistry::default();
        let first = factory.create(&file, &strategies).unwrap();
        let second = factory.create(&file, &strategies).unwrap();
        assert_eq!(first, second);
        // the cache stage answered the second request
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_unregistered_node_kind() {
        let provider = Scripted::new(vec![
            function_with(Vec::new()),
            named(Syntax::Other {
                kind: "enum_declaration".to_string(),
                text: "enum Suit {}".to_string(),
            }),
        ]);
        let err = build_with(provider).unwrap_err();
        assert_eq!(
            err,
            BuildError::NoMatchingStrategy {
                kind: "enum_declaration".to_string()
            }
        );
    }

    #[test]
    fn test_nested_unregistered_node_kind() {
        let provider = Scripted::new(vec![named(Syntax::Namespace(NamespaceSyntax {
            name: Some("App".to_string()),
            body: vec![named(Syntax::Other {
                kind: "expression_statement".to_string(),
                text: String::new(),
            })],
        }))]);
        assert!(matches!(
            build_with(provider),
            Err(BuildError::NoMatchingStrategy { .. })
        ));
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let err = build_with(Arc::new(Failing)).unwrap_err();
        assert_eq!(
            err,
            BuildError::Parse(ParseError::Syntax {
                line: 1,
                column: 7,
                snippet: "class".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_policy() {
        let twice = vec![function_with(Vec::new()), function_with(Vec::new())];
        let file = InMemoryFile::new("a.php", "<?php");
        let strategies = StrategyRegistry::default();

        let lenient = FileFactory::new(Scripted::new(twice.clone()), Vec::new());
        assert_eq!(lenient.create(&file, &strategies).unwrap().functions().len(), 1);

        let strict = FileFactory::with_options(
            Scripted::new(twice),
            Vec::new(),
            BuildOptions {
                duplicates: DuplicatePolicy::Reject,
            },
        );
        assert_eq!(
            strict.create(&file, &strategies).unwrap_err(),
            BuildError::DuplicateFqsen { fqsen: fqsen("\\f()") }
        );
    }

    #[test]
    fn test_reopened_namespace_is_merged() {
        let block = |name: &str| {
            named(Syntax::Namespace(NamespaceSyntax {
                name: Some("App".to_string()),
                body: vec![named(Syntax::Class(ClassSyntax {
                    name: Some(name.to_string()),
                    ..Default::default()
                }))],
            }))
        };
        let model = build_with(Scripted::new(vec![block("A"), block("B")])).unwrap();
        let ns = &model.namespaces()[&fqsen("\\App")];
        assert_eq!(ns.classes, vec![fqsen("\\App\\A"), fqsen("\\App\\B")]);
        assert_eq!(model.classes().len(), 2);
    }

    #[test]
    fn test_matches_only_concrete_files() {
        let factory = FileFactory::new(Scripted::new(Vec::new()), Vec::new());
        let file = InMemoryFile::new("a.php", "<?php");
        assert!(factory.matches(&Candidate::File(&file)));
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.php"), "<?php").unwrap();
        let local = crate::source::LocalFile::open(dir.path().join("b.php")).unwrap();
        assert!(factory.matches(&Candidate::File(&local)));
        assert!(!factory.matches(&Candidate::Text("<?php")));
        assert!(!factory.matches(&Candidate::Path(PathBuf::from("/no/such/file.php"))));
        assert!(!factory.matches(&Candidate::Path(std::env::temp_dir())));

        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(factory.matches(&Candidate::Path(tmp.path().to_path_buf())));
    }
}
