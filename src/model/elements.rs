//! Model elements produced by construction strategies.

use std::fmt;

use serde::Serialize;

use super::{DocBlock, Fqsen};

/// Position of a declaration in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A namespace and the elements this file declares in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Namespace {
    pub fqsen: Fqsen,
    pub classes: Vec<Fqsen>,
    pub interfaces: Vec<Fqsen>,
    pub traits: Vec<Fqsen>,
    pub functions: Vec<Fqsen>,
    pub constants: Vec<Fqsen>,
}

impl Namespace {
    pub fn new(fqsen: Fqsen) -> Self {
        Self {
            fqsen,
            classes: Vec::new(),
            interfaces: Vec::new(),
            traits: Vec::new(),
            functions: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Fold the members of a reopened block of the same namespace into this one.
    pub fn merge(&mut self, other: Namespace) {
        fn extend_unique(into: &mut Vec<Fqsen>, from: Vec<Fqsen>) {
            for fqsen in from {
                if !into.contains(&fqsen) {
                    into.push(fqsen);
                }
            }
        }

        extend_unique(&mut self.classes, other.classes);
        extend_unique(&mut self.interfaces, other.interfaces);
        extend_unique(&mut self.traits, other.traits);
        extend_unique(&mut self.functions, other.functions);
        extend_unique(&mut self.constants, other.constants);
    }

    /// Record a member declared inside this namespace.
    pub(crate) fn record(&mut self, element: &Element) {
        let (list, fqsen) = match element {
            Element::Class(c) => (&mut self.classes, &c.fqsen),
            Element::Interface(i) => (&mut self.interfaces, &i.fqsen),
            Element::Trait(t) => (&mut self.traits, &t.fqsen),
            Element::Function(f) => (&mut self.functions, &f.fqsen),
            Element::Constant(c) => (&mut self.constants, &c.fqsen),
            _ => return,
        };
        if !list.contains(fqsen) {
            list.push(fqsen.clone());
        }
    }
}

/// A function or method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Name without the leading `$`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Source text of the default value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub by_reference: bool,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub arguments: Vec<Argument>,
    pub return_type: Option<String>,
    pub location: Location,
}

impl Function {
    pub fn new(fqsen: Fqsen) -> Self {
        Self {
            fqsen,
            doc_block: None,
            arguments: Vec::new(),
            return_type: None,
            location: Location::default(),
        }
    }
}

/// A namespace-level constant (`const FOO = 1;`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constant {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    /// Source text of the value expression.
    pub value: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassConstant {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub value: String,
    pub visibility: Visibility,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub type_hint: Option<String>,
    pub default: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub arguments: Vec<Argument>,
    pub return_type: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub parent: Option<Fqsen>,
    pub interfaces: Vec<Fqsen>,
    pub used_traits: Vec<Fqsen>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub constants: Vec<ClassConstant>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub location: Location,
}

impl Class {
    pub fn new(fqsen: Fqsen) -> Self {
        Self {
            fqsen,
            doc_block: None,
            parent: None,
            interfaces: Vec::new(),
            used_traits: Vec::new(),
            is_abstract: false,
            is_final: false,
            constants: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub parents: Vec<Fqsen>,
    pub constants: Vec<ClassConstant>,
    pub methods: Vec<Method>,
    pub location: Location,
}

impl Interface {
    pub fn new(fqsen: Fqsen) -> Self {
        Self {
            fqsen,
            doc_block: None,
            parents: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
            location: Location::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trait {
    pub fqsen: Fqsen,
    pub doc_block: Option<DocBlock>,
    pub used_traits: Vec<Fqsen>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub location: Location,
}

impl Trait {
    pub fn new(fqsen: Fqsen) -> Self {
        Self {
            fqsen,
            doc_block: None,
            used_traits: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            location: Location::default(),
        }
    }
}

/// Traits pulled into a class body by a `use` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitUse {
    pub traits: Vec<Fqsen>,
}

/// Output of a single strategy invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Namespace(Namespace),
    Class(Class),
    Interface(Interface),
    Trait(Trait),
    Function(Function),
    Constant(Constant),
    Method(Method),
    Property(Property),
    ClassConstant(ClassConstant),
    TraitUse(TraitUse),
    DocBlock(DocBlock),
}

impl Element {
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Namespace(_) => "namespace",
            Element::Class(_) => "class",
            Element::Interface(_) => "interface",
            Element::Trait(_) => "trait",
            Element::Function(_) => "function",
            Element::Constant(_) => "constant",
            Element::Method(_) => "method",
            Element::Property(_) => "property",
            Element::ClassConstant(_) => "class constant",
            Element::TraitUse(_) => "trait use",
            Element::DocBlock(_) => "doc block",
        }
    }

    /// The element's name, if it has one.
    pub fn fqsen(&self) -> Option<&Fqsen> {
        match self {
            Element::Namespace(e) => Some(&e.fqsen),
            Element::Class(e) => Some(&e.fqsen),
            Element::Interface(e) => Some(&e.fqsen),
            Element::Trait(e) => Some(&e.fqsen),
            Element::Function(e) => Some(&e.fqsen),
            Element::Constant(e) => Some(&e.fqsen),
            Element::Method(e) => Some(&e.fqsen),
            Element::Property(e) => Some(&e.fqsen),
            Element::ClassConstant(e) => Some(&e.fqsen),
            Element::TraitUse(_) | Element::DocBlock(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fqsen(value: &str) -> Fqsen {
        Fqsen::new(value).unwrap()
    }

    #[test]
    fn test_namespace_record_and_merge() {
        let mut first = Namespace::new(fqsen("\\App"));
        first.record(&Element::Class(Class::new(fqsen("\\App\\Foo"))));
        first.record(&Element::Class(Class::new(fqsen("\\App\\Foo"))));
        assert_eq!(first.classes.len(), 1);

        let mut second = Namespace::new(fqsen("\\App"));
        second.record(&Element::Function(Function::new(fqsen("\\App\\run()"))));
        second.record(&Element::Class(Class::new(fqsen("\\App\\Foo"))));

        first.merge(second);
        assert_eq!(first.classes, vec![fqsen("\\App\\Foo")]);
        assert_eq!(first.functions, vec![fqsen("\\App\\run()")]);
    }

    #[test]
    fn test_element_kind_and_fqsen() {
        let element = Element::Trait(Trait::new(fqsen("\\T")));
        assert_eq!(element.kind(), "trait");
        assert_eq!(element.fqsen().map(Fqsen::as_str), Some("\\T"));

        let doc = Element::DocBlock(DocBlock::default());
        assert!(doc.fqsen().is_none());
    }
}
