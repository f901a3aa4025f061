//! The per-file semantic model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Class, Constant, DocBlock, Element, Fqsen, Function, Interface, Namespace, Trait};
use crate::error::BuildError;

/// What to do when two declarations of a file share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the last declaration (logged as a warning).
    #[default]
    Overwrite,
    /// Fail the build with `BuildError::DuplicateFqsen`.
    Reject,
}

/// Lowercase hex SHA-256 of the source text.
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Declarations and documentation of one source file.
///
/// All collections are flat: elements declared inside a namespace are keyed
/// by their absolute FQSEN next to top-level ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileModel {
    path: String,
    hash: String,
    doc_block: Option<DocBlock>,
    namespaces: BTreeMap<Fqsen, Namespace>,
    classes: BTreeMap<Fqsen, Class>,
    interfaces: BTreeMap<Fqsen, Interface>,
    traits: BTreeMap<Fqsen, Trait>,
    functions: BTreeMap<Fqsen, Function>,
    constants: BTreeMap<Fqsen, Constant>,
}

impl FileModel {
    /// Create an empty model.
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
            doc_block: None,
            namespaces: BTreeMap::new(),
            classes: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            traits: BTreeMap::new(),
            functions: BTreeMap::new(),
            constants: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Content fingerprint, for change detection.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }

    pub fn namespaces(&self) -> &BTreeMap<Fqsen, Namespace> {
        &self.namespaces
    }

    pub fn classes(&self) -> &BTreeMap<Fqsen, Class> {
        &self.classes
    }

    pub fn interfaces(&self) -> &BTreeMap<Fqsen, Interface> {
        &self.interfaces
    }

    pub fn traits(&self) -> &BTreeMap<Fqsen, Trait> {
        &self.traits
    }

    pub fn functions(&self) -> &BTreeMap<Fqsen, Function> {
        &self.functions
    }

    pub fn constants(&self) -> &BTreeMap<Fqsen, Constant> {
        &self.constants
    }

    /// Total number of stored declarations, namespaces included.
    pub fn element_count(&self) -> usize {
        self.namespaces.len()
            + self.classes.len()
            + self.interfaces.len()
            + self.traits.len()
            + self.functions.len()
            + self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0 && self.doc_block.is_none()
    }

    /// Replace the file-level doc block.
    pub fn with_doc_block(mut self, doc_block: Option<DocBlock>) -> Self {
        self.doc_block = doc_block;
        self
    }

    /// Add a declaration, overwriting any previous one with the same name.
    pub fn with_element(mut self, element: Element) -> Result<Self, BuildError> {
        self.insert(element, DuplicatePolicy::Overwrite)?;
        Ok(self)
    }

    pub(crate) fn set_doc_block(&mut self, doc_block: Option<DocBlock>) {
        self.doc_block = doc_block;
    }

    /// Store an element in the collection selected by its kind.
    ///
    /// Reopened namespaces are merged instead of replaced, so they never
    /// count as duplicates.
    pub(crate) fn insert(
        &mut self,
        element: Element,
        policy: DuplicatePolicy,
    ) -> Result<(), BuildError> {
        match element {
            Element::Namespace(ns) => {
                match self.namespaces.get_mut(&ns.fqsen) {
                    Some(existing) => existing.merge(ns),
                    None => {
                        self.namespaces.insert(ns.fqsen.clone(), ns);
                    }
                }
                Ok(())
            }
            Element::Class(e) => store(&mut self.classes, e.fqsen.clone(), e, policy),
            Element::Interface(e) => store(&mut self.interfaces, e.fqsen.clone(), e, policy),
            Element::Trait(e) => store(&mut self.traits, e.fqsen.clone(), e, policy),
            Element::Function(e) => store(&mut self.functions, e.fqsen.clone(), e, policy),
            Element::Constant(e) => store(&mut self.constants, e.fqsen.clone(), e, policy),
            other => Err(BuildError::MisplacedElement { kind: other.kind() }),
        }
    }
}

fn store<T>(
    map: &mut BTreeMap<Fqsen, T>,
    fqsen: Fqsen,
    value: T,
    policy: DuplicatePolicy,
) -> Result<(), BuildError> {
    if map.contains_key(&fqsen) {
        match policy {
            DuplicatePolicy::Reject => return Err(BuildError::DuplicateFqsen { fqsen }),
            DuplicatePolicy::Overwrite => {
                tracing::warn!(fqsen = %fqsen, "duplicate declaration, keeping the last one");
            }
        }
    }
    map.insert(fqsen, value);
    Ok(())
}
