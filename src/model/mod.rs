//! Semantic model of a PHP source file.

mod docblock;
mod elements;
mod file;
mod fqsen;

pub use docblock::{DocBlock, Tag};
pub use elements::{
    Argument, Class, ClassConstant, Constant, Element, Function, Interface, Location, Method,
    Namespace, Property, Trait, TraitUse, Visibility,
};
pub use file::{fingerprint, DuplicatePolicy, FileModel};
pub use fqsen::{Fqsen, FqsenError};
pub(crate) use fqsen::LABEL;
