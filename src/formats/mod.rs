//! The four CEGUI data file families and their version chains.

pub(crate) mod common;
pub mod font;
pub mod imageset;
pub mod layout;
pub mod scheme;
