//! Owned XML tree used by the layers, and the streaming root peek used by detectors.

mod sniff;
mod tree;

pub use sniff::{RootInfo, check_data_version, peek_root};
pub use tree::{Element, Node, parse, to_bytes};
