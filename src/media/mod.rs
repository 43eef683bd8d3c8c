//! Media module for item representation and parsing.

pub mod item;
pub mod parser;

pub use item::{extension_for_filetype, Folder, Item, ResolvedAsset};
pub use parser::{parse_deviation, parse_folder, parse_public_entry};
