#![doc = include_str!("../README.md")]

mod element;
mod error;
pub mod ns;
mod parse;
mod path;
mod write;

pub use element::{Element, Name};
pub use error::XmlError;
pub use parse::parse;
pub use path::Path;
pub use write::to_string;
