#![doc = include_str!("../README.md")]
#![allow(clippy::should_implement_trait)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod json;
mod number;
pub mod parser;
pub mod structure;
pub mod testspec;
pub mod validate;
pub mod value;

pub use error::{Error, Location, Result};
pub use number::Number;
pub use parser::{parse, parse_body, parse_expression, parse_file};
pub use structure::{Attribute, Block, BlockBuilder, BlockLabel, Body, BodyBuilder, Structure};
pub use validate::validate;
pub use value::{Map, Value};
