//! Types to represent and build HCL blocks.

use super::{Attribute, Body, BodyBuilder, Structure};
use crate::{Map, Value};

/// Represents an HCL block which consists of a block identifier, zero or more block labels and a
/// block body.
///
/// In HCL syntax this is represented as:
///
/// ```hcl
/// block_identifier "block_label1" "block_label2" {
///   body
/// }
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    /// The block identifier.
    pub identifier: String,
    /// Zero or more block labels.
    pub labels: Vec<BlockLabel>,
    /// Represents the `Block`'s body.
    pub body: Body,
}

impl Block {
    /// Creates a new `Block` with an identifier and an empty body.
    pub fn new<I>(identifier: I) -> Block
    where
        I: Into<String>,
    {
        Block {
            identifier: identifier.into(),
            labels: Vec::new(),
            body: Body::default(),
        }
    }

    /// Creates a new [`BlockBuilder`] to start building a new `Block` with the provided
    /// identifier.
    pub fn builder<I>(identifier: I) -> BlockBuilder
    where
        I: Into<String>,
    {
        BlockBuilder::new(identifier)
    }

    /// Returns a reference to the block's identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns a reference to the block's labels.
    pub fn labels(&self) -> &[BlockLabel] {
        &self.labels
    }

    /// Returns a reference to the block's body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    // Nests the block body below `identifier → label... ` in `map`, merging it with an object
    // that is already there. Anything that is not an object is replaced.
    pub(super) fn merge_into(self, map: &mut Map<String, Value>) {
        merge_nested(
            map,
            self.identifier,
            self.labels.into_iter(),
            self.body.into_map(),
        );
    }
}

fn merge_nested<L>(map: &mut Map<String, Value>, key: String, mut labels: L, body: Map<String, Value>)
where
    L: Iterator<Item = BlockLabel>,
{
    let entry = map.entry(key).or_default();

    let mut object = match entry.take() {
        Value::Object(object) => object,
        _ => Map::new(),
    };

    match labels.next() {
        Some(label) => merge_nested(&mut object, label.into_inner(), labels, body),
        None => object.extend(body),
    }

    *entry = Value::Object(object);
}

impl From<Block> for Value {
    fn from(block: Block) -> Value {
        let mut map = Map::new();
        block.merge_into(&mut map);
        Value::Object(map)
    }
}

/// Represents an HCL block label.
///
/// In HCL syntax this can be represented either as a quoted string literal...
///
/// ```hcl
/// block_identifier "block_label1" {}
/// ```
///
/// ...or as a bare identifier:
///
/// ```hcl
/// block_identifier block_label1 {}
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BlockLabel {
    /// A bare HCL block label.
    Identifier(String),
    /// A quoted string literal.
    String(String),
}

impl BlockLabel {
    /// Consumes `self` and returns the `String` wrapped by the `BlockLabel`.
    pub fn into_inner(self) -> String {
        match self {
            BlockLabel::Identifier(ident) => ident,
            BlockLabel::String(string) => string,
        }
    }

    /// Borrows the `BlockLabel`'s inner value as `&str`.
    pub fn as_str(&self) -> &str {
        match self {
            BlockLabel::Identifier(ident) => ident,
            BlockLabel::String(string) => string,
        }
    }
}

impl<T> From<T> for BlockLabel
where
    T: Into<String>,
{
    fn from(v: T) -> BlockLabel {
        BlockLabel::String(v.into())
    }
}

/// `BlockBuilder` builds an HCL [`Block`].
///
/// The builder allows to build the `Block` by adding labels, attributes and other nested blocks
/// via chained method calls. A call to [`.build()`](BlockBuilder::build) produces the final
/// `Block`.
///
/// ## Example
///
/// ```
/// use hcl_lite::Block;
///
/// let block = Block::builder("resource")
///     .add_label("aws_s3_bucket")
///     .add_label("mybucket")
///     .add_attribute(("name", "mybucket"))
///     .add_block(
///         Block::builder("logging")
///             .add_attribute(("target_bucket", "mylogsbucket"))
///             .build()
///     )
///     .build();
/// ```
#[derive(Debug)]
pub struct BlockBuilder {
    identifier: String,
    labels: Vec<BlockLabel>,
    body: BodyBuilder,
}

impl BlockBuilder {
    /// Creates a new `BlockBuilder` to start building a new [`Block`] with the provided
    /// identifier.
    pub fn new<I>(identifier: I) -> BlockBuilder
    where
        I: Into<String>,
    {
        BlockBuilder {
            identifier: identifier.into(),
            labels: Vec::new(),
            body: Body::builder(),
        }
    }

    /// Adds a `BlockLabel`.
    pub fn add_label<L>(mut self, label: L) -> BlockBuilder
    where
        L: Into<BlockLabel>,
    {
        self.labels.push(label.into());
        self
    }

    /// Adds an `Attribute` to the block body.
    pub fn add_attribute<A>(mut self, attr: A) -> BlockBuilder
    where
        A: Into<Attribute>,
    {
        self.body = self.body.add_attribute(attr);
        self
    }

    /// Adds a `Block` to the block body.
    pub fn add_block<B>(mut self, block: B) -> BlockBuilder
    where
        B: Into<Block>,
    {
        self.body = self.body.add_block(block);
        self
    }

    /// Adds a `Structure` to the block body.
    pub fn add_structure<S>(mut self, structure: S) -> BlockBuilder
    where
        S: Into<Structure>,
    {
        self.body = self.body.add_structure(structure);
        self
    }

    /// Consumes `self` and builds the [`Block`] from the labels and body structures.
    pub fn build(self) -> Block {
        Block {
            identifier: self.identifier,
            labels: self.labels,
            body: self.body.build(),
        }
    }
}
