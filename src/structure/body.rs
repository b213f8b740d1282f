//! Types to represent and build HCL body structures.

use super::{Attribute, Block, Structure};
use crate::{Map, Value};

/// Represents an HCL config file body.
///
/// A `Body` consists of zero or more [`Attribute`] and [`Block`] HCL structures in the order in
/// which they appear in the source. Attribute values are already evaluated.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Body(pub Vec<Structure>);

impl Body {
    /// Consumes `self` and returns the wrapped `Vec<Structure>`.
    pub fn into_inner(self) -> Vec<Structure> {
        self.0
    }

    /// Creates a new [`BodyBuilder`] to start building a new `Body`.
    pub fn builder() -> BodyBuilder {
        BodyBuilder::default()
    }

    /// An iterator visiting all structures within the `Body`.
    pub fn iter(&self) -> std::slice::Iter<'_, Structure> {
        self.0.iter()
    }

    /// An iterator visiting all attributes within the `Body`.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.iter().filter_map(Structure::as_attribute)
    }

    /// An iterator visiting all blocks within the `Body`.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.iter().filter_map(Structure::as_block)
    }

    /// Returns `true` if the body contains no structures.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the body into a map of attribute values and block bodies.
    ///
    /// Attributes are inserted under their key, later attributes overwriting earlier ones.
    /// Block bodies are nested one level per label below the block identifier. Blocks with the
    /// same identifier and labels are merged, keys of later blocks overwriting those of earlier
    /// ones. A block without labels merges its body directly into the object stored under its
    /// identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use hcl_lite::{Block, Body, Value};
    ///
    /// let body = Body::builder()
    ///     .add_block(Block::builder("variable").add_label("x").add_attribute(("default", 1)).build())
    ///     .add_block(Block::builder("variable").add_label("y").add_attribute(("default", 2)).build())
    ///     .build();
    ///
    /// let map = body.into_map();
    /// let variables = map["variable"].as_object().unwrap();
    ///
    /// assert_eq!(variables.keys().collect::<Vec<_>>(), ["x", "y"]);
    /// ```
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();

        for structure in self {
            match structure {
                Structure::Attribute(attr) => {
                    map.insert(attr.key, attr.value);
                }
                Structure::Block(block) => block.merge_into(&mut map),
            }
        }

        map
    }
}

impl From<Body> for Value {
    fn from(body: Body) -> Value {
        Value::Object(body.into_map())
    }
}

impl<T> FromIterator<T> for Body
where
    T: Into<Structure>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Body(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Body {
    type Item = Structure;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a Structure;
    type IntoIter = std::slice::Iter<'a, Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `BodyBuilder` builds a HCL [`Body`].
///
/// The builder allows to build the `Body` by adding attributes and other nested blocks via chained
/// method calls. A call to [`.build()`](BodyBuilder::build) produces the final `Body`.
///
/// ## Example
///
/// ```
/// use hcl_lite::{Block, Body};
///
/// let body = Body::builder()
///     .add_block(
///         Block::builder("resource")
///             .add_label("aws_s3_bucket")
///             .add_label("mybucket")
///             .add_attribute(("name", "mybucket"))
///             .build()
///     )
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct BodyBuilder(Vec<Structure>);

impl BodyBuilder {
    /// Adds an `Attribute` to the body.
    pub fn add_attribute<A>(self, attr: A) -> BodyBuilder
    where
        A: Into<Attribute>,
    {
        self.add_structure(attr.into())
    }

    /// Adds a `Block` to the body.
    pub fn add_block<B>(self, block: B) -> BodyBuilder
    where
        B: Into<Block>,
    {
        self.add_structure(block.into())
    }

    /// Adds a `Structure` to the body.
    pub fn add_structure<S>(mut self, structure: S) -> BodyBuilder
    where
        S: Into<Structure>,
    {
        self.0.push(structure.into());
        self
    }

    /// Consumes `self` and builds the [`Body`] from the structures added via the builder methods.
    pub fn build(self) -> Body {
        Body::from_iter(self.0)
    }
}
