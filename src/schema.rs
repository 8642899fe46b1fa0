//! Schema value types callers co-locate with parse results.
//!
//! These are plain data: they describe which attributes and child elements
//! an element is allowed to carry, for validation layers built on top of
//! the parser. Nothing in the parser itself consults them.

/// What an attribute of a schema element looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    name: String,
    required: bool,
}

impl AttributeSchema {
    /// Describe an attribute by name.
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        AttributeSchema {
            name: name.into(),
            required,
        }
    }

    /// The attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the attribute must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// What a child element of a schema element looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildElementSchema {
    name: String,
    required: bool,
    at_most_one: bool,
}

impl ChildElementSchema {
    /// Describe a child element by name.
    pub fn new(name: impl Into<String>, required: bool, at_most_one: bool) -> Self {
        ChildElementSchema {
            name: name.into(),
            required,
            at_most_one,
        }
    }

    /// The child element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether at least one such child must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether more than one such child is disallowed.
    pub fn is_at_most_one(&self) -> bool {
        self.at_most_one
    }
}

/// The allowed shape of one element: its attributes, its child elements
/// and whether it may hold text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSchema {
    name: String,
    attributes: Vec<AttributeSchema>,
    children: Vec<ChildElementSchema>,
    allows_text: bool,
}

impl ElementSchema {
    /// Describe an element by name.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<AttributeSchema>,
        children: Vec<ChildElementSchema>,
        allows_text: bool,
    ) -> Self {
        ElementSchema {
            name: name.into(),
            attributes,
            children,
            allows_text,
        }
    }

    /// The element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute descriptions, in declaration order.
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    /// The child element descriptions, in declaration order.
    pub fn children(&self) -> &[ChildElementSchema] {
        &self.children
    }

    /// Whether the element may hold text.
    pub fn allows_text(&self) -> bool {
        self.allows_text
    }

    /// The attributes that must be present.
    pub fn required_attributes(&self) -> impl Iterator<Item = &AttributeSchema> {
        self.attributes.iter().filter(|schema| schema.is_required())
    }

    /// The children that may appear at most once.
    pub fn at_most_one_children(&self) -> impl Iterator<Item = &ChildElementSchema> {
        self.children.iter().filter(|schema| schema.is_at_most_one())
    }
}
