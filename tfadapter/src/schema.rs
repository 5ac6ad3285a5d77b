//! Schema types and builders
//!
//! Resources describe their attributes here. The engine owns plan/diff; a
//! schema describes the resource, validates configuration before any
//! lifecycle call and names the attributes that can only change by replacing
//! the entity.

use crate::types::{AttributePath, Diagnostic, Diagnostics, Dynamic, DynamicValue};
use crate::validator::Validator;
use std::sync::Arc;

/// AttributeType defines the type system for attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
}

impl AttributeType {
    fn accepts(&self, value: &Dynamic) -> bool {
        matches!(
            (self, value),
            (_, Dynamic::Null)
                | (_, Dynamic::Unknown)
                | (AttributeType::String, Dynamic::String(_))
                | (AttributeType::Number, Dynamic::Number(_))
                | (AttributeType::Bool, Dynamic::Bool(_))
                | (AttributeType::List(_), Dynamic::List(_))
                | (AttributeType::Map(_), Dynamic::Map(_))
        )
    }
}

/// Schema is returned by resources; version is used for state migration
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of attributes the remote API never returns
    pub fn sensitive_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.sensitive)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Names of attributes whose change forces replacement
    pub fn requires_replace_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Replace-only attributes that differ between `prior` and `planned`
    ///
    /// Unknown values on either side and null to null never force
    /// replacement. A null prior (nothing created yet) yields nothing.
    pub fn replacement_paths(&self, prior: &DynamicValue, planned: &DynamicValue) -> Vec<AttributePath> {
        if prior.is_null() {
            return Vec::new();
        }

        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .map(|a| AttributePath::new(&a.name))
            .filter(|path| {
                let before = prior.get(path).cloned().unwrap_or(Dynamic::Null);
                let after = planned.get(path).cloned().unwrap_or(Dynamic::Null);
                !matches!(
                    (&before, &after),
                    (Dynamic::Null, Dynamic::Null) | (Dynamic::Unknown, _) | (_, Dynamic::Unknown)
                ) && before != after
            })
            .collect()
    }

    /// Check required attributes, primitive types and attribute validators
    pub fn validate(&self, config: &DynamicValue) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for attr in &self.attributes {
            let path = AttributePath::new(&attr.name);
            let value = config.get(&path).cloned().unwrap_or(Dynamic::Null);

            if value.is_null() {
                if attr.required {
                    diagnostics.push(
                        Diagnostic::error(
                            format!("Missing required attribute '{}'", attr.name),
                            format!("The '{}' attribute must be set", attr.name),
                        )
                        .with_attribute(path),
                    );
                }
                continue;
            }

            if attr.computed && !attr.optional && !attr.required && !matches!(value, Dynamic::Unknown) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Attribute '{}' is read-only", attr.name),
                        format!("'{}' is computed by the remote API and cannot be configured", attr.name),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            if !attr.r#type.accepts(&value) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid type for '{}'", attr.name),
                        format!("expected {:?}, got {}", attr.r#type, value.type_name()),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            if matches!(value, Dynamic::Unknown) {
                continue;
            }

            for validator in &attr.validators {
                validator.validate(&value, &path, &mut diagnostics);
            }
        }

        diagnostics
    }
}

/// Attribute represents a single configuration attribute
#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub requires_replace: bool,
    pub validators: Vec<Arc<dyn Validator>>,
}

// Manual Debug implementation since validators don't implement Debug
impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("requires_replace", &self.requires_replace)
            .field(
                "validators",
                &self
                    .validators
                    .iter()
                    .map(|v| v.description())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// AttributeBuilder provides fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                requires_replace: false,
                validators: Vec::new(),
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive: hidden in output and never returned by the API
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Changing this attribute destroys and recreates the entity
    pub fn requires_replace(mut self) -> Self {
        self.attribute.requires_replace = true;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.attribute.validators.push(Arc::new(validator));
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                description: String::new(),
                attributes: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.push(attr);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
