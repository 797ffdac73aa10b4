//! Ordered field lists describing request and response bodies.

use std::borrow::Cow;

use crate::error::{IgniteError, Result};
use crate::serialization::{ObjectDataInput, ObjectDataOutput, Record, TypeDescriptor, Value};

/// A named, typed slot of a message body. The name is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: Cow<'static, str>,
    ty: TypeDescriptor,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<Cow<'static, str>>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wire type.
    pub fn ty(&self) -> TypeDescriptor {
        self.ty
    }
}

/// An ordered, immutable sequence of fields. Order is wire significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema from fields in wire order.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// A schema with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, ty: TypeDescriptor) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in wire order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Writes one value per field, in order.
    pub fn write(&self, out: &mut ObjectDataOutput, values: &[Value]) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(IgniteError::Encode(format!(
                "schema has {} fields but {} values were supplied",
                self.fields.len(),
                values.len()
            )));
        }
        for (field, value) in self.fields.iter().zip(values) {
            field.ty.write(out, value).map_err(|e| match e {
                IgniteError::Encode(msg) => {
                    IgniteError::Encode(format!("field '{}': {}", field.name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Reads every field, in order, into a record keyed by field name.
    pub fn read(&self, input: &mut ObjectDataInput<'_>) -> Result<Record> {
        let mut record = Record::new();
        for field in &self.fields {
            let value = field.ty.read(input).map_err(|e| match e {
                IgniteError::Decode(msg) => {
                    IgniteError::Decode(format!("field '{}': {}", field.name, msg))
                }
                other => other,
            })?;
            record.push(field.name.clone(), value);
        }
        Ok(record)
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<N: Into<Cow<'static, str>>> FromIterator<(N, TypeDescriptor)> for Schema {
    fn from_iter<I: IntoIterator<Item = (N, TypeDescriptor)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, ty)| Field::new(name, ty))
            .collect()
    }
}
