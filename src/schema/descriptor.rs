//! Schema and field descriptors
//!
//! A schema is an ordered, immutable sequence of field descriptors. It is
//! owned by the collection layer and shared into segments behind an `Arc`;
//! nothing here mutates a built schema.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CuttleError;
use crate::schema::field_type::FieldType;

/// Field identifier, unique within a schema
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u64);

impl FieldId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field_{}", self.0)
    }
}

/// One field of a schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(id: FieldId, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered field descriptors with id and name lookup
///
/// Built once through [`SchemaBuilder`]; immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDescriptor>", into = "Vec<FieldDescriptor>")]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    by_id: HashMap<FieldId, usize>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields in schema order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by id
    pub fn field(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.by_id.get(&id).map(|&i| &self.fields[i])
    }

    /// Look up a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.by_id.contains_key(&id)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl TryFrom<Vec<FieldDescriptor>> for Schema {
    type Error = CuttleError;

    fn try_from(fields: Vec<FieldDescriptor>) -> Result<Self, Self::Error> {
        let mut builder = SchemaBuilder::default();
        for field in fields {
            builder = builder.add_descriptor(field);
        }
        builder.build()
    }
}

impl From<Schema> for Vec<FieldDescriptor> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Builder validating field descriptors into a [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Add a field by parts
    pub fn add_field(self, id: FieldId, name: impl Into<String>, field_type: FieldType) -> Self {
        self.add_descriptor(FieldDescriptor::new(id, name, field_type))
    }

    /// Add a prebuilt descriptor
    pub fn add_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate and freeze the schema
    pub fn build(self) -> Result<Schema, CuttleError> {
        let mut by_id = HashMap::with_capacity(self.fields.len());
        let mut by_name = HashMap::with_capacity(self.fields.len());

        for (position, field) in self.fields.iter().enumerate() {
            match &field.field_type {
                FieldType::FloatVector { dimensions, .. } if *dimensions == 0 => {
                    return Err(CuttleError::ZeroDimensions {
                        name: field.name.clone(),
                    });
                }
                FieldType::BinaryVector { dimensions } => {
                    if *dimensions == 0 {
                        return Err(CuttleError::ZeroDimensions {
                            name: field.name.clone(),
                        });
                    }
                    if dimensions % 8 != 0 {
                        return Err(CuttleError::UnalignedBinaryDimensions {
                            name: field.name.clone(),
                            dimensions: *dimensions,
                        });
                    }
                }
                _ => {}
            }

            if by_id.insert(field.id, position).is_some() {
                return Err(CuttleError::DuplicateFieldId(field.id));
            }
            if by_name.insert(field.name.clone(), position).is_some() {
                return Err(CuttleError::DuplicateFieldName(field.name.clone()));
            }
        }

        Ok(Schema {
            fields: self.fields,
            by_id,
            by_name,
        })
    }
}
