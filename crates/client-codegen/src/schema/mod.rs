//! The resolved schema handed over by the introspection adapter.

mod operation;
mod registry;
mod table;
mod type_ref;

pub use operation::{Operation, OperationBundle, OperationKind};
pub use registry::{FieldDefinition, InputValue, ResolvedType, ResolvedTypeKind, TypeRegistry};
pub use table::{
    Constraints, Inflection, KeyField, PrimaryKey, PrimaryKeyConstraint, QueryOverrides, Relation, RelationKind,
    Relations, Table, TableField,
};
pub use type_ref::{TypeKind, TypeRef, UNKNOWN_TYPE_NAME};

/// Everything one generation run reads.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaInput {
    pub tables: Vec<Table>,
    pub operations: OperationBundle,
    pub registry: TypeRegistry,
}

impl SchemaInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}
