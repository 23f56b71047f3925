use indexmap::IndexMap;

use crate::{
    config::PaginationConfig,
    schema::{FieldDefinition, SchemaInput, Table, TypeKind, TypeRef, TypeRegistry},
};

/// What a field of a [`Shape`] holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// A scalar or enum, typed by its wire reference.
    Leaf,
    /// A single related object or a plain list of them.
    Object { shape: String, list: bool },
    /// A paginated collection of `node` objects.
    Connection { node: String },
}

impl ShapeType {
    pub fn is_leaf(&self) -> bool {
        matches!(self, ShapeType::Leaf)
    }

    /// Name of the shape a sub-selection of this field applies to.
    pub fn related_shape(&self) -> Option<&str> {
        match self {
            ShapeType::Leaf => None,
            ShapeType::Object { shape, .. } => Some(shape),
            ShapeType::Connection { node } => Some(node),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeField {
    pub ty: ShapeType,
    pub type_ref: TypeRef,
    pub nullable: bool,
    pub description: Option<String>,
}

impl ShapeField {
    fn new(ty: ShapeType, type_ref: TypeRef) -> Self {
        Self {
            ty,
            nullable: !type_ref.is_required(),
            type_ref,
            description: None,
        }
    }
}

/// The full, selectable shape of an entity or payload type.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub fields: IndexMap<String, ShapeField>,
    /// Key fields, empty for payload types without an `id`.
    pub primary_key: Vec<String>,
}

impl Shape {
    pub fn field(&self, name: &str) -> Option<&ShapeField> {
        self.fields.get(name)
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&str, &ShapeField)> {
        self.fields
            .iter()
            .filter(|(_, field)| field.ty.is_leaf())
            .map(|(name, field)| (name.as_str(), field))
    }
}

/// Shapes of every table and registry object, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ShapeCatalog {
    shapes: IndexMap<String, Shape>,
}

impl ShapeCatalog {
    pub fn build(input: &SchemaInput, pagination: &PaginationConfig) -> Self {
        let mut shapes = IndexMap::new();

        for table in &input.tables {
            shapes.insert(table.name.clone(), table_shape(table, &input.registry, pagination));
        }

        for resolved in input.registry.iter() {
            if shapes.contains_key(&resolved.name) {
                continue;
            }

            if let Some(fields) = input.registry.object_fields(&resolved.name) {
                let shape = object_shape(&resolved.name, fields, &input.registry, pagination);
                shapes.insert(resolved.name.clone(), shape);
            }
        }

        Self { shapes }
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }
}

fn table_shape(table: &Table, registry: &TypeRegistry, pagination: &PaginationConfig) -> Shape {
    let mut fields = IndexMap::new();

    for field in &table.fields {
        let mut shape_field = ShapeField::new(field_type(&field.type_ref, registry, pagination), field.type_ref.clone());
        shape_field.description.clone_from(&field.description);
        fields.insert(field.name.clone(), shape_field);
    }

    for (kind, field_name, relation) in table.relations.iter() {
        let related = relation.related_table.clone();

        let field = if kind.is_collection() {
            ShapeField::new(
                ShapeType::Connection { node: related.clone() },
                TypeRef::object(related).non_null(),
            )
        } else {
            ShapeField::new(
                ShapeType::Object {
                    shape: related.clone(),
                    list: false,
                },
                TypeRef::object(related),
            )
        };

        fields.insert(field_name.to_owned(), field);
    }

    Shape {
        name: table.name.clone(),
        fields,
        primary_key: table.primary_key().fields.into_iter().map(|key| key.name).collect(),
    }
}

fn object_shape(name: &str, definitions: &[FieldDefinition], registry: &TypeRegistry, pagination: &PaginationConfig) -> Shape {
    let fields: IndexMap<_, _> = definitions
        .iter()
        .map(|definition| {
            let mut field = ShapeField::new(
                field_type(&definition.type_ref, registry, pagination),
                definition.type_ref.clone(),
            );
            field.description.clone_from(&definition.description);
            (definition.name.clone(), field)
        })
        .collect();

    let primary_key = if fields.get("id").is_some_and(|field| field.ty.is_leaf()) {
        vec![String::from("id")]
    } else {
        Vec::new()
    };

    Shape {
        name: name.to_owned(),
        fields,
        primary_key,
    }
}

fn field_type(ty: &TypeRef, registry: &TypeRegistry, pagination: &PaginationConfig) -> ShapeType {
    if ty.base_kind() != TypeKind::Object {
        return ShapeType::Leaf;
    }

    let name = ty.base_name();

    if !ty.is_list() {
        if let Some(node) = connection_node(name, registry, pagination) {
            return ShapeType::Connection { node };
        }
    }

    ShapeType::Object {
        shape: name.to_owned(),
        list: ty.is_list(),
    }
}

/// The node type of `name`, if it is a paginated collection wrapper.
pub fn connection_node(name: &str, registry: &TypeRegistry, pagination: &PaginationConfig) -> Option<String> {
    let fields = registry.object_fields(name)?;
    let has = |field: &str| fields.iter().any(|definition| definition.name == field);

    let nodes = fields.iter().find(|definition| definition.name == pagination.nodes_field)?;

    if !nodes.type_ref.is_list() || nodes.type_ref.base_kind() != TypeKind::Object {
        return None;
    }

    if !has(&pagination.total_count_field) && !has(&pagination.page_info_field) {
        return None;
    }

    Some(nodes.type_ref.base_name().to_owned())
}
