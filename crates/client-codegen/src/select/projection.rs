use typescript_ast::{ObjectType, Property, TypeExpr};

use super::{FieldSelection, NestedSelection, Selection, Shape, ShapeCatalog, ShapeType};
use crate::{config::DefaultSelection, resolver::TypeResolver, schema::TypeRef, tracker::TypeTracker};

/// The result shape of applying a [`Selection`] to a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub shape: String,
    pub fields: Vec<ProjectedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedField {
    pub name: String,
    pub ty: ProjectedType,
    pub nullable: bool,
    pub arguments: FieldArguments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedType {
    Leaf(TypeRef),
    Object { projection: Projection, list: bool },
    /// Keeps the collection wrapper, only the nodes are projected.
    Connection(Projection),
    /// A relation to a shape that is not in the catalog.
    Unknown,
}

/// Arguments of a selected relation field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldArguments {
    pub first: Option<u32>,
    pub filter: Option<serde_json::Value>,
    pub order_by: Option<Vec<String>>,
}

impl FieldArguments {
    fn from_nested(nested: &NestedSelection) -> Self {
        Self {
            first: nested.first,
            filter: nested.filter.clone(),
            order_by: nested.order_by.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.filter.is_none() && self.order_by.is_none()
    }
}

/// Projects `selection` onto `shape`.
///
/// Keys that are not fields of the shape are skipped; run
/// [`validate`](super::validate) first to reject them. A relation selected with
/// `true` falls back to the default selection of the related shape.
pub fn project(catalog: &ShapeCatalog, shape: &Shape, selection: &Selection, policy: DefaultSelection) -> Projection {
    let mut fields = Vec::new();

    for (name, field_selection) in selection.selected() {
        let Some(field) = shape.field(name) else {
            continue;
        };

        let nested = match field_selection {
            FieldSelection::Nested(nested) => Some(nested),
            FieldSelection::Flag(_) => None,
        };

        let sub_projection = |related: &str| {
            let related = catalog.get(related)?;

            Some(match nested {
                Some(nested) => project(catalog, related, &nested.select, policy),
                None => project(catalog, related, &Selection::default_for(related, policy), policy),
            })
        };

        let ty = match field.ty {
            ShapeType::Leaf => ProjectedType::Leaf(field.type_ref.clone()),
            ShapeType::Object { ref shape, list } => match sub_projection(shape) {
                Some(projection) => ProjectedType::Object { projection, list },
                None => ProjectedType::Unknown,
            },
            ShapeType::Connection { ref node } => sub_projection(node).map_or(ProjectedType::Unknown, ProjectedType::Connection),
        };

        let arguments = match (nested, &field.ty) {
            (Some(nested), ShapeType::Connection { .. }) => FieldArguments::from_nested(nested),
            _ => FieldArguments::default(),
        };

        fields.push(ProjectedField {
            name: name.to_owned(),
            ty,
            nullable: field.nullable,
            arguments,
        });
    }

    Projection {
        shape: shape.name.clone(),
        fields,
    }
}

impl Projection {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The TypeScript object type of the projected result.
    pub fn to_type_expr(&self, resolver: &TypeResolver<'_>, mut tracker: Option<&mut TypeTracker<'_>>) -> TypeExpr {
        let mut object = ObjectType::new().multiline();

        if self.fields.is_empty() {
            object.push_property(Property::new("__typename", TypeExpr::ident("string")));
        }

        for field in &self.fields {
            let ty = match field.ty {
                ProjectedType::Leaf(ref type_ref) => {
                    object.push_property(Property::new(
                        field.name.clone(),
                        resolver.resolve_nullable_expr(type_ref, tracker.as_deref_mut()),
                    ));
                    continue;
                }
                ProjectedType::Object { ref projection, list } => {
                    let inner = projection.to_type_expr(resolver, tracker.as_deref_mut());
                    if list {
                        inner.array()
                    } else {
                        inner
                    }
                }
                ProjectedType::Connection(ref projection) => TypeExpr::generic(
                    "ConnectionResult",
                    [projection.to_type_expr(resolver, tracker.as_deref_mut())],
                ),
                ProjectedType::Unknown => TypeExpr::ident("unknown"),
            };

            let ty = if field.nullable { ty.nullable() } else { ty };
            object.push_property(Property::new(field.name.clone(), ty));
        }

        object.into()
    }
}
