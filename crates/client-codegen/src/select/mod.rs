//! Selections over entity shapes: defaults, strict validation and projection.

mod projection;
mod selection;
mod shape;
mod validate;

pub use projection::{project, FieldArguments, ProjectedField, ProjectedType, Projection};
pub use selection::{FieldSelection, NestedSelection, Selection};
pub use shape::{connection_node, Shape, ShapeCatalog, ShapeField, ShapeType};
pub use validate::validate;
