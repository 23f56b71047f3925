//! Building blocks for rendering TypeScript source. Every node implements
//! `Display`; rendering a [`Module`] yields the complete file contents.

mod declaration;
mod module;
mod r#type;

pub use declaration::{Declaration, Export, Interface, TypeAlias, TypeParam};
pub use module::{Import, ImportSet, Module, ModuleItem, ReExport};
pub use r#type::{is_identifier, Conditional, MappedType, ObjectType, Property, TypeExpr};

/// Indents every line but the first, for nodes rendered inside a block.
pub(crate) fn indent_continuation(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{indent}"))
}

/// Escapes text for use inside a template literal.
pub fn template_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}
