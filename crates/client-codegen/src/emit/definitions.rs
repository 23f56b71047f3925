use std::collections::{BTreeSet, VecDeque};

use typescript_ast::{Export, Interface, ModuleItem, Property, TypeAlias, TypeExpr};

use super::EmitContext;
use crate::{
    schema::{ResolvedType, ResolvedTypeKind},
    tracker::{is_builtin_type, TypeTracker},
};

/// Registry definitions of `roots` and of everything they reference.
pub(super) struct Definitions {
    pub items: Vec<ModuleItem>,
    /// Names emitted, in emission order.
    pub emitted: Vec<String>,
    /// Referenced names that live in `types.ts`.
    pub table_types: BTreeSet<String>,
}

/// Walks the registry from `roots`, emitting a definition for every type that
/// is not in `exclude`. Types missing from the registry become `unknown`.
pub(super) fn collect(
    ctx: &EmitContext<'_>,
    roots: impl IntoIterator<Item = String>,
    exclude: &BTreeSet<String>,
) -> Definitions {
    let mut queue: VecDeque<String> = roots.into_iter().collect();
    let mut seen = BTreeSet::new();
    let mut definitions = Definitions {
        items: Vec::new(),
        emitted: Vec::new(),
        table_types: BTreeSet::new(),
    };

    while let Some(name) = queue.pop_front() {
        if is_builtin_type(&name) || !seen.insert(name.clone()) {
            continue;
        }

        if exclude.contains(&name) {
            definitions.table_types.insert(name);
            continue;
        }

        let mut tracker = TypeTracker::new(exclude);

        let item = match ctx.input.registry.get(&name) {
            Some(resolved) => match definition(ctx, resolved, &mut tracker) {
                Some(item) => item,
                None => continue,
            },
            None => {
                tracing::warn!("type {name} is referenced but missing from the schema registry, emitting `unknown`");
                ModuleItem::Code(format!(
                    "export type {name} = unknown; /* missing from the introspected schema */"
                ))
            }
        };

        let (table_types, schema_types) = tracker.into_parts();
        definitions.table_types.extend(table_types);
        queue.extend(schema_types);

        definitions.items.push(item);
        definitions.emitted.push(name);
    }

    definitions
}

/// The TypeScript definition of one registry type. Scalars have none.
pub(super) fn definition(
    ctx: &EmitContext<'_>,
    resolved: &ResolvedType,
    tracker: &mut TypeTracker<'_>,
) -> Option<ModuleItem> {
    let resolver = ctx.resolver();
    let name = resolved.name.clone();

    let export = match resolved.kind {
        ResolvedTypeKind::Enum { ref values } => Export::new(
            TypeAlias::new(name, TypeExpr::union(values.iter().cloned().map(TypeExpr::string)))
                .docs(resolved.description.as_deref()),
        ),
        ResolvedTypeKind::Union { ref possible_types } => {
            for possible in possible_types {
                tracker.record(possible);
            }

            Export::new(
                TypeAlias::new(name, TypeExpr::union(possible_types.iter().cloned().map(TypeExpr::ident)))
                    .docs(resolved.description.as_deref()),
            )
        }
        ResolvedTypeKind::InputObject { ref input_fields } => {
            let mut interface = Interface::new(name).docs(resolved.description.as_deref());

            for field in input_fields {
                let ty = resolver.resolve_nullable_expr(&field.type_ref, Some(&mut *tracker));
                interface.push_property(
                    Property::new(field.name.clone(), ty)
                        .optional_if(!field.type_ref.is_required())
                        .docs(field.description.as_deref()),
                );
            }

            Export::new(interface)
        }
        ResolvedTypeKind::Object { ref fields } => {
            let mut interface = Interface::new(name).docs(resolved.description.as_deref());

            for field in fields {
                let ty = resolver.resolve_nullable_expr(&field.type_ref, Some(&mut *tracker));
                interface.push_property(Property::new(field.name.clone(), ty).docs(field.description.as_deref()));
            }

            Export::new(interface)
        }
        ResolvedTypeKind::Scalar => return None,
    };

    Some(export.into())
}
