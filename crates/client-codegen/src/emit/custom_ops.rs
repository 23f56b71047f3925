use std::collections::BTreeSet;

use typescript_ast::{ImportSet, Module, ObjectType, Property, TypeExpr};

use super::{
    definitions, header,
    operation::{variables_optional, MutationHook, OperationFile, QueryHook},
    EmitContext,
};
use crate::{
    config::QueryKeyStyle,
    naming::OperationNames,
    schema::{Operation, OperationKind, TypeKind},
    CodegenError,
};

/// Artifacts of one kind of custom operation, in input order.
pub(super) struct CustomArtifacts {
    pub artifacts: Vec<(String, Module)>,
    /// Referenced names that `schema-types.ts` has to define.
    pub schema_types: BTreeSet<String>,
    pub hooks: usize,
}

pub(super) fn artifacts(ctx: &EmitContext<'_>, operations: &[Operation]) -> Result<CustomArtifacts, CodegenError> {
    let mut artifacts = CustomArtifacts {
        artifacts: Vec::new(),
        schema_types: BTreeSet::new(),
        hooks: 0,
    };

    for operation in operations {
        let file = custom_operation(ctx, operation).map_err(|error| {
            tracing::error!(
                operation = %operation.name,
                arguments = operation.args.len(),
                return_type = %operation.return_type,
                "failed to generate custom operation: {error}"
            );

            CodegenError::CustomOperation {
                name: operation.name.clone(),
                source: Box::new(error),
            }
        })?;

        let directory = match operation.kind {
            OperationKind::Query => "custom-queries",
            OperationKind::Mutation => "custom-mutations",
        };

        artifacts.hooks += file.hooks;

        let (module, schema_types) = file.finish();
        artifacts.schema_types.extend(schema_types);
        artifacts.artifacts.push((format!("{directory}/{}.ts", operation.name), module));
    }

    Ok(artifacts)
}

fn custom_operation<'c>(ctx: &'c EmitContext<'c>, operation: &Operation) -> Result<OperationFile<'c>, CodegenError> {
    let names = OperationNames::new(&operation.name, operation.kind);
    let built = ctx.builder().custom(operation, None, None)?;
    let optional = variables_optional(&built.document);

    let description = match operation.description {
        Some(ref description) => description.lines().next().unwrap_or_default().to_owned(),
        None => format!("Custom {} `{}`", operation.kind, operation.name),
    };

    let mut file = OperationFile::new(ctx, &description);
    file.push_document(&names, &built)?;

    let return_type = &operation.return_type;

    let ty = match built.projection {
        Some(ref projection) => {
            let ty = file.projection_type(projection);
            let ty = if return_type.is_list() { ty.array() } else { ty };

            if return_type.is_required() {
                ty
            } else {
                ty.nullable()
            }
        }
        // Object results without a known shape only select their typename.
        None if return_type.base_kind() == TypeKind::Object => {
            let ty = TypeExpr::from(
                ObjectType::new().with_property(Property::new("__typename", TypeExpr::ident("string"))),
            );
            let ty = if return_type.is_list() { ty.array() } else { ty };

            if return_type.is_required() {
                ty
            } else {
                ty.nullable()
            }
        }
        None => file.resolve_nullable(return_type),
    };

    file.push_result(&names, &operation.name, ty);
    file.push_fetch(&names, optional)?;

    let config = &ctx.config.query_keys;
    let centralized = config.style == QueryKeyStyle::Centralized;
    let hooks = ctx.config.hooks_enabled();

    match operation.kind {
        OperationKind::Query => {
            let key = if centralized {
                let ident = ctx.keys.custom_query_ident();
                if hooks {
                    file.import_value("../query-keys", &ident);
                }
                format!("{ident}.{}(variables)", operation.name)
            } else {
                format!("['{}', variables] as const", operation.name)
            };

            file.push_query_hook(&names, optional, &QueryHook { key, scope: None })?;
        }
        OperationKind::Mutation => {
            let key = match (config.mutation_keys, centralized) {
                (false, _) => None,
                (true, true) => {
                    let ident = ctx.keys.custom_mutation_ident();
                    if hooks {
                        file.import_value("../mutation-keys", &ident);
                    }
                    Some(format!("{ident}.{}()", operation.name))
                }
                (true, false) => Some(format!("['mutation', '{}'] as const", operation.name)),
            };

            file.push_mutation_hook(
                &names,
                &MutationHook {
                    key,
                    invalidate: Vec::new(),
                },
            )?;
        }
    }

    Ok(file)
}

/// `schema-types.ts`: definitions of the non-CRUD types custom operations
/// reference, or `None` when there are none. Names defined by `types.ts` are
/// imported from there instead of being defined again.
pub(super) fn schema_types_module(ctx: &EmitContext<'_>, roots: impl IntoIterator<Item = String>) -> Option<Module> {
    let definitions = definitions::collect(ctx, roots, &ctx.namespace);

    if definitions.items.is_empty() {
        return None;
    }

    let mut imports = ImportSet::new();
    imports.types("./types", definitions.table_types);

    let mut module = Module::new().with_header(header("Schema types used by custom operations"));
    module.extend_imports(imports.into_imports());

    for item in definitions.items {
        module.push_item(item);
    }

    Some(module)
}
