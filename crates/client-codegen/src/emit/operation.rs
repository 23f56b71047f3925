use std::{collections::BTreeSet, fmt::Write};

use typescript_ast::{template_literal, Export, ImportSet, Interface, Module, Property, TypeAlias, TypeExpr};

use super::{header, EmitContext};
use crate::{
    document::{BuiltDocument, Document},
    naming::OperationNames,
    schema::TypeRef,
    select::{ProjectedType, Projection},
    tracker::TypeTracker,
    CodegenError,
};

const INDENT: &str = "  ";
const DOUBLE_INDENT: &str = "    ";
const TRIPLE_INDENT: &str = "      ";

const REACT_QUERY: &str = "@tanstack/react-query";

/// What a generated query hook keys its cache entry with.
pub(super) struct QueryHook {
    pub key: String,
    /// Type of the trailing `scope` parameter of scoped entities.
    pub scope: Option<String>,
}

/// Cache entries a mutation hook invalidates on success.
pub(super) struct MutationHook {
    pub key: Option<String>,
    pub invalidate: Vec<String>,
}

/// One file holding the documents, types and functions of one or more operations.
pub(super) struct OperationFile<'c> {
    ctx: &'c EmitContext<'c>,
    tracker: TypeTracker<'c>,
    imports: ImportSet,
    module: Module,
    pub hooks: usize,
}

impl<'c> OperationFile<'c> {
    pub fn new(ctx: &'c EmitContext<'c>, description: &str) -> Self {
        Self {
            ctx,
            tracker: ctx.tracker(),
            imports: ImportSet::new(),
            module: Module::new().with_header(header(description)),
            hooks: 0,
        }
    }

    pub fn import_value(&mut self, from: &str, name: &str) {
        self.imports.value(from, name);
    }

    pub fn import_type(&mut self, from: &str, name: &str) {
        self.imports.types(from, [name]);
    }

    /// The document constant and the variables type of `built`.
    pub fn push_document(&mut self, names: &OperationNames, built: &BuiltDocument) -> Result<(), CodegenError> {
        let rendered = built.document.render()?;

        self.module.push_code(format!(
            "export const {} = /* GraphQL */ `\n{}`;",
            names.document,
            template_literal(&rendered)
        ));

        let variables = self.variables_type(names, &built.document);
        self.module.push_item(variables);

        Ok(())
    }

    fn variables_type(&mut self, names: &OperationNames, document: &Document) -> Export {
        if document.variables.is_empty() {
            return Export::new(TypeAlias::new(
                names.variables.clone(),
                TypeExpr::generic("Record", [TypeExpr::ident("string"), TypeExpr::ident("never")]),
            ));
        }

        let ctx = self.ctx;
        let resolver = ctx.resolver();
        let mut interface = Interface::new(names.variables.clone());

        for variable in &document.variables {
            let ty = resolver.resolve_expr(&variable.type_ref, Some(&mut self.tracker));
            interface.push_property(
                Property::new(variable.name.clone(), ty).optional_if(!variable.type_ref.is_required()),
            );
        }

        Export::new(interface)
    }

    /// Resolves a wire type, recording the names it references.
    pub fn resolve_nullable(&mut self, type_ref: &TypeRef) -> TypeExpr {
        let ctx = self.ctx;
        ctx.resolver().resolve_nullable_expr(type_ref, Some(&mut self.tracker))
    }

    /// The TypeScript type of a projection, recording the names it references.
    pub fn projection_type(&mut self, projection: &Projection) -> TypeExpr {
        if uses_connections(projection) {
            self.import_type("../select-types", "ConnectionResult");
        }

        let ctx = self.ctx;
        projection.to_type_expr(&ctx.resolver(), Some(&mut self.tracker))
    }

    pub fn push_result(&mut self, names: &OperationNames, field: &str, ty: TypeExpr) {
        let mut interface = Interface::new(names.result.clone());
        interface.push_property(Property::new(field.to_owned(), ty));
        self.module.push_item(Export::new(interface));
    }

    pub fn push_code(&mut self, code: String) {
        self.module.push_code(code);
    }

    pub fn push_item(&mut self, item: impl Into<typescript_ast::ModuleItem>) {
        self.module.push_item(item);
    }

    /// `fetchXQuery(variables)` or `xMutation(variables)`, going through `execute`.
    pub fn push_fetch(&mut self, names: &OperationNames, variables_optional: bool) -> Result<(), CodegenError> {
        self.import_value("../client", "execute");

        let mut out = String::new();
        let parameter = variables_parameter(names, variables_optional);

        writeln!(
            out,
            "export async function {}({parameter}): Promise<{}> {{",
            names.function, names.result
        )?;
        writeln!(
            out,
            "{INDENT}return execute<{}, {}>({}, variables);",
            names.result, names.variables, names.document
        )?;
        out.push('}');

        self.module.push_code(out);
        Ok(())
    }

    /// `useXQuery` and `prefetchXQuery`, unless hooks are disabled.
    pub fn push_query_hook(
        &mut self,
        names: &OperationNames,
        variables_optional: bool,
        hook: &QueryHook,
    ) -> Result<(), CodegenError> {
        if !self.ctx.config.hooks_enabled() {
            return Ok(());
        }

        self.import_value(REACT_QUERY, "useQuery");
        self.import_type(REACT_QUERY, "QueryClient");
        self.import_type(REACT_QUERY, "UseQueryOptions");

        let variables = variables_parameter(names, variables_optional);
        let scope = hook
            .scope
            .as_ref()
            .map(|scope| format!(", scope?: {scope}"))
            .unwrap_or_default();

        let mut out = String::new();
        writeln!(
            out,
            "export function {}({variables}, options?: Omit<UseQueryOptions<{}>, 'queryKey' | 'queryFn'>{scope}) {{",
            names.hook, names.result
        )?;
        writeln!(out, "{INDENT}return useQuery({{")?;
        writeln!(out, "{DOUBLE_INDENT}queryKey: {},", hook.key)?;
        writeln!(out, "{DOUBLE_INDENT}queryFn: () => {}(variables),", names.function)?;
        writeln!(out, "{DOUBLE_INDENT}...options,")?;
        writeln!(out, "{INDENT}}});")?;
        out.push('}');
        self.module.push_code(out);

        let mut out = String::new();
        writeln!(
            out,
            "export function {}(queryClient: QueryClient, {variables}{scope}): Promise<void> {{",
            names.prefetch
        )?;
        writeln!(out, "{INDENT}return queryClient.prefetchQuery({{")?;
        writeln!(out, "{DOUBLE_INDENT}queryKey: {},", hook.key)?;
        writeln!(out, "{DOUBLE_INDENT}queryFn: () => {}(variables),", names.function)?;
        writeln!(out, "{INDENT}}});")?;
        out.push('}');
        self.module.push_code(out);

        self.hooks += 1;
        Ok(())
    }

    /// `useXMutation`, unless hooks are disabled.
    pub fn push_mutation_hook(&mut self, names: &OperationNames, hook: &MutationHook) -> Result<(), CodegenError> {
        if !self.ctx.config.hooks_enabled() {
            return Ok(());
        }

        self.import_value(REACT_QUERY, "useMutation");
        self.import_type(REACT_QUERY, "UseMutationOptions");

        if !hook.invalidate.is_empty() {
            self.import_value(REACT_QUERY, "useQueryClient");
        }

        let mut out = String::new();
        writeln!(
            out,
            "export function {}(options?: Omit<UseMutationOptions<{}, Error, {}>, 'mutationKey' | 'mutationFn'>) {{",
            names.hook, names.result, names.variables
        )?;

        if !hook.invalidate.is_empty() {
            writeln!(out, "{INDENT}const queryClient = useQueryClient();")?;
            out.push('\n');
        }

        writeln!(out, "{INDENT}return useMutation({{")?;

        if let Some(ref key) = hook.key {
            writeln!(out, "{DOUBLE_INDENT}mutationKey: {key},")?;
        }

        writeln!(
            out,
            "{DOUBLE_INDENT}mutationFn: (variables: {}) => {}(variables),",
            names.variables, names.function
        )?;
        writeln!(out, "{DOUBLE_INDENT}...options,")?;

        if !hook.invalidate.is_empty() {
            writeln!(out, "{DOUBLE_INDENT}onSuccess: (data, variables, ...rest) => {{")?;

            for key in &hook.invalidate {
                writeln!(out, "{TRIPLE_INDENT}void queryClient.invalidateQueries({{ queryKey: {key} }});")?;
            }

            writeln!(out, "{TRIPLE_INDENT}return options?.onSuccess?.(data, variables, ...rest);")?;
            writeln!(out, "{DOUBLE_INDENT}}},")?;
        }

        writeln!(out, "{INDENT}}});")?;
        out.push('}');
        self.module.push_code(out);

        self.hooks += 1;
        Ok(())
    }

    /// The finished module, and the referenced names that `types.ts` does not define.
    pub fn finish(self) -> (Module, BTreeSet<String>) {
        let Self {
            tracker,
            mut imports,
            mut module,
            ..
        } = self;

        let (table_types, schema_types) = tracker.into_parts();
        imports.types("../types", table_types);
        imports.types("../schema-types", schema_types.iter().cloned());
        module.extend_imports(imports.into_imports());

        (module, schema_types)
    }
}

fn variables_parameter(names: &OperationNames, optional: bool) -> String {
    if optional {
        format!("variables: {} = {{}}", names.variables)
    } else {
        format!("variables: {}", names.variables)
    }
}

fn uses_connections(projection: &Projection) -> bool {
    projection.fields.iter().any(|field| match field.ty {
        ProjectedType::Connection(_) => true,
        ProjectedType::Object { ref projection, .. } => uses_connections(projection),
        _ => false,
    })
}

/// True when every variable of `document` may be omitted.
pub(super) fn variables_optional(document: &Document) -> bool {
    document.variables.iter().all(|variable| !variable.type_ref.is_required())
}
