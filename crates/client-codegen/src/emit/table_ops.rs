use std::fmt::{self, Write};

use typescript_ast::{template_literal, Export, Module, ObjectType, Property, TypeAlias, TypeExpr};

use super::{
    operation::{variables_optional, MutationHook, OperationFile, QueryHook},
    EmitContext,
};
use crate::{
    document::{BuiltDocument, FieldNode},
    naming::{OperationNames, TableNames},
    query_keys::KeyExprs,
    schema::Table,
    CodegenError,
};

const INDENT: &str = "  ";
const DOUBLE_INDENT: &str = "    ";

/// Stands in for the caller's selection while the document is rendered.
const SELECTION_SLOT: &str = "__selection__";

/// Where an operation's rows sit in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rows {
    /// The nodes of a connection, returned as a whole page.
    Page,
    /// The first node of a connection.
    First,
    /// A nullable root field.
    Single,
    /// The entity field of a nullable mutation payload.
    Payload,
}

/// Query and mutation artifacts of every table, in input order.
pub(super) struct TableArtifacts {
    pub queries: Vec<(String, Module)>,
    pub mutations: Vec<(String, Module)>,
    pub hooks: usize,
}

pub(super) fn artifacts(ctx: &EmitContext<'_>) -> Result<TableArtifacts, CodegenError> {
    let mut artifacts = TableArtifacts {
        queries: Vec::new(),
        mutations: Vec::new(),
        hooks: 0,
    };

    for table in &ctx.input.tables {
        let names = TableNames::new(table);

        let factory = ctx
            .keys
            .entity(&names.entity_key)
            .ok_or_else(|| CodegenError::UnknownEntity(table.name.clone()))?;

        let emitter = TableEmitter {
            ctx,
            table,
            keys: KeyExprs::new(factory, ctx.config.query_keys.style, ctx.config.query_keys.mutation_keys),
            names,
        };

        for (path, file) in [
            (emitter.names.all_field.clone(), emitter.list()?),
            (emitter.names.one_field.clone(), emitter.one()?),
        ] {
            artifacts.hooks += file.hooks;
            artifacts.queries.push((format!("queries/{path}.ts"), file.finish().0));
        }

        for (path, file) in [
            (emitter.names.create_field.clone(), emitter.create()?),
            (emitter.names.update_field.clone(), emitter.update()?),
            (emitter.names.delete_field.clone(), emitter.delete()?),
        ] {
            artifacts.hooks += file.hooks;
            artifacts.mutations.push((format!("mutations/{path}.ts"), file.finish().0));
        }
    }

    Ok(artifacts)
}

struct TableEmitter<'c> {
    ctx: &'c EmitContext<'c>,
    table: &'c Table,
    keys: KeyExprs<'c>,
    names: TableNames,
}

impl<'c> TableEmitter<'c> {
    fn file(&self, description: String) -> OperationFile<'c> {
        OperationFile::new(self.ctx, &description)
    }

    /// The row type of a built document.
    fn row(&self, file: &mut OperationFile<'c>, built: &BuiltDocument) -> TypeExpr {
        match built.projection {
            Some(ref projection) => file.projection_type(projection),
            None => TypeExpr::ident("unknown"),
        }
    }

    /// Whether hooks take a trailing scope argument.
    fn scope_parameter(&self) -> Option<String> {
        (self.keys.is_centralized() && self.keys.is_scoped()).then(|| self.keys.factory().scope_type.clone())
    }

    fn import_query_keys(&self, file: &mut OperationFile<'c>) {
        if !self.ctx.config.hooks_enabled() || !self.keys.is_centralized() {
            return;
        }

        file.import_value("../query-keys", &self.keys.factory().ident);

        if let Some(scope) = self.scope_parameter() {
            file.import_type("../query-keys", &scope);
        }
    }

    /// The identifier passed to `detail` keys, read from the operation variables.
    fn detail_id(&self) -> String {
        let primary_key = self.table.primary_key();

        if primary_key.is_single() {
            format!("variables.{}", primary_key.first().name)
        } else {
            String::from("JSON.stringify(variables)")
        }
    }

    /// `queries/<all>.ts`: the list query and the first-row helper.
    fn list(&self) -> Result<OperationFile<'c>, CodegenError> {
        let builder = self.ctx.builder();
        let mut file = self.file(format!("List queries for {}", self.names.type_name));

        let all = self.names.all_operation();
        let built = builder.find_many(self.table, None, None)?;
        let optional = variables_optional(&built.document);

        file.import_type("../select-types", "ConnectionResult");
        file.push_document(&all, &built)?;
        let row = self.row(&mut file, &built);
        file.push_result(&all, &self.names.all_field, TypeExpr::generic("ConnectionResult", [row]));
        file.push_fetch(&all, optional)?;
        self.push_select_accessor(&mut file, &all, &built, Rows::Page)?;

        self.import_query_keys(&mut file);
        file.push_query_hook(
            &all,
            optional,
            &QueryHook {
                key: self.keys.list("variables", "scope"),
                scope: self.scope_parameter(),
            },
        )?;

        let first = self.names.first_operation();
        let built = builder.find_first(self.table, None, None)?;

        file.push_document(&first, &built)?;
        let row = self.row(&mut file, &built);
        file.push_result(&first, &self.names.all_field, TypeExpr::generic("ConnectionResult", [row]));
        self.push_fetch_first(&mut file, &first)?;
        self.push_select_accessor(&mut file, &first, &built, Rows::First)?;

        Ok(file)
    }

    fn push_fetch_first(&self, file: &mut OperationFile<'c>, first: &OperationNames) -> Result<(), CodegenError> {
        let nodes = &self.ctx.config.pagination.nodes_field;
        let node = format!("{}Node", first.operation);

        let node_type = TypeExpr::ident(first.result.clone())
            .index(TypeExpr::string(self.names.all_field.clone()))
            .index(TypeExpr::string(nodes.clone()))
            .index(TypeExpr::ident("number"));

        file.push_item(Export::new(TypeAlias::new(node.clone(), node_type)));
        file.import_value("../client", "execute");

        let mut out = String::new();
        writeln!(
            out,
            "export async function {}(variables: {} = {{}}): Promise<{node} | null> {{",
            first.function, first.variables
        )?;
        writeln!(
            out,
            "{INDENT}const data = await execute<{}, {}>({}, variables);",
            first.result, first.variables, first.document
        )?;
        writeln!(out, "{INDENT}return data.{}.{nodes}[0] ?? null;", self.names.all_field)?;
        out.push('}');

        file.push_code(out);
        Ok(())
    }

    /// The accessor taking a caller selection, e.g. `fetchUsers`, and its
    /// document, whose row selection is built from that selection at runtime.
    fn push_select_accessor(
        &self,
        file: &mut OperationFile<'c>,
        names: &OperationNames,
        built: &BuiltDocument,
        rows: Rows,
    ) -> Result<(), CodegenError> {
        let pagination = &self.ctx.config.pagination;
        let nodes = &pagination.nodes_field;

        let mut path = built.result_path.clone();

        if rows == Rows::Page {
            path.push(nodes.clone());
        }

        let mut document = built.document.clone();
        let slot = document.field_mut(&path).ok_or(fmt::Error)?;
        slot.selection = vec![FieldNode::new(SELECTION_SLOT)];

        let rendered = template_literal(&document.render()?);
        let mut out = String::new();

        writeln!(out, "const {} = (select: object) => /* GraphQL */ `", names.select_document)?;

        for line in rendered.lines() {
            match line.strip_suffix(SELECTION_SLOT) {
                Some(indent) if indent.trim().is_empty() => {
                    let depth = indent.len() / INDENT.len();
                    writeln!(out, "${{selectionSet('{}', select, {depth})}}", self.table.name)?;
                }
                _ => writeln!(out, "{line}")?,
            }
        }

        out.push_str("`;");
        file.push_code(out);

        file.import_value("../client", "execute");
        file.import_value("../client", "selectionSet");
        file.import_type("../select-types", "InferSelectResult");
        file.import_type("../select-types", "StrictSelect");
        file.import_type("../types", &self.names.select_type);
        file.import_type("../types", &self.names.with_relations_type);

        let row = format!("InferSelectResult<{}, S>", self.names.with_relations_type);
        let root = built.root_field();

        let (data, returns, value) = match rows {
            Rows::Page => (
                format!("{{ {root}: ConnectionResult<{row}> }}"),
                format!("ConnectionResult<{row}>"),
                format!("data.{root}"),
            ),
            Rows::First => (
                format!("{{ {root}: ConnectionResult<{row}> }}"),
                format!("{row} | null"),
                format!("data.{root}.{nodes}[0] ?? null"),
            ),
            Rows::Single => (
                format!("{{ {root}: {row} | null }}"),
                format!("{row} | null"),
                format!("data.{root}"),
            ),
            Rows::Payload => {
                let entity = &self.names.entity_field;

                (
                    format!("{{ {root}: {{ {entity}: {row} | null }} | null }}"),
                    format!("{row} | null"),
                    format!("data.{root}?.{entity} ?? null"),
                )
            }
        };

        if matches!(rows, Rows::Page | Rows::First) {
            file.import_type("../select-types", "ConnectionResult");
        }

        let mut out = String::new();
        writeln!(
            out,
            "export async function {}<S extends {}>(",
            names.select_function, self.names.select_type
        )?;
        writeln!(
            out,
            "{INDENT}args: {} & {{ select: S & StrictSelect<S, {}> }},",
            names.variables, self.names.with_relations_type
        )?;
        writeln!(out, "): Promise<{returns}> {{")?;
        writeln!(out, "{INDENT}const {{ select, ...variables }} = args;")?;
        writeln!(out, "{INDENT}const data = await execute<{data}, {}>(", names.variables)?;
        writeln!(out, "{DOUBLE_INDENT}{}(select),", names.select_document)?;
        writeln!(out, "{DOUBLE_INDENT}variables,")?;
        writeln!(out, "{INDENT});")?;
        writeln!(out, "{INDENT}return {value};")?;
        out.push('}');

        file.push_code(out);
        Ok(())
    }

    /// `queries/<one>.ts`: a single row by key.
    fn one(&self) -> Result<OperationFile<'c>, CodegenError> {
        let mut file = self.file(format!("Single-row query for {}", self.names.type_name));

        let one = self.names.one_operation();
        let built = self.ctx.builder().find_one(self.table, None, None)?;
        let optional = variables_optional(&built.document);

        file.push_document(&one, &built)?;
        let row = self.row(&mut file, &built);
        file.push_result(&one, &self.names.one_field, row.nullable());
        file.push_fetch(&one, optional)?;
        self.push_select_accessor(&mut file, &one, &built, Rows::Single)?;

        self.import_query_keys(&mut file);
        file.push_query_hook(
            &one,
            optional,
            &QueryHook {
                key: self.keys.detail(&self.detail_id(), "scope"),
                scope: self.scope_parameter(),
            },
        )?;

        Ok(file)
    }

    fn mutation(
        &self,
        operation: &OperationNames,
        action: &str,
        built: &BuiltDocument,
        invalidates_detail: bool,
    ) -> Result<OperationFile<'c>, CodegenError> {
        let mut file = self.file(format!("`{action}` mutation for {}", self.names.type_name));

        file.push_document(operation, built)?;

        let row = self.row(&mut file, built);
        let payload = ObjectType::new()
            .multiline()
            .with_property(Property::new(self.names.entity_field.clone(), row.nullable()));

        file.push_result(operation, built.root_field(), TypeExpr::from(payload).nullable());
        file.push_fetch(operation, variables_optional(&built.document))?;
        self.push_select_accessor(&mut file, operation, built, Rows::Payload)?;

        let invalidate = if self.keys.is_scoped() {
            vec![self.keys.all()]
        } else if invalidates_detail {
            vec![self.keys.lists(), self.keys.detail(&self.detail_id(), "")]
        } else {
            vec![self.keys.lists()]
        };

        let key = self.keys.mutation(action);

        if self.ctx.config.hooks_enabled() && self.keys.is_centralized() {
            file.import_value("../query-keys", &self.keys.factory().ident);

            if key.is_some() {
                file.import_value("../mutation-keys", &self.keys.factory().mutation_ident);
            }
        }

        file.push_mutation_hook(operation, &MutationHook { key, invalidate })?;

        Ok(file)
    }

    fn create(&self) -> Result<OperationFile<'c>, CodegenError> {
        let built = self.ctx.builder().create(self.table, None, None)?;
        self.mutation(&self.names.create_operation(), "create", &built, false)
    }

    fn update(&self) -> Result<OperationFile<'c>, CodegenError> {
        let built = self.ctx.builder().update(self.table, None, None, None)?;
        self.mutation(&self.names.update_operation(), "update", &built, true)
    }

    fn delete(&self) -> Result<OperationFile<'c>, CodegenError> {
        let built = self.ctx.builder().delete(self.table, None, None)?;
        self.mutation(&self.names.delete_operation(), "delete", &built, true)
    }
}
