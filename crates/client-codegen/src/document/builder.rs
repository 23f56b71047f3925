use serde_json::{Map, Value as Json};

use super::{Document, FieldNode, Value, VariableDefinition};
use crate::{
    config::{CodegenConfig, DeleteReturns},
    naming::{OperationNames, TableNames},
    schema::{Operation, OperationKind, Table, TypeKind, TypeRef},
    select::{project, validate, ProjectedType, Projection, Selection, Shape, ShapeCatalog},
    CodegenError,
};

/// A request document together with the variables to send with it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltDocument {
    pub document: Document,
    /// Bound variable values. Empty for documents built as templates.
    pub variables: Map<String, Json>,
    /// Response path of the selected data, starting at the operation's root field.
    pub result_path: Vec<String>,
    /// The data is the first element of the list found at `result_path`.
    pub first_node: bool,
    /// Shape of the selected rows or object, if the operation selects one.
    pub projection: Option<Projection>,
}

impl BuiltDocument {
    /// The root field of the operation, e.g. `updateUser`.
    pub fn root_field(&self) -> &str {
        self.result_path.first().map_or("", String::as_str)
    }

    /// Picks the selected data out of a response's `data` object.
    pub fn extract<'a>(&self, data: &'a Json) -> Option<&'a Json> {
        let value = self.result_path.iter().try_fold(data, |value, key| value.get(key))?;

        if self.first_node {
            value.get(0)
        } else {
            Some(value)
        }
    }
}

/// Arguments of a list query. Only the supplied ones end up in the document.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FindManyArgs {
    pub filter: Option<Json>,
    pub order_by: Option<Vec<String>>,
    pub first: Option<u64>,
    pub last: Option<u64>,
    pub offset: Option<u64>,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// One argument slot: variable name, argument name, type, and the bound value.
struct Slot {
    variable: String,
    argument: String,
    type_ref: TypeRef,
    value: Option<Json>,
}

/// Whether a document is built with caller values or as a reusable template
/// declaring every variable.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Template,
    Runtime,
}

/// Assembles query and mutation documents for tables and custom operations.
///
/// Methods taking `Option` values build a template when given `None`, which
/// declares every variable and binds nothing. Selections are validated
/// strictly; without one, the configured or default selection is used.
pub struct DocumentBuilder<'a> {
    catalog: &'a ShapeCatalog,
    config: &'a CodegenConfig,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(catalog: &'a ShapeCatalog, config: &'a CodegenConfig) -> Self {
        Self { catalog, config }
    }

    pub fn find_many(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        args: Option<&FindManyArgs>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);
        self.list_document(table, &names, names.all_operation(), selection, args, None)
    }

    /// A list query limited to one row, extracting the head of the list.
    pub fn find_first(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        args: Option<&FindManyArgs>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);

        let args = args.map(|args| FindManyArgs {
            filter: args.filter.clone(),
            order_by: args.order_by.clone(),
            ..Default::default()
        });

        let mut built = self.list_document(table, &names, names.first_operation(), selection, args.as_ref(), Some(1))?;
        built.result_path.push(self.config.pagination.nodes_field.clone());
        built.first_node = true;

        Ok(built)
    }

    fn list_document(
        &self,
        table: &Table,
        names: &TableNames,
        operation: OperationNames,
        selection: Option<&Selection>,
        args: Option<&FindManyArgs>,
        fixed_first: Option<u32>,
    ) -> Result<BuiltDocument, CodegenError> {
        let pagination = &self.config.pagination;
        let projection = self.entity_projection(table, selection)?;
        let mode = if args.is_some() { Mode::Runtime } else { Mode::Template };
        let args = args.cloned().unwrap_or_default();

        let slot = |name: &str, type_ref: TypeRef, value: Option<Json>| Slot {
            variable: name.to_owned(),
            argument: name.to_owned(),
            type_ref,
            value,
        };

        let mut slots = vec![
            slot(&pagination.filter_argument, TypeRef::input_object(&names.filter_type), args.filter),
            slot(
                &pagination.order_by_argument,
                TypeRef::enumeration(&names.order_by_type).non_null().list(),
                args.order_by.map(|order_by| order_by.into_iter().map(Json::String).collect()),
            ),
        ];

        if fixed_first.is_none() {
            let int = || TypeRef::scalar("Int");
            let cursor = || TypeRef::scalar("Cursor");

            slots.extend([
                slot("first", int(), args.first.map(Json::from)),
                slot("last", int(), args.last.map(Json::from)),
                slot("offset", int(), args.offset.map(Json::from)),
                slot("before", cursor(), args.before.map(Json::String)),
                slot("after", cursor(), args.after.map(Json::String)),
            ]);
        }

        let (variables, mut arguments, values) = bind(&operation.operation, slots, mode)?;

        if let Some(first) = fixed_first {
            arguments.push((String::from("first"), Value::Int(i64::from(first))));
        }

        let mut root = FieldNode::new(&names.all_field).with_selection(vec![
            FieldNode::new(&pagination.total_count_field),
            FieldNode::new(&pagination.nodes_field).with_selection(selection_nodes(&projection, self.config)),
            FieldNode::new(&pagination.page_info_field).with_selection(page_info_nodes()),
        ]);
        root.arguments = arguments;

        Ok(BuiltDocument {
            document: Document {
                kind: OperationKind::Query,
                name: operation.operation,
                variables,
                selection: vec![root],
            },
            variables: values,
            result_path: vec![names.all_field.clone()],
            first_node: false,
            projection: Some(projection),
        })
    }

    /// Fetches one row by its primary key.
    ///
    /// `key` is either the bare key value or an object holding every key field.
    pub fn find_one(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        key: Option<&Json>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);
        let operation = names.one_operation();
        let projection = self.entity_projection(table, selection)?;

        let slots = key_slots(table, key);
        let (variables, arguments, values) = bind(&operation.operation, slots, mode_of(key))?;

        let mut root = FieldNode::new(&names.one_field).with_selection(selection_nodes(&projection, self.config));
        root.arguments = arguments;

        Ok(BuiltDocument {
            document: Document {
                kind: OperationKind::Query,
                name: operation.operation,
                variables,
                selection: vec![root],
            },
            variables: values,
            result_path: vec![names.one_field.clone()],
            first_node: false,
            projection: Some(projection),
        })
    }

    /// `createUser(input: $input) { user { ... } }`, with `data` bound under the entity field.
    pub fn create(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        data: Option<Json>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);
        let operation = names.create_operation();
        let projection = self.entity_projection(table, selection)?;
        let mode = mode_of(data.as_ref());

        let input = data.map(|data| {
            let mut input = Map::new();
            input.insert(names.entity_field.clone(), data);
            Json::Object(input)
        });

        let slots = vec![Slot {
            variable: String::from("input"),
            argument: String::from("input"),
            type_ref: TypeRef::input_object(&names.create_input_type).non_null(),
            value: input,
        }];

        let (variables, arguments, values) = bind(&operation.operation, slots, mode)?;
        let entity = FieldNode::new(&names.entity_field).with_selection(selection_nodes(&projection, self.config));

        let mut root = FieldNode::new(&names.create_field).with_selection(vec![entity]);
        root.arguments = arguments;

        Ok(self.mutation(operation, &names, &names.create_field, variables, root, values, projection))
    }

    /// Updates a row by key. The key and the patch are separate variables,
    /// combined into the input object inside the document.
    pub fn update(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        key: Option<&Json>,
        patch: Option<Json>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);
        let operation = names.update_operation();
        let projection = self.entity_projection(table, selection)?;
        let mode = if key.is_some() || patch.is_some() { Mode::Runtime } else { Mode::Template };

        let mut slots = key_slots(table, key);
        slots.push(Slot {
            variable: String::from("patch"),
            argument: String::from("patch"),
            type_ref: TypeRef::input_object(&names.patch_type).non_null(),
            value: patch,
        });

        let (variables, arguments, values) = bind(&operation.operation, slots, mode)?;
        let entity = FieldNode::new(&names.entity_field).with_selection(selection_nodes(&projection, self.config));

        let root = FieldNode::new(&names.update_field)
            .with_argument("input", Value::Object(arguments))
            .with_selection(vec![entity]);

        Ok(self.mutation(operation, &names, &names.update_field, variables, root, values, projection))
    }

    /// Deletes a row by key, echoing either the selected fields or only the key.
    pub fn delete(
        &self,
        table: &Table,
        selection: Option<&Selection>,
        key: Option<&Json>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = TableNames::new(table);
        let operation = names.delete_operation();

        let projection = match self.config.delete_returns {
            DeleteReturns::Entity => self.entity_projection(table, selection)?,
            DeleteReturns::Key => {
                let shape = self.shape(table)?;
                let keys = Selection::fields(table.primary_key().fields.into_iter().map(|key| key.name));
                project(self.catalog, shape, &keys, self.config.selection.default)
            }
        };

        let slots = key_slots(table, key);
        let (variables, arguments, values) = bind(&operation.operation, slots, mode_of(key))?;
        let entity = FieldNode::new(&names.entity_field).with_selection(selection_nodes(&projection, self.config));

        let root = FieldNode::new(&names.delete_field)
            .with_argument("input", Value::Object(arguments))
            .with_selection(vec![entity]);

        Ok(self.mutation(operation, &names, &names.delete_field, variables, root, values, projection))
    }

    #[allow(clippy::too_many_arguments)]
    fn mutation(
        &self,
        operation: OperationNames,
        names: &TableNames,
        field: &str,
        variables: Vec<VariableDefinition>,
        root: FieldNode,
        values: Map<String, Json>,
        projection: Projection,
    ) -> BuiltDocument {
        BuiltDocument {
            document: Document {
                kind: OperationKind::Mutation,
                name: operation.operation,
                variables,
                selection: vec![root],
            },
            variables: values,
            result_path: vec![field.to_owned(), names.entity_field.clone()],
            first_node: false,
            projection: Some(projection),
        }
    }

    /// A custom query or mutation with one variable per declared argument.
    ///
    /// Object results are selected through the catalog; scalar and enum
    /// results are taken as they are.
    pub fn custom(
        &self,
        operation: &Operation,
        selection: Option<&Selection>,
        args: Option<&Map<String, Json>>,
    ) -> Result<BuiltDocument, CodegenError> {
        let names = OperationNames::new(&operation.name, operation.kind);
        let mode = mode_of(args);

        let slots = operation
            .args
            .iter()
            .map(|arg| Slot {
                variable: arg.name.clone(),
                argument: arg.name.clone(),
                type_ref: arg.type_ref.clone(),
                value: args.and_then(|args| args.get(&arg.name)).cloned(),
            })
            .collect();

        let (variables, arguments, values) = bind(&names.operation, slots, mode)?;
        let (nodes, projection) = self.custom_selection(operation, selection)?;

        let mut root = FieldNode::new(&operation.name).with_selection(nodes);
        root.arguments = arguments;

        Ok(BuiltDocument {
            document: Document {
                kind: operation.kind,
                name: names.operation,
                variables,
                selection: vec![root],
            },
            variables: values,
            result_path: vec![operation.name.clone()],
            first_node: false,
            projection,
        })
    }

    fn custom_selection(
        &self,
        operation: &Operation,
        selection: Option<&Selection>,
    ) -> Result<(Vec<FieldNode>, Option<Projection>), CodegenError> {
        if operation.return_type.base_kind() != TypeKind::Object {
            return Ok((Vec::new(), None));
        }

        let Some(shape) = self.catalog.get(operation.return_type.base_name()) else {
            return Ok((vec![FieldNode::new("__typename")], None));
        };

        let selection = match selection.or_else(|| self.config.selection.operations.get(&operation.name)) {
            Some(selection) => {
                self.validate(shape, selection)?;
                selection.clone()
            }
            None => Selection::all_scalars(self.catalog, shape, self.config.selection.custom_depth),
        };

        let projection = project(self.catalog, shape, &selection, self.config.selection.default);

        Ok((selection_nodes(&projection, self.config), Some(projection)))
    }

    /// The projection of a table row for `selection`, or for the configured
    /// or default selection.
    pub fn entity_projection(&self, table: &Table, selection: Option<&Selection>) -> Result<Projection, CodegenError> {
        let shape = self.shape(table)?;

        let selection = match selection.or_else(|| self.config.selection.entities.get(&table.name)) {
            Some(selection) => {
                self.validate(shape, selection)?;
                selection.clone()
            }
            None => Selection::default_for(shape, self.config.selection.default),
        };

        Ok(project(self.catalog, shape, &selection, self.config.selection.default))
    }

    fn shape(&self, table: &Table) -> Result<&'a Shape, CodegenError> {
        self.catalog
            .get(&table.name)
            .ok_or_else(|| CodegenError::UnknownEntity(table.name.clone()))
    }

    fn validate(&self, shape: &Shape, selection: &Selection) -> Result<(), CodegenError> {
        validate(self.catalog, shape, selection, self.config.selection.strict_depth).map_err(|source| {
            CodegenError::Selection {
                entity: shape.name.clone(),
                source,
            }
        })
    }
}

fn mode_of<T>(value: Option<T>) -> Mode {
    if value.is_some() {
        Mode::Runtime
    } else {
        Mode::Template
    }
}

/// One non-null slot per primary key field.
fn key_slots(table: &Table, key: Option<&Json>) -> Vec<Slot> {
    let primary_key = table.primary_key();
    let single = primary_key.is_single();

    primary_key
        .fields
        .into_iter()
        .map(|field| {
            let value = key.and_then(|key| match key {
                Json::Object(fields) => fields.get(&field.name).cloned(),
                value if single => Some(value.clone()),
                _ => None,
            });

            Slot {
                variable: field.name.clone(),
                argument: field.name,
                type_ref: field.type_ref,
                value,
            }
        })
        .collect()
}

/// Declares the variables of `slots` and binds their values.
///
/// Templates declare every slot. At runtime only slots with a value are
/// declared and passed; a required slot without one is an error.
fn bind(
    operation: &str,
    slots: Vec<Slot>,
    mode: Mode,
) -> Result<(Vec<VariableDefinition>, Vec<(String, Value)>, Map<String, Json>), CodegenError> {
    let mut variables = Vec::new();
    let mut arguments = Vec::new();
    let mut values = Map::new();

    for slot in slots {
        match (mode, slot.value) {
            (Mode::Runtime, None) if slot.type_ref.is_required() => {
                return Err(CodegenError::MissingArgument {
                    operation: operation.to_owned(),
                    argument: slot.variable,
                })
            }
            (Mode::Runtime, None) => continue,
            (Mode::Runtime, Some(value)) => {
                values.insert(slot.variable.clone(), value);
            }
            (Mode::Template, _) => {}
        }

        arguments.push((slot.argument, Value::variable(&slot.variable)));
        variables.push(VariableDefinition::new(slot.variable, slot.type_ref));
    }

    Ok((variables, arguments, values))
}

fn page_info_nodes() -> Vec<FieldNode> {
    ["hasNextPage", "hasPreviousPage", "startCursor", "endCursor"]
        .into_iter()
        .map(FieldNode::new)
        .collect()
}

/// The field selection of a projection.
///
/// An object field needs at least one selected field, so an empty projection
/// selects `__typename`.
pub fn selection_nodes(projection: &Projection, config: &CodegenConfig) -> Vec<FieldNode> {
    if projection.is_empty() {
        return vec![FieldNode::new("__typename")];
    }

    let pagination = &config.pagination;

    projection
        .fields
        .iter()
        .map(|field| {
            let node = FieldNode::new(&field.name);

            match field.ty {
                ProjectedType::Leaf(_) => node,
                ProjectedType::Object { ref projection, .. } => node.with_selection(selection_nodes(projection, config)),
                ProjectedType::Connection(ref projection) => {
                    let mut node = node.with_selection(vec![
                        FieldNode::new(&pagination.total_count_field),
                        FieldNode::new(&pagination.nodes_field).with_selection(selection_nodes(projection, config)),
                    ]);

                    let arguments = &field.arguments;

                    if let Some(first) = arguments.first {
                        node = node.with_argument("first", Value::Int(i64::from(first)));
                    }

                    if let Some(ref filter) = arguments.filter {
                        node = node.with_argument(&pagination.filter_argument, Value::from(filter));
                    }

                    if let Some(ref order_by) = arguments.order_by {
                        let values = order_by.iter().cloned().map(Value::Enum).collect();
                        node = node.with_argument(&pagination.order_by_argument, Value::List(values));
                    }

                    node
                }
                ProjectedType::Unknown => node.with_selection(vec![FieldNode::new("__typename")]),
            }
        })
        .collect()
}
