use std::collections::BTreeSet;

use indexmap::IndexMap;
use typescript_ast::{
    Export, ImportSet, Interface, Module, ModuleItem, ObjectType, Property, TypeAlias, TypeExpr, TypeParam,
};

use super::{definitions, header, EmitContext};
use crate::{
    naming::{order_by_value, TableNames},
    scalars::{FilterFamily, Operand},
    schema::{Table, TableField, TypeKind},
    tracker::TypeTracker,
};

const ENUM_FILTER: &str = "EnumFilter";

/// `types.ts` and the names it defines.
pub(super) struct TypesModule {
    pub module: Module,
    pub namespace: BTreeSet<String>,
}

/// A filter input type used by at least one table field.
enum UsedFilter {
    Scalar { ts_type: String, family: FilterFamily },
    Enum,
}

/// `types.ts`: registry types referenced by tables, scalar filters, entity
/// shapes and the CRUD input family of every table, in that order.
pub(super) fn module(ctx: &EmitContext<'_>) -> TypesModule {
    let tables = ctx
        .input
        .tables
        .iter()
        .map(|table| (table, TableNames::new(table)))
        .collect::<Vec<_>>();

    let filters = used_filters(ctx, &ctx.input.tables);
    let mut namespace = BTreeSet::new();

    for (table, names) in &tables {
        namespace.insert(table.name.clone());
        namespace.insert(names.type_name.clone());
        namespace.insert(names.with_relations_type.clone());
        namespace.insert(names.select_type.clone());
        namespace.extend(names.crud_types().map(str::to_owned));
    }

    namespace.extend(filters.keys().cloned());

    let mut tracker = TypeTracker::new(&namespace);
    let mut entities = Vec::new();
    let mut crud = Vec::new();

    for (table, names) in &tables {
        entities.push(entity(ctx, table, names, &mut tracker));
    }

    for (table, names) in &tables {
        entities.push(with_relations(ctx, table, names));
    }

    for (table, names) in &tables {
        entities.push(select(ctx, table, names));
    }

    for (table, names) in &tables {
        crud.extend(crud_types(ctx, table, names, &mut tracker));
    }

    let (_, schema_types) = tracker.into_parts();
    let definitions = definitions::collect(ctx, schema_types, &namespace);

    let mut imports = ImportSet::new();
    let has_connections = ctx
        .input
        .tables
        .iter()
        .any(|table| table.relations.iter().any(|(kind, _, _)| kind.is_collection()));

    if has_connections {
        imports.types("./select-types", ["ConnectionResult"]);
    }

    let mut module = Module::new().with_header(header("Entity, filter and input types"));
    module.extend_imports(imports.into_imports());

    for item in definitions.items {
        module.push_item(item);
    }

    for (name, filter) in &filters {
        module.push_item(filter_interface(name, filter));
    }

    for item in entities.into_iter().chain(crud) {
        module.push_item(item);
    }

    namespace.extend(definitions.emitted);

    TypesModule { module, namespace }
}

/// Filter types of the filterable fields of `tables`, in order of first use.
fn used_filters(ctx: &EmitContext<'_>, tables: &[Table]) -> IndexMap<String, UsedFilter> {
    let mut filters = IndexMap::new();

    for field in tables.iter().flat_map(|table| &table.fields) {
        if field.type_ref.is_list() {
            continue;
        }

        let name = field.type_ref.base_name();

        match field.type_ref.base_kind() {
            TypeKind::Scalar => {
                let Some(filter) = ctx.scalars.filter(name) else {
                    continue;
                };

                let ts_type = ctx.scalars.ts_type(name).unwrap_or("unknown").to_owned();

                filters.entry(filter.name.to_owned()).or_insert(UsedFilter::Scalar {
                    ts_type,
                    family: filter.family,
                });
            }
            TypeKind::Enum => {
                filters.entry(ENUM_FILTER.to_owned()).or_insert(UsedFilter::Enum);
            }
            _ => {}
        }
    }

    filters
}

fn filter_interface(name: &str, filter: &UsedFilter) -> Export {
    let mut interface = Interface::new(name.to_owned());

    let (value, family) = match filter {
        UsedFilter::Scalar { ts_type, family } => (TypeExpr::ident(ts_type.clone()), *family),
        UsedFilter::Enum => {
            interface.push_param(TypeParam::new("T"));
            (TypeExpr::ident("T"), FilterFamily::Equality)
        }
    };

    for (operator, operand, description) in family.operators() {
        let ty = match operand {
            Operand::Flag => TypeExpr::ident("boolean"),
            Operand::Value => value.clone(),
            Operand::List => value.clone().array(),
            Operand::Text => TypeExpr::ident("string"),
        };

        interface.push_property(Property::new(operator, ty).optional().docs(Some(description)));
    }

    Export::new(interface)
}

fn entity(ctx: &EmitContext<'_>, table: &Table, names: &TableNames, tracker: &mut TypeTracker<'_>) -> ModuleItem {
    let resolver = ctx.resolver();
    let mut interface = Interface::new(names.type_name.clone()).docs(table.description.as_deref());

    for field in &table.fields {
        let ty = resolver.resolve_nullable_expr(&field.type_ref, Some(&mut *tracker));
        interface.push_property(Property::new(field.name.clone(), ty).docs(field.description.as_deref()));
    }

    Export::new(interface).into()
}

/// Names of the table a relation points at, if it is one of the input tables.
fn related_names(ctx: &EmitContext<'_>, related: &str) -> Option<TableNames> {
    ctx.input.table(related).map(TableNames::new)
}

fn with_relations(ctx: &EmitContext<'_>, table: &Table, names: &TableNames) -> ModuleItem {
    let mut interface =
        Interface::new(names.with_relations_type.clone()).extends(TypeExpr::ident(names.type_name.clone()));

    for (kind, field, relation) in table.relations.iter() {
        let related = related_names(ctx, &relation.related_table)
            .map_or_else(|| TypeExpr::ident("unknown"), |related| TypeExpr::ident(related.with_relations_type));

        let ty = if kind.is_collection() {
            TypeExpr::generic("ConnectionResult", [related])
        } else {
            related.nullable()
        };

        interface.push_property(Property::new(field.to_owned(), ty));
    }

    Export::new(interface).into()
}

fn select(ctx: &EmitContext<'_>, table: &Table, names: &TableNames) -> ModuleItem {
    let pagination = &ctx.config.pagination;
    let mut interface = Interface::new(names.select_type.clone());

    for field in &table.fields {
        interface.push_property(Property::new(field.name.clone(), TypeExpr::ident("boolean")).optional());
    }

    for (kind, field, relation) in table.relations.iter() {
        let Some(related) = related_names(ctx, &relation.related_table) else {
            interface.push_property(Property::new(field.to_owned(), TypeExpr::ident("never")).optional());
            continue;
        };

        let mut nested = ObjectType::new()
            .with_property(Property::new("select", TypeExpr::ident(related.select_type.clone())));

        if kind.is_collection() {
            nested.push_property(Property::new("first", TypeExpr::ident("number")).optional());
            nested.push_property(
                Property::new(pagination.filter_argument.clone(), TypeExpr::ident(related.filter_type.clone())).optional(),
            );
            nested.push_property(
                Property::new(
                    pagination.order_by_argument.clone(),
                    TypeExpr::ident(related.order_by_type.clone()).array(),
                )
                .optional(),
            );
        }

        interface.push_property(Property::new(field.to_owned(), nested).optional());
    }

    Export::new(interface).into()
}

/// The input family of one table. Registry definitions of the same name win.
fn crud_types(
    ctx: &EmitContext<'_>,
    table: &Table,
    names: &TableNames,
    tracker: &mut TypeTracker<'_>,
) -> Vec<ModuleItem> {
    let derived = [
        filter(ctx, table, names),
        order_by(table, names),
        input(ctx, table, names, tracker),
        create_input(names),
        patch(ctx, table, names, tracker),
        update_input(ctx, table, names, tracker),
        delete_input(ctx, table, names, tracker),
    ];

    let mut items = Vec::with_capacity(derived.len());

    for (name, derived) in names.crud_types().into_iter().zip(derived) {
        let declared = match ctx.input.registry.get(name) {
            Some(resolved) => definitions::definition(ctx, resolved, tracker),
            None => None,
        };

        items.push(declared.unwrap_or(derived));
    }

    items
}

fn filter(ctx: &EmitContext<'_>, table: &Table, names: &TableNames) -> ModuleItem {
    let mut interface = Interface::new(names.filter_type.clone())
        .docs(Some(format!("A filter on `{}` rows. All fields are combined with a logical and.", names.type_name)));

    for field in &table.fields {
        if field.type_ref.is_list() {
            continue;
        }

        let name = field.type_ref.base_name();

        let ty = match field.type_ref.base_kind() {
            TypeKind::Scalar => match ctx.scalars.filter(name) {
                Some(filter) => TypeExpr::ident(filter.name),
                None => continue,
            },
            TypeKind::Enum => TypeExpr::generic(ENUM_FILTER, [TypeExpr::ident(name.to_owned())]),
            _ => continue,
        };

        interface.push_property(Property::new(field.name.clone(), ty).optional());
    }

    let own = || TypeExpr::ident(names.filter_type.clone());

    interface.push_property(Property::new("and", own().array()).optional());
    interface.push_property(Property::new("or", own().array()).optional());
    interface.push_property(Property::new("not", own()).optional());

    Export::new(interface).into()
}

fn order_by(table: &Table, names: &TableNames) -> ModuleItem {
    let mut values = vec![
        String::from("NATURAL"),
        String::from("PRIMARY_KEY_ASC"),
        String::from("PRIMARY_KEY_DESC"),
    ];

    for field in table.fields.iter().filter(|field| is_orderable(field)) {
        let value = order_by_value(&field.name);
        values.push(format!("{value}_ASC"));
        values.push(format!("{value}_DESC"));
    }

    let union = TypeExpr::union(values.into_iter().map(TypeExpr::string));

    Export::new(TypeAlias::new(names.order_by_type.clone(), union)).into()
}

fn is_orderable(field: &TableField) -> bool {
    !field.type_ref.is_list() && field.type_ref.base_kind().is_leaf()
}

fn field_property(ctx: &EmitContext<'_>, field: &TableField, optional: bool, tracker: &mut TypeTracker<'_>) -> Property {
    let ty = ctx.resolver().resolve_nullable_expr(&field.type_ref, Some(tracker));
    Property::new(field.name.clone(), ty).optional_if(optional)
}

/// Row data for inserts. Key fields may be left to the server.
fn input(ctx: &EmitContext<'_>, table: &Table, names: &TableNames, tracker: &mut TypeTracker<'_>) -> ModuleItem {
    let primary_key = table.primary_key();
    let mut interface = Interface::new(names.input_type.clone());

    for field in &table.fields {
        let optional = primary_key.contains(&field.name) || !field.type_ref.is_required();
        interface.push_property(field_property(ctx, field, optional, tracker));
    }

    Export::new(interface).into()
}

fn client_mutation_id() -> Property {
    Property::new("clientMutationId", TypeExpr::ident("string")).optional()
}

fn create_input(names: &TableNames) -> ModuleItem {
    let mut interface = Interface::new(names.create_input_type.clone());
    interface.push_property(client_mutation_id());
    interface.push_property(Property::new(
        names.entity_field.clone(),
        TypeExpr::ident(names.input_type.clone()),
    ));

    Export::new(interface).into()
}

fn patch(ctx: &EmitContext<'_>, table: &Table, names: &TableNames, tracker: &mut TypeTracker<'_>) -> ModuleItem {
    let mut interface = Interface::new(names.patch_type.clone());

    for field in &table.fields {
        interface.push_property(field_property(ctx, field, true, tracker));
    }

    Export::new(interface).into()
}

fn key_properties(ctx: &EmitContext<'_>, table: &Table, tracker: &mut TypeTracker<'_>) -> Vec<Property> {
    let resolver = ctx.resolver();

    table
        .primary_key()
        .fields
        .into_iter()
        .map(|key| Property::new(key.name, resolver.resolve_expr(&key.type_ref, Some(&mut *tracker))))
        .collect()
}

fn update_input(ctx: &EmitContext<'_>, table: &Table, names: &TableNames, tracker: &mut TypeTracker<'_>) -> ModuleItem {
    let mut interface = Interface::new(names.update_input_type.clone());
    interface.push_property(client_mutation_id());

    for property in key_properties(ctx, table, tracker) {
        interface.push_property(property);
    }

    interface.push_property(Property::new("patch", TypeExpr::ident(names.patch_type.clone())));

    Export::new(interface).into()
}

fn delete_input(ctx: &EmitContext<'_>, table: &Table, names: &TableNames, tracker: &mut TypeTracker<'_>) -> ModuleItem {
    let mut interface = Interface::new(names.delete_input_type.clone());
    interface.push_property(client_mutation_id());

    for property in key_properties(ctx, table, tracker) {
        interface.push_property(property);
    }

    Export::new(interface).into()
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::schema::TypeRef;

    #[test]
    fn enum_filter() {
        let rendered = filter_interface(ENUM_FILTER, &UsedFilter::Enum).to_string();

        expect![[r#"
            export interface EnumFilter<T> {
              /** Is null (if `true` is specified) or is not null (if `false` is specified). */
              isNull?: boolean;
              /** Equal to the specified value. */
              equalTo?: T;
              /** Not equal to the specified value. */
              notEqualTo?: T;
              /** Not equal to the specified value, treating null like an ordinary value. */
              distinctFrom?: T;
              /** Equal to the specified value, treating null like an ordinary value. */
              notDistinctFrom?: T;
              /** Included in the specified list. */
              in?: T[];
              /** Not included in the specified list. */
              notIn?: T[];
            }"#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn order_by_values() {
        let table = Table::new("User")
            .with_field("id", TypeRef::scalar("UUID").non_null())
            .with_field("createdAt", TypeRef::scalar("Datetime"))
            .with_field("tags", TypeRef::scalar("String").list());

        let rendered = order_by(&table, &TableNames::new(&table)).to_string();

        expect![[r#"export type UsersOrderBy = 'NATURAL' | 'PRIMARY_KEY_ASC' | 'PRIMARY_KEY_DESC' | 'ID_ASC' | 'ID_DESC' | 'CREATED_AT_ASC' | 'CREATED_AT_DESC';"#]]
            .assert_eq(&rendered);
    }
}
