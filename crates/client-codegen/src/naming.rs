use inflector::Inflector;

use crate::schema::{OperationKind, Table};

/// Every generated name derived from one table.
///
/// Explicit `query` and `inflection` overrides always win over the conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// GraphQL type name, e.g. `BlogPost`.
    pub type_name: String,
    /// `blogPost`
    pub singular: String,
    /// `blogPosts`
    pub plural: String,
    /// Lower-cased type name used by relationship configuration.
    pub entity_key: String,

    pub all_field: String,
    pub one_field: String,
    pub create_field: String,
    pub update_field: String,
    pub delete_field: String,
    /// Payload field holding the entity in mutation results.
    pub entity_field: String,
    pub filter_type: String,
    pub order_by_type: String,
    pub input_type: String,
    pub create_input_type: String,
    pub patch_type: String,
    pub update_input_type: String,
    pub delete_input_type: String,
    pub with_relations_type: String,
    pub select_type: String,
    pub scope_type: String,

    pub query_keys: String,
    pub mutation_keys: String,
}

impl TableNames {
    pub fn new(table: &Table) -> Self {
        let query = table.query.clone().unwrap_or_default();
        let inflection = table.inflection.clone().unwrap_or_default();

        let type_name = inflection.table_type.unwrap_or_else(|| table.name.clone());
        let singular = type_name.to_camel_case();
        let plural = singular.to_plural();
        let plural_type = plural.to_pascal_case();

        Self {
            entity_key: table.entity_key(),
            all_field: query.all.or(inflection.all_rows).unwrap_or_else(|| plural.clone()),
            one_field: query.one.or(inflection.table_field_name).unwrap_or_else(|| singular.clone()),
            create_field: query.create.unwrap_or_else(|| format!("create{type_name}")),
            update_field: query.update.unwrap_or_else(|| format!("update{type_name}")),
            delete_field: query.delete.unwrap_or_else(|| format!("delete{type_name}")),
            entity_field: singular.clone(),
            filter_type: inflection.filter_type.unwrap_or_else(|| format!("{type_name}Filter")),
            order_by_type: inflection
                .order_by_type
                .unwrap_or_else(|| format!("{plural_type}OrderBy")),
            input_type: inflection.input_type.unwrap_or_else(|| format!("{type_name}Input")),
            create_input_type: inflection
                .create_input_type
                .unwrap_or_else(|| format!("Create{type_name}Input")),
            patch_type: inflection.patch_type.unwrap_or_else(|| format!("{type_name}Patch")),
            update_input_type: inflection
                .update_input_type
                .unwrap_or_else(|| format!("Update{type_name}Input")),
            delete_input_type: inflection
                .delete_input_type
                .unwrap_or_else(|| format!("Delete{type_name}Input")),
            with_relations_type: format!("{type_name}WithRelations"),
            select_type: format!("{type_name}Select"),
            scope_type: format!("{type_name}Scope"),
            query_keys: format!("{singular}Keys"),
            mutation_keys: format!("{singular}MutationKeys"),
            type_name,
            singular,
            plural,
        }
    }

    /// Names of the CRUD types derived for this table, in emission order.
    pub fn crud_types(&self) -> [&str; 7] {
        [
            &self.filter_type,
            &self.order_by_type,
            &self.input_type,
            &self.create_input_type,
            &self.patch_type,
            &self.update_input_type,
            &self.delete_input_type,
        ]
    }

    pub fn all_operation(&self) -> OperationNames {
        OperationNames::new(&self.all_field, OperationKind::Query)
    }

    pub fn first_operation(&self) -> OperationNames {
        OperationNames::from_base(format!("First{}", self.type_name), OperationKind::Query)
    }

    pub fn one_operation(&self) -> OperationNames {
        OperationNames::new(&self.one_field, OperationKind::Query)
    }

    pub fn create_operation(&self) -> OperationNames {
        OperationNames::new(&self.create_field, OperationKind::Mutation)
    }

    pub fn update_operation(&self) -> OperationNames {
        OperationNames::new(&self.update_field, OperationKind::Mutation)
    }

    pub fn delete_operation(&self) -> OperationNames {
        OperationNames::new(&self.delete_field, OperationKind::Mutation)
    }
}

/// Names of everything generated for one GraphQL operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNames {
    /// `UsersQuery`
    pub operation: String,
    /// `usersQueryDocument`
    pub document: String,
    pub variables: String,
    pub result: String,
    /// `fetchUsersQuery` for queries, `createUserMutation` for mutations.
    pub function: String,
    pub hook: String,
    /// Only used for queries.
    pub prefetch: String,
    /// `fetchUsers`: the accessor taking a caller selection.
    pub select_function: String,
    /// `usersSelectDocument`: the document of `select_function`, built from the selection.
    pub select_document: String,
}

impl OperationNames {
    /// Names for the operation selecting the root field `field`.
    pub fn new(field: &str, kind: OperationKind) -> Self {
        Self::from_base(field.to_pascal_case(), kind)
    }

    fn from_base(base: String, kind: OperationKind) -> Self {
        let operation = format!("{base}{}", kind.suffix());
        let camel = operation.to_camel_case();
        let base_camel = base.to_camel_case();

        let select_function = match kind {
            OperationKind::Query => format!("fetch{base}"),
            OperationKind::Mutation => base_camel.clone(),
        };

        let function = match kind {
            OperationKind::Query => format!("fetch{operation}"),
            OperationKind::Mutation => camel.clone(),
        };

        Self {
            document: format!("{camel}Document"),
            variables: format!("{operation}Variables"),
            result: format!("{operation}Result"),
            hook: format!("use{operation}"),
            prefetch: format!("prefetch{operation}"),
            select_document: format!("{base_camel}SelectDocument"),
            select_function,
            function,
            operation,
        }
    }
}

/// `createdAt` becomes `CREATED_AT`, the casing of order-by enum values.
pub fn order_by_value(field: &str) -> String {
    field.to_screaming_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Inflection, QueryOverrides};

    #[test]
    fn conventions() {
        let names = TableNames::new(&Table::new("BlogPost"));

        assert_eq!(names.singular, "blogPost");
        assert_eq!(names.plural, "blogPosts");
        assert_eq!(names.entity_key, "blogpost");
        assert_eq!(names.all_field, "blogPosts");
        assert_eq!(names.one_field, "blogPost");
        assert_eq!(names.create_field, "createBlogPost");
        assert_eq!(names.order_by_type, "BlogPostsOrderBy");
        assert_eq!(names.query_keys, "blogPostKeys");
        assert_eq!(
            names.crud_types(),
            [
                "BlogPostFilter",
                "BlogPostsOrderBy",
                "BlogPostInput",
                "CreateBlogPostInput",
                "BlogPostPatch",
                "UpdateBlogPostInput",
                "DeleteBlogPostInput",
            ]
        );
    }

    #[test]
    fn overrides_win() {
        let mut table = Table::new("Person");
        table.query = Some(QueryOverrides {
            all: Some("allPeople".into()),
            update: Some("updatePersonById".into()),
            ..Default::default()
        });
        table.inflection = Some(Inflection {
            table_field_name: Some("personById".into()),
            filter_type: Some("PersonCondition".into()),
            ..Default::default()
        });

        let names = TableNames::new(&table);

        assert_eq!(names.all_field, "allPeople");
        assert_eq!(names.one_field, "personById");
        assert_eq!(names.update_field, "updatePersonById");
        assert_eq!(names.delete_field, "deletePerson");
        assert_eq!(names.filter_type, "PersonCondition");
    }

    #[test]
    fn operation_names() {
        let names = TableNames::new(&Table::new("User"));

        let all = names.all_operation();
        assert_eq!(all.operation, "UsersQuery");
        assert_eq!(all.document, "usersQueryDocument");
        assert_eq!(all.function, "fetchUsersQuery");
        assert_eq!(all.hook, "useUsersQuery");
        assert_eq!(all.select_function, "fetchUsers");
        assert_eq!(all.select_document, "usersSelectDocument");

        assert_eq!(names.first_operation().function, "fetchFirstUserQuery");
        assert_eq!(names.first_operation().select_function, "fetchFirstUser");

        let create = names.create_operation();
        assert_eq!(create.operation, "CreateUserMutation");
        assert_eq!(create.function, "createUserMutation");
        assert_eq!(create.variables, "CreateUserMutationVariables");
        assert_eq!(create.select_function, "createUser");

        assert_eq!(order_by_value("createdAt"), "CREATED_AT");
    }
}
