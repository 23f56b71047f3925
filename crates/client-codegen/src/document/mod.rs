//! Request documents for table and custom operations.

mod ast;
mod builder;

pub use ast::{Document, FieldNode, Value, VariableDefinition};
pub use builder::{selection_nodes, BuiltDocument, DocumentBuilder, FindManyArgs};

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use serde_json::json;

    use super::*;
    use crate::{
        config::{CodegenConfig, DeleteReturns},
        fixtures::sample_input,
        schema::{FieldDefinition, Operation, ResolvedType, SchemaInput, Table, TypeRef},
        select::{NestedSelection, Selection, ShapeCatalog},
        CodegenError,
    };

    struct Fixture {
        input: SchemaInput,
        catalog: ShapeCatalog,
        config: CodegenConfig,
    }

    impl Fixture {
        fn new(config: CodegenConfig) -> Self {
            let input = sample_input();
            let catalog = ShapeCatalog::build(&input, &config.pagination);

            Self { input, catalog, config }
        }

        fn builder(&self) -> DocumentBuilder<'_> {
            DocumentBuilder::new(&self.catalog, &self.config)
        }

        fn user(&self) -> &crate::schema::Table {
            self.input.table("User").unwrap()
        }
    }

    #[test]
    fn find_many_binds_only_supplied_arguments() {
        let fixture = Fixture::new(CodegenConfig::default());
        let args = FindManyArgs {
            first: Some(10),
            order_by: Some(vec!["NAME_ASC".into()]),
            ..Default::default()
        };

        let built = fixture
            .builder()
            .find_many(fixture.user(), Some(&Selection::fields(["id", "name"])), Some(&args))
            .unwrap();

        expect![[r#"
            query UsersQuery($orderBy: [UsersOrderBy!], $first: Int) {
              users(orderBy: $orderBy, first: $first) {
                totalCount
                nodes {
                  id
                  name
                }
                pageInfo {
                  hasNextPage
                  hasPreviousPage
                  startCursor
                  endCursor
                }
              }
            }"#]]
        .assert_eq(&built.document.to_string());

        assert_eq!(json!(built.variables), json!({ "orderBy": ["NAME_ASC"], "first": 10 }));
        assert!(!built.document.to_string().contains("null"));
    }

    #[test]
    fn find_many_template_declares_every_slot() {
        let fixture = Fixture::new(CodegenConfig::default());
        let built = fixture.builder().find_many(fixture.user(), None, None).unwrap();

        let declared = built
            .document
            .variables
            .iter()
            .map(|variable| format!("${}: {}", variable.name, variable.type_ref))
            .collect::<Vec<_>>();

        assert_eq!(
            declared,
            [
                "$filter: UserFilter",
                "$orderBy: [UsersOrderBy!]",
                "$first: Int",
                "$last: Int",
                "$offset: Int",
                "$before: Cursor",
                "$after: Cursor",
            ]
        );
        assert!(built.variables.is_empty());

        let nodes = built.document.root_field().and_then(|root| root.child("nodes")).unwrap();
        assert_eq!(nodes.selection, [FieldNode::new("id")]);
    }

    #[test]
    fn find_first_takes_the_head() {
        let fixture = Fixture::new(CodegenConfig::default());
        let args = FindManyArgs {
            filter: Some(json!({ "name": { "equalTo": "Ada" } })),
            first: Some(50),
            ..Default::default()
        };

        let built = fixture.builder().find_first(fixture.user(), None, Some(&args)).unwrap();
        let root = built.document.root_field().unwrap();

        assert_eq!(built.document.name, "FirstUserQuery");
        assert_eq!(built.document.variables.len(), 1);
        assert_eq!(root.arguments.last(), Some(&("first".to_owned(), Value::Int(1))));
        assert!(built.variables.get("first").is_none());

        let data = json!({ "users": { "nodes": [{ "id": "u1" }, { "id": "u2" }] } });
        assert_eq!(built.extract(&data), Some(&json!({ "id": "u1" })));
        assert_eq!(built.extract(&json!({ "users": { "nodes": [] } })), None);
    }

    #[test]
    fn find_one_by_key() {
        let fixture = Fixture::new(CodegenConfig::default());
        let built = fixture
            .builder()
            .find_one(fixture.user(), Some(&Selection::fields(["id", "name"])), Some(&json!("u1")))
            .unwrap();

        expect![[r#"
            query UserQuery($id: UUID!) {
              user(id: $id) {
                id
                name
              }
            }"#]]
        .assert_eq(&built.document.to_string());

        assert_eq!(json!(built.variables), json!({ "id": "u1" }));
    }

    #[test]
    fn create_nests_data_under_the_entity_field() {
        let fixture = Fixture::new(CodegenConfig::default());
        let built = fixture
            .builder()
            .create(fixture.user(), None, Some(json!({ "name": "Ada" })))
            .unwrap();

        expect![[r#"
            mutation CreateUserMutation($input: CreateUserInput!) {
              createUser(input: $input) {
                user {
                  id
                }
              }
            }"#]]
        .assert_eq(&built.document.to_string());

        assert_eq!(json!(built.variables), json!({ "input": { "user": { "name": "Ada" } } }));
        assert_eq!(built.result_path, ["createUser", "user"]);
    }

    #[test]
    fn update_by_key() {
        let fixture = Fixture::new(CodegenConfig::default());
        let built = fixture
            .builder()
            .update(
                fixture.user(),
                Some(&Selection::fields(["id", "name"])),
                Some(&json!("u1")),
                Some(json!({ "name": "X" })),
            )
            .unwrap();

        let variables = &built.document.variables;
        assert_eq!(variables.len(), 2);
        assert_eq!(variables[0].name, "id");
        assert!(variables[0].type_ref.is_required());
        assert_eq!(variables[1].name, "patch");
        assert_eq!(variables[1].type_ref, TypeRef::input_object("UserPatch").non_null());
        assert_eq!(json!(built.variables), json!({ "id": "u1", "patch": { "name": "X" } }));

        let root = built.document.root_field().unwrap();
        assert_eq!(root.name, "updateUser");
        assert_eq!(root.selection.len(), 1);
        assert_eq!(root.selection[0].name, "user");
        assert_eq!(built.result_path.last().map(String::as_str), Some("user"));

        expect![[r#"
            mutation UpdateUserMutation($id: UUID!, $patch: UserPatch!) {
              updateUser(input: { id: $id, patch: $patch }) {
                user {
                  id
                  name
                }
              }
            }"#]]
        .assert_eq(&built.document.to_string());
    }

    #[test]
    fn update_without_patch_is_an_error() {
        let fixture = Fixture::new(CodegenConfig::default());
        let error = fixture
            .builder()
            .update(fixture.user(), None, Some(&json!("u1")), None)
            .unwrap_err();

        assert!(matches!(error, CodegenError::MissingArgument { ref argument, .. } if argument == "patch"));
    }

    #[test]
    fn delete_returning_the_key() {
        let config = CodegenConfig {
            delete_returns: DeleteReturns::Key,
            ..Default::default()
        };
        let fixture = Fixture::new(config);
        let built = fixture
            .builder()
            .delete(fixture.user(), Some(&Selection::fields(["name"])), Some(&json!({ "id": "u1" })))
            .unwrap();

        expect![[r#"
            mutation DeleteUserMutation($id: UUID!) {
              deleteUser(input: { id: $id }) {
                user {
                  id
                }
              }
            }"#]]
        .assert_eq(&built.document.to_string());
    }

    #[test]
    fn nested_connection_arguments_are_inlined() {
        let fixture = Fixture::new(CodegenConfig::default());
        let selection = Selection::fields(["id"]).nested(
            "posts",
            NestedSelection::new(Selection::fields(["title"]))
                .first(5)
                .filter(json!({ "title": { "startsWith": "Rust" } }))
                .order_by(["CREATED_AT_DESC"]),
        );

        let built = fixture.builder().find_one(fixture.user(), Some(&selection), None).unwrap();

        expect![[r#"
            query UserQuery($id: UUID!) {
              user(id: $id) {
                id
                posts(first: 5, filter: { title: { startsWith: "Rust" } }, orderBy: [CREATED_AT_DESC]) {
                  totalCount
                  nodes {
                    title
                  }
                }
              }
            }"#]]
        .assert_eq(&built.document.to_string());
    }

    #[test]
    fn invalid_selection_names_the_entity() {
        let fixture = Fixture::new(CodegenConfig::default());
        let error = fixture
            .builder()
            .find_one(fixture.user(), Some(&Selection::fields(["id", "bogusField"])), None)
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "invalid selection for User: `bogusField` is not a field of User (at User)"
        );
    }

    #[test]
    fn custom_operations() {
        let fixture = Fixture::new(CodegenConfig::default());
        let sign_in = Operation::mutation("signIn", TypeRef::object("SignInPayload").non_null())
            .with_arg("email", TypeRef::scalar("String").non_null())
            .with_arg("remember", TypeRef::scalar("Boolean"));

        let args = json!({ "email": "ada@example.com" });
        let built = fixture
            .builder()
            .custom(&sign_in, Some(&Selection::fields(["token"])), args.as_object())
            .unwrap();

        expect![[r#"
            mutation SignInMutation($email: String!) {
              signIn(email: $email) {
                token
              }
            }"#]]
        .assert_eq(&built.document.to_string());

        let count = Operation::query("userCount", TypeRef::scalar("Int").non_null());
        let built = fixture.builder().custom(&count, None, None).unwrap();

        assert_eq!(built.document.to_string(), "query UserCountQuery {\n  userCount\n}");
        assert!(built.projection.is_none());
    }

    #[test]
    fn custom_operation_default_selection_is_bounded() {
        let fixture = Fixture::new(CodegenConfig::default());
        let sign_in = Operation::mutation("signIn", TypeRef::object("SignInPayload"));

        let template = fixture.builder().custom(&sign_in, None, None).unwrap();
        let root = template.document.root_field().unwrap();

        assert_eq!(
            root.selection.iter().map(|field| field.name.as_str()).collect::<Vec<_>>(),
            ["token", "user", "recentPosts"]
        );
        assert_eq!(root.child("user").map(|user| user.selection.len()), Some(3));
    }

    #[test]
    fn payload_without_selectable_fields_selects_typename() {
        let mut input = sample_input();
        input.registry.insert(ResolvedType::object(
            "SearchPayload",
            vec![FieldDefinition::new("result", TypeRef::object("SearchResult"))],
        ));
        input.registry.insert(ResolvedType::union("SearchResult", ["User", "Post"]));

        let config = CodegenConfig::default();
        let catalog = ShapeCatalog::build(&input, &config.pagination);
        let search = Operation::query("search", TypeRef::object("SearchPayload").non_null());

        let built = DocumentBuilder::new(&catalog, &config).custom(&search, None, None).unwrap();

        expect![[r#"
            query SearchQuery {
              search {
                __typename
              }
            }"#]]
        .assert_eq(&built.document.to_string());
    }

    #[test]
    fn synthetic_key_delete_selects_typename() {
        let mut input = sample_input();
        input
            .tables
            .push(Table::new("Tag").with_field("label", TypeRef::scalar("String").non_null()));

        let config = CodegenConfig {
            delete_returns: DeleteReturns::Key,
            ..Default::default()
        };
        let catalog = ShapeCatalog::build(&input, &config.pagination);
        let tag = input.table("Tag").unwrap();

        let built = DocumentBuilder::new(&catalog, &config)
            .delete(tag, None, Some(&json!("t1")))
            .unwrap();

        let entity = built.document.root_field().and_then(|root| root.child("tag")).unwrap();
        assert_eq!(entity.selection, [FieldNode::new("__typename")]);
    }

    #[test]
    fn large_page_sizes_stay_positive() {
        let fixture = Fixture::new(CodegenConfig::default());
        let selection = Selection::fields(["id"]).nested(
            "posts",
            NestedSelection::new(Selection::fields(["title"])).first(u32::MAX),
        );

        let built = fixture.builder().find_one(fixture.user(), Some(&selection), None).unwrap();
        let posts = built.document.root_field().and_then(|root| root.child("posts")).unwrap();

        assert_eq!(posts.arguments, [("first".to_owned(), Value::Int(4_294_967_295))]);
        assert!(built.document.to_string().contains("posts(first: 4294967295) {"));
    }
}
