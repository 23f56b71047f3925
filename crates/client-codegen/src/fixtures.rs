//! Schemas shared by unit tests.

use crate::schema::{FieldDefinition, Relation, RelationKind, ResolvedType, SchemaInput, Table, TypeRef, TypeRegistry};

/// Users with posts, a posts connection and a sign-in payload.
pub(crate) fn sample_input() -> SchemaInput {
    let users = Table::new("User")
        .with_field("id", TypeRef::scalar("UUID").non_null())
        .with_field("name", TypeRef::scalar("String"))
        .with_field("createdAt", TypeRef::scalar("Datetime").non_null())
        .with_relation(RelationKind::HasMany, Relation::new("posts", "Post"));

    let posts = Table::new("Post")
        .with_field("id", TypeRef::scalar("UUID").non_null())
        .with_field("title", TypeRef::scalar("String").non_null())
        .with_field("userId", TypeRef::scalar("UUID").non_null())
        .with_relation(RelationKind::BelongsTo, Relation::new("author", "User"));

    let registry = TypeRegistry::from_iter([
        ResolvedType::object(
            "PostsConnection",
            vec![
                FieldDefinition::new("nodes", TypeRef::object("Post").non_null().list().non_null()),
                FieldDefinition::new("totalCount", TypeRef::scalar("Int").non_null()),
            ],
        ),
        ResolvedType::object(
            "SignInPayload",
            vec![
                FieldDefinition::new("token", TypeRef::scalar("String")),
                FieldDefinition::new("user", TypeRef::object("User")),
                FieldDefinition::new("recentPosts", TypeRef::object("PostsConnection").non_null()),
            ],
        ),
    ]);

    SchemaInput {
        tables: vec![users, posts],
        registry,
        ..Default::default()
    }
}
