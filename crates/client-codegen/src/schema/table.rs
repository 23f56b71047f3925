use super::TypeRef;

/// An entity of the schema, backed by one database table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// The GraphQL type name, e.g. `User`.
    pub name: String,
    #[serde(default)]
    pub fields: Vec<TableField>,
    #[serde(default)]
    pub relations: Relations,
    /// Overrides for the root operation field names.
    #[serde(default)]
    pub query: Option<QueryOverrides>,
    /// Overrides for the names of derived types.
    #[serde(default)]
    pub inflection: Option<Inflection>,
    #[serde(default)]
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
}

impl TableField {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    ManyToMany,
}

impl RelationKind {
    /// Collection relations are exposed as paginated connections.
    pub fn is_collection(self) -> bool {
        matches!(self, RelationKind::HasMany | RelationKind::ManyToMany)
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Relations {
    pub belongs_to: Vec<Relation>,
    pub has_one: Vec<Relation>,
    pub has_many: Vec<Relation>,
    pub many_to_many: Vec<Relation>,
}

impl Relations {
    /// All relations that are exposed as a field, in declaration order per kind.
    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, &str, &Relation)> {
        fn tagged(kind: RelationKind, relations: &[Relation]) -> impl Iterator<Item = (RelationKind, &str, &Relation)> {
            relations
                .iter()
                .filter_map(move |relation| Some((kind, relation.field_name.as_deref()?, relation)))
        }

        tagged(RelationKind::BelongsTo, &self.belongs_to)
            .chain(tagged(RelationKind::HasOne, &self.has_one))
            .chain(tagged(RelationKind::HasMany, &self.has_many))
            .chain(tagged(RelationKind::ManyToMany, &self.many_to_many))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Field exposing the relation. Relations without one are not reachable from the client.
    #[serde(default)]
    pub field_name: Option<String>,
    /// Type name of the related table.
    pub related_table: String,
}

impl Relation {
    pub fn new(field_name: impl Into<String>, related_table: impl Into<String>) -> Self {
        Self {
            field_name: Some(field_name.into()),
            related_table: related_table.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOverrides {
    pub all: Option<String>,
    pub one: Option<String>,
    pub create: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inflection {
    pub table_type: Option<String>,
    pub all_rows: Option<String>,
    pub table_field_name: Option<String>,
    pub filter_type: Option<String>,
    pub order_by_type: Option<String>,
    pub input_type: Option<String>,
    pub create_input_type: Option<String>,
    pub patch_type: Option<String>,
    pub update_input_type: Option<String>,
    pub delete_input_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    pub primary_key: Vec<PrimaryKeyConstraint>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrimaryKeyConstraint {
    pub name: Option<String>,
    /// Names of the key fields.
    pub fields: Vec<String>,
}

/// The key used to address a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    pub fields: Vec<KeyField>,
    /// True when the table declares no key and no `id` field.
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyField {
    pub name: String,
    /// Always non-null.
    pub type_ref: TypeRef,
}

impl PrimaryKey {
    pub fn is_single(&self) -> bool {
        self.fields.len() == 1
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|key| key.name == field)
    }

    pub fn first(&self) -> &KeyField {
        // Never empty: resolution falls back to a synthetic `id` key.
        &self.fields[0]
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Relations::default(),
            query: None,
            inflection: None,
            constraints: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.fields.push(TableField::new(name, type_ref));
        self
    }

    #[must_use]
    pub fn with_relation(mut self, kind: RelationKind, relation: Relation) -> Self {
        let relations = match kind {
            RelationKind::BelongsTo => &mut self.relations.belongs_to,
            RelationKind::HasOne => &mut self.relations.has_one,
            RelationKind::HasMany => &mut self.relations.has_many,
            RelationKind::ManyToMany => &mut self.relations.many_to_many,
        };

        relations.push(relation);
        self
    }

    #[must_use]
    pub fn with_primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let constraint = PrimaryKeyConstraint {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        };

        self.constraints.get_or_insert_with(Constraints::default).primary_key = vec![constraint];
        self
    }

    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Lower-cased type name, the key used by relationship configuration.
    pub fn entity_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// The first declared primary key group, else a field named `id`, else a
    /// synthetic `id: UUID!`.
    pub fn primary_key(&self) -> PrimaryKey {
        let declared = self
            .constraints
            .as_ref()
            .and_then(|constraints| constraints.primary_key.first())
            .filter(|constraint| !constraint.fields.is_empty());

        if let Some(constraint) = declared {
            let fields = constraint
                .fields
                .iter()
                .map(|name| KeyField {
                    name: name.clone(),
                    type_ref: self
                        .field(name)
                        .map_or_else(|| TypeRef::scalar("UUID"), |field| field.type_ref.clone())
                        .non_null(),
                })
                .collect();

            return PrimaryKey {
                fields,
                synthetic: false,
            };
        }

        if let Some(id) = self.field("id") {
            return PrimaryKey {
                fields: vec![KeyField {
                    name: id.name.clone(),
                    type_ref: id.type_ref.clone().non_null(),
                }],
                synthetic: false,
            };
        }

        PrimaryKey {
            fields: vec![KeyField {
                name: "id".to_owned(),
                type_ref: TypeRef::scalar("UUID").non_null(),
            }],
            synthetic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_primary_key_wins() {
        let table = Table::new("Membership")
            .with_field("id", TypeRef::scalar("Int").non_null())
            .with_field("orgId", TypeRef::scalar("UUID").non_null())
            .with_field("userId", TypeRef::scalar("UUID"))
            .with_primary_key(["orgId", "userId"]);

        let key = table.primary_key();

        assert!(!key.synthetic);
        assert!(!key.is_single());
        assert_eq!(key.fields[1].name, "userId");
        assert_eq!(key.fields[1].type_ref, TypeRef::scalar("UUID").non_null());
    }

    #[test]
    fn id_field_is_the_fallback() {
        let table = Table::new("User").with_field("id", TypeRef::scalar("Int").non_null());
        let key = table.primary_key();

        assert!(key.is_single());
        assert_eq!(key.first().type_ref.to_string(), "Int!");
    }

    #[test]
    fn synthetic_uuid_key() {
        let table = Table::new("Event").with_field("name", TypeRef::scalar("String"));
        let key = table.primary_key();

        assert!(key.synthetic);
        assert_eq!(key.first().name, "id");
        assert_eq!(key.first().type_ref.to_string(), "UUID!");
    }

    #[test]
    fn relations_without_field_names_are_skipped() {
        let mut table = Table::new("User")
            .with_relation(RelationKind::HasMany, Relation::new("posts", "Post"))
            .with_relation(RelationKind::BelongsTo, Relation::new("organization", "Organization"));

        table.relations.has_one.push(Relation {
            field_name: None,
            related_table: "Profile".into(),
        });

        let fields = table.relations.iter().map(|(kind, name, _)| (kind, name)).collect::<Vec<_>>();

        assert_eq!(
            fields,
            [(RelationKind::BelongsTo, "organization"), (RelationKind::HasMany, "posts")]
        );
    }
}
