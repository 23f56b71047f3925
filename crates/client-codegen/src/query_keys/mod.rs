//! Hierarchical cache keys for every entity and custom operation.

mod hierarchy;
mod render;

pub use hierarchy::{ancestor_chain, Ancestor, EntityKeys};
pub use render::KeyExprs;

use crate::{config::QueryKeysConfig, naming::TableNames, schema::Table};

/// Name of the namespace holding custom operation keys in the root stores.
pub const CUSTOM_SCOPE: &str = "custom";

/// Used instead of [`CUSTOM_SCOPE`] when an entity already takes that name.
const CUSTOM_SCOPE_FALLBACK: &str = "customOperations";

/// Key factories of one entity, with the names they are emitted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKeyFactory {
    /// Property of the root store, e.g. `blogPost`.
    pub store_key: String,
    /// `blogPostKeys`
    pub ident: String,
    /// `blogPostMutationKeys`
    pub mutation_ident: String,
    /// `BlogPostScope`
    pub scope_type: String,
    pub keys: EntityKeys,
}

/// Every entity's key factories plus the custom operation keys, addressable
/// through one root object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKeyStore {
    entities: Vec<EntityKeyFactory>,
    custom_queries: Vec<String>,
    custom_mutations: Vec<String>,
    custom_scope: String,
}

/// Names of the custom operation key factories for a root store property.
fn custom_idents(scope: &str) -> [String; 2] {
    [format!("{scope}QueryKeys"), format!("{scope}MutationKeys")]
}

impl QueryKeyStore {
    pub fn new<'a>(
        tables: impl IntoIterator<Item = &'a Table>,
        custom_queries: impl IntoIterator<Item = String>,
        custom_mutations: impl IntoIterator<Item = String>,
        config: &QueryKeysConfig,
    ) -> Self {
        let entities = tables
            .into_iter()
            .map(|table| {
                let names = TableNames::new(table);

                EntityKeyFactory {
                    keys: EntityKeys::new(names.entity_key.clone(), &config.relationships),
                    store_key: names.singular,
                    ident: names.query_keys,
                    mutation_ident: names.mutation_keys,
                    scope_type: names.scope_type,
                }
            })
            .collect::<Vec<EntityKeyFactory>>();

        let taken = |scope: &str| {
            let idents = custom_idents(scope);

            entities.iter().any(|factory| {
                factory.store_key == scope || idents.contains(&factory.ident) || idents.contains(&factory.mutation_ident)
            })
        };

        let mut custom_scope = String::from(CUSTOM_SCOPE);

        if taken(&custom_scope) {
            custom_scope = String::from(CUSTOM_SCOPE_FALLBACK);
            let mut suffix = 2;

            while taken(&custom_scope) {
                custom_scope = format!("{CUSTOM_SCOPE_FALLBACK}{suffix}");
                suffix += 1;
            }
        }

        Self {
            custom_scope,
            entities,
            custom_queries: custom_queries.into_iter().collect(),
            custom_mutations: custom_mutations.into_iter().collect(),
        }
    }

    pub fn entities(&self) -> &[EntityKeyFactory] {
        &self.entities
    }

    /// The factory of the entity with the given lower-cased key.
    pub fn entity(&self, entity_key: &str) -> Option<&EntityKeyFactory> {
        self.entities.iter().find(|factory| factory.keys.entity == entity_key)
    }

    pub fn custom_queries(&self) -> &[String] {
        &self.custom_queries
    }

    pub fn custom_mutations(&self) -> &[String] {
        &self.custom_mutations
    }

    /// Property of the root stores holding custom operation keys.
    pub fn custom_scope(&self) -> &str {
        &self.custom_scope
    }

    /// `customQueryKeys`, or the fallback's factory name.
    pub fn custom_query_ident(&self) -> String {
        let [query, _] = custom_idents(&self.custom_scope);
        query
    }

    /// `customMutationKeys`, or the fallback's factory name.
    pub fn custom_mutation_ident(&self) -> String {
        let [_, mutation] = custom_idents(&self.custom_scope);
        mutation
    }

    /// First-level names of the root query key store.
    pub fn scopes(&self) -> Vec<&str> {
        let mut scopes = self.entities.iter().map(|factory| factory.store_key.as_str()).collect::<Vec<_>>();

        if !self.custom_queries.is_empty() {
            scopes.push(self.custom_scope.as_str());
        }

        scopes
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::config::EntityRelationship;

    #[test]
    fn store_scopes() {
        let config = QueryKeysConfig {
            relationships: IndexMap::from([("post".to_owned(), EntityRelationship::new("user", "userId"))]),
            ..Default::default()
        };

        let tables = [Table::new("User"), Table::new("Post")];
        let store = QueryKeyStore::new(&tables, ["currentUser".to_owned()], [], &config);

        assert_eq!(store.scopes(), ["user", "post", "custom"]);
        assert!(store.entity("post").is_some_and(|post| post.keys.is_scoped()));
        assert!(!store.entity("user").is_some_and(|user| user.keys.is_scoped()));

        let without_custom = QueryKeyStore::new(&tables, [], [], &config);
        assert_eq!(without_custom.scopes(), ["user", "post"]);
    }

    #[test]
    fn custom_scope_avoids_entity_names() {
        let tables = [Table::new("Custom"), Table::new("CustomOperation")];
        let store = QueryKeyStore::new(&tables, ["search".to_owned()], [], &QueryKeysConfig::default());

        assert_eq!(store.custom_scope(), "customOperations");
        assert_eq!(store.scopes(), ["custom", "customOperation", "customOperations"]);
        assert_eq!(store.custom_query_ident(), "customOperationsQueryKeys");
        assert_eq!(store.custom_mutation_ident(), "customOperationsMutationKeys");
    }

    #[test]
    fn custom_scope_avoids_entity_factory_names() {
        // `CustomQuery` is emitted as `customQueryKeys`.
        let tables = [Table::new("CustomQuery")];
        let store = QueryKeyStore::new(&tables, ["search".to_owned()], [], &QueryKeysConfig::default());

        assert_eq!(store.custom_scope(), "customOperations");
        assert_eq!(store.custom_query_ident(), "customOperationsQueryKeys");
    }
}
