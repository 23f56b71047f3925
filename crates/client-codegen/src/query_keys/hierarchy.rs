use indexmap::{IndexMap, IndexSet};
use inflector::Inflector;
use serde_json::{json, Map, Value as Json};

use crate::config::EntityRelationship;

/// One step of an entity's ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    /// Entity key of the ancestor, e.g. `user`.
    pub entity: String,
    /// Scope field carrying the ancestor's id, e.g. `userId`.
    pub foreign_key: String,
}

impl Ancestor {
    /// Name of the key builder scoped to this ancestor, e.g. `byUser`.
    pub fn builder_name(&self) -> String {
        format!("by{}", self.entity.to_pascal_case())
    }
}

/// The ancestors of `entity`, nearest first.
///
/// An explicit `ancestors` list replaces the chain walked through `parent`
/// links. Walking stops at the first entity already visited.
pub fn ancestor_chain(entity: &str, relationships: &IndexMap<String, EntityRelationship>) -> Vec<Ancestor> {
    let Some(relationship) = relationships.get(entity) else {
        return Vec::new();
    };

    if let Some(ref explicit) = relationship.ancestors {
        let mut child = entity;

        return explicit
            .iter()
            .map(|ancestor| {
                let foreign_key = match relationships.get(child) {
                    Some(relationship) if relationship.parent == *ancestor => relationship.foreign_key.clone(),
                    _ => format!("{}Id", ancestor.to_camel_case()),
                };

                child = ancestor.as_str();

                Ancestor {
                    entity: ancestor.clone(),
                    foreign_key,
                }
            })
            .collect();
    }

    let mut chain = Vec::new();
    let mut visited = IndexSet::from([entity]);
    let mut current = relationship;

    loop {
        if !visited.insert(current.parent.as_str()) {
            break;
        }

        chain.push(Ancestor {
            entity: current.parent.clone(),
            foreign_key: current.foreign_key.clone(),
        });

        match relationships.get(&current.parent) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain
}

/// The cache keys of one entity.
///
/// Keys are JSON arrays, the same arrays the generated TypeScript factories
/// produce: `['post']`, `['post', { userId }]`, `['post', 'list', variables]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKeys {
    pub entity: String,
    pub ancestors: Vec<Ancestor>,
}

impl EntityKeys {
    pub fn new(entity: impl Into<String>, relationships: &IndexMap<String, EntityRelationship>) -> Self {
        let entity = entity.into();
        let ancestors = ancestor_chain(&entity, relationships);

        Self { entity, ancestors }
    }

    pub fn is_scoped(&self) -> bool {
        !self.ancestors.is_empty()
    }

    pub fn all(&self) -> Vec<Json> {
        vec![Json::String(self.entity.clone())]
    }

    /// The key scoped to one ancestor, `None` if it is not in the chain.
    pub fn by_ancestor(&self, ancestor: &str, id: Json) -> Option<Vec<Json>> {
        let ancestor = self.ancestors.iter().find(|candidate| candidate.entity == ancestor)?;
        Some(self.scoped_to(ancestor, id))
    }

    fn scoped_to(&self, ancestor: &Ancestor, id: Json) -> Vec<Json> {
        let mut scope = Map::new();
        scope.insert(ancestor.foreign_key.clone(), id);

        vec![Json::String(self.entity.clone()), Json::Object(scope)]
    }

    /// The most specific key for `scope`: the nearest ancestor with a value
    /// in the scope wins, without any the unscoped [`EntityKeys::all`] key.
    pub fn scoped(&self, scope: &Map<String, Json>) -> Vec<Json> {
        self.ancestors
            .iter()
            .find_map(|ancestor| match scope.get(&ancestor.foreign_key) {
                None | Some(Json::Null) => None,
                Some(id) => Some(self.scoped_to(ancestor, id.clone())),
            })
            .unwrap_or_else(|| self.all())
    }

    pub fn lists(&self, scope: &Map<String, Json>) -> Vec<Json> {
        let mut key = self.scoped(scope);
        key.push(json!("list"));
        key
    }

    pub fn list(&self, scope: &Map<String, Json>, variables: Json) -> Vec<Json> {
        let mut key = self.lists(scope);
        key.push(variables);
        key
    }

    pub fn details(&self, scope: &Map<String, Json>) -> Vec<Json> {
        let mut key = self.scoped(scope);
        key.push(json!("detail"));
        key
    }

    pub fn detail(&self, scope: &Map<String, Json>, id: Json) -> Vec<Json> {
        let mut key = self.details(scope);
        key.push(id);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relationships() -> IndexMap<String, EntityRelationship> {
        IndexMap::from([
            ("post".to_owned(), EntityRelationship::new("user", "userId")),
            ("comment".to_owned(), EntityRelationship::new("post", "postId")),
            ("user".to_owned(), EntityRelationship::new("organization", "organizationId")),
        ])
    }

    fn scope(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn walked_chain() {
        let chain = ancestor_chain("comment", &relationships());

        assert_eq!(
            chain.iter().map(|a| (a.entity.as_str(), a.foreign_key.as_str())).collect::<Vec<_>>(),
            [("post", "postId"), ("user", "userId"), ("organization", "organizationId")]
        );
        assert_eq!(chain[1].builder_name(), "byUser");
        assert!(ancestor_chain("organization", &relationships()).is_empty());
    }

    #[test]
    fn cycles_stop_the_walk() {
        let relationships = IndexMap::from([
            ("a".to_owned(), EntityRelationship::new("b", "bId")),
            ("b".to_owned(), EntityRelationship::new("a", "aId")),
        ]);

        let chain = ancestor_chain("a", &relationships);
        assert_eq!(chain.iter().map(|a| a.entity.as_str()).collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn explicit_ancestors_take_precedence() {
        let mut relationships = relationships();
        relationships["comment"].ancestors = Some(vec!["post".into(), "workspace".into()]);

        let chain = ancestor_chain("comment", &relationships);

        assert_eq!(
            chain.iter().map(|a| (a.entity.as_str(), a.foreign_key.as_str())).collect::<Vec<_>>(),
            [("post", "postId"), ("workspace", "workspaceId")]
        );
    }

    #[test]
    fn scoped_picks_the_nearest_ancestor() {
        let post = EntityKeys::new("post", &relationships());

        assert_eq!(
            post.scoped(&scope(json!({ "userId": "u1" }))),
            post.by_ancestor("user", json!("u1")).unwrap()
        );
        assert_eq!(post.scoped(&Map::new()), post.all());
        assert_eq!(post.scoped(&Map::new()), [json!("post")]);

        let comment = EntityKeys::new("comment", &relationships());
        let both = scope(json!({ "userId": "u1", "postId": "p1" }));

        assert_eq!(comment.scoped(&both), [json!("comment"), json!({ "postId": "p1" })]);
        assert_eq!(
            comment.scoped(&scope(json!({ "postId": null, "organizationId": "o1" }))),
            [json!("comment"), json!({ "organizationId": "o1" })]
        );
    }

    #[test]
    fn derived_keys_layer_on_scoped() {
        let post = EntityKeys::new("post", &relationships());
        let by_user = scope(json!({ "userId": "u1" }));

        assert_eq!(
            post.list(&by_user, json!({ "first": 10 })),
            [json!("post"), json!({ "userId": "u1" }), json!("list"), json!({ "first": 10 })]
        );
        assert_eq!(post.detail(&Map::new(), json!("p1")), [json!("post"), json!("detail"), json!("p1")]);

        let tag = EntityKeys::new("tag", &relationships());
        assert!(!tag.is_scoped());
        assert_eq!(tag.lists(&by_user), [json!("tag"), json!("list")]);
    }
}
