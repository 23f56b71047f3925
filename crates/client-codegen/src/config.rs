use std::path::Path;

use indexmap::IndexMap;

use crate::{select::Selection, CodegenError};

/// Generation settings, usually read from a `codegen.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    pub pagination: PaginationConfig,
    pub react_query: ReactQueryConfig,
    pub query_keys: QueryKeysConfig,
    pub selection: SelectionConfig,
    pub scalars: ScalarsConfig,
    /// What delete mutations ask the server to echo back.
    pub delete_returns: DeleteReturns,
}

impl CodegenConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, CodegenError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    /// Whether the interactive (hook) half of every artifact is generated.
    pub fn hooks_enabled(&self) -> bool {
        self.react_query.enabled
    }
}

/// Field and argument names of paginated collection wrappers.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    pub nodes_field: String,
    pub total_count_field: String,
    pub page_info_field: String,
    /// Some backends call this `where`.
    pub filter_argument: String,
    pub order_by_argument: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            nodes_field: String::from("nodes"),
            total_count_field: String::from("totalCount"),
            page_info_field: String::from("pageInfo"),
            filter_argument: String::from("filter"),
            order_by_argument: String::from("orderBy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactQueryConfig {
    pub enabled: bool,
}

impl Default for ReactQueryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryKeysConfig {
    pub style: QueryKeyStyle,
    /// Entity key (lower-cased type name) to its parent relationship.
    pub relationships: IndexMap<String, EntityRelationship>,
    pub mutation_keys: bool,
}

impl Default for QueryKeysConfig {
    fn default() -> Self {
        Self {
            style: QueryKeyStyle::default(),
            relationships: IndexMap::new(),
            mutation_keys: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKeyStyle {
    /// One shared `query-keys.ts` imported by every artifact.
    #[default]
    Centralized,
    /// Every artifact spells out its own key arrays.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRelationship {
    pub parent: String,
    #[serde(alias = "foreignKey")]
    pub foreign_key: String,
    /// Explicit ancestor chain, nearest first. Replaces the walked parent chain.
    #[serde(default)]
    pub ancestors: Option<Vec<String>>,
}

impl EntityRelationship {
    pub fn new(parent: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            foreign_key: foreign_key.into(),
            ancestors: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// How deep `StrictSelect` checks nested selections.
    pub strict_depth: usize,
    pub default: DefaultSelection,
    /// Selections used by the generated accessors, keyed by entity type name.
    pub entities: IndexMap<String, Selection>,
    /// Selections for custom operation payloads, keyed by operation name.
    pub operations: IndexMap<String, Selection>,
    /// Nesting limit for the default selection of custom operation payloads.
    pub custom_depth: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strict_depth: 10,
            default: DefaultSelection::default(),
            entities: IndexMap::new(),
            operations: IndexMap::new(),
            custom_depth: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultSelection {
    /// The primary key, or the first scalar field.
    #[default]
    PrimaryKey,
    AllScalars,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalarsConfig {
    pub unknown: UnknownScalars,
    /// Extra wire scalar to TypeScript type mappings.
    pub overrides: IndexMap<String, String>,
}

/// What an unmapped scalar resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownScalars {
    #[default]
    PassThrough,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteReturns {
    #[default]
    Entity,
    Key,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::FieldSelection;
    use indoc::indoc;

    #[test]
    fn defaults() {
        let config = CodegenConfig::from_toml_str("").unwrap();

        assert_eq!(config, CodegenConfig::default());
        assert!(config.hooks_enabled());
        assert_eq!(config.selection.strict_depth, 10);
        assert_eq!(config.pagination.nodes_field, "nodes");
        assert_eq!(config.query_keys.style, QueryKeyStyle::Centralized);
    }

    #[test]
    fn full_config() {
        let config = CodegenConfig::from_toml_str(indoc! {r#"
            delete_returns = "key"

            [pagination]
            filter_argument = "where"

            [react_query]
            enabled = false

            [query_keys]
            style = "inline"
            mutation_keys = false

            [query_keys.relationships.post]
            parent = "user"
            foreignKey = "userId"

            [query_keys.relationships.comment]
            parent = "post"
            foreign_key = "postId"
            ancestors = ["post", "user"]

            [selection]
            strict_depth = 5
            default = "all-scalars"

            [selection.entities.User]
            id = true
            email = true
            posts = { select = { id = true, title = true }, first = 10 }

            [scalars]
            unknown = "unknown"
            overrides = { BigInt = "bigint" }
        "#})
        .unwrap();

        assert_eq!(config.delete_returns, DeleteReturns::Key);
        assert_eq!(config.pagination.filter_argument, "where");
        assert_eq!(config.pagination.order_by_argument, "orderBy");
        assert!(!config.hooks_enabled());
        assert_eq!(config.query_keys.style, QueryKeyStyle::Inline);
        assert!(!config.query_keys.mutation_keys);
        assert_eq!(config.query_keys.relationships["post"], EntityRelationship::new("user", "userId"));
        assert_eq!(
            config.query_keys.relationships["comment"].ancestors.as_deref(),
            Some(&["post".to_owned(), "user".to_owned()][..])
        );
        assert_eq!(config.selection.strict_depth, 5);
        assert_eq!(config.selection.default, DefaultSelection::AllScalars);
        assert_eq!(config.scalars.unknown, UnknownScalars::Unknown);
        assert_eq!(config.scalars.overrides["BigInt"], "bigint");

        let user = &config.selection.entities["User"];
        assert_eq!(user.get("email"), Some(&FieldSelection::Flag(true)));

        let Some(FieldSelection::Nested(posts)) = user.get("posts") else {
            unreachable!("posts is a nested selection");
        };
        assert_eq!(posts.first, Some(10));
        assert_eq!(posts.select.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = CodegenConfig::from_toml_str("[react_query]\nenable = true\n").unwrap_err();
        assert!(error.to_string().contains("unknown field `enable`"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codegen.toml");
        std::fs::write(&path, "[selection]\ncustom_depth = 3\n").unwrap();

        assert_eq!(CodegenConfig::load(&path).unwrap().selection.custom_depth, 3);

        let missing = CodegenConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, CodegenError::Io { .. }));
    }
}
