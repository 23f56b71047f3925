use std::collections::BTreeSet;

use crate::scalars::builtin_scalar_names;

/// Root operation types, the relay node interface and pagination envelopes
/// that never get a definition of their own.
static BUILTIN_TYPES: &[&str] = &["Query", "Mutation", "Subscription", "Node", "PageInfo"];

pub fn is_builtin_type(name: &str) -> bool {
    name.starts_with("__") || BUILTIN_TYPES.contains(&name) || builtin_scalar_names().any(|scalar| scalar == name)
}

/// Named types referenced while building one artifact.
///
/// Names that are defined in `types.ts` are recorded as table types, anything
/// else as a schema type. A tracker is created for a single artifact and
/// dropped when it is done.
#[derive(Debug)]
pub struct TypeTracker<'a> {
    table_namespace: &'a BTreeSet<String>,
    table_types: BTreeSet<String>,
    schema_types: BTreeSet<String>,
}

impl<'a> TypeTracker<'a> {
    pub fn new(table_namespace: &'a BTreeSet<String>) -> Self {
        Self {
            table_namespace,
            table_types: BTreeSet::new(),
            schema_types: BTreeSet::new(),
        }
    }

    pub fn record(&mut self, name: &str) {
        if is_builtin_type(name) {
            return;
        }

        if self.table_namespace.contains(name) {
            self.table_types.insert(name.to_owned());
        } else {
            self.schema_types.insert(name.to_owned());
        }
    }

    pub fn table_types(&self) -> &BTreeSet<String> {
        &self.table_types
    }

    pub fn schema_types(&self) -> &BTreeSet<String> {
        &self.schema_types
    }

    pub fn is_empty(&self) -> bool {
        self.table_types.is_empty() && self.schema_types.is_empty()
    }

    pub fn into_parts(self) -> (BTreeSet<String>, BTreeSet<String>) {
        (self.table_types, self.schema_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_and_skips_builtins() {
        let namespace = BTreeSet::from(["User".to_owned(), "UserFilter".to_owned()]);
        let mut tracker = TypeTracker::new(&namespace);

        for name in ["User", "UserFilter", "SignInPayload", "Query", "__Type", "PageInfo", "String", "User"] {
            tracker.record(name);
        }

        let (table, schema) = tracker.into_parts();

        assert_eq!(table.into_iter().collect::<Vec<_>>(), ["User", "UserFilter"]);
        assert_eq!(schema.into_iter().collect::<Vec<_>>(), ["SignInPayload"]);
    }
}
