use std::fmt;

use super::{InputValue, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }

    /// Suffix of generated operation names, e.g. `CurrentUserQuery`.
    pub fn suffix(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A root field that is not one of the generated table operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub kind: OperationKind,
    pub args: Vec<InputValue>,
    pub return_type: TypeRef,
    pub description: Option<String>,
}

impl Operation {
    pub fn query(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self::new(name, OperationKind::Query, return_type)
    }

    pub fn mutation(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self::new(name, OperationKind::Mutation, return_type)
    }

    fn new(name: impl Into<String>, kind: OperationKind, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            args: Vec::new(),
            return_type,
            description: None,
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.args.push(InputValue::new(name, type_ref));
        self
    }
}

/// Custom queries and mutations, each list in schema order.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(from = "WireOperationBundle")]
pub struct OperationBundle {
    pub queries: Vec<Operation>,
    pub mutations: Vec<Operation>,
}

impl OperationBundle {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.mutations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.queries.iter().chain(&self.mutations)
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOperation {
    name: String,
    #[serde(default)]
    args: Vec<InputValue>,
    return_type: TypeRef,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Default, serde::Deserialize)]
#[serde(default)]
struct WireOperationBundle {
    queries: Vec<WireOperation>,
    mutations: Vec<WireOperation>,
}

impl From<WireOperationBundle> for OperationBundle {
    fn from(wire: WireOperationBundle) -> Self {
        let convert = |kind: OperationKind| {
            move |operation: WireOperation| Operation {
                name: operation.name,
                kind,
                args: operation.args,
                return_type: operation.return_type,
                description: operation.description,
            }
        };

        OperationBundle {
            queries: wire.queries.into_iter().map(convert(OperationKind::Query)).collect(),
            mutations: wire.mutations.into_iter().map(convert(OperationKind::Mutation)).collect(),
        }
    }
}
