use std::fmt::{self, Write};

use itertools::Itertools;

use crate::schema::{OperationKind, TypeRef};

const INDENT: &str = "  ";

/// A single-operation GraphQL request document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub kind: OperationKind,
    pub name: String,
    pub variables: Vec<VariableDefinition>,
    pub selection: Vec<FieldNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub type_ref: TypeRef,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    pub selection: Vec<FieldNode>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            selection: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Vec<FieldNode>) -> Self {
        self.selection = selection;
        self
    }

    pub fn child(&self, name: &str) -> Option<&FieldNode> {
        self.selection.iter().find(|field| field.name == name)
    }

    fn write(&self, out: &mut String, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            out.push_str(INDENT);
        }

        out.push_str(&self.name);

        if !self.arguments.is_empty() {
            let arguments = self
                .arguments
                .iter()
                .format_with(", ", |(name, value), f| f(&format_args!("{name}: {value}")));

            write!(out, "({arguments})")?;
        }

        write_selection(out, &self.selection, depth)
    }
}

fn write_selection(out: &mut String, selection: &[FieldNode], depth: usize) -> fmt::Result {
    if selection.is_empty() {
        out.push('\n');
        return Ok(());
    }

    out.push_str(" {\n");

    for field in selection {
        field.write(out, depth + 1)?;
    }

    for _ in 0..depth {
        out.push_str(INDENT);
    }

    out.push_str("}\n");
    Ok(())
}

/// A GraphQL input value literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Enum(String),
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Null,
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Boolean(*value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Value::Int(int),
                None => Value::Float(number.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(value) => Value::String(value.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${name}"),
            Value::Enum(value) => f.write_str(value),
            // JSON string escapes are valid GraphQL string escapes
            Value::String(value) => write!(f, "{}", serde_json::Value::String(value.clone())),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Null => f.write_str("null"),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Object(fields) if fields.is_empty() => f.write_str("{}"),
            Value::Object(fields) => {
                let fields = fields
                    .iter()
                    .format_with(", ", |(name, value), f| f(&format_args!("{name}: {value}")));

                write!(f, "{{ {fields} }}")
            }
        }
    }
}

impl Document {
    /// The top-level field of the operation.
    pub fn root_field(&self) -> Option<&FieldNode> {
        self.selection.first()
    }

    /// The field at `path`, starting at the operation's root field.
    pub fn field_mut(&mut self, path: &[String]) -> Option<&mut FieldNode> {
        let (root, rest) = path.split_first()?;
        let root = self.selection.iter_mut().find(|field| field.name == *root)?;

        rest.iter()
            .try_fold(root, |field, name| field.selection.iter_mut().find(|child| child.name == *name))
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    /// Renders the document, two spaces per nesting level.
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        write!(out, "{} {}", self.kind, self.name)?;

        if !self.variables.is_empty() {
            let variables = self
                .variables
                .iter()
                .format_with(", ", |variable, f| f(&format_args!("${}: {}", variable.name, variable.type_ref)));

            write!(out, "({variables})")?;
        }

        write_selection(&mut out, &self.selection, 0)?;

        Ok(out)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render()?.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use serde_json::json;

    use super::*;

    #[test]
    fn print_document() {
        let document = Document {
            kind: OperationKind::Query,
            name: "UsersQuery".into(),
            variables: vec![
                VariableDefinition::new("first", TypeRef::scalar("Int")),
                VariableDefinition::new("orderBy", TypeRef::enumeration("UsersOrderBy").non_null().list()),
            ],
            selection: vec![FieldNode::new("users")
                .with_argument("first", Value::variable("first"))
                .with_argument("orderBy", Value::variable("orderBy"))
                .with_selection(vec![
                    FieldNode::new("totalCount"),
                    FieldNode::new("nodes").with_selection(vec![FieldNode::new("id"), FieldNode::new("name")]),
                ])],
        };

        expect![[r#"
            query UsersQuery($first: Int, $orderBy: [UsersOrderBy!]) {
              users(first: $first, orderBy: $orderBy) {
                totalCount
                nodes {
                  id
                  name
                }
              }
            }"#]]
        .assert_eq(&document.to_string());
    }

    #[test]
    fn nested_field_lookup() {
        let mut document = Document {
            kind: OperationKind::Mutation,
            name: "CreateUserMutation".into(),
            variables: Vec::new(),
            selection: vec![FieldNode::new("createUser").with_selection(vec![FieldNode::new("user")])],
        };

        let path = ["createUser".to_owned(), "user".to_owned()];
        let Some(user) = document.field_mut(&path) else {
            unreachable!();
        };
        user.selection = vec![FieldNode::new("id")];

        assert_eq!(
            document.render().unwrap(),
            "mutation CreateUserMutation {\n  createUser {\n    user {\n      id\n    }\n  }\n}\n"
        );
        assert!(document.field_mut(&["createUser".to_owned(), "post".to_owned()]).is_none());
        assert!(document.field_mut(&[]).is_none());
    }

    #[test]
    fn values_from_json() {
        let value = Value::from(&json!({
            "name": { "startsWith": "A\"" },
            "age": { "in": [1, 2.5] },
            "active": true,
            "deletedAt": null
        }));

        assert_eq!(
            value.to_string(),
            r#"{ name: { startsWith: "A\"" }, age: { in: [1, 2.5] }, active: true, deletedAt: null }"#
        );
        assert_eq!(Value::List(vec![Value::Enum("NAME_ASC".into())]).to_string(), "[NAME_ASC]");
    }
}
