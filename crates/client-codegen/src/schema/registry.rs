use indexmap::IndexMap;

use super::TypeRef;

/// Every named type of the introspected schema, keyed by name.
///
/// Built once per generation run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(from = "Vec<ResolvedType>")]
pub struct TypeRegistry {
    types: IndexMap<String, ResolvedType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resolved: ResolvedType) {
        self.types.insert(resolved.name.clone(), resolved);
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Values of an enum type, if `name` is one.
    pub fn enum_values(&self, name: &str) -> Option<&[String]> {
        match self.get(name)?.kind {
            ResolvedTypeKind::Enum { ref values } => Some(values),
            _ => None,
        }
    }

    pub fn object_fields(&self, name: &str) -> Option<&[FieldDefinition]> {
        match self.get(name)?.kind {
            ResolvedTypeKind::Object { ref fields } => Some(fields),
            _ => None,
        }
    }
}

impl From<Vec<ResolvedType>> for TypeRegistry {
    fn from(types: Vec<ResolvedType>) -> Self {
        types.into_iter().collect()
    }
}

impl FromIterator<ResolvedType> for TypeRegistry {
    fn from_iter<T: IntoIterator<Item = ResolvedType>>(iter: T) -> Self {
        let mut registry = TypeRegistry::new();

        for resolved in iter {
            registry.insert(resolved);
        }

        registry
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(from = "WireResolvedType")]
pub struct ResolvedType {
    pub name: String,
    pub kind: ResolvedTypeKind,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTypeKind {
    Object { fields: Vec<FieldDefinition> },
    InputObject { input_fields: Vec<InputValue> },
    Enum { values: Vec<String> },
    Union { possible_types: Vec<String> },
    Scalar,
}

impl ResolvedType {
    pub fn object(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            kind: ResolvedTypeKind::Object { fields },
            description: None,
        }
    }

    pub fn input_object(name: impl Into<String>, input_fields: Vec<InputValue>) -> Self {
        Self {
            name: name.into(),
            kind: ResolvedTypeKind::InputObject { input_fields },
            description: None,
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ResolvedTypeKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
            description: None,
        }
    }

    pub fn union<I, S>(name: impl Into<String>, possible_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ResolvedTypeKind::Union {
                possible_types: possible_types.into_iter().map(Into::into).collect(),
            },
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            args: Vec::new(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResolvedType {
    name: String,
    kind: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Option<Vec<FieldDefinition>>,
    #[serde(default)]
    input_fields: Option<Vec<InputValue>>,
    #[serde(default)]
    enum_values: Option<Vec<WireNamed>>,
    #[serde(default)]
    possible_types: Option<Vec<WireNamed>>,
}

/// Introspection lists enum values and possible types either as bare strings
/// or as `{ name }` objects.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum WireNamed {
    Bare(String),
    Named { name: String },
}

impl WireNamed {
    fn into_name(self) -> String {
        match self {
            WireNamed::Bare(name) | WireNamed::Named { name } => name,
        }
    }
}

impl From<WireResolvedType> for ResolvedType {
    fn from(wire: WireResolvedType) -> Self {
        let names = |list: Option<Vec<WireNamed>>| {
            list.unwrap_or_default()
                .into_iter()
                .map(WireNamed::into_name)
                .collect::<Vec<_>>()
        };

        let kind = match wire.kind.as_str() {
            "OBJECT" | "INTERFACE" => ResolvedTypeKind::Object {
                fields: wire.fields.unwrap_or_default(),
            },
            "INPUT_OBJECT" => ResolvedTypeKind::InputObject {
                input_fields: wire.input_fields.unwrap_or_default(),
            },
            "ENUM" => ResolvedTypeKind::Enum {
                values: names(wire.enum_values),
            },
            "UNION" => ResolvedTypeKind::Union {
                possible_types: names(wire.possible_types),
            },
            _ => ResolvedTypeKind::Scalar,
        };

        ResolvedType {
            name: wire.name,
            kind,
            description: wire.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn deserialize_introspection_types() {
        let json = indoc! {r#"
            [
              {
                "name": "UserRole",
                "kind": "ENUM",
                "enumValues": [{ "name": "ADMIN" }, "MEMBER"]
              },
              {
                "name": "SignInPayload",
                "kind": "OBJECT",
                "description": "Result of signing in",
                "fields": [
                  { "name": "token", "type": { "kind": "SCALAR", "name": "String" } }
                ]
              },
              {
                "name": "SignInInput",
                "kind": "INPUT_OBJECT",
                "inputFields": [
                  { "name": "email", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "String" } } }
                ]
              },
              { "name": "SearchResult", "kind": "UNION", "possibleTypes": [{ "name": "User" }] },
              { "name": "Datetime", "kind": "SCALAR" }
            ]
        "#};

        let registry: TypeRegistry = serde_json::from_str(json).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.enum_values("UserRole"), Some(&["ADMIN".to_owned(), "MEMBER".to_owned()][..]));
        assert_eq!(registry.object_fields("SignInPayload").map(<[_]>::len), Some(1));
        assert_eq!(
            registry.get("SignInPayload").and_then(|ty| ty.description.as_deref()),
            Some("Result of signing in")
        );

        let email_required = match registry.get("SignInInput").map(|ty| &ty.kind) {
            Some(ResolvedTypeKind::InputObject { input_fields }) => input_fields[0].type_ref.is_required(),
            _ => false,
        };
        assert!(email_required);

        assert_eq!(
            registry.get("SearchResult").map(|ty| &ty.kind),
            Some(&ResolvedTypeKind::Union {
                possible_types: vec!["User".into()]
            })
        );
        assert_eq!(registry.get("Datetime").map(|ty| &ty.kind), Some(&ResolvedTypeKind::Scalar));
    }
}
