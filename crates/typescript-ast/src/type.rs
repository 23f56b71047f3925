use std::{borrow::Cow, fmt};

use itertools::Itertools;

use crate::{declaration::write_docs, indent_continuation};

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Ident(Cow<'static, str>),
    StringLiteral(Cow<'static, str>),
    Generic(Cow<'static, str>, Vec<TypeExpr>),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Object(ObjectType),
    KeyOf(Box<TypeExpr>),
    Index(Box<TypeExpr>, Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Conditional(Box<Conditional>),
    Mapped(Box<MappedType>),
}

impl TypeExpr {
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Ident(name.into())
    }

    pub fn string(value: impl Into<Cow<'static, str>>) -> Self {
        Self::StringLiteral(value.into())
    }

    pub fn generic(name: impl Into<Cow<'static, str>>, params: impl IntoIterator<Item = TypeExpr>) -> Self {
        Self::Generic(name.into(), params.into_iter().collect())
    }

    pub fn null() -> Self {
        Self::ident("null")
    }

    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        members
            .into_iter()
            .reduce(TypeExpr::or)
            .unwrap_or_else(|| TypeExpr::ident("never"))
    }

    #[must_use]
    pub fn array(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Joins two types into a union, flattening nested unions.
    #[must_use]
    pub fn or(self, other: TypeExpr) -> Self {
        let mut members = match self {
            TypeExpr::Union(members) => members,
            other => vec![other],
        };

        match other {
            TypeExpr::Union(others) => members.extend(others),
            other => members.push(other),
        }

        Self::Union(members)
    }

    #[must_use]
    pub fn and(self, other: TypeExpr) -> Self {
        let mut members = match self {
            TypeExpr::Intersection(members) => members,
            other => vec![other],
        };

        match other {
            TypeExpr::Intersection(others) => members.extend(others),
            other => members.push(other),
        }

        Self::Intersection(members)
    }

    /// Adds `| null`, unless the type already admits null.
    #[must_use]
    pub fn nullable(self) -> Self {
        if self.admits_null() {
            self
        } else {
            self.or(TypeExpr::null())
        }
    }

    #[must_use]
    pub fn keyof(self) -> Self {
        Self::KeyOf(Box::new(self))
    }

    #[must_use]
    pub fn index(self, key: TypeExpr) -> Self {
        Self::Index(Box::new(self), Box::new(key))
    }

    pub fn admits_null(&self) -> bool {
        match self {
            TypeExpr::Ident(name) => name == "null",
            TypeExpr::Union(members) => members.iter().any(TypeExpr::admits_null),
            _ => false,
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(
            self,
            TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Conditional(_) | TypeExpr::KeyOf(_)
        )
    }
}

impl From<ObjectType> for TypeExpr {
    fn from(value: ObjectType) -> Self {
        Self::Object(value)
    }
}

impl From<Conditional> for TypeExpr {
    fn from(value: Conditional) -> Self {
        Self::Conditional(Box::new(value))
    }
}

impl From<MappedType> for TypeExpr {
    fn from(value: MappedType) -> Self {
        Self::Mapped(Box::new(value))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Ident(name) => f.write_str(name),
            TypeExpr::StringLiteral(value) => write!(f, "'{}'", value.replace('\'', "\\'")),
            TypeExpr::Generic(name, params) => write!(f, "{name}<{}>", params.iter().join(", ")),
            TypeExpr::Array(inner) if inner.needs_parens_in_array() => write!(f, "({inner})[]"),
            TypeExpr::Array(inner) => write!(f, "{inner}[]"),
            TypeExpr::Union(members) => {
                let mut rendered = members.iter().map(|member| match member {
                    TypeExpr::Conditional(_) => format!("({member})"),
                    member => member.to_string(),
                });

                f.write_str(&rendered.join(" | "))
            }
            TypeExpr::Intersection(members) => {
                let mut rendered = members.iter().map(|member| match member {
                    TypeExpr::Union(_) | TypeExpr::Conditional(_) => format!("({member})"),
                    member => member.to_string(),
                });

                f.write_str(&rendered.join(" & "))
            }
            TypeExpr::Object(object) => object.fmt(f),
            TypeExpr::KeyOf(inner) => write!(f, "keyof {inner}"),
            TypeExpr::Index(object, key) => match **object {
                TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::KeyOf(_) => write!(f, "({object})[{key}]"),
                _ => write!(f, "{object}[{key}]"),
            },
            TypeExpr::Tuple(members) => write!(f, "[{}]", members.iter().join(", ")),
            TypeExpr::Conditional(conditional) => conditional.fmt(f),
            TypeExpr::Mapped(mapped) => mapped.fmt(f),
        }
    }
}

/// `Check extends Extends ? Then : Otherwise`
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    check: TypeExpr,
    extends: TypeExpr,
    then: TypeExpr,
    otherwise: TypeExpr,
}

impl Conditional {
    pub fn new(check: TypeExpr, extends: TypeExpr, then: TypeExpr, otherwise: TypeExpr) -> Self {
        Self {
            check,
            extends,
            then,
            otherwise,
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extends = match self.extends {
            TypeExpr::Conditional(_) => format!("({})", self.extends),
            ref extends => extends.to_string(),
        };

        write!(f, "{} extends {extends} ? {} : {}", self.check, self.then, self.otherwise)
    }
}

/// `{ [Param in Source as Remap]?: Value }`
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    param: Cow<'static, str>,
    source: TypeExpr,
    remap: Option<TypeExpr>,
    value: TypeExpr,
    optional: bool,
}

impl MappedType {
    pub fn new(param: impl Into<Cow<'static, str>>, source: TypeExpr, value: TypeExpr) -> Self {
        Self {
            param: param.into(),
            source,
            remap: None,
            value,
            optional: false,
        }
    }

    #[must_use]
    pub fn remap(mut self, remap: TypeExpr) -> Self {
        self.remap = Some(remap);
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl fmt::Display for MappedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ [{} in {}", self.param, self.source)?;

        if let Some(ref remap) = self.remap {
            write!(f, " as {remap}")?;
        }

        let optional = if self.optional { "?" } else { "" };
        write!(f, "]{optional}: {} }}", self.value)
    }
}

/// An object type literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    properties: Vec<Property>,
    multiline: bool,
}

impl ObjectType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.properties.push(prop);
        self
    }

    pub fn push_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return f.write_str("{}");
        }

        if !self.multiline {
            return write!(f, "{{ {} }}", self.properties.iter().join("; "));
        }

        f.write_str("{\n")?;

        for prop in &self.properties {
            writeln!(f, "  {};", indent_continuation(&prop.to_string(), "  "))?;
        }

        f.write_str("}")
    }
}

/// A property of an object type or an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    key: Cow<'static, str>,
    value: TypeExpr,
    optional: bool,
    readonly: bool,
    docs: Option<String>,
}

impl Property {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<TypeExpr>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            optional: false,
            readonly: false,
            docs: None,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn optional_if(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    #[must_use]
    pub fn docs(mut self, docs: Option<impl Into<String>>) -> Self {
        self.docs = docs.map(Into::into);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &TypeExpr {
        &self.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref docs) = self.docs {
            write_docs(f, docs)?;
        }

        if self.readonly {
            f.write_str("readonly ")?;
        }

        if is_identifier(&self.key) {
            f.write_str(&self.key)?;
        } else {
            write!(f, "'{}'", self.key.replace('\'', "\\'"))?;
        }

        let optional = if self.optional { "?" } else { "" };
        write!(f, "{optional}: {}", self.value)
    }
}

/// True if `name` can be used as a bare property key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
