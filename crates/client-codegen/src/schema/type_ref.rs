use std::fmt;

/// A reference to a GraphQL type, as found on fields, arguments and return types.
///
/// Wrappers always wrap exactly one inner reference and leaves always carry a
/// name. Malformed wire input becomes [`TypeRef::Unresolved`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(from = "WireTypeRef")]
pub enum TypeRef {
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
    Scalar(String),
    Object(String),
    InputObject(String),
    Enum(String),
    /// Placeholder for a wire reference that was missing its `name` or `ofType`.
    Unresolved,
}

/// The outermost kind of a [`TypeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    NonNull,
    List,
    Scalar,
    Object,
    InputObject,
    Enum,
    Unknown,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::NonNull => "NON_NULL",
            TypeKind::List => "LIST",
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::Enum => "ENUM",
            TypeKind::Unknown => "UNKNOWN",
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const UNKNOWN_TYPE_NAME: &str = "unknown";

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    pub fn input_object(name: impl Into<String>) -> Self {
        Self::InputObject(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Strips a single outer non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeRef::NonNull(_) => TypeKind::NonNull,
            TypeRef::List(_) => TypeKind::List,
            TypeRef::Scalar(_) => TypeKind::Scalar,
            TypeRef::Object(_) => TypeKind::Object,
            TypeRef::InputObject(_) => TypeKind::InputObject,
            TypeRef::Enum(_) => TypeKind::Enum,
            TypeRef::Unresolved => TypeKind::Unknown,
        }
    }

    /// True iff the outermost wrapper is non-null.
    pub fn is_required(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// True iff the outer kind, or the kind under a non-null wrapper, is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), TypeRef::List(_))
    }

    /// The innermost named type.
    pub fn base(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.base(),
            leaf => leaf,
        }
    }

    /// Name of the innermost type, or the unknown sentinel.
    pub fn base_name(&self) -> &str {
        match self.base() {
            TypeRef::Scalar(name) | TypeRef::Object(name) | TypeRef::InputObject(name) | TypeRef::Enum(name) => name,
            _ => UNKNOWN_TYPE_NAME,
        }
    }

    pub fn base_kind(&self) -> TypeKind {
        self.base().kind()
    }
}

/// Renders the reference in GraphQL notation, e.g. `[String!]!`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::Scalar(name) | TypeRef::Object(name) | TypeRef::InputObject(name) | TypeRef::Enum(name) => {
                f.write_str(name)
            }
            TypeRef::Unresolved => f.write_str("Unknown"),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTypeRef {
    kind: Option<String>,
    name: Option<String>,
    of_type: Option<Box<WireTypeRef>>,
}

impl From<WireTypeRef> for TypeRef {
    fn from(wire: WireTypeRef) -> Self {
        let WireTypeRef { kind, name, of_type } = wire;
        let wrapped = |of_type: Option<Box<WireTypeRef>>| of_type.map(|inner| Box::new(TypeRef::from(*inner)));

        match (kind.as_deref(), name) {
            (Some("NON_NULL"), _) => wrapped(of_type).map_or(TypeRef::Unresolved, TypeRef::NonNull),
            (Some("LIST"), _) => wrapped(of_type).map_or(TypeRef::Unresolved, TypeRef::List),
            (Some("SCALAR"), Some(name)) => TypeRef::Scalar(name),
            (Some("OBJECT" | "INTERFACE" | "UNION"), Some(name)) => TypeRef::Object(name),
            (Some("INPUT_OBJECT"), Some(name)) => TypeRef::InputObject(name),
            (Some("ENUM"), Some(name)) => TypeRef::Enum(name),
            _ => TypeRef::Unresolved,
        }
    }
}
