use typescript_ast::TypeExpr;

use crate::{
    config::UnknownScalars,
    scalars::ScalarMap,
    schema::{TypeRef, UNKNOWN_TYPE_NAME},
    tracker::TypeTracker,
};

/// Turns [`TypeRef`]s into TypeScript types.
///
/// Resolution never fails: malformed references come out as `unknown`.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    scalars: &'a ScalarMap,
    unknown_scalars: UnknownScalars,
}

impl<'a> TypeResolver<'a> {
    pub fn new(scalars: &'a ScalarMap, unknown_scalars: UnknownScalars) -> Self {
        Self {
            scalars,
            unknown_scalars,
        }
    }

    pub fn scalars(&self) -> &'a ScalarMap {
        self.scalars
    }

    /// The TypeScript type of `ty`, with non-null wrappers stripped.
    pub fn resolve(&self, ty: &TypeRef, tracker: Option<&mut TypeTracker<'_>>) -> String {
        self.resolve_expr(ty, tracker).to_string()
    }

    /// Like [`TypeResolver::resolve`], adding `| null` when the outer type is nullable.
    pub fn resolve_nullable(&self, ty: &TypeRef, tracker: Option<&mut TypeTracker<'_>>) -> String {
        self.resolve_nullable_expr(ty, tracker).to_string()
    }

    pub fn resolve_nullable_expr(&self, ty: &TypeRef, tracker: Option<&mut TypeTracker<'_>>) -> TypeExpr {
        let resolved = self.resolve_expr(ty, tracker);

        if ty.is_required() {
            resolved
        } else {
            resolved.nullable()
        }
    }

    pub fn resolve_expr(&self, ty: &TypeRef, mut tracker: Option<&mut TypeTracker<'_>>) -> TypeExpr {
        match ty {
            TypeRef::NonNull(inner) => self.resolve_expr(inner, tracker),
            TypeRef::List(inner) => self.resolve_expr(inner, tracker.as_deref_mut()).array(),
            TypeRef::Scalar(name) => match self.scalars.ts_type(name) {
                Some(ts_type) => TypeExpr::ident(ts_type.to_owned()),
                None => match self.unknown_scalars {
                    UnknownScalars::PassThrough => TypeExpr::ident(name.clone()),
                    UnknownScalars::Unknown => TypeExpr::ident(UNKNOWN_TYPE_NAME),
                },
            },
            TypeRef::Object(name) | TypeRef::InputObject(name) | TypeRef::Enum(name) => {
                if let Some(tracker) = tracker {
                    tracker.record(name);
                }

                TypeExpr::ident(name.clone())
            }
            TypeRef::Unresolved => TypeExpr::ident(UNKNOWN_TYPE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;

    fn string() -> TypeRef {
        TypeRef::scalar("String")
    }

    #[rstest]
    #[case(string(), "string", "string | null")]
    #[case(string().non_null(), "string", "string")]
    #[case(string().non_null().list().non_null(), "string[]", "string[]")]
    #[case(string().list(), "string[]", "string[] | null")]
    #[case(TypeRef::scalar("Int").non_null().list().list(), "number[][]", "number[][] | null")]
    #[case(TypeRef::scalar("GeoPoint"), "GeoPoint", "GeoPoint | null")]
    #[case(TypeRef::Unresolved, "unknown", "unknown | null")]
    #[case(TypeRef::Unresolved.list().non_null(), "unknown[]", "unknown[]")]
    fn resolution(#[case] ty: TypeRef, #[case] resolved: &str, #[case] nullable: &str) {
        let scalars = ScalarMap::new();
        let resolver = TypeResolver::new(&scalars, UnknownScalars::PassThrough);

        assert_eq!(resolver.resolve(&ty, None), resolved);
        assert_eq!(resolver.resolve_nullable(&ty, None), nullable);
    }

    #[test]
    fn list_of_non_null_strings_agrees_with_predicates() {
        let scalars = ScalarMap::new();
        let resolver = TypeResolver::new(&scalars, UnknownScalars::PassThrough);
        let ty = string().non_null().list().non_null();

        assert_eq!(resolver.resolve_nullable(&ty, None), "string[]");
        assert!(ty.is_list());
        assert!(ty.is_required());
        assert_eq!(ty.base_name(), "String");
    }

    #[test]
    fn unknown_scalars_can_collapse() {
        let scalars = ScalarMap::new();
        let resolver = TypeResolver::new(&scalars, UnknownScalars::Unknown);

        assert_eq!(resolver.resolve(&TypeRef::scalar("GeoPoint").list(), None), "unknown[]");
    }

    #[test]
    fn named_types_are_tracked() {
        let scalars = ScalarMap::new();
        let resolver = TypeResolver::new(&scalars, UnknownScalars::PassThrough);
        let namespace = BTreeSet::from(["User".to_owned()]);
        let mut tracker = TypeTracker::new(&namespace);

        let ty = TypeRef::object("User").non_null().list();
        assert_eq!(resolver.resolve(&ty, Some(&mut tracker)), "User[]");

        resolver.resolve(&TypeRef::enumeration("UserRole").non_null(), Some(&mut tracker));
        resolver.resolve(&TypeRef::object("PageInfo"), Some(&mut tracker));
        resolver.resolve(&string(), Some(&mut tracker));

        assert!(tracker.table_types().contains("User"));
        assert_eq!(tracker.schema_types().iter().collect::<Vec<_>>(), ["UserRole"]);
    }
}
