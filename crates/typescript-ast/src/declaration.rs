use std::{borrow::Cow, fmt};

use itertools::Itertools;

use crate::{indent_continuation, Property, TypeExpr};

/// A generic parameter: `Name extends Constraint = Default`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    name: Cow<'static, str>,
    constraint: Option<TypeExpr>,
    default: Option<TypeExpr>,
}

impl TypeParam {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    #[must_use]
    pub fn extends(mut self, constraint: TypeExpr) -> Self {
        self.constraint = Some(constraint);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: TypeExpr) -> Self {
        self.default = Some(default);
        self
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;

        if let Some(ref constraint) = self.constraint {
            write!(f, " extends {constraint}")?;
        }

        if let Some(ref default) = self.default {
            write!(f, " = {default}")?;
        }

        Ok(())
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[TypeParam]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }

    write!(f, "<{}>", params.iter().join(", "))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    name: Cow<'static, str>,
    params: Vec<TypeParam>,
    extends: Vec<TypeExpr>,
    properties: Vec<Property>,
    docs: Option<String>,
}

impl Interface {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            extends: Vec::new(),
            properties: Vec::new(),
            docs: None,
        }
    }

    #[must_use]
    pub fn docs(mut self, docs: Option<impl Into<String>>) -> Self {
        self.docs = docs.map(Into::into);
        self
    }

    #[must_use]
    pub fn extends(mut self, parent: TypeExpr) -> Self {
        self.extends.push(parent);
        self
    }

    pub fn push_param(&mut self, param: TypeParam) {
        self.params.push(param);
    }

    pub fn push_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn fmt_declaration(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.name)?;
        write_params(f, &self.params)?;

        if !self.extends.is_empty() {
            write!(f, " extends {}", self.extends.iter().join(", "))?;
        }

        if self.properties.is_empty() {
            return f.write_str(" {}");
        }

        f.write_str(" {\n")?;

        for prop in &self.properties {
            writeln!(f, "  {};", indent_continuation(&prop.to_string(), "  "))?;
        }

        f.write_str("}")
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref docs) = self.docs {
            write_docs(f, docs)?;
        }

        self.fmt_declaration(f)
    }
}

/// `type Name<Params> = Definition;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    name: Cow<'static, str>,
    params: Vec<TypeParam>,
    definition: TypeExpr,
    docs: Option<String>,
}

impl TypeAlias {
    pub fn new(name: impl Into<Cow<'static, str>>, definition: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            definition: definition.into(),
            docs: None,
        }
    }

    #[must_use]
    pub fn docs(mut self, docs: Option<impl Into<String>>) -> Self {
        self.docs = docs.map(Into::into);
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: TypeParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn fmt_declaration(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.name)?;
        write_params(f, &self.params)?;
        write!(f, " = {};", self.definition)
    }
}

impl fmt::Display for TypeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref docs) = self.docs {
            write_docs(f, docs)?;
        }

        self.fmt_declaration(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Interface(Interface),
    TypeAlias(TypeAlias),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Interface(i) => i.name(),
            Declaration::TypeAlias(t) => t.name(),
        }
    }

    fn docs(&self) -> Option<&str> {
        match self {
            Declaration::Interface(i) => i.docs.as_deref(),
            Declaration::TypeAlias(t) => t.docs.as_deref(),
        }
    }

    fn fmt_declaration(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Interface(i) => i.fmt_declaration(f),
            Declaration::TypeAlias(t) => t.fmt_declaration(f),
        }
    }
}

impl From<Interface> for Declaration {
    fn from(value: Interface) -> Self {
        Self::Interface(value)
    }
}

impl From<TypeAlias> for Declaration {
    fn from(value: TypeAlias) -> Self {
        Self::TypeAlias(value)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Interface(i) => i.fmt(f),
            Declaration::TypeAlias(t) => t.fmt(f),
        }
    }
}

/// An exported declaration. Doc comments stay above the `export` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Export(Declaration);

impl Export {
    pub fn new(declaration: impl Into<Declaration>) -> Self {
        Self(declaration.into())
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(docs) = self.0.docs() {
            write_docs(f, docs)?;
        }

        f.write_str("export ")?;
        self.0.fmt_declaration(f)
    }
}

pub(crate) fn write_docs(f: &mut fmt::Formatter<'_>, docs: &str) -> fmt::Result {
    let mut lines = docs.trim().lines();

    match (lines.next(), lines.next()) {
        (None, _) => Ok(()),
        (Some(line), None) => writeln!(f, "/** {} */", line.trim_end()),
        _ => {
            f.write_str("/**\n")?;

            for line in docs.trim().lines() {
                let line = line.trim_end();

                if line.is_empty() {
                    f.write_str(" *\n")?;
                } else {
                    writeln!(f, " * {line}")?;
                }
            }

            f.write_str(" */\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn exported_interface_with_docs() {
        let mut interface = Interface::new("User").docs(Some("A registered user.\nBacked by the users table."));
        interface.push_property(Property::new("id", TypeExpr::ident("string")));
        interface.push_property(Property::new("name", TypeExpr::ident("string").nullable()));

        expect![[r#"
            /**
             * A registered user.
             * Backed by the users table.
             */
            export interface User {
              id: string;
              name: string | null;
            }"#]]
        .assert_eq(&Export::new(interface).to_string());
    }

    #[test]
    fn empty_interface() {
        let interface = Interface::new("Empty");
        assert_eq!(Export::new(interface).to_string(), "export interface Empty {}");
    }

    #[test]
    fn generic_type_alias() {
        let alias = TypeAlias::new("ConnectionNodes", TypeExpr::ident("T").array()).with_param(
            TypeParam::new("T")
                .extends(TypeExpr::ident("object"))
                .with_default(TypeExpr::ident("Record<string, unknown>")),
        );

        expect!["type ConnectionNodes<T extends object = Record<string, unknown>> = T[];"].assert_eq(&alias.to_string());
    }

    #[test]
    fn interface_extending_another() {
        let mut interface = Interface::new("UserWithPosts").extends(TypeExpr::ident("User"));
        interface.push_property(Property::new("posts", TypeExpr::ident("Post").array()).optional());

        expect![[r#"
            interface UserWithPosts extends User {
              posts?: Post[];
            }"#]]
        .assert_eq(&interface.to_string());
    }

    #[test]
    fn single_line_docs_on_alias() {
        let alias = TypeAlias::new("Role", TypeExpr::string("ADMIN").or(TypeExpr::string("MEMBER"))).docs(Some("Roles"));

        expect![[r#"
            /** Roles */
            export type Role = 'ADMIN' | 'MEMBER';"#]]
        .assert_eq(&Export::new(alias).to_string());
    }
}
