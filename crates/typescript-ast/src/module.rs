use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use itertools::Itertools;

use crate::{Declaration, Export};

#[derive(Debug, Clone, PartialEq)]
enum ImportItems {
    Named(Vec<Cow<'static, str>>),
    Namespace(Cow<'static, str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    items: ImportItems,
    from: Cow<'static, str>,
    type_only: bool,
}

impl Import {
    pub fn named<I, S>(from: impl Into<Cow<'static, str>>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            items: ImportItems::Named(items.into_iter().map(Into::into).collect()),
            from: from.into(),
            type_only: false,
        }
    }

    pub fn namespace(from: impl Into<Cow<'static, str>>, alias: impl Into<Cow<'static, str>>) -> Self {
        Self {
            items: ImportItems::Namespace(alias.into()),
            from: from.into(),
            type_only: false,
        }
    }

    #[must_use]
    pub fn type_only(mut self) -> Self {
        self.type_only = true;
        self
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;

        if self.type_only {
            f.write_str("type ")?;
        }

        match self.items {
            ImportItems::Named(ref items) => write!(f, "{{ {} }}", items.iter().join(", "))?,
            ImportItems::Namespace(ref alias) => write!(f, "* as {alias}")?,
        }

        write!(f, " from '{}';", self.from)
    }
}

/// Collects named imports, deduplicated and sorted per source module.
#[derive(Debug, Default)]
pub struct ImportSet {
    values: BTreeMap<String, BTreeSet<String>>,
    types: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&mut self, from: &str, name: impl Into<String>) {
        self.values.entry(from.to_owned()).or_default().insert(name.into());
    }

    pub fn types<I, S>(&mut self, from: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.types.entry(from.to_owned()).or_default();
        entry.extend(names.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.types.is_empty()
    }

    /// Value imports first, then type-only imports, each group ordered by module.
    pub fn into_imports(self) -> Vec<Import> {
        let values = self
            .values
            .into_iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(from, names)| Import::named(from, names));

        let types = self
            .types
            .into_iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(from, names)| Import::named(from, names).type_only());

        values.chain(types).collect()
    }
}

/// `export * from './module';`
#[derive(Debug, Clone, PartialEq)]
pub struct ReExport {
    from: Cow<'static, str>,
}

impl ReExport {
    pub fn all(from: impl Into<Cow<'static, str>>) -> Self {
        Self { from: from.into() }
    }
}

impl fmt::Display for ReExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export * from '{}';", self.from)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
    Export(Export),
    Declaration(Declaration),
    ReExport(ReExport),
    /// Verbatim statements, such as function bodies.
    Code(String),
    Comment(String),
}

impl fmt::Display for ModuleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleItem::Export(export) => export.fmt(f),
            ModuleItem::Declaration(declaration) => declaration.fmt(f),
            ModuleItem::ReExport(re_export) => re_export.fmt(f),
            ModuleItem::Code(code) => f.write_str(code.trim_end()),
            ModuleItem::Comment(comment) => {
                let mut lines = comment.lines().peekable();

                while let Some(line) = lines.next() {
                    write!(f, "// {line}")?;

                    if lines.peek().is_some() {
                        f.write_str("\n")?;
                    }
                }

                Ok(())
            }
        }
    }
}

impl From<Export> for ModuleItem {
    fn from(value: Export) -> Self {
        Self::Export(value)
    }
}

impl From<Declaration> for ModuleItem {
    fn from(value: Declaration) -> Self {
        Self::Declaration(value)
    }
}

impl From<ReExport> for ModuleItem {
    fn from(value: ReExport) -> Self {
        Self::ReExport(value)
    }
}

/// A complete TypeScript source file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Module {
    header: Option<String>,
    imports: Vec<Import>,
    items: Vec<ModuleItem>,
}

impl Module {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text written verbatim at the top of the file, usually a block comment.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn push_import(&mut self, import: Import) {
        self.imports.push(import);
    }

    pub fn extend_imports(&mut self, imports: impl IntoIterator<Item = Import>) {
        self.imports.extend(imports);
    }

    pub fn push_item(&mut self, item: impl Into<ModuleItem>) {
        self.items.push(item.into());
    }

    pub fn push_code(&mut self, code: impl Into<String>) {
        self.items.push(ModuleItem::Code(code.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.items.is_empty()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = 0;

        if let Some(ref header) = self.header {
            writeln!(f, "{}", header.trim_end())?;
            sections += 1;
        }

        if !self.imports.is_empty() {
            if sections > 0 {
                f.write_str("\n")?;
            }

            for import in &self.imports {
                writeln!(f, "{import}")?;
            }

            sections += 1;
        }

        let mut previous: Option<&ModuleItem> = None;

        for item in &self.items {
            let consecutive_re_exports = matches!(
                (previous, item),
                (Some(ModuleItem::ReExport(_)), ModuleItem::ReExport(_))
            );

            if !consecutive_re_exports && (sections > 0 || previous.is_some()) {
                f.write_str("\n")?;
            }

            writeln!(f, "{item}")?;
            previous = Some(item);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interface, Property, TypeAlias, TypeExpr};
    use expect_test::expect;

    #[test]
    fn import_rendering() {
        assert_eq!(
            Import::named("@tanstack/react-query", ["useQuery"]).to_string(),
            "import { useQuery } from '@tanstack/react-query';"
        );

        assert_eq!(
            Import::named("./types", ["Post", "User"]).type_only().to_string(),
            "import type { Post, User } from './types';"
        );

        assert_eq!(
            Import::namespace("./types", "types").to_string(),
            "import * as types from './types';"
        );
    }

    #[test]
    fn import_set_groups_and_sorts() {
        let mut set = ImportSet::new();
        set.types("../types", ["User", "Post"]);
        set.value("../client", "execute");
        set.types("../types", ["User"]);
        set.types("../client", ["ExecuteOptions"]);

        let rendered = set.into_imports().iter().map(ToString::to_string).collect::<Vec<_>>();

        assert_eq!(
            rendered,
            [
                "import { execute } from '../client';",
                "import type { ExecuteOptions } from '../client';",
                "import type { Post, User } from '../types';",
            ]
        );
    }

    #[test]
    fn full_module() {
        let mut module = Module::new().with_header("/** @generated */");
        module.push_import(Import::named("./select-types", ["ConnectionResult"]).type_only());

        let mut user = Interface::new("User");
        user.push_property(Property::new("id", TypeExpr::ident("string")));
        module.push_item(Export::new(user));
        module.push_item(Export::new(TypeAlias::new("UserId", TypeExpr::ident("string"))));
        module.push_code("export const userKeys = {\n  all: ['user'] as const,\n} as const;\n");

        expect![[r#"
            /** @generated */

            import type { ConnectionResult } from './select-types';

            export interface User {
              id: string;
            }

            export type UserId = string;

            export const userKeys = {
              all: ['user'] as const,
            } as const;
        "#]]
        .assert_eq(&module.to_string());
    }

    #[test]
    fn barrel_module() {
        let mut module = Module::new();
        module.push_item(ReExport::all("./users"));
        module.push_item(ReExport::all("./user"));
        module.push_item(ModuleItem::Comment("end of barrel".into()));

        expect![[r#"
            export * from './users';
            export * from './user';

            // end of barrel
        "#]]
        .assert_eq(&module.to_string());
    }
}
