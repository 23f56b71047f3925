use std::fmt::{self, Write};

use typescript_ast::{Export, Interface, Module, Property, TypeExpr};

use super::{EntityKeyFactory, QueryKeyStore};
use crate::config::QueryKeyStyle;

const INDENT: &str = "  ";
const DOUBLE_INDENT: &str = "    ";
const TRIPLE_INDENT: &str = "      ";

impl QueryKeyStore {
    /// `query-keys.ts`: one factory per entity, custom query keys and the root store.
    pub fn render_query_keys(&self, module: &mut Module) -> fmt::Result {
        for factory in self.entities() {
            if factory.keys.is_scoped() {
                module.push_item(Export::new(scope_interface(factory)));
            }

            module.push_code(entity_factory(factory)?);
        }

        if !self.custom_queries().is_empty() {
            let mut out = String::new();
            writeln!(out, "export const {} = {{", self.custom_query_ident())?;

            for name in self.custom_queries() {
                writeln!(
                    out,
                    "{INDENT}{name}: (variables?: object) => ['{name}', variables] as const,"
                )?;
            }

            out.push_str("} as const;");
            module.push_code(out);
        }

        let mut out = String::from("export const queryKeys = {\n");

        for factory in self.entities() {
            writeln!(out, "{INDENT}{}: {},", factory.store_key, factory.ident)?;
        }

        if !self.custom_queries().is_empty() {
            writeln!(out, "{INDENT}{}: {},", self.custom_scope(), self.custom_query_ident())?;
        }

        out.push_str("} as const;");
        module.push_code(out);
        module.push_code("export type QueryKeyScope = keyof typeof queryKeys;");

        Ok(())
    }

    /// `mutation-keys.ts`: keys passed as `mutationKey` by mutation hooks.
    pub fn render_mutation_keys(&self, module: &mut Module) -> fmt::Result {
        for factory in self.entities() {
            let ident = &factory.mutation_ident;
            let entity = &factory.keys.entity;
            let mut out = String::new();

            writeln!(out, "export const {ident} = {{")?;
            writeln!(out, "{INDENT}all: ['mutation', '{entity}'] as const,")?;

            for action in ["create", "update", "delete"] {
                writeln!(out, "{INDENT}{action}: () => [...{ident}.all, '{action}'] as const,")?;
            }

            out.push_str("} as const;");
            module.push_code(out);
        }

        if !self.custom_mutations().is_empty() {
            let mut out = String::new();
            writeln!(out, "export const {} = {{", self.custom_mutation_ident())?;

            for name in self.custom_mutations() {
                writeln!(out, "{INDENT}{name}: () => ['mutation', '{name}'] as const,")?;
            }

            out.push_str("} as const;");
            module.push_code(out);
        }

        let mut out = String::from("export const mutationKeys = {\n");

        for factory in self.entities() {
            writeln!(out, "{INDENT}{}: {},", factory.store_key, factory.mutation_ident)?;
        }

        if !self.custom_mutations().is_empty() {
            writeln!(out, "{INDENT}{}: {},", self.custom_scope(), self.custom_mutation_ident())?;
        }

        out.push_str("} as const;");
        module.push_code(out);

        Ok(())
    }
}

fn scope_interface(factory: &EntityKeyFactory) -> Interface {
    let mut scope = Interface::new(factory.scope_type.clone());

    for ancestor in &factory.keys.ancestors {
        scope.push_property(
            Property::new(ancestor.foreign_key.clone(), TypeExpr::ident("string").nullable()).optional(),
        );
    }

    scope
}

fn entity_factory(factory: &EntityKeyFactory) -> Result<String, fmt::Error> {
    let ident = &factory.ident;
    let entity = &factory.keys.entity;
    let mut out = String::new();

    writeln!(out, "export const {ident} = {{")?;
    writeln!(out, "{INDENT}all: ['{entity}'] as const,")?;

    if !factory.keys.is_scoped() {
        writeln!(out, "{INDENT}lists: () => [...{ident}.all, 'list'] as const,")?;
        writeln!(
            out,
            "{INDENT}list: (variables?: object) => [...{ident}.lists(), variables] as const,"
        )?;
        writeln!(out, "{INDENT}details: () => [...{ident}.all, 'detail'] as const,")?;
        writeln!(
            out,
            "{INDENT}detail: (id: string | number) => [...{ident}.details(), id] as const,"
        )?;
        out.push_str("} as const;");

        return Ok(out);
    }

    let scope = &factory.scope_type;

    for ancestor in &factory.keys.ancestors {
        let foreign_key = &ancestor.foreign_key;
        writeln!(
            out,
            "{INDENT}{}: ({foreign_key}: string) => ['{entity}', {{ {foreign_key} }}] as const,",
            ancestor.builder_name()
        )?;
    }

    writeln!(out, "{INDENT}scoped: (scope?: {scope}) => {{")?;

    for ancestor in &factory.keys.ancestors {
        let foreign_key = &ancestor.foreign_key;
        writeln!(out, "{DOUBLE_INDENT}if (scope?.{foreign_key} != null) {{")?;
        writeln!(
            out,
            "{TRIPLE_INDENT}return {ident}.{}(scope.{foreign_key});",
            ancestor.builder_name()
        )?;
        writeln!(out, "{DOUBLE_INDENT}}}")?;
    }

    writeln!(out, "{DOUBLE_INDENT}return {ident}.all;")?;
    writeln!(out, "{INDENT}}},")?;
    writeln!(
        out,
        "{INDENT}lists: (scope?: {scope}) => [...{ident}.scoped(scope), 'list'] as const,"
    )?;
    writeln!(
        out,
        "{INDENT}list: (variables?: object, scope?: {scope}) => [...{ident}.lists(scope), variables] as const,"
    )?;
    writeln!(
        out,
        "{INDENT}details: (scope?: {scope}) => [...{ident}.scoped(scope), 'detail'] as const,"
    )?;
    writeln!(
        out,
        "{INDENT}detail: (id: string | number, scope?: {scope}) => [...{ident}.details(scope), id] as const,"
    )?;
    out.push_str("} as const;");

    Ok(out)
}

/// TypeScript expressions for the keys an artifact uses, either calls into the
/// shared factories or inline arrays.
#[derive(Debug, Clone, Copy)]
pub struct KeyExprs<'a> {
    factory: &'a EntityKeyFactory,
    style: QueryKeyStyle,
    mutation_keys: bool,
}

impl<'a> KeyExprs<'a> {
    pub fn new(factory: &'a EntityKeyFactory, style: QueryKeyStyle, mutation_keys: bool) -> Self {
        Self {
            factory,
            style,
            mutation_keys,
        }
    }

    pub fn is_centralized(&self) -> bool {
        self.style == QueryKeyStyle::Centralized
    }

    pub fn is_scoped(&self) -> bool {
        self.factory.keys.is_scoped()
    }

    pub fn factory(&self) -> &'a EntityKeyFactory {
        self.factory
    }

    fn scope_arg(&self, scope: &str) -> String {
        if self.is_scoped() {
            format!(", {scope}")
        } else {
            String::new()
        }
    }

    /// Prefix of every key of the entity, scoped ones included.
    pub fn all(&self) -> String {
        match self.style {
            QueryKeyStyle::Centralized => format!("{}.all", self.factory.ident),
            QueryKeyStyle::Inline => format!("['{}'] as const", self.factory.keys.entity),
        }
    }

    pub fn list(&self, variables: &str, scope: &str) -> String {
        match self.style {
            QueryKeyStyle::Centralized => format!("{}.list({variables}{})", self.factory.ident, self.scope_arg(scope)),
            QueryKeyStyle::Inline => format!("['{}', 'list', {variables}] as const", self.factory.keys.entity),
        }
    }

    pub fn lists(&self) -> String {
        match self.style {
            QueryKeyStyle::Centralized => format!("{}.lists()", self.factory.ident),
            QueryKeyStyle::Inline => format!("['{}', 'list'] as const", self.factory.keys.entity),
        }
    }

    pub fn detail(&self, id: &str, scope: &str) -> String {
        match self.style {
            QueryKeyStyle::Centralized => format!("{}.detail({id}{})", self.factory.ident, self.scope_arg(scope)),
            QueryKeyStyle::Inline => format!("['{}', 'detail', {id}] as const", self.factory.keys.entity),
        }
    }

    /// The `mutationKey` of a table mutation, if mutation keys are generated.
    pub fn mutation(&self, action: &str) -> Option<String> {
        if !self.mutation_keys {
            return None;
        }

        Some(match self.style {
            QueryKeyStyle::Centralized => format!("{}.{action}()", self.factory.mutation_ident),
            QueryKeyStyle::Inline => format!("['mutation', '{}', '{action}'] as const", self.factory.keys.entity),
        })
    }
}
