use typescript_ast::{Module, ReExport};

use super::header;

/// `index.ts` of a directory of artifacts, or `None` when there is nothing to export.
pub(super) fn directory(artifacts: &[(String, Module)]) -> Option<Module> {
    if artifacts.is_empty() {
        return None;
    }

    let mut module = Module::new().with_header(header("Barrel"));

    for (path, _) in artifacts {
        let file = path.rsplit('/').next().unwrap_or(path.as_str());
        let stem = file.strip_suffix(".ts").unwrap_or(file);

        module.push_item(ReExport::all(format!("./{stem}")));
    }

    Some(module)
}

/// The root `index.ts`, re-exporting every top-level artifact that exists.
pub(super) struct RootBarrel {
    schema_types: bool,
    query_keys: bool,
    mutation_keys: bool,
    directories: Vec<&'static str>,
}

impl RootBarrel {
    pub fn new(schema_types: bool, query_keys: bool, mutation_keys: bool) -> Self {
        Self {
            schema_types,
            query_keys,
            mutation_keys: query_keys && mutation_keys,
            directories: Vec::new(),
        }
    }

    pub fn push(&mut self, directory: &'static str) {
        self.directories.push(directory);
    }

    pub fn module(&self) -> Module {
        let mut module = Module::new().with_header(header("Generated GraphQL client"));

        let files = [
            ("select-types", true),
            ("types", true),
            ("schema-types", self.schema_types),
            ("client", true),
            ("query-keys", self.query_keys),
            ("mutation-keys", self.mutation_keys),
        ];

        for (file, exists) in files {
            if exists {
                module.push_item(ReExport::all(format!("./{file}")));
            }
        }

        for directory in &self.directories {
            module.push_item(ReExport::all(format!("./{directory}")));
        }

        module
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn empty_directories_have_no_barrel() {
        assert!(directory(&[]).is_none());
    }

    #[test]
    fn directory_barrel() {
        let artifacts = vec![
            ("queries/users.ts".to_owned(), Module::new()),
            ("queries/user.ts".to_owned(), Module::new()),
        ];

        let Some(module) = directory(&artifacts) else {
            unreachable!("two artifacts");
        };

        expect![[r#"
            /**
             * Barrel
             *
             * @generated by graphql-client-codegen
             * DO NOT EDIT. Changes are overwritten on the next run.
             */

            export * from './users';
            export * from './user';
        "#]]
        .assert_eq(&module.to_string());
    }

    #[test]
    fn root_barrel_skips_missing_files() {
        let mut barrel = RootBarrel::new(false, false, true);
        barrel.push("queries");

        expect![[r#"
            /**
             * Generated GraphQL client
             *
             * @generated by graphql-client-codegen
             * DO NOT EDIT. Changes are overwritten on the next run.
             */

            export * from './select-types';
            export * from './types';
            export * from './client';
            export * from './queries';
        "#]]
        .assert_eq(&barrel.module().to_string());
    }
}
