//! Drives generation of every artifact, in manifest order.

mod barrel;
mod client;
mod custom_ops;
mod definitions;
mod operation;
mod select_types;
mod table_ops;
mod types;

use std::collections::BTreeSet;

use typescript_ast::Module;

use crate::{
    config::CodegenConfig,
    document::DocumentBuilder,
    query_keys::QueryKeyStore,
    resolver::TypeResolver,
    scalars::ScalarMap,
    schema::SchemaInput,
    select::ShapeCatalog,
    tracker::TypeTracker,
    CodegenError,
};

/// One generated file, with a path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub tables: usize,
    /// Number of generated `use*` hooks.
    pub hooks: usize,
    pub custom_queries: usize,
    pub custom_mutations: usize,
    pub total_artifacts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOutput {
    pub artifacts: Vec<Artifact>,
    pub stats: GenerateStats,
}

impl GenerateOutput {
    pub fn artifact(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|artifact| artifact.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|artifact| artifact.path.as_str())
    }
}

/// Everything shared by the artifacts of one run.
pub(crate) struct EmitContext<'a> {
    pub input: &'a SchemaInput,
    pub config: &'a CodegenConfig,
    pub catalog: ShapeCatalog,
    pub scalars: ScalarMap,
    /// Every name defined in `types.ts`.
    pub namespace: BTreeSet<String>,
    pub keys: QueryKeyStore,
}

impl<'a> EmitContext<'a> {
    fn new(input: &'a SchemaInput, config: &'a CodegenConfig) -> Self {
        let keys = QueryKeyStore::new(
            &input.tables,
            input.operations.queries.iter().map(|operation| operation.name.clone()),
            input.operations.mutations.iter().map(|operation| operation.name.clone()),
            &config.query_keys,
        );

        Self {
            input,
            config,
            catalog: ShapeCatalog::build(input, &config.pagination),
            scalars: ScalarMap::with_overrides(config.scalars.overrides.clone()),
            namespace: BTreeSet::new(),
            keys,
        }
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.scalars, self.config.scalars.unknown)
    }

    pub fn builder(&self) -> DocumentBuilder<'_> {
        DocumentBuilder::new(&self.catalog, self.config)
    }

    pub fn tracker(&self) -> TypeTracker<'_> {
        TypeTracker::new(&self.namespace)
    }
}

/// The generated-file banner with a one-line description.
pub(crate) fn header(description: &str) -> String {
    format!(
        "/**\n * {description}\n *\n * @generated by graphql-client-codegen\n * DO NOT EDIT. Changes are overwritten on the next run.\n */"
    )
}

/// Collects artifacts in manifest order.
struct Manifest {
    artifacts: Vec<Artifact>,
}

impl Manifest {
    fn push(&mut self, path: impl Into<String>, module: &Module) {
        let path = path.into();
        let content = module.to_string();

        tracing::debug!(path = %path, bytes = content.len(), "emitted artifact");
        self.artifacts.push(Artifact { path, content });
    }

    fn extend(&mut self, artifacts: Vec<(String, Module)>) {
        for (path, module) in artifacts {
            self.push(path, &module);
        }
    }
}

/// Generates the complete client for `input`.
///
/// Either every artifact is produced or the first error is returned; there is
/// no partial output.
pub fn generate(input: &SchemaInput, config: &CodegenConfig) -> Result<GenerateOutput, CodegenError> {
    let span = tracing::info_span!(
        "generate",
        tables = input.tables.len(),
        queries = input.operations.queries.len(),
        mutations = input.operations.mutations.len(),
    );
    let _guard = span.enter();

    let mut ctx = EmitContext::new(input, config);
    let mut manifest = Manifest { artifacts: Vec::new() };
    let mut stats = GenerateStats {
        tables: input.tables.len(),
        ..Default::default()
    };

    let mut select_module = Module::new().with_header(header("Selection helper types"));
    select_types::module(&mut select_module, config.selection.strict_depth, &config.pagination);

    let types = types::module(&ctx);
    ctx.namespace = types.namespace;

    // Custom operations decide whether schema-types.ts exists, so they are built first.
    let custom_queries = custom_ops::artifacts(&ctx, &input.operations.queries)?;
    let custom_mutations = custom_ops::artifacts(&ctx, &input.operations.mutations)?;
    let schema_types = custom_queries.schema_types.union(&custom_mutations.schema_types).cloned();
    let schema_module = custom_ops::schema_types_module(&ctx, schema_types);

    let tables = table_ops::artifacts(&ctx)?;

    manifest.push("select-types.ts", &select_module);
    manifest.push("types.ts", &types.module);

    if let Some(ref module) = schema_module {
        manifest.push("schema-types.ts", module);
    }

    manifest.push("client.ts", &client::module(&ctx)?);

    let centralized_keys = config.query_keys.style == crate::config::QueryKeyStyle::Centralized;

    if centralized_keys {
        let mut module = Module::new().with_header(header("Query keys for cache reads and invalidation"));
        ctx.keys.render_query_keys(&mut module)?;
        manifest.push("query-keys.ts", &module);
    }

    if centralized_keys && config.query_keys.mutation_keys {
        let mut module = Module::new().with_header(header("Mutation keys"));
        ctx.keys.render_mutation_keys(&mut module)?;
        manifest.push("mutation-keys.ts", &module);
    }

    stats.hooks = tables.hooks + custom_queries.hooks + custom_mutations.hooks;
    stats.custom_queries = custom_queries.artifacts.len();
    stats.custom_mutations = custom_mutations.artifacts.len();

    let mut barrels = barrel::RootBarrel::new(schema_module.is_some(), centralized_keys, config.query_keys.mutation_keys);

    for (directory, artifacts) in [
        ("queries", tables.queries),
        ("mutations", tables.mutations),
        ("custom-queries", custom_queries.artifacts),
        ("custom-mutations", custom_mutations.artifacts),
    ] {
        let Some(index) = barrel::directory(&artifacts) else {
            continue;
        };

        manifest.extend(artifacts);
        manifest.push(format!("{directory}/index.ts"), &index);
        barrels.push(directory);
    }

    manifest.push("index.ts", &barrels.module());

    stats.total_artifacts = manifest.artifacts.len();
    tracing::info!(artifacts = stats.total_artifacts, hooks = stats.hooks, "generation finished");

    Ok(GenerateOutput {
        artifacts: manifest.artifacts,
        stats,
    })
}
