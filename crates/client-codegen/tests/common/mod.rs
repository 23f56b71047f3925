use graphql_client_codegen::{generate, CodegenConfig, GenerateOutput, SchemaInput};
use indoc::indoc;

/// Users with posts, a `currentUser` query and a `signIn` mutation taking an input object.
pub const SCHEMA: &str = indoc! {r#"
    {
      "tables": [
        {
          "name": "User",
          "fields": [
            { "name": "id", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "UUID" } } },
            { "name": "name", "type": { "kind": "SCALAR", "name": "String" } },
            { "name": "createdAt", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "Datetime" } } }
          ],
          "relations": {
            "hasMany": [{ "fieldName": "posts", "relatedTable": "Post" }]
          }
        },
        {
          "name": "Post",
          "fields": [
            { "name": "id", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "UUID" } } },
            { "name": "title", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "String" } } },
            { "name": "userId", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "UUID" } } }
          ],
          "relations": {
            "belongsTo": [{ "fieldName": "author", "relatedTable": "User" }]
          }
        }
      ],
      "operations": {
        "queries": [
          { "name": "currentUser", "returnType": { "kind": "OBJECT", "name": "User" } }
        ],
        "mutations": [
          {
            "name": "signIn",
            "description": "Exchanges credentials for a session token.",
            "args": [
              { "name": "input", "type": { "kind": "NON_NULL", "ofType": { "kind": "INPUT_OBJECT", "name": "SignInInput" } } }
            ],
            "returnType": { "kind": "SCALAR", "name": "String" }
          }
        ]
      },
      "registry": [
        {
          "name": "SignInInput",
          "kind": "INPUT_OBJECT",
          "inputFields": [
            { "name": "email", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "String" } } },
            { "name": "password", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "String" } } }
          ]
        }
      ]
    }
"#};

pub fn setup_logging() {
    let filter = tracing_subscriber::filter::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("graphql_client_codegen=debug".to_string()))
        .unwrap();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init();
}

pub fn input() -> SchemaInput {
    SchemaInput::from_json(SCHEMA).unwrap()
}

pub fn config(toml: &str) -> CodegenConfig {
    CodegenConfig::from_toml_str(toml).unwrap()
}

pub fn run(input: &SchemaInput, config: &CodegenConfig) -> GenerateOutput {
    setup_logging();
    generate(input, config).unwrap()
}

pub fn content<'a>(output: &'a GenerateOutput, path: &str) -> &'a str {
    match output.artifact(path) {
        Some(artifact) => &artifact.content,
        None => unreachable!("no artifact at {path}"),
    }
}
