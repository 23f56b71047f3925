use std::fmt::Write;

use indoc::indoc;
use typescript_ast::Module;

use super::{header, EmitContext};
use crate::CodegenError;

const INDENT: &str = "  ";
const DOUBLE_INDENT: &str = "    ";

const CLIENT: &str = indoc! {r#"
    export interface ClientConfig {
      endpoint: string;
      headers?: Record<string, string>;
    }

    let config: ClientConfig = { endpoint: '/graphql' };

    /** Sets the endpoint and headers used by every request. */
    export function configure(next: ClientConfig): void {
      config = { ...config, ...next, headers: { ...config.headers, ...next.headers } };
    }

    export interface GraphQLErrorEntry {
      message: string;
      path?: (string | number)[];
      extensions?: Record<string, unknown>;
    }

    export class GraphQLRequestError extends Error {
      constructor(
        public readonly errors: GraphQLErrorEntry[],
        public readonly status?: number,
      ) {
        super(errors.map((error) => error.message).join('\n') || `request failed with status ${status}`);
        this.name = 'GraphQLRequestError';
      }
    }

    /** Sends one operation and returns its `data`, throwing on transport and GraphQL errors. */
    export async function execute<TData, TVariables = Record<string, never>>(
      document: string,
      variables?: TVariables,
    ): Promise<TData> {
      const response = await fetch(config.endpoint, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json', ...config.headers },
        body: JSON.stringify({ query: document, variables }),
      });

      const body = (await response.json().catch(() => ({}))) as { data?: TData; errors?: GraphQLErrorEntry[] };

      if (!response.ok || body.errors?.length) {
        throw new GraphQLRequestError(body.errors ?? [], response.status);
      }

      return body.data as TData;
    }
"#};

const SELECTION: &str = indoc! {r#"
    interface NestedSelect {
      select?: object;
      first?: number;
      [argument: string]: unknown;
    }

    /** A GraphQL input literal. With `enums`, strings are written as enum values. */
    function literal(value: unknown, enums = false): string {
      if (value === null || value === undefined) {
        return 'null';
      }
      if (Array.isArray(value)) {
        return `[${value.map((item) => literal(item, enums)).join(', ')}]`;
      }
      if (typeof value === 'string' && enums) {
        return value;
      }
      if (typeof value === 'object') {
        const fields = Object.entries(value)
          .filter(([, field]) => field !== undefined)
          .map(([name, field]) => `${name}: ${literal(field)}`);
        return fields.length > 0 ? `{ ${fields.join(', ')} }` : '{}';
      }
      return JSON.stringify(value);
    }

    /**
     * The selection set of `select` on `entity`, one field per line, `depth` levels deep.
     *
     * Paginated relations select their total count and nodes. A selection without
     * fields selects `__typename`.
     */
    export function selectionSet(entity: string, select: object, depth = 0): string {
      const indent = '  '.repeat(depth);
      const lines: string[] = [];

      for (const [field, value] of Object.entries(select)) {
        if (value === true) {
          lines.push(`${indent}${field}`);
          continue;
        }
        if (value === null || typeof value !== 'object') {
          continue;
        }

        const nested = value as NestedSelect;
        const relation = relations[entity]?.[field];

        if (!relation?.connection) {
          lines.push(`${indent}${field} {`, selectionSet(relation?.entity ?? '', nested.select ?? {}, depth + 1), `${indent}}`);
          continue;
        }

        const args: string[] = [];
        if (nested.first !== undefined) {
          args.push(`first: ${literal(nested.first)}`);
        }
        if (nested[pagination.filter] !== undefined) {
          args.push(`${pagination.filter}: ${literal(nested[pagination.filter])}`);
        }
        if (nested[pagination.orderBy] !== undefined) {
          args.push(`${pagination.orderBy}: ${literal(nested[pagination.orderBy], true)}`);
        }

        lines.push(
          args.length > 0 ? `${indent}${field}(${args.join(', ')}) {` : `${indent}${field} {`,
          `${indent}  ${pagination.totalCount}`,
          `${indent}  ${pagination.nodes} {`,
          selectionSet(relation.entity, nested.select ?? {}, depth + 2),
          `${indent}  }`,
          `${indent}}`,
        );
      }

      return lines.length > 0 ? lines.join('\n') : `${indent}__typename`;
    }
"#};

/// `client.ts`: the runtime every generated fetcher goes through, and the
/// builder turning caller selections into selection sets.
pub(super) fn module(ctx: &EmitContext<'_>) -> Result<Module, CodegenError> {
    let mut module = Module::new().with_header(header("GraphQL transport"));
    module.push_code(CLIENT);
    module.push_code(pagination(ctx)?);
    module.push_code(relations(ctx)?);
    module.push_code(SELECTION);

    Ok(module)
}

fn pagination(ctx: &EmitContext<'_>) -> Result<String, CodegenError> {
    let pagination = &ctx.config.pagination;
    let mut out = String::from("const pagination = {\n");

    writeln!(out, "{INDENT}totalCount: '{}',", pagination.total_count_field)?;
    writeln!(out, "{INDENT}nodes: '{}',", pagination.nodes_field)?;
    writeln!(out, "{INDENT}filter: '{}',", pagination.filter_argument)?;
    writeln!(out, "{INDENT}orderBy: '{}',", pagination.order_by_argument)?;
    out.push_str("} as const;");

    Ok(out)
}

/// Relation fields per table: the related table and whether the field is paginated.
fn relations(ctx: &EmitContext<'_>) -> Result<String, CodegenError> {
    let mut out = String::from(
        "const relations: Record<string, Record<string, { entity: string; connection: boolean }>> = {\n",
    );

    for table in &ctx.input.tables {
        if table.relations.is_empty() {
            writeln!(out, "{INDENT}{}: {{}},", table.name)?;
            continue;
        }

        writeln!(out, "{INDENT}{}: {{", table.name)?;

        for (kind, field, relation) in table.relations.iter() {
            writeln!(
                out,
                "{DOUBLE_INDENT}{field}: {{ entity: '{}', connection: {} }},",
                relation.related_table,
                kind.is_collection()
            )?;
        }

        writeln!(out, "{INDENT}}},")?;
    }

    out.push_str("};");
    Ok(out)
}
