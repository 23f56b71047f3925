use typescript_ast::{
    Conditional, Declaration, Export, Interface, MappedType, Module, ObjectType, Property, TypeAlias, TypeExpr,
    TypeParam,
};

use crate::config::PaginationConfig;

fn ident(name: &'static str) -> TypeExpr {
    TypeExpr::ident(name)
}

/// `select-types.ts`: pagination envelopes and the selection inference helpers.
pub(super) fn module(module: &mut Module, strict_depth: usize, pagination: &PaginationConfig) {
    let mut page_info = Interface::new("PageInfo");
    page_info.push_property(Property::new("hasNextPage", ident("boolean")));
    page_info.push_property(Property::new("hasPreviousPage", ident("boolean")));
    page_info.push_property(Property::new("startCursor", ident("string").nullable()));
    page_info.push_property(Property::new("endCursor", ident("string").nullable()));
    module.push_item(Export::new(page_info));

    let mut connection = Interface::new("ConnectionResult").docs(Some("A page of `T` rows."));
    connection.push_param(TypeParam::new("T"));
    connection.push_property(Property::new(pagination.nodes_field.clone(), ident("T").array()));
    connection.push_property(Property::new(pagination.total_count_field.clone(), ident("number")));
    connection.push_property(Property::new(pagination.page_info_field.clone(), ident("PageInfo")).optional());
    module.push_item(Export::new(connection));

    // [never, 0, 1, ...]: indexing with a depth yields the next smaller one
    let depths = std::iter::once(ident("never")).chain((0..strict_depth).map(|depth| TypeExpr::ident(depth.to_string())));
    module.push_item(Declaration::from(TypeAlias::new("StrictDepth", TypeExpr::Tuple(depths.collect()))));

    let array_of = |element: TypeExpr| TypeExpr::generic("Array", [element]);
    let non_nullable = TypeExpr::generic("NonNullable", [ident("T")]);

    let relation_node = Conditional::new(
        non_nullable.clone(),
        TypeExpr::generic("ConnectionResult", [ident("infer N")]),
        ident("N"),
        Conditional::new(non_nullable.clone(), array_of(ident("infer E")), ident("E"), non_nullable).into(),
    );
    module.push_item(Declaration::from(
        TypeAlias::new("RelationNode", relation_node).with_param(TypeParam::new("T")),
    ));

    let select_of = |inner: TypeExpr| ObjectType::new().with_property(Property::new("select", inner));
    let selected = ident("TSelect").index(ident("K"));

    let nested_strict = TypeExpr::generic("Omit", [selected.clone(), TypeExpr::string("select")]).and(
        select_of(TypeExpr::generic(
            "StrictSelect",
            [
                ident("S"),
                TypeExpr::generic("RelationNode", [ident("TShape").index(ident("K"))]),
                ident("StrictDepth").index(ident("TDepth")),
            ],
        ))
        .into(),
    );

    let strict_field = Conditional::new(
        ident("K"),
        ident("TShape").keyof(),
        Conditional::new(selected.clone(), select_of(ident("infer S")).into(), nested_strict, selected.clone()).into(),
        ident("never"),
    );

    let strict_select = Conditional::new(
        TypeExpr::Tuple(vec![ident("TDepth")]),
        TypeExpr::Tuple(vec![ident("never")]),
        ident("TSelect"),
        MappedType::new("K", ident("TSelect").keyof(), strict_field.into()).into(),
    );

    module.push_item(Export::new(
        TypeAlias::new("StrictSelect", strict_select)
            .docs(Some(format!(
                "Maps keys of `TSelect` that are not fields of `TShape` to `never`, {strict_depth} levels deep."
            )))
            .with_param(TypeParam::new("TSelect"))
            .with_param(TypeParam::new("TShape"))
            .with_param(
                TypeParam::new("TDepth")
                    .extends(ident("number"))
                    .with_default(TypeExpr::ident(strict_depth.to_string())),
            ),
    ));

    let project_relation = Conditional::new(
        ident("T"),
        TypeExpr::null(),
        TypeExpr::null(),
        Conditional::new(
            ident("T"),
            TypeExpr::generic("ConnectionResult", [ident("infer N")]),
            TypeExpr::generic("ConnectionResult", [TypeExpr::generic("InferSelectResult", [ident("N"), ident("S")])]),
            Conditional::new(
                ident("T"),
                array_of(ident("infer E")),
                array_of(TypeExpr::generic("InferSelectResult", [ident("E"), ident("S")])),
                TypeExpr::generic("InferSelectResult", [ident("T"), ident("S")]),
            )
            .into(),
        )
        .into(),
    );

    module.push_item(Declaration::from(
        TypeAlias::new("ProjectRelation", project_relation)
            .with_param(TypeParam::new("T"))
            .with_param(TypeParam::new("S")),
    ));

    let entity_field = ident("TEntity").index(ident("K"));

    let inferred_field = Conditional::new(
        ident("K"),
        ident("TEntity").keyof(),
        Conditional::new(
            selected.clone(),
            select_of(ident("infer S")).into(),
            TypeExpr::generic("ProjectRelation", [entity_field.clone(), ident("S")]),
            entity_field,
        )
        .into(),
        ident("never"),
    );

    let dropped = Conditional::new(
        selected,
        ident("false").or(ident("undefined")),
        ident("never"),
        ident("K"),
    );

    module.push_item(Export::new(
        TypeAlias::new(
            "InferSelectResult",
            MappedType::new("K", ident("TSelect").keyof(), inferred_field.into()).remap(dropped.into()),
        )
        .docs(Some("The result shape of selecting `TSelect` from `TEntity`."))
        .with_param(TypeParam::new("TEntity"))
        .with_param(TypeParam::new("TSelect")),
    ));
}
