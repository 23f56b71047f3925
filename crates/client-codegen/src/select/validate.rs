use super::{FieldSelection, Selection, Shape, ShapeCatalog};
use crate::SelectionError;

/// Checks that every key of `selection` is a field of `shape`, at every depth.
///
/// Relations must be selected with a nested selection and leaves with a flag.
/// Nested selections whose target shape is unknown are accepted as they are.
pub fn validate(
    catalog: &ShapeCatalog,
    shape: &Shape,
    selection: &Selection,
    max_depth: usize,
) -> Result<(), SelectionError> {
    Validator { catalog, max_depth }.validate(shape, selection, shape.name.clone(), 1)
}

struct Validator<'a> {
    catalog: &'a ShapeCatalog,
    max_depth: usize,
}

impl Validator<'_> {
    fn validate(&self, shape: &Shape, selection: &Selection, path: String, depth: usize) -> Result<(), SelectionError> {
        if depth > self.max_depth {
            return Err(SelectionError::TooDeep {
                path,
                max_depth: self.max_depth,
            });
        }

        for (name, field_selection) in selection.iter() {
            let Some(field) = shape.field(name) else {
                return Err(SelectionError::UnknownField {
                    path,
                    field: name.to_owned(),
                    shape: shape.name.clone(),
                });
            };

            match (field_selection, field.ty.related_shape()) {
                (FieldSelection::Flag(false), _) | (FieldSelection::Flag(true), None) => {}
                (FieldSelection::Flag(true), Some(_)) => {
                    return Err(SelectionError::RelationRequiresSubSelection {
                        path,
                        field: name.to_owned(),
                    })
                }
                (FieldSelection::Nested(_), None) => {
                    return Err(SelectionError::SubSelectionOnLeaf {
                        path,
                        field: name.to_owned(),
                    })
                }
                (FieldSelection::Nested(nested), Some(related)) => {
                    if let Some(related) = self.catalog.get(related) {
                        self.validate(related, &nested.select, format!("{path}.{name}"), depth + 1)?;
                    }
                }
            }
        }

        if selection.is_empty() {
            return Err(SelectionError::EmptySelection { path });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PaginationConfig, fixtures::sample_input, select::NestedSelection};

    fn check(shape: &str, selection: &Selection, max_depth: usize) -> Result<(), SelectionError> {
        let catalog = ShapeCatalog::build(&sample_input(), &PaginationConfig::default());
        let shape = catalog.get(shape).unwrap();

        validate(&catalog, shape, selection, max_depth)
    }

    #[test]
    fn valid_selection() {
        let selection = Selection::fields(["id", "name"]).nested(
            "posts",
            NestedSelection::new(Selection::fields(["title"]).nested("author", NestedSelection::new(Selection::fields(["id"])))),
        );

        assert_eq!(check("User", &selection, 10), Ok(()));
    }

    #[test]
    fn excess_keys_are_rejected() {
        let selection = Selection::fields(["id", "bogusField"]);

        assert_eq!(
            check("User", &selection, 10),
            Err(SelectionError::UnknownField {
                path: "User".into(),
                field: "bogusField".into(),
                shape: "User".into(),
            })
        );
    }

    #[test]
    fn excess_keys_are_rejected_when_nested() {
        let selection =
            Selection::fields(["id"]).nested("posts", NestedSelection::new(Selection::fields(["title", "nope"])));

        let error = check("User", &selection, 10).unwrap_err();

        assert_eq!(error.to_string(), "`nope` is not a field of Post (at User.posts)");
    }

    #[test]
    fn relations_need_a_sub_selection() {
        let selection = Selection::fields(["id", "posts"]);

        assert_eq!(
            check("User", &selection, 10),
            Err(SelectionError::RelationRequiresSubSelection {
                path: "User".into(),
                field: "posts".into(),
            })
        );
    }

    #[test]
    fn leaves_take_no_sub_selection() {
        let selection = Selection::new().nested("name", NestedSelection::new(Selection::fields(["id"])));

        assert!(matches!(
            check("User", &selection, 10),
            Err(SelectionError::SubSelectionOnLeaf { .. })
        ));
    }

    #[test]
    fn depth_is_capped() {
        let selection = Selection::new().nested(
            "posts",
            NestedSelection::new(Selection::new().nested("author", NestedSelection::new(Selection::fields(["id"])))),
        );

        assert_eq!(check("User", &selection, 3), Ok(()));
        assert_eq!(
            check("User", &selection, 2),
            Err(SelectionError::TooDeep {
                path: "User.posts.author".into(),
                max_depth: 2,
            })
        );
    }

    #[test]
    fn empty_selection() {
        let selection = Selection::new().exclude("id");

        assert!(matches!(
            check("User", &selection, 10),
            Err(SelectionError::EmptySelection { .. })
        ));
    }
}
