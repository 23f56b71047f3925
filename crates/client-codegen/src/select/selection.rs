use indexmap::IndexMap;

use super::{Shape, ShapeCatalog, ShapeType};
use crate::config::DefaultSelection;

/// A sparse tree of the fields a caller wants back.
///
/// Leaf fields are switched on with `true`. Relations take a nested
/// [`NestedSelection`], optionally with pagination and filter arguments.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(transparent)]
pub struct Selection(IndexMap<String, FieldSelection>);

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldSelection {
    Flag(bool),
    Nested(NestedSelection),
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NestedSelection {
    pub select: Selection,
    #[serde(default)]
    pub first: Option<u32>,
    #[serde(default)]
    pub filter: Option<serde_json::Value>,
    /// Order-by enum values, e.g. `CREATED_AT_DESC`.
    #[serde(default)]
    pub order_by: Option<Vec<String>>,
}

impl NestedSelection {
    pub fn new(select: Selection) -> Self {
        Self {
            select,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn first(mut self, first: u32) -> Self {
        self.first = Some(first);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn order_by<I, S>(mut self, order_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = Some(order_by.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_arguments(&self) -> bool {
        self.first.is_some() || self.filter.is_some() || self.order_by.is_some()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects every field in `names`.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            names
                .into_iter()
                .map(|name| (name.into(), FieldSelection::Flag(true)))
                .collect(),
        )
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into(), FieldSelection::Flag(true));
        self
    }

    #[must_use]
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into(), FieldSelection::Flag(false));
        self
    }

    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, nested: NestedSelection) -> Self {
        self.0.insert(name.into(), FieldSelection::Nested(nested));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSelection> {
        self.0.get(name)
    }

    /// Every key, including excluded ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSelection)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Keys that contribute to the result, in selection order.
    pub fn selected(&self) -> impl Iterator<Item = (&str, &FieldSelection)> {
        self.iter()
            .filter(|(_, field)| !matches!(field, FieldSelection::Flag(false)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field contributes to the result.
    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }

    /// The selection used when the caller supplies none.
    ///
    /// With [`DefaultSelection::PrimaryKey`] this is the key fields, falling back
    /// to the first leaf field.
    pub fn default_for(shape: &Shape, policy: DefaultSelection) -> Self {
        match policy {
            DefaultSelection::AllScalars => Self::fields(shape.leaves().map(|(name, _)| name)),
            DefaultSelection::PrimaryKey => {
                let keys = shape
                    .primary_key
                    .iter()
                    .filter(|key| shape.field(key).is_some_and(|field| field.ty.is_leaf()))
                    .collect::<Vec<_>>();

                if keys.is_empty() {
                    Self::fields(shape.leaves().map(|(name, _)| name).take(1))
                } else {
                    Self::fields(keys.into_iter().map(String::as_str))
                }
            }
        }
    }

    /// All leaf fields, descending into relations until `depth` levels are selected.
    ///
    /// Shapes already on the path are not entered again.
    pub fn all_scalars(catalog: &ShapeCatalog, shape: &Shape, depth: usize) -> Self {
        let mut path = vec![shape.name.as_str()];
        Self::all_scalars_inner(catalog, shape, depth, &mut path)
    }

    fn all_scalars_inner<'a>(catalog: &'a ShapeCatalog, shape: &'a Shape, depth: usize, path: &mut Vec<&'a str>) -> Self {
        let mut selection = Selection::new();

        for (name, field) in &shape.fields {
            let related = match field.ty {
                ShapeType::Leaf => {
                    selection = selection.field(name.clone());
                    continue;
                }
                ShapeType::Object { ref shape, .. } | ShapeType::Connection { node: ref shape } => shape,
            };

            if depth <= 1 || path.contains(&related.as_str()) {
                continue;
            }

            let Some(related_shape) = catalog.get(related) else {
                continue;
            };

            path.push(related);
            let nested = Self::all_scalars_inner(catalog, related_shape, depth - 1, path);
            path.pop();

            if !nested.is_empty() {
                selection = selection.nested(name.clone(), NestedSelection::new(nested));
            }
        }

        selection
    }
}

impl FromIterator<(String, FieldSelection)> for Selection {
    fn from_iter<T: IntoIterator<Item = (String, FieldSelection)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
