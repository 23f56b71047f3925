use indexmap::IndexMap;

/// Operator groups a scalar filter exposes, each a superset of the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFamily {
    Equality,
    Ordered,
    Text,
    Json,
}

/// How the operand of a filter operator is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `true` / `false` flag, e.g. `isNull`.
    Flag,
    /// The scalar itself.
    Value,
    /// A list of the scalar.
    List,
    /// A plain string regardless of the scalar, e.g. `like` patterns or JSON keys.
    Text,
}

const EQUALITY_OPERATORS: &[(&str, Operand, &str)] = &[
    ("isNull", Operand::Flag, "Is null (if `true` is specified) or is not null (if `false` is specified)."),
    ("equalTo", Operand::Value, "Equal to the specified value."),
    ("notEqualTo", Operand::Value, "Not equal to the specified value."),
    ("distinctFrom", Operand::Value, "Not equal to the specified value, treating null like an ordinary value."),
    ("notDistinctFrom", Operand::Value, "Equal to the specified value, treating null like an ordinary value."),
    ("in", Operand::List, "Included in the specified list."),
    ("notIn", Operand::List, "Not included in the specified list."),
];

const ORDERED_OPERATORS: &[(&str, Operand, &str)] = &[
    ("lessThan", Operand::Value, "Less than the specified value."),
    ("lessThanOrEqualTo", Operand::Value, "Less than or equal to the specified value."),
    ("greaterThan", Operand::Value, "Greater than the specified value."),
    ("greaterThanOrEqualTo", Operand::Value, "Greater than or equal to the specified value."),
];

const TEXT_OPERATORS: &[(&str, Operand, &str)] = &[
    ("includes", Operand::Value, "Contains the specified string (case-sensitive)."),
    ("notIncludes", Operand::Value, "Does not contain the specified string (case-sensitive)."),
    ("includesInsensitive", Operand::Value, "Contains the specified string (case-insensitive)."),
    ("startsWith", Operand::Value, "Starts with the specified string (case-sensitive)."),
    ("endsWith", Operand::Value, "Ends with the specified string (case-sensitive)."),
    ("like", Operand::Text, "Matches the specified pattern (case-sensitive)."),
    ("likeInsensitive", Operand::Text, "Matches the specified pattern (case-insensitive)."),
];

const JSON_OPERATORS: &[(&str, Operand, &str)] = &[
    ("contains", Operand::Value, "Contains the specified JSON."),
    ("containedBy", Operand::Value, "Contained by the specified JSON."),
    ("containsKey", Operand::Text, "Contains the specified key."),
];

impl FilterFamily {
    /// Operators as `(name, operand, description)`, in emission order.
    pub fn operators(self) -> impl Iterator<Item = (&'static str, Operand, &'static str)> {
        let extra: &[&[(&str, Operand, &str)]] = match self {
            FilterFamily::Equality => &[],
            FilterFamily::Ordered => &[ORDERED_OPERATORS],
            FilterFamily::Text => &[ORDERED_OPERATORS, TEXT_OPERATORS],
            FilterFamily::Json => &[JSON_OPERATORS],
        };

        EQUALITY_OPERATORS
            .iter()
            .chain(extra.iter().flat_map(|operators| operators.iter()))
            .copied()
    }
}

/// A built-in wire scalar: its TypeScript type and the filter it is matched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarInfo {
    pub name: &'static str,
    pub ts_type: &'static str,
    pub filter: Option<ScalarFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarFilter {
    pub name: &'static str,
    pub family: FilterFamily,
}

const fn scalar(name: &'static str, ts_type: &'static str, filter: &'static str, family: FilterFamily) -> ScalarInfo {
    ScalarInfo {
        name,
        ts_type,
        filter: Some(ScalarFilter { name: filter, family }),
    }
}

static SCALARS: &[ScalarInfo] = &[
    scalar("String", "string", "StringFilter", FilterFamily::Text),
    scalar("ID", "string", "IDFilter", FilterFamily::Ordered),
    scalar("Int", "number", "IntFilter", FilterFamily::Ordered),
    scalar("Float", "number", "FloatFilter", FilterFamily::Ordered),
    scalar("Boolean", "boolean", "BooleanFilter", FilterFamily::Equality),
    scalar("UUID", "string", "UUIDFilter", FilterFamily::Ordered),
    scalar("Datetime", "string", "DatetimeFilter", FilterFamily::Ordered),
    // some backends spell it with a capital T
    scalar("DateTime", "string", "DatetimeFilter", FilterFamily::Ordered),
    scalar("Date", "string", "DateFilter", FilterFamily::Ordered),
    scalar("Time", "string", "TimeFilter", FilterFamily::Ordered),
    scalar("BigInt", "string", "BigIntFilter", FilterFamily::Ordered),
    scalar("BigFloat", "string", "BigFloatFilter", FilterFamily::Ordered),
    scalar("JSON", "unknown", "JSONFilter", FilterFamily::Json),
    ScalarInfo {
        name: "Cursor",
        ts_type: "string",
        filter: None,
    },
];

/// Names of every built-in scalar.
pub fn builtin_scalar_names() -> impl Iterator<Item = &'static str> {
    SCALARS.iter().map(|info| info.name)
}

/// Maps wire scalar names to TypeScript primitives and filter types.
///
/// Configured overrides take precedence over the built-in table and never
/// carry a filter.
#[derive(Debug, Clone, Default)]
pub struct ScalarMap {
    overrides: IndexMap<String, String>,
}

impl ScalarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: IndexMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn builtin(name: &str) -> Option<&'static ScalarInfo> {
        SCALARS.iter().find(|info| info.name == name)
    }

    /// The TypeScript type for a wire scalar, if it is known.
    pub fn ts_type(&self, name: &str) -> Option<&str> {
        match self.overrides.get(name) {
            Some(ts_type) => Some(ts_type),
            None => Self::builtin(name).map(|info| info.ts_type),
        }
    }

    pub fn filter(&self, name: &str) -> Option<ScalarFilter> {
        if self.overrides.contains_key(name) {
            return None;
        }

        Self::builtin(name).and_then(|info| info.filter)
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        self.overrides.contains_key(name) || Self::builtin(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("String", Some("string"), Some("StringFilter"))]
    #[case("Int", Some("number"), Some("IntFilter"))]
    #[case("Boolean", Some("boolean"), Some("BooleanFilter"))]
    #[case("DateTime", Some("string"), Some("DatetimeFilter"))]
    #[case("JSON", Some("unknown"), Some("JSONFilter"))]
    #[case("Cursor", Some("string"), None)]
    #[case("GeoPoint", None, None)]
    fn builtin_table(#[case] name: &str, #[case] ts_type: Option<&str>, #[case] filter: Option<&str>) {
        let map = ScalarMap::new();

        assert_eq!(map.ts_type(name), ts_type);
        assert_eq!(map.filter(name).map(|filter| filter.name), filter);
    }

    #[test]
    fn overrides_win_and_drop_the_filter() {
        let map = ScalarMap::with_overrides(IndexMap::from([
            ("BigInt".to_owned(), "bigint".to_owned()),
            ("GeoPoint".to_owned(), "{ lat: number; lng: number }".to_owned()),
        ]));

        assert_eq!(map.ts_type("BigInt"), Some("bigint"));
        assert_eq!(map.filter("BigInt"), None);
        assert!(map.is_scalar("GeoPoint"));
        assert!(!ScalarMap::new().is_scalar("GeoPoint"));
    }

    #[test]
    fn operator_families_nest() {
        let names = |family: FilterFamily| family.operators().map(|(name, ..)| name).collect::<Vec<_>>();

        assert_eq!(names(FilterFamily::Equality).len(), 7);
        assert!(names(FilterFamily::Ordered).contains(&"lessThan"));
        assert!(names(FilterFamily::Text).contains(&"greaterThan"));
        assert!(names(FilterFamily::Text).contains(&"likeInsensitive"));
        assert!(!names(FilterFamily::Json).contains(&"lessThan"));
        assert!(names(FilterFamily::Json).contains(&"containsKey"));
    }
}
