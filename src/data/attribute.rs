//! Attribute declarations and branch labels.
use crate::data::dataset::Row;
use crate::error::{Error, Result};
use std::fmt;

const ATTRIBUTE_MARKER: &str = "@attribute";
pub(crate) const DATA_MARKER: &str = "@data";

/// Semantic type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    /// Finite set of declared string values.
    Categorical,
    /// Numeric values, split on a discovered threshold.
    Continuous,
}

/// Label of one outgoing edge of a tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Branch {
    Value(String),
    Below(f64),
    AtOrAbove(f64),
}

impl Branch {
    /// Checks whether the field `attribute` reads from `row` falls on this branch.
    pub fn matches(&self, attribute: &Attribute, row: &Row) -> Result<bool> {
        match self {
            Branch::Value(value) => Ok(value == attribute.field(row)?),
            Branch::Below(threshold) => Ok(attribute.numeric(row)? < *threshold),
            Branch::AtOrAbove(threshold) => Ok(attribute.numeric(row)? >= *threshold),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Value(value) => write!(f, "{}", value),
            Branch::Below(threshold) => write!(f, "<{}", threshold),
            Branch::AtOrAbove(threshold) => write!(f, "=>{}", threshold),
        }
    }
}

/// A typed column of the dataset.
///
/// Categorical attributes carry one [`Branch::Value`] per domain value, sorted by text.
/// Continuous attributes carry no branches until [`Attribute::with_threshold`] is called.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    index: usize,
    kind: AttributeKind,
    branches: Vec<Branch>,
}

impl Attribute {
    pub fn categorical<I, S>(name: &str, index: usize, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values: Vec<String> = values
            .into_iter()
            .map(|value| value.as_ref().trim().to_string())
            .collect();
        values.sort();
        values.dedup();

        Self {
            name: name.to_string(),
            index,
            kind: AttributeKind::Categorical,
            branches: values.into_iter().map(Branch::Value).collect(),
        }
    }

    pub fn continuous(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            kind: AttributeKind::Continuous,
            branches: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Domain values of a categorical attribute, in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().filter_map(|branch| match branch {
            Branch::Value(value) => Some(value.as_str()),
            _ => None,
        })
    }

    /// The value treated as the positive class when this attribute is the target.
    pub fn positive_value(&self) -> Option<&str> {
        self.values().last()
    }

    /// Returns a copy carrying the two branches `<threshold` and `=>threshold`.
    pub fn with_threshold(&self, threshold: f64) -> Self {
        Self {
            branches: vec![Branch::Below(threshold), Branch::AtOrAbove(threshold)],
            ..self.clone()
        }
    }

    pub fn threshold(&self) -> Option<f64> {
        match self.branches.first() {
            Some(Branch::Below(threshold)) | Some(Branch::AtOrAbove(threshold)) => {
                Some(*threshold)
            }
            _ => None,
        }
    }

    /// Trimmed raw field of `row` at this attribute's index.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] when the row is too short to hold the field.
    pub fn field<'r>(&self, row: &'r Row) -> Result<&'r str> {
        row.field(self.index).ok_or_else(|| Error::MissingField {
            attribute: self.name.clone(),
            width: row.len(),
        })
    }

    pub fn numeric(&self, row: &Row) -> Result<f64> {
        parse_numeric(&self.name, self.field(row)?)
    }
}

pub(crate) fn parse_numeric(attribute: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| Error::Format {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn is_data_marker(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(DATA_MARKER)
}

/// Parses every `@attribute` declaration found before the data section.
///
/// Indices are assigned in declaration order. Declarations typed `string` yield a
/// categorical attribute with an empty domain; the dataset fills it from the rows.
pub fn parse_attributes<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();

    for (number, line) in lines.iter().map(|line| line.as_ref()).enumerate() {
        if is_data_marker(line) {
            break;
        }
        let comment = line.trim_start().starts_with('%');
        if comment || !line.to_lowercase().contains(ATTRIBUTE_MARKER) {
            continue;
        }
        attributes.push(parse_declaration(line, number + 1, attributes.len())?);
    }

    Ok(attributes)
}

/// Reads one declaration. The first token is the marker, the last one the type keyword
/// and everything in between the name, which may be quoted and contain spaces.
fn parse_declaration(line: &str, number: usize, index: usize) -> Result<Attribute> {
    let (head, domain) = match line.find('{') {
        Some(brace) => (&line[..brace], Some(&line[brace..])),
        None => (line, None),
    };
    let tokens: Vec<&str> = head.split_whitespace().skip(1).collect();

    if let Some(domain) = domain {
        let name = declared_name(&tokens)
            .ok_or_else(|| Error::parse(number, "attribute declaration has no name"))?;
        let values: Vec<&str> = domain
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect();
        if values.is_empty() {
            return Err(Error::parse(
                number,
                format!("attribute '{}' declares an empty domain", name),
            ));
        }
        return Ok(Attribute::categorical(&name, index, values));
    }

    let (keyword, name) = match tokens.split_last() {
        Some((keyword, rest)) => match declared_name(rest) {
            Some(name) => (*keyword, name),
            None => {
                return Err(Error::parse(
                    number,
                    format!("attribute '{}' has no type", keyword),
                ))
            }
        },
        None => return Err(Error::parse(number, "attribute declaration has no name")),
    };

    match keyword.to_lowercase().as_str() {
        "real" | "numeric" | "integer" | "double" | "float" => {
            Ok(Attribute::continuous(&name, index))
        }
        "string" => Ok(Attribute::categorical(&name, index, Vec::<String>::new())),
        other => Err(Error::parse(
            number,
            format!("attribute '{}' has unsupported type '{}'", name, other),
        )),
    }
}

fn declared_name(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let name = tokens.join(" ");
    Some(name.trim_matches(|c| c == '\'' || c == '"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categorical_sorted() {
        let lines = ["@relation weather", "@attribute outlook {sunny, overcast ,rainy}"];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].name(), "outlook");
        assert_eq!(attributes[0].kind(), AttributeKind::Categorical);
        assert_eq!(
            attributes[0].values().collect::<Vec<_>>(),
            vec!["overcast", "rainy", "sunny"]
        );
    }

    #[test]
    fn test_parse_marker_case_insensitive_and_indices() {
        let lines = [
            "@ATTRIBUTE temp\tREAL",
            "@Attribute humidity numeric",
            "@attribute play {yes,no}",
        ];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0].kind(), AttributeKind::Continuous);
        assert!(attributes[0].branches().is_empty());
        assert_eq!(attributes[1].kind(), AttributeKind::Continuous);
        assert_eq!(
            attributes.iter().map(Attribute::index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(attributes[2].positive_value(), Some("yes"));
    }

    #[test]
    fn test_parse_brace_attached_to_name() {
        let lines = ["@attribute Weather{Sunny,Rain}"];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes[0].name(), "Weather");
        assert_eq!(attributes[0].values().collect::<Vec<_>>(), vec!["Rain", "Sunny"]);
    }

    #[test]
    fn test_parse_missing_name() {
        let lines = ["@relation x", "@attribute"];
        let result = parse_attributes(&lines);

        assert!(matches!(result, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_parse_unknown_type() {
        let lines = ["@attribute when date"];

        assert!(matches!(parse_attributes(&lines), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_type_is_last_token() {
        let lines = ["@attribute 'max temp' real", "@attribute play {yes,no}"];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].name(), "max temp");
        assert_eq!(attributes[0].kind(), AttributeKind::Continuous);
        assert_eq!(attributes[1].index(), 1);
    }

    #[test]
    fn test_parse_name_without_type() {
        let lines = ["@attribute temp"];

        assert!(matches!(
            parse_attributes(&lines),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_skips_header_comments() {
        let lines = [
            "% each @attribute line declares a column",
            "@attribute temp real",
            "  % @attribute disabled real",
            "@attribute play {yes,no}",
        ];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].name(), "temp");
        assert_eq!(attributes[1].index(), 1);
    }

    #[test]
    fn test_field_past_end_of_row() {
        let temp = Attribute::continuous("temp", 2);
        let row = Row::new(vec!["a".to_string(), "1".to_string()]);

        assert!(matches!(
            temp.field(&row),
            Err(Error::MissingField { width: 2, .. })
        ));
        assert!(matches!(temp.numeric(&row), Err(Error::MissingField { .. })));
    }

    #[test]
    fn test_parse_stops_at_data_section() {
        let lines = ["@attribute a real", "@data", "@attribute b real"];
        let attributes = parse_attributes(&lines).unwrap();

        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_with_threshold_returns_new_attribute() {
        let temp = Attribute::continuous("temp", 1);
        let split = temp.with_threshold(3.0);

        assert!(temp.branches().is_empty());
        assert_eq!(split.threshold(), Some(3.0));
        assert_eq!(
            split.branches().iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["<3", "=>3"]
        );
    }

    #[test]
    fn test_branch_matches() {
        let temp = Attribute::continuous("temp", 0).with_threshold(2.5);
        let row = Row::new(vec!["2.5".to_string()]);

        assert!(!temp.branches()[0].matches(&temp, &row).unwrap());
        assert!(temp.branches()[1].matches(&temp, &row).unwrap());

        let bad = Row::new(vec!["warm".to_string()]);
        assert!(matches!(
            temp.branches()[0].matches(&temp, &bad),
            Err(Error::Format { .. })
        ));
    }
}
