use crate::data::attribute::{
    is_data_marker, parse_attributes, parse_numeric, Attribute, AttributeKind,
};
use crate::error::{Error, Result};
use csv::{ReaderBuilder, Trim};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// One data line, split into raw text fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Trimmed field at `index`, `None` past the end of the row.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|field| field.trim())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Attribute list plus the ordered rows of the data section.
///
/// The last attribute is the target, every preceding one is a predictor.
#[derive(Clone, Debug)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset from already parsed parts, checking the target and row widths.
    ///
    /// # Errors
    ///
    /// [`Error::Schema`] for an unusable attribute list, [`Error::RowWidth`] with the
    /// zero-based row index for a row of the wrong width.
    pub fn new(attributes: Vec<Attribute>, rows: Vec<Row>) -> Result<Self> {
        if attributes.len() < 2 {
            return Err(Error::Schema(
                "at least one predictor and one target attribute are required".into(),
            ));
        }
        if let Some((row, fields)) = rows
            .iter()
            .enumerate()
            .find(|(_, fields)| fields.len() != attributes.len())
        {
            return Err(Error::RowWidth {
                row,
                found: fields.len(),
                expected: attributes.len(),
            });
        }

        let attributes = infer_domains(attributes, &rows)?;
        let dataset = Self { attributes, rows };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parses an ARFF-like document: `@attribute` declarations, then `@data` and the rows.
    ///
    /// Blank lines and `%` comments in the data section are skipped.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let attributes = parse_attributes(lines)?;

        let marker = lines
            .iter()
            .position(|line| is_data_marker(line.as_ref()))
            .ok_or_else(|| Error::parse(lines.len(), "missing @data section"))?;

        let (numbers, data): (Vec<usize>, Vec<&str>) = lines[marker + 1..]
            .iter()
            .map(|line| line.as_ref())
            .enumerate()
            .map(|(offset, line)| (marker + offset + 2, line))
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('%')
            })
            .unzip();

        let text = data.join("\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut rows = Vec::with_capacity(data.len());
        for (position, record) in reader.records().enumerate() {
            let record = record?;
            let number = numbers.get(position).copied().unwrap_or(lines.len());
            if record.len() != attributes.len() {
                return Err(Error::parse(
                    number,
                    format!("row has {} fields, expected {}", record.len(), attributes.len()),
                ));
            }
            rows.push(record.iter().collect::<Row>());
        }

        debug!(
            attributes = attributes.len(),
            rows = rows.len(),
            "parsed dataset"
        );
        Self::new(attributes, rows)
    }

    fn validate(&self) -> Result<()> {
        let target = self.target();
        if target.kind() != AttributeKind::Categorical || target.positive_value().is_none() {
            return Err(Error::Schema(format!(
                "target attribute '{}' must be categorical",
                target.name()
            )));
        }

        for attribute in self
            .predictors()
            .iter()
            .filter(|attribute| attribute.kind() == AttributeKind::Continuous)
        {
            for row in &self.rows {
                parse_numeric(attribute.name(), attribute.field(row)?)?;
            }
        }
        Ok(())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn predictors(&self) -> &[Attribute] {
        &self.attributes[..self.attributes.len() - 1]
    }

    pub fn target(&self) -> &Attribute {
        &self.attributes[self.attributes.len() - 1]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Splits the rows, in file order, into a training block holding the first
    /// `floor(train_size * n)` rows and a test block holding the rest.
    pub fn train_test_split(&self, train_size: f64) -> Result<(&[Row], &[Row])> {
        if !(train_size > 0.0 && train_size < 1.0) {
            return Err(Error::Parameters(
                "train size should be strictly between 0.0 and 1.0".into(),
            ));
        }
        let cut = (self.rows.len() as f64 * train_size).floor() as usize;
        Ok(self.rows.split_at(cut))
    }

    /// Deals the rows into `folds` disjoint folds of `n / folds` rows each, drawn at random
    /// without replacement. Remainder rows are left out.
    pub fn cross_folds<R: Rng + ?Sized>(
        &self,
        folds: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<&Row>>> {
        if folds < 2 {
            return Err(Error::Parameters("cross-fold needs at least 2 folds".into()));
        }
        if folds > self.rows.len() {
            return Err(Error::Parameters(format!(
                "cannot deal {} rows into {} folds",
                self.rows.len(),
                folds
            )));
        }

        let mut indices = (0..self.rows.len()).collect::<Vec<_>>();
        indices.shuffle(rng);

        let per_fold = self.rows.len() / folds;
        Ok(indices
            .chunks_exact(per_fold)
            .take(folds)
            .map(|chunk| chunk.iter().map(|&index| &self.rows[index]).collect())
            .collect())
    }
}

/// Fills the empty domain of `string` attributes with the distinct values seen in the rows.
fn infer_domains(attributes: Vec<Attribute>, rows: &[Row]) -> Result<Vec<Attribute>> {
    attributes
        .into_iter()
        .map(|attribute| {
            if attribute.kind() == AttributeKind::Categorical && attribute.branches().is_empty() {
                let seen = rows
                    .iter()
                    .map(|row| attribute.field(row))
                    .collect::<Result<BTreeSet<&str>>>()?;
                Ok(Attribute::categorical(attribute.name(), attribute.index(), seen))
            } else {
                Ok(attribute)
            }
        })
        .collect()
}
