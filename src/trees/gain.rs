//! Entropy and gain scores used to pick the splitting attribute.
//!
//! The gain computed here is `1 - Σ proportion(v) * entropy(v)`. Textbook information
//! gain subtracts the weighted entropy from the entropy of the parent subset instead of
//! from `1`; the trees built by this crate depend on the former, so it must not be
//! "corrected".
use crate::data::attribute::{Attribute, AttributeKind};
use crate::data::dataset::Row;
use crate::error::{Error, Result};
use std::cmp::Ordering;
use tracing::trace;

/// Entropy of one partition together with its share of the parent subset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEntropy {
    pub entropy: f64,
    pub proportion: f64,
}

impl WeightedEntropy {
    pub fn weighted(&self) -> f64 {
        self.entropy * self.proportion
    }
}

/// A scored splitting attribute. Continuous attributes come back with their threshold
/// branches attached.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub attribute: Attribute,
    pub gain: f64,
}

/// Two-class entropy (natural log) of a partition with `positive` hits out of `count` rows.
///
/// Pure and empty partitions have entropy 0.
pub fn entropy(positive: usize, count: usize) -> f64 {
    if positive == 0 || positive >= count {
        return 0.0;
    }
    let p = positive as f64 / count as f64;
    -(p * p.ln()) - (1.0 - p) * (1.0 - p).ln()
}

/// Scores the rows of `subset` against the positive class of `target`.
pub fn weighted_entropy<'r, I>(
    subset: I,
    total: usize,
    target: &Attribute,
) -> Result<WeightedEntropy>
where
    I: IntoIterator<Item = &'r Row>,
{
    let positive = target.positive_value().unwrap_or_default();
    let (mut count, mut hits) = (0, 0);
    for row in subset {
        count += 1;
        if target.field(row)? == positive {
            hits += 1;
        }
    }

    Ok(WeightedEntropy {
        entropy: entropy(hits, count),
        proportion: if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        },
    })
}

pub fn categorical_gain(attribute: &Attribute, target: &Attribute, rows: &[&Row]) -> Result<f64> {
    let mut weighted = 0.0;
    for value in attribute.values() {
        let mut subset = Vec::new();
        for &row in rows {
            if attribute.field(row)? == value {
                subset.push(row);
            }
        }
        weighted += weighted_entropy(subset, rows.len(), target)?.weighted();
    }
    Ok(1.0 - weighted)
}

/// Searches the distinct values of a continuous attribute for the best binary split.
///
/// Each distinct value `t` is tried as the partition `{< t, >= t}`; partitions with an
/// empty side are skipped. Both orientations of a threshold score the same partition,
/// so `< t` is always the one kept and the branches come out as `<t`, `=>t`.
/// Returns `None` when no threshold has a positive gain.
pub fn continuous_candidate(
    attribute: &Attribute,
    target: &Attribute,
    rows: &[&Row],
) -> Result<Option<Candidate>> {
    let keyed = rows
        .iter()
        .map(|&row| Ok((attribute.numeric(row)?, row)))
        .collect::<Result<Vec<(f64, &Row)>>>()?;

    let mut best: Option<(f64, f64)> = None;
    for threshold in distinct_sorted(keyed.iter().map(|&(value, _)| value)) {
        let (below, above): (Vec<_>, Vec<_>) =
            keyed.iter().partition(|&&(value, _)| value < threshold);
        if below.is_empty() || above.is_empty() {
            continue;
        }

        let weighted = weighted_entropy(below.iter().map(|&&(_, row)| row), rows.len(), target)?
            .weighted()
            + weighted_entropy(above.iter().map(|&&(_, row)| row), rows.len(), target)?
                .weighted();
        let gain = 1.0 - weighted;
        trace!(attribute = attribute.name(), threshold, gain, "threshold scored");

        if gain > 0.0 && best.map_or(true, |(_, best_gain)| gain > best_gain) {
            best = Some((threshold, gain));
        }
    }

    Ok(best.map(|(threshold, gain)| Candidate {
        attribute: attribute.with_threshold(threshold),
        gain,
    }))
}

/// Picks the attribute with the strictly largest gain; the first one wins ties.
///
/// When no attribute yields a candidate (every remaining attribute is continuous with a
/// single observed value) the first attribute is returned anyway so the recursion keeps
/// consuming attributes. A continuous fallback is split at its smallest observed value.
pub fn best_attribute(
    attributes: &[Attribute],
    target: &Attribute,
    rows: &[&Row],
) -> Result<Attribute> {
    let mut best: Option<Candidate> = None;

    for attribute in attributes {
        let candidate = match attribute.kind() {
            AttributeKind::Categorical => Some(Candidate {
                attribute: attribute.clone(),
                gain: categorical_gain(attribute, target, rows)?,
            }),
            AttributeKind::Continuous => continuous_candidate(attribute, target, rows)?,
        };

        if let Some(candidate) = candidate {
            trace!(
                attribute = attribute.name(),
                gain = candidate.gain,
                "candidate scored"
            );
            if best
                .as_ref()
                .map_or(true, |best| candidate.gain > best.gain)
            {
                best = Some(candidate);
            }
        }
    }

    if let Some(best) = best {
        return Ok(best.attribute);
    }

    let first = attributes
        .first()
        .ok_or_else(|| Error::Parameters("no attributes left to split on".into()))?;
    match first.kind() {
        AttributeKind::Categorical => Ok(first.clone()),
        AttributeKind::Continuous => {
            let values = rows
                .iter()
                .map(|row| first.numeric(row))
                .collect::<Result<Vec<_>>>()?;
            Ok(distinct_sorted(values)
                .first()
                .map_or_else(|| first.clone(), |&lowest| first.with_threshold(lowest)))
        }
    }
}

fn distinct_sorted<I: IntoIterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();
    values
}
