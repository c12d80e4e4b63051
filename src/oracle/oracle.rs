use std::fmt;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::{Record, RecordId};

/// One result set to cross-check, tagged with the strategy/backend
/// combination that produced it. Identifiers are extracted and sorted at
/// construction so comparison ignores presentation order.
#[derive(Debug, Clone)]
pub struct LabeledRun {
    label: String,
    ids: Vec<RecordId>,
}

impl LabeledRun {
    pub fn new(label: impl Into<String>, results: &[&Record]) -> Self {
        let mut ids: Vec<RecordId> = results.iter().map(|record| record.id).collect();
        ids.sort_unstable();
        LabeledRun {
            label: label.into(),
            ids,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivergenceKind {
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
    IdMismatch {
        position: usize,
        expected: RecordId,
        actual: RecordId,
    },
}

/// A semantic disagreement between two runs of the same filter. Always a
/// logic bug in an engine or backend; never reconciled here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub reference: String,
    pub diverging: String,
    pub kind: DivergenceKind,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            DivergenceKind::LengthMismatch { expected, actual } => write!(
                f,
                "{} returned {} results, {} returned {}",
                self.reference, expected, self.diverging, actual
            ),
            DivergenceKind::IdMismatch {
                position,
                expected,
                actual,
            } => write!(
                f,
                "{} and {} diverge at position {}: {:?} != {:?}",
                self.reference, self.diverging, position, expected, actual
            ),
        }
    }
}

impl From<Divergence> for Error {
    fn from(divergence: Divergence) -> Self {
        Error::new(ErrorKind::ValidationDivergence, divergence.to_string())
    }
}

/// Cross-checks result sets produced for the same filter by different
/// strategy/backend combinations. Not part of the query path.
pub struct ResultOracle;

impl ResultOracle {
    /// Compare every run against the first. Returns the agreed result
    /// count, or the first divergence found, naming the diverging run.
    pub fn validate(runs: &[LabeledRun]) -> Result<usize, Divergence> {
        let Some((reference, rest)) = runs.split_first() else {
            return Ok(0);
        };

        for run in rest {
            if run.ids.len() != reference.ids.len() {
                return Err(Divergence {
                    reference: reference.label.clone(),
                    diverging: run.label.clone(),
                    kind: DivergenceKind::LengthMismatch {
                        expected: reference.ids.len(),
                        actual: run.ids.len(),
                    },
                });
            }
            for (position, (expected, actual)) in
                reference.ids.iter().zip(run.ids.iter()).enumerate()
            {
                if expected != actual {
                    return Err(Divergence {
                        reference: reference.label.clone(),
                        diverging: run.label.clone(),
                        kind: DivergenceKind::IdMismatch {
                            position,
                            expected: *expected,
                            actual: *actual,
                        },
                    });
                }
            }
        }

        Ok(reference.ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Record;

    fn record(id: u64) -> Record {
        Record::new(RecordId(id), "ACTIVE", "Warszawa", "DHL")
    }

    #[test]
    fn agreeing_runs_validate() {
        let r1 = record(1);
        let r2 = record(2);

        // Same set, different presentation order.
        let runs = vec![
            LabeledRun::new("intersection/list", &[&r1, &r2]),
            LabeledRun::new("iterative/set", &[&r2, &r1]),
        ];
        assert_eq!(ResultOracle::validate(&runs), Ok(2));
    }

    #[test]
    fn length_mismatch_names_the_diverging_run() {
        let r1 = record(1);
        let r2 = record(2);

        let runs = vec![
            LabeledRun::new("intersection/list", &[&r1, &r2]),
            LabeledRun::new("iterative/marker-map", &[&r1]),
        ];
        let divergence = ResultOracle::validate(&runs).unwrap_err();
        assert_eq!(divergence.diverging, "iterative/marker-map");
        assert_eq!(
            divergence.kind,
            DivergenceKind::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn positional_mismatch_reports_both_ids() {
        let r1 = record(1);
        let r2 = record(2);
        let r3 = record(3);

        let runs = vec![
            LabeledRun::new("intersection/list", &[&r1, &r2]),
            LabeledRun::new("intersection/set", &[&r1, &r3]),
        ];
        let divergence = ResultOracle::validate(&runs).unwrap_err();
        assert_eq!(
            divergence.kind,
            DivergenceKind::IdMismatch {
                position: 1,
                expected: RecordId(2),
                actual: RecordId(3),
            }
        );
    }

    #[test]
    fn divergence_converts_to_validation_error() {
        let divergence = Divergence {
            reference: "intersection/list".to_string(),
            diverging: "iterative/set".to_string(),
            kind: DivergenceKind::LengthMismatch {
                expected: 3,
                actual: 0,
            },
        };
        let error: Error = divergence.into();
        assert_eq!(error.kind, ErrorKind::ValidationDivergence);
    }

    #[test]
    fn no_runs_is_vacuously_valid() {
        assert_eq!(ResultOracle::validate(&[]), Ok(0));
    }
}
