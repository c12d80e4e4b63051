use std::fmt;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::schema::{Field, Schema};

/// Sentinel name for the control run, accepted by [`Filter::from_named`].
pub const CONTROL_RUN: &str = "control-run";

/// The OR side of a clause: one value, or any of several values from the
/// same field's domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Values {
    One(String),
    Any(Vec<String>),
}

impl Values {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Values::One(value) => std::slice::from_ref(value),
            Values::Any(values) => values,
        }
    }
}

/// Clause target. Filters built through the typed API always carry a
/// `Field`; `Unknown` only appears for external input whose field name
/// did not resolve, and evaluates to the empty set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Field(Field),
    Unknown(String),
}

/// One ANDed clause: a target field and the ORed values for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub target: Target,
    pub values: Values,
}

/// A conjunctive-disjunctive predicate: AND over clauses, each clause an
/// OR over values of one field. `Control` is the fixed baseline predicate
/// used to measure engine overhead independent of filter shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Control,
    Where(Vec<Clause>),
}

impl Filter {
    pub fn new() -> Self {
        Filter::Where(Vec::new())
    }

    pub fn control() -> Self {
        Filter::Control
    }

    pub fn with(self, field: Field, value: impl Into<String>) -> Self {
        self.push(field, Values::One(value.into()))
    }

    pub fn with_any<I, V>(self, field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.push(
            field,
            Values::Any(values.into_iter().map(Into::into).collect()),
        )
    }

    fn push(self, field: Field, values: Values) -> Self {
        let mut clauses = match self {
            Filter::Where(clauses) => clauses,
            Filter::Control => Vec::new(),
        };
        clauses.push(Clause {
            target: Target::Field(field),
            values,
        });
        Filter::Where(clauses)
    }

    /// Build from externally supplied field names. Unknown names are kept
    /// as `Target::Unknown` so evaluation can degrade to empty results
    /// instead of erroring. The control sentinel name yields `Control`.
    pub fn from_named<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Values)>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if let Some((name, _)) = pairs.peek() {
            if name.as_str() == CONTROL_RUN {
                return Filter::Control;
            }
        }
        Filter::Where(
            pairs
                .map(|(name, values)| Clause {
                    target: match Field::parse(&name) {
                        Some(field) => Target::Field(field),
                        None => Target::Unknown(name),
                    },
                    values,
                })
                .collect(),
        )
    }

    pub fn clauses(&self) -> &[Clause] {
        match self {
            Filter::Where(clauses) => clauses,
            Filter::Control => &[],
        }
    }

    /// Opt-in strict check for callers that want malformed filters
    /// surfaced up front. Evaluation itself never requires this; unknown
    /// targets and out-of-domain values fail soft there.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for clause in self.clauses() {
            let field = match &clause.target {
                Target::Field(field) => *field,
                Target::Unknown(name) => {
                    return Err(Error::new(
                        ErrorKind::UnknownFilterTarget,
                        format!("filter references unknown field {:?}", name),
                    ));
                }
            };
            for value in clause.values.as_slice() {
                if !schema.contains(field, value) {
                    return Err(Error::new(
                        ErrorKind::UnknownFilterTarget,
                        format!(
                            "filter value {:?} is not in the {} domain",
                            value,
                            field.name()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::new()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Filter::Control => write!(f, "{}", CONTROL_RUN),
            Filter::Where(clauses) => {
                write!(f, "{{")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &clause.target {
                        Target::Field(field) => write!(f, "{}: ", field.name())?,
                        Target::Unknown(name) => write!(f, "{}: ", name)?,
                    }
                    match &clause.values {
                        Values::One(value) => write!(f, "{}", value)?,
                        Values::Any(values) => write!(f, "[{}]", values.join(", "))?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}
