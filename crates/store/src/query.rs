//! Document-store query filters.
//!
//! Callers describe what they want as an ordered list of typed [`Filter`]
//! criteria on logical field names; [`QueryFilter::render`] translates them
//! into the backend's SQL-like predicate joined by `AND`, in insertion
//! order, with no deduplication.
//!
//! The logical-name → backend-property translation is a fixed table, and so
//! is each field's predicate shape: most fields are scalar, but a
//! multi-valued field such as `role` renders as `ANY leos:collaborators IN
//! (…)` instead of a plain `IN`. Adding another special-cased field is a
//! table entry, not renderer code.

use leda_core::CoreError;

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// Predicate shape of a backend property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredicateShape {
    /// Single-valued property: `prop = 'v'`, `prop IN (…)`, `prop < 'v'`.
    Scalar,
    /// Multi-valued property: quantified membership, `ANY prop IN (…)`.
    MultiValued,
}

struct FieldSpec {
    property: &'static str,
    shape: PredicateShape,
}

/// Logical field names accepted in filters, with their backend properties.
/// An unmapped name is a programming error and fails the whole render.
const FIELD_TABLE: &[(&str, FieldSpec)] = &[
    ("docType", FieldSpec { property: "metadata:docType", shape: PredicateShape::Scalar }),
    ("language", FieldSpec { property: "leos:language", shape: PredicateShape::Scalar }),
    ("ref", FieldSpec { property: "metadata:ref", shape: PredicateShape::Scalar }),
    ("versionLabel", FieldSpec { property: "leos:versionLabel", shape: PredicateShape::Scalar }),
    ("versionType", FieldSpec { property: "leos:versionType", shape: PredicateShape::Scalar }),
    ("cmisVersionLabel", FieldSpec { property: "cmis:versionLabel", shape: PredicateShape::Scalar }),
    ("category", FieldSpec { property: "metadata:category", shape: PredicateShape::Scalar }),
    ("role", FieldSpec { property: "leos:collaborators", shape: PredicateShape::MultiValued }),
];

fn lookup(field: &str) -> Result<&'static FieldSpec, CoreError> {
    FIELD_TABLE
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, spec)| spec)
        .ok_or_else(|| CoreError::UnknownQueryField(field.to_string()))
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Comparison operator of a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    LessThan,
    GreaterThan,
    In,
}

/// One criterion: a logical field, an operator, and its literal value(s).
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    /// When set, the rendered clause is wrapped as
    /// `(prop IS NULL OR clause)`.
    pub null_check: bool,
    pub values: Vec<String>,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Equal,
            null_check: false,
            values: vec![value.into()],
        }
    }

    pub fn in_list(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::In,
            null_check: false,
            values,
        }
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::LessThan,
            null_check: false,
            values: vec![value.into()],
        }
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::GreaterThan,
            null_check: false,
            values: vec![value.into()],
        }
    }

    pub fn with_null_check(mut self) -> Self {
        self.null_check = true;
        self
    }

    fn render(&self) -> Result<String, CoreError> {
        let spec = lookup(&self.field)?;
        if self.values.is_empty() {
            return Err(CoreError::Validation(format!(
                "filter on {} has no values",
                self.field
            )));
        }

        let prop = spec.property;
        let clause = match (spec.shape, self.operator) {
            // Multi-valued properties always use quantified membership,
            // whichever operator the caller picked.
            (PredicateShape::MultiValued, _) => {
                format!("ANY {prop} IN ({})", quoted_list(&self.values))
            }
            (PredicateShape::Scalar, Operator::In) => {
                format!("{prop} IN ({})", quoted_list(&self.values))
            }
            (PredicateShape::Scalar, Operator::Equal) => {
                format!("{prop} = '{}'", self.values[0])
            }
            (PredicateShape::Scalar, Operator::LessThan) => {
                format!("{prop} < '{}'", self.values[0])
            }
            (PredicateShape::Scalar, Operator::GreaterThan) => {
                format!("{prop} > '{}'", self.values[0])
            }
        };

        if self.null_check {
            Ok(format!("({prop} IS NULL OR {clause})"))
        } else {
            Ok(clause)
        }
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// QueryFilter
// ---------------------------------------------------------------------------

/// An ordered set of filters, built fresh per query request and consumed
/// once by the renderer.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    filters: Vec<Filter>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, filter: Filter) -> Self {
        self.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Render all filters into one predicate string joined by `AND`.
    ///
    /// An empty filter set renders to the empty string; the caller is
    /// responsible for omitting the `WHERE` keyword in that case.
    pub fn render(&self) -> Result<String, CoreError> {
        let clauses = self
            .filters
            .iter()
            .map(Filter::render)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clauses.join(" AND "))
    }
}
