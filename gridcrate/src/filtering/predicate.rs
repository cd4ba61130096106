//! Backend-neutral filter AST.
//!
//! The expression and search builders produce a [`Predicate`]; each backend walks it
//! with a [`PredicateVisitor`]. The in-memory backend compiles it into closures, the
//! Sea-ORM backend into a `Condition`. Field references are resolved paths and
//! values are already coerced to the field's kind.

use std::cmp::Ordering;

use crate::core::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    #[must_use]
    pub const fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
}

impl TextOp {
    /// Apply to an already-normalized haystack and needle.
    #[must_use]
    pub fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Contains => haystack.contains(needle),
            Self::NotContains => !haystack.contains(needle),
            Self::StartsWith => haystack.starts_with(needle),
            Self::EndsWith => haystack.ends_with(needle),
            Self::Equals => haystack == needle,
            Self::NotEquals => haystack != needle,
        }
    }
}

/// A filter condition over one record.
///
/// A null field value never satisfies `Compare` or `Text`; only `Null` selects it.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Constant(bool),
    Compare {
        field: String,
        op: CompareOp,
        value: FieldValue,
    },
    Text {
        field: String,
        op: TextOp,
        value: String,
        case_sensitive: bool,
    },
    Null {
        field: String,
        is_null: bool,
    },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction of `parts`; `None` when empty, the part itself when single.
    #[must_use]
    pub fn all(mut parts: Vec<Self>) -> Option<Self> {
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self::All(parts)),
        }
    }

    /// Disjunction of `parts`; `None` when empty, the part itself when single.
    #[must_use]
    pub fn any(mut parts: Vec<Self>) -> Option<Self> {
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self::Any(parts)),
        }
    }

    pub fn accept<V: PredicateVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Constant(value) => visitor.visit_constant(*value),
            Self::Compare { field, op, value } => visitor.visit_compare(field, *op, value),
            Self::Text {
                field,
                op,
                value,
                case_sensitive,
            } => visitor.visit_text(field, *op, value, *case_sensitive),
            Self::Null { field, is_null } => visitor.visit_null(field, *is_null),
            Self::All(parts) => {
                let parts = parts.iter().map(|part| part.accept(visitor)).collect();
                visitor.visit_all(parts)
            }
            Self::Any(parts) => {
                let parts = parts.iter().map(|part| part.accept(visitor)).collect();
                visitor.visit_any(parts)
            }
        }
    }

    /// Field paths referenced anywhere in the tree.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Constant(_) => {}
            Self::Compare { field, .. } | Self::Text { field, .. } | Self::Null { field, .. } => {
                out.push(field);
            }
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_fields(out);
                }
            }
        }
    }
}

/// Walks a [`Predicate`] bottom-up, one method per node kind.
pub trait PredicateVisitor {
    type Output;

    fn visit_constant(&mut self, value: bool) -> Self::Output;
    fn visit_compare(&mut self, field: &str, op: CompareOp, value: &FieldValue) -> Self::Output;
    fn visit_text(
        &mut self,
        field: &str,
        op: TextOp,
        value: &str,
        case_sensitive: bool,
    ) -> Self::Output;
    fn visit_null(&mut self, field: &str, is_null: bool) -> Self::Output;
    fn visit_all(&mut self, parts: Vec<Self::Output>) -> Self::Output;
    fn visit_any(&mut self, parts: Vec<Self::Output>) -> Self::Output;
}
