use crate::{
    config::GridConfig,
    core::{FieldDef, FieldKind, GridRecord},
    models::{FilterDescriptor, FilterGroup, FilterLogic, FilterOperator},
};

use super::{
    coercion::coerce_value,
    predicate::{CompareOp, Predicate, TextOp},
};

/// Build the predicate for one filter against record type `R`.
///
/// Returns `None` (the filter is ignored) when the descriptor is inert, its field
/// does not resolve, its value does not convert to the field's type, or the
/// operator makes no sense for that type. Never panics on bad input.
#[must_use]
pub fn build_filter_predicate<R: GridRecord>(filter: &FilterDescriptor) -> Option<Predicate> {
    build_filter_predicate_with::<R>(filter, &GridConfig::default())
}

/// [`build_filter_predicate`] with explicit limits.
#[must_use]
pub fn build_filter_predicate_with<R: GridRecord>(
    filter: &FilterDescriptor,
    config: &GridConfig,
) -> Option<Predicate> {
    if filter.is_inert() {
        tracing::debug!(field = %filter.field, operator = ?filter.operator, "Skipping filter without value");
        return None;
    }
    if !config.is_valid_field_path(&filter.field) {
        tracing::debug!(field = %filter.field, "Dropping filter with invalid field path");
        return None;
    }
    let Some(def) = R::field_registry().resolve(&filter.field) else {
        tracing::debug!(field = %filter.field, "Dropping filter on unknown field");
        return None;
    };

    let predicate = if filter.operator.is_null_check() {
        Some(null_check(def, filter.operator == FilterOperator::IsNull))
    } else if def.kind() == FieldKind::String {
        string_predicate(def, filter, config)
    } else {
        typed_predicate(def, filter)
    };

    if predicate.is_none() {
        tracing::debug!(
            field = %filter.field,
            operator = ?filter.operator,
            kind = ?def.kind(),
            "Dropping filter: value does not convert or operator does not apply"
        );
    }
    predicate
}

/// Build the predicate for a group, combining members with the group's logic.
///
/// Dropped members are skipped. A group with no surviving member yields `None`.
#[must_use]
pub fn build_group_predicate<R: GridRecord>(group: &FilterGroup) -> Option<Predicate> {
    build_group_predicate_with::<R>(group, &GridConfig::default())
}

#[must_use]
pub fn build_group_predicate_with<R: GridRecord>(
    group: &FilterGroup,
    config: &GridConfig,
) -> Option<Predicate> {
    let parts: Vec<Predicate> = group
        .filters
        .iter()
        .filter_map(|filter| build_filter_predicate_with::<R>(filter, config))
        .chain(
            group
                .groups
                .iter()
                .filter_map(|nested| build_group_predicate_with::<R>(nested, config)),
        )
        .collect();

    match group.logic {
        FilterLogic::And => Predicate::all(parts),
        FilterLogic::Or => Predicate::any(parts),
    }
}

/// AND of every filter and group in a state. `None` when nothing survives.
#[must_use]
pub fn build_state_predicate<R: GridRecord>(
    filters: &[FilterDescriptor],
    groups: &[FilterGroup],
    config: &GridConfig,
) -> Option<Predicate> {
    let parts = filters
        .iter()
        .filter_map(|filter| build_filter_predicate_with::<R>(filter, config))
        .chain(
            groups
                .iter()
                .filter_map(|group| build_group_predicate_with::<R>(group, config)),
        )
        .collect();
    Predicate::all(parts)
}

/// A field that cannot hold null resolves `IsNull` to a constant.
fn null_check<R>(def: &FieldDef<R>, is_null: bool) -> Predicate {
    if def.nullable() {
        Predicate::Null {
            field: def.path().to_owned(),
            is_null,
        }
    } else {
        Predicate::Constant(!is_null)
    }
}

fn string_predicate<R>(
    def: &FieldDef<R>,
    filter: &FilterDescriptor,
    config: &GridConfig,
) -> Option<Predicate> {
    let op = match filter.operator {
        FilterOperator::Contains => TextOp::Contains,
        FilterOperator::NotContains => TextOp::NotContains,
        FilterOperator::StartsWith => TextOp::StartsWith,
        FilterOperator::EndsWith => TextOp::EndsWith,
        FilterOperator::Equals => TextOp::Equals,
        FilterOperator::NotEquals => TextOp::NotEquals,
        _ => return None,
    };
    let value = coerce_value(filter.value.as_ref()?, FieldKind::String)?;
    let value = value.as_str()?;
    if !config.is_valid_field_value(value) {
        return None;
    }

    Some(Predicate::Text {
        field: def.path().to_owned(),
        op,
        value: if filter.case_sensitive {
            value.to_owned()
        } else {
            value.to_lowercase()
        },
        case_sensitive: filter.case_sensitive,
    })
}

fn typed_predicate<R>(def: &FieldDef<R>, filter: &FilterDescriptor) -> Option<Predicate> {
    let kind = def.kind();
    let op = match filter.operator {
        FilterOperator::Equals => CompareOp::Eq,
        FilterOperator::NotEquals => CompareOp::Ne,
        FilterOperator::GreaterThan if kind.is_ordered() => CompareOp::Gt,
        FilterOperator::GreaterThanOrEqual if kind.is_ordered() => CompareOp::Gte,
        FilterOperator::LessThan if kind.is_ordered() => CompareOp::Lt,
        FilterOperator::LessThanOrEqual if kind.is_ordered() => CompareOp::Lte,
        FilterOperator::Between if kind.is_ordered() => {
            let low = coerce_value(filter.value.as_ref()?, kind)?;
            let high = coerce_value(filter.second_value.as_ref()?, kind)?;
            let field = def.path();
            return Some(Predicate::All(vec![
                Predicate::Compare {
                    field: field.to_owned(),
                    op: CompareOp::Gte,
                    value: low,
                },
                Predicate::Compare {
                    field: field.to_owned(),
                    op: CompareOp::Lte,
                    value: high,
                },
            ]));
        }
        _ => return None,
    };

    Some(Predicate::Compare {
        field: def.path().to_owned(),
        op,
        value: coerce_value(filter.value.as_ref()?, kind)?,
    })
}
