use std::marker::PhantomData;

use sea_orm::{
    ColumnTrait, Condition, EntityName, EntityTrait, IdenStatic, Iterable, Value,
    sea_query::{Alias, ColumnType, Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{
    core::FieldValue,
    filtering::{CompareOp, Predicate, PredicateVisitor, TextOp},
};

/// Escape LIKE wildcards to prevent wildcard injection attacks
/// Escapes: % (match any) and _ (match single char)
pub(crate) fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Find the column of `E` a field path refers to.
///
/// Exact column names win; otherwise names match ignoring ASCII case and
/// underscores, so `createdAt` finds `created_at`. Dotted paths into nested records
/// have no column on the entity's table and resolve to `None`.
#[must_use]
pub fn resolve_column<E: EntityTrait>(field: &str) -> Option<E::Column> {
    if field.contains('.') {
        tracing::debug!(field, "Nested field has no column on this table");
        return None;
    }
    let normalized = normalize_column_name(field);
    let column = E::Column::iter()
        .find(|column| column.as_str() == field)
        .or_else(|| {
            E::Column::iter().find(|column| normalize_column_name(column.as_str()) == normalized)
        });
    if column.is_none() {
        tracing::debug!(field, entity = %E::default().table_name(), "Field has no matching column");
    }
    column
}

fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Translate a predicate into a condition on entity `E`.
///
/// Parts naming fields without a column are skipped; `None` when nothing applies.
#[must_use]
pub fn build_condition<E: EntityTrait>(predicate: &Predicate) -> Option<Condition> {
    predicate.accept(&mut ConditionBuilder::<E>::new())
}

/// Builds Sea-ORM conditions from a [`Predicate`].
///
/// Enums compare by variant name, so the stored string must equal the name the
/// record registry reports.
pub struct ConditionBuilder<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntityTrait> ConditionBuilder<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E: EntityTrait> Default for ConditionBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn column_expr<E: EntityTrait>(column: E::Column) -> Expr {
    Expr::col((E::default(), column))
}

/// Bind a field value the way the column stores it. Naive date-time columns get a
/// naive UTC value so text comparisons line up on `SQLite`.
fn to_db_value(value: &FieldValue, column_type: &ColumnType) -> Value {
    match value {
        FieldValue::Null => Value::String(None),
        FieldValue::String(s) => s.clone().into(),
        FieldValue::Integer(i) => (*i).into(),
        FieldValue::Float(f) => (*f).into(),
        FieldValue::Boolean(b) => (*b).into(),
        FieldValue::DateTime(dt) => match column_type {
            ColumnType::DateTime | ColumnType::Timestamp => dt.naive_utc().into(),
            _ => (*dt).into(),
        },
        FieldValue::Date(d) => (*d).into(),
        FieldValue::Uuid(u) => (*u).into(),
        FieldValue::Enum { name, .. } => (*name).to_owned().into(),
    }
}

fn char_len(needle: &str) -> i32 {
    i32::try_from(needle.chars().count()).unwrap_or(i32::MAX)
}

/// `replace(col, needle, '')`: differs from the column exactly when it contains
/// `needle` with the same case.
fn without_needle<E: EntityTrait>(column: E::Column, needle: &str) -> Expr {
    Expr::expr(
        Func::cust(Alias::new("replace"))
            .arg(column_expr::<E>(column))
            .arg(needle.to_owned())
            .arg(""),
    )
}

/// `substr(col, 1, n)` for a needle of `n` characters.
fn prefix_of<E: EntityTrait>(column: E::Column, needle: &str) -> Expr {
    Expr::expr(
        Func::cust(Alias::new("substr"))
            .arg(column_expr::<E>(column))
            .arg(1_i32)
            .arg(char_len(needle)),
    )
}

/// `substr(col, length(col) - n + 1)`. Only meaningful once a LIKE suffix match
/// has ensured the column is at least `n` characters long.
fn suffix_of<E: EntityTrait>(column: E::Column, needle: &str) -> Expr {
    let start = Expr::expr(Func::cust(Alias::new("length")).arg(column_expr::<E>(column)))
        .sub(char_len(needle) - 1);
    Expr::expr(
        Func::cust(Alias::new("substr"))
            .arg(column_expr::<E>(column))
            .arg(start),
    )
}

fn leaf(expr: SimpleExpr) -> Option<Condition> {
    Some(Condition::all().add(expr))
}

impl<E: EntityTrait> PredicateVisitor for ConditionBuilder<E> {
    type Output = Option<Condition>;

    fn visit_constant(&mut self, value: bool) -> Self::Output {
        leaf(SimpleExpr::Custom(if value { "1 = 1" } else { "1 = 0" }.to_string()))
    }

    fn visit_compare(&mut self, field: &str, op: CompareOp, value: &FieldValue) -> Self::Output {
        let column = resolve_column::<E>(field)?;
        let value = to_db_value(value, column.def().get_column_type());
        let col = column_expr::<E>(column);
        leaf(match op {
            CompareOp::Eq => col.eq(value),
            CompareOp::Ne => col.ne(value),
            CompareOp::Gt => col.gt(value),
            CompareOp::Gte => col.gte(value),
            CompareOp::Lt => col.lt(value),
            CompareOp::Lte => col.lte(value),
        })
    }

    fn visit_text(
        &mut self,
        field: &str,
        op: TextOp,
        value: &str,
        case_sensitive: bool,
    ) -> Self::Output {
        let column = resolve_column::<E>(field)?;
        let (lhs, needle) = if case_sensitive {
            (column_expr::<E>(column), value.to_owned())
        } else {
            (
                Expr::expr(Func::lower(column_expr::<E>(column))),
                value.to_lowercase(),
            )
        };
        let escaped = escape_like_wildcards(&needle);
        let like = |pattern: String| LikeExpr::new(pattern).escape('\\');
        let not_null = Condition::all().add(column_expr::<E>(column).is_not_null());

        // SQLite's LIKE ignores ASCII case, so case-sensitive matches add an exact check.
        let exact = case_sensitive && !needle.is_empty();
        if exact && op == TextOp::NotContains {
            let unchanged = without_needle::<E>(column, &needle).eq(column_expr::<E>(column));
            return Some(not_null.add(unchanged));
        }

        let matched = match op {
            TextOp::Contains => lhs.like(like(format!("%{escaped}%"))),
            TextOp::NotContains => lhs.not_like(like(format!("%{escaped}%"))),
            TextOp::StartsWith => lhs.like(like(format!("{escaped}%"))),
            TextOp::EndsWith => lhs.like(like(format!("%{escaped}"))),
            TextOp::Equals => lhs.eq(needle.clone()),
            TextOp::NotEquals => lhs.ne(needle.clone()),
        };
        let condition = not_null.add(matched);
        if !exact {
            return Some(condition);
        }
        Some(match op {
            TextOp::Contains => condition.add(
                without_needle::<E>(column, &needle).ne(column_expr::<E>(column)),
            ),
            TextOp::StartsWith => condition.add(prefix_of::<E>(column, &needle).eq(needle)),
            TextOp::EndsWith => condition.add(suffix_of::<E>(column, &needle).eq(needle)),
            _ => condition,
        })
    }

    fn visit_null(&mut self, field: &str, is_null: bool) -> Self::Output {
        let column = resolve_column::<E>(field)?;
        let col = column_expr::<E>(column);
        leaf(if is_null { col.is_null() } else { col.is_not_null() })
    }

    fn visit_all(&mut self, parts: Vec<Self::Output>) -> Self::Output {
        combine(Condition::all(), parts)
    }

    fn visit_any(&mut self, parts: Vec<Self::Output>) -> Self::Output {
        combine(Condition::any(), parts)
    }
}

fn combine(base: Condition, parts: Vec<Option<Condition>>) -> Option<Condition> {
    let mut parts: Vec<Condition> = parts.into_iter().flatten().collect();
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(parts.into_iter().fold(base, Condition::add)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryFilter, QueryTrait, entity::prelude::*};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub body: Option<String>,
        pub created_at: DateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    fn sql(predicate: &Predicate) -> String {
        let select = Entity::find();
        let select = match build_condition::<Entity>(predicate) {
            Some(condition) => select.filter(condition),
            None => select,
        };
        select.build(DbBackend::Sqlite).to_string()
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like_wildcards("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_resolve_column_variants() {
        assert!(matches!(resolve_column::<Entity>("title"), Some(Column::Title)));
        assert!(matches!(resolve_column::<Entity>("createdAt"), Some(Column::CreatedAt)));
        assert!(matches!(resolve_column::<Entity>("CREATED_AT"), Some(Column::CreatedAt)));
        assert!(resolve_column::<Entity>("author.name").is_none());
        assert!(resolve_column::<Entity>("missing").is_none());
    }

    #[test]
    fn test_case_insensitive_contains_uses_lower() {
        let sql = sql(&Predicate::Text {
            field: "title".into(),
            op: TextOp::Contains,
            value: "50%".into(),
            case_sensitive: false,
        });
        assert!(sql.contains(r#"LOWER("notes"."title") LIKE '%50"#), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
        assert!(sql.contains(r#""notes"."title" IS NOT NULL"#), "{sql}");
    }

    fn text(op: TextOp, value: &str, case_sensitive: bool) -> Predicate {
        Predicate::Text {
            field: "title".into(),
            op,
            value: value.into(),
            case_sensitive,
        }
    }

    #[test]
    fn test_case_sensitive_text_adds_exact_check() {
        let contains = sql(&text(TextOp::Contains, "Bug", true));
        assert!(contains.contains(r#""notes"."title" LIKE '%Bug%'"#), "{contains}");
        assert!(contains.contains(r#"replace("notes"."title", 'Bug', '') <> "notes"."title""#), "{contains}");
        assert!(!contains.contains("LOWER"), "{contains}");

        let not_contains = sql(&text(TextOp::NotContains, "Bug", true));
        assert!(not_contains.contains(r#"replace("notes"."title", 'Bug', '') = "notes"."title""#), "{not_contains}");
        assert!(!not_contains.contains("LIKE"), "{not_contains}");

        let starts = sql(&text(TextOp::StartsWith, "Bug", true));
        assert!(starts.contains(r#"substr("notes"."title", 1, 3) = 'Bug'"#), "{starts}");

        let ends = sql(&text(TextOp::EndsWith, "Bug", true));
        assert!(ends.contains(r#"length("notes"."title") - 2"#), "{ends}");
    }

    #[test]
    fn test_case_sensitive_empty_needle_is_plain_like() {
        let sql = sql(&text(TextOp::Contains, "", true));
        assert!(sql.contains("LIKE '%%'"), "{sql}");
        assert!(!sql.contains("replace"), "{sql}");
    }

    #[test]
    fn test_or_group_and_dropped_parts() {
        let sql = sql(&Predicate::Any(vec![
            Predicate::Null { field: "body".into(), is_null: true },
            Predicate::Null { field: "author.name".into(), is_null: true },
            Predicate::Compare {
                field: "id".into(),
                op: CompareOp::Gte,
                value: FieldValue::Integer(3),
            },
        ]));
        assert!(sql.contains(r#""notes"."body" IS NULL"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains(r#""notes"."id" >= 3"#), "{sql}");
        assert!(!sql.contains("author"), "{sql}");
    }

    #[test]
    fn test_nothing_applicable_yields_no_condition() {
        let predicate = Predicate::Null { field: "missing".into(), is_null: false };
        assert!(build_condition::<Entity>(&predicate).is_none());
    }

    #[test]
    fn test_constant_false() {
        assert!(sql(&Predicate::Constant(false)).contains("1 = 0"));
    }
}
