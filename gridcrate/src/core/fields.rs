//! # Field Registry
//!
//! Every grid-queryable record type exposes a [`FieldRegistry`]: a table from field
//! path to a typed getter. Filters, search and sorting resolve their field names
//! against this table instead of inspecting the type at runtime, so an unknown name
//! simply fails to resolve.
//!
//! Nested records are flattened under a dotted prefix (`address.city`). When the
//! nested record is optional and absent, every field below it reads as
//! [`FieldValue::Null`].
//!
//! ```rust,ignore
//! let registry = FieldRegistry::<Ticket>::builder()
//!     .field("title", |ticket: &Ticket| &ticket.title)
//!     .field("priority", |ticket: &Ticket| &ticket.priority)
//!     .nested_optional("assignee", |ticket: &Ticket| ticket.assignee.as_ref())
//!     .build();
//!
//! assert!(registry.resolve("assignee.name").is_some());
//! assert!(registry.resolve("does_not_exist").is_none());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use std::{cmp::Ordering, collections::HashMap, fmt, sync::Arc};
use uuid::Uuid;

use super::traits::{GridRecord, IntoFieldValue};

/// The underlying type of a registered field, with optional wrappers removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Uuid,
    /// Unit enum, matched by variant name. Variants are listed in declaration order.
    Enum(&'static [&'static str]),
}

impl FieldKind {
    /// Whether ordering comparisons (`>`, `<`, `BETWEEN`) are meaningful for this kind.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        !matches!(self, Self::Boolean | Self::Uuid | Self::String)
    }
}

/// A typed value read from a record, or coerced from a filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    Enum { ordinal: usize, name: &'static str },
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two non-null values of compatible kinds.
    ///
    /// Returns `None` when either side is `Null` or the kinds differ. Integers and
    /// floats compare numerically; enums compare by declaration order.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Enum { ordinal: a, .. }, Self::Enum { ordinal: b, .. }) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: `Null` sorts before every value, and values of
    /// incomparable kinds are treated as equal so the sort stays stable.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Date(d) => write!(f, "{d}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Enum { name, .. } => write!(f, "{name}"),
        }
    }
}

/// Type-erased getter reading one field from a record.
pub type Getter<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// One resolvable field of a record type.
pub struct FieldDef<R> {
    path: String,
    kind: FieldKind,
    nullable: bool,
    declared: bool,
    getter: Getter<R>,
}

impl<R> FieldDef<R> {
    /// Dotted path of the field, e.g. `address.city`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field can read as `Null` (an `Option`, or below an optional nested record).
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Read straight from a property of the record: neither nested nor computed.
    #[must_use]
    pub const fn declared(&self) -> bool {
        self.declared
    }

    #[must_use]
    pub fn getter(&self) -> Getter<R> {
        Arc::clone(&self.getter)
    }

    pub fn read(&self, record: &R) -> FieldValue {
        (self.getter)(record)
    }
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind,
            nullable: self.nullable,
            declared: self.declared,
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

/// Field table for one record type. Built once per type, normally through
/// `#[derive(GridRecord)]`.
pub struct FieldRegistry<R> {
    fields: Vec<FieldDef<R>>,
    index: HashMap<String, usize>,
}

impl<R: 'static> FieldRegistry<R> {
    #[must_use]
    pub fn builder() -> FieldRegistryBuilder<R> {
        FieldRegistryBuilder { fields: Vec::new() }
    }

    /// Resolve a dotted field path.
    ///
    /// An exact match wins; otherwise the first field whose path matches ignoring
    /// ASCII case and underscores is returned, so `CreatedAt` finds `created_at`.
    /// Unknown paths return `None`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&FieldDef<R>> {
        if let Some(&idx) = self.index.get(path) {
            return self.fields.get(idx);
        }
        self.fields
            .iter()
            .find(|def| loose_key(&def.path).eq(loose_key(path)))
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields.iter()
    }

    /// Declared `String` fields, the candidates for free-text search.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields
            .iter()
            .filter(|def| def.declared && def.kind == FieldKind::String)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn loose_key(path: &str) -> impl Iterator<Item = char> + '_ {
    path.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
}

impl<R> fmt::Debug for FieldRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|def| &def.path))
            .finish()
    }
}

pub struct FieldRegistryBuilder<R> {
    fields: Vec<FieldDef<R>>,
}

impl<R: 'static> FieldRegistryBuilder<R> {
    /// Register a field read by reference. Kind and nullability come from the
    /// field's type through [`IntoFieldValue`].
    #[must_use]
    pub fn field<V, F>(self, name: &str, getter: F) -> Self
    where
        V: IntoFieldValue + ?Sized,
        F: Fn(&R) -> &V + Send + Sync + 'static,
    {
        self.push(name, V::KIND, V::NULLABLE, true, move |record: &R| {
            getter(record).to_field_value()
        })
    }

    /// Register a field from an arbitrary getter. Filterable and sortable, but
    /// never searched.
    #[must_use]
    pub fn computed<F>(self, name: &str, kind: FieldKind, nullable: bool, getter: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        self.push(name, kind, nullable, false, getter)
    }

    fn push<F>(
        mut self,
        name: &str,
        kind: FieldKind,
        nullable: bool,
        declared: bool,
        getter: F,
    ) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        self.fields.push(FieldDef {
            path: name.to_owned(),
            kind,
            nullable,
            declared,
            getter: Arc::new(getter),
        });
        self
    }

    /// Flatten the fields of a nested record under `name.`.
    #[must_use]
    pub fn nested<N, F>(self, name: &str, project: F) -> Self
    where
        N: GridRecord,
        F: Fn(&R) -> &N + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        self.flatten::<N, _>(name, false, move |read| {
            let project = Arc::clone(&project);
            let getter: Getter<R> = Arc::new(move |record: &R| read(project(record)));
            getter
        })
    }

    /// Flatten the fields of an optional nested record under `name.`. Every
    /// flattened field becomes nullable.
    #[must_use]
    pub fn nested_optional<N, F>(self, name: &str, project: F) -> Self
    where
        N: GridRecord,
        F: Fn(&R) -> Option<&N> + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        self.flatten::<N, _>(name, true, move |read| {
            let project = Arc::clone(&project);
            let getter: Getter<R> = Arc::new(move |record: &R| {
                project(record).map_or(FieldValue::Null, |nested| read(nested))
            });
            getter
        })
    }

    fn flatten<N, W>(mut self, prefix: &str, optional: bool, wrap: W) -> Self
    where
        N: GridRecord,
        W: Fn(Getter<N>) -> Getter<R>,
    {
        for inner in N::field_registry().fields() {
            self.fields.push(FieldDef {
                path: format!("{prefix}.{}", inner.path),
                kind: inner.kind,
                nullable: optional || inner.nullable,
                declared: false,
                getter: wrap(inner.getter()),
            });
        }
        self
    }

    /// Finish the registry. A later registration of the same path shadows an earlier one.
    #[must_use]
    pub fn build(self) -> FieldRegistry<R> {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.path.clone(), idx))
            .collect();
        FieldRegistry {
            fields: self.fields,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    struct Address {
        city: String,
        zip: Option<i32>,
    }

    impl GridRecord for Address {
        fn field_registry() -> &'static FieldRegistry<Self> {
            static REGISTRY: OnceLock<FieldRegistry<Address>> = OnceLock::new();
            REGISTRY.get_or_init(|| {
                FieldRegistry::builder()
                    .field("city", |a: &Address| &a.city)
                    .field("zip", |a: &Address| &a.zip)
                    .build()
            })
        }
    }

    struct Customer {
        name: String,
        age: u32,
        home: Address,
        billing: Option<Address>,
    }

    fn registry() -> FieldRegistry<Customer> {
        FieldRegistry::builder()
            .field("name", |c: &Customer| &c.name)
            .field("age", |c: &Customer| &c.age)
            .nested("home", |c: &Customer| &c.home)
            .nested_optional("billing", |c: &Customer| c.billing.as_ref())
            .build()
    }

    fn customer() -> Customer {
        Customer {
            name: "Ada".into(),
            age: 36,
            home: Address {
                city: "London".into(),
                zip: None,
            },
            billing: None,
        }
    }

    #[test]
    fn test_resolve_top_level_and_nested() {
        let registry = registry();
        assert_eq!(registry.resolve("name").map(FieldDef::kind), Some(FieldKind::String));
        assert_eq!(registry.resolve("age").map(FieldDef::kind), Some(FieldKind::Integer));
        assert_eq!(
            registry.resolve("home.city").map(FieldDef::kind),
            Some(FieldKind::String)
        );
        assert!(registry.resolve("home").is_none());
        assert!(registry.resolve("home.street").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_resolve_ignores_ascii_case_and_underscores() {
        let registry = registry();
        assert_eq!(registry.resolve("Home.City").map(FieldDef::path), Some("home.city"));
        assert_eq!(registry.resolve("NA_ME").map(FieldDef::path), Some("name"));
        assert!(registry.resolve("home_city").is_none());
    }

    #[test]
    fn test_nullability_follows_optional_wrappers() {
        let registry = registry();
        assert!(!registry.resolve("name").is_some_and(FieldDef::nullable));
        assert!(registry.resolve("home.zip").is_some_and(FieldDef::nullable));
        assert!(!registry.resolve("home.city").is_some_and(FieldDef::nullable));
        assert!(registry.resolve("billing.city").is_some_and(FieldDef::nullable));
    }

    #[test]
    fn test_missing_optional_nested_reads_null() {
        let registry = registry();
        let customer = customer();
        let city = registry.resolve("billing.city").map(|def| def.read(&customer));
        assert_eq!(city, Some(FieldValue::Null));
        let home = registry.resolve("home.city").map(|def| def.read(&customer));
        assert_eq!(home, Some(FieldValue::String("London".into())));
    }

    #[test]
    fn test_searchable_fields_are_declared_strings() {
        let registry = registry();
        let names: Vec<&str> = registry.searchable_fields().map(FieldDef::path).collect();
        assert_eq!(names, vec!["name"]);

        let with_computed = FieldRegistry::builder()
            .field("name", |c: &Customer| &c.name)
            .computed("label", FieldKind::String, false, |c: &Customer| {
                FieldValue::String(format!("{} ({})", c.name, c.age))
            })
            .build();
        let names: Vec<&str> = with_computed.searchable_fields().map(FieldDef::path).collect();
        assert_eq!(names, vec!["name"]);
        assert!(!with_computed.resolve("label").is_some_and(FieldDef::declared));
        assert_eq!(
            with_computed.resolve("label").map(|def| def.read(&customer())),
            Some(FieldValue::String("Ada (36)".into()))
        );
    }

    #[test]
    fn test_sort_cmp_puts_null_first() {
        assert_eq!(FieldValue::Null.sort_cmp(&FieldValue::Integer(1)), Ordering::Less);
        assert_eq!(FieldValue::Integer(1).sort_cmp(&FieldValue::Null), Ordering::Greater);
        assert_eq!(
            FieldValue::Integer(2).sort_cmp(&FieldValue::Float(1.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_enum_values_compare_by_ordinal() {
        let low = FieldValue::Enum { ordinal: 0, name: "Low" };
        let high = FieldValue::Enum { ordinal: 2, name: "High" };
        assert_eq!(low.compare(&high), Some(Ordering::Less));
    }
}
