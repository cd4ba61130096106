use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use super::fields::{FieldKind, FieldRegistry, FieldValue};

/// A record type that can be filtered, searched, sorted and paginated by grid state.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(GridRecord)]
/// pub struct Ticket {
///     pub title: String,
///     pub status: Status,
///     pub created_at: DateTime<Utc>,
///     #[grid(nested)]
///     pub assignee: Option<User>,
///     #[grid(skip)]
///     pub attachments: Vec<Attachment>,
/// }
/// ```
pub trait GridRecord: Sized + 'static {
    /// The field table of this type, built once and shared.
    fn field_registry() -> &'static FieldRegistry<Self>;
}

/// A unit enum whose variants are matched by name in filters.
pub trait GridEnum: Sized + 'static {
    /// Variant names in declaration order.
    const VARIANTS: &'static [&'static str];

    fn variant_name(&self) -> &'static str;

    /// Position of this variant in [`GridEnum::VARIANTS`].
    fn ordinal(&self) -> usize {
        let name = self.variant_name();
        Self::VARIANTS
            .iter()
            .position(|variant| *variant == name)
            .unwrap_or_default()
    }

    /// This variant as a [`FieldValue::Enum`].
    fn field_value(&self) -> FieldValue {
        FieldValue::Enum {
            ordinal: self.ordinal(),
            name: self.variant_name(),
        }
    }
}

/// Conversion of a field's Rust type into a [`FieldValue`].
///
/// Implemented for the scalar types the grid understands and for `Option<T>` of
/// each. `#[derive(GridEnum)]` implements it for enums.
pub trait IntoFieldValue {
    const KIND: FieldKind;
    const NULLABLE: bool = false;

    fn to_field_value(&self) -> FieldValue;
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, IntoFieldValue::to_field_value)
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Box<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = T::NULLABLE;

    fn to_field_value(&self) -> FieldValue {
        self.as_ref().to_field_value()
    }
}

impl IntoFieldValue for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

macro_rules! impl_integer_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::from(*self))
                }
            }
        )+
    };
}

impl_integer_field!(i8, i16, i32, i64, u8, u16, u32);

// Values above i64::MAX saturate.
macro_rules! impl_wide_integer_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::try_from(*self).unwrap_or(i64::MAX))
                }
            }
        )+
    };
}

impl_wide_integer_field!(u64, usize, isize);

impl IntoFieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }
}

impl IntoFieldValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl IntoFieldValue for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl IntoFieldValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl IntoFieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(self.and_utc())
    }
}

impl IntoFieldValue for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }
}

impl IntoFieldValue for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}
