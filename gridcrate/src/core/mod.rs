pub mod fields;
pub mod traits;

pub use fields::{FieldDef, FieldKind, FieldRegistry, FieldRegistryBuilder, FieldValue, Getter};
pub use traits::{GridEnum, GridRecord, IntoFieldValue};
