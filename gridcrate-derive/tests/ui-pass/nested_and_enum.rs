use chrono::{DateTime, Utc};
use gridcrate::{FieldKind, FieldValue, GridEnum, GridRecord};

#[derive(Clone, Copy, GridEnum)]
pub enum Status {
    Open,
    #[grid(rename = "In Progress")]
    InProgress,
    Closed,
}

#[derive(GridRecord)]
pub struct User {
    pub name: String,
}

#[derive(GridRecord)]
pub struct Ticket {
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[grid(nested)]
    pub assignee: Option<User>,
}

fn main() {
    assert_eq!(Status::VARIANTS, &["Open", "In Progress", "Closed"]);
    assert_eq!(Status::InProgress.variant_name(), "In Progress");
    assert_eq!(Status::Closed.ordinal(), 2);

    let registry = Ticket::field_registry();
    let status = registry.resolve("status").unwrap();
    assert_eq!(status.kind(), FieldKind::Enum(Status::VARIANTS));

    let name = registry.resolve("assignee.name").unwrap();
    assert!(name.nullable());
    assert!(!name.declared());

    let ticket = Ticket {
        status: Status::InProgress,
        created_at: Utc::now(),
        assignee: None,
    };
    assert_eq!(name.read(&ticket), FieldValue::Null);
    assert_eq!(
        status.read(&ticket),
        FieldValue::Enum {
            ordinal: 1,
            name: "In Progress"
        }
    );
}
