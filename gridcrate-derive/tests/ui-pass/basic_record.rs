use gridcrate::{FieldKind, FieldValue, GridRecord};

#[derive(GridRecord)]
pub struct Ticket {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    #[grid(skip)]
    pub attachments: Vec<String>,
}

fn main() {
    let registry = Ticket::field_registry();
    assert_eq!(registry.len(), 4);
    assert!(registry.resolve("attachments").is_none());

    let title = registry.resolve("title").unwrap();
    assert_eq!(title.kind(), FieldKind::String);
    assert!(!title.nullable());
    assert!(registry.resolve("description").unwrap().nullable());

    let ticket = Ticket {
        id: 7,
        title: "Printer jam".into(),
        description: None,
        done: false,
        attachments: Vec::new(),
    };
    assert_eq!(registry.resolve("id").unwrap().read(&ticket), FieldValue::Integer(7));
    assert_eq!(registry.resolve("description").unwrap().read(&ticket), FieldValue::Null);
    assert_eq!(registry.searchable_fields().count(), 2);
}
