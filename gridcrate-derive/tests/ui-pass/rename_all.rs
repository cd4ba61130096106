use gridcrate::{GridEnum, GridRecord};

#[derive(GridEnum)]
#[grid(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    VeryHigh,
}

#[derive(GridRecord)]
#[grid(rename_all = "camelCase")]
pub struct Ticket {
    pub created_by: String,
    #[grid(rename = "kind")]
    pub r#type: String,
    pub priority_level: Priority,
}

fn main() {
    assert_eq!(Priority::VARIANTS, &["LOW", "VERY_HIGH"]);
    assert_eq!(Priority::VeryHigh.variant_name(), "VERY_HIGH");

    let registry = Ticket::field_registry();
    assert!(registry.resolve("createdBy").is_some());
    assert!(registry.resolve("priorityLevel").is_some());
    assert!(registry.resolve("kind").is_some());
    assert_eq!(registry.resolve("created_by").unwrap().path(), "createdBy");
    assert!(registry.resolve("type").is_none());
}
