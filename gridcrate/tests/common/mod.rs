#![allow(dead_code)]

use chrono::{DateTime, Utc};
use gridcrate::{GridEnum, GridRecord};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing_subscriber::EnvFilter;

pub mod ticket_entity;

/// 2024-01-01T00:00:00Z
const BASE_TIMESTAMP: i64 = 1_704_067_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, GridEnum)]
pub enum Status {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, GridRecord)]
pub struct User {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, GridRecord)]
pub struct Ticket {
    pub id: i32,
    pub title: String,
    pub status: Status,
    pub priority: i32,
    pub estimate: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[grid(nested)]
    pub assignee: Option<User>,
    #[grid(skip)]
    pub tags: Vec<String>,
}

/// Show the translator's drop logs in failing tests. `RUST_LOG` overrides the
/// default `gridcrate=debug`.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridcrate=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// 25 tickets: even ids are `Open` (13), odd ids `Closed` (12). `created_at` grows
/// one hour per id in whole seconds; every third ticket mentions the printer.
pub fn sample_tickets() -> Vec<Ticket> {
    init_test_logging();
    (0..25)
        .map(|i: i32| Ticket {
            id: i,
            title: if i % 3 == 0 {
                format!("Printer jam #{i}")
            } else {
                format!("Ticket #{i}")
            },
            status: if i % 2 == 0 {
                Status::Open
            } else {
                Status::Closed
            },
            priority: i % 5,
            estimate: (i % 4 != 0).then(|| f64::from(i) * 0.5),
            created_at: DateTime::from_timestamp(BASE_TIMESTAMP + i64::from(i) * 3600, 0)
                .unwrap(),
            assignee: (i % 2 == 0).then(|| User {
                name: if i % 4 == 0 { "Ada" } else { "Grace" }.to_owned(),
            }),
            tags: vec!["support".to_owned()],
        })
        .collect()
}

pub fn ids<'a>(rows: impl IntoIterator<Item = &'a Ticket>) -> Vec<i32> {
    rows.into_iter().map(|ticket| ticket.id).collect()
}

pub fn to_model(ticket: &Ticket) -> ticket_entity::Model {
    ticket_entity::Model {
        id: ticket.id,
        title: ticket.title.clone(),
        status: ticket.status.variant_name().to_owned(),
        priority: ticket.priority,
        estimate: ticket.estimate,
        created_at: ticket.created_at,
    }
}

/// In-memory SQLite with the `tickets` table holding [`sample_tickets`].
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_test_logging();
    let db = Database::connect("sqlite::memory:").await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(ticket_entity::Entity)))
        .await?;

    let rows = sample_tickets()
        .iter()
        .map(to_model)
        .map(|model| ticket_entity::ActiveModel {
            id: Set(model.id),
            title: Set(model.title),
            status: Set(model.status),
            priority: Set(model.priority),
            estimate: Set(model.estimate),
            created_at: Set(model.created_at),
        })
        .collect::<Vec<_>>();
    ticket_entity::Entity::insert_many(rows).exec(&db).await?;

    Ok(db)
}
