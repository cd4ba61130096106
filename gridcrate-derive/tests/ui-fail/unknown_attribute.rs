#![allow(dead_code)]

use gridcrate::GridRecord;

#[derive(GridRecord)]
pub struct Ticket {
    #[grid(sortable)]
    pub title: String,
}

fn main() {}
