#![allow(dead_code)]

use gridcrate::GridRecord;

#[derive(GridRecord)]
pub struct Wrapper<T> {
    pub inner: T,
}

fn main() {}
