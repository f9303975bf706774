pub mod client;

pub use client::{RentPage, SeoulRentClient};
