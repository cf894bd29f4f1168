pub mod db;
pub mod models;
pub mod month;

pub use rusqlite;
