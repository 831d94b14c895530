//! SQLite database module for the Zap Shift engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
