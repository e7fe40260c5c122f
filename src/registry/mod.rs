//! Registry data model
//!
//! This module describes what the registry sends and what the harvester
//! keeps:
//! - The fixed column vocabulary of a tool record
//! - Record normalization into rectangular rows
//! - Page decoding and the opaque "next page" cursor
//! - The accumulated collection table

mod page;
mod query;
mod record;
mod table;

pub use page::RegistryPage;
pub use query::{page_url, PageCursor};
pub use record::{clean_text, is_empty_value, json_kind, normalize, Column, Row};
pub use table::CollectionTable;
