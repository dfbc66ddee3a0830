pub mod config;
pub mod import;
pub mod roster;
pub mod store;

pub use import::{CommitTarget, ImportSession, ImportState};
pub use roster::{parse_roster, validate, ImportError, ParseError, ParsedClassData, Student};
pub use store::{ClassRecord, ClassStore, JsonFileStore, MemoryStore, NewClass};
