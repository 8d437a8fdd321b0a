// Shared test helpers (umya workbook builders, etc.)
#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "umya")]
mod create;
