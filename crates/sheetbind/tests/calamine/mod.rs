// Shared test helpers (umya workbook builders, etc.)
#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "calamine")]
mod dates;
#[cfg(feature = "calamine")]
mod reading;
