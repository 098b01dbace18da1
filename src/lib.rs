// hows-seoul: content-based place recommendations for Seoul tourism data
//
// This is the library root. Each module corresponds to one stage of the
// recommendation flow: load the catalog, build similarity matrices, rank,
// then enrich and display the results.

pub mod catalog;
pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod output;
pub mod recommend;
pub mod similarity;
pub mod status;
