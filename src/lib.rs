pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod scraper;
pub mod source;
pub mod workbook;
