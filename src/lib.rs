//! Text statistics, AI sentiment classification and summaries, with a local
//! history that can be exported to CSV, Markdown or Google Sheets.

pub mod analysis;
pub mod config;
pub mod export;
pub mod input;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod storage;
pub mod utils;
