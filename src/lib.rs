// Lectern: multi-metric evaluation of generated READMEs
//
// This is the library root. Each analyzer lives in its own module; the
// pipeline module fans a document pair out to all of them and assembles the
// report.

pub mod config;
pub mod entities;
pub mod generate;
pub mod judge;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod readability;
pub mod similarity;
pub mod text;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
