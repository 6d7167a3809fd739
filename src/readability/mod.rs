// Readability: standard ease/complexity indices computed per document.

pub mod analyzer;
pub mod formulas;
