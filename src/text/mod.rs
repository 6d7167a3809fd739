// Text preprocessing shared by the lexical analyzers.

pub mod normalize;
