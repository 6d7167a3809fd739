// AI judge: rubric scoring by an external LLM.
//
// Transport failures and unparseable replies both end up as an `{error, raw}`
// object in the report; neither aborts an evaluation.

pub mod analyzer;
pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod rate_limiter;
pub mod retry;
pub mod rubric;
pub mod traits;
