// Admin talent scouting: given a target role description, the LLM picks the
// best-fitting employees out of the stored user base.

pub mod handlers;
pub mod prompts;
pub mod scout;
