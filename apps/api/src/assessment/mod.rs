// Assessment engine: MCQ generation, coding challenges, code evaluation,
// and local grading with profile effects (points, progress, skill levels).
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod scoring;
