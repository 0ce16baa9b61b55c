// Learning platform: AI course suggestions, course content resolution
// (external link → curated module text → AI-generated), summaries, and
// admin-curated content CRUD.

pub mod courses;
pub mod handlers;
pub mod prompts;
