// Dashboard insights: ideal skills for a target role and job-description
// analysis against the user's skill profile. Both are TTL-cached.

pub mod analysis;
pub mod handlers;
pub mod prompts;
