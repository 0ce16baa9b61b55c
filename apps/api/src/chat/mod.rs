// Maverick assistant chat: free-form career Q&A with conversation history.

pub mod handlers;
pub mod prompts;
