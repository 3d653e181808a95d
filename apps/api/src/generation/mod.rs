// Product generation pipeline: prompt building, the generation-service call,
// record extraction, persistence, and the detached render kick-off.
// All model calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod prompts;
