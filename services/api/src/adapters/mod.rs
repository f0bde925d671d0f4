pub mod openai_llm;
pub mod storage;
pub mod template_llm;

pub use openai_llm::OpenAiContentAdapter;
pub use storage::{FileStore, MemoryStore};
pub use template_llm::TemplateContentAdapter;
