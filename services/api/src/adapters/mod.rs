pub mod completion_llm;
pub mod db;
pub mod tts;

pub use completion_llm::OpenAiCompletionAdapter;
pub use db::DbAdapter;
pub use tts::OpenAiTtsAdapter;
