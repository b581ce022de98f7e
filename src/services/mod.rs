pub mod background;
pub mod clipboard;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod runtime;
pub mod settings;
pub mod storage;
