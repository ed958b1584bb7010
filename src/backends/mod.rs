#[cfg(feature = "llama-server")]
pub mod llama_server;
#[cfg(feature = "openai")]
pub mod openai;
