// Basic chat completion against a local llama.cpp server
use llm_recipes::{
    builder::{LLMBackend, LLMBuilder},
    chat::ChatMessage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    // Get the llama-server URL from environment variable or use default localhost
    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    // Initialize and configure the LLM client
    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .max_tokens(512)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let prompt = "do you know llama.cpp";

    // Create chat completion
    let messages = vec![ChatMessage::user().content(prompt).build()];
    let response = llm.chat(&messages).await?;

    // Extract and print the response
    println!("AI: {}", response.text().unwrap_or_default());

    Ok(())
}
