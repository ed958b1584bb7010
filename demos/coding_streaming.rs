// Streaming chat completion: print tokens as they arrive, keep the full text
use futures::StreamExt;
use llm_recipes::{
    builder::{LLMBackend, LLMBuilder},
    chat::ChatMessage,
};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .max_tokens(2000)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let q1 = "What is hoisting in JavaScript? Explain with examples.";
    let messages = vec![ChatMessage::user().content(q1).build()];

    print!("\nAI: ");
    io::stdout().flush()?;

    let mut full_response = String::new();
    match llm.chat_stream(&messages).await {
        Ok(mut stream) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(token) => {
                        handle.write_all(token.as_bytes())?;
                        handle.flush()?;
                        full_response.push_str(&token);
                    }
                    Err(e) => eprintln!("Stream error: {e}"),
                }
            }
        }
        Err(e) => eprintln!("Chat stream error: {e}"),
    }

    println!("\n\nFinal answer:\n{full_response}");

    Ok(())
}
