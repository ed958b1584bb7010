// Concurrent execution of independent chat requests against one provider.
//
// The requests share a single client; there is no coordination between them
// beyond joining the results.
use llm_recipes::{
    builder::{LLMBackend, LLMBuilder},
    chat::{ChatMessage, ChatProvider},
    error::LLMError,
};

async fn process_prompt<P: ChatProvider + ?Sized>(
    llm: &P,
    prompt: &str,
    label: &str,
) -> Result<(String, String, String), LLMError> {
    let messages = vec![ChatMessage::user().content(prompt).build()];
    let response = llm.chat(&messages).await?;
    Ok((
        label.to_string(),
        prompt.to_string(),
        response.text().unwrap_or_default(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .max_tokens(1024)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let q1 = "Hi there, how are you?";
    let q2 = "How much is 6+6?";

    // Process both prompts concurrently
    let (r1, r2) = tokio::try_join!(
        process_prompt(llm.as_ref(), q1, "Q1"),
        process_prompt(llm.as_ref(), q2, "Q2"),
    )?;

    for (label, prompt, answer) in [r1, r2] {
        println!("[{label}] User: {prompt}");
        println!("[{label}] AI: {answer}\n");
    }

    Ok(())
}
