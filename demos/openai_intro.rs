// Tour of the remote OpenAI API: basics, system prompts, temperature,
// multi-turn context, streaming, token usage, and model comparison.
//
// Requires OPENAI_API_KEY in the environment or in the secret store
// (~/.llm-recipes/secrets.json).
use futures::StreamExt;
use llm_recipes::{
    builder::{LLMBackend, LLMBuilder},
    chat::ChatMessage,
    error::LLMError,
    LLMProvider,
};
use std::io::{self, Write};

fn client(model: &str) -> Result<Box<dyn LLMProvider>, LLMError> {
    LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model(model)
        .build()
}

async fn basic_completion() -> Result<(), LLMError> {
    println!("--- Example 1: Basic Chat Completion ---");

    let llm = client("gpt-4o")?;
    let messages = vec![ChatMessage::user().content("What is llama.cpp?").build()];
    let response = llm.chat(&messages).await?;

    println!("AI: {}\n", response.text().unwrap_or_default());
    Ok(())
}

async fn system_prompt_example() -> Result<(), LLMError> {
    println!("--- Example 2: System Prompts (Behavioral Control) ---");

    let llm = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model("gpt-4o")
        .system("You are a coding assistant that talks like a pirate.")
        .build()?;

    let messages = vec![ChatMessage::user()
        .content("Explain what async/await does in Rust.")
        .build()];
    let response = llm.chat(&messages).await?;

    println!("AI: {}\n", response.text().unwrap_or_default());
    Ok(())
}

async fn temperature_example() -> Result<(), LLMError> {
    println!("--- Example 3: Temperature Control ---");

    let prompt = "Write a one-sentence tagline for a coffee shop.";
    let messages = vec![ChatMessage::user().content(prompt).build()];

    // Low temperature = more focused and deterministic
    let focused = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model("gpt-4o")
        .temperature(0.2)
        .build()?;

    // High temperature = more creative and varied
    let creative = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model("gpt-4o")
        .temperature(1.5)
        .build()?;

    let focused_response = focused.chat(&messages).await?;
    let creative_response = creative.chat(&messages).await?;

    println!("Low temp (0.2): {}", focused_response.text().unwrap_or_default());
    println!("High temp (1.5): {}\n", creative_response.text().unwrap_or_default());
    Ok(())
}

async fn conversation_context() -> Result<(), LLMError> {
    println!("--- Example 4: Multi-turn Conversation ---");

    let llm = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model("gpt-4o")
        .system("You are a helpful coding tutor.")
        .build()?;

    // Build conversation history
    let mut messages = vec![ChatMessage::user()
        .content("What is a future in Rust?")
        .build()];

    let response1 = llm.chat(&messages).await?;
    println!("User: What is a future in Rust?");
    println!("AI: {}", response1.text().unwrap_or_default());

    // Add the reply to the history, then ask a follow-up with context
    messages.push(
        ChatMessage::assistant()
            .content(response1.text().unwrap_or_default())
            .build(),
    );
    messages.push(
        ChatMessage::user()
            .content("Can you show me a simple example?")
            .build(),
    );

    let response2 = llm.chat(&messages).await?;
    println!("\nUser: Can you show me a simple example?");
    println!("AI: {}\n", response2.text().unwrap_or_default());
    Ok(())
}

async fn streaming_example() -> Result<(), LLMError> {
    println!("--- Example 5: Streaming Response ---");
    print!("AI: ");

    let llm = client("gpt-4o")?;
    let messages = vec![ChatMessage::user()
        .content("Write a haiku about programming.")
        .build()];

    let mut stream = llm.chat_stream(&messages).await?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    while let Some(Ok(token)) = stream.next().await {
        handle.write_all(token.as_bytes()).map_err(LLMError::from)?;
        handle.flush().map_err(LLMError::from)?;
    }

    println!("\n");
    Ok(())
}

async fn token_usage_example() -> Result<(), LLMError> {
    println!("--- Example 6: Understanding Token Usage ---");

    let llm = LLMBuilder::new()
        .backend(LLMBackend::OpenAI)
        .model("gpt-4o")
        .max_tokens(100)
        .build()?;

    let messages = vec![ChatMessage::user()
        .content("Explain recursion in 3 sentences.")
        .build()];
    let response = llm.chat(&messages).await?;

    println!("AI: {}", response.text().unwrap_or_default());
    if let Some(usage) = response.usage() {
        println!("\nToken usage:");
        println!("- Prompt tokens: {}", usage.prompt_tokens);
        println!("- Completion tokens: {}", usage.completion_tokens);
        println!("- Total tokens: {}\n", usage.total_tokens);
    }
    Ok(())
}

async fn model_comparison() -> Result<(), LLMError> {
    println!("--- Example 7: Different Models ---");

    let prompt = "What's 25 * 47?";
    let messages = vec![ChatMessage::user().content(prompt).build()];

    // Most capable vs. faster and cheaper
    let gpt4o = client("gpt-4o")?;
    let mini = client("gpt-4o-mini")?;

    let gpt4o_response = gpt4o.chat(&messages).await?;
    let mini_response = mini.chat(&messages).await?;

    println!("gpt-4o: {}", gpt4o_response.text().unwrap_or_default());
    println!("gpt-4o-mini: {}\n", mini_response.text().unwrap_or_default());
    Ok(())
}

#[tokio::main]
async fn main() {
    llm_recipes::init_logging();

    println!("=== OpenAI Intro: Understanding the Basics ===\n");

    let result = async {
        basic_completion().await?;
        system_prompt_example().await?;
        temperature_example().await?;
        conversation_context().await?;
        streaming_example().await?;
        token_usage_example().await?;
        model_comparison().await?;
        Ok::<(), LLMError>(())
    }
    .await;

    match result {
        Ok(()) => println!("=== All examples completed! ==="),
        Err(LLMError::AuthError(e)) | Err(LLMError::InvalidRequest(e)) if e.contains("API key") => {
            eprintln!("Error: {e}");
            eprintln!("\nMake sure to set OPENAI_API_KEY in your environment");
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}
