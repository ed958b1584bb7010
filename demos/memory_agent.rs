// Agent with long-term memory: remembered facts and preferences are injected
// into the system prompt, and the model stores new ones through a tool.
// Memory lives in a JSON file, so it survives restarts of this demo.
use llm_recipes::{
    builder::{FunctionBuilder, LLMBackend, LLMBuilder, ParamBuilder},
    chat::ChatMessage,
    error::LLMError,
    memory::MemoryStore,
    FunctionCall, LLMProvider, ToolCall,
};

fn save_memory_tool() -> FunctionBuilder {
    FunctionBuilder::new("save_memory")
        .description(
            "Save important information to long-term memory (user preferences, facts, personal details)",
        )
        .param(
            ParamBuilder::new("memory_type")
                .type_of("string")
                .description("Type of memory to save")
                .enum_values(vec!["fact".into(), "preference".into()]),
        )
        .param(
            ParamBuilder::new("content")
                .type_of("string")
                .description("The information to remember"),
        )
        .param(
            ParamBuilder::new("key")
                .type_of("string")
                .description("For preferences: the preference key (e.g., 'favorite_color')"),
        )
        .required(vec!["memory_type".into(), "content".into()])
}

fn execute_function_call(
    store: &MemoryStore,
    call: &ToolCall,
) -> Result<String, LLMError> {
    if call.function.name != "save_memory" {
        return Ok(format!("Error: Unknown function {}", call.function.name));
    }
    let args: serde_json::Value = serde_json::from_str(&call.function.arguments)?;
    store.save_entry(
        args["memory_type"].as_str().unwrap_or_default(),
        args["content"].as_str().unwrap_or_default(),
        args["key"].as_str(),
    )
}

/// Send a message and get a response, handling tool calls along the way.
async fn chat(
    llm: &dyn LLMProvider,
    store: &MemoryStore,
    messages: &mut Vec<ChatMessage>,
    user_message: &str,
) -> Result<String, LLMError> {
    messages.push(ChatMessage::user().content(user_message).build());

    let response = llm.chat_with_tools(messages, llm.tools()).await?;

    let Some(tool_calls) = response.tool_calls().filter(|calls| !calls.is_empty()) else {
        let answer = response.text().unwrap_or_default();
        messages.push(ChatMessage::assistant().content(&answer).build());
        return Ok(answer);
    };

    messages.push(
        ChatMessage::assistant()
            .tool_use(tool_calls.clone())
            .content(response.text().unwrap_or_default())
            .build(),
    );

    // Execute each tool call and feed the results back
    let mut results = Vec::with_capacity(tool_calls.len());
    for tool_call in &tool_calls {
        let function_response = execute_function_call(store, tool_call)?;
        results.push(ToolCall {
            id: tool_call.id.clone(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: tool_call.function.name.clone(),
                arguments: function_response,
            },
        });
    }
    messages.push(ChatMessage::user().tool_result(results).build());

    let final_response = llm.chat_with_tools(messages, llm.tools()).await?;
    let answer = final_response.text().unwrap_or_default();
    messages.push(ChatMessage::assistant().content(&answer).build());
    Ok(answer)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let memory_store = MemoryStore::new("./agent-memory.json");

    // Load existing memories into the system prompt
    let memory_summary = memory_store.summary();
    let system_prompt = format!(
        "You are a helpful assistant with long-term memory.\n{memory_summary}\n\nWhen the user shares important information about themselves, their preferences, or facts they want you to remember, use the save_memory function to store it."
    );

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .system(system_prompt)
        .function(save_memory_tool())
        .build()
        .expect("Failed to build LLM (llama-server)");

    let mut messages = Vec::new();

    // First interaction
    let prompt1 = "Hi! My name is Alex and I love pizza.";
    let response1 = chat(llm.as_ref(), &memory_store, &mut messages, prompt1).await?;
    println!("User: {prompt1}");
    println!("AI: {response1}\n");

    // Later conversation (works even after restarting the demo)
    let prompt2 = "What's my favorite food?";
    let response2 = chat(llm.as_ref(), &memory_store, &mut messages, prompt2).await?;
    println!("User: {prompt2}");
    println!("AI: {response2}");

    Ok(())
}
