// One-shot function calling: the model asks for the current time, the host
// executes the tool, and the model rewrites the result per its system prompt.
// The whole exchange is then written out by the prompt debugger.
use llm_recipes::{
    builder::{FunctionBuilder, LLMBackend, LLMBuilder},
    chat::ChatMessage,
    debug::{DebugOptions, PromptCapture, PromptDebugger},
    FunctionCall, ToolCall,
};

const SYSTEM_PROMPT: &str = "You are a professional chronologist who standardizes time representations across different systems.

Always convert times from 12-hour format (e.g., \"1:46:36 PM\") to 24-hour format (e.g., \"13:46\") without seconds before returning them.";

fn get_current_time() -> String {
    chrono::Local::now().format("%I:%M:%S %p").to_string()
}

fn execute_function_call(name: &str) -> String {
    match name {
        "get_current_time" => get_current_time(),
        other => format!("Error: Unknown function {other}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let time_tool = FunctionBuilder::new("get_current_time").description("Get the current time");

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .system(SYSTEM_PROMPT)
        .function(time_tool)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let mut messages = vec![ChatMessage::user().content("What time is it right now?").build()];

    // First round: the model should ask for the tool
    let response = llm.chat_with_tools(&messages, llm.tools()).await?;

    let answer = match response.tool_calls() {
        Some(tool_calls) if !tool_calls.is_empty() => {
            let tool_call = &tool_calls[0];
            println!("Model wants to call function: {}", tool_call.function.name);

            let function_response = execute_function_call(&tool_call.function.name);
            println!("Function returned: {function_response}");

            // Add the function call and its result to the conversation
            messages.push(
                ChatMessage::assistant()
                    .tool_use(tool_calls.clone())
                    .content(response.text().unwrap_or_default())
                    .build(),
            );
            messages.push(
                ChatMessage::user()
                    .tool_result(vec![ToolCall {
                        id: tool_call.id.clone(),
                        call_type: "function".to_string(),
                        function: FunctionCall {
                            name: tool_call.function.name.clone(),
                            arguments: function_response,
                        },
                    }])
                    .build(),
            );

            // Second round: the model turns the tool result into an answer
            let final_response = llm.chat_with_tools(&messages, llm.tools()).await?;
            final_response.text().unwrap_or_default()
        }
        _ => response.text().unwrap_or_default(),
    };

    println!("AI: {answer}");

    // Debug the prompts
    let prompt_debugger = PromptDebugger::new(
        DebugOptions::new()
            .output_dir("./logs")
            .filename("qwen_prompts.txt")
            .include_timestamp(true),
    );

    prompt_debugger.debug(&PromptCapture {
        system: Some(SYSTEM_PROMPT),
        messages: &messages,
        tools: llm.tools().unwrap_or_default(),
        response: Some(&answer),
    })?;

    Ok(())
}
