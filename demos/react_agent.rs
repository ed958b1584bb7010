// ReAct agent: the model reasons step by step, calls calculator tools for
// every arithmetic operation, and terminates once it writes "Answer:".
use llm_recipes::{
    agent::ReActAgent,
    builder::{FunctionBuilder, LLMBackend, LLMBuilder, ParamBuilder},
    chat::Tool,
    error::LLMError,
};

const SYSTEM_PROMPT: &str = r#"You are a mathematical assistant that uses the ReAct (Reasoning + Acting) approach.

CRITICAL: You must follow this EXACT pattern for every problem:

Thought: [Explain what calculation you need to do next and why]
Action: [Call ONE tool with specific numbers]
Observation: [Wait for the tool result]
Thought: [Analyze the result and decide next step]
Action: [Call another tool if needed]
Observation: [Wait for the tool result]
... (repeat as many times as needed)
Thought: [Once you have ALL the information needed to answer the question]
Answer: [Give the final answer and STOP]

RULES:
1. Only write "Answer:" when you have the complete final answer to the user's question
2. After writing "Answer:", DO NOT continue calculating or thinking
3. Break complex problems into the smallest possible steps
4. Use tools for ALL calculations - never calculate in your head
5. Each Action should call exactly ONE tool

EXAMPLE:
User: "What is 5 + 3, then multiply that by 2?"

Thought: First I need to add 5 and 3
Action: add(5, 3)
Observation: 8
Thought: Now I need to multiply that result by 2
Action: multiply(8, 2)
Observation: 16
Thought: I now have the final result
Answer: 16"#;

fn calculator_tool(name: &str, description: &str, a_desc: &str, b_desc: &str) -> Tool {
    FunctionBuilder::new(name)
        .description(description)
        .param(ParamBuilder::new("a").type_of("number").description(a_desc))
        .param(ParamBuilder::new("b").type_of("number").description(b_desc))
        .required(vec!["a".into(), "b".into()])
        .build()
}

fn operands(args: &serde_json::Value) -> Result<(f64, f64), LLMError> {
    let a = args["a"]
        .as_f64()
        .ok_or_else(|| LLMError::InvalidRequest("missing operand a".into()))?;
    let b = args["b"]
        .as_f64()
        .ok_or_else(|| LLMError::InvalidRequest("missing operand b".into()))?;
    Ok((a, b))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .system(SYSTEM_PROMPT)
        .max_tokens(300)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let agent = ReActAgent::builder()
        .provider(llm)
        .max_iterations(15)
        .tool(
            calculator_tool("add", "Add two numbers together", "First number", "Second number"),
            |args| {
                let (a, b) = operands(args)?;
                let result = a + b;
                println!("   TOOL CALLED: add({a}, {b}) -> {result}");
                Ok(result.to_string())
            },
        )
        .tool(
            calculator_tool(
                "multiply",
                "Multiply two numbers together",
                "First number",
                "Second number",
            ),
            |args| {
                let (a, b) = operands(args)?;
                let result = a * b;
                println!("   TOOL CALLED: multiply({a}, {b}) -> {result}");
                Ok(result.to_string())
            },
        )
        .tool(
            calculator_tool(
                "subtract",
                "Subtract second number from first number",
                "Number to subtract from",
                "Number to subtract",
            ),
            |args| {
                let (a, b) = operands(args)?;
                let result = a - b;
                println!("   TOOL CALLED: subtract({a}, {b}) -> {result}");
                Ok(result.to_string())
            },
        )
        .tool(
            calculator_tool(
                "divide",
                "Divide first number by second number",
                "Dividend (number to be divided)",
                "Divisor (number to divide by)",
            ),
            |args| {
                let (a, b) = operands(args)?;
                if b == 0.0 {
                    println!("   TOOL CALLED: divide({a}, {b}) -> division by zero");
                    return Ok("Error: Cannot divide by zero".to_string());
                }
                let result = a / b;
                println!("   TOOL CALLED: divide({a}, {b}) -> {result}");
                Ok(result.to_string())
            },
        )
        .build()?;

    // A query that needs several chained calculations
    let query = "A store sells 15 items on Monday at $8 each, 20 items on Tuesday at $8 each, and 10 items on Wednesday at $8 each. What's the average number of items sold per day, and what's the total revenue?";

    println!("{}", "=".repeat(70));
    println!("USER QUESTION: {query}");
    println!("{}\n", "=".repeat(70));

    let outcome = agent.run(query).await?;

    println!("\n{}", "=".repeat(70));
    if outcome.completed {
        println!("FINAL ANSWER REACHED (after {} iterations)", outcome.iterations);
        println!("{}", "=".repeat(70));
        println!("{}", outcome.answer().unwrap_or(&outcome.text));
    } else {
        println!("Max iterations reached without final answer");
        println!("{}", "=".repeat(70));
        println!("{}", outcome.text);
    }

    Ok(())
}
