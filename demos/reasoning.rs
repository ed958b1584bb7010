// System-prompted quantitative reasoning: ask for a bare numeric answer
use llm_recipes::{
    builder::{LLMBackend, LLMBuilder},
    chat::ChatMessage,
};

const SYSTEM_PROMPT: &str = "You are an expert logical and quantitative reasoner.
Your goal is to analyze real-world word problems involving families, quantities, averages, and relationships between entities, and compute the exact numeric answer.

Goal: Return the correct final number as a single value — no explanation, no reasoning steps, just the answer.";

const PROMPT: &str = "My family reunion is this week, and I was assigned the mashed potatoes to bring.
The attendees include my married mother and father, my twin brother and his family, my aunt and her family, my grandma and her brother, her brother's daughter, and his daughter's family. All the adults but me have been married, and no one is divorced or remarried, but my grandpa and my grandma's sister-in-law passed away last year. All living spouses are attending. My brother has two children that are still kids, my aunt has one six-year-old, and my grandma's brother's daughter has three kids under 12. I figure each adult will eat about 1.5 potatoes and each kid will eat about 1/2 a potato, except my second cousins don't eat carbs. The average potato is about half a pound, and potatoes are sold in 5-pound bags.

How many whole bags of potatoes do I need?";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_recipes::init_logging();

    let base_url = std::env::var("LLAMA_SERVER_URL").unwrap_or("http://localhost:8080/v1/".into());

    let llm = LLMBuilder::new()
        .backend(LLMBackend::LlamaServer)
        .base_url(base_url)
        .system(SYSTEM_PROMPT)
        .build()
        .expect("Failed to build LLM (llama-server)");

    let messages = vec![ChatMessage::user().content(PROMPT).build()];
    let response = llm.chat(&messages).await?;

    println!("AI: {}", response.text().unwrap_or_default());

    Ok(())
}
