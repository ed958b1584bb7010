//! ReAct (Reasoning + Acting) agent loop.
//!
//! The agent alternates model calls and tool execution until the model
//! produces a final answer (detected by a marker substring in its text) or
//! the iteration budget runs out. Tool calls returned by the model are
//! dispatched through a [`ToolRegistry`] and their results fed back as tool
//! messages before the next call.

use std::collections::HashMap;

use crate::chat::{ChatMessage, Tool};
use crate::error::LLMError;
use crate::{FunctionCall, LLMProvider, ToolCall};

/// Marker that terminates the loop when found in assistant text,
/// matched case-insensitively.
const DEFAULT_ANSWER_MARKER: &str = "answer:";

/// Prompt pushed when the model neither calls a tool nor answers.
const CONTINUE_PROMPT: &str = "Continue your reasoning. What's the next step?";

/// Host function invoked for a tool call. Receives the parsed JSON arguments
/// and returns the tool result text handed back to the model.
pub type ToolHandler = Box<dyn Fn(&serde_json::Value) -> Result<String, LLMError> + Send + Sync>;

/// Maps tool names to their schema and host implementation.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    handlers: HashMap<String, ToolHandler>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool definition together with the function that executes it.
    pub fn register<F>(&mut self, tool: Tool, handler: F)
    where
        F: Fn(&serde_json::Value) -> Result<String, LLMError> + Send + Sync + 'static,
    {
        self.handlers
            .insert(tool.function.name.clone(), Box::new(handler));
        self.tools.push(tool);
    }

    /// The registered tool definitions, in registration order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call from the model.
    ///
    /// Unknown tool names become an error string result so the model can
    /// recover; malformed argument JSON is a hard error.
    pub fn dispatch(&self, call: &ToolCall) -> Result<String, LLMError> {
        let Some(handler) = self.handlers.get(&call.function.name) else {
            return Ok(format!("Error: Unknown function {}", call.function.name));
        };

        let args: serde_json::Value = if call.function.arguments.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&call.function.arguments)?
        };

        handler(&args)
    }
}

/// What a finished (or exhausted) ReAct run produced.
#[derive(Debug)]
pub struct ReActOutcome {
    /// Everything the model said across iterations, newline-joined
    pub text: String,
    /// Number of model calls made
    pub iterations: usize,
    /// Whether the answer marker was reached within the budget
    pub completed: bool,
}

impl ReActOutcome {
    /// The text of the final assistant message, from the answer marker on.
    pub fn answer(&self) -> Option<&str> {
        if !self.completed {
            return None;
        }
        let lower = self.text.to_lowercase();
        let pos = lower.rfind(DEFAULT_ANSWER_MARKER)?;
        // Lowercasing can shift byte offsets for non-ASCII text; fall back to
        // the whole transcript rather than slicing mid-character.
        Some(self.text.get(pos..).unwrap_or(&self.text).trim())
    }
}

/// Bounded ReAct loop over an [`LLMProvider`].
pub struct ReActAgent {
    provider: Box<dyn LLMProvider>,
    registry: ToolRegistry,
    max_iterations: usize,
    answer_marker: String,
}

impl ReActAgent {
    pub fn builder() -> ReActAgentBuilder {
        ReActAgentBuilder::new()
    }

    /// Run the loop for one user question.
    ///
    /// Exhausting the iteration budget is not an error: the outcome comes
    /// back with `completed == false` and whatever text accumulated.
    pub async fn run(&self, user_prompt: impl Into<String>) -> Result<ReActOutcome, LLMError> {
        let mut messages = vec![ChatMessage::user().content(user_prompt).build()];
        let mut full_text = String::new();

        for iteration in 1..=self.max_iterations {
            log::info!("react iteration {iteration}/{}", self.max_iterations);

            let tools = if self.registry.is_empty() {
                None
            } else {
                Some(self.registry.tools())
            };
            let response = self.provider.chat_with_tools(&messages, tools).await?;

            let tool_calls = response.tool_calls().unwrap_or_default();
            if !tool_calls.is_empty() {
                let thought = response.text().unwrap_or_default();
                if !thought.is_empty() {
                    full_text.push_str(&thought);
                    full_text.push('\n');
                }
                messages.push(
                    ChatMessage::assistant()
                        .tool_use(tool_calls.clone())
                        .content(thought)
                        .build(),
                );

                let mut results = Vec::with_capacity(tool_calls.len());
                for call in &tool_calls {
                    let output = self.registry.dispatch(call)?;
                    log::debug!("tool {} -> {output}", call.function.name);
                    results.push(ToolCall {
                        id: call.id.clone(),
                        call_type: "function".to_string(),
                        function: FunctionCall {
                            name: call.function.name.clone(),
                            arguments: output,
                        },
                    });
                }
                messages.push(ChatMessage::user().tool_result(results).build());
                continue;
            }

            let text = response.text().unwrap_or_default();
            full_text.push_str(&text);
            full_text.push('\n');
            messages.push(ChatMessage::assistant().content(&text).build());

            if text.to_lowercase().contains(&self.answer_marker) {
                return Ok(ReActOutcome {
                    text: full_text,
                    iterations: iteration,
                    completed: true,
                });
            }

            messages.push(ChatMessage::user().content(CONTINUE_PROMPT).build());
        }

        log::warn!(
            "react loop hit iteration limit ({}) without a final answer",
            self.max_iterations
        );
        Ok(ReActOutcome {
            text: full_text,
            iterations: self.max_iterations,
            completed: false,
        })
    }
}

/// Builder for [`ReActAgent`].
pub struct ReActAgentBuilder {
    provider: Option<Box<dyn LLMProvider>>,
    registry: ToolRegistry,
    max_iterations: usize,
    answer_marker: String,
}

impl ReActAgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            registry: ToolRegistry::new(),
            max_iterations: 10,
            answer_marker: DEFAULT_ANSWER_MARKER.to_string(),
        }
    }

    /// Sets the provider the loop talks to.
    pub fn provider(mut self, provider: Box<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Registers a tool and its handler.
    pub fn tool<F>(mut self, tool: Tool, handler: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<String, LLMError> + Send + Sync + 'static,
    {
        self.registry.register(tool, handler);
        self
    }

    /// Sets the iteration budget (model calls, default 10).
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Overrides the answer marker. Matching is case-insensitive, so the
    /// marker itself is stored lowercased.
    pub fn answer_marker(mut self, marker: impl Into<String>) -> Self {
        self.answer_marker = marker.into().to_lowercase();
        self
    }

    pub fn build(self) -> Result<ReActAgent, LLMError> {
        let provider = self
            .provider
            .ok_or_else(|| LLMError::InvalidRequest("No provider specified".to_string()))?;
        if self.max_iterations == 0 {
            return Err(LLMError::InvalidRequest(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        Ok(ReActAgent {
            provider,
            registry: self.registry,
            max_iterations: self.max_iterations,
            answer_marker: self.answer_marker,
        })
    }
}

impl Default for ReActAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FunctionBuilder, ParamBuilder};
    use crate::chat::{ChatProvider, ChatResponse, MessageType};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct ScriptedResponse {
        text: Option<String>,
        tool_calls: Option<Vec<ToolCall>>,
    }

    impl std::fmt::Display for ScriptedResponse {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.text)
        }
    }

    impl ChatResponse for ScriptedResponse {
        fn text(&self) -> Option<String> {
            self.text.clone()
        }

        fn tool_calls(&self) -> Option<Vec<ToolCall>> {
            self.tool_calls.clone()
        }
    }

    /// Provider that replays a fixed script of responses and records the
    /// message history it was called with.
    struct ScriptedProvider {
        script: Mutex<Vec<ScriptedResponse>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<ScriptedResponse>) -> Self {
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn chat_with_tools(
            &self,
            messages: &[ChatMessage],
            _tools: Option<&[Tool]>,
        ) -> Result<Box<dyn ChatResponse>, LLMError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Ok(Box::new(ScriptedResponse {
                    text: Some("still thinking".to_string()),
                    tool_calls: None,
                }));
            }
            Ok(Box::new(script.remove(0)))
        }
    }

    impl LLMProvider for ScriptedProvider {}

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn add_tool() -> Tool {
        FunctionBuilder::new("add")
            .description("Add two numbers together")
            .param(ParamBuilder::new("a").type_of("number"))
            .param(ParamBuilder::new("b").type_of("number"))
            .required(vec!["a".into(), "b".into()])
            .build()
    }

    fn add_handler(args: &serde_json::Value) -> Result<String, LLMError> {
        let a = args["a"].as_f64().unwrap_or(0.0);
        let b = args["b"].as_f64().unwrap_or(0.0);
        Ok((a + b).to_string())
    }

    #[tokio::test]
    async fn loop_executes_tool_then_finishes_on_answer() {
        let provider = ScriptedProvider::new(vec![
            ScriptedResponse {
                text: Some("Thought: I need to add".to_string()),
                tool_calls: Some(vec![tool_call("c1", "add", "{\"a\": 5, \"b\": 3}")]),
            },
            ScriptedResponse {
                text: Some("Answer: 8".to_string()),
                tool_calls: None,
            },
        ]);

        let agent = ReActAgent::builder()
            .provider(Box::new(provider))
            .tool(add_tool(), add_handler)
            .build()
            .unwrap();

        let outcome = agent.run("What is 5 + 3?").await.unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.answer(), Some("Answer: 8"));
    }

    #[tokio::test]
    async fn tool_results_are_fed_back_to_the_model() {
        let provider = ScriptedProvider::new(vec![
            ScriptedResponse {
                text: None,
                tool_calls: Some(vec![tool_call("c1", "add", "{\"a\": 2, \"b\": 2}")]),
            },
            ScriptedResponse {
                text: Some("Answer: 4".to_string()),
                tool_calls: None,
            },
        ]);

        // Keep a view into the provider's recorded history across the move
        let seen_ref: &'static ScriptedProvider = Box::leak(Box::new(provider));

        struct Borrowed(&'static ScriptedProvider);

        #[async_trait]
        impl ChatProvider for Borrowed {
            async fn chat_with_tools(
                &self,
                messages: &[ChatMessage],
                tools: Option<&[Tool]>,
            ) -> Result<Box<dyn ChatResponse>, LLMError> {
                self.0.chat_with_tools(messages, tools).await
            }
        }

        impl LLMProvider for Borrowed {}

        let agent = ReActAgent::builder()
            .provider(Box::new(Borrowed(seen_ref)))
            .tool(add_tool(), add_handler)
            .build()
            .unwrap();

        agent.run("What is 2 + 2?").await.unwrap();

        let seen = seen_ref.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        // Second call carries the tool result with the computed value
        let result_msg = seen[1]
            .iter()
            .find(|m| matches!(m.message_type, MessageType::ToolResult(_)))
            .expect("tool result message");
        match &result_msg.message_type {
            MessageType::ToolResult(results) => {
                assert_eq!(results[0].function.arguments, "4");
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_result_not_failure() {
        let provider = ScriptedProvider::new(vec![
            ScriptedResponse {
                text: None,
                tool_calls: Some(vec![tool_call("c1", "subtract", "{}")]),
            },
            ScriptedResponse {
                text: Some("Answer: giving up on subtraction".to_string()),
                tool_calls: None,
            },
        ]);

        let agent = ReActAgent::builder()
            .provider(Box::new(provider))
            .tool(add_tool(), add_handler)
            .build()
            .unwrap();

        let outcome = agent.run("What is 5 - 3?").await.unwrap();
        assert!(outcome.completed);
    }

    #[tokio::test]
    async fn iteration_budget_exhaustion_is_incomplete_not_error() {
        let provider = ScriptedProvider::new(vec![]);

        let agent = ReActAgent::builder()
            .provider(Box::new(provider))
            .max_iterations(3)
            .build()
            .unwrap();

        let outcome = agent.run("Ponder forever").await.unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.iterations, 3);
        assert!(outcome.answer().is_none());
        assert!(outcome.text.contains("still thinking"));
    }

    #[tokio::test]
    async fn answer_marker_is_case_insensitive() {
        let provider = ScriptedProvider::new(vec![ScriptedResponse {
            text: Some("ANSWER: 42".to_string()),
            tool_calls: None,
        }]);

        let agent = ReActAgent::builder()
            .provider(Box::new(provider))
            .build()
            .unwrap();

        let outcome = agent.run("Meaning of life?").await.unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn registry_dispatch_rejects_malformed_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(add_tool(), add_handler);

        let err = registry
            .dispatch(&tool_call("c1", "add", "{not json"))
            .unwrap_err();
        assert!(matches!(err, LLMError::JsonError(_)));
    }

    #[test]
    fn registry_dispatch_treats_empty_arguments_as_empty_object() {
        let mut registry = ToolRegistry::new();
        registry.register(add_tool(), add_handler);

        let result = registry.dispatch(&tool_call("c1", "add", "")).unwrap();
        assert_eq!(result, "0");
    }
}
