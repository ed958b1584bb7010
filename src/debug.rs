//! Prompt/response capture for debugging.
//!
//! [`PromptDebugger`] records the exact prompt sent to a model (message
//! transcript, system prompt, available tool definitions) together with the
//! response, formats them into a framed human-readable report, and writes the
//! report to a log file or the console.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::chat::{ChatMessage, ChatRole, MessageType, Tool};
use crate::error::LLMError;

/// Where and how reports are written.
#[derive(Debug, Clone)]
pub struct DebugOptions {
    output_dir: PathBuf,
    filename: String,
    include_timestamp: bool,
    append_mode: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            filename: "debug_output.txt".to_string(),
            include_timestamp: false,
            append_mode: false,
        }
    }
}

impl DebugOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory reports are written into; created on first write.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Base filename for reports.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Mangle the capture timestamp into the filename, one file per report.
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Append to the file instead of truncating it.
    pub fn append_mode(mut self, append: bool) -> Self {
        self.append_mode = append;
        self
    }
}

/// Everything one capture wants recorded.
#[derive(Debug, Default)]
pub struct PromptCapture<'a> {
    /// System prompt, if the provider was configured with one
    pub system: Option<&'a str>,
    /// Conversation history as sent
    pub messages: &'a [ChatMessage],
    /// Tool definitions available to the model
    pub tools: &'a [Tool],
    /// The model's response text
    pub response: Option<&'a str>,
}

/// A formatted capture, ready to write.
#[derive(Debug, Clone)]
pub struct CapturedPrompt {
    /// When the capture was taken
    pub timestamp: DateTime<Utc>,
    /// The reconstructed exact prompt
    pub exact_prompt: String,
    /// The model response, if captured
    pub response: Option<String>,
    /// How many tools were available
    pub tool_count: usize,
}

/// Helper for debugging and logging LLM prompts.
pub struct PromptDebugger {
    options: DebugOptions,
}

impl PromptDebugger {
    pub fn new(options: DebugOptions) -> Self {
        Self { options }
    }

    /// Capture the exact prompt (system + messages + tool definitions) and
    /// the response, without writing anything yet.
    pub fn capture(&self, params: &PromptCapture<'_>) -> CapturedPrompt {
        let mut exact_prompt = String::new();

        if let Some(system) = params.system {
            exact_prompt.push_str(&format!("\n=== SYSTEM ===\n{system}\n"));
        }
        for msg in params.messages {
            exact_prompt.push_str(&format!(
                "\n=== {} ===\n{}\n",
                role_label(msg),
                msg.content
            ));
        }

        if !params.tools.is_empty() {
            exact_prompt.push_str("\n\n=== Available Functions ===\n");
            match serde_json::to_string_pretty(params.tools) {
                Ok(json) => exact_prompt.push_str(&json),
                Err(err) => exact_prompt.push_str(&format!("<unserializable: {err}>")),
            }
        }

        CapturedPrompt {
            timestamp: Utc::now(),
            exact_prompt,
            response: params.response.map(str::to_owned),
            tool_count: params.tools.len(),
        }
    }

    /// Format a capture as the framed report that gets written out.
    pub fn format_output(&self, captured: &CapturedPrompt) -> String {
        let mut output = String::from("\n========== PROMPT DEBUG OUTPUT ==========\n");
        output.push_str(&format!(
            "Timestamp: {}\n",
            captured.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));

        output.push_str("\n=== EXACT PROMPT ===\n");
        output.push_str(&captured.exact_prompt);
        output.push('\n');

        if let Some(response) = &captured.response {
            output.push_str("\n=== MODEL RESPONSE ===\n");
            output.push_str(response);
            output.push('\n');
        }

        if captured.tool_count > 0 {
            output.push_str(&format!("\nFunctions: {} available\n", captured.tool_count));
        }

        output.push_str("==========================================\n");
        output
    }

    /// Write a capture to its file, returning the path written.
    pub fn save_to_file(
        &self,
        captured: &CapturedPrompt,
        custom_filename: Option<&str>,
    ) -> Result<PathBuf, LLMError> {
        fs::create_dir_all(&self.options.output_dir)?;

        let filename = custom_filename.unwrap_or(&self.options.filename);
        let filename = if self.options.include_timestamp {
            timestamped_filename(filename, &captured.timestamp)
        } else {
            filename.to_string()
        };
        let filepath = self.options.output_dir.join(filename);

        let content = self.format_output(captured);
        let mut file = OpenOptions::new()
            .create(true)
            .append(self.options.append_mode)
            .write(true)
            .truncate(!self.options.append_mode)
            .open(&filepath)?;
        file.write_all(content.as_bytes())?;

        log::info!("prompt debug output written to {}", filepath.display());
        Ok(filepath)
    }

    /// Capture and write in one step.
    pub fn debug(
        &self,
        params: &PromptCapture<'_>,
    ) -> Result<(CapturedPrompt, PathBuf), LLMError> {
        let captured = self.capture(params);
        let filepath = self.save_to_file(&captured, None)?;
        Ok((captured, filepath))
    }

    /// Capture and print to the console instead of a file.
    pub fn log_to_console(&self, params: &PromptCapture<'_>) -> CapturedPrompt {
        let captured = self.capture(params);
        println!("{}", self.format_output(&captured));
        captured
    }
}

fn role_label(msg: &ChatMessage) -> &'static str {
    match (&msg.role, &msg.message_type) {
        (_, MessageType::ToolResult(_)) => "TOOL",
        (_, MessageType::ToolUse(_)) => "ASSISTANT (tool use)",
        (ChatRole::User, _) => "USER",
        (ChatRole::Assistant, _) => "ASSISTANT",
    }
}

/// `qwen_prompts.txt` + 2026-01-05T10:00:00Z -> `qwen_prompts_2026-01-05T10-00-00Z.txt`
fn timestamped_filename(filename: &str, timestamp: &DateTime<Utc>) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = path.extension().and_then(|s| s.to_str());

    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Secs, true)
        .replace([':', '.'], "-");

    match ext {
        Some(ext) => format!("{stem}_{stamp}.{ext}"),
        None => format!("{stem}_{stamp}"),
    }
}
