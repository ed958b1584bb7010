mod message;
mod sse;
mod stream;
mod tool;
mod traits;
mod usage;

pub use message::{ChatMessage, ChatMessageBuilder, ChatRole, MessageType};
pub use stream::{StreamChoice, StreamDelta, StreamResponse};
pub use tool::{FunctionTool, ParameterProperty, ParametersSchema, Tool, ToolChoice};
pub use traits::{ChatProvider, ChatResponse};
pub use usage::{CompletionTokensDetails, PromptTokensDetails, Usage};

pub(crate) use sse::create_sse_stream;
