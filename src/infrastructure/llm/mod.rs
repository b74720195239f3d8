mod anthropic_client;
mod mock_llm_client;
mod sse_frame_decoder;

pub use anthropic_client::{AnthropicClient, decode_token_stream};
pub use mock_llm_client::{MockLlmClient, MockLlmScript};
pub use sse_frame_decoder::{MAX_LINE_BYTES, SseFrame, SseFrameDecoder, SseFrameError};
