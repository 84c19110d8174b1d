// App-level error type. Every variant states *where* things went wrong.
use crate::chat::ChatError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the frame buffer to the window failed
    #[error("Snapshot error: {0}")]
    Snapshot(String),     // Encoding/writing the PNG failed
    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error), // Building the async runtime failed
    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),  // Binding/serving the chat route failed
    #[error("Terminal I/O error: {0}")]
    Terminal(#[source] std::io::Error), // Reading prompts / writing replies failed
    #[error(transparent)]
    Chat(#[from] ChatError),
}
