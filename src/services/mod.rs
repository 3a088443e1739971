//! Collaborators outside the graph view: chat providers, prompts and the
//! graph store.

pub mod chat;
pub mod gemini;
pub mod gigachat;
pub mod graph_store;
pub mod http;
pub mod prompt;
pub mod routerai;

pub use chat::{Analyzer, ChatMessage, ChatProvider, NO_RESPONSE, Role};
pub use graph_store::{GraphStore, MockGraphStore, SyncReport, refresh_graph};
pub use http::{FetchTransport, HttpRequest, HttpResponse, Transport};
pub use prompt::{PRELOADED_PROMPTS, PromptDefinition};
