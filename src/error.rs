//! Error types.

use thiserror::Error;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEndpoint {
	/// The `source` id.
	Source,
	/// The `target` id.
	Target,
}

impl std::fmt::Display for LinkEndpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LinkEndpoint::Source => "source",
			LinkEndpoint::Target => "target",
		})
	}
}

/// Malformed graph snapshot, detected before any simulation step runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	#[error("Duplicate node id: {0}")]
	DuplicateNodeId(String),

	#[error("Link #{link} {endpoint} references unknown node id: {id}")]
	UnknownLinkEndpoint {
		link: usize,
		endpoint: LinkEndpoint,
		id: String,
	},
}

/// Classified failure of a chat-completion call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
	#[error("{0} API key is missing")]
	MissingApiKey(&'static str),

	#[error("GigaChat требует CORS Proxy. Настройте в настройках.")]
	MissingProxy,

	#[error("Network error: {0}")]
	Network(String),

	#[error("{provider} Auth Error ({status}): {detail}")]
	Auth {
		provider: &'static str,
		status: u16,
		detail: String,
	},

	#[error("{provider} quota exceeded ({status}): {detail}")]
	Quota {
		provider: &'static str,
		status: u16,
		detail: String,
	},

	#[error("{0} Error (530): Proxy resolution failed.")]
	ProxyResolution(&'static str),

	#[error("{provider} Error ({status}): {detail}")]
	Api {
		provider: &'static str,
		status: u16,
		detail: String,
	},

	#[error("Unexpected response body: {0}")]
	Decode(String),
}

impl ProviderError {
	/// Maps a non-success HTTP status to an error class.
	pub fn from_status(provider: &'static str, status: u16, detail: String) -> Self {
		match status {
			401 | 403 => ProviderError::Auth {
				provider,
				status,
				detail,
			},
			429 => ProviderError::Quota {
				provider,
				status,
				detail,
			},
			530 => ProviderError::ProxyResolution(provider),
			_ => ProviderError::Api {
				provider,
				status,
				detail,
			},
		}
	}
}

impl From<serde_json::Error> for ProviderError {
	fn from(err: serde_json::Error) -> Self {
		ProviderError::Decode(err.to_string())
	}
}

/// Graph store failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
	#[error("Neo4j connection settings are missing in 'Settings' tab.")]
	MissingConnectionSettings,

	#[error("Нет файлов для синхронизации.")]
	NothingToSync,
}
