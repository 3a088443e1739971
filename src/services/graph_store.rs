//! Graph database access.
//!
//! Only a mock exists: it checks the connection settings, optionally waits
//! to imitate a round trip, and serves the embedded INCOSE dataset.

use log::info;

use crate::config::GraphStoreConfig;
use crate::error::StoreError;
use crate::ontology::{GraphData, incose};
use crate::services::http::sleep;
use crate::store::OntologyFile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncReport {
	pub synced: usize,
	pub message: String,
}

#[allow(async_fn_in_trait)]
pub trait GraphStore {
	async fn sync(&self, files: &[OntologyFile]) -> Result<SyncReport, StoreError>;
	async fn fetch_graph(&self) -> Result<GraphData, StoreError>;
}

pub struct MockGraphStore {
	config: GraphStoreConfig,
	sync_latency_ms: i32,
	fetch_latency_ms: i32,
}

impl MockGraphStore {
	/// No artificial latency.
	pub fn new(config: GraphStoreConfig) -> Self {
		Self {
			config,
			sync_latency_ms: 0,
			fetch_latency_ms: 0,
		}
	}

	/// Latencies matching a remote database: 2s to sync, 1.5s to fetch.
	pub fn with_browser_latency(config: GraphStoreConfig) -> Self {
		Self {
			config,
			sync_latency_ms: 2000,
			fetch_latency_ms: 1500,
		}
	}

	fn check(&self) -> Result<(), StoreError> {
		if self.config.is_complete() {
			Ok(())
		} else {
			Err(StoreError::MissingConnectionSettings)
		}
	}
}

impl GraphStore for MockGraphStore {
	async fn sync(&self, files: &[OntologyFile]) -> Result<SyncReport, StoreError> {
		if files.is_empty() {
			return Err(StoreError::NothingToSync);
		}
		self.check()?;
		if self.sync_latency_ms > 0 {
			sleep(self.sync_latency_ms).await;
		}
		info!("Syncing {} files to {}", files.len(), self.config.url);
		Ok(SyncReport {
			synced: files.len(),
			message: format!("Успешно синхронизировано {} файлов с графом Neo4j.", files.len()),
		})
	}

	async fn fetch_graph(&self) -> Result<GraphData, StoreError> {
		self.check()?;
		if self.fetch_latency_ms > 0 {
			sleep(self.fetch_latency_ms).await;
		}
		info!("Fetched graph from {}", self.config.url);
		Ok(incose().clone())
	}
}

/// Replaces `data` with a fresh snapshot from `store`. On failure `data` is
/// left exactly as it was.
pub async fn refresh_graph<S: GraphStore>(store: &S, data: &mut GraphData) -> Result<(), StoreError> {
	match store.fetch_graph().await {
		Ok(fresh) => {
			info!("Graph refreshed: {} nodes, {} links", fresh.nodes.len(), fresh.links.len());
			*data = fresh;
			Ok(())
		}
		Err(e) => {
			log::warn!("Graph refresh failed: {e}");
			Err(e)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn connected() -> GraphStoreConfig {
		GraphStoreConfig {
			url: "neo4j+s://demo.databases.neo4j.io".into(),
			user: "neo4j".into(),
			password: "pw".into(),
		}
	}

	fn file(id: &str) -> OntologyFile {
		OntologyFile {
			id: id.into(),
			name: format!("{id}.ttl"),
			content: "@prefix ex: <http://example.org/> .".into(),
		}
	}

	#[tokio::test]
	async fn test_sync_report() {
		let store = MockGraphStore::new(connected());
		let report = store.sync(&[file("a"), file("b")]).await.unwrap();
		assert_eq!(report.synced, 2);
		assert_eq!(report.message, "Успешно синхронизировано 2 файлов с графом Neo4j.");
	}

	#[tokio::test]
	async fn test_sync_requires_files_and_settings() {
		let store = MockGraphStore::new(connected());
		assert_eq!(store.sync(&[]).await, Err(StoreError::NothingToSync));
		let bare = MockGraphStore::new(GraphStoreConfig::default());
		assert_eq!(
			bare.sync(&[file("a")]).await,
			Err(StoreError::MissingConnectionSettings)
		);
	}

	#[tokio::test]
	async fn test_fetch_returns_dataset_copy() {
		let store = MockGraphStore::new(connected());
		assert_eq!(&store.fetch_graph().await.unwrap(), incose());
	}

	#[tokio::test]
	async fn test_failed_refresh_keeps_data() {
		let store = MockGraphStore::new(GraphStoreConfig::default());
		let mut data = GraphData::default();
		assert!(refresh_graph(&store, &mut data).await.is_err());
		assert_eq!(data, GraphData::default());
	}
}
