use parking_lot::RwLock;
use schemars::JsonSchema;
use std::collections::HashMap;
use std::sync::Arc;
use timetable_core::{CatalogSource, Generator};
use tracing::error;
use types::{GenerateOptions, GenerationResult};
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct RunId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(tag = "status")]
pub enum RunStatus {
    Queued,
    Running,
    Completed { result: GenerationResult },
    Failed { message: String },
}

/// In-memory registry of generation runs. Each queued run executes through
/// `Generator::generate`, which builds its own context from a fresh catalog
/// read, so concurrent runs share nothing but this status map.
#[derive(Clone)]
pub struct InMemRuns<G: Generator> {
    statuses: Arc<RwLock<HashMap<String, RunStatus>>>,
    generator: Arc<G>,
    source: Arc<dyn CatalogSource>,
}

impl<G: Generator> InMemRuns<G> {
    pub fn new(generator: G, source: Arc<dyn CatalogSource>) -> Self {
        InMemRuns {
            statuses: Default::default(),
            generator: Arc::new(generator),
            source,
        }
    }

    pub fn enqueue(&self, options: GenerateOptions) -> RunId {
        let id = Uuid::new_v4().to_string();
        self.statuses.write().insert(id.clone(), RunStatus::Queued);

        let statuses = self.statuses.clone();
        let generator = self.generator.clone();
        let source = self.source.clone();
        let run_id = id.clone();

        tokio::spawn(async move {
            statuses
                .write()
                .insert(run_id.clone(), RunStatus::Running);
            let outcome = match generator.generate(source, options).await {
                Ok(result) => RunStatus::Completed { result },
                Err(e) => {
                    error!(?e, "generation run failed");
                    RunStatus::Failed {
                        message: e.to_string(),
                    }
                }
            };
            statuses.write().insert(run_id, outcome);
        });

        RunId(id)
    }

    pub fn get(&self, id: &str) -> Option<RunStatus> {
        self.statuses.read().get(id).cloned()
    }
}
