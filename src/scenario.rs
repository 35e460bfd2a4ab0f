//! Declarative scenarios: a tree of contexts plus a list of steps, executed
//! against a fresh hub and root store.
//!
//! Contexts are addressed by *path*, the keys from the top-level context down
//! joined with `/` (`"app/counter"`). Paths are independent of the hub's
//! identity scheme, so the same scenario runs under any configured root id
//! or delimiter.
//!
//! ```toml
//! [[contexts]]
//! key = "app"
//!
//! [[contexts]]
//! key = "counter"
//! parent = "app"
//! state_key = "value"
//! default_state = 0
//! reducer = "counter"
//!
//! [[steps]]
//! op = "dispatch"
//! context = "app/counter"
//! route_to_self = true
//! action = { type = "INC" }
//! ```

use crate::action::Action;
use crate::builtin::{self, BUILTIN_REDUCERS};
use crate::context::{create_context, Context, StateBuildingBlock};
use crate::error::ScenarioError;
use crate::hub::Hub;
use crate::routing::RoutingOptions;
use crate::store::Store;
use crate::types::State;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::path::Path;
use tracing::{debug, info};

/// Separator of scenario paths.
pub const PATH_SEPARATOR: char = '/';

/// One context of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    pub key: String,

    /// Path of the parent context; top-level when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Defaults to `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    #[serde(default = "empty_object")]
    pub default_state: State,

    /// Name of a built-in reducer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingOptions>,
}

fn empty_object() -> State {
    State::Object(Map::new())
}

impl ContextSpec {
    pub fn new(key: impl Into<String>) -> Self {
        ContextSpec {
            key: key.into(),
            parent: None,
            state_key: None,
            default_state: empty_object(),
            reducer: None,
            routing: None,
        }
    }

    /// Path this context is addressed by once created.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, self.key),
            None => self.key.clone(),
        }
    }

    pub fn effective_state_key(&self) -> &str {
        self.state_key.as_deref().unwrap_or(&self.key)
    }
}

/// A scenario step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create(ContextSpec),
    /// Dispatch through `context`, or at the root store when absent.
    Dispatch {
        #[serde(default)]
        context: Option<String>,
        action: Action,
        #[serde(default)]
        route_to_self: bool,
    },
    Destroy {
        context: String,
    },
    Snapshot {
        #[serde(default)]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Created in order before the first step runs.
    #[serde(default)]
    pub contexts: Vec<ContextSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, crate::error::ApiError> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&source)?)
    }
}

/// State of one context at a point in the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSnapshot {
    pub path: String,
    pub id: String,
    pub state: State,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub label: String,
    pub root: State,
    pub contexts: Vec<ContextSnapshot>,
}

impl Snapshot {
    pub fn context(&self, path: &str) -> Option<&ContextSnapshot> {
        self.contexts.iter().find(|c| c.path == path)
    }
}

/// Trace of a scenario run. The last snapshot is always the final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub snapshots: Vec<Snapshot>,
}

impl ScenarioReport {
    pub fn final_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

/// Executes scenarios against one hub and its root store.
pub struct ScenarioRunner {
    hub: Hub,
    store: Store,
    contexts: IndexMap<String, Context>,
}

impl ScenarioRunner {
    pub fn new(hub: Hub) -> Self {
        let store = Store::new(&hub);
        ScenarioRunner {
            hub,
            store,
            contexts: IndexMap::new(),
        }
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn context(&self, path: &str) -> Option<&Context> {
        self.contexts.get(path)
    }

    /// Every context created so far, by path, in creation order.
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &Context)> {
        self.contexts.iter().map(|(path, ctx)| (path.as_str(), ctx))
    }

    /// Create the context described by `spec` under its parent.
    pub fn create(&mut self, spec: &ContextSpec) -> Result<&Context, ScenarioError> {
        let delimiter = self.hub.delimiter();
        if spec.key.is_empty()
            || spec.key.contains(PATH_SEPARATOR)
            || (!delimiter.is_empty() && spec.key.contains(delimiter))
        {
            return Err(ScenarioError::InvalidKey(spec.key.clone()));
        }
        let path = spec.path();
        if self.contexts.contains_key(&path) {
            return Err(ScenarioError::DuplicateContext(path));
        }

        let parent_id = match &spec.parent {
            None => self.hub.root_id().clone(),
            Some(parent_path) => {
                let parent = self
                    .contexts
                    .get(parent_path)
                    .ok_or_else(|| ScenarioError::UnknownParent(parent_path.clone()))?;
                if parent.is_destroyed() {
                    return Err(ScenarioError::ContextDestroyed(parent_path.clone()));
                }
                parent.id().clone()
            }
        };

        let mut block = StateBuildingBlock::new(
            spec.key.clone(),
            spec.effective_state_key(),
            spec.default_state.clone(),
            parent_id,
        );
        if let Some(name) = &spec.reducer {
            let reducer = builtin::by_name(name).ok_or_else(|| ScenarioError::UnknownReducer {
                name: name.clone(),
                available: BUILTIN_REDUCERS.join(", "),
            })?;
            block = block.with_shared_reducer(reducer);
        }
        if let Some(routing) = &spec.routing {
            block = block.with_routing(routing.clone());
        }

        let context = create_context(block, &self.hub);
        debug!(path = %path, context_id = %context.id(), "scenario context created");
        Ok(self.contexts.entry(path).or_insert(context))
    }

    /// Create every listed context, then run the steps.
    pub fn run(&mut self, scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
        info!(
            contexts = scenario.contexts.len(),
            steps = scenario.steps.len(),
            "running scenario"
        );
        for spec in &scenario.contexts {
            self.create(spec)?;
        }

        let mut snapshots = Vec::new();
        for (index, step) in scenario.steps.iter().enumerate() {
            match step {
                Step::Create(spec) => {
                    self.create(spec)?;
                }
                Step::Dispatch {
                    context,
                    action,
                    route_to_self,
                } => match context {
                    Some(path) => self.lookup(path)?.dispatch(action.clone(), *route_to_self),
                    None => self.store.dispatch(action.clone()),
                },
                Step::Destroy { context } => self.lookup(context)?.destroy(),
                Step::Snapshot { label } => {
                    let label = label
                        .clone()
                        .unwrap_or_else(|| format!("step {}", index + 1));
                    snapshots.push(self.snapshot(label));
                }
            }
        }
        snapshots.push(self.snapshot("final".to_string()));
        Ok(ScenarioReport { snapshots })
    }

    pub fn snapshot(&self, label: String) -> Snapshot {
        Snapshot {
            label,
            root: self.store.get_state(),
            contexts: self
                .contexts
                .iter()
                .map(|(path, ctx)| ContextSnapshot {
                    path: path.clone(),
                    id: ctx.id().to_string(),
                    state: ctx.get_state(),
                    destroyed: ctx.is_destroyed(),
                })
                .collect(),
        }
    }

    fn lookup(&self, path: &str) -> Result<&Context, ScenarioError> {
        self.contexts
            .get(path)
            .ok_or_else(|| ScenarioError::UnknownContext(path.to_string()))
    }
}
