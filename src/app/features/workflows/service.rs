use serde_json::{json, Value};
use ulid::Ulid;

use crate::app::db::NewWorkflow;
use crate::app::domain::OrganizationId;
use crate::app::error::AppError;
use crate::app::repositories;
use crate::app::unit_of_work::{CommitPolicy, UnitOfWork};

/// Input for a new workflow, already validated.
#[derive(Debug, Clone)]
pub struct WorkflowDraft {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub agent_id: Option<String>,
    pub nodes: Option<Vec<Value>>,
    pub edges: Option<Vec<Value>>,
    pub is_default: bool,
    pub execution_order: i64,
}

impl WorkflowDraft {
    /// The workflow created alongside a new agent.
    pub fn default_for_agent(agent_id: &str, agent_name: &str) -> Self {
        Self {
            id: Ulid::new().to_string(),
            name: format!("{} default workflow", agent_name),
            description: Some(format!("Default workflow for {}", agent_name)),
            agent_id: Some(agent_id.to_string()),
            nodes: None,
            edges: None,
            is_default: true,
            execution_order: 1,
        }
    }
}

/// Start -> end graph used when a workflow is created without one.
pub fn default_graph() -> (Vec<Value>, Vec<Value>) {
    let start = Ulid::new().to_string();
    let end = Ulid::new().to_string();
    let nodes = vec![
        json!({
            "id": start,
            "label": "Start Here",
            "type": "start",
            "link": null,
            "position": { "x": 100, "y": 100 },
            "config": { "message": "Start here" }
        }),
        json!({
            "id": end,
            "label": "End Here",
            "type": "end",
            "link": null,
            "position": { "x": 300, "y": 100 },
            "config": { "message": "End here" }
        }),
    ];
    let edges = vec![json!({ "source": start, "target": end })];
    (nodes, edges)
}

/// Create a workflow; names are unique per organization. Returns the id.
pub async fn create_workflow(
    uow: &mut UnitOfWork,
    organization_id: &OrganizationId,
    draft: &WorkflowDraft,
    policy: Option<CommitPolicy>,
) -> Result<String, AppError> {
    if repositories::workflows::find_by_name(uow, organization_id, &draft.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Workflow with name '{}' already exists",
            draft.name
        )));
    }

    let nodes = draft.nodes.clone().filter(|n| !n.is_empty());
    let edges = draft.edges.clone().filter(|e| !e.is_empty());
    let (nodes, edges) = match (nodes, edges) {
        (Some(nodes), Some(edges)) => (nodes, edges),
        (nodes, edges) => {
            tracing::info!(name = %draft.name, "creating workflow with default start->end graph");
            let (default_nodes, default_edges) = default_graph();
            (nodes.unwrap_or(default_nodes), edges.unwrap_or(default_edges))
        }
    };

    let workflow = NewWorkflow {
        id: draft.id.clone(),
        organization_id: organization_id.clone(),
        agent_id: draft.agent_id.clone(),
        name: draft.name.clone(),
        description: draft.description.clone(),
        nodes: Value::Array(nodes).to_string(),
        edges: Value::Array(edges).to_string(),
        is_default: draft.is_default,
        execution_order: draft.execution_order,
    };
    repositories::workflows::create(uow, &workflow, policy).await?;
    Ok(workflow.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_graph_links_start_to_end() {
        let (nodes, edges) = default_graph();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["type"], "start");
        assert_eq!(nodes[1]["type"], "end");
        assert_eq!(edges[0]["source"], nodes[0]["id"]);
        assert_eq!(edges[0]["target"], nodes[1]["id"]);
    }

    #[test]
    fn default_workflow_is_named_after_agent() {
        let draft = WorkflowDraft::default_for_agent("agent-1", "Support Bot");
        assert_eq!(draft.name, "Support Bot default workflow");
        assert!(draft.is_default);
        assert_eq!(draft.agent_id.as_deref(), Some("agent-1"));
    }
}
