use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::logic::fan_out::fan_out;
use crate::model::{Id, Identified, Node};
use crate::upstream::{list_records, Resource, UpstreamClient};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub node_id: Id,
    pub prompt: Option<String>,
    pub outgoing_edges: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub company_id: Id,
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<NodeSummary>,
}

/// Nodes of a company that carry a usable id.
pub async fn company_nodes(client: &UpstreamClient, company_id: Id) -> Result<Vec<Node>, ApiError> {
    let nodes: Vec<Node> = list_records(
        client,
        Resource::Nodes,
        &[("company_id", company_id.to_string())],
    )
    .await?;
    Ok(nodes.into_iter().filter(|node| node.id.is_some()).collect())
}

/// Every edge whose source node belongs to the company, one listing per node.
pub async fn company_edges(
    client: &UpstreamClient,
    company_id: Id,
    workers: usize,
) -> Result<Vec<Value>, ApiError> {
    let nodes = company_nodes(client, company_id).await?;
    let client = client.clone();
    let per_node = fan_out(nodes, workers, move |node: &Node| {
        let client = client.clone();
        let node_id = node.id.unwrap_or_default();
        async move {
            list_records::<Value>(
                &client,
                Resource::Edges,
                &[("source_node_id", node_id.to_string())],
            )
            .await
        }
    })
    .await?;

    Ok(per_node.into_iter().flatten().collect())
}

pub async fn dashboard(
    client: &UpstreamClient,
    company_id: Id,
    workers: usize,
) -> Result<DashboardSummary, ApiError> {
    let nodes = company_nodes(client, company_id).await?;
    let client = client.clone();
    let nodes = fan_out(nodes, workers, move |node: &Node| {
        let client = client.clone();
        let node_id = node.id.unwrap_or_default();
        let prompt = node.prompt.clone();
        async move {
            let edges: Vec<Identified> = list_records(
                &client,
                Resource::Edges,
                &[("source_node_id", node_id.to_string())],
            )
            .await?;
            Ok(NodeSummary {
                node_id,
                prompt,
                outgoing_edges: edges.len(),
            })
        }
    })
    .await?;

    Ok(DashboardSummary {
        company_id,
        node_count: nodes.len(),
        edge_count: nodes.iter().map(|node| node.outgoing_edges).sum(),
        nodes,
    })
}
