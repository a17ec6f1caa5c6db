use crate::error::ApiError;
use crate::model::{contains_id, Id, Identified};
use crate::upstream::{list_records, Resource, UpstreamClient};

/// One parent→child membership check.
///
/// Verified by listing `resource` filtered on `parent_field = parent_id` and
/// looking for `child_id` among the returned keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipStep {
    pub resource: Resource,
    pub parent_field: &'static str,
    pub parent_id: Id,
    pub child_id: Id,
}

impl OwnershipStep {
    pub fn node_in_company(company_id: Id, node_id: Id) -> Self {
        Self {
            resource: Resource::Nodes,
            parent_field: "company_id",
            parent_id: company_id,
            child_id: node_id,
        }
    }

    pub fn edge_from_node(source_node_id: Id, edge_id: Id) -> Self {
        Self {
            resource: Resource::Edges,
            parent_field: "source_node_id",
            parent_id: source_node_id,
            child_id: edge_id,
        }
    }

    pub fn condition_in_edge(edge_id: Id, condition_id: Id) -> Self {
        Self {
            resource: Resource::Conditions,
            parent_field: "edge_id",
            parent_id: edge_id,
            child_id: condition_id,
        }
    }

    pub fn condition_property_in_condition(condition_id: Id, condition_property_id: Id) -> Self {
        Self {
            resource: Resource::ConditionProperties,
            parent_field: "condition_id",
            parent_id: condition_id,
            child_id: condition_property_id,
        }
    }

    pub fn property_in_company(company_id: Id, property_id: Id) -> Self {
        Self {
            resource: Resource::Properties,
            parent_field: "company_id",
            parent_id: company_id,
            child_id: property_id,
        }
    }

    pub fn not_found_code(&self) -> String {
        format!("{}_NOT_FOUND", self.resource.singular_code())
    }

    pub async fn verify(&self, client: &UpstreamClient) -> Result<(), ApiError> {
        let children: Vec<Identified> = list_records(
            client,
            self.resource,
            &[(self.parent_field, self.parent_id.to_string())],
        )
        .await?;

        if contains_id(&children, self.child_id) {
            Ok(())
        } else {
            log::info!(
                "{} {} is not under {}={}",
                self.resource.segment(),
                self.child_id,
                self.parent_field,
                self.parent_id
            );
            Err(ApiError::not_found(self.not_found_code()))
        }
    }
}

/// Run the steps in order; the first failure ends the chain.
pub async fn verify_chain(client: &UpstreamClient, steps: &[OwnershipStep]) -> Result<(), ApiError> {
    for step in steps {
        step.verify(client).await?;
    }
    Ok(())
}

/// Builds the top-down chain Company → Node → Edge → Condition → ConditionProperty.
///
/// Each hierarchy call hangs the new level under the previous one. `node` and
/// `property` may also be used for extra company-level checks (an edge's
/// destination, a linked property) without moving the cursor.
#[derive(Debug, Clone)]
pub struct OwnershipChain {
    company_id: Id,
    cursor: Option<Id>,
    steps: Vec<OwnershipStep>,
}

impl OwnershipChain {
    pub fn for_company(company_id: Id) -> Self {
        Self {
            company_id,
            cursor: None,
            steps: Vec::new(),
        }
    }

    pub fn node(mut self, node_id: Id) -> Self {
        self.steps
            .push(OwnershipStep::node_in_company(self.company_id, node_id));
        if self.cursor.is_none() {
            self.cursor = Some(node_id);
        }
        self
    }

    pub fn edge(mut self, edge_id: Id) -> Self {
        let node_id = self.cursor.unwrap_or_default();
        self.steps.push(OwnershipStep::edge_from_node(node_id, edge_id));
        self.cursor = Some(edge_id);
        self
    }

    pub fn condition(mut self, condition_id: Id) -> Self {
        let edge_id = self.cursor.unwrap_or_default();
        self.steps
            .push(OwnershipStep::condition_in_edge(edge_id, condition_id));
        self.cursor = Some(condition_id);
        self
    }

    pub fn condition_property(mut self, condition_property_id: Id) -> Self {
        let condition_id = self.cursor.unwrap_or_default();
        self.steps.push(OwnershipStep::condition_property_in_condition(
            condition_id,
            condition_property_id,
        ));
        self.cursor = Some(condition_property_id);
        self
    }

    pub fn property(mut self, property_id: Id) -> Self {
        self.steps
            .push(OwnershipStep::property_in_company(self.company_id, property_id));
        self
    }

    pub fn steps(&self) -> &[OwnershipStep] {
        &self.steps
    }

    pub async fn verify(&self, client: &UpstreamClient) -> Result<(), ApiError> {
        verify_chain(client, &self.steps).await
    }
}
