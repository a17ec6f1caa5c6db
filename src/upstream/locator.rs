use reqwest::Url;

use crate::model::Id;

/// Resource collections exposed by the upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Companies,
    Nodes,
    Edges,
    Conditions,
    ConditionProperties,
    Properties,
    NodeProperties,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Companies,
        Resource::Nodes,
        Resource::Edges,
        Resource::Conditions,
        Resource::ConditionProperties,
        Resource::Properties,
        Resource::NodeProperties,
    ];

    /// Last path segment of the collection URL.
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::Nodes => "nodes",
            Resource::Edges => "edges",
            Resource::Conditions => "conditions",
            Resource::ConditionProperties => "condition-properties",
            Resource::Properties => "properties",
            Resource::NodeProperties => "node-properties",
        }
    }

    /// Error-code prefix for collection-level failures, e.g. `EDGES_FETCH_FAILED`.
    pub fn plural_code(self) -> &'static str {
        match self {
            Resource::Companies => "COMPANIES",
            Resource::Nodes => "NODES",
            Resource::Edges => "EDGES",
            Resource::Conditions => "CONDITIONS",
            Resource::ConditionProperties => "CONDITION_PROPERTIES",
            Resource::Properties => "PROPERTIES",
            Resource::NodeProperties => "NODE_PROPERTIES",
        }
    }

    /// Error-code prefix for single-record failures, e.g. `EDGE_NOT_FOUND`.
    pub fn singular_code(self) -> &'static str {
        match self {
            Resource::Companies => "COMPANY",
            Resource::Nodes => "NODE",
            Resource::Edges => "EDGE",
            Resource::Conditions => "CONDITION",
            Resource::ConditionProperties => "CONDITION_PROPERTY",
            Resource::Properties => "PROPERTY",
            Resource::NodeProperties => "NODE_PROPERTY",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Resource> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.segment() == segment)
    }
}

/// Derives per-resource upstream URLs from the single configured endpoint.
#[derive(Debug, Clone)]
pub struct ServiceLocator {
    base: Option<Url>,
}

impl ServiceLocator {
    /// A missing or unparseable base URL is kept as "not configured"; nothing fails here.
    pub fn new(base_url: Option<&str>) -> Self {
        let base = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .and_then(|url| Url::parse(url).ok())
            .filter(|url| !url.cannot_be_a_base());

        if base_url.is_some() && base.is_none() {
            log::warn!("Upstream base URL is malformed; upstream routes will fail");
        }

        Self { base }
    }

    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    /// Collection URL for `resource`, always ending in a slash.
    ///
    /// A trailing known-resource segment on the base is replaced, so any
    /// resource URL of the upstream works as the configured base.
    pub fn resource_url(&self, resource: Resource) -> Option<String> {
        let mut url = self.base.clone()?;
        url.set_query(None);
        url.set_fragment(None);

        let mut segments: Vec<String> = url
            .path_segments()?
            .map(|segment| segment.to_string())
            .collect();
        if segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }
        if segments
            .last()
            .is_some_and(|segment| Resource::from_segment(segment).is_some())
        {
            segments.pop();
        }
        segments.push(resource.segment().to_string());

        let mut path = String::new();
        for segment in &segments {
            path.push('/');
            path.push_str(segment);
        }
        path.push('/');
        url.set_path(&path);

        Some(url.to_string())
    }

    pub fn item_url(&self, resource: Resource, id: Id) -> Option<String> {
        self.resource_url(resource)
            .map(|collection| format!("{}{}/", collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_trailing_resource_segment() {
        let locator = ServiceLocator::new(Some("http://upstream:8000/api/nodes"));
        assert_eq!(
            locator.resource_url(Resource::Edges).as_deref(),
            Some("http://upstream:8000/api/edges/")
        );
        assert_eq!(
            locator.resource_url(Resource::ConditionProperties).as_deref(),
            Some("http://upstream:8000/api/condition-properties/")
        );
    }

    #[test]
    fn test_keeps_unknown_segments_and_handles_trailing_slash() {
        let locator = ServiceLocator::new(Some("http://upstream/api/"));
        assert_eq!(
            locator.resource_url(Resource::Companies).as_deref(),
            Some("http://upstream/api/companies/")
        );

        let locator = ServiceLocator::new(Some("http://upstream/api/node-properties/?x=1"));
        assert_eq!(
            locator.resource_url(Resource::Properties).as_deref(),
            Some("http://upstream/api/properties/")
        );

        let locator = ServiceLocator::new(Some("http://upstream"));
        assert_eq!(
            locator.resource_url(Resource::Nodes).as_deref(),
            Some("http://upstream/nodes/")
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let locator = ServiceLocator::new(Some("https://example.com/v1/conditions/"));
        let first = locator.resource_url(Resource::Edges);
        let second = locator.resource_url(Resource::Edges);
        assert_eq!(first, second);

        // Feeding a resolved URL back in resolves to the same place.
        let again = ServiceLocator::new(first.as_deref()).resource_url(Resource::Edges);
        assert_eq!(first, again);
    }

    #[test]
    fn test_item_url() {
        let locator = ServiceLocator::new(Some("http://upstream/api/nodes"));
        assert_eq!(
            locator.item_url(Resource::Nodes, 7).as_deref(),
            Some("http://upstream/api/nodes/7/")
        );
    }

    #[test]
    fn test_missing_or_malformed_base_is_unconfigured() {
        assert!(!ServiceLocator::new(None).is_configured());
        assert!(ServiceLocator::new(Some("   ")).resource_url(Resource::Nodes).is_none());
        assert!(ServiceLocator::new(Some("not a url")).resource_url(Resource::Nodes).is_none());
        assert!(ServiceLocator::new(Some("mailto:ops@example.com"))
            .resource_url(Resource::Nodes)
            .is_none());
    }
}
