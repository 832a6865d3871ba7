//! Input descriptor consumed from the data-loading host.
//!
//! Expected shape:
//!
//! ```json
//! { "nodes": [{ "id": "a", "label": "A", "url": "https://…", "size": 3, "color": "#f00" }],
//!   "edges": [{ "id": "e1", "source": "a", "target": "b" }] }
//! ```
//!
//! Every field is optional and leniently typed; the engine decides what to do
//! with incomplete entries.

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::lenient;

/// Raw size assumed for nodes that carry no usable `size`.
pub const DEFAULT_RAW_SIZE: f64 = 24.0;

/// A node as described by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeSpec {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::finite")]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_empty")]
    pub color: Option<String>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The raw importance value, defaulted when absent.
    pub fn raw_size(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_RAW_SIZE)
    }
}

/// An edge as described by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EdgeSpec {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub target: Option<String>,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// `{ nodes, edges? }` as handed over by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub nodes: Vec<NodeSpec>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub edges: Option<Vec<EdgeSpec>>,
}

impl GraphData {
    pub fn new(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
        Self {
            nodes,
            edges: Some(edges),
        }
    }

    /// True when the edge list is missing or empty.
    pub fn needs_edges(&self) -> bool {
        self.edges.as_ref().is_none_or(|edges| edges.is_empty())
    }

    /// Parse a payload that should be JSON but may be wrapped in other text
    /// (for example markup emitted around it by a CMS).
    ///
    /// The whole payload is tried first; failing that, the slice from the
    /// first `{` to the last `}`.
    pub fn from_json_lenient(text: &str) -> Result<Self, DataError> {
        let trimmed = text.trim();
        let first_error = match serde_json::from_str(trimmed) {
            Ok(data) => return Ok(data),
            Err(err) => err,
        };

        match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(first), Some(last)) if last > first => {
                serde_json::from_str(&trimmed[first..=last]).map_err(DataError::from)
            }
            _ if trimmed.is_empty() || !trimmed.contains('{') => Err(DataError::NoJsonObject {
                preview: trimmed.chars().take(40).collect(),
            }),
            _ => Err(DataError::Json(first_error)),
        }
    }

    /// Build nodes from the compact inline form
    /// `label|url|#hex; label2|url2; label3`.
    ///
    /// Entries are separated by `;`, fields by `|`. Entries with an empty
    /// label are skipped. Ids are assigned `"1"`, `"2"`, … in order and no
    /// edges are produced.
    pub fn from_inline_nodes(spec: &str) -> Self {
        let nodes = spec
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let mut fields = entry.split('|').map(str::trim);
                let label = fields.next().filter(|l| !l.is_empty())?;
                let url = fields.next().filter(|u| !u.is_empty());
                let color = fields.next().filter(|c| !c.is_empty());
                Some((label, url, color))
            })
            .enumerate()
            .map(|(i, (label, url, color))| NodeSpec {
                id: Some((i + 1).to_string()),
                label: Some(label.to_string()),
                url: url.map(str::to_string),
                size: None,
                color: color.map(str::to_string),
            })
            .collect();

        Self {
            nodes,
            edges: Some(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let data = GraphData::from_json_lenient(
            r#"{"nodes":[{"id":1,"label":"One","size":5},{"id":"b","url":""}],
                "edges":[{"source":1,"target":"b"}]}"#,
        )
        .unwrap();

        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].id.as_deref(), Some("1"));
        assert_eq!(data.nodes[0].raw_size(), 5.0);
        assert_eq!(data.nodes[1].url, None);
        assert_eq!(data.nodes[1].raw_size(), DEFAULT_RAW_SIZE);

        let edges = data.edges.unwrap();
        assert_eq!(edges[0].source.as_deref(), Some("1"));
        assert_eq!(edges[0].target.as_deref(), Some("b"));
    }

    #[test]
    fn test_wrapped_payload_is_extracted() {
        let data = GraphData::from_json_lenient(
            "<p>[graph]</p>{\"nodes\":[{\"id\":\"x\"}]}<p>[/graph]</p>",
        )
        .unwrap();
        assert_eq!(data.nodes.len(), 1);
    }

    #[test]
    fn test_payload_without_object_fails() {
        let err = GraphData::from_json_lenient("<html>not found</html>").unwrap_err();
        assert!(matches!(err, DataError::NoJsonObject { .. }));
    }

    #[test]
    fn test_broken_object_reports_json_error() {
        let err = GraphData::from_json_lenient("{\"nodes\": [}").unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[test]
    fn test_non_array_nodes_are_ignored() {
        let data = GraphData::from_json_lenient(r#"{"nodes":"oops","edges":5}"#).unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.needs_edges());
    }

    #[test]
    fn test_inline_nodes() {
        let data = GraphData::from_inline_nodes(
            " Alpha | https://a.example | #ff0000 ; |skipped ; Beta ;Gamma|https://g.example;",
        );

        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.nodes[0].id.as_deref(), Some("1"));
        assert_eq!(data.nodes[0].label.as_deref(), Some("Alpha"));
        assert_eq!(data.nodes[0].url.as_deref(), Some("https://a.example"));
        assert_eq!(data.nodes[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(data.nodes[1].id.as_deref(), Some("2"));
        assert_eq!(data.nodes[1].label.as_deref(), Some("Beta"));
        assert_eq!(data.nodes[1].url, None);
        assert_eq!(data.nodes[2].url.as_deref(), Some("https://g.example"));
        assert!(data.needs_edges());
    }
}
