//! Notifications a session raises for its host.

use serde::Serialize;

use crate::geometry::PositionMap;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphEvent {
    /// A node was clicked and its focus cycle started.
    #[serde(rename_all = "camelCase")]
    NodeFocused { node_id: String },

    /// Node positions reached a resting layout (after a load or a completed
    /// focus cycle).
    LayoutSettled { positions: PositionMap },

    /// The host should open `url`.
    #[serde(rename_all = "camelCase")]
    Navigate { url: String, open_in_new_tab: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = GraphEvent::Navigate {
            url: "https://example.org".into(),
            open_in_new_tab: true,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"navigate","url":"https://example.org","openInNewTab":true}"#
        );

        let event = GraphEvent::NodeFocused { node_id: "7".into() };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"nodeFocused","nodeId":"7"}"#
        );
    }
}
