//! Mermaid diagrams generated from a document's components.

use std::collections::HashSet;

use super::{TaskDesignDocument, DEFAULT_ARCHITECTURE};

/// Turns a component name into a Mermaid node identifier.
///
/// Case is preserved. Each run of characters outside `[A-Za-z0-9]` becomes a
/// single `_`, and leading or trailing underscores are dropped. A name with
/// no alphanumeric characters becomes `node`.
#[must_use]
pub fn sanitize_for_mermaid(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "node".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Renders the document's components and dependencies as a top-to-bottom graph.
///
/// Returns [`DEFAULT_ARCHITECTURE`] when there are no components. Names that
/// sanitize to the same identifier share one node.
#[must_use]
pub fn generate_architecture_diagram(doc: &TaskDesignDocument) -> String {
    if doc.components.is_empty() {
        return DEFAULT_ARCHITECTURE.to_string();
    }

    let mut lines = vec!["graph TB".to_string()];
    let mut seen = HashSet::new();
    for component in &doc.components {
        let id = sanitize_for_mermaid(&component.name);
        if seen.insert(id.clone()) {
            lines.push(format!("    {id}[\"{}\"]", escape_label(&component.name)));
        }
    }

    let mut edges = HashSet::new();
    for component in &doc.components {
        let from = sanitize_for_mermaid(&component.name);
        for dependency in &component.dependencies {
            let to = sanitize_for_mermaid(dependency);
            if edges.insert((from.clone(), to.clone())) {
                lines.push(format!("    {from} --> {to}"));
            }
        }
    }

    lines.join("\n")
}

fn escape_label(name: &str) -> String {
    name.replace('"', "#quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::ComponentDescription;

    fn component(name: &str, deps: &[&str]) -> ComponentDescription {
        ComponentDescription {
            name: name.to_string(),
            purpose: String::new(),
            interfaces: vec![],
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    #[test]
    fn sanitize_collapses_runs_and_trims() {
        assert_eq!(sanitize_for_mermaid("API Gateway"), "API_Gateway");
        assert_eq!(sanitize_for_mermaid("  auth--service (v2)  "), "auth_service_v2");
        assert_eq!(sanitize_for_mermaid("__db__"), "db");
        assert_eq!(sanitize_for_mermaid("!!!"), "node");
    }

    #[test]
    fn empty_components_give_placeholder() {
        let doc = TaskDesignDocument::scaffold("TASK-1");
        assert_eq!(generate_architecture_diagram(&doc), DEFAULT_ARCHITECTURE);
    }

    #[test]
    fn nodes_and_edges() {
        let mut doc = TaskDesignDocument::scaffold("TASK-1");
        doc.components = vec![
            component("API Gateway", &["Auth Service", "Billing"]),
            component("Auth Service", &["Key \"Store\""]),
        ];

        let diagram = generate_architecture_diagram(&doc);
        assert_eq!(
            diagram,
            "graph TB\n    API_Gateway[\"API Gateway\"]\n    Auth_Service[\"Auth Service\"]\n    \
             API_Gateway --> Auth_Service\n    API_Gateway --> Billing\n    \
             Auth_Service --> Key_Store"
        );
    }

    #[test]
    fn colliding_names_share_a_node() {
        let mut doc = TaskDesignDocument::scaffold("TASK-1");
        doc.components = vec![component("user-store", &[]), component("user store", &[])];

        let diagram = generate_architecture_diagram(&doc);
        assert_eq!(diagram.matches("user_store[").count(), 1);
    }
}
