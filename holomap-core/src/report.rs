// Report generation for relationship graphs

use crate::graph::{Graph, NodeKind};
use holomap_client::assets::image_url;
use petgraph::dot::{Config, Dot};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }
}

pub fn generate_report(graph: &Graph, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(graph)),
        ReportFormat::Json => generate_json_report(graph),
        ReportFormat::Markdown => Ok(generate_markdown_report(graph)),
        ReportFormat::Dot => Ok(generate_dot_report(graph)),
    }
}

pub fn generate_text_report(graph: &Graph) -> String {
    let mut report = String::new();
    let root = graph.root();

    report.push_str(RULE);
    report.push_str(&format!("  {}\n", root.label().to_uppercase()));
    report.push_str(RULE);
    report.push('\n');

    for (name, value) in root.entity.fields() {
        report.push_str(&format!("{:<14}{}\n", format!("{}:", name), value));
    }
    report.push('\n');

    for (kind, heading) in [
        (NodeKind::Film, "FILMS"),
        (NodeKind::Starship, "STARSHIPS"),
        (NodeKind::Vehicle, "VEHICLES"),
    ] {
        let nodes: Vec<_> = graph.nodes_of_kind(kind).collect();
        report.push_str(&format!("{} ({})\n", heading, nodes.len()));

        if nodes.is_empty() {
            report.push_str("  (none)\n\n");
            continue;
        }

        for (i, node) in nodes.iter().enumerate() {
            let prefix = if i == nodes.len() - 1 { "└── " } else { "├── " };
            report.push_str(&format!("{}{}  [{}]\n", prefix, node.label(), node.id));

            let detail = node
                .entity
                .fields()
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .take(3)
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect::<Vec<_>>()
                .join(" · ");
            if !detail.is_empty() {
                let bar = if i == nodes.len() - 1 { "    " } else { "│   " };
                report.push_str(&format!("{}{}\n", bar, detail));
            }
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str(&format!(
        "{} nodes, {} edges\n",
        graph.nodes().len(),
        graph.edges().len()
    ));

    report
}

pub fn generate_json_report(graph: &Graph) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Holomap",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "root_id": graph.root_id(),
            "summary": {
                "total_nodes": graph.nodes().len(),
                "total_edges": graph.edges().len(),
                "films": graph.nodes_of_kind(NodeKind::Film).count(),
                "starships": graph.nodes_of_kind(NodeKind::Starship).count(),
                "vehicles": graph.nodes_of_kind(NodeKind::Vehicle).count()
            },
            "nodes": graph.nodes(),
            "edges": graph.edges()
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(graph: &Graph) -> String {
    let mut report = String::new();
    let root = graph.root();

    report.push_str(&format!("# {}\n\n", root.label()));
    report.push_str(&format!(
        "![{}]({})\n\n",
        root.label(),
        image_url(root.entity.kind(), root.entity.id())
    ));

    report.push_str("| Field | Value |\n|---|---|\n");
    for (name, value) in root.entity.fields() {
        report.push_str(&format!("| {} | {} |\n", name, escape_cell(&value)));
    }
    report.push('\n');

    for (kind, heading) in [
        (NodeKind::Film, "Films"),
        (NodeKind::Starship, "Starships"),
        (NodeKind::Vehicle, "Vehicles"),
    ] {
        let nodes: Vec<_> = graph.nodes_of_kind(kind).collect();
        if nodes.is_empty() {
            continue;
        }

        report.push_str(&format!("## {}\n\n", heading));
        for node in nodes {
            let summary = node
                .entity
                .fields()
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .take(3)
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect::<Vec<_>>()
                .join(", ");
            report.push_str(&format!(
                "- [{}]({}) `{}` {}\n",
                node.label(),
                image_url(node.entity.kind(), node.entity.id()),
                node.id,
                summary
            ));
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "_Generated by Holomap on {}_\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    report
}

/// Graphviz rendering of the node-link diagram
pub fn generate_dot_report(graph: &Graph) -> String {
    let pg = graph.to_petgraph();
    format!("{:?}", Dot::with_config(&pg, &[Config::EdgeNoLabel]))
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
