use colored::Colorize;
use fgt_config_core::{Config, ConfigNode, SectionMismatch, SetCommand};
use serde::Serialize;

/// One top-level section in the `sections` report.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    pub name: String,
    pub kind: &'static str,
    pub entries: usize,
}

/// Payload of the `sections` command.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub scope: String,
    pub sections: Vec<SectionRow>,
    pub mismatches: Vec<SectionMismatch>,
}

/// Payload of the `vdoms` command.
#[derive(Debug, Clone, Serialize)]
pub struct VdomReport {
    pub has_vdom: bool,
    pub model: Option<String>,
    pub version: Option<String>,
    pub global_sections: usize,
    pub vdoms: Vec<VdomRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VdomRow {
    pub name: String,
    pub sections: usize,
}

/// Set values separated by spaces, quoted ones written back with quotes.
pub fn format_values(set: &SetCommand) -> String {
    set.tokens()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Output of the `get` command for a resolved node.
pub fn render_node_value(node: &ConfigNode) -> String {
    match node {
        ConfigNode::Set(set) => set.values().join(" "),
        ConfigNode::Unset(_) => "(unset)".to_string(),
        _ => node
            .children()
            .map(|children| {
                children
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default(),
    }
}

pub fn render_sections(report: &SectionReport) -> String {
    let mut out = Vec::new();
    out.push(format!("sections scope={}", report.scope));
    for row in &report.sections {
        out.push(format!(
            "- {}: kind={} entries={}",
            row.name, row.kind, row.entries
        ));
    }
    for mismatch in &report.mismatches {
        out.push(
            format!(
                "! {}: expected={} found={}",
                mismatch.name, mismatch.expected, mismatch.found
            )
            .yellow()
            .to_string(),
        );
    }
    out.join("\n")
}

pub fn build_vdom_report(config: &Config) -> VdomReport {
    VdomReport {
        has_vdom: config.has_vdom(),
        model: config.header().model(),
        version: config.header().version(),
        global_sections: config.root().sections(None).count(),
        vdoms: config
            .vdoms()
            .iter()
            .map(|(name, root)| VdomRow {
                name: name.clone(),
                sections: root.sections(None).count(),
            })
            .collect(),
    }
}

pub fn render_vdoms(report: &VdomReport) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "model={} version={} has_vdom={}",
        report.model.as_deref().unwrap_or("unknown"),
        report.version.as_deref().unwrap_or("unknown"),
        report.has_vdom
    ));
    out.push(format!("global sections={}", report.global_sections));
    if report.vdoms.is_empty() {
        out.push("no vdoms configured".dimmed().to_string());
    }
    for row in &report.vdoms {
        out.push(
            format!("- vdom {}: sections={}", row.name, row.sections)
                .green()
                .to_string(),
        );
    }
    out.join("\n")
}
