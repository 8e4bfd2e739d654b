use colored::Colorize;
use fgt_config_core::{traverse, Children, ConfigNode, Visitor, Walk};

use crate::report::format_values;

/// Render a subtree as an indented outline with a configurable max depth.
pub fn render_tree(label: &str, children: &Children, max_depth: usize) -> String {
    let mut renderer = TreeRenderer {
        max_depth,
        out: format!("{}\n", label.bold()),
    };
    if max_depth > 0 {
        traverse(children, &mut renderer);
    }
    renderer.out
}

/// Render every setting reached by `walk` as `path = values`.
pub fn render_flat(walk: Walk<'_>) -> String {
    let mut out = String::new();
    for (path, node) in walk {
        match node {
            ConfigNode::Set(set) => out.push_str(&format!("{path} = {}\n", format_values(set))),
            ConfigNode::Unset(_) => out.push_str(&format!("{path} (unset)\n")),
            _ => {}
        }
    }
    out
}

struct TreeRenderer {
    max_depth: usize,
    out: String,
}

impl TreeRenderer {
    fn line(&mut self, depth: usize, text: String) {
        self.out.push_str(&"  ".repeat(depth));
        self.out.push_str(&text);
        self.out.push('\n');
    }
}

impl Visitor for TreeRenderer {
    fn enter(&mut self, key: &str, node: &ConfigNode, parents: &[&str]) -> bool {
        let depth = parents.len() + 1;
        let size = node.children().map_or(0, |c| c.len());
        let text = match node {
            ConfigNode::Table(_) => format!("{key} [table, {size} entries]").cyan().to_string(),
            _ => format!("{key} [{}]", node.kind()).blue().to_string(),
        };
        self.line(depth, text);
        depth < self.max_depth
    }

    fn leaf(&mut self, key: &str, node: &ConfigNode, parents: &[&str]) {
        let text = match node {
            ConfigNode::Set(set) => format!("{key} = {}", format_values(set)),
            _ => format!("{key} (unset)").dimmed().to_string(),
        };
        self.line(parents.len() + 1, text);
    }
}
