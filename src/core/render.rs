//! Text rendering of a [`HeadyTree`].
//!
//! Stacks lean left: children are printed above their parent, child `i` one
//! column further right than child `i - 1`, and `|/` lines join them back down.
//!
//! ```text
//! * 5d1c0a2e {heady-2} origin/b (in sync) Second change
//! | * 77b0e1f3 Experiment
//! |/
//! @ 0e9f2b61 origin/a (local newer) First change
//! | . 3c1a9d07 origin/old (merged) Landed already
//! |/
//! * 9a8b7c6d {origin/main} Trunk commit
//! :
//! ```

use crate::core::tree::{CommitNode, HeadyTree};
use colored::*;

struct Renderer<'a> {
    tree: &'a HeadyTree,
    head: Option<&'a str>,
    color: bool,
    lines: Vec<String>,
}

impl Renderer<'_> {
    fn root(&mut self, node: &CommitNode) {
        let tree = self.tree;
        let children: Vec<&CommitNode> = tree.children(node).collect();
        for (i, child) in children.iter().enumerate() {
            self.subtree(child, 1 + i);
        }
        self.splits(0, children.len());
        self.node_line(node, 0);
        self.lines.push(":".to_string());
    }

    fn subtree(&mut self, node: &CommitNode, indent: usize) {
        let tree = self.tree;
        let children: Vec<&CommitNode> = tree.children(node).collect();
        for (i, child) in children.iter().enumerate() {
            self.subtree(child, indent + i);
        }
        self.splits(indent, children.len().saturating_sub(1));
        self.node_line(node, indent);
    }

    fn splits(&mut self, indent: usize, count: usize) {
        for i in ((indent + 1)..=(indent + count)).rev() {
            self.lines.push(format!("{}|/", "| ".repeat(i - 1)));
        }
    }

    fn glyph(&self, node: &CommitNode) -> ColoredString {
        if self.head == Some(node.sha()) {
            self.paint("@", |s| s.green().bold())
        } else if node.is_hidden || node.is_merged() {
            self.paint(".", |s| s.bright_black())
        } else {
            self.paint("*", |s| s.normal())
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> ColoredString {
        if self.color {
            style(text)
        } else {
            text.normal()
        }
    }

    fn node_line(&mut self, node: &CommitNode, indent: usize) {
        let mut line = format!(
            "{}{} {}",
            "| ".repeat(indent),
            self.glyph(node),
            self.paint(node.commit.short_sha(), |s| s.yellow())
        );

        let names: Vec<&str> = node
            .refs
            .iter()
            .chain(node.labels.iter())
            .map(String::as_str)
            .collect();
        if !names.is_empty() {
            let names = format!("{{{}}}", names.join(","));
            line.push_str(&format!(" {}", self.paint(&names, |s| s.cyan())));
        }

        for upstream in &node.upstreams {
            let state = format!("({})", upstream.state(&node.commit).as_str());
            line.push_str(&format!(
                " {} {}",
                self.paint(&upstream.name, |s| s.blue()),
                self.paint(&state, |s| s.bright_black())
            ));
        }
        if node.is_merged() {
            line.push_str(&format!(" {}", self.paint("(merged)", |s| s.magenta())));
        }

        line.push(' ');
        line.push_str(node.commit.summary());
        self.lines.push(line);
    }
}

/// Render every trunk root (newest first), then every orphan stack.
pub fn render_tree(tree: &HeadyTree, head: Option<&str>, color: bool) -> String {
    let mut renderer = Renderer {
        tree,
        head,
        color,
        lines: Vec::new(),
    };
    for node in &tree.trunk_nodes {
        renderer.root(node);
    }
    for sha in &tree.orphan_roots {
        if let Some(node) = tree.commit_nodes.get(sha) {
            renderer.root(node);
        }
    }
    renderer.lines.join("\n")
}
