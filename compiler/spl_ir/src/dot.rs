//! Graphviz export of the syntax tree.
//!
//! Nodes are numbered in pre-order starting at 1, and every edge points from
//! a parent to one of its children in order.

use std::fmt::Write;

use crate::ast::{AstNode, Program};

/// Render `program` as a DOT digraph.
pub fn to_dot(program: &Program) -> String {
    let mut out = String::from("digraph AST {\n");
    let mut next_id = 1_usize;
    let root = next_id;
    next_id += 1;
    node_line(&mut out, root, "program");
    for stmt in &program.body {
        let child = write_node(&mut out, AstNode::Stmt(stmt), &mut next_id);
        edge_line(&mut out, root, child);
    }
    out.push_str("}\n");
    out
}

fn write_node(out: &mut String, node: AstNode<'_>, next_id: &mut usize) -> usize {
    let id = *next_id;
    *next_id += 1;
    node_line(out, id, &node.label());
    for child in node.children() {
        let child_id = write_node(out, child, next_id);
        edge_line(out, id, child_id);
    }
    id
}

fn node_line(out: &mut String, id: usize, label: &str) {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    // Writing into a String cannot fail.
    let _ = writeln!(out, "  n{id} [label=\"{escaped}\"];");
}

fn edge_line(out: &mut String, from: usize, to: usize) {
    let _ = writeln!(out, "  n{from} -> n{to};");
}
