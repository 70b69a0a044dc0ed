//! Render model + emitters.
//!
//! Turns a [`NetworkGraph`] into node/edge descriptors and prints them as
//! Graphviz DOT or JSON. Every node attribute is resolved through an ordered
//! rule table (`&Entity -> Option<T>`, first match wins), so precedence is
//! spelled out in one place per attribute:
//!
//! | attribute | rules |
//! |---|---|
//! | shape | `Shape` attr → `Type` symbol table → `doublecircle` |
//! | title | `DisplayName` attr → name before the first `:` |
//! | label | e-signature: blurb only → title + blurb + details |
//! | margin | e-signature: `0.8` → `1.2` |
//! | outline | untyped or `Type unknown`: red → black |

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use netmap_graph::{Entity, MetaValue, NetworkGraph};
use serde::{Deserialize, Serialize};

pub const ATTR_TYPE: &str = "Type";
pub const ATTR_SHAPE: &str = "Shape";
pub const ATTR_BLURB: &str = "Blurb";
pub const ATTR_DISPLAY_NAME: &str = "DisplayName";

const E_SIGNATURE: &str = "e-signature";
const UNKNOWN_TYPE: &str = "unknown";

/// Attributes that never show up in the details dump.
const HIDDEN_ATTRS: &[&str] = &[ATTR_BLURB, ATTR_SHAPE, ATTR_DISPLAY_NAME];

/// Lowercased `Type` → Graphviz shape.
const SYMBOL_SHAPES: &[(&str, &str)] = &[
    ("server", "cylinder"),
    ("router", "diamond"),
    ("switch", "invtriangle"),
    ("laptop", "box3d"),
    ("pc", "box3d"),
    ("phone", "box3d"),
    ("virtualmachine", "circle"),
    ("location", "Msquare"),
    ("site", "Msquare"),
    ("unknown", "doublecircle"),
    ("component", "component"),
    ("note", "note"),
    ("group", "folder"),
    ("subgroup", "tab"),
    ("e-signature", "signature"),
];

/// Lowercased relation kind → edge color.
const EDGE_COLORS: &[(&str, &str)] = &[
    ("telnet", "red"),
    ("ethernet", "blue"),
    ("wifi", "green"),
    ("physical", "black"),
    ("unknown", "grey"),
];

const FALLBACK_EDGE_COLOR: &str = "grey";

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Graphviz layout engine (also the program invoked for image output).
    pub engine: String,
    pub splines: String,
    pub overlap: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            engine: "neato".to_string(),
            splines: "ortho".to_string(),
            overlap: false,
        }
    }
}

// ============================================================================
// Resolution rules
// ============================================================================

pub type Rule<T> = fn(&Entity) -> Option<T>;

pub fn resolve<T>(entity: &Entity, rules: &[Rule<T>]) -> Option<T> {
    rules.iter().find_map(|rule| rule(entity))
}

fn first_value<'a>(entity: &'a Entity, attribute: &str) -> Option<&'a str> {
    entity.attr(attribute).map(MetaValue::first)
}

fn normalized_type(entity: &Entity) -> Option<String> {
    first_value(entity, ATTR_TYPE).map(|t| {
        t.to_lowercase()
            .replace("virtual_machine", "virtualmachine")
            .replace("virtual machine", "virtualmachine")
    })
}

fn is_e_signature(entity: &Entity) -> bool {
    normalized_type(entity).is_some_and(|t| t == E_SIGNATURE)
}

fn explicit_shape(entity: &Entity) -> Option<String> {
    first_value(entity, ATTR_SHAPE)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn symbol_shape(ty: &str) -> Option<String> {
    SYMBOL_SHAPES
        .iter()
        .find(|(name, _)| *name == ty)
        .map(|(_, shape)| shape.to_string())
}

fn shape_from_type(entity: &Entity) -> Option<String> {
    symbol_shape(&normalized_type(entity)?)
}

fn unknown_shape(_: &Entity) -> Option<String> {
    symbol_shape(UNKNOWN_TYPE)
}

pub const SHAPE_RULES: &[Rule<String>] = &[explicit_shape, shape_from_type, unknown_shape];

fn display_name(entity: &Entity) -> Option<String> {
    first_value(entity, ATTR_DISPLAY_NAME).map(str::to_string)
}

fn name_before_colon(entity: &Entity) -> Option<String> {
    let name = entity.name.as_str();
    Some(name.split_once(':').map_or(name, |(head, _)| head).to_string())
}

pub const TITLE_RULES: &[Rule<String>] = &[display_name, name_before_colon];

fn e_signature_label(entity: &Entity) -> Option<String> {
    is_e_signature(entity).then(|| blurb(entity))
}

fn full_label(entity: &Entity) -> Option<String> {
    let title = resolve(entity, TITLE_RULES).unwrap_or_default();
    Some(format!("{title}{}\n{}", blurb(entity), details(entity)))
}

pub const LABEL_RULES: &[Rule<String>] = &[e_signature_label, full_label];

fn e_signature_margin(entity: &Entity) -> Option<String> {
    is_e_signature(entity).then(|| "0.8".to_string())
}

fn default_margin(_: &Entity) -> Option<String> {
    Some("1.2".to_string())
}

pub const MARGIN_RULES: &[Rule<String>] = &[e_signature_margin, default_margin];

fn untyped_outline(entity: &Entity) -> Option<String> {
    let untyped = match normalized_type(entity) {
        None => true,
        Some(ty) => ty == UNKNOWN_TYPE,
    };
    untyped.then(|| "red".to_string())
}

fn default_outline(_: &Entity) -> Option<String> {
    Some("black".to_string())
}

pub const OUTLINE_RULES: &[Rule<String>] = &[untyped_outline, default_outline];

/// Blurb text prefixed with a newline, with a line break after each `.`.
pub fn blurb(entity: &Entity) -> String {
    match entity.attr(ATTR_BLURB) {
        Some(v) => format!("\n{}", v.values().join("\n").replace('.', ".\n")),
        None => String::new(),
    }
}

/// Pretty JSON dump of the visible metadata (sorted keys, no outer braces).
pub fn details(entity: &Entity) -> String {
    let visible: BTreeMap<&str, &MetaValue> = entity
        .metadata
        .iter()
        .filter(|(k, _)| !HIDDEN_ATTRS.contains(&k.as_str()))
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if visible.serialize(&mut ser).is_err() {
        return String::new();
    }
    let json = String::from_utf8(buf).unwrap_or_default();
    json.strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or("")
        .to_string()
}

pub fn edge_color(kind: &str) -> &'static str {
    let kind = kind.to_lowercase();
    EDGE_COLORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_EDGE_COLOR)
}

// ============================================================================
// Render model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: usize,
    pub name: String,
    pub label: String,
    pub tooltip: String,
    pub shape: String,
    pub outline_color: String,
    pub margin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub from_id: usize,
    pub to_id: usize,
    pub color: String,
    /// Always `both`: connections are drawn without a direction.
    pub direction: String,
    pub label: String,
}

impl EdgeView {
    pub fn is_self_loop(&self) -> bool {
        self.from_id == self.to_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

pub fn node_view(id: usize, entity: &Entity) -> NodeView {
    NodeView {
        id,
        name: entity.name.clone(),
        label: resolve(entity, LABEL_RULES).unwrap_or_default(),
        tooltip: details(entity),
        shape: resolve(entity, SHAPE_RULES).unwrap_or_default(),
        outline_color: resolve(entity, OUTLINE_RULES).unwrap_or_default(),
        margin: resolve(entity, MARGIN_RULES).unwrap_or_default(),
    }
}

pub fn build_render_graph(graph: &NetworkGraph) -> RenderGraph {
    let nodes: Vec<NodeView> = graph
        .entities
        .values()
        .enumerate()
        .map(|(id, entity)| node_view(id, entity))
        .collect();

    // One edge per unordered endpoint pair and (lowercased) kind.
    let mut seen: HashSet<(usize, usize, String)> = HashSet::new();
    let mut edges = Vec::new();
    for row in &graph.rows {
        let (Some(from_id), Some(to_id)) = (graph.index_of(&row.from), graph.index_of(&row.to)) else {
            tracing::warn!(from = %row.from, to = %row.to, "row references an unknown entity");
            continue;
        };
        // Rows of entities without relations only place the node.
        if graph.entities[from_id].relations.is_empty() {
            continue;
        }
        let label = row.kind.to_lowercase();
        let key = (from_id.min(to_id), from_id.max(to_id), label.clone());
        if !seen.insert(key) {
            continue;
        }
        edges.push(EdgeView {
            from_id,
            to_id,
            color: edge_color(&label).to_string(),
            direction: "both".to_string(),
            label,
        });
    }

    RenderGraph { nodes, edges }
}

// ============================================================================
// Emitters
// ============================================================================

/// Escape text for a quoted DOT string.
///
/// Graphviz label escapes (`\n`, `\l`, `\r`) written in the input are kept so
/// blurbs can force line breaks; any other backslash is doubled.
fn dot_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\\' => match chars.peek() {
                Some('n' | 'l' | 'r') => out.push('\\'),
                _ => out.push_str("\\\\"),
            },
            other => out.push(other),
        }
    }
    out
}

fn node_id(id: usize) -> String {
    format!("n{id}")
}

pub fn render_dot(g: &RenderGraph, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("digraph netmap {\n");
    out.push_str(&format!("  layout=\"{}\";\n", dot_escape(&options.engine)));
    out.push_str(&format!("  splines=\"{}\";\n", dot_escape(&options.splines)));
    out.push_str(&format!("  overlap={};\n\n", options.overlap));

    for n in &g.nodes {
        let attrs = [
            format!("label=\"{}\"", dot_escape(&n.label)),
            format!("tooltip=\"{}\"", dot_escape(&n.tooltip)),
            format!("shape=\"{}\"", dot_escape(&n.shape)),
            format!("color=\"{}\"", dot_escape(&n.outline_color)),
            format!("margin=\"{}\"", dot_escape(&n.margin)),
        ];
        out.push_str(&format!("  {} [{}];\n", node_id(n.id), attrs.join(", ")));
    }
    if !g.nodes.is_empty() {
        out.push('\n');
    }

    for e in &g.edges {
        // Self-loops leave from the south-west port so they stay visible.
        let src = if e.is_self_loop() {
            format!("{}:sw", node_id(e.from_id))
        } else {
            node_id(e.from_id)
        };
        out.push_str(&format!(
            "  {src} -> {} [color=\"{}\", dir={}, label=\"{}\"];\n",
            node_id(e.to_id),
            dot_escape(&e.color),
            e.direction,
            dot_escape(&e.label)
        ));
    }

    out.push_str("}\n");
    out
}

pub fn render_json(g: &RenderGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(g)?)
}

// =============================================================================
// Tests
// =============================================================================
