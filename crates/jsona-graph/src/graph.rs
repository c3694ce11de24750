//! # Generic Model Graph
//!
//! [`ModelGraph`] is a ready-made [`ModelMapper`] for callers that do not have
//! typed domain models. Every resource becomes a [`Node`] in an arena and every
//! model handle is a [`NodeId`] into it.
//!
//! Relationships are stored as `NodeId`s, so a cyclic document produces a
//! cyclic graph without reference counting; dropping the `ModelGraph` frees
//! the whole thing.

use crate::document::{JsonMap, ResourceId};
use crate::mapper::{
    LinksSupport, MetaSupport, ModelMapper, Related, RelationshipLinksSupport,
    RelationshipMetaSupport, Relationships,
};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display};

/// Handle to a node of a [`ModelGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One deserialized resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub kind: String,
    pub id: Option<ResourceId>,
    pub attributes: JsonMap,
    pub meta: Option<JsonMap>,
    pub links: Option<JsonMap>,
    pub relationships: Option<Relationships<NodeId>>,
    pub relationship_meta: BTreeMap<String, JsonMap>,
    pub relationship_links: BTreeMap<String, JsonMap>,
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.kind, id),
            None => write!(f, "{}:?", self.kind),
        }
    }
}

/// Arena of nodes built from JSON:API documents.
#[derive(Debug, Default)]
pub struct ModelGraph {
    nodes: Vec<Node>,
    accepted: Option<HashSet<String>>,
}

impl ModelGraph {
    /// A graph that accepts every resource type.
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph that only builds the listed types and declines the rest.
    pub fn accepting<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: Vec::new(),
            accepted: Some(kinds.into_iter().map(Into::into).collect()),
        }
    }

    /// # Panics
    /// If `id` was not handed out by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The resolved value of relationship `name` on node `id`.
    pub fn related(&self, id: NodeId, name: &str) -> Option<&Related<NodeId>> {
        self.get(id)?.relationships.as_ref()?.get(name)
    }

    /// First node with the given type and id. Numeric ids match their decimal text.
    pub fn find(&self, kind: &str, id: &str) -> Option<NodeId> {
        self.nodes().find_map(|(node_id, node)| {
            let same_id = node.id.as_ref().is_some_and(|own| own.to_string() == id);
            (node.kind == kind && same_id).then_some(node_id)
        })
    }

    /// Renders the graph reachable from `root` as an indented tree.
    ///
    /// Relationships are expanded down to `depth` levels. A node that was
    /// already printed is shown once more by name only, which is how cycles
    /// appear in the output.
    pub fn render(&self, root: NodeId, depth: usize) -> String {
        Tree {
            graph: self,
            root,
            depth,
        }
        .to_string()
    }
}

/// Display adapter behind [`ModelGraph::render`].
struct Tree<'g> {
    graph: &'g ModelGraph,
    root: NodeId,
    depth: usize,
}

impl Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = HashSet::new();
        self.node(f, self.root, 0, self.depth, &mut seen)
    }
}

impl Tree<'_> {
    fn node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        indent: usize,
        remaining: usize,
        seen: &mut HashSet<NodeId>,
    ) -> fmt::Result {
        let pad = "  ".repeat(indent);
        let Some(node) = self.graph.get(id) else {
            return writeln!(f, "{pad}{id} (unknown)");
        };
        if !seen.insert(id) {
            return writeln!(f, "{pad}{node} (see above)");
        }
        if node.attributes.is_empty() {
            writeln!(f, "{pad}{node}")?;
        } else {
            let attributes = serde_json::Value::Object(node.attributes.clone());
            writeln!(f, "{pad}{node} {attributes}")?;
        }

        let Some(relationships) = &node.relationships else {
            return Ok(());
        };
        if remaining == 0 {
            return writeln!(f, "{pad}  ...");
        }
        for (name, related) in relationships {
            match related {
                Related::Null => writeln!(f, "{pad}  {name}: null")?,
                Related::One(target) => {
                    writeln!(f, "{pad}  {name}:")?;
                    self.node(f, *target, indent + 2, remaining - 1, seen)?;
                }
                Related::Many(targets) => {
                    writeln!(f, "{pad}  {name}: [{}]", targets.len())?;
                    for target in targets {
                        self.node(f, *target, indent + 2, remaining - 1, seen)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl ModelMapper for ModelGraph {
    type Model = NodeId;

    fn create_model(&mut self, kind: &str) -> Option<NodeId> {
        if let Some(accepted) = &self.accepted {
            if !accepted.contains(kind) {
                return None;
            }
        }
        self.nodes.push(Node {
            kind: kind.to_string(),
            ..Node::default()
        });
        Some(NodeId(self.nodes.len() - 1))
    }

    fn set_id(&mut self, model: &NodeId, id: &ResourceId) {
        self.nodes[model.0].id = Some(id.clone());
    }

    fn set_attributes(&mut self, model: &NodeId, attributes: &JsonMap) {
        let node = &mut self.nodes[model.0];
        node.attributes
            .extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn set_relationships(&mut self, model: &NodeId, relationships: Relationships<NodeId>) {
        self.nodes[model.0].relationships = Some(relationships);
    }

    fn meta_support(&mut self) -> Option<&mut dyn MetaSupport<NodeId>> {
        Some(self)
    }

    fn links_support(&mut self) -> Option<&mut dyn LinksSupport<NodeId>> {
        Some(self)
    }

    fn relationship_meta_support(&mut self) -> Option<&mut dyn RelationshipMetaSupport<NodeId>> {
        Some(self)
    }

    fn relationship_links_support(&mut self) -> Option<&mut dyn RelationshipLinksSupport<NodeId>> {
        Some(self)
    }
}

impl MetaSupport<NodeId> for ModelGraph {
    fn set_meta(&mut self, model: &NodeId, meta: &JsonMap) {
        self.nodes[model.0].meta = Some(meta.clone());
    }
}

impl LinksSupport<NodeId> for ModelGraph {
    fn set_links(&mut self, model: &NodeId, links: &JsonMap) {
        self.nodes[model.0].links = Some(links.clone());
    }
}

impl RelationshipMetaSupport<NodeId> for ModelGraph {
    fn set_relationship_meta(&mut self, model: &NodeId, relation: &str, meta: &JsonMap) {
        self.nodes[model.0]
            .relationship_meta
            .insert(relation.to_string(), meta.clone());
    }
}

impl RelationshipLinksSupport<NodeId> for ModelGraph {
    fn set_relationship_links(&mut self, model: &NodeId, relation: &str, links: &JsonMap) {
        self.nodes[model.0]
            .relationship_links
            .insert(relation.to_string(), links.clone());
    }
}
