//! Package dependency graph
//!
//! Walks declared requirements from a root package to the manifests on
//! disk, then provides cycle detection, a dependency-first build order and
//! JSON/DOT export. Nodes live in an insertion-ordered map keyed by package
//! name; adjacency is kept on both sides as sets of names.

use std::collections::{BTreeSet, HashMap, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use clyde_config::{Package, Requirement};
use clyde_core::error::ClydeError;
use clyde_core::types::{PackageName, PackageType, Version};
use clyde_core::utils::{cache_root, normalize_path, DEPS_DIR};

use crate::ResolverResult;

/// Node in the dependency graph
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyNode {
    /// Loaded package
    pub package: Package,
    /// Names this package depends on
    pub dependencies: BTreeSet<String>,
    /// Names depending on this package
    pub dependents: BTreeSet<String>,
}

/// Resolves packages on disk into a dependency graph
#[derive(Debug, Default)]
pub struct DependencyResolver {
    nodes: IndexMap<String, DependencyNode>,
}

/// Serializable snapshot of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: IndexMap<String, GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub version: Version,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

impl DependencyNode {
    /// Create a node with no edges
    pub fn new(package: Package) -> Self {
        Self {
            package,
            dependencies: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }
}

impl DependencyResolver {
    /// Create a new empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package and, transitively, everything it requires.
    ///
    /// Dependencies are looked up under `root_path/deps` when given, else
    /// under the cache root of each requirer. Packages already in the graph
    /// are linked without touching the filesystem.
    pub fn add_package(&mut self, package: Package, root_path: Option<&Utf8Path>) -> ResolverResult<()> {
        let explicit_root = root_path.map(normalize_path);
        let root_name = package.name().to_string();

        debug!("Adding {} from {}", root_name, package.path());
        self.insert(root_name.clone(), package);

        let mut stack = vec![root_name];
        let mut edges: Vec<(String, String)> = Vec::new();

        while let Some(name) = stack.pop() {
            let node = self
                .nodes
                .get(&name)
                .ok_or_else(|| ClydeError::PackageNotRegistered { name: name.clone() })?;
            let requirer_path = node.package.path().to_path_buf();
            let requirements = node.package.requirements()?;
            let root = explicit_root
                .clone()
                .unwrap_or_else(|| cache_root(&requirer_path));

            for (dep_name, requirement) in requirements {
                edges.push((name.clone(), dep_name.clone()));

                if self.nodes.contains_key(&dep_name) {
                    continue;
                }

                let dependency = match requirement {
                    Requirement::Local(relative) => {
                        let path = normalize_path(&requirer_path.join(&relative));
                        debug!("{} -> {} (local {})", name, dep_name, path);
                        Package::load(&path).map_err(|e| match e {
                            ClydeError::ManifestNotFound { .. } => ClydeError::DependencyNotFound {
                                name: dep_name.clone(),
                                required_by: name.clone(),
                                tried: vec![format!("{} (missing)", path)],
                            },
                            other => other,
                        })?
                    },
                    Requirement::Range(_) => {
                        Self::locate(&dep_name, &name, &requirer_path, &root)?
                    },
                };

                self.nodes.insert(dep_name.clone(), DependencyNode::new(dependency));
                stack.push(dep_name);
            }
        }

        for (from, to) in &edges {
            self.link(from, to)?;
        }

        info!("Resolved {} packages, {} edges", self.nodes.len(), edges.len());
        Ok(())
    }

    /// Find an installed dependency in the deps/ cache
    fn locate(
        name: &str,
        required_by: &str,
        requirer_path: &Utf8Path,
        root: &Utf8Path,
    ) -> ResolverResult<Package> {
        let relative = Utf8PathBuf::from(DEPS_DIR).join(PackageName::parse(name)?.cache_path());

        let mut candidates = vec![root.join(&relative)];
        let own = requirer_path.join(&relative);
        if own != candidates[0] {
            candidates.push(own);
        }

        let mut tried = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match Package::load_expecting(&candidate, name) {
                Ok(package) => {
                    debug!("{} -> {} ({})", required_by, name, candidate);
                    return Ok(package);
                },
                Err(e) => {
                    let reason = match e {
                        ClydeError::ManifestNotFound { .. } => "missing".to_string(),
                        ClydeError::PackageNameMismatch { found, .. } => {
                            format!("manifest names '{}'", found)
                        },
                        other => other.to_string(),
                    };
                    debug!("Rejected {} for {}: {}", candidate, name, reason);
                    tried.push(format!("{} ({})", candidate, reason));
                },
            }
        }

        Err(ClydeError::DependencyNotFound {
            name: name.to_string(),
            required_by: required_by.to_string(),
            tried,
        })
    }

    /// Register a package without walking its requirements
    pub fn insert(&mut self, name: impl Into<String>, package: Package) {
        self.nodes
            .entry(name.into())
            .or_insert_with(|| DependencyNode::new(package));
    }

    /// Add an edge `from -> to` between two registered packages
    pub fn link(&mut self, from: &str, to: &str) -> ResolverResult<()> {
        for name in [from, to] {
            if !self.nodes.contains_key(name) {
                return Err(ClydeError::PackageNotRegistered { name: name.to_string() });
            }
        }

        if let Some(node) = self.nodes.get_mut(from) {
            node.dependencies.insert(to.to_string());
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.dependents.insert(from.to_string());
        }

        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<&DependencyNode> {
        self.nodes.get(name)
    }

    /// All nodes in registration order
    pub fn nodes(&self) -> &IndexMap<String, DependencyNode> {
        &self.nodes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find circular dependencies.
    ///
    /// Each cycle starts and ends with the same name. Rotations of the same
    /// cycle are reported once.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut seen: HashSet<Vec<&str>> = HashSet::new();
        let mut visited: HashSet<&str> = HashSet::new();

        for (start, start_node) in &self.nodes {
            if !visited.insert(start.as_str()) {
                continue;
            }

            let mut path: Vec<&str> = vec![start.as_str()];
            let mut frames = vec![start_node.dependencies.iter()];

            loop {
                let Some(deps) = frames.last_mut() else {
                    break;
                };

                match deps.next() {
                    Some(dep) => {
                        if let Some(pos) = path.iter().position(|name| *name == dep.as_str()) {
                            let body = &path[pos..];
                            if seen.insert(canonical_rotation(body)) {
                                let mut cycle: Vec<String> = body.iter().map(|s| s.to_string()).collect();
                                cycle.push(dep.clone());
                                cycles.push(cycle);
                            }
                        } else if let Some(node) = self.nodes.get(dep) {
                            if visited.insert(dep.as_str()) {
                                path.push(dep.as_str());
                                frames.push(node.dependencies.iter());
                            }
                        }
                    },
                    None => {
                        frames.pop();
                        path.pop();
                    },
                }
            }
        }

        cycles
    }

    /// Packages in dependency-first build order
    pub fn build_order(&self) -> ResolverResult<Vec<&Package>> {
        if let Some(cycle) = self.detect_cycles().first() {
            return Err(ClydeError::CircularDependency {
                cycle: format_cycle(cycle),
            });
        }

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut visited: HashSet<&str> = HashSet::new();

        for (start, start_node) in &self.nodes {
            if !visited.insert(start.as_str()) {
                continue;
            }

            let mut frames = vec![(start_node, start_node.dependencies.iter())];

            loop {
                let Some((node, deps)) = frames.last_mut() else {
                    break;
                };

                match deps.next() {
                    Some(dep) => {
                        if visited.insert(dep.as_str()) {
                            if let Some(dep_node) = self.nodes.get(dep) {
                                frames.push((dep_node, dep_node.dependencies.iter()));
                            }
                        }
                    },
                    None => {
                        // All dependencies emitted
                        let done: &DependencyNode = *node;
                        frames.pop();
                        order.push(&done.package);
                    },
                }
            }
        }

        Ok(order)
    }

    /// Snapshot of nodes and edges
    pub fn export_graph(&self) -> GraphExport {
        let nodes = self
            .nodes
            .iter()
            .map(|(name, node)| {
                let package = &node.package;
                let exported = GraphNode {
                    name: name.clone(),
                    version: package.version().clone(),
                    package_type: package.package_type(),
                    organization: package.organization().map(str::to_string),
                };
                (name.clone(), exported)
            })
            .collect();

        let edges = self
            .nodes
            .iter()
            .flat_map(|(name, node)| {
                node.dependencies.iter().map(move |dep| GraphEdge {
                    from: name.clone(),
                    to: dep.clone(),
                })
            })
            .collect();

        GraphExport { nodes, edges }
    }

    /// Write the graph as pretty JSON, returning what was written
    pub fn write_graph(&self, path: &Utf8Path) -> ResolverResult<GraphExport> {
        let graph = self.export_graph();
        let json = serde_json::to_string_pretty(&graph)
            .map_err(|e| ClydeError::io("Failed to serialize dependency graph".to_string(), e.into()))?;

        std::fs::write(path, json)
            .map_err(|e| ClydeError::io(format!("Failed to write {}", path), e))?;

        info!("Wrote dependency graph to {}", path);
        Ok(graph)
    }

    /// Graph as a petgraph DiGraph with edges pointing at dependencies
    pub fn to_digraph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len());
        let indices: HashMap<&str, NodeIndex> = self
            .nodes
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for (name, node) in &self.nodes {
            for dep in &node.dependencies {
                if let (Some(&from), Some(&to)) = (indices.get(name.as_str()), indices.get(dep.as_str())) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        graph
    }

    /// Render the graph in Graphviz DOT
    pub fn to_dot(&self) -> String {
        let graph = self.to_digraph();
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

/// Format cycle as "a -> b -> a"
pub fn format_cycle(cycle: &[String]) -> String {
    cycle.join(" -> ")
}

/// Rotate a cycle body so its smallest name comes first
fn canonical_rotation<'a>(body: &[&'a str]) -> Vec<&'a str> {
    let start = body
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| **name)
        .map_or(0, |(i, _)| i);

    body[start..].iter().chain(&body[..start]).copied().collect()
}
