// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! `DependencyGraphBuilder`: a pure, read-only projection over a finalized
//! `Project`, plus the JSON/DOT serializers for it. No SCC condensation,
//! no transitive closure — a straight read of `Project`'s already-ordered
//! maps. Text shapes grounded in the original tool's
//! `serializer.py`/`generators.py`.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifiers::PackageType;
use crate::project::Project;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDescriptor {
    #[serde(rename = "type")]
    pub kind: PackageType,
    pub modules: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphDescriptor {
    pub nodes: Vec<String>,
    pub edges: IndexMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<IndexMap<String, PackageDescriptor>>,
}

/// `nodes`: module names in the order added to `Project.modules`.
/// `edges`: name -> submodule names, insertion order, de-duplicated.
/// `packages`: present iff at least one package exists.
pub fn describe_module_dependencies(project: &Project) -> GraphDescriptor {
    let nodes: Vec<String> = project.modules.keys().map(|n| n.to_string()).collect();

    let mut edges = IndexMap::new();
    for (name, module) in &project.modules {
        let targets: Vec<String> = module
            .submodules
            .iter()
            .map(|s| s.name.to_string())
            .collect();
        edges.insert(name.to_string(), targets);
    }

    let packages = if project.packages.is_empty() {
        None
    } else {
        let mut map = IndexMap::new();
        for (name, pkg) in &project.packages {
            map.insert(
                name.to_string(),
                PackageDescriptor {
                    kind: pkg.kind,
                    modules: pkg.modules.iter().map(|m| m.to_string()).collect(),
                },
            );
        }
        Some(map)
    };

    GraphDescriptor {
        nodes,
        edges,
        packages,
    }
}

/// Two-space-indented JSON, matching the stable format in SPEC_FULL.md §6.
pub fn to_json(descriptor: &GraphDescriptor) -> serde_json::Result<String> {
    serde_json::to_string_pretty(descriptor)
}

pub fn from_json(text: &str) -> serde_json::Result<GraphDescriptor> {
    serde_json::from_str(text)
}

/// `digraph G {\n    "P" -> "C"\n}`. Isolated nodes (no outgoing edges) are
/// omitted, matching the original tool's minimal DOT subset.
pub fn to_graphviz_dot(descriptor: &GraphDescriptor) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    for (parent, children) in &descriptor.edges {
        for child in children {
            let _ = writeln!(out, "    \"{parent}\" -> \"{child}\"");
        }
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{ModuleIdentifier, ModuleSpec, Origin, STDLIB_PACKAGE_NAME};
    use crate::project::Module;
    use std::path::PathBuf;
    use ustr::Ustr;

    fn local_module(name: &str, subs: &[&str]) -> Module {
        let spec = ModuleSpec {
            origin: Origin::File(PathBuf::from(format!("/proj/{name}.py"))),
            canonical_name: Ustr::from(name),
        };
        let mut m = Module::new(ModuleIdentifier::resolved(name, spec), Some(PathBuf::from(format!("/proj/{name}.py"))));
        for s in subs {
            m.add_submodule(ModuleIdentifier::new(*s));
        }
        m
    }

    #[test]
    fn describes_nodes_and_edges_without_packages() {
        let mut project = Project::new();
        project.modules.insert(Ustr::from("main"), local_module("main", &["util"]));
        project.modules.insert(Ustr::from("util"), local_module("util", &[]));
        project.root_modules.push(Ustr::from("main"));

        let desc = describe_module_dependencies(&project);
        assert_eq!(desc.nodes, vec!["main", "util"]);
        assert_eq!(desc.edges["main"], vec!["util"]);
        assert!(desc.packages.is_none());
    }

    #[test]
    fn describes_packages_when_present() {
        let mut project = Project::new();
        let main = local_module("main", &["os"]);
        project.insert_module(main, Ustr::from("main_pkg"), None, PackageType::Local);
        let os_mod = Module::new(
            ModuleIdentifier::resolved(
                "os",
                ModuleSpec {
                    origin: Origin::Builtin,
                    canonical_name: Ustr::from("os"),
                },
            ),
            None,
        );
        project.insert_module(os_mod, Ustr::from(STDLIB_PACKAGE_NAME), None, PackageType::StandardLib);

        let desc = describe_module_dependencies(&project);
        let packages = desc.packages.unwrap();
        assert_eq!(packages["main_pkg"].modules, vec!["main"]);
        assert_eq!(packages[STDLIB_PACKAGE_NAME].modules, vec!["os"]);
    }

    #[test]
    fn json_round_trips() {
        let mut project = Project::new();
        project.modules.insert(Ustr::from("main"), local_module("main", &["util"]));
        let desc = describe_module_dependencies(&project);
        let json = to_json(&desc).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(desc, back);
    }

    #[test]
    fn dot_format_matches_expected_shape() {
        let mut project = Project::new();
        project.modules.insert(Ustr::from("main"), local_module("main", &["util"]));
        let desc = describe_module_dependencies(&project);
        let dot = to_graphviz_dot(&desc);
        assert_eq!(dot, "digraph G {\n    \"main\" -> \"util\"\n}");
    }
}
