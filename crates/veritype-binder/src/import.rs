//! Import-edge discovery: walks a file's top-level `import`/
//! `from ... import`/`from ... import *` nodes and reports the dependency
//! edges the build manager needs to schedule new file states.

use veritype_ast::{Ast, Node, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEdge {
    /// Dotted module id this file depends on.
    pub module_id: String,
    /// Leading-dot count for relative imports; 0 for absolute.
    pub relative: u32,
    /// True for `from P import N` where `N` might itself be a submodule
    /// of `P` (the build manager adds it as a dependency only if module
    /// lookup confirms it is one).
    pub submodule_candidate: Option<String>,
}

/// Collect the dependency edges declared by a file's top-level
/// `import`/`from`-forms. Only top-level imports are discovered here;
/// conditional or nested imports are out of scope: there is no runtime
/// execution, so import discovery is purely syntactic.
#[tracing::instrument(level = "trace", skip(ast))]
pub fn discover_imports(ast: &Ast, file: NodeId) -> Vec<ImportEdge> {
    let Node::File(f) = ast.get(file) else {
        return Vec::new();
    };

    let mut edges = Vec::new();
    for &def in &f.defs {
        match ast.get(def) {
            Node::Import(imp) => {
                for (module_id, _alias) in &imp.ids {
                    edges.push(ImportEdge {
                        module_id: module_id.clone(),
                        relative: 0,
                        submodule_candidate: None,
                    });
                }
            }
            Node::ImportFrom(imp) => {
                edges.push(ImportEdge {
                    module_id: imp.module_id.clone(),
                    relative: imp.relative,
                    submodule_candidate: None,
                });
                for (name, _alias) in &imp.names {
                    edges.push(ImportEdge {
                        module_id: format!("{}.{}", imp.module_id, name),
                        relative: imp.relative,
                        submodule_candidate: Some(name.clone()),
                    });
                }
            }
            Node::ImportAll(imp) => {
                edges.push(ImportEdge {
                    module_id: imp.module_id.clone(),
                    relative: imp.relative,
                    submodule_candidate: None,
                });
            }
            _ => {}
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_ast::{FileNode, ImportFromNode, ImportNode};
    use veritype_common::Line;

    #[test]
    fn plain_import_becomes_one_edge() {
        let mut ast = Ast::new();
        let import = ast.alloc(
            Node::Import(ImportNode {
                ids: vec![("pkg.mod".to_string(), None)],
            }),
            Line(1),
        );
        let file = ast.alloc(
            Node::File(FileNode {
                module_name: "main".into(),
                defs: vec![import],
            }),
            Line(0),
        );

        let edges = discover_imports(&ast, file);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].module_id, "pkg.mod");
    }

    #[test]
    fn from_import_yields_package_and_submodule_candidate_edges() {
        let mut ast = Ast::new();
        let import = ast.alloc(
            Node::ImportFrom(ImportFromNode {
                module_id: "pkg".into(),
                names: vec![("sub".to_string(), None)],
                relative: 0,
            }),
            Line(1),
        );
        let file = ast.alloc(
            Node::File(FileNode {
                module_name: "main".into(),
                defs: vec![import],
            }),
            Line(0),
        );

        let edges = discover_imports(&ast, file);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].module_id, "pkg");
        assert_eq!(edges[1].module_id, "pkg.sub");
        assert_eq!(edges[1].submodule_candidate.as_deref(), Some("sub"));
    }
}
