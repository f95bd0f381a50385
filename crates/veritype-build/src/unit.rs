//! `FileUnit`: everything the build manager tracks about one source file
//! as it moves through the pipeline.

use veritype_ast::{Ast, NodeId};
use veritype_binder::ScopeTree;
use veritype_common::{Line, ModuleId};

use crate::phase::Phase;

pub struct FileUnit {
    pub path: String,
    pub module_id: ModuleId,
    pub module_name: String,
    pub import_context: Vec<(String, Line)>,
    /// Module ids this file's imports depend on, resolved by name at
    /// readiness-check time rather than eagerly, since a dependency's own
    /// unit might not exist yet when this file was discovered.
    pub dependencies: Vec<String>,
    pub phase: Phase,

    /// Consumed once parsing happens.
    pub source: Option<String>,
    pub ast: Option<Ast>,
    pub file_node: NodeId,
    pub scopes: Option<ScopeTree>,
}

impl FileUnit {
    pub fn new_unprocessed(path: String, module_id: ModuleId, module_name: String, import_context: Vec<(String, Line)>, source: String) -> Self {
        FileUnit {
            path,
            module_id,
            module_name,
            import_context,
            dependencies: Vec::new(),
            phase: Phase::Unprocessed,
            source: Some(source),
            ast: None,
            file_node: NodeId::NONE,
            scopes: None,
        }
    }
}
