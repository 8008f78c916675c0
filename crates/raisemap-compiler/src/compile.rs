//! The per-pass compilation facade.

use serde_json::Value;

use raisemap_core::ResponseRecord;

use crate::analyze::CallGraphWalker;
use crate::framework::{self, AppRef, Route};
use crate::openapi::{SchemaMerger, response_record};
use crate::project::Project;
use crate::resolve::NameResolver;
use crate::{Result, framework::locate_app};

/// One compiler instance drives one pass over the route table.
///
/// Route iteration follows the framework's registration order and raise
/// sites follow document order, so the same sources always produce the
/// same document. The visited table is cleared when the pass completes, so
/// a later pass over a mutated code base sees fresh resolution.
pub struct Compiler<'p> {
    project: &'p Project,
    walker: CallGraphWalker<'p>,
}

impl<'p> Compiler<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self {
            project,
            walker: CallGraphWalker::new(project),
        }
    }

    /// Compile the enriched OpenAPI document for an application.
    pub fn compile(&mut self, app: &AppRef) -> Value {
        let routes = framework::discover_routes(self.project, app);
        let mut document = framework::base_document(app, &routes);

        for route in &routes {
            if !route.include_in_schema {
                continue;
            }
            let records = self.route_records(route);
            SchemaMerger::merge_route(&mut document, route, &records);
        }

        self.walker.clear();
        document
    }

    /// The response records reachable from one route, in discovery order.
    pub fn route_records(&mut self, route: &Route) -> Vec<ResponseRecord> {
        let resolver = NameResolver::new(self.project);
        let mut records = Vec::new();

        for callable in framework::dependency_tree(self.project, route) {
            for site in self.walker.raise_sites(&callable) {
                let Some(class) = &site.class else {
                    continue;
                };
                if !resolver.is_http_exception(class) {
                    continue;
                }
                if let Some(record) = response_record(self.project, &site) {
                    records.push(record);
                }
            }
        }
        records
    }
}

/// Locate an application and compile its document in one step.
pub fn compile_app(project: &Project, module: &str, attribute: &str) -> Result<Value> {
    let app = locate_app(project, module, attribute)?;
    Ok(Compiler::new(project).compile(&app))
}
