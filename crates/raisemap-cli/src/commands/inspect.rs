use raisemap_compiler::Compiler;
use raisemap_compiler::framework::{discover_routes, locate_app};

pub fn run(app_path: &str, scan_module: Option<&str>) -> i32 {
    let (project, module, attribute) = match super::load_project(app_path, scan_module) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let app = match locate_app(&project, &module, &attribute) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let routes = discover_routes(&project, &app);
    if routes.is_empty() {
        println!("no routes discovered for '{attribute}' in module '{module}'");
        return 0;
    }

    let mut compiler = Compiler::new(&project);
    for route in &routes {
        println!("{} {}", route.methods.join(","), route.path);
        if !route.include_in_schema {
            println!("  (excluded from schema)");
            continue;
        }
        let records = compiler.route_records(route);
        if records.is_empty() {
            println!("  no error responses discovered");
            continue;
        }
        for record in records {
            println!(
                "  {} {} -> {}",
                record.status_code,
                record.detail.as_deref().unwrap_or("-"),
                record.schema_name
            );
        }
    }
    0
}
