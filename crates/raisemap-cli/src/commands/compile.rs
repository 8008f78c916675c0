use std::path::Path;

use raisemap_compiler::compile_app;

pub fn run(app_path: &str, target_path: &Path, scan_module: Option<&str>) -> i32 {
    let (project, module, attribute) = match super::load_project(app_path, scan_module) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    println!("Successfully located '{attribute}' in module '{module}', compiling OpenAPI...");

    let document = match compile_app(&project, &module, &attribute) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let json = match serde_json::to_string_pretty(&document) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: failed to serialize document: {err}");
            return 1;
        }
    };
    if let Err(err) = std::fs::write(target_path, json) {
        eprintln!("error: failed to write '{}': {err}", target_path.display());
        return 1;
    }

    println!("OpenAPI schema saved to '{}'", target_path.display());
    0
}
