pub mod compile;
pub mod inspect;

use raisemap_compiler::{Error, Project, Result, ScanScope};

/// Parse `<module>:<attribute>` and build the project the pass runs over.
///
/// Without an explicit scan module, the scope is inferred from the
/// application module's top-level package.
pub fn load_project(
    app_path: &str,
    scan_module: Option<&str>,
) -> Result<(Project, String, String)> {
    let Some((module, attribute)) = app_path.split_once(':') else {
        return Err(Error::MalformedAppPath {
            path: app_path.to_owned(),
        });
    };

    let scope = match scan_module {
        Some(prefix) => ScanScope::single(prefix).with_framework(),
        None => ScanScope::infer(module)?,
    };
    let root = std::env::current_dir()?;

    Ok((
        Project::new(root, scope),
        module.to_owned(),
        attribute.to_owned(),
    ))
}
