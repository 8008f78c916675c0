//! From raise site to response record.

use log::debug;

use raisemap_core::ResponseRecord;

use crate::analyze::{RaiseSite, RaiseSiteExtractor};
use crate::project::Project;
use crate::resolve::{ExceptionClass, NameResolver};

/// Build the response record for a raise site, or `None` when neither the
/// class nor the raise arguments yield a status code.
///
/// Classes exposing a precomputed-schema method (detected structurally)
/// are served from their class attributes alone; everything else goes
/// through argument extraction.
pub fn response_record(project: &Project, site: &RaiseSite) -> Option<ResponseRecord> {
    let class = site.class.as_ref()?;
    let resolver = NameResolver::new(project);

    if let ExceptionClass::User(user_class) = class {
        if resolver.has_schema_method(user_class) {
            let status = resolver
                .effective_class_attr(user_class, "status_code")?
                .as_int()
                .and_then(|code| u16::try_from(code).ok())
                .filter(|code| raisemap_core::status::is_valid_code(*code))?;
            let detail = resolver
                .effective_class_attr(user_class, "detail")
                .and_then(|l| l.as_str().map(str::to_owned))
                .filter(|d| !d.is_empty());
            return Some(ResponseRecord::generic(&user_class.name, status, detail));
        }
    }

    let extractor = RaiseSiteExtractor::new(project);
    let Some((status, detail)) = extractor.status_and_detail(site) else {
        debug!(
            "could not resolve status code and detail for exception '{}'",
            class.class_name()
        );
        return None;
    };
    Some(ResponseRecord::generic(class.class_name(), status, detail))
}
