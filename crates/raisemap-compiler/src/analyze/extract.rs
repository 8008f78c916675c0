//! Recovery of `(status_code, detail)` from a resolved raise site.

use arborium_tree_sitter::Node;
use indexmap::IndexMap;
use log::debug;

use raisemap_core::status;

use crate::analyze::finder::RaiseSite;
use crate::project::Project;
use crate::python::{self, Literal};
use crate::resolve::{ClassRef, ExceptionClass, NameResolver};

/// Keyword and positional argument views of a raise expression.
#[derive(Debug, Default)]
struct RaiseArguments {
    kw_status: Option<u16>,
    kw_detail: Option<String>,
    /// Unknown keyword arguments with literal-constant values.
    extra: IndexMap<String, Literal>,
    /// All positional argument nodes, literal or not.
    positional_count: usize,
    /// The positional arguments that are literal constants, in order.
    positional: Vec<Literal>,
}

/// Computes the status code and detail of a raise site by consulting class
/// attributes, keyword arguments, positional arguments, and qualified
/// status constants - in that order of authority.
pub struct RaiseSiteExtractor<'p> {
    resolver: NameResolver<'p>,
}

impl<'p> RaiseSiteExtractor<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self {
            resolver: NameResolver::new(project),
        }
    }

    /// Extract `(status_code, detail)`; `None` drops the site.
    pub fn status_and_detail(&self, site: &RaiseSite) -> Option<(u16, Option<String>)> {
        let class = site.class.as_ref()?;
        let user_class = match class {
            ExceptionClass::User(c) => Some(c),
            _ => None,
        };

        // Class-attribute precedence: a class declaring both values needs
        // no argument inspection.
        if let Some(c) = user_class {
            if let (Some(code), Some(detail)) = (
                self.class_attr_status(c),
                self.class_attr_detail(c).filter(|d| !d.is_empty()),
            ) {
                return Some((code, Some(detail)));
            }
        }

        let args = self.raise_arguments(site);

        if let (Some(code), Some(detail)) = (args.kw_status, args.kw_detail.clone()) {
            return Some((code, Some(detail)));
        }

        // Mixed literal and computed positionals: the call cannot be
        // reconstructed, salvage a status code if any.
        if !args.positional.is_empty() && args.positional.len() != args.positional_count {
            if let Some(code) = args.kw_status {
                return Some((code, None));
            }
            if let Some(code) = args
                .positional
                .iter()
                .filter_map(Literal::as_int)
                .find_map(valid_code)
            {
                return Some((code, None));
            }
            return None;
        }

        if let Some(found) = self.construct(user_class, &args) {
            return Some(found);
        }

        args.kw_status.map(|code| (code, None))
    }

    /// Symbolic construction: positional literals are matched against the
    /// HTTP exception constructor `(status_code, detail)`, keyword values
    /// take precedence, and missing values fall back to effective class
    /// attributes. Succeeds only when a status code is recovered.
    fn construct(
        &self,
        class: Option<&ClassRef>,
        args: &RaiseArguments,
    ) -> Option<(u16, Option<String>)> {
        if !args.extra.is_empty() {
            debug!(
                "ignoring constructor keywords {:?}",
                args.extra.keys().collect::<Vec<_>>()
            );
        }

        let status = args
            .kw_status
            .or_else(|| {
                args.positional
                    .first()
                    .and_then(Literal::as_int)
                    .and_then(valid_code)
            })
            .or_else(|| class.and_then(|c| self.class_attr_status(c)))?;

        let detail = args
            .kw_detail
            .clone()
            .or_else(|| {
                args.positional
                    .get(1)
                    .and_then(|l| l.as_str())
                    .map(str::to_owned)
            })
            .or_else(|| class.and_then(|c| self.class_attr_detail(c)))
            .filter(|d| !d.is_empty());

        Some((status, detail))
    }

    fn class_attr_status(&self, class: &ClassRef) -> Option<u16> {
        self.resolver
            .effective_class_attr(class, "status_code")?
            .as_int()
            .and_then(valid_code)
    }

    fn class_attr_detail(&self, class: &ClassRef) -> Option<String> {
        self.resolver
            .effective_class_attr(class, "detail")?
            .as_str()
            .map(str::to_owned)
    }

    /// Parse the raise expression's argument list, if it is a call.
    fn raise_arguments(&self, site: &RaiseSite) -> RaiseArguments {
        let mut args = RaiseArguments::default();
        let Some(raise_node) = site.raise_node() else {
            return args;
        };
        let Some(exception) = python::raise_exception(raise_node) else {
            return args;
        };
        if exception.kind() != "call" {
            // `raise E` without a call: construction falls back to class
            // attributes alone
            return args;
        }
        let Some(argument_list) = exception.child_by_field_name("arguments") else {
            return args;
        };

        let source = site.module.source();
        for argument in python::named_children(argument_list) {
            if argument.kind() == "keyword_argument" {
                self.collect_keyword(argument, source, &mut args);
            } else if argument.kind() != "comment" {
                args.positional_count += 1;
                if let Some(literal) = python::literal(argument, source) {
                    args.positional.push(literal);
                }
            }
        }
        args
    }

    fn collect_keyword(&self, argument: Node<'_>, source: &str, args: &mut RaiseArguments) {
        let (Some(name), Some(value)) = (
            argument.child_by_field_name("name"),
            argument.child_by_field_name("value"),
        ) else {
            return;
        };
        match python::text(name, source) {
            "status_code" => args.kw_status = self.status_value(value, source),
            "detail" => args.kw_detail = python::string_literal(value, source),
            other => {
                if let Some(literal) = python::literal(value, source) {
                    args.extra.insert(other.to_owned(), literal);
                }
            }
        }
    }

    /// Accepted status forms: a literal integer, a qualified constant on
    /// the status module (`status.HTTP_404_NOT_FOUND`), or a bare imported
    /// constant name.
    fn status_value(&self, value: Node<'_>, source: &str) -> Option<u16> {
        match value.kind() {
            "integer" => python::int_literal(value, source).and_then(valid_code),
            "attribute" => {
                let rightmost = value.child_by_field_name("attribute")?;
                status::code_for_constant(python::text(rightmost, source))
            }
            "identifier" => status::code_for_constant(python::text(value, source)),
            _ => {
                debug!("unsupported status_code value form '{}'", value.kind());
                None
            }
        }
    }
}

fn valid_code(value: i64) -> Option<u16> {
    u16::try_from(value)
        .ok()
        .filter(|code| status::is_valid_code(*code))
}
