use std::path::Path;

use indoc::indoc;

use crate::project::module::{GlobalBinding, PyModule};

fn module(name: &str, source: &str) -> PyModule {
    PyModule::parse(name, Path::new("src/fake.py"), source.to_owned()).expect("valid source")
}

#[test]
fn rejects_unparseable_source() {
    assert!(PyModule::parse("bad", Path::new("bad.py"), "def f(:\n".to_owned()).is_none());
}

#[test]
fn globals_track_imports() {
    let m = module(
        "app.main",
        indoc! {r#"
            import fastapi
            import sqlalchemy as sa
            from fastapi import HTTPException
            from app.errors import NotFound as Missing
        "#},
    );
    assert_eq!(
        m.lookup_global("fastapi"),
        Some(&GlobalBinding::Import("fastapi".to_owned()))
    );
    assert_eq!(
        m.lookup_global("sa"),
        Some(&GlobalBinding::Import("sqlalchemy".to_owned()))
    );
    assert_eq!(
        m.lookup_global("HTTPException"),
        Some(&GlobalBinding::Import("fastapi.HTTPException".to_owned()))
    );
    assert_eq!(
        m.lookup_global("Missing"),
        Some(&GlobalBinding::Import("app.errors.NotFound".to_owned()))
    );
    assert_eq!(m.lookup_global("NotFound"), None);
}

#[test]
fn globals_resolve_relative_imports() {
    let m = module(
        "app.api.routes",
        indoc! {r#"
            from . import deps
            from .models import User
            from ..errors import NotFound
        "#},
    );
    assert_eq!(
        m.lookup_global("deps"),
        Some(&GlobalBinding::Import("app.api.deps".to_owned()))
    );
    assert_eq!(
        m.lookup_global("User"),
        Some(&GlobalBinding::Import("app.api.models.User".to_owned()))
    );
    assert_eq!(
        m.lookup_global("NotFound"),
        Some(&GlobalBinding::Import("app.errors.NotFound".to_owned()))
    );
}

#[test]
fn package_init_resolves_relative_to_itself() {
    let m = PyModule::parse(
        "app.api",
        Path::new("app/api/__init__.py"),
        "from .routes import router\n".to_owned(),
    )
    .expect("valid source");
    assert_eq!(
        m.lookup_global("router"),
        Some(&GlobalBinding::Import("app.api.routes.router".to_owned()))
    );
}

#[test]
fn globals_track_definitions_and_assignments() {
    let m = module(
        "app.main",
        indoc! {r#"
            import fastapi

            app = fastapi.FastAPI()

            def handler():
                pass

            class Service:
                pass

            service = Service()
            alias = Service
        "#},
    );
    assert_eq!(m.lookup_global("handler"), Some(&GlobalBinding::Def));
    assert_eq!(m.lookup_global("Service"), Some(&GlobalBinding::Def));
    assert_eq!(
        m.lookup_global("app"),
        Some(&GlobalBinding::Assigned {
            symbolic: "fastapi.FastAPI".to_owned(),
            is_call: true,
        })
    );
    assert_eq!(
        m.lookup_global("service"),
        Some(&GlobalBinding::Assigned {
            symbolic: "Service".to_owned(),
            is_call: true,
        })
    );
    assert_eq!(
        m.lookup_global("alias"),
        Some(&GlobalBinding::Assigned {
            symbolic: "Service".to_owned(),
            is_call: false,
        })
    );
}

#[test]
fn finds_functions_and_methods() {
    let m = module(
        "app.main",
        indoc! {r#"
            def top():
                pass

            class Service:
                def __init__(self):
                    pass

                def create(self):
                    pass

            async def later():
                pass
        "#},
    );
    assert!(m.find_function("top").is_some());
    assert!(m.find_function("later").is_some());
    assert!(m.find_function("Service.__init__").is_some());
    assert!(m.find_function("Service.create").is_some());
    assert!(m.find_function("Service.missing").is_none());
    assert!(m.find_function("missing").is_none());
    assert!(m.find_class("Service").is_some());
}

#[test]
fn finds_decorated_definitions() {
    let m = module(
        "app.main",
        indoc! {r#"
            @decorator
            def wrapped():
                pass

            @dataclass
            class Payload:
                pass
        "#},
    );
    assert!(m.find_function("wrapped").is_some());
    assert!(m.find_class("Payload").is_some());
    assert_eq!(m.lookup_global("wrapped"), Some(&GlobalBinding::Def));
    assert_eq!(m.lookup_global("Payload"), Some(&GlobalBinding::Def));
}

#[test]
fn class_annotations_strip_generics() {
    let m = module(
        "app.main",
        indoc! {r#"
            class Orchestrator:
                plain: Worker
                wrapped: Annotated[Worker, "meta"]
                listed: List[Worker]
                counter = 0
        "#},
    );
    let annotations = m.class_annotations("Orchestrator");
    assert_eq!(annotations.get("plain").map(String::as_str), Some("Worker"));
    assert_eq!(annotations.get("wrapped").map(String::as_str), Some("Worker"));
    assert_eq!(annotations.get("listed").map(String::as_str), Some("List"));
    assert_eq!(annotations.get("counter"), None);
}

#[test]
fn class_bases_and_attrs() {
    let m = module(
        "app.errors",
        indoc! {r#"
            from fastapi import HTTPException

            class ApiError(HTTPException):
                status_code = 500
                detail = "Internal Server Error"

            class Specific(ApiError, metaclass=Meta):
                status_code = 409
        "#},
    );
    assert_eq!(m.class_bases("ApiError"), ["HTTPException"]);
    assert_eq!(m.class_bases("Specific"), ["ApiError"]);
    assert_eq!(
        m.class_attr_literal("ApiError", "status_code"),
        Some(crate::python::Literal::Int(500))
    );
    assert_eq!(
        m.class_attr_literal("ApiError", "detail"),
        Some(crate::python::Literal::Str("Internal Server Error".to_owned())),
    );
    assert_eq!(m.class_attr_literal("Specific", "detail"), None);
}
