use indoc::indoc;

use crate::analyze::{CallGraphWalker, RaiseSite};
use crate::openapi::response_record;
use crate::project::Project;
use crate::resolve::{Callable, FunctionRef};
use crate::test_utils::TestProject;

fn first_site(project: &Project, func: &str) -> RaiseSite {
    let mut walker = CallGraphWalker::new(project);
    walker
        .raise_sites(&Callable::Function(FunctionRef::new("app.main", func)))
        .into_iter()
        .next()
        .expect("raise site")
}

fn fixture() -> TestProject {
    let fixture = TestProject::new();
    fixture.write(
        "app/main.py",
        indoc! {r#"
            from fastapi import HTTPException

            class WithSchema(HTTPException):
                status_code = 409
                detail = "already exists"

                @classmethod
                def get_json_schema(cls):
                    pass

            class Derived(WithSchema):
                pass

            class Plain(HTTPException):
                pass

            def precomputed():
                raise WithSchema(status_code=500, detail="ignored at runtime")

            def inherited():
                raise Derived()

            def hopeless():
                raise Plain(compute(), compute())
        "#},
    );
    fixture
}

#[test]
fn schema_method_classes_use_class_attributes_only() {
    let fixture = fixture();
    let project = fixture.project("app");
    let record = response_record(&project, &first_site(&project, "precomputed")).unwrap();
    // the raise arguments are ignored; the declared attributes win
    assert_eq!(record.status_code, 409);
    assert_eq!(record.detail.as_deref(), Some("already exists"));
    assert_eq!(record.schema_name, "alreadyExistsSchema");
}

#[test]
fn schema_method_is_detected_on_ancestors() {
    let fixture = fixture();
    let project = fixture.project("app");
    let record = response_record(&project, &first_site(&project, "inherited")).unwrap();
    assert_eq!(record.status_code, 409);
    assert_eq!(record.schema_name, "alreadyExistsSchema");
}

#[test]
fn unresolvable_sites_produce_no_record() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert!(response_record(&project, &first_site(&project, "hopeless")).is_none());
}

#[test]
fn detail_free_records_fall_back_to_the_class_name() {
    let fixture = TestProject::new();
    fixture.write(
        "app/main.py",
        indoc! {r#"
            from fastapi import HTTPException

            class Conflict(HTTPException):
                status_code = 409

            def handler():
                raise Conflict()
        "#},
    );
    let project = fixture.project("app");
    let record = response_record(&project, &first_site(&project, "handler")).unwrap();
    assert_eq!(record.status_code, 409);
    assert_eq!(record.detail, None);
    assert_eq!(record.schema_name, "ConflictErrorSchema");
}
