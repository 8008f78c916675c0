use indoc::indoc;

use crate::analyze::{CallGraphWalker, RaiseSite, RaiseSiteExtractor};
use crate::project::Project;
use crate::resolve::{Callable, FunctionRef};
use crate::test_utils::TestProject;

fn sites(project: &Project, func: &str) -> Vec<RaiseSite> {
    let mut walker = CallGraphWalker::new(project);
    walker.raise_sites(&Callable::Function(FunctionRef::new("app.main", func)))
}

fn extract_first(project: &Project, func: &str) -> Option<(u16, Option<String>)> {
    let all = sites(project, func);
    let site = all.first().expect("at least one raise site");
    RaiseSiteExtractor::new(project).status_and_detail(site)
}

fn fixture() -> TestProject {
    let fixture = TestProject::new();
    fixture.write(
        "app/main.py",
        indoc! {r#"
            from fastapi import HTTPException, status

            class Declared(HTTPException):
                status_code = 500
                detail = "Internal Server Error"

            class StatusOnly(HTTPException):
                status_code = 409

            def class_attrs():
                raise Declared(status_code=401, detail="ignored")

            def bare_class_raise():
                raise StatusOnly

            def zero_arg_construct():
                raise StatusOnly()

            def keywords():
                raise HTTPException(status_code=402, detail="pay up")

            def qualified_constant():
                raise HTTPException(status_code=status.HTTP_404_NOT_FOUND, detail="missing")

            def bare_constant_name():
                raise HTTPException(status_code=HTTP_403_FORBIDDEN)

            def positional():
                raise HTTPException(418, "teapot")

            def keyword_beats_positional():
                raise HTTPException(500, status_code=402)

            def mixed_arguments():
                raise HTTPException(404, compute_detail())

            def mixed_without_any_literal():
                raise HTTPException(compute_code(), compute_detail())

            def out_of_range():
                raise HTTPException(status_code=9000, detail="nope")
        "#},
    );
    fixture
}

#[test]
fn class_attribute_precedence_skips_arguments() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(
        extract_first(&project, "class_attrs"),
        Some((500, Some("Internal Server Error".to_owned())))
    );
}

#[test]
fn class_attrs_fill_in_for_empty_constructions() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(extract_first(&project, "bare_class_raise"), Some((409, None)));
    assert_eq!(extract_first(&project, "zero_arg_construct"), Some((409, None)));
}

#[test]
fn keyword_arguments() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(
        extract_first(&project, "keywords"),
        Some((402, Some("pay up".to_owned())))
    );
}

#[test]
fn qualified_and_bare_status_constants() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(
        extract_first(&project, "qualified_constant"),
        Some((404, Some("missing".to_owned())))
    );
    assert_eq!(extract_first(&project, "bare_constant_name"), Some((403, None)));
}

#[test]
fn positional_literals_construct_the_exception() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(
        extract_first(&project, "positional"),
        Some((418, Some("teapot".to_owned())))
    );
}

#[test]
fn keyword_status_overrides_positional_integer() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(
        extract_first(&project, "keyword_beats_positional"),
        Some((402, None))
    );
}

#[test]
fn mixed_arguments_salvage_a_literal_integer() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(extract_first(&project, "mixed_arguments"), Some((404, None)));
}

#[test]
fn fully_computed_arguments_fall_back_to_class_attrs_only() {
    let fixture = fixture();
    let project = fixture.project("app");
    // HTTPException has no class attributes to fall back to
    assert_eq!(extract_first(&project, "mixed_without_any_literal"), None);
}

#[test]
fn out_of_range_codes_are_rejected() {
    let fixture = fixture();
    let project = fixture.project("app");
    assert_eq!(extract_first(&project, "out_of_range"), None);
}
