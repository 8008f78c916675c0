use serde_json::json;

use crate::ResponseRecord;

#[test]
fn generic_record_with_detail_pins_literal() {
    let record = ResponseRecord::generic("PaymentError", 402, Some("pay up".to_owned()));
    assert_eq!(record.status_code, 402);
    assert_eq!(record.schema_name, "payUpSchema");
    assert_eq!(record.description(), "pay up");
    assert_eq!(
        record.response_schema,
        json!({
            "properties": { "detail": { "const": "pay up", "title": "Detail" } },
            "required": ["detail"],
            "title": "payUpSchema",
            "type": "object",
        })
    );
}

#[test]
fn generic_record_without_detail_falls_back_to_class_name() {
    let record = ResponseRecord::generic("PaymentError", 402, None);
    assert_eq!(record.schema_name, "PaymentErrorErrorSchema");
    assert_eq!(record.description(), "No description provided");
    assert_eq!(
        record.response_schema["properties"]["detail"],
        json!({ "title": "Detail", "type": "string" })
    );
}

#[test]
fn same_inputs_same_name() {
    let a = ResponseRecord::generic("A", 500, Some("Internal Server Error".to_owned()));
    let b = ResponseRecord::generic("B", 500, Some("Internal Server Error".to_owned()));
    assert_eq!(a.schema_name, b.schema_name);
    assert_eq!(a.schema_name, "InternalServerErrorSchema");
}
