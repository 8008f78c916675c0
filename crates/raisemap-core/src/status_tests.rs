use crate::status::{code_for_constant, is_valid_code};

#[test]
fn resolves_well_known_constants() {
    assert_eq!(code_for_constant("HTTP_404_NOT_FOUND"), Some(404));
    assert_eq!(code_for_constant("HTTP_402_PAYMENT_REQUIRED"), Some(402));
    assert_eq!(code_for_constant("HTTP_500_INTERNAL_SERVER_ERROR"), Some(500));
    assert_eq!(code_for_constant("HTTP_511_NETWORK_AUTHENTICATION_REQUIRED"), Some(511));
}

#[test]
fn rejects_unknown_names() {
    assert_eq!(code_for_constant("HTTP_404"), None);
    assert_eq!(code_for_constant("NOT_FOUND"), None);
    assert_eq!(code_for_constant(""), None);
}

#[test]
fn code_range() {
    assert!(is_valid_code(100));
    assert!(is_valid_code(599));
    assert!(!is_valid_code(99));
    assert!(!is_valid_code(600));
}
