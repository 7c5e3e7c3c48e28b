use super::common::parse_type;

#[test]
fn test_type_parser_plain() {
    let ty = parse_type("int").unwrap();
    assert_eq!(ty.name, "int");
    assert_eq!(ty.pointer_depth, 0);
    assert!(ty.description.is_none());
}

#[test]
fn test_type_parser_pointers() {
    let ty = parse_type("char**").unwrap();
    assert_eq!(ty.name, "char");
    assert_eq!(ty.pointer_depth, 2);
    assert_eq!(ty.full_name(), "char**");
}

#[test]
fn test_type_parser_user_type() {
    let ty = parse_type("Point *").unwrap();
    assert_eq!(ty.name, "Point");
    assert_eq!(ty.pointer_depth, 1);
}

#[test]
fn test_type_parser_rejects_number() {
    assert!(parse_type("42").is_none());
}
