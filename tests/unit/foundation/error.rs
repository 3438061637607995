use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FieldError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FieldError::render("x").to_string().contains("render error:"));
    assert!(FieldError::trace("x").to_string().contains("trace error:"));
    assert!(
        FieldError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FieldError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
