//! Error handling tests: every failure is surfaced and nothing is half-applied

use shroud::anonymization::{
    AnonymizerEngine, Deanonymizer, EncryptionKey, MappingStore, OperatorConfig,
    OperatorOverrides, OperatorRegistry, Span,
};
use shroud::domain::ShroudError;
use test_case::test_case;

const TEXT: &str = "My name is John Doe and my email is john@example.com";

fn spans() -> Vec<Span> {
    vec![
        Span::new("PERSON", 11, 19, 0.85).unwrap(),
        Span::new("EMAIL_ADDRESS", 36, 52, 0.99).unwrap(),
    ]
}

fn single(entity: &str, config: OperatorConfig) -> OperatorOverrides {
    [(entity.to_string(), config)].into()
}

#[test]
fn test_unknown_operator_names_the_operator() {
    let call = single("PERSON", OperatorConfig::new("tokenize"));
    let err = AnonymizerEngine::new()
        .anonymize(TEXT, &spans(), Some(&call))
        .unwrap_err();
    assert!(matches!(&err, ShroudError::UnknownOperator { name } if name == "tokenize"));
    assert!(err.to_string().contains("tokenize"));
}

#[test_case(OperatorConfig::new("encrypt") ; "encrypt without key")]
#[test_case(OperatorConfig::encrypt("0123") ; "encrypt with short key")]
#[test_case(OperatorConfig::new("mask") ; "mask without params")]
#[test_case(OperatorConfig::new("mask").with_param("masking_char", "**").with_param("chars_to_mask", 2) ; "mask with two char mask")]
#[test_case(OperatorConfig::new("mask").with_param("masking_char", "*").with_param("chars_to_mask", -1) ; "mask with negative count")]
#[test_case(OperatorConfig::new("hash").with_param("hash_type", "md5") ; "hash with unsupported algorithm")]
#[test_case(OperatorConfig::new("replace").with_param("new_value", 7) ; "replace with non string value")]
#[test_case(OperatorConfig::new("custom") ; "custom without closure")]
fn test_invalid_params_fail_before_mutation(config: OperatorConfig) {
    let call = single("EMAIL_ADDRESS", config);
    let result = AnonymizerEngine::new().anonymize(TEXT, &spans(), Some(&call));
    assert!(matches!(
        result,
        Err(ShroudError::OperatorApplication { entity_type, .. }) if entity_type == "EMAIL_ADDRESS"
    ));
}

#[test]
fn test_missing_key_message() {
    let call = single("PERSON", OperatorConfig::new("encrypt"));
    let err = AnonymizerEngine::new()
        .anonymize(TEXT, &spans(), Some(&call))
        .unwrap_err();
    assert!(err.to_string().contains("missing encryption key"));
}

#[test]
fn test_custom_failure_aborts_whole_call() {
    let call = single(
        "EMAIL_ADDRESS",
        OperatorConfig::custom(|_| Err("lookup service unavailable".to_string())),
    );
    let err = AnonymizerEngine::new()
        .anonymize(TEXT, &spans(), Some(&call))
        .unwrap_err();
    assert!(matches!(err, ShroudError::OperatorApplication { .. }));
    assert!(err.to_string().contains("lookup service unavailable"));
}

#[test]
fn test_invalid_span_rejects_batch() {
    let mut spans = spans();
    spans.push(Span::new("URL", 40, 60, 0.5).unwrap());
    let err = AnonymizerEngine::new().anonymize(TEXT, &spans, None).unwrap_err();
    assert!(matches!(
        err,
        ShroudError::InvalidSpan { ref entity_type, start: 40, end: 60, .. } if entity_type == "URL"
    ));
}

#[test_case(-0.1 ; "negative score")]
#[test_case(1.01 ; "score above one")]
#[test_case(f64::NAN ; "nan score")]
fn test_invalid_scores(score: f64) {
    assert!(matches!(
        Span::new("PERSON", 0, 4, score),
        Err(ShroudError::InvalidSpan { .. })
    ));
}

#[test]
fn test_invalid_span_json() {
    let result: Result<Span, _> =
        serde_json::from_str(r#"{"entity_type": "", "start": 0, "end": 4, "score": 0.5}"#);
    assert!(result.is_err());
}

#[test]
fn test_registry_default_validation() {
    let result = OperatorRegistry::new().with_default("PERSON", OperatorConfig::new("nope"));
    assert!(matches!(result, Err(ShroudError::UnknownOperator { .. })));
}

#[test_case(15 ; "fifteen bytes")]
#[test_case(20 ; "twenty bytes")]
#[test_case(64 ; "sixty four bytes")]
fn test_invalid_key_length(length: usize) {
    let result = EncryptionKey::new(vec![1u8; length]);
    assert!(matches!(result, Err(ShroudError::InvalidKey { length: l }) if l == length));
}

#[test]
fn test_deanonymize_errors_are_deanonymization_errors() {
    let key = EncryptionKey::from_str_key("0123456789abcdef").unwrap();
    let mut mapping = MappingStore::new();
    mapping.push(shroud::anonymization::MappingEntry {
        output_start: 0,
        output_end: 100,
        operator_name: "encrypt".to_string(),
        entity_type: "PERSON".to_string(),
        payload: vec![1, 2, 3],
    });

    let err = Deanonymizer::deanonymize("short", &mapping, &key).unwrap_err();
    assert!(matches!(err, ShroudError::MappingMismatch { text_len: 5, .. }));
    assert!(err.is_deanonymization_error());
}
