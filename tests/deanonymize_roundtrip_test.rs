//! Encrypt then deanonymize round trips, including persisted mappings

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use shroud::anonymization::{
    AnonymizerEngine, Deanonymizer, EncryptionKey, MappingStore, OperatorConfig,
    OperatorOverrides, Span,
};
use shroud::domain::ShroudError;
use test_case::test_case;

fn encrypt_all(key: &str) -> OperatorOverrides {
    [("DEFAULT".to_string(), OperatorConfig::encrypt(key))].into()
}

/// Text with a person and an email, plus the spans covering them
fn sample(name: &str, email: &str) -> (String, Vec<Span>) {
    let prefix = "Patient ";
    let middle = " can be reached at ";
    let text = format!("{prefix}{name}{middle}{email}.");
    let name_start = prefix.len();
    let email_start = name_start + name.len() + middle.len();
    let spans = vec![
        Span::new("PERSON", name_start, name_start + name.len(), 0.9).unwrap(),
        Span::new("EMAIL_ADDRESS", email_start, email_start + email.len(), 0.95).unwrap(),
    ];
    (text, spans)
}

#[test_case("0123456789abcdef" ; "aes 128")]
#[test_case("0123456789abcdef01234567" ; "aes 192")]
#[test_case("0123456789abcdef0123456789abcdef" ; "aes 256")]
fn test_roundtrip_all_key_sizes(key: &str) {
    let (text, spans) = sample("John Doe", "john@example.com");
    let output = AnonymizerEngine::new()
        .anonymize(&text, &spans, Some(&encrypt_all(key)))
        .unwrap();

    assert!(output.is_reversible());
    assert!(!output.text().contains("John Doe"));
    assert!(!output.text().contains("john@example.com"));

    let restored = Deanonymizer::deanonymize(
        output.text(),
        &output.mapping,
        &EncryptionKey::from_str_key(key).unwrap(),
    )
    .unwrap();
    assert_eq!(restored, text);
}

#[test]
fn test_roundtrip_fake_people() {
    let key = "WmZq4t7w!z%C&F)J";
    let engine = AnonymizerEngine::new();
    let decrypt_key = EncryptionKey::from_str_key(key).unwrap();

    for _ in 0..25 {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let (text, spans) = sample(&name, &email);

        let output = engine
            .anonymize(&text, &spans, Some(&encrypt_all(key)))
            .unwrap();
        let restored = Deanonymizer::deanonymize(output.text(), &output.mapping, &decrypt_key).unwrap();
        assert_eq!(restored, text);
    }
}

#[test]
fn test_encryption_is_randomized() {
    let key = "WmZq4t7w!z%C&F)J";
    let (text, spans) = sample("John Doe", "john@example.com");
    let engine = AnonymizerEngine::new();

    let first = engine.anonymize(&text, &spans, Some(&encrypt_all(key))).unwrap();
    let second = engine.anonymize(&text, &spans, Some(&encrypt_all(key))).unwrap();
    assert_ne!(first.text(), second.text());
}

#[test]
fn test_persisted_mapping_roundtrip() {
    let key = "WmZq4t7w!z%C&F)J";
    let (text, spans) = sample("Émilie Dubois", "emilie@example.fr");
    let output = AnonymizerEngine::new()
        .anonymize(&text, &spans, Some(&encrypt_all(key)))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    std::fs::write(&path, output.mapping.to_json().unwrap()).unwrap();

    let loaded = MappingStore::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, output.mapping);

    let restored = Deanonymizer::deanonymize(
        output.text(),
        &loaded,
        &EncryptionKey::from_str_key(key).unwrap(),
    )
    .unwrap();
    assert_eq!(restored, text);
}

#[test]
fn test_mapping_offsets_match_items() {
    let key = "WmZq4t7w!z%C&F)J";
    let (text, spans) = sample("John Doe", "john@example.com");
    let output = AnonymizerEngine::new()
        .anonymize(&text, &spans, Some(&encrypt_all(key)))
        .unwrap();

    let encrypted: Vec<_> = output.result.items_for_operator("encrypt").collect();
    assert_eq!(encrypted.len(), output.mapping.len());
    for (item, entry) in encrypted.iter().zip(output.mapping.entries()) {
        assert_eq!((item.start, item.end), (entry.output_start, entry.output_end));
        assert_eq!(item.entity_type, entry.entity_type);
        assert_eq!(&output.text()[entry.output_start..entry.output_end], item.text);
    }
}

#[test]
fn test_mixed_keys_fail_on_foreign_entry() {
    let (text, spans) = sample("John Doe", "john@example.com");
    let overrides: OperatorOverrides = [
        ("PERSON".to_string(), OperatorConfig::encrypt("0123456789abcdef")),
        ("EMAIL_ADDRESS".to_string(), OperatorConfig::encrypt("fedcba9876543210")),
    ]
    .into();
    let output = AnonymizerEngine::new()
        .anonymize(&text, &spans, Some(&overrides))
        .unwrap();

    let result = Deanonymizer::deanonymize(
        output.text(),
        &output.mapping,
        &EncryptionKey::from_str_key("0123456789abcdef").unwrap(),
    );
    assert!(matches!(result, Err(ShroudError::Decryption { .. })));
}
