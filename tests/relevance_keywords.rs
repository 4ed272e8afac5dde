use std::io::Write;

use monitor_editais::relevance::{
    KeywordFilter, RelevanceError, Verdict, DEFAULT_NEGATIVE_TERMS, DEFAULT_POSITIVE_TERMS,
};

#[test]
fn handpicked_titles() {
    let f = KeywordFilter::default();
    let cases = [
        ("edital nº 12/2024 – bolsas de pesquisa", true),
        ("capes lança seleção pública para doutorado sanduíche", true),
        ("portaria nº 45 prorroga prazo de submissão", true),
        ("resultado do concurso de fotografia", true),
        ("aviso de licitação para obras", false),
        ("pregão eletrônico nº 3/2024 – edital", false),
        ("ministra participa de evento em brasília", false),
        ("", false),
    ];
    for (text, expected) in cases {
        assert_eq!(f.is_relevant(text), expected, "text: {text:?}");
    }
}

#[test]
fn negative_verdict_names_the_pattern() {
    let v = KeywordFilter::default()
        .evaluate("pregão eletrônico para compra de bolsas térmicas");
    match v {
        Verdict::Negative(p) => assert!(p.contains("preg"), "pattern {p}"),
        other => panic!("expected negative, got {other:?}"),
    }
}

#[test]
fn toml_file_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
positive = ['\bresidência\b', '\bmestrado\b']
negative = ['\bcancelad[oa]\b']
"#
    )
    .unwrap();

    let f = KeywordFilter::load(Some(file.path())).unwrap();
    assert_eq!(f.positive_len(), 2);
    assert_eq!(f.negative_len(), 1);
    assert!(f.is_relevant("seleção para residência médica"));
    assert!(!f.is_relevant("mestrado cancelado"));
    // The built-in negatives are replaced, not merged.
    assert!(f.is_relevant("licitação de vagas de mestrado"));
}

#[test]
fn absent_negative_keeps_defaults() {
    let f = KeywordFilter::from_toml_str("positive = ['\\bhackathon\\b']").unwrap();
    assert_eq!(f.positive_len(), 1);
    assert_eq!(f.negative_len(), DEFAULT_NEGATIVE_TERMS.len());
}

#[test]
fn no_file_means_builtin_lists() {
    let f = KeywordFilter::load(None).unwrap();
    assert_eq!(f.positive_len(), DEFAULT_POSITIVE_TERMS.len());
}

#[test]
fn unreadable_or_invalid_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("keywords.toml");
    assert!(matches!(
        KeywordFilter::load(Some(&missing)),
        Err(RelevanceError::Io { .. })
    ));
    assert!(matches!(
        KeywordFilter::from_toml_str("positive = 'not a list'"),
        Err(RelevanceError::Toml(_))
    ));
}
