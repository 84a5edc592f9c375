use legal_ocr_pipeline::stage::{TextRecognizer, TextRefiner};
use legal_ocr_pipeline::stages::StageRegistry;
use legal_ocr_pipeline::{
    apply_corrections, classify_script, Config, CorrectionDictionary, Language, Pipeline,
    PipelineError,
};
use std::path::Path;
use std::sync::Arc;

struct ScannedText(&'static str);

impl TextRecognizer for ScannedText {
    fn name(&self) -> &'static str {
        "scanned"
    }

    fn description(&self) -> &'static str {
        "Returns text captured from a real deed"
    }

    fn recognize(&self, _path: &Path) -> Result<String, PipelineError> {
        Ok(self.0.to_string())
    }
}

struct UppercaseRefiner;

impl TextRefiner for UppercaseRefiner {
    fn name(&self) -> &'static str {
        "uppercase"
    }

    fn refine(&self, text: &str, image_path: &Path) -> Result<String, PipelineError> {
        assert!(image_path.exists());
        Ok(text.to_uppercase())
    }
}

fn deed_pipeline(text: &'static str, refiner: Option<Arc<dyn TextRefiner>>) -> Pipeline {
    let recognizers: Vec<Arc<dyn TextRecognizer>> = vec![Arc::new(ScannedText(text))];
    let registry = StageRegistry::with_recognizers(recognizers, "scanned").unwrap();
    Pipeline::with_stages(
        registry,
        refiner,
        CorrectionDictionary::legal(false).unwrap(),
        0.85,
    )
}

fn scan_file() -> tempfile::NamedTempFile {
    tempfile::Builder::new().suffix(".jpg").tempfile().unwrap()
}

#[test]
fn test_registration_scenario() {
    let mut dictionary = CorrectionDictionary::new(false);
    dictionary
        .merge([("Registation", "Registration")])
        .unwrap();

    let (text, count) = apply_corrections("Registation No. 5 Registation No. 6", &dictionary);
    assert_eq!(text, "Registration No. 5 Registration No. 6");
    assert_eq!(count, 1);
}

#[test]
fn test_text_without_keys_is_unchanged() {
    let dictionary = CorrectionDictionary::legal(false).unwrap();
    for text in ["", "Sale deed", "વેચાણ દસ્તાવેજ", "Registration No. 5"] {
        let (corrected, count) = apply_corrections(text, &dictionary);
        assert_eq!(corrected, text);
        assert_eq!(count, 0);
    }
}

#[test]
fn test_classification_extremes() {
    assert_eq!(classify_script(""), Language::English);
    assert_eq!(classify_script("નોંધણીનંબર"), Language::Gujarati);
    assert_eq!(classify_script("Notarized"), Language::English);
}

#[test]
fn test_bilingual_deed_end_to_end() {
    let pipeline = deed_pipeline(
        "ફાપાલી લેખ નોંધણી નં 12 સરવે નં 45 Notarised",
        None,
    );
    let file = scan_file();

    let result = pipeline.process(file.path()).unwrap();
    assert_eq!(
        result.text,
        "ફારગતી લેખ નોંધણી નંબર 12 સર્વે નંબર 45 Notarized"
    );
    assert_eq!(result.corrections_applied, 4);
    assert_eq!(result.language, Language::Gujarati);
    assert_eq!(result.recognizer, "scanned");
}

#[test]
fn test_refinement_runs_before_vocabulary() {
    // Uppercasing turns "Notarised" into "NOTARISED", which no longer matches
    let refiner: Arc<dyn TextRefiner> = Arc::new(UppercaseRefiner);
    let pipeline = deed_pipeline("Notarised", Some(refiner));
    let file = scan_file();

    let result = pipeline.process(file.path()).unwrap();
    assert_eq!(result.text, "NOTARISED");
    assert_eq!(result.corrections_applied, 0);
    assert!(result.refined);
}

#[test]
fn test_confidence_is_fixed() {
    let file = scan_file();
    for text in ["", "Notarised", "ફાપાલી"] {
        let result = deed_pipeline(text, None).process(file.path()).unwrap();
        assert_eq!(result.confidence, 0.85);
    }
}

#[test]
fn test_strict_config_with_conflicting_file_fails() {
    let mut dictionary = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::io::Write::write_all(&mut dictionary, r#"{"Notarised": "Notarised"}"#.as_bytes())
        .unwrap();

    let config = Config {
        strict_dictionary: true,
        dictionary_path: Some(dictionary.path().to_path_buf()),
        ..Config::default()
    };

    assert!(matches!(
        Pipeline::new(&config),
        Err(PipelineError::DictionaryConflict { .. })
    ));
}

#[test]
fn test_lenient_config_lets_file_override() {
    let mut dictionary = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::io::Write::write_all(&mut dictionary, r#"{"Notarised": "Attested"}"#.as_bytes())
        .unwrap();

    let config = Config {
        dictionary_path: Some(dictionary.path().to_path_buf()),
        ..Config::default()
    };

    let pipeline = Pipeline::new(&config).unwrap();
    assert_eq!(pipeline.dictionary().len(), 6);
    assert_eq!(pipeline.dictionary().get("Notarised"), Some("Attested"));
}

#[test]
fn test_result_serializes_language_code() {
    let file = scan_file();
    let result = deed_pipeline("ફાપાલી", None).process(file.path()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["language"], "gu");
    assert_eq!(json["text"], "ફારગતી");
    assert_eq!(json["corrections_applied"], 1);
}
