use parkcheck_core::models::features::{FEATURE_NAMES, FeatureVector};
use parkcheck_core::models::label::Label;
use parkcheck_core::models::reading::{ClinicalForm, ClinicalReading};

fn reading() -> ClinicalReading {
    ClinicalReading {
        ppe: 0.1,
        fo: 120.0,
        flo: 80.0,
        ddp: 0.01,
        jitter_abs: 0.0005,
        spread1: -4.0,
        spread2: 0.2,
        fhi: 150.0,
        nhr: 0.02,
        apq5: 0.03,
    }
}

#[test]
fn reading_is_reordered_into_training_order() {
    let features = FeatureVector::from(&reading());
    assert_eq!(
        features.values(),
        &[0.1, -4.0, 120.0, 0.2, 80.0, 150.0, 0.01, 0.02, 0.0005, 0.03]
    );
}

#[test]
fn feature_names_follow_training_order() {
    assert_eq!(FEATURE_NAMES[0], "PPE");
    assert_eq!(FEATURE_NAMES[1], "spread1");
    assert_eq!(FEATURE_NAMES[9], "Shimmer:APQ5");
}

#[test]
fn label_classes() {
    assert_eq!(Label::try_from(0_i64).unwrap(), Label::Negative);
    assert_eq!(Label::try_from(1_i64).unwrap(), Label::Positive);
    assert!(Label::try_from(2_i64).is_err());
    assert_eq!(Label::Positive.as_class(), 1);
    assert!(Label::Positive.message().contains("signs of Parkinson's"));
    assert!(Label::Negative.message().contains("no signs"));
}

#[test]
fn form_clear_empties_every_field() {
    let mut form = ClinicalForm {
        ppe: "0.2".to_string(),
        fhi: "300".to_string(),
        ..Default::default()
    };
    assert!(!form.is_empty());
    assert_eq!(form.values()[0], "0.2");
    assert_eq!(form.values()[7], "300");

    form.clear();
    assert!(form.is_empty());
}
