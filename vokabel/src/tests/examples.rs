use crate::pipeline::Pipeline;
use crate::splitter::CompoundSplitter;
use crate::common::PosTag;

use super::fixtures::{context, gcs_excluding_verbs, german};

fn lemmas(pipeline: &Pipeline, text: &str) -> Vec<String> {
    pipeline
        .extract_words(text)
        .into_iter()
        .map(|e| e.lemma)
        .collect()
}

#[test]
fn test_override_short_circuits_splitting() {
    let ctx = context("\tArbeitsplatzsicherheit\tSicherheit\n", true);
    let pipeline = Pipeline::new(&ctx, gcs_excluding_verbs().build().unwrap());
    let entries = pipeline.extract_words("Die Arbeitsplatzsicherheit ist wichtig.");

    let lemmas: Vec<_> = entries.iter().map(|e| e.lemma.as_str()).collect();
    assert_eq!(vec!["der", "Sicherheit", "sein", "wichtig"], lemmas);
    assert_eq!(Some("safety"), entries[1].gloss.as_deref());
    assert_eq!(vec!["Arbeitsplatzsicherheit"], entries[1].source_forms);
}

#[test]
fn test_split_into_annotated_stems() {
    let ctx = context("", true);
    let pipeline = Pipeline::new(&ctx, gcs_excluding_verbs().build().unwrap());
    let entries = pipeline.extract_words("Die Arbeitsplatzsicherheit steigt.");

    let lemmas: Vec<_> = entries.iter().map(|e| e.lemma.as_str()).collect();
    assert_eq!(
        vec!["der", "Arbeit", "Platz", "Sicherheit", "steigen"],
        lemmas
    );
    let glosses: Vec<_> = entries[1..4].iter().map(|e| e.gloss.as_deref()).collect();
    assert_eq!(vec![Some("work"), Some("place"), Some("safety")], glosses);

    // The components cover the whole word, linking morphemes included.
    let options = ctx_options();
    let result = CompoundSplitter::new(&ctx).split("Arbeitsplatzsicherheit", PosTag::Noun, &options, "");
    assert_eq!(22, result.components.iter().map(|c| c.coverage).sum::<usize>());
    assert_eq!("arbeit", result.components[0].surface.to_lowercase());
    assert_eq!(7, result.components[0].coverage);
}

fn ctx_options() -> crate::config::GcsOptions {
    gcs_excluding_verbs().build().unwrap().gcs().unwrap().clone()
}

#[test]
fn test_genitive_fix() {
    let ctx = context("", true);

    let pipeline = Pipeline::new(&ctx, german().build().unwrap());
    assert!(lemmas(&pipeline, "Das Buch des Mannes.").contains(&"Mannes".to_string()));

    let pipeline = Pipeline::new(&ctx, german().fix_genitive(true).build().unwrap());
    let entries = pipeline.extract_words("Das Buch des Mannes.");
    let mann = entries.iter().find(|e| e.lemma == "Mann").unwrap();
    assert_eq!(vec!["Mannes"], mann.source_forms);
    assert_eq!(Some("man"), mann.gloss.as_deref());
    assert!(entries.iter().all(|e| e.lemma != "Mannes"));
}

#[test]
fn test_missing_dictionary() {
    let ctx = context("", false);
    let pipeline = Pipeline::new(&ctx, gcs_excluding_verbs().build().unwrap());
    let entries = pipeline.extract_words("Die Arbeitsplatzsicherheit steigt. Das Haus ist alt.");
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e.gloss.is_none()));
}

#[test]
fn test_sentence_initial_compound_is_split() {
    let ctx = context("", true);
    let pipeline = Pipeline::new(&ctx, german().gcs(true).build().unwrap());
    let entries = pipeline.extract_words("Arbeitsplatzsicherheit ist wichtig.");

    let lemmas: Vec<_> = entries.iter().map(|e| e.lemma.as_str()).collect();
    assert_eq!(
        vec!["Arbeit", "Platz", "Sicherheit", "sein", "wichtig"],
        lemmas
    );
    assert_eq!(PosTag::Noun, entries[0].pos);
    assert_eq!(Some("work"), entries[0].gloss.as_deref());
}

#[test]
fn test_sentence_initial_function_word_is_lowercased() {
    let ctx = context("", true);
    let pipeline = Pipeline::new(&ctx, german().build().unwrap());
    assert_eq!(
        vec!["wichtig", "sein", "das"],
        lemmas(&pipeline, "Wichtig ist das. Das ist wichtig.")
    );
}
