use std::collections::HashSet;

use crate::common::PosTag;
use crate::config::{GcsOptions, OrderMode, PosFilter, SplitMode};
use crate::pipeline::Pipeline;
use crate::resolver::{Confidence, LemmaQuery, LemmaResolver};
use crate::splitter::CompoundSplitter;

use super::fixtures::{context, gcs_excluding_verbs};

const TEXT: &str = "Die Haustür und die Haustür. Der Mann, die Männer und das Haus! \
Die Arbeitsplatzsicherheit ist wichtig. Die Haustür ist wichtig.";

#[test]
fn test_no_duplicate_lemmas() {
    let ctx = context("", true);
    for mode in [SplitMode::Separate, SplitMode::Combined] {
        for preserve in [false, true] {
            let config = gcs_excluding_verbs()
                .split_mode(mode)
                .preserve_compound(preserve)
                .build()
                .unwrap();
            let entries = Pipeline::new(&ctx, config).extract_words(TEXT);
            let keys: HashSet<_> = entries.iter().map(|e| (&e.lemma, e.language)).collect();
            assert_eq!(entries.len(), keys.len(), "{mode:?} {preserve}");
        }
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let ctx = context("\tMänner\tMann\n", true);
    let config = gcs_excluding_verbs()
        .preserve_compound(true)
        .context_size(1)
        .order(OrderMode::Frequency)
        .build()
        .unwrap();
    let pipeline = Pipeline::new(&ctx, config.clone());
    let first = format!("{:?}", pipeline.run(TEXT));
    for _ in 0..3 {
        assert_eq!(first, format!("{:?}", pipeline.run(TEXT)));
    }
    let other = Pipeline::new(&ctx, config);
    assert_eq!(first, format!("{:?}", other.run(TEXT)));
}

#[test]
fn test_splitting_is_deterministic() {
    let ctx = context("", true);
    let splitter = CompoundSplitter::new(&ctx);
    for skip_merge_fractions in [false, true] {
        for preserve_compound in [false, true] {
            let options = GcsOptions {
                pos_filter: PosFilter::except([PosTag::Verb]),
                preserve_compound,
                skip_merge_fractions,
                ..GcsOptions::default()
            };
            for word in ["Arbeitsplatzsicherheit", "Haustürhut", "Xhaustür", "Mann"] {
                let first = splitter.split(word, PosTag::Noun, &options, "");
                let again = CompoundSplitter::new(&ctx).split(word, PosTag::Noun, &options, "");
                assert_eq!(first, again);
                assert_eq!(first, splitter.split(word, PosTag::Noun, &options, ""));
            }
        }
    }
}

#[test]
fn test_override_beats_index() {
    let ctx = context("\tHaus\tGebäude\n", true);
    let resolver = LemmaResolver::new();
    let r = resolver.resolve(&LemmaQuery::new("Haus", PosTag::Noun), &ctx);
    assert_eq!("Gebäude", r.lemma);
    assert_eq!(Confidence::Forced, r.confidence);
    assert_eq!(r, resolver.resolve(&LemmaQuery::new("Haus", PosTag::Noun), &ctx));

    let config = gcs_excluding_verbs().build().unwrap();
    let entries = Pipeline::new(&ctx, config).extract_words("Das Haus und die Haustür.");
    let lemmas: Vec<_> = entries.iter().map(|e| e.lemma.as_str()).collect();
    // Compound components go through the same rules.
    assert_eq!(vec!["Das", "Gebäude", "und", "der", "Tür"], lemmas);
}

#[test]
fn test_preserve_compound_word() {
    let ctx = context("", true);
    let run = |preserve| {
        let config = gcs_excluding_verbs()
            .preserve_compound(preserve)
            .build()
            .unwrap();
        Pipeline::new(&ctx, config)
            .extract_words("Die Haustür klemmt.")
            .into_iter()
            .map(|e| e.lemma)
            .collect::<Vec<_>>()
    };
    assert_eq!(vec!["der", "Haustür", "Haus", "Tür", "klemmt"], run(true));
    assert_eq!(vec!["der", "Haus", "Tür", "klemmt"], run(false));
}
