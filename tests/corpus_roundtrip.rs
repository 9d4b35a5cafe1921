use da_kal_align::corpus::{
    append_pairs, load_aligned_pairs, load_parallel_corpus, save_pairs, split_train_test,
};
use da_kal_align::{AlignedPair, AlignmentStats, ErrorKind};
use proptest::prelude::*;

fn pairs() -> Vec<AlignedPair> {
    [
        ("Hej med dig.", "Aluu."),
        ("Hvordan har du det?", "Qanoq ippit?"),
        ("Jeg hedder Anne.", "Anne-mik ateqarpunga."),
        ("Tak for mad.", "Qujanaq nerisitsinermut."),
        ("Mødet var den 15. januar 2024.", "Ataatsimiinneq januaarip 15-iani 2024-mi pivoq."),
    ]
    .into_iter()
    .map(|(da, kl)| AlignedPair::new(da, kl).unwrap())
    .collect()
}

#[test]
fn save_then_load_preserves_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/pairs.txt");
    let original = pairs();

    save_pairs(&original, &path).unwrap();
    let loaded = load_aligned_pairs(&path).unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn loading_skips_malformed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pairs.txt");
    std::fs::write(
        &path,
        "Hej. @ Aluu.\nno separator here\n\nfor @ mange @ dele\n  @ tom kilde\nTak. @ Qujanaq.\n",
    )
    .unwrap();

    let loaded = load_aligned_pairs(&path).unwrap();

    assert_eq!(
        loaded,
        vec![
            AlignedPair::new("Hej.", "Aluu.").unwrap(),
            AlignedPair::new("Tak.", "Qujanaq.").unwrap(),
        ]
    );
}

#[test]
fn loading_file_without_pairs_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pairs.txt");
    std::fs::write(&path, "just a line\nanother line\n").unwrap();

    let err = load_aligned_pairs(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);

    let err = load_aligned_pairs(&dir.path().join("missing.txt")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn split_is_deterministic_and_partitions_pairs() {
    let original = pairs();
    let (train_a, test_a) = split_train_test(&original, 0.2, 42).unwrap();
    let (train_b, test_b) = split_train_test(&original, 0.2, 42).unwrap();

    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);
    assert_eq!(train_a.len(), 4);
    assert_eq!(test_a.len(), 1);

    let mut all: Vec<AlignedPair> = train_a.into_iter().chain(test_a).collect();
    let mut expected = original;
    all.sort_by(|a, b| a.source.cmp(&b.source));
    expected.sort_by(|a, b| a.source.cmp(&b.source));
    assert_eq!(all, expected);
}

#[test]
fn append_keeps_backup_of_previous_training_file() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.txt");
    let backup = dir.path().join("train.txt.backup");
    let corpus = dir.path().join("corpus.txt");

    save_pairs(&pairs()[..2], &train).unwrap();
    std::fs::write(
        &corpus,
        "DA: Godmorgen.\nKL: Ullaakkut.\nCONF: 0.9\n\nDA: Usikker.\nKL: Nalornisoq.\nCONF: 0.1\n",
    )
    .unwrap();

    let new_pairs = load_parallel_corpus(&corpus, 0.5).unwrap();
    assert_eq!(new_pairs, vec![AlignedPair::new("Godmorgen.", "Ullaakkut.").unwrap()]);

    let total = append_pairs(&train, &new_pairs, &backup).unwrap();
    assert_eq!(total, 3);
    assert_eq!(load_aligned_pairs(&backup).unwrap().len(), 2);
    assert_eq!(load_aligned_pairs(&train).unwrap()[2].target, "Ullaakkut.");
}

#[test]
fn stats_file_round_trips_and_requires_both_ratios() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed/alignment_stats.json");
    let stats = AlignmentStats {
        avg_word_ratio: 1.4823,
        avg_char_ratio: 0.7531,
    };

    stats.save(&path).unwrap();
    assert_eq!(AlignmentStats::load(&path).unwrap(), stats);

    std::fs::write(&path, r#"{"avg_word_ratio": 1.48}"#).unwrap();
    let err = AlignmentStats::load(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

fn sentence(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(word, 1..8).prop_map(|words| words.join(" "))
}

fn pair_list(word: &'static str) -> impl Strategy<Value = Vec<AlignedPair>> {
    prop::collection::vec(
        (sentence(word), sentence(word))
            .prop_map(|(source, target)| AlignedPair::new(source, target).unwrap()),
        1..12,
    )
}

proptest! {
    #[test]
    fn pairs_without_at_signs_always_round_trip(pairs in pair_list("[A-Za-zæøåÆØÅ0-9.,!?'-]{1,10}")) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.txt");

        save_pairs(&pairs, &path).unwrap();
        prop_assert_eq!(load_aligned_pairs(&path).unwrap(), pairs);
    }

    #[test]
    fn saved_pairs_load_back_unchanged(pairs in pair_list("[A-Za-zæø0-9.,@]{1,6}")) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.txt");

        match save_pairs(&pairs, &path) {
            Ok(()) => prop_assert_eq!(load_aligned_pairs(&path).unwrap(), pairs),
            Err(err) => prop_assert_eq!(err.kind(), ErrorKind::InvalidFormat),
        }
    }
}
