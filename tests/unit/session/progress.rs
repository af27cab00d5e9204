use super::*;

#[test]
fn percent_rounds_and_handles_empty_tables() {
    assert_eq!(Progress::new(0, 0, Phase::Processing).percent(), None);
    assert_eq!(Progress::new(1, 3, Phase::Processing).percent(), Some(33));
    assert_eq!(Progress::new(2, 3, Phase::Processing).percent(), Some(67));
    assert_eq!(Progress::new(8, 8, Phase::Done).percent(), Some(100));
}

#[test]
fn closures_are_reporters() {
    let mut seen = Vec::new();
    {
        let mut reporter = |p: Progress| seen.push(p.phase);
        reporter.report(Progress::new(0, 1, Phase::Initializing));
        reporter.report(Progress::new(1, 1, Phase::Processing));
    }
    assert_eq!(seen, vec![Phase::Initializing, Phase::Processing]);
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let observer = token.clone();
    assert!(!observer.is_cancelled());
    token.cancel();
    assert!(observer.is_cancelled());
}

#[test]
fn phase_labels() {
    assert_eq!(Phase::Archiving.to_string(), "Archiving");
    assert_eq!(Phase::Initializing.as_str(), "Initializing");
}
