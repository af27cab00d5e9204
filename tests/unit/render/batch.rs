use super::*;
use crate::test_support::{FakeBackend, row, spec};

fn ten_rows_with_gaps() -> Vec<DataRow> {
    (1..=10)
        .map(|i| match i {
            2 => row(&[("Email", "two@example.com")]),
            5 => row(&[("Full Name", ""), ("Email", "five@example.com")]),
            _ => {
                let name = format!("Person {i}");
                row(&[("Full Name", name.as_str())])
            }
        })
        .collect()
}

#[test]
fn skipped_rows_do_not_consume_sequence_numbers() {
    let rows = ten_rows_with_gaps();
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut progress = crate::NoProgress;

    let mut batch = BatchRenderer::run(&rows, "Full Name", &spec, &mut backend, &mut progress);
    let names: Vec<String> = batch.by_ref().map(|c| c.filename).collect();
    let stats = batch.stats();

    assert_eq!(
        names,
        vec![
            "cert_001_person_1.png",
            "cert_002_person_3.png",
            "cert_003_person_4.png",
            "cert_004_person_6.png",
            "cert_005_person_7.png",
            "cert_006_person_8.png",
            "cert_007_person_9.png",
            "cert_008_person_10.png",
        ]
    );
    assert_eq!(
        stats,
        RunStats {
            total_rows: 10,
            rendered: 8,
            skipped: 2,
            failed: 0,
        }
    );
}

#[test]
fn each_pull_renders_exactly_one_certificate() {
    let rows = vec![
        row(&[("name", "Ada")]),
        row(&[("name", "")]),
        row(&[("name", "Grace")]),
    ];
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut progress = crate::NoProgress;

    {
        let mut batch = BatchRenderer::run(&rows, "name", &spec, &mut backend, &mut progress);
        let first = batch.next().unwrap();
        assert_eq!(first.filename, "cert_001_ada.png");
        assert_eq!(first.bytes, b"Ada");
        assert_eq!(batch.stats().processed(), 1);

        let second = batch.next().unwrap();
        assert_eq!(second.filename, "cert_002_grace.png");
        assert_eq!(batch.stats().skipped, 1);

        assert!(batch.next().is_none());
        assert!(batch.next().is_none());
    }
    assert_eq!(backend.calls, vec!["Ada", "Grace"]);
}

#[test]
fn failed_rows_are_counted_and_the_batch_continues() {
    let rows = vec![
        row(&[("name", "Ada")]),
        row(&[("name", "Broken")]),
        row(&[("name", "Grace")]),
    ];
    let spec = spec();
    let mut backend = FakeBackend {
        fail_on: vec!["Broken".to_string()],
        ..FakeBackend::default()
    };
    let mut progress = crate::NoProgress;

    let mut batch = BatchRenderer::run(&rows, "name", &spec, &mut backend, &mut progress);
    let names: Vec<String> = batch.by_ref().map(|c| c.filename).collect();
    assert_eq!(names, vec!["cert_001_ada.png", "cert_002_grace.png"]);
    assert_eq!(batch.stats().failed, 1);
    assert_eq!(batch.stats().rendered, 2);
}

#[test]
fn progress_counts_only_rendered_certificates() {
    let rows = ten_rows_with_gaps();
    let spec = spec();
    let mut backend = FakeBackend {
        fail_on: vec!["Person 7".to_string()],
        ..FakeBackend::default()
    };
    let mut seen = Vec::new();
    let mut reporter = |p: Progress| seen.push(p);

    let count = BatchRenderer::run(&rows, "Full Name", &spec, &mut backend, &mut reporter).count();
    assert_eq!(count, 7);

    assert!(seen.iter().all(|p| p.phase == Phase::Processing && p.total == 10));
    let currents: Vec<usize> = seen.iter().map(|p| p.current).collect();
    assert_eq!(currents, (1..=7).collect::<Vec<_>>());
}

#[test]
fn progress_matches_sequence_numbers_when_rows_are_unnamed() {
    let rows = ten_rows_with_gaps();
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut currents = Vec::new();
    let mut reporter = |p: Progress| currents.push(p.current);

    let count = BatchRenderer::run(&rows, "Full Name", &spec, &mut backend, &mut reporter).count();
    assert_eq!(count, 8);
    assert_eq!(currents, (1..=8).collect::<Vec<_>>());
}

#[test]
fn whitespace_names_are_rendered_verbatim() {
    let rows = vec![row(&[("name", " ")]), row(&[("name", "  Ada Lovelace ")])];
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut progress = crate::NoProgress;

    let names: Vec<String> = BatchRenderer::run(&rows, "name", &spec, &mut backend, &mut progress)
        .map(|c| c.filename)
        .collect();
    assert_eq!(names, vec!["cert_001__.png", "cert_002__ada_lovelace_.png"]);
    assert_eq!(backend.calls, vec![" ", "  Ada Lovelace "]);
}

#[test]
fn empty_table_yields_nothing() {
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut progress = crate::NoProgress;
    let mut batch = BatchRenderer::run(&[], "name", &spec, &mut backend, &mut progress);
    assert!(batch.next().is_none());
    assert_eq!(batch.stats(), RunStats::default());
}

#[test]
fn records_of_empty_fields_count_as_skipped_rows() {
    let table =
        crate::Table::from_reader("name,email\n,\nAda,a@example.com\n,\n".as_bytes()).unwrap();
    let spec = spec();
    let mut backend = FakeBackend::default();
    let mut progress = crate::NoProgress;

    let mut batch = BatchRenderer::run(table.rows(), "name", &spec, &mut backend, &mut progress);
    let names: Vec<String> = batch.by_ref().map(|c| c.filename).collect();
    let stats = batch.stats();

    assert_eq!(names, vec!["cert_001_ada.png"]);
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.rendered, 1);
    assert_eq!(stats.skipped, 2);
}
