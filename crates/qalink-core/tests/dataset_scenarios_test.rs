use qalink_core::{
    Aggregate, BenchConfig, CountTotals, DataSources, Dataset, Harness, Shape, Strategy, Workload,
};
use std::fs;
use std::path::Path;

const QUESTIONS_HEADER: &str =
    "questions_id,questions_author_id,questions_date_added,questions_title,questions_body\n";
const ANSWERS_HEADER: &str = "answers_id,answers_question_id,answers_date_added,answers_body\n";
const TAGS_HEADER: &str = "tags_tag_id,tags_tag_name\n";
const LINKS_HEADER: &str = "tag_questions_question_id,tag_questions_tag_id\n";

fn write(dir: &Path, name: &str, header: &str, rows: &[&str]) {
    let mut contents = header.to_string();
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join(name), contents).unwrap();
}

fn basic_fixture(dir: &Path) {
    write(
        dir,
        "questions.csv",
        QUESTIONS_HEADER,
        &["q1,u1,2016-04-26 19:08:00 UTC+0000,Title one,Body one", "q2,u2,2016-04-27,Title two,Body two"],
    );
    write(dir, "answers.csv", ANSWERS_HEADER, &["a1,q1,2016-04-29,first", "a2,q9,2016-04-29,orphan"]);
    write(dir, "tags.csv", TAGS_HEADER, &["t1,perf"]);
    write(dir, "tag_questions.csv", LINKS_HEADER, &["q1,t1"]);
}

#[test]
fn test_basic_scenario() {
    let dir = tempfile::tempdir().unwrap();
    basic_fixture(dir.path());

    let dataset = Dataset::load(&DataSources::under(Some(dir.path())));

    let q1 = dataset.question_by_id("q1").unwrap();
    let q2 = dataset.question_by_id("q2").unwrap();
    assert_eq!(dataset.tag_names(q1).collect::<Vec<_>>(), vec!["perf"]);
    assert_eq!(dataset.tag_names(q2).count(), 0);

    let a1 = &dataset.answers()[0];
    let a2 = &dataset.answers()[1];
    assert_eq!(dataset.parent_of(a1).map(|q| q.id.as_str()), Some("q1"));
    assert!(a2.question().is_none());

    let report = Harness::new(&dataset, 1).run_all();
    let expected = Aggregate::Counts(CountTotals { answers: 2, questions: 1, tags: 1 });
    for strategy in Strategy::ALL {
        assert_eq!(report.aggregate(strategy, Shape::CountOnly), Some(expected));
        assert_eq!(
            report.aggregate(strategy, Shape::StringAccumulation),
            Some(Aggregate::ResultLength("Title oneBody oneperf".len()))
        );
    }
    assert!(report.aggregates_agree());
}

#[test]
fn test_duplicate_question_id_uses_later_record() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "questions.csv",
        QUESTIONS_HEADER,
        &["q1,u1,2016-04-26,Old title,Body", "q1,u1,2016-04-27,New title,Body"],
    );
    write(dir.path(), "answers.csv", ANSWERS_HEADER, &["a1,q1,2016-04-29,answer"]);
    write(dir.path(), "tags.csv", TAGS_HEADER, &[]);
    write(dir.path(), "tag_questions.csv", LINKS_HEADER, &[]);

    let dataset = Dataset::load(&DataSources::under(Some(dir.path())));
    let indexes = dataset.indexes();

    let ordered = indexes.ordered_question("q1").unwrap();
    let hashed = indexes.hashed_question("q1").unwrap();
    assert_eq!(ordered, hashed);
    assert_eq!(dataset.question(ordered).unwrap().title, "New title");
    assert_eq!(dataset.parent_of(&dataset.answers()[0]).unwrap().title, "New title");
}

#[test]
fn test_empty_answers_source() {
    let dir = tempfile::tempdir().unwrap();
    basic_fixture(dir.path());
    write(dir.path(), "answers.csv", ANSWERS_HEADER, &[]);

    let dataset = Dataset::load(&DataSources::under(Some(dir.path())));
    let report = Harness::new(&dataset, 10).run_all();

    assert_eq!(report.results.len(), 6);
    assert!(report.results.iter().all(|r| r.aggregate.is_zero()));
}

#[test]
fn test_missing_sources_still_produce_six_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = BenchConfig::default().with_data_dir(Some(dir.path().to_path_buf())).with_iterations(5);

    let report = qalink_core::run(&config);

    assert_eq!(report.results.len(), 6);
    assert_eq!(report.dataset.questions, 0);
    assert!(report.results.iter().all(|r| r.aggregate.is_zero()));

    let mut out = Vec::new();
    report.render_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().filter(|l| l.ends_with(" ms")).count(), 6);
    assert!(text.contains("Total answers: 0, total questions: 0, total tags: 0"));
    assert!(text.contains("Result length: 0"));
}

#[test]
fn test_bad_tag_source_keeps_other_tables() {
    let dir = tempfile::tempdir().unwrap();
    basic_fixture(dir.path());
    // header lacks the name column, so no tag survives and no link can resolve
    write(dir.path(), "tags.csv", "tags_tag_id\n", &["t1"]);

    let dataset = Dataset::load(&DataSources::under(Some(dir.path())));

    assert!(dataset.tags().is_empty());
    assert_eq!(dataset.questions().len(), 2);
    assert_eq!(dataset.stats().tag_links.dropped, 1);

    let report = Harness::new(&dataset, 1).run_all();
    assert_eq!(
        report.aggregate(Strategy::OrderedIndex, Shape::CountOnly),
        Some(Aggregate::Counts(CountTotals { answers: 2, questions: 1, tags: 0 }))
    );
}

#[test]
fn test_quoted_fields_with_commas_and_newlines() {
    let dir = tempfile::tempdir().unwrap();
    basic_fixture(dir.path());
    write(
        dir.path(),
        "questions.csv",
        QUESTIONS_HEADER,
        &["q1,u1,2016-04-26,\"Rust, or C++?\",\"<p>line one\nline two</p>\""],
    );

    let dataset = Dataset::load(&DataSources::under(Some(dir.path())));
    let q1 = dataset.question_by_id("q1").unwrap();
    assert_eq!(q1.title, "Rust, or C++?");
    assert_eq!(q1.body, "<p>line one\nline two</p>");

    let harness = Harness::new(&dataset, 1);
    let result = harness.run(Workload::new(Strategy::DirectReference, Shape::StringAccumulation));
    assert_eq!(
        result.aggregate,
        Aggregate::ResultLength("Rust, or C++?".len() + "<p>line one\nline two</p>".len() + "perf".len())
    );
}
