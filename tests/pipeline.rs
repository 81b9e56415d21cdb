use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use tempfile::NamedTempFile;

use url_count::emit::write_ranking;
use url_count::error::CountError;
use url_count::pipeline::{count_file, run};
use url_count::top_k::SelectStrategy;
use url_count::util::FreqTable;

fn input_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn key(s: &'static [u8]) -> Bytes {
    Bytes::from_static(s)
}

#[test]
fn concrete_scenario() {
    let file = input_file(&["a", "b", "a", "c", "a", "b"]);

    let table = count_file(file.path(), 3).unwrap();
    let expected: FreqTable = vec![(key(b"a"), 3), (key(b"b"), 2), (key(b"c"), 1)]
        .into_iter()
        .collect();
    assert_eq!(table, expected);

    for &strategy in &[SelectStrategy::FullSort, SelectStrategy::BoundedHeap] {
        let ranking = run(file.path(), 3, 2, strategy).unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!((&ranking[0].key[..], ranking[0].count, ranking[0].rank), (&b"a"[..], 3, 1));
        assert_eq!((&ranking[1].key[..], ranking[1].count, ranking[1].rank), (&b"b"[..], 2, 2));
    }
}

#[test]
fn partition_invariance() {
    // deterministic skewed distribution over a small alphabet
    let urls = ["http://a", "http://b", "http://c", "http://d", "http://e"];
    let lines: Vec<&str> = (0..1000).map(|i| urls[(i * i + i / 3) % 5]).collect();
    let file = input_file(&lines);

    let reference = count_file(file.path(), 1).unwrap();
    for &workers in &[2, 3, 8, 32] {
        let table = count_file(file.path(), workers).unwrap();
        assert_eq!(table, reference, "workers = {}", workers);
    }

    let total: u64 = reference.values().sum();
    assert_eq!(total, 1000);
}

#[test]
fn empty_lines_are_discarded() {
    let file = input_file(&["a", "", "b", "", "", "a"]);
    let table = count_file(file.path(), 4).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(&key(b"a")), Some(&2));
    assert_eq!(table.get(&key(b"b")), Some(&1));
    let total: u64 = table.values().sum();
    assert_eq!(total, 3);
}

#[test]
fn straddling_record_counted_once() {
    // one record much longer than the per-worker slice, so every naive
    // split point lands inside it
    let long = "x".repeat(4096);
    let file = input_file(&["a", &long, "a"]);

    for &workers in &[2, 8, 64] {
        let table = count_file(file.path(), workers).unwrap();
        assert_eq!(table.get(&Bytes::from(long.clone().into_bytes())), Some(&1));
        assert_eq!(table.get(&key(b"a")), Some(&2));
    }
}

#[test]
fn missing_final_newline() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "a\nb\na").unwrap();
    file.flush().unwrap();

    for &workers in &[1, 2, 4] {
        let table = count_file(file.path(), workers).unwrap();
        assert_eq!(table.get(&key(b"a")), Some(&2), "workers = {}", workers);
        assert_eq!(table.get(&key(b"b")), Some(&1), "workers = {}", workers);
    }
}

#[test]
fn empty_file_counts_nothing() {
    let file = NamedTempFile::new().unwrap();
    let table = count_file(file.path(), 8).unwrap();
    assert!(table.is_empty());

    let ranking = run(file.path(), 8, 10, SelectStrategy::BoundedHeap).unwrap();
    assert!(ranking.is_empty());
}

#[test]
fn missing_input_is_an_input_error() {
    let err = count_file(Path::new("no/such/urls.txt"), 4).unwrap_err();
    assert!(matches!(err, CountError::Input(_)));
}

#[test]
fn zero_workers_is_a_config_error() {
    let file = input_file(&["a"]);
    let err = count_file(file.path(), 0).unwrap_err();
    assert!(matches!(err, CountError::Config(_)));
}

#[test]
fn end_to_end_table_output() {
    let file = input_file(&["http://b", "http://a", "http://b"]);
    let ranking = run(file.path(), 2, 10, SelectStrategy::FullSort).unwrap();

    let mut out = Vec::new();
    write_ranking(&mut out, &ranking).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Rank\tURL\tCount\n1\thttp://b\t2\n2\thttp://a\t1\n"
    );
}
