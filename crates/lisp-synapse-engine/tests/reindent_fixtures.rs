use lisp_synapse_engine::{Buffer, ModeConfig, reindent_all};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

#[test]
fn fixture_top_level_forms() {
    let src = fixture("sample.lisp");
    let golden = fixture("sample.golden.lisp");

    let mut buf = Buffer::from_text(&src);
    reindent_all(&mut buf, &ModeConfig::default());
    assert_eq!(buf.text(), golden);
}

/// Reindenting already-correct output must change nothing.
#[test]
fn golden_fixture_is_stable() {
    let golden = fixture("sample.golden.lisp");

    let mut buf = Buffer::from_text(&golden);
    reindent_all(&mut buf, &ModeConfig::default());
    assert_eq!(buf.text(), golden);
}
