// File-to-output pipeline tests: parse two small inputs, align, print.

use sentalign::{align_files, print_alignment, Config, InputFormat, OutputFormat};

fn temp_file(stem: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "sentalign_pipeline_{}_{}.txt",
        std::process::id(),
        stem
    ));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn ospl_files_align_and_print_links() {
    let src = temp_file("src", "le chat dort\nla maison est grande\n");
    let tgt = temp_file("tgt", "the cat sleeps\nthe house is large\n");

    let (beads, source, target) =
        align_files(InputFormat::Ospl, &src, &tgt, &Config::default()).unwrap();

    let total_src: usize = beads.iter().map(|b| b.source_len).sum();
    let total_tgt: usize = beads.iter().map(|b| b.target_len).sum();
    assert_eq!(total_src, 2);
    assert_eq!(total_tgt, 2);

    let mut buf = Vec::new();
    print_alignment(
        OutputFormat::Links,
        &mut buf,
        &beads,
        &source,
        &target,
        "src",
        "tgt",
    )
    .unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert_eq!(out.lines().count(), beads.len());
    assert!(out.starts_with("<link xtargets=\"1;"));

    let _ = std::fs::remove_file(src);
    let _ = std::fs::remove_file(tgt);
}

#[test]
fn score_output_names_only_the_files() {
    // The bead sequence must not depend on the file names; only the score
    // line's text does.
    let a1 = temp_file("a1", "une phrase\nune autre phrase\n");
    let b1 = temp_file("b1", "one sentence\nanother sentence\n");
    let a2 = temp_file("a2", "une phrase\nune autre phrase\n");
    let b2 = temp_file("b2", "one sentence\nanother sentence\n");

    let (beads1, ..) = align_files(InputFormat::Ospl, &a1, &b1, &Config::default()).unwrap();
    let (beads2, ..) = align_files(InputFormat::Ospl, &a2, &b2, &Config::default()).unwrap();

    assert_eq!(beads1.len(), beads2.len());
    for (x, y) in beads1.iter().zip(beads2.iter()) {
        assert_eq!(x.source_len, y.source_len);
        assert_eq!(x.target_len, y.target_len);
        assert!(x.score == y.score);
    }

    for p in [a1, b1, a2, b2] {
        let _ = std::fs::remove_file(p);
    }
}

#[test]
fn missing_input_file_is_an_io_error() {
    let missing = std::path::Path::new("/nonexistent/input.txt");
    let err = sentalign::load_text(InputFormat::Ospl, missing).unwrap_err();
    assert!(matches!(err, sentalign::AlignError::Io { .. }));
}

#[test]
fn arcade_in_cesalign_out_roundtrip() {
    let doc = |body: &str| format!("<text><div><p>{body}</p></div></text>");
    let src = temp_file(
        "arc_src",
        &doc("<s id=\"a1\">la maison bleue</s><s id=\"a2\">un chat</s>"),
    );
    let tgt = temp_file(
        "arc_tgt",
        &doc("<s id=\"b1\">the blue house</s><s id=\"b2\">a cat</s>"),
    );

    let (beads, source, target) =
        align_files(InputFormat::Arcade, &src, &tgt, &Config::default()).unwrap();

    let mut buf = Vec::new();
    print_alignment(
        OutputFormat::CesAlign,
        &mut buf,
        &beads,
        &source,
        &target,
        "s.sgml",
        "t.sgml",
    )
    .unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert!(out.contains("fromDoc=\"s.sgml\""));
    assert!(out.contains("a1"));
    assert!(out.contains("b1"));

    let _ = std::fs::remove_file(src);
    let _ = std::fs::remove_file(tgt);
}
