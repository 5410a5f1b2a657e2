use std::path::Path;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream, StringFormat};
use predicates::prelude::*;

/// WinAnsi bytes for ASCII text plus the bullet used in letterheads.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            c if c.is_ascii() => c as u8,
            c => panic!("{c:?} not supported in test PDFs"),
        })
        .collect()
}

/// Single-page PDF with one text object per line list.
fn write_pdf(path: &Path, objects: &[&[&str]]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut operations = Vec::new();
    let mut y = 760;
    for lines in objects {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]));
        operations.push(Operation::new("Td", vec![50.into(), y.into()]));
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-12).into()]));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode(line), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
        y -= 40;
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn write_hetzner(path: &Path) {
    write_pdf(
        path,
        &[
            &["Hetzner Online GmbH \u{2022} Industriestr. 25"],
            &["JOHN SMITH", "1 High Street"],
            &["Invoice R0001234567"],
            &["Invoice date: 15/04/2023"],
        ],
    );
}

const HETZNER_NAME: &str = "2023-04-15 - Hetzner - John Smith - Invoice - R0001234567.pdf";

fn pdfrename() -> Command {
    let mut cmd = Command::cargo_bin("pdfrename").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_rename_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan0001.pdf");
    write_hetzner(&input);

    pdfrename()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ren \""))
        .stdout(predicate::str::contains(HETZNER_NAME));

    assert!(input.exists());
}

#[test]
fn renames_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan0001.pdf");
    write_hetzner(&input);

    pdfrename().arg("--rename").arg(&input).assert().success();

    assert!(!input.exists());
    assert!(dir.path().join(HETZNER_NAME).exists());
}

#[test]
fn does_not_overwrite_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan0001.pdf");
    write_hetzner(&input);
    std::fs::write(dir.path().join(HETZNER_NAME), b"already here").unwrap();

    pdfrename().arg("--rename").arg(&input).assert().success();

    assert!(input.exists());
    assert_eq!(std::fs::read(dir.path().join(HETZNER_NAME)).unwrap(), b"already here");
}

#[test]
fn lists_unrecognised_and_already_named_files() {
    let dir = tempfile::tempdir().unwrap();
    let unknown = dir.path().join("letter.pdf");
    write_pdf(&unknown, &[&["Dear customer"]]);
    let named = dir.path().join(HETZNER_NAME);
    write_hetzner(&named);

    pdfrename()
        .arg("--list-all")
        .arg(&unknown)
        .arg(&named)
        .assert()
        .success()
        .stdout(predicate::str::contains("# ? "))
        .stdout(predicate::str::contains("letter.pdf"))
        .stdout(predicate::str::contains("# ✓ "))
        .stdout(predicate::str::contains("ren ").not());
}

#[test]
fn skips_invalid_pdfs() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"not a pdf").unwrap();

    pdfrename()
        .arg(&broken)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("broken.pdf"));
}

#[test]
fn expands_glob_patterns() {
    let dir = tempfile::tempdir().unwrap();
    write_hetzner(&dir.path().join("a.pdf"));
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let pattern = format!("{}/*", dir.path().display());
    pdfrename()
        .arg(pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains(HETZNER_NAME));
}

#[test]
fn prints_text_boxes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("letter.pdf");
    write_pdf(&input, &[&["Dear customer"], &["Line one", "Line two"]]);

    pdfrename()
        .arg("--print-boxes")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("0: \"Dear customer\\n\""))
        .stdout(predicate::str::contains("1: \"Line one\\nLine two\\n\""));
}

#[test]
fn requires_inputs() {
    pdfrename().assert().failure();
}
