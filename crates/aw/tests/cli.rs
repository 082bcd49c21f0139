use assert_cmd::prelude::*;
use byteorder::{BigEndian, WriteBytesExt};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

struct Entry<'a> {
    path: &'a str,
    data: Vec<u8>,
    compress: bool,
    declared: Option<u32>,
}

fn write_archive(path: &Path, entries: &[Entry]) {
    let mut out = Vec::new();
    let mut headers = Vec::new();

    for entry in entries {
        let offset = out.len() as u32;
        let stored = if entry.compress {
            lz4_flex::block::compress(&entry.data)
        } else {
            entry.data.clone()
        };
        out.extend_from_slice(&stored);

        headers.extend_from_slice(entry.path.as_bytes());
        headers.push(0);
        headers
            .write_u32::<BigEndian>(entry.declared.unwrap_or(entry.data.len() as u32))
            .unwrap();
        headers.write_u32::<BigEndian>(stored.len() as u32).unwrap();
        headers.write_u32::<BigEndian>(offset).unwrap();
        headers.write_u32::<BigEndian>(entry.compress as u32).unwrap();
    }

    let first = out.len() as u32;
    out.extend_from_slice(&headers);
    out.write_u32::<BigEndian>(first).unwrap();
    out.write_u32::<BigEndian>(entries.len() as u32).unwrap();
    std::fs::write(path, out).unwrap();
}

fn texture() -> Vec<u8> {
    let mut data = vec![0xFFu8; 2 * 2 * 4];
    data.extend_from_slice(&[0x08, 0x08, 0x08, 0x08]);
    for v in [2u16, 2, 2, 2] {
        data.write_u16::<BigEndian>(v).unwrap();
    }
    data
}

#[test]
fn test_cli_archive_extract() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("archive.bin");
    write_archive(
        &archive,
        &[
            Entry {
                path: "game/DAT/intro2011.mac",
                data: b"bytecode bytecode bytecode bytecode".to_vec(),
                compress: true,
                declared: None,
            },
            Entry {
                path: "game/BMP/file064.bms",
                data: b"BM".to_vec(),
                compress: false,
                declared: None,
            },
            Entry {
                path: "game/BGZ/data1728x1080/e1.awt",
                data: texture(),
                compress: false,
                declared: None,
            },
        ],
    );

    let out = dir.path().join("dump");
    Command::cargo_bin("aw")
        .unwrap()
        .arg("archive")
        .arg("extract")
        .arg("--file")
        .arg(&archive)
        .arg("--directory")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        std::fs::read(out.join("game/DAT/intro2011.mac")).unwrap(),
        b"bytecode bytecode bytecode bytecode"
    );
    assert_eq!(std::fs::read(out.join("game/BMP/file064.bmp")).unwrap(), b"BM");
    assert!(out.join("game/BGZ/data1728x1080/e1.awt").is_file());
    assert!(out.join("game/BGZ/data1728x1080/e1.png").is_file());
}

#[test]
fn test_cli_archive_extract_continues_after_bad_entry() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("archive.bin");
    write_archive(
        &archive,
        &[
            Entry {
                path: "broken.mat",
                data: vec![0x42; 256],
                compress: true,
                declared: Some(512),
            },
            Entry {
                path: "fine.txt",
                data: b"still here".to_vec(),
                compress: false,
                declared: None,
            },
        ],
    );
    let missing = dir.path().join("missing.bin");

    let out = dir.path().join("dump");
    Command::cargo_bin("aw")
        .unwrap()
        .arg("archive")
        .arg("extract")
        .arg("--file")
        .arg(&missing)
        .arg("--file")
        .arg(&archive)
        .arg("--directory")
        .arg(&out)
        .assert()
        .failure();

    assert!(!out.join("broken.mat").exists());
    assert_eq!(std::fs::read(out.join("fine.txt")).unwrap(), b"still here");
}

#[test]
fn test_cli_archive_extract_survives_corrupt_footer() {
    let dir = tempdir().unwrap();
    let corrupt = dir.path().join("corrupt.bin");
    std::fs::write(&corrupt, [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();

    let archive = dir.path().join("archive.bin");
    write_archive(
        &archive,
        &[Entry {
            path: "after.txt",
            data: b"next archive".to_vec(),
            compress: false,
            declared: None,
        }],
    );

    let out = dir.path().join("dump");
    Command::cargo_bin("aw")
        .unwrap()
        .arg("archive")
        .arg("extract")
        .arg("--file")
        .arg(&corrupt)
        .arg("--file")
        .arg(&archive)
        .arg("--directory")
        .arg(&out)
        .assert()
        .failure()
        .code(1);

    assert_eq!(std::fs::read(out.join("after.txt")).unwrap(), b"next archive");
}

#[test]
fn test_cli_archive_list() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("archive.bin");
    write_archive(
        &archive,
        &[Entry {
            path: "a.bin",
            data: vec![1, 2, 3, 4],
            compress: false,
            declared: None,
        }],
    );

    let assert = Command::cargo_bin("aw")
        .unwrap()
        .arg("archive")
        .arg("list")
        .arg("--file")
        .arg(&archive)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("0x4, 1 files"));
    assert!(stdout.contains("a.bin 4 4 0x0 stored"));
}

/// Write every part file and externally prepared file, returning the input and external directories
/// and the bank size they make up
fn write_bank_inputs(dir: &Path) -> (PathBuf, PathBuf, usize) {
    let input = dir.join("iso");
    let external = dir.join("external");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::create_dir_all(&external).unwrap();

    let mut size = 0;
    for part in aw_bank::PARTS.iter() {
        std::fs::write(input.join(part.script_file_name()), [0x01; 10]).unwrap();
        std::fs::write(input.join(part.polygons_file_name()), [0x02; 20]).unwrap();
        std::fs::write(external.join(part.palette_file_name()), [0x03; 30]).unwrap();
        size += 60;
    }
    std::fs::write(external.join(aw_bank::parts::shared_bank_file_name()), [0x04; 40]).unwrap();
    size += 40;

    (input, external, size)
}

#[test]
fn test_cli_bank_build() {
    let dir = tempdir().unwrap();
    let (input, external, mut expected_size) = write_bank_inputs(dir.path());

    #[rustfmt::skip]
    let sound = [
        0x00, 0x00, 0x00, 0x08,
        0x00, 0x00, 0x00, 0x0B,
        0x50, 0x50, 0x01,
        0x00, 0x00, 0x00, 0x02, 0x81, 0x01,
    ];
    std::fs::write(input.join("intro.snd"), sound).unwrap();
    expected_size += 6;

    let out = dir.path().join("out");
    Command::cargo_bin("aw")
        .unwrap()
        .arg("bank")
        .arg("build")
        .arg("--directory")
        .arg(&input)
        .arg("--external")
        .arg(&external)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let memlist = std::fs::read(out.join("memlist.bin")).unwrap();
    assert_eq!(memlist.len(), 146 * 20 + 1);
    assert_eq!(memlist.last(), Some(&0xFF));

    let bank = std::fs::read(out.join("bank0f")).unwrap();
    assert_eq!(bank.len(), expected_size);

    // Sound 0x50 is the first populated slot after the parts
    let record = &memlist[0x50 * 20..0x51 * 20];
    assert_eq!(record[1], 0);
    assert_eq!(&record[12..20], &[0, 0, 0, 6, 0, 0, 0, 6]);
    let offset = u32::from_be_bytes([record[8], record[9], record[10], record[11]]) as usize;
    assert_eq!(&bank[offset..offset + 6], &[0x00, 0x01, 0x00, 0x01, 0xFF, 0x01]);

    // Running again without --overwrite refuses to clobber the outputs
    Command::cargo_bin("aw")
        .unwrap()
        .arg("bank")
        .arg("build")
        .arg("--directory")
        .arg(&input)
        .arg("--external")
        .arg(&external)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure();
}

#[test]
fn test_cli_bank_build_fails_on_skipped_sound() {
    let dir = tempdir().unwrap();
    let (input, external, expected_size) = write_bank_inputs(dir.path());

    #[rustfmt::skip]
    let sound = [
        0x00, 0x00, 0x00, 0x0C,
        0x00, 0x00, 0x00, 0x10,
        0x00, 0x00, 0x00, 0x16,
        // Sounds 0x50 and 0x51
        0x50, 0x51, 0x01, 0x02,
        // Declares 0x40 samples in a 6 byte segment
        0x00, 0x00, 0x00, 0x40, 0x01, 0x01,
        0x00, 0x00, 0x00, 0x02, 0x81, 0x01,
    ];
    std::fs::write(input.join("intro.snd"), sound).unwrap();

    let out = dir.path().join("out");
    Command::cargo_bin("aw")
        .unwrap()
        .arg("bank")
        .arg("build")
        .arg("--directory")
        .arg(&input)
        .arg("--external")
        .arg(&external)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure();

    // The bank is still written with the sound that converted
    let memlist = std::fs::read(out.join("memlist.bin")).unwrap();
    assert_eq!(memlist.len(), 146 * 20 + 1);
    assert_eq!(&memlist[0x50 * 20..0x51 * 20], &[0u8; 20]);
    assert_eq!(&memlist[0x51 * 20 + 12..0x52 * 20], &[0, 0, 0, 6, 0, 0, 0, 6]);

    let bank = std::fs::read(out.join("bank0f")).unwrap();
    assert_eq!(bank.len(), expected_size + 6);
}
