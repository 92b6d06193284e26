use std::fs;
use std::path::Path;

use huff::tools::cli::HuffOpts;
use huff::{compress, decode, decompress, HuffError};
use tempfile::tempdir;

fn encode_opts(input: &Path, archive: &Path, threads: usize) -> HuffOpts {
    let mut opts = HuffOpts::encode(input.to_str().unwrap());
    opts.output = Some(archive.to_str().unwrap().to_string());
    opts.threads = threads;
    opts
}

#[test]
fn restores_file_under_recorded_name() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("story.txt");
    let archive = dir.path().join("story.huff");
    let text = "It was the best of times, it was the worst of times. ".repeat(500);
    fs::write(&input, &text).unwrap();

    let stats = compress(&encode_opts(&input, &archive, 4)).unwrap();
    assert_eq!(stats.input_bytes, text.len() as u64);
    assert!(stats.archive_bytes() < text.len());
    assert_eq!(fs::metadata(&archive).unwrap().len(), stats.archive_bytes() as u64);

    fs::remove_file(&input).unwrap();
    let written = decompress(&HuffOpts::decode(archive.to_str().unwrap())).unwrap();
    assert_eq!(written, input);
    assert_eq!(fs::read_to_string(&input).unwrap(), text);
}

#[test]
fn output_override_on_decode() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("bytes.bin");
    let archive = dir.path().join("bytes.huff");
    let restored = dir.path().join("restored.bin");
    let data: Vec<u8> = (0..250_000_u32).map(|i| (i ^ (i >> 5)) as u8).collect();
    fs::write(&input, &data).unwrap();

    compress(&encode_opts(&input, &archive, 8)).unwrap();

    let mut opts = HuffOpts::decode(archive.to_str().unwrap());
    opts.output = Some(restored.to_str().unwrap().to_string());
    assert_eq!(decompress(&opts).unwrap(), restored);
    assert_eq!(fs::read(&restored).unwrap(), data);
    // The original is left alone
    assert_eq!(fs::read(&input).unwrap(), data);
}

#[test]
fn archives_do_not_depend_on_thread_count() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("same.bin");
    let data: Vec<u8> = (0..500_000_u32).map(|i| (i % 7 * i % 13) as u8).collect();
    fs::write(&input, &data).unwrap();

    let mut archives = vec![];
    for threads in [1, 2, 4, 16] {
        let archive = dir.path().join(format!("t{}.huff", threads));
        compress(&encode_opts(&input, &archive, threads)).unwrap();
        archives.push(fs::read(&archive).unwrap());
    }
    assert!(archives.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn empty_file_roundtrip() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("empty.txt");
    let archive = dir.path().join("empty.huff");
    let restored = dir.path().join("empty.out");
    fs::write(&input, b"").unwrap();

    compress(&encode_opts(&input, &archive, 4)).unwrap();
    let mut opts = HuffOpts::decode(archive.to_str().unwrap());
    opts.output = Some(restored.to_str().unwrap().to_string());
    decompress(&opts).unwrap();
    assert!(fs::read(&restored).unwrap().is_empty());
}

#[test]
fn rejects_wrong_extension() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("plain.txt");
    let archive = dir.path().join("plain.bin");
    fs::write(&input, b"abc").unwrap();
    compress(&encode_opts(&input, &archive, 1)).unwrap();

    let result = decompress(&HuffOpts::decode(archive.to_str().unwrap()));
    assert!(matches!(result, Err(HuffError::BadExtension(_))));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("not-there.txt");
    let archive = dir.path().join("x.huff");

    assert!(matches!(
        compress(&encode_opts(&input, &archive, 1)),
        Err(HuffError::Io(_))
    ));
    assert!(matches!(
        decompress(&HuffOpts::decode(archive.to_str().unwrap())),
        Err(HuffError::Io(_))
    ));
}

#[test]
fn truncated_archive_fails_cleanly() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("cut.txt");
    let archive = dir.path().join("cut.huff");
    fs::write(&input, "truncate me somewhere in the header").unwrap();
    compress(&encode_opts(&input, &archive, 1)).unwrap();

    let bytes = fs::read(&archive).unwrap();
    for cut in 0..bytes.len() {
        assert!(decode(&bytes[..cut]).is_err(), "cut at {} decoded", cut);
    }
}
