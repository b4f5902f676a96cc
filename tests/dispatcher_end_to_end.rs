//! End-to-end dispatcher tests: a real file on disk, through signature
//! matching, module parse, checksum computation, and a handler.

use std::io::Write;

use curator::dispatcher::{AbortFlag, Dispatcher};
use curator::handler::{Handler, TextHandler};
use curator::hash::ChecksumAlgorithm;
use curator::module::ModuleOptions;
use curator::modules;

fn little_endian_single_entry_tiff() -> Vec<u8> {
    let mut data = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    data.extend_from_slice(&1u16.to_le_bytes()); // one entry
    data.extend_from_slice(&256u16.to_le_bytes()); // ImageWidth
    data.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    data.extend_from_slice(&1u32.to_le_bytes()); // count
    data.extend_from_slice(&100u32.to_le_bytes()); // inline value
    data.extend_from_slice(&0u32.to_le_bytes()); // next = 0
    data
}

fn register_once() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(modules::register_all);
}

#[test]
fn dispatcher_identifies_parses_and_checksums_a_tiff_file() {
    register_once();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.tif");
    let bytes = little_endian_single_entry_tiff();
    std::fs::File::create(&path).unwrap().write_all(&bytes).unwrap();

    let dispatcher = Dispatcher {
        options: ModuleOptions::new(),
        checksum_algorithms: vec![ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1],
        abort: AbortFlag::new(),
        pinned_module: None,
        signature_only: false,
    };

    let mut output = Vec::new();
    {
        let mut handler = TextHandler::new(&mut output);
        handler.show_header().unwrap();
        dispatcher.process_path(&path, &mut handler).unwrap();
        handler.show_footer().unwrap();
        handler.close().unwrap();
    }

    let rendered = String::from_utf8(output).unwrap();
    assert!(rendered.contains("sample.tif"));
}

#[test]
fn dispatcher_walks_a_directory_depth_first_in_name_order() {
    register_once();

    let dir = tempfile::tempdir().unwrap();
    let bytes = little_endian_single_entry_tiff();
    for name in ["b.tif", "a.tif"] {
        std::fs::File::create(dir.path().join(name)).unwrap().write_all(&bytes).unwrap();
    }

    let dispatcher = Dispatcher::default();
    let mut output = Vec::new();
    {
        let mut handler = TextHandler::new(&mut output);
        dispatcher.process_path(dir.path(), &mut handler).unwrap();
    }
    let rendered = String::from_utf8(output).unwrap();
    let a_pos = rendered.find("a.tif").unwrap();
    let b_pos = rendered.find("b.tif").unwrap();
    assert!(a_pos < b_pos, "files should be visited in name-sorted order");
}

#[test]
fn abort_flag_halts_directory_traversal() {
    register_once();

    let dir = tempfile::tempdir().unwrap();
    let bytes = little_endian_single_entry_tiff();
    for name in ["a.tif", "b.tif", "c.tif"] {
        std::fs::File::create(dir.path().join(name)).unwrap().write_all(&bytes).unwrap();
    }

    let mut dispatcher = Dispatcher::default();
    dispatcher.abort.request();

    let mut output = Vec::new();
    {
        let mut handler = TextHandler::new(&mut output);
        dispatcher.process_path(dir.path(), &mut handler).unwrap();
    }
    let rendered = String::from_utf8(output).unwrap();
    assert!(!rendered.contains("a.tif"), "abort requested before the first file should skip all of them");
}

#[test]
fn signature_only_mode_matches_without_parsing() {
    register_once();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sig_only.tif");
    std::fs::File::create(&path).unwrap().write_all(&little_endian_single_entry_tiff()).unwrap();

    let dispatcher = Dispatcher { signature_only: true, ..Dispatcher::default() };

    let mut output = Vec::new();
    {
        let mut handler = TextHandler::new(&mut output);
        dispatcher.process_path(&path, &mut handler).unwrap();
    }
    let rendered = String::from_utf8(output).unwrap();
    // Signature-only mode identifies the module but never reaches the IFD
    // walker, so the well-formed status stays Undetermined rather than True.
    assert!(rendered.contains("undetermined"));
}
