//! Controller probe and mode list walk against a scripted firmware

mod common;

use common::{good_mode, mode_block, MockBios};
use vesacon_display::{ModeEnumerator, VesaInitError};

#[test]
fn test_probe_reads_general_info() {
    let mut bios = MockBios::single_good_mode();
    let modes = ModeEnumerator::probe(&mut bios, 0x0200).unwrap();
    let info = modes.general_info();
    assert!(info.has_vesa_signature());
    assert_eq!(info.version, 0x0200);
    assert_eq!(info.version_pair(), (2, 0));
    assert_eq!(info.total_memory_bytes(), 128 * 64 * 1024);
}

#[test]
fn test_probe_firmware_failure() {
    let mut bios = MockBios::single_good_mode();
    bios.general_status = 0x014F;
    let err = ModeEnumerator::probe(&mut bios, 0x0200).err();
    assert_eq!(err, Some(VesaInitError::FirmwareCallFailed));
}

#[test]
fn test_probe_short_bounce_region() {
    let mut bios = MockBios::single_good_mode();
    bios.bounce_len = 600;
    let err = ModeEnumerator::probe(&mut bios, 0x0200).err();
    assert_eq!(err, Some(VesaInitError::FirmwareCallFailed));
    assert!(bios.calls.is_empty());
}

#[test]
fn test_probe_bad_signature() {
    let mut bios = MockBios::single_good_mode();
    bios.signature = *b"VBE2";
    let err = ModeEnumerator::probe(&mut bios, 0x0200).err();
    assert_eq!(err, Some(VesaInitError::BadSignature));
    assert_eq!(bios.count(0x4F01), 0);
}

#[test]
fn test_probe_old_version() {
    let mut bios = MockBios::single_good_mode();
    bios.version = 0x0102;
    let err = ModeEnumerator::probe(&mut bios, 0x0200).err();
    assert_eq!(err, Some(VesaInitError::UnsupportedVersion));
}

#[test]
fn test_walk_in_list_order_until_sentinel() {
    let mut bios = MockBios::new(vec![
        (0x101, Some(mode_block(640, 480, 8, 0x001B, 4, (0, 0, 0)))),
        (0x112, Some(mode_block(640, 480, 24, 0x009B, 6, (16, 8, 0)))),
        (0x118, Some(good_mode())),
    ]);
    let found: Vec<u16> = ModeEnumerator::probe(&mut bios, 0x0200)
        .unwrap()
        .map(|mi| mi.mode)
        .collect();

    assert_eq!(found, vec![0x101, 0x112, 0x118]);
    assert_eq!(bios.mode_queries(), vec![0x101, 0x112, 0x118]);
    assert!(!bios.mode_queries().contains(&0xFFFF));
}

#[test]
fn test_walk_skips_failed_mode_query() {
    let mut bios = MockBios::new(vec![(0x105, None), (0x118, Some(good_mode()))]);
    let found: Vec<u16> = ModeEnumerator::probe(&mut bios, 0x0200)
        .unwrap()
        .map(|mi| mi.mode)
        .collect();

    assert_eq!(found, vec![0x118]);
    assert_eq!(bios.mode_queries(), vec![0x105, 0x118]);
}

#[test]
fn test_empty_mode_list() {
    let mut bios = MockBios::new(Vec::new());
    let mut modes = ModeEnumerator::probe(&mut bios, 0x0200).unwrap();
    assert!(modes.next().is_none());
    assert!(modes.next().is_none());
    drop(modes);
    assert_eq!(bios.count(0x4F01), 0);
}

#[test]
fn test_decoded_fields() {
    let mut bios = MockBios::single_good_mode();
    let mi = ModeEnumerator::probe(&mut bios, 0x0200)
        .unwrap()
        .next()
        .unwrap();
    assert_eq!((mi.h_res, mi.v_res, mi.bpp), (640, 480, 32));
    assert_eq!(mi.bytes_per_line, 2560);
    assert_eq!(mi.lfb_ptr, 0xFD00_0000);
    assert_eq!(mi.attributes.bits(), 0x009B);
}
