//! Opaque binary bodies with a plausible leading signature.

use crate::faker::Faker;

/// `{7B5C52E4-D88C-4DA7-AEB1-5378D02996D3}`, the OneNote section file GUID.
const ONENOTE_MAGIC: [u8; 16] = [
    0xE4, 0x52, 0x5C, 0x7B, 0x8C, 0xD8, 0xA7, 0x4D, 0xAE, 0xB1, 0x53, 0x78, 0xD0, 0x29, 0x96, 0xD3,
];

fn signature(extension: &str) -> &'static [u8] {
    match extension {
        "exe" => b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xFF\xFF\x00\x00",
        "msi" => &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        "rar" => b"Rar!\x1A\x07\x00",
        "chm" => b"ITSF\x03\x00\x00\x00",
        _ => &[],
    }
}

pub(super) fn binary(fake: &mut Faker, extension: &str) -> Vec<u8> {
    let len = fake.range(1_000, 300_000);
    let mut out = signature(extension).to_vec();
    out.extend(fake.bytes(len));
    if extension == "iso" {
        // ISO 9660 keeps its volume descriptor at 0x8001.
        let at = 0x8001;
        if out.len() < at + 5 {
            out.resize(at + 5 + 2048, 0);
        }
        out[at..at + 5].copy_from_slice(b"CD001");
    }
    out
}

pub(super) fn onenote(fake: &mut Faker) -> Vec<u8> {
    let len = fake.range(1_000, 300_000);
    let mut out = ONENOTE_MAGIC.to_vec();
    out.extend(fake.bytes(len));
    out
}
