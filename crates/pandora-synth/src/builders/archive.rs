//! Archives of small text files: ZIP, tar, and gzip-compressed tar.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

use super::zipfile::ZipBuilder;
use crate::faker::{random_name, Faker};


fn members(fake: &mut Faker) -> Vec<(String, Vec<u8>)> {
    let folder = fake.word();
    (0..fake.range(1, 10))
        .map(|_| {
            let name = format!("{folder}/{}", random_name(fake.rng(), "txt"));
            let sentences = fake.range(2, 12);
            (name, fake.paragraph(sentences).into_bytes())
        })
        .collect()
}

pub(super) fn zip(fake: &mut Faker) -> io::Result<Vec<u8>> {
    let mut zip = ZipBuilder::new(fake.timestamp());
    for (name, data) in members(fake) {
        zip.add(&name, &data)?;
    }
    zip.finish()
}

pub(super) fn tar(fake: &mut Faker, gzip: bool) -> io::Result<Vec<u8>> {
    let mtime = u64::try_from(fake.timestamp().and_utc().timestamp()).unwrap_or(0);
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members(fake) {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        header.set_cksum();
        builder.append_data(&mut header, &name, data.as_slice())?;
    }
    let archive = builder.into_inner()?;
    if !gzip {
        return Ok(archive);
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&archive)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn tar_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = tar::Archive::new(bytes);
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn tar_members_are_text_files_in_one_folder() {
        let bytes = tar(&mut Faker::new(6), false).unwrap();
        let names = tar_names(&bytes);
        assert!(!names.is_empty());
        let folder = names[0].split('/').next().unwrap().to_string();
        assert!(names.iter().all(|n| n.starts_with(&folder) && n.ends_with(".txt")));
    }

    #[test]
    fn gz_wraps_the_same_tar() {
        let plain = tar(&mut Faker::new(6), false).unwrap();
        let gz = tar(&mut Faker::new(6), true).unwrap();
        let mut inflated = Vec::new();
        GzDecoder::new(gz.as_slice()).read_to_end(&mut inflated).unwrap();
        assert_eq!(inflated, plain);
    }

    #[test]
    fn zip_lists_every_member() {
        let bytes = zip(&mut Faker::new(6)).unwrap();
        let entries = crate::builders::zipfile::tests::read_entries(&bytes);
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|(n, d)| n.ends_with(".txt") && !d.is_empty()));
    }
}
