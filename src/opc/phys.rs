//! Physical package access: the ZIP archive beneath an OPC package.
//!
//! Reading decompresses every member up front into an ordered list; package
//! sizes here are presentation templates, small enough that lazy
//! decompression buys nothing. Writing streams members back out with
//! Deflate compression.

use crate::opc::error::Result;
use crate::opc::packuri::PackURI;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Reader over the members of a ZIP-based OPC package.
pub struct PhysPkgReader {
    members: Vec<(String, Vec<u8>)>,
}

impl PhysPkgReader {
    /// Decompress all members of the archive in `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            members.push((file.name().to_string(), blob));
        }

        Ok(Self { members })
    }

    /// Iterate over `(membername, blob)` pairs in archive order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.members
            .iter()
            .map(|(name, blob)| (name.as_str(), blob.as_slice()))
    }

    /// The blob for a specific partname, if present.
    pub fn blob_for(&self, pack_uri: &PackURI) -> Option<&[u8]> {
        let membername = pack_uri.membername();
        self.members
            .iter()
            .find(|(name, _)| name == membername)
            .map(|(_, blob)| blob.as_slice())
    }

    /// Number of members in the package.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Writer that assembles an OPC package into an in-memory ZIP archive.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a writer backed by an in-memory buffer.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write one member with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        writer.write(&uri, b"<p:sld/>").unwrap();
        let bytes = writer.finish().unwrap();

        let reader = PhysPkgReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.blob_for(&uri), Some(&b"<p:sld/>"[..]));
    }

    #[test]
    fn test_missing_member() {
        let mut writer = PhysPkgWriter::new();
        writer
            .write(&PackURI::new("/a.xml").unwrap(), b"<a/>")
            .unwrap();
        let bytes = writer.finish().unwrap();

        let reader = PhysPkgReader::from_bytes(&bytes).unwrap();
        assert!(reader.blob_for(&PackURI::new("/b.xml").unwrap()).is_none());
    }
}
