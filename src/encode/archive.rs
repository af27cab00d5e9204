use std::io::{Seek, Write};

use crate::{
    encode::sink::ArchiveSink,
    foundation::error::{CertError, CertResult},
    render::batch::RenderedCertificate,
};

/// DEFLATE level used for archive members.
pub const DEFLATE_LEVEL: i64 = 6;

/// Streams certificates into a ZIP archive, one member per [`ArchiveSink::add`].
///
/// Each member is compressed and written to `W` immediately; only the central directory is kept
/// in memory until [`ArchiveSink::finish`].
pub struct ZipArchiveSink<W: Write + Seek> {
    zip: zip::ZipWriter<W>,
    members: usize,
}

impl<W: Write + Seek> ZipArchiveSink<W> {
    /// Start an archive on `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            zip: zip::ZipWriter::new(writer),
            members: 0,
        }
    }

    /// Members written so far.
    pub fn len(&self) -> usize {
        self.members
    }

    /// Return `true` when no member has been written.
    pub fn is_empty(&self) -> bool {
        self.members == 0
    }

    fn member_options() -> zip::write::SimpleFileOptions {
        zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .compression_level(Some(DEFLATE_LEVEL))
    }
}

impl<W: Write + Seek> std::fmt::Debug for ZipArchiveSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchiveSink")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Seek> ArchiveSink for ZipArchiveSink<W> {
    type Output = W;

    fn add(&mut self, cert: RenderedCertificate) -> CertResult<()> {
        self.zip
            .start_file(cert.filename.as_str(), Self::member_options())
            .map_err(|e| CertError::archive(format!("start member '{}': {e}", cert.filename)))?;
        self.zip
            .write_all(&cert.bytes)
            .map_err(|e| CertError::archive(format!("write member '{}': {e}", cert.filename)))?;
        self.members += 1;
        Ok(())
    }

    fn finish(self) -> CertResult<W> {
        let members = self.members;
        let mut writer = self
            .zip
            .finish()
            .map_err(|e| CertError::archive(format!("write central directory: {e}")))?;
        writer
            .flush()
            .map_err(|e| CertError::archive(format!("flush archive: {e}")))?;
        tracing::debug!(members, "archive finalized");
        Ok(writer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/archive.rs"]
mod tests;
