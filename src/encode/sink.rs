use crate::{foundation::error::CertResult, render::batch::RenderedCertificate};

/// Consumer of rendered certificates in row order.
///
/// Certificates are moved in and released as soon as the sink has consumed them. `finish` takes
/// the sink by value, so an archive is finalized exactly once and cannot be appended to after.
pub trait ArchiveSink {
    /// Value produced by a successful [`ArchiveSink::finish`].
    type Output;

    /// Consume one certificate.
    fn add(&mut self, cert: RenderedCertificate) -> CertResult<()>;

    /// Finalize after the last certificate.
    fn finish(self) -> CertResult<Self::Output>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    certs: Vec<RenderedCertificate>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured certificates.
    pub fn certificates(&self) -> &[RenderedCertificate] {
        &self.certs
    }
}

impl ArchiveSink for InMemorySink {
    type Output = Vec<RenderedCertificate>;

    fn add(&mut self, cert: RenderedCertificate) -> CertResult<()> {
        self.certs.push(cert);
        Ok(())
    }

    fn finish(self) -> CertResult<Self::Output> {
        Ok(self.certs)
    }
}
