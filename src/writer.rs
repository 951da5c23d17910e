//! Generic Buffered Writer, for efficient RINEX production,
//! with integrated optionnal .gz compression
use std::io::{BufWriter, Error, Write};

#[cfg(feature = "flate2")]
use flate2::{write::GzEncoder, Compression};

/// [BufferedWriter] is an Output abstraction to propose seamless
/// Gzip and Readable content streaming.
#[derive(Debug)]
pub enum BufferedWriter<W: Write> {
    /// Readable stream
    Plain(BufWriter<W>),
    /// Gzip compressed stream (non readable)
    #[cfg(feature = "flate2")]
    Gz(BufWriter<GzEncoder<W>>),
}

impl<W: Write> BufferedWriter<W> {
    /// Creates new Readable [BufferedWriter]
    pub fn plain(w: W) -> Self {
        Self::Plain(BufWriter::new(w))
    }
    #[cfg(feature = "flate2")]
    /// Creates new [BufferedWriter] to streamed gzip encoded content with
    /// desired compression level. The higher the order, the lower the performance.
    pub fn gzip(w: W, compression_level: u32) -> Self {
        Self::Gz(BufWriter::new(GzEncoder::new(
            w,
            Compression::new(compression_level),
        )))
    }
    /// Flushes pending content, terminates the gzip stream if any,
    /// and returns the underlying [Write]able.
    pub fn finish(self) -> Result<W, Error> {
        match self {
            Self::Plain(writer) => writer.into_inner().map_err(|e| e.into_error()),
            #[cfg(feature = "flate2")]
            Self::Gz(writer) => writer.into_inner().map_err(|e| e.into_error())?.finish(),
        }
    }
}

impl<W: Write> Write for BufferedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        match self {
            Self::Plain(ref mut writer) => writer.write(buf),
            #[cfg(feature = "flate2")]
            Self::Gz(ref mut writer) => writer.write(buf),
        }
    }
    fn flush(&mut self) -> Result<(), Error> {
        match self {
            Self::Plain(ref mut writer) => writer.flush(),
            #[cfg(feature = "flate2")]
            Self::Gz(ref mut writer) => writer.flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::toolkit::Utf8Buffer;

    #[test]
    fn plain() {
        let mut writer = BufferedWriter::plain(Utf8Buffer::new(128));
        writeln!(writer, "> 2020 01 16 11 06 40.0000000  0  0").unwrap();
        let buffer = writer.finish().unwrap();
        assert_eq!(
            buffer.to_ascii_utf8(),
            "> 2020 01 16 11 06 40.0000000  0  0\n"
        );
    }

    #[test]
    #[cfg(feature = "flate2")]
    fn gzip() {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let mut writer = BufferedWriter::gzip(Vec::new(), 6);
        writeln!(writer, "END OF HEADER").unwrap();
        let compressed = writer.finish().unwrap();

        let mut content = String::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "END OF HEADER\n");
    }
}
