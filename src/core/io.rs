use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const READ_BUF: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| "failed to read magic bytes")?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

fn detect_gzip_variant(path: &Path) -> Result<GzipVariant> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut header = [0u8; 20];
    let n = file
        .read(&mut header)
        .with_context(|| "failed to read gzip header")?;
    Ok(gzip_variant_from_header(&header[..n]))
}

fn gzip_variant_from_header(header: &[u8]) -> GzipVariant {
    if header.len() < 14 {
        return GzipVariant::Standard;
    }
    if header[0] != 0x1f || header[1] != 0x8b {
        return GzipVariant::Standard;
    }
    // FEXTRA flag carries the block subfield.
    if header[3] & 4 == 0 {
        return GzipVariant::Standard;
    }
    if header[12] == b'B' && header[13] == b'C' {
        return GzipVariant::Bgzf;
    }
    if header[12] == b'I' && header[13] == b'G' {
        return GzipVariant::Mgzip;
    }
    GzipVariant::Standard
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> Result<Box<dyn Read + Send>> {
    let variant = detect_gzip_variant(path)?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf if threads > 1 => Box::new(
            ParDecompressBuilder::<Bgzf>::new()
                .num_threads(threads)
                .with_context(|| "failed to configure BGZF decompressor")?
                .from_reader(reader),
        ),
        GzipVariant::Mgzip if threads > 1 => Box::new(
            ParDecompressBuilder::<Mgzip>::new()
                .num_threads(threads)
                .with_context(|| "failed to configure MGZIP decompressor")?
                .from_reader(reader),
        ),
        _ => Box::new(MultiGzDecoder::new(reader)),
    };
    Ok(reader)
}

/// Opens a plain or gzip-compressed text input as a buffered reader.
pub fn open_reader(path: &Path, threads: usize) -> Result<Box<dyn BufRead + Send>> {
    match detect_input_kind(path)? {
        InputKind::Plain => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::with_capacity(READ_BUF, file)))
        }
        InputKind::Gzip => {
            let reader = open_gzip_reader(path, threads)?;
            Ok(Box::new(BufReader::with_capacity(READ_BUF, reader)))
        }
    }
}

pub fn read_to_string(path: &Path) -> Result<String> {
    let mut text = String::new();
    open_reader(path, 1)?
        .read_to_string(&mut text)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn reads_plain_and_gzip_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.txt");
        std::fs::write(&plain, "hello\n").unwrap();

        // No .gz extension: detection must fall back to magic bytes.
        let gz = dir.path().join("b.bin");
        let mut enc = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        enc.write_all(b"hello\n").unwrap();
        enc.finish().unwrap();

        assert_eq!(detect_input_kind(&plain).unwrap(), InputKind::Plain);
        assert_eq!(detect_input_kind(&gz).unwrap(), InputKind::Gzip);
        assert_eq!(read_to_string(&plain).unwrap(), "hello\n");
        assert_eq!(read_to_string(&gz).unwrap(), "hello\n");
    }

    #[test]
    fn recognises_block_gzip_headers() {
        let mut bgzf = [0u8; 18];
        bgzf[0] = 0x1f;
        bgzf[1] = 0x8b;
        bgzf[3] = 4;
        bgzf[12] = b'B';
        bgzf[13] = b'C';
        assert_eq!(gzip_variant_from_header(&bgzf), GzipVariant::Bgzf);
        bgzf[12] = b'I';
        bgzf[13] = b'G';
        assert_eq!(gzip_variant_from_header(&bgzf), GzipVariant::Mgzip);
        bgzf[3] = 0;
        assert_eq!(gzip_variant_from_header(&bgzf), GzipVariant::Standard);
        assert_eq!(gzip_variant_from_header(&bgzf[..4]), GzipVariant::Standard);
    }
}
