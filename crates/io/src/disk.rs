use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

use builder::ByteSink;
use reader::ByteSource;

#[inline]
fn positioned_read(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    #[cfg(unix)]
    {
        file.read_at(buf, offset)
    }
    #[cfg(windows)]
    {
        file.seek_read(buf, offset)
    }
}

#[inline]
fn positioned_write(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    #[cfg(unix)]
    {
        file.write_at(buf, offset)
    }
    #[cfg(windows)]
    {
        file.seek_write(buf, offset)
    }
}

fn read_at_exact(file: &File, buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    let mut read = 0usize;
    while read < buf.len() {
        let n = positioned_read(file, &mut buf[read..], offset)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "disk read ended before the requested range was filled",
            ));
        }
        read += n;
        offset += n as u64;
    }
    Ok(())
}

fn write_at_all(file: &File, buf: &[u8], mut offset: u64) -> io::Result<()> {
    let mut written = 0usize;
    while written < buf.len() {
        let n = positioned_write(file, &buf[written..], offset)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "disk write wrote 0 bytes",
            ));
        }
        written += n;
        offset += n as u64;
    }
    Ok(())
}

/// A disk-backed [`ByteSource`] using positioned reads, so concurrent
/// lookups against the same open file never need to share a cursor or take
/// a lock.
#[derive(Debug)]
pub struct DiskSource {
    file: File,
}

impl DiskSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(DiskSource { file })
    }
}

impl ByteSource for DiskSource {
    fn read_at(&self, offset: u64, length: u64) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; length as usize];
        read_at_exact(&self.file, &mut buf, offset)?;
        Ok(buf)
    }
}

/// A disk-backed [`ByteSink`] using positioned writes. Tracks its own
/// logical length so `append` knows where to write next without relying on
/// the file's cursor.
#[derive(Debug)]
pub struct DiskSink {
    file: File,
    len: u64,
}

impl DiskSink {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(DiskSink { file, len: 0 })
    }
}

impl ByteSink for DiskSink {
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_at_all(&self.file, bytes, self.len)?;
        self.len += bytes.len() as u64;
        Ok(())
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> io::Result<()> {
        write_at_all(&self.file, bytes, offset)?;
        self.len = self.len.max(offset + bytes.len() as u64);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.len
    }
}
