//! A minimal seekable file stream, grounded on `FileStream.cpp`'s member
//! list (`Position`, `Length`, `CanRead`/`CanWrite`/`CanSeek`, `Read`,
//! `Write`, `Seek`, `SetLength`, `ReadByte`/`WriteByte`, `Reset`, `Close`,
//! `Flush`, `CopyTo`, `FileExists`, `FileSize`), carried as interface
//! shape only over `std::fs::File`.

use std::fs::{File, OpenOptions};
use std::io::{Read as _, Seek as _, SeekFrom, Write as _};
use std::path::Path;

use hash_core_primitives::CoreError;

const COPY_BLOCK_SIZE: usize = 64 * 1024;

/// The access mode a stream was opened under, mirroring `FileAccess`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileAccess {
    Read,
    Write,
    ReadWrite,
}

/// Where a [`FileStream::seek`] offset is measured from, mirroring
/// `SeekOrigin`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeekOrigin {
    Begin,
    Current,
    End,
}

/// A seekable file stream tracking its own position and length, the way
/// the original wraps a `std::fstream` instead of re-querying the OS on
/// every access.
pub struct FileStream {
    file: File,
    access: FileAccess,
    position: u64,
    length: u64,
}

impl FileStream {
    /// Open `path` under the given access mode. `Write`/`ReadWrite` create
    /// the file if it doesn't already exist.
    pub fn open<P: AsRef<Path>>(path: P, access: FileAccess) -> Result<Self, CoreError> {
        let mut options = OpenOptions::new();
        match access {
            FileAccess::Read => {
                options.read(true);
            }
            FileAccess::Write => {
                options.write(true).create(true);
            }
            FileAccess::ReadWrite => {
                options.read(true).write(true).create(true);
            }
        }
        let file = options
            .open(path)
            .map_err(|_| CoreError::InvalidParameter("unable to open file"))?;
        let length = file
            .metadata()
            .map_err(|_| CoreError::InvalidParameter("unable to read file metadata"))?
            .len();
        Ok(Self {
            file,
            access,
            position: 0,
            length,
        })
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn can_read(&self) -> bool {
        matches!(self.access, FileAccess::Read | FileAccess::ReadWrite)
    }

    pub fn can_write(&self) -> bool {
        matches!(self.access, FileAccess::Write | FileAccess::ReadWrite)
    }

    pub fn can_seek(&self) -> bool {
        true
    }

    /// Read up to `count` bytes into `buffer` starting at `offset`,
    /// clamped to the bytes actually remaining in the file. Returns the
    /// number of bytes read.
    pub fn read(&mut self, buffer: &mut [u8], offset: usize, count: usize) -> Result<usize, CoreError> {
        if !self.can_read() {
            return Err(CoreError::InvalidParameter("stream was opened as write-only"));
        }
        let remaining = self.length.saturating_sub(self.position);
        let count = (count as u64).min(remaining) as usize;
        if count == 0 {
            return Ok(0);
        }
        let dest = buffer
            .get_mut(offset..offset + count)
            .ok_or(CoreError::ShortBuffer)?;
        self.file
            .read_exact(dest)
            .map_err(|_| CoreError::InvalidParameter("read failed"))?;
        self.position += count as u64;
        Ok(count)
    }

    pub fn read_byte(&mut self) -> Result<u8, CoreError> {
        let mut buf = [0u8; 1];
        let read = self.read(&mut buf, 0, 1)?;
        if read == 0 {
            return Err(CoreError::ShortBuffer);
        }
        Ok(buf[0])
    }

    /// Write `count` bytes from `buffer` starting at `offset`, extending
    /// the tracked length when writing past the current end.
    pub fn write(&mut self, buffer: &[u8], offset: usize, count: usize) -> Result<(), CoreError> {
        if !self.can_write() {
            return Err(CoreError::InvalidParameter("stream was opened as read-only"));
        }
        let src = buffer
            .get(offset..offset + count)
            .ok_or(CoreError::ShortBuffer)?;
        self.file
            .write_all(src)
            .map_err(|_| CoreError::InvalidParameter("write failed"))?;
        self.position += count as u64;
        self.length = self.length.max(self.position);
        Ok(())
    }

    pub fn write_byte(&mut self, data: u8) -> Result<(), CoreError> {
        self.write(&[data], 0, 1)
    }

    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, CoreError> {
        if !self.can_seek() {
            return Err(CoreError::InvalidParameter("stream does not support seeking"));
        }
        let from = match origin {
            SeekOrigin::Begin => SeekFrom::Start(offset as u64),
            SeekOrigin::Current => SeekFrom::Current(offset),
            SeekOrigin::End => SeekFrom::End(offset),
        };
        let new_position = self
            .file
            .seek(from)
            .map_err(|_| CoreError::InvalidParameter("seek failed"))?;
        self.position = new_position;
        Ok(new_position)
    }

    /// Truncate or extend the file to exactly `length` bytes, writing a
    /// single zero byte at the new end when extending, as the original
    /// does via a seek-then-`WriteByte(0)`.
    pub fn set_length(&mut self, length: u64) -> Result<(), CoreError> {
        if !self.can_write() {
            return Err(CoreError::InvalidParameter("stream was opened as read-only"));
        }
        if length > 0 {
            self.seek((length - 1) as i64, SeekOrigin::Begin)?;
            self.write_byte(0)?;
        }
        self.file
            .set_len(length)
            .map_err(|_| CoreError::InvalidParameter("set_len failed"))?;
        self.length = length;
        self.seek(0, SeekOrigin::Begin)?;
        Ok(())
    }

    /// Rewind to the start of the file.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.seek(0, SeekOrigin::Begin)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CoreError> {
        self.file
            .flush()
            .map_err(|_| CoreError::InvalidParameter("flush failed"))
    }

    /// Copy the full remaining contents of this stream to `destination`,
    /// rewinding the destination first, in fixed-size blocks the way
    /// `CopyTo` does.
    pub fn copy_to(&mut self, destination: &mut FileStream) -> Result<(), CoreError> {
        destination.seek(0, SeekOrigin::Begin)?;
        self.seek(0, SeekOrigin::Begin)?;
        let mut buffer = [0u8; COPY_BLOCK_SIZE];
        loop {
            let read = self.read(&mut buffer, 0, COPY_BLOCK_SIZE)?;
            if read == 0 {
                break;
            }
            destination.write(&buffer, 0, read)?;
        }
        Ok(())
    }
}

/// Does a file exist at `path` and can it be opened for reading.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    File::open(path).is_ok()
}

/// The size in bytes of the file at `path`.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64, CoreError> {
    std::fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|_| CoreError::InvalidParameter("unable to read file metadata"))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("file-stream-test-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn write_then_read_round_trips() {
        let path = temp_path("round-trip");
        {
            let mut stream = FileStream::open(&path, FileAccess::ReadWrite).unwrap();
            stream.write(b"hello world", 0, 11).unwrap();
            stream.reset().unwrap();
            let mut buf = [0u8; 11];
            let read = stream.read(&mut buf, 0, 11).unwrap();
            assert_eq!(read, 11);
            assert_eq!(&buf, b"hello world");
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn read_only_stream_rejects_writes() {
        let path = temp_path("read-only");
        std::fs::File::create(&path).unwrap().write_all(b"data").unwrap();
        let mut stream = FileStream::open(&path, FileAccess::Read).unwrap();
        assert!(stream.write(b"x", 0, 1).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn set_length_extends_and_truncates() {
        let path = temp_path("set-length");
        let mut stream = FileStream::open(&path, FileAccess::ReadWrite).unwrap();
        stream.set_length(10).unwrap();
        assert_eq!(stream.length(), 10);
        stream.set_length(2).unwrap();
        assert_eq!(stream.length(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn file_exists_reports_correctly() {
        let path = temp_path("exists");
        assert!(!file_exists(&path));
        std::fs::File::create(&path).unwrap();
        assert!(file_exists(&path));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn copy_to_duplicates_contents() {
        let src_path = temp_path("copy-src");
        let dst_path = temp_path("copy-dst");
        {
            let mut src = FileStream::open(&src_path, FileAccess::ReadWrite).unwrap();
            src.write(&vec![42u8; 200_000], 0, 200_000).unwrap();
            let mut dst = FileStream::open(&dst_path, FileAccess::ReadWrite).unwrap();
            src.copy_to(&mut dst).unwrap();
            assert_eq!(dst.length(), 200_000);
        }
        std::fs::remove_file(&src_path).ok();
        std::fs::remove_file(&dst_path).ok();
    }
}
