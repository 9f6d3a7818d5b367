//! Executable location discovery.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Absolute directory containing the running executable.
///
/// Resolves the primary application image, follows symbolic links to its
/// canonical filesystem entry, then strips the trailing filename
/// component.
///
/// # Errors
///
/// `Error::System` when the OS cannot resolve the image path;
/// `Error::NotFound` when the resolved path has no containing directory.
pub fn exe_dir() -> Result<PathBuf> {
    let image = env::current_exe()?;
    let image = fs::canonicalize(image)?;
    match image.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(Error::NotFound),
    }
}

/// Write the executable's directory into a caller-supplied buffer.
///
/// The path is truncated to fit and always NUL-terminated inside the
/// buffer, whatever the path length; the returned count excludes the
/// terminator. Never writes past `buf.len()`.
///
/// # Errors
///
/// `Error::InvalidArgument` for an empty buffer, plus everything
/// [`exe_dir`] reports.
pub fn exe_dir_into(buf: &mut [u8]) -> Result<usize> {
    if buf.is_empty() {
        return Err(Error::InvalidArgument("destination buffer is empty"));
    }
    let dir = exe_dir()?;
    Ok(write_nul_terminated(&dir, buf))
}

/// Bounded copy with forced NUL termination. The copied length comes from
/// the path's actual byte length, clamped to the buffer. Returns bytes
/// written, excluding the NUL.
fn write_nul_terminated(path: &Path, buf: &mut [u8]) -> usize {
    let bytes = path_bytes(path);
    let len = bytes.len().min(buf.len() - 1);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf[len] = 0;
    len
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_rejected() {
        let mut buf: [u8; 0] = [];
        assert!(matches!(
            exe_dir_into(&mut buf),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn resolves_to_an_existing_directory() {
        let dir = exe_dir().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.is_dir());
    }

    #[test]
    fn large_buffer_round_trips() {
        let mut buf = [0u8; 4096];
        let n = exe_dir_into(&mut buf).unwrap();
        assert!(n > 0);
        assert_eq!(buf[n], 0);
        assert_eq!(&buf[..n], path_bytes(&exe_dir().unwrap()).as_slice());
    }

    #[test]
    fn truncation_keeps_nul_inside_bounds() {
        let path = Path::new("/a/rather/long/install/location");

        let mut buf = [0xffu8; 8];
        let n = write_nul_terminated(path, &mut buf);
        assert_eq!(n, 7);
        assert_eq!(&buf[..7], b"/a/rath");
        assert_eq!(buf[7], 0);

        // Capacity one: nothing but the terminator fits.
        let mut tiny = [0xffu8; 1];
        assert_eq!(write_nul_terminated(path, &mut tiny), 0);
        assert_eq!(tiny[0], 0);
    }
}
