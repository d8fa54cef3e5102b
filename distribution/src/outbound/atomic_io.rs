//! Atomic replacement of a file inside a capability directory.
//!
//! Contents go to a hidden sibling first and are renamed over the target, so
//! readers see either the old file or the new one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replaces `file_name` in `dir` with `contents`.
///
/// # Errors
///
/// Returns the underlying I/O error if the temporary file cannot be written
/// or renamed. The temporary file is removed on failure.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    if let Err(err) = write_temp_file(dir, &tmp_name, contents) {
        discard(dir, &tmp_name);
        return Err(err);
    }
    if let Err(err) = replace(dir, &tmp_name, file_name) {
        discard(dir, &tmp_name);
        return Err(err);
    }
    // Directory sync is best effort; some filesystems refuse it.
    drop(dir.open(".").and_then(|parent| parent.sync_all()));

    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    drop(dir.remove_file(tmp_name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn open(temp: &TempDir) -> Dir {
        Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open temp dir")
    }

    #[rstest]
    fn creates_missing_file(temp_dir: TempDir) {
        let dir = open(&temp_dir);

        write_atomic(&dir, "store.json", b"[]").expect("write succeeds");

        assert_eq!(dir.read_to_string("store.json").expect("read back"), "[]");
    }

    #[rstest]
    fn replaces_existing_file_and_leaves_no_temporaries(temp_dir: TempDir) {
        let dir = open(&temp_dir);
        dir.write("store.json", b"old").expect("seed file");

        write_atomic(&dir, "store.json", b"new").expect("write succeeds");

        assert_eq!(dir.read_to_string("store.json").expect("read back"), "new");
        let names: Vec<_> = dir
            .entries()
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names.len(), 1, "unexpected files: {names:?}");
    }
}
