//! Crash-safe writes for the ledger file.

use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::warn;

/// Sibling path used while rewriting `path`, e.g. `.finances.csv.tmp`.
fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        )
    })?;

    let mut temp = OsString::from(".");
    temp.push(name);
    temp.push(".tmp");
    Ok(path.with_file_name(temp))
}

/// Replace the content of `path` with `contents`.
///
/// The new content is written and synced to a temporary file next to `path`, which is then
/// renamed over it. `rename` replaces an existing destination in one step, so a failure at any
/// point leaves the original file in place and only the temporary file is removed.
pub fn replace(path: &Path, contents: &[u8]) -> io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    let temp = temp_path_for(path)?;

    let replaced = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.set_permissions(permissions)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp, path));

    if let Err(err) = replaced {
        if temp.is_file() {
            let _ = fs::remove_file(&temp);
        }
        return Err(err);
    }

    Ok(())
}

/// Append `line` to the end of `path` as a single write.
///
/// On failure the file is truncated back to its previous length, so it never keeps a partial
/// line.
pub fn append(path: &Path, line: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;

    append_or_rollback(&mut file, path, |file| {
        file.write_all(line)?;
        file.sync_data()
    })
}

fn append_or_rollback(
    file: &mut File,
    path: &Path,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> io::Result<()> {
    let original_len = file.metadata()?.len();

    if let Err(err) = write(file) {
        if let Err(rollback_err) = file.set_len(original_len) {
            warn!(
                "could not truncate {} back to {original_len} bytes: {rollback_err}",
                path.display()
            );
        }
        return Err(err);
    }

    Ok(())
}
