//! Static file access under the configured serving root.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use crate::response::{Response, OCTET_STREAM, TEXT_PLAIN};

/// Joins `rest` onto `root`, refusing anything that could leave the root.
///
/// `rest` may only consist of normal components. The nearest part of the
/// joined path that exists on disk (the target itself, or else its closest
/// existing ancestor) must canonicalize to somewhere under the canonical
/// root. Symlinks are judged by where they point, and a dangling link fails
/// to canonicalize and is refused. A root that cannot be canonicalized
/// refuses everything.
pub fn resolve(root: &Path, rest: &str) -> Option<PathBuf> {
    let relative = Path::new(rest);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let real_root = root.canonicalize().ok()?;
    let path = root.join(relative);

    let existing = path
        .ancestors()
        .find(|ancestor| fs::symlink_metadata(ancestor).is_ok())?;

    match existing.canonicalize() {
        Ok(real) if real.starts_with(&real_root) => Some(path),
        _ => None,
    }
}

pub fn read_file(path: &Path) -> Response {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => return Response::new(404),
        Ok(_) => {}
        Err(e) => return io_error_response(path, e),
    }

    match fs::read(path) {
        Ok(contents) => Response::new(200)
            .with_content_type(OCTET_STREAM)
            .with_body(contents),
        Err(e) => io_error_response(path, e),
    }
}

/// Creates or truncates `path` with owner-only permissions and stores `body`.
pub fn write_file(path: &Path, body: &[u8]) -> Response {
    let written = open_for_write(path).and_then(|mut file| file.write_all(body));

    match written {
        Ok(()) => Response::new(201).with_content_type(TEXT_PLAIN),
        Err(e) => server_error(path, e),
    }
}

fn open_for_write(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

fn io_error_response(path: &Path, e: io::Error) -> Response {
    if e.kind() == io::ErrorKind::NotFound {
        tracing::debug!(path = %path.display(), "file not found");
        return Response::new(404);
    }

    server_error(path, e)
}

fn server_error(path: &Path, e: io::Error) -> Response {
    tracing::error!(path = %path.display(), error = %e, "file access failed");
    Response::text(500, e.to_string())
}
