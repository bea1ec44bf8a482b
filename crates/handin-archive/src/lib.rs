//! Tar codec for submission workspaces.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

mod error;

pub use error::{ArchiveError, ArchiveResult};

const TAR_EXTENSION: &str = "tar";

/// Pack `members` into a tar archive at `target`.
///
/// Members are paths relative to `root`, and the archive records them
/// under those exact names, so callers control the layout. Directories
/// are added recursively and symlinks are followed so the archive
/// carries real bytes. Members that do not exist on disk are skipped
/// with a warning; packaging is best effort by policy.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidName`] when `target` does not end in
/// `.tar`, or an IO variant when the archive cannot be written.
pub fn compress(root: &Path, target: &Path, members: &[PathBuf]) -> ArchiveResult<PathBuf> {
    ensure_tar_name(target)?;

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|source| ArchiveError::io("compress.create_parent", parent, source))?;
    }

    let file = File::create(target)
        .map_err(|source| ArchiveError::io("compress.create_archive", target, source))?;
    let mut builder = tar::Builder::new(file);
    builder.follow_symlinks(true);

    for member in members {
        let on_disk = root.join(member);
        if !on_disk.exists() {
            warn!(member = %member.display(), "skipping missing archive member");
            continue;
        }
        if on_disk.is_dir() {
            builder
                .append_dir_all(member, &on_disk)
                .map_err(|source| ArchiveError::entry("compress.append_dir", &on_disk, source))?;
        } else {
            builder
                .append_path_with_name(&on_disk, member)
                .map_err(|source| ArchiveError::entry("compress.append_file", &on_disk, source))?;
        }
        debug!(member = %member.display(), "added archive member");
    }

    builder
        .into_inner()
        .and_then(|file| file.sync_all())
        .map_err(|source| ArchiveError::io("compress.finish", target, source))?;

    Ok(target.to_path_buf())
}

/// Unpack `archive` into `target_dir`, creating the directory when
/// needed.
///
/// An empty `filter` extracts every entry. A non-empty filter extracts
/// exactly the named members and fails with
/// [`ArchiveError::MemberNotFound`] for any name the archive does not
/// contain. Entry paths are sanitized so an archive can never write
/// outside `target_dir`.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidName`] for a non-tar archive name,
/// [`ArchiveError::NotFound`] when the archive file is missing, and
/// entry/IO variants when extraction fails.
pub fn decompress(target_dir: &Path, archive: &Path, filter: &[String]) -> ArchiveResult<PathBuf> {
    ensure_tar_name(archive)?;
    if !archive.is_file() {
        return Err(ArchiveError::NotFound {
            path: archive.to_path_buf(),
        });
    }

    fs::create_dir_all(target_dir)
        .map_err(|source| ArchiveError::io("decompress.create_target", target_dir, source))?;

    let file = File::open(archive)
        .map_err(|source| ArchiveError::io("decompress.open_archive", archive, source))?;
    let mut reader = tar::Archive::new(file);

    let filtered = !filter.is_empty();
    let mut remaining: Vec<&str> = filter.iter().map(String::as_str).collect();

    let entries = reader
        .entries()
        .map_err(|source| ArchiveError::entry("decompress.entries", archive, source))?;
    for entry in entries {
        let mut entry =
            entry.map_err(|source| ArchiveError::entry("decompress.next_entry", archive, source))?;
        let raw = entry
            .path()
            .map_err(|source| ArchiveError::entry("decompress.entry_path", archive, source))?
            .into_owned();

        if filtered {
            if remaining.is_empty() {
                break;
            }
            let Some(position) = remaining
                .iter()
                .position(|name| Path::new(name) == raw.as_path())
            else {
                continue;
            };
            remaining.swap_remove(position);
        }

        let sanitized = sanitize_entry_path(&raw, archive)?;
        let destination = target_dir.join(sanitized);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ArchiveError::io("decompress.create_parent", parent, source))?;
        }
        entry
            .unpack(&destination)
            .map_err(|source| ArchiveError::entry("decompress.unpack", archive, source))?;
        debug!(member = %raw.display(), "extracted archive member");
    }

    if let Some(missing) = remaining.first() {
        return Err(ArchiveError::MemberNotFound {
            name: (*missing).to_string(),
            path: archive.to_path_buf(),
        });
    }

    Ok(target_dir.to_path_buf())
}

fn ensure_tar_name(path: &Path) -> ArchiveResult<()> {
    let is_tar = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TAR_EXTENSION));
    if is_tar {
        Ok(())
    } else {
        Err(ArchiveError::InvalidName {
            path: path.to_path_buf(),
        })
    }
}

fn sanitize_entry_path(entry: &Path, archive: &Path) -> ArchiveResult<PathBuf> {
    let mut sanitized = PathBuf::new();
    for component in entry.components() {
        match component {
            Component::Normal(segment) => sanitized.push(segment),
            Component::CurDir => {}
            _ => {
                return Err(ArchiveError::entry(
                    "decompress.sanitize",
                    archive,
                    std::io::Error::other(format!(
                        "entry '{}' escapes the extraction root",
                        entry.display()
                    )),
                ));
            }
        }
    }
    Ok(sanitized)
}
