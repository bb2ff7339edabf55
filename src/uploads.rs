//! Upload area on disk.
//!
//! Two fixed subdirectories partition the uploads: product photos and payment
//! proofs. Stored paths are relative to the upload root so they resolve
//! directly under the static `/uploads` mount.

use std::{
    fs, io,
    path::{Component, Path},
};

pub const FALLBACK_FILE_NAME: &str = "upload.bin";

#[derive(Debug, Clone, Copy)]
pub enum Category {
    Products,
    Payments,
}

impl Category {
    pub fn dir(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Payments => "payments",
        }
    }
}

/// Creates both category directories. Runs once at startup.
pub fn ensure_dirs(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root.join(Category::Products.dir()))?;
    fs::create_dir_all(root.join(Category::Payments.dir()))?;

    Ok(())
}

/// Reduces a client-supplied filename to its final path component, dropping
/// directory prefixes and `..` segments. Names with nothing left fall back to
/// [`FALLBACK_FILE_NAME`].
///
/// Collisions are not resolved: two uploads sharing a name overwrite each
/// other, last writer wins.
pub fn sanitize_file_name(name: &str) -> String {
    let last = Path::new(name)
        .components()
        .filter_map(|part| match part {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .last()
        .unwrap_or("");

    // Windows separators are not path components on Unix.
    let last = last.rsplit(['/', '\\']).next().unwrap_or("");

    if last.is_empty() || last == "." || last == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        last.to_string()
    }
}

/// Writes the full payload under the category directory and returns the
/// root-relative path that gets persisted (e.g. `products/mug.jpg`).
pub fn store(root: &Path, category: Category, file_name: &str, bytes: &[u8]) -> io::Result<String> {
    let file_name = sanitize_file_name(file_name);
    let relative = format!("{}/{}", category.dir(), file_name);

    fs::write(root.join(&relative), bytes)?;

    Ok(relative)
}
