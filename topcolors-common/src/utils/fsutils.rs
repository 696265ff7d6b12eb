use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
};

/// Try to read the file, return None if it doesn't exist
pub fn read_optional_file(path: impl AsRef<Path>) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
        Ok(s) => Ok(Some(s)),
    }
}

/// Creates a new empty file opened for appending, return None if something already
/// exists at the path. The check and the creation is a single atomic operation.
pub fn create_new_for_append(path: impl AsRef<Path>) -> io::Result<Option<File>> {
    match OpenOptions::new().append(true).create_new(true).open(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(e),
        Ok(f) => Ok(Some(f)),
    }
}
