use std::{fs, io, path::Path};

/// Converts a not found error to Ok(false)
pub fn path_exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound) => Ok(false),
        Err(e) => Err(e),
    }
}

/// `count` as a whole percentage of `total`, rounded down.
///
/// Returns 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    count * 100 / total
}

// error printing helper.
//
pub trait ResultExt {
    fn print_error(self) -> Self;
}

impl<T> ResultExt for Result<T, anyhow::Error> {
    fn print_error(self) -> Self {
        match self {
            Ok(v) => Ok(v),
            Err(error) => {
                println!("error: {}", error);
                let mut err: &dyn std::error::Error = error.as_ref();
                while let Some(cause) = err.source() {
                    println!("caused by: {}", cause);
                    err = cause;
                }
                Err(error)
            }
        }
    }
}
