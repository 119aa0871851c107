use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::converter::ImageFormat;

/// Computes the output path for one input file.
///
/// The output lands directly in `output_dir` as `<stem>.<extension>`.
// TODO: mirror the input's relative directory under output_dir when
// keep_structure is set; batch requests need to carry a common input root
// before that can work.
pub fn output_path(
    input_path: &Path,
    output_dir: &Path,
    format: ImageFormat,
    keep_structure: bool,
) -> PathBuf {
    if keep_structure {
        debug!(
            input = %input_path.display(),
            "structured output layout not yet implemented, using flat layout"
        );
    }

    let stem = input_path
        .file_stem()
        .unwrap_or_else(|| OsStr::new("output"));
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    output_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_output_path() {
        let out = output_path(
            Path::new("/photos/vacation/beach.jpg"),
            Path::new("/converted"),
            ImageFormat::Webp,
            false,
        );
        assert_eq!(out, PathBuf::from("/converted/beach.webp"));
    }

    #[test]
    fn test_structured_degrades_to_flat() {
        let flat = output_path(
            Path::new("/a/b/c.png"),
            Path::new("/out"),
            ImageFormat::Jpeg,
            false,
        );
        let structured = output_path(
            Path::new("/a/b/c.png"),
            Path::new("/out"),
            ImageFormat::Jpeg,
            true,
        );
        assert_eq!(flat, structured);
    }

    #[test]
    fn test_extension_is_replaced_not_appended() {
        let out = output_path(
            Path::new("scan.tiff"),
            Path::new("/out"),
            ImageFormat::Png,
            false,
        );
        assert_eq!(out, PathBuf::from("/out/scan.png"));
    }
}
