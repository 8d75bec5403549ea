//! Utility functions shared across modules.

use std::path::{Path, PathBuf};

use crate::image::ImageFormat;

/// Sanitize a string for use as a filename by replacing invalid characters.
///
/// Replaces `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|` with underscores
/// and trims surrounding whitespace.
///
/// # Examples
///
/// ```
/// use visor_core::util::sanitize_filename;
///
/// assert_eq!(sanitize_filename("shot:1*2?"), "shot_1_2_");
/// assert_eq!(sanitize_filename("  spaced  "), "spaced");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the output path for a persisted capture.
///
/// The result follows `{directory}/{prefix}{base}{postfix}.{extension}`,
/// where `base` is `name` with any existing extension stripped. With empty
/// prefix and postfix this is exactly `directory.join(fileName)`.
pub fn generate_output_path(
    directory: &Path,
    name: &str,
    format: ImageFormat,
    prefix: &str,
    postfix: &str,
) -> PathBuf {
    let base = Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let base = sanitize_filename(&base);
    directory.join(format!(
        "{}{}{}.{}",
        prefix,
        base,
        postfix,
        format.extension()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("path/with/slashes"), "path_with_slashes");
        assert_eq!(sanitize_filename("shot:1*2?"), "shot_1_2_");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
    }

    #[test]
    fn plain_path_equals_join() {
        let path = generate_output_path(Path::new("/tmp/shots"), "login", ImageFormat::Png, "", "");
        assert_eq!(path, Path::new("/tmp/shots").join("login.png"));
    }

    #[test]
    fn prefix_and_postfix_are_embedded() {
        let path = generate_output_path(
            Path::new("/tmp/shots"),
            "login",
            ImageFormat::Jpeg,
            "pre_",
            "_post",
        );
        assert_eq!(path, Path::new("/tmp/shots").join("pre_login_post.jpg"));
    }

    #[test]
    fn existing_extension_is_stripped() {
        let path = generate_output_path(Path::new("out"), "shot.png", ImageFormat::Png, "", "");
        assert_eq!(path, Path::new("out").join("shot.png"));
    }
}
