//! File classification by name suffix.

/// Extensions treated as image payloads.
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// Returns `true` iff the file name carries an image extension.
///
/// Matching is case-insensitive. Names without an extension (including
/// dotfiles like `.png`) never match.
pub fn is_image(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_listed_extension() {
        for ext in IMAGE_EXTENSIONS {
            assert!(is_image(&format!("photo.{ext}")), "rejected .{ext}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_image("SCAN.PNG"));
        assert!(is_image("scan.Jpg"));
        assert!(is_image("scan.JPEG"));
    }

    #[test]
    fn rejects_non_image_extensions() {
        assert!(!is_image("notes.txt"));
        assert!(!is_image("archive.zip"));
        assert!(!is_image("report.pdf"));
    }

    #[test]
    fn rejects_names_without_extension() {
        assert!(!is_image("README"));
        assert!(!is_image(""));
    }

    #[test]
    fn dotfile_suffix_is_not_an_extension() {
        assert!(!is_image(".png"));
        assert!(!is_image(".jpg"));
    }

    #[test]
    fn only_last_suffix_counts() {
        assert!(!is_image("backup.png.bak"));
        assert!(is_image("photo.backup.png"));
    }
}
