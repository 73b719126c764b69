//! Path form translation between the host and the fallback shell.
//!
//! Drive-letter paths (`E:\foo\bar`, `E:/foo/bar`) map under the shell's
//! mount root (`/mnt/e/foo/bar`). Relative paths are made absolute first;
//! POSIX absolute paths pass through.

use std::path::{Path, PathBuf};

/// Rewrites host paths into the fallback shell's path form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTranslator {
    mount_root: String,
}

impl PathTranslator {
    pub fn new(mount_root: impl Into<String>) -> Self {
        let mount_root = mount_root.into();
        let trimmed = mount_root.trim_end_matches(['/', '\\']);
        Self {
            mount_root: trimmed.to_string(),
        }
    }

    pub fn mount_root(&self) -> &str {
        &self.mount_root
    }

    /// Translate `path`, resolving a relative one against `base`
    /// (or the process working directory when `base` is `None`).
    pub fn translate(&self, path: &Path, base: Option<&Path>) -> String {
        let raw = path.to_string_lossy();
        if let Some(translated) = self.translate_absolute(&raw) {
            return translated;
        }

        let base = match base {
            Some(dir) => Some(self.absolute_base(dir)),
            None => std::env::current_dir().ok(),
        };
        let Some(base) = base else {
            return raw.replace('\\', "/");
        };

        let joined = base.join(path);
        let joined = joined.to_string_lossy();
        self.translate_absolute(&joined)
            .unwrap_or_else(|| joined.replace('\\', "/"))
    }

    fn absolute_base(&self, dir: &Path) -> PathBuf {
        if self.translate_absolute(&dir.to_string_lossy()).is_some() {
            return dir.to_path_buf();
        }
        std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
    }

    fn translate_absolute(&self, raw: &str) -> Option<String> {
        let raw = raw.strip_prefix(r"\\?\").unwrap_or(raw);
        let bytes = raw.as_bytes();

        let is_drive = bytes.len() >= 2
            && bytes[0].is_ascii_alphabetic()
            && bytes[1] == b':'
            && (bytes.len() == 2 || bytes[2] == b'\\' || bytes[2] == b'/');

        if is_drive {
            let letter = (bytes[0] as char).to_ascii_lowercase();
            let rest = raw[2..].replace('\\', "/");
            let rest = rest.trim_start_matches('/');
            let mut out = format!("{}/{}", self.mount_root, letter);
            if !rest.is_empty() {
                out.push('/');
                out.push_str(rest);
            }
            return Some(out);
        }

        if raw.starts_with('/') {
            return Some(raw.to_string());
        }

        None
    }
}

impl Default for PathTranslator {
    fn default() -> Self {
        Self::new("/mnt")
    }
}

/// Quote one word for a POSIX shell.
pub fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_letter_maps_under_mount_root() {
        let t = PathTranslator::default();
        assert_eq!(
            t.translate(Path::new(r"E:\foo\bar.mp4"), None),
            "/mnt/e/foo/bar.mp4"
        );
        assert_eq!(
            t.translate(Path::new("C:/Videos/clip.mp4"), None),
            "/mnt/c/Videos/clip.mp4"
        );
        assert_eq!(t.translate(Path::new(r"D:\"), None), "/mnt/d");
    }

    #[test]
    fn verbatim_prefix_is_stripped() {
        let t = PathTranslator::default();
        assert_eq!(
            t.translate(Path::new(r"\\?\C:\work\dvd.iso"), None),
            "/mnt/c/work/dvd.iso"
        );
    }

    #[test]
    fn relative_path_resolves_against_base() {
        let t = PathTranslator::default();
        assert_eq!(
            t.translate(Path::new("DVD"), Some(Path::new(r"C:\Users\me\dvd_workdir"))),
            "/mnt/c/Users/me/dvd_workdir/DVD"
        );
    }

    #[test]
    fn posix_absolute_passes_through() {
        let t = PathTranslator::new("/mnt/");
        assert_eq!(t.mount_root(), "/mnt");
        assert_eq!(t.translate(Path::new("/dev/sr0"), None), "/dev/sr0");
    }

    #[cfg(unix)]
    #[test]
    fn relative_without_base_uses_process_cwd() {
        let t = PathTranslator::default();
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.join("clip.mp4").to_string_lossy().into_owned();
        assert_eq!(t.translate(Path::new("clip.mp4"), None), expected);
    }

    #[test]
    fn custom_mount_root() {
        let t = PathTranslator::new("/host");
        assert_eq!(t.translate(Path::new(r"Z:\a"), None), "/host/z/a");
    }

    #[test]
    fn quotes_embedded_single_quotes() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("a b"), "'a b'");
    }
}
