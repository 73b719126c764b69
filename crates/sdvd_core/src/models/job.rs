//! The top-level conversion request.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A single video-to-DVD request.
///
/// Built once from CLI arguments or the interactive form, then handed to
/// the orchestrator read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    input: PathBuf,
    burn: bool,
    burn_device: Option<String>,
    iso: bool,
    iso_output: Option<PathBuf>,
    preview: bool,
}

impl Job {
    /// Start building a job for the given input video.
    pub fn builder(input: impl Into<PathBuf>) -> JobBuilder {
        JobBuilder {
            job: Job {
                input: input.into(),
                burn: false,
                burn_device: None,
                iso: false,
                iso_output: None,
                preview: false,
            },
        }
    }

    /// Source video path.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Whether burning was requested.
    pub fn burn_requested(&self) -> bool {
        self.burn
    }

    /// The burn target, if one was given and is non-blank.
    pub fn burn_device(&self) -> Option<&str> {
        self.burn_device
            .as_deref()
            .map(str::trim)
            .filter(|device| !device.is_empty())
    }

    /// True only when burning was requested and a device is known.
    pub fn will_burn(&self) -> bool {
        self.burn && self.burn_device().is_some()
    }

    /// Whether an image file was explicitly requested.
    pub fn iso_requested(&self) -> bool {
        self.iso
    }

    /// Requested image location, if any.
    pub fn iso_output(&self) -> Option<&Path> {
        self.iso_output.as_deref()
    }

    /// Preview flag. Accepted for compatibility; the pipeline ignores it.
    pub fn preview(&self) -> bool {
        self.preview
    }

    /// Whether the disc image outlives the job.
    ///
    /// A burn-only job with the default image location treats the image as
    /// an intermediate artifact.
    pub fn retains_image(&self) -> bool {
        self.iso || self.iso_output.is_some() || !self.will_burn()
    }

    /// Name used for the job log file.
    pub fn name(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "dvd_job".to_string())
    }
}

/// Builder for [`Job`].
#[derive(Debug, Clone)]
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn burn(mut self, burn: bool) -> Self {
        self.job.burn = burn;
        self
    }

    pub fn burn_device(mut self, device: Option<impl Into<String>>) -> Self {
        self.job.burn_device = device.map(Into::into);
        self
    }

    pub fn iso(mut self, iso: bool) -> Self {
        self.job.iso = iso;
        self
    }

    pub fn iso_output(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.job.iso_output = path.map(Into::into);
        self
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.job.preview = preview;
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_without_device_does_not_burn() {
        let job = Job::builder("clip.mp4")
            .burn(true)
            .burn_device(None::<String>)
            .build();
        assert!(job.burn_requested());
        assert!(!job.will_burn());
    }

    #[test]
    fn blank_device_is_ignored() {
        let job = Job::builder("clip.mp4").burn(true).burn_device(Some("  ")).build();
        assert_eq!(job.burn_device(), None);
        assert!(!job.will_burn());
    }

    #[test]
    fn device_alone_does_not_burn() {
        let job = Job::builder("clip.mp4").burn_device(Some("/dev/sr0")).build();
        assert!(!job.will_burn());
    }

    #[test]
    fn burn_only_job_drops_default_image() {
        let job = Job::builder("clip.mp4")
            .burn(true)
            .burn_device(Some("/dev/sr0"))
            .build();
        assert!(job.will_burn());
        assert!(!job.retains_image());

        let with_iso = Job::builder("clip.mp4")
            .burn(true)
            .burn_device(Some("/dev/sr0"))
            .iso(true)
            .build();
        assert!(with_iso.retains_image());
    }

    #[test]
    fn explicit_output_is_retained() {
        let job = Job::builder("clip.mp4")
            .burn(true)
            .burn_device(Some("E:"))
            .iso_output(Some("out.iso"))
            .build();
        assert!(job.retains_image());
        assert_eq!(job.iso_output(), Some(Path::new("out.iso")));
    }

    #[test]
    fn name_comes_from_input_stem() {
        assert_eq!(Job::builder("/videos/holiday.mp4").build().name(), "holiday");
        assert_eq!(Job::builder("").build().name(), "dvd_job");
    }
}
