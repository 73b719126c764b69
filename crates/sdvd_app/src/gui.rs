//! Interactive form: pick a video, choose burn and/or ISO, then run.
//!
//! The job runs synchronously from the Continue handler, so the window
//! does not respond until it finishes.

use std::path::PathBuf;
use std::sync::Arc;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, column, container, pick_list, row, text, text_input, toggler};
use iced::{Element, Length, Task};

use sdvd_core::config::{ConfigManager, ConfigSection};
use sdvd_core::models::{Job, OpticalDrive};
use sdvd_core::platform::HostPlatform;
use sdvd_core::tools::SystemRunner;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "m4v", "mpg", "mpeg", "webm"];

#[derive(Debug, Clone)]
pub enum Message {
    BrowseInput,
    BurnToggled(bool),
    DriveSelected(OpticalDrive),
    IsoToggled(bool),
    BrowseIsoOutput,
    Quit,
    Continue,
}

/// Form state.
pub struct Form {
    config: ConfigManager,
    input: Option<PathBuf>,
    burn: bool,
    drives: Vec<OpticalDrive>,
    drive: Option<OpticalDrive>,
    iso: bool,
    iso_output: Option<PathBuf>,
    status: String,
}

impl Form {
    fn new(config: ConfigManager, burn: bool, iso: bool) -> Self {
        let drives: Vec<_> = HostPlatform::current().drive_enumerator().iter().collect();
        tracing::debug!("Form found {} optical drive(s)", drives.len());

        let paths = &config.settings().paths;
        let input = Some(PathBuf::from(&paths.last_input_path))
            .filter(|p| !p.as_os_str().is_empty() && p.is_file());
        let iso_output = Some(PathBuf::from(&paths.last_iso_output))
            .filter(|p| !p.as_os_str().is_empty());

        Self {
            drive: drives.iter().find(|d| d.media_loaded).or(drives.first()).cloned(),
            drives,
            config,
            input,
            burn,
            iso,
            iso_output,
            status: String::new(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowseInput => {
                if let Some(path) = pick_video_file() {
                    self.input = Some(path);
                }
            }
            Message::BurnToggled(on) => self.burn = on,
            Message::DriveSelected(drive) => self.drive = Some(drive),
            Message::IsoToggled(on) => self.iso = on,
            Message::BrowseIsoOutput => {
                if let Some(path) = pick_iso_output() {
                    self.iso_output = Some(path);
                    self.iso = true;
                }
            }
            Message::Quit => return iced::exit(),
            Message::Continue => return self.submit(),
        }
        Task::none()
    }

    fn submit(&mut self) -> Task<Message> {
        let job = match self.job() {
            Ok(job) => job,
            Err(message) => {
                show_dialog(rfd::MessageLevel::Warning, "Missing information", &message);
                return Task::none();
            }
        };

        self.remember_paths();

        match sdvd_core::run_job(&job, self.config.settings(), Arc::new(SystemRunner::new())) {
            Ok(report) => {
                tracing::info!("Job finished: {:?}", report.state.phase);
                if report.image_retained {
                    show_dialog(
                        rfd::MessageLevel::Info,
                        "Done",
                        &format!("DVD image written to {}", report.image_path.display()),
                    );
                }
                iced::exit()
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.status = match e.failed_stage() {
                    Some(stage) => format!("{} failed", stage),
                    None => "Failed".to_string(),
                };
                show_dialog(rfd::MessageLevel::Error, "DVD creation failed", &e.to_string());
                Task::none()
            }
        }
    }

    /// Validate the form into a job.
    fn job(&self) -> Result<Job, String> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| "Choose a video file first.".to_string())?;
        if !self.burn && !self.iso {
            return Err("Select burn, ISO output, or both.".to_string());
        }
        if self.burn && self.drive.is_none() {
            return Err("Select a drive to burn to.".to_string());
        }

        Ok(Job::builder(input)
            .burn(self.burn)
            .burn_device(self.drive.as_ref().filter(|_| self.burn).map(|d| d.id.clone()))
            .iso(self.iso)
            .iso_output(self.iso_output.clone().filter(|_| self.iso))
            .build())
    }

    fn remember_paths(&mut self) {
        let paths = &mut self.config.settings_mut().paths;
        if let Some(ref input) = self.input {
            paths.last_input_path = input.to_string_lossy().into_owned();
        }
        if let Some(ref output) = self.iso_output {
            paths.last_iso_output = output.to_string_lossy().into_owned();
        }
        if let Err(e) = self.config.update_section(ConfigSection::Paths) {
            tracing::warn!("Failed to save recent paths: {}", e);
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let input_value = self
            .input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let input_row = row![
            text("Video file:").width(Length::Fixed(110.0)),
            text_input("No file selected", &input_value).width(Length::Fill),
            button(text("Browse...")).on_press(Message::BrowseInput),
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let drive_picker: Element<'_, Message> = if self.burn {
            if self.drives.is_empty() {
                text("No optical drives found").into()
            } else {
                pick_list(
                    self.drives.as_slice(),
                    self.drive.clone(),
                    Message::DriveSelected,
                )
                .placeholder("Select a drive")
                .width(Length::Fill)
                .into()
            }
        } else {
            text("Enable burning to choose a drive").into()
        };

        let burn_row = row![
            toggler(self.burn)
                .label("Burn to disc")
                .on_toggle(Message::BurnToggled)
                .width(Length::Fixed(160.0)),
            drive_picker,
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let iso_value = self
            .iso_output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let iso_row = row![
            toggler(self.iso)
                .label("Save ISO")
                .on_toggle(Message::IsoToggled)
                .width(Length::Fixed(160.0)),
            text_input("dvd.iso in the workspace", &iso_value).width(Length::Fill),
            button(text("Save as...")).on_press(Message::BrowseIsoOutput),
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let buttons = container(
            row![
                text(&self.status),
                button(text("Quit")).on_press(Message::Quit),
                button(text("Continue")).on_press(Message::Continue),
            ]
            .spacing(8)
            .align_y(Vertical::Center),
        )
        .width(Length::Fill)
        .align_x(Horizontal::Right);

        container(
            column![input_row, burn_row, iso_row, buttons]
                .spacing(16)
                .padding(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

fn pick_video_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose a video")
        .add_filter("Video Files", VIDEO_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_file()
}

fn pick_iso_output() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save DVD image as")
        .add_filter("Disc Images", &["iso"])
        .set_file_name("dvd.iso")
        .save_file()
}

fn show_dialog(level: rfd::MessageLevel, title: &str, description: &str) {
    let dialog = rfd::MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok);
    let _ = dialog.show();
}

/// Open the form; returns when the window closes.
pub fn run(config: ConfigManager, burn: bool, iso: bool) -> anyhow::Result<()> {
    iced::application(
        move || Form::new(config.clone(), burn, iso),
        Form::update,
        Form::view,
    )
    .title("Simplified DVD Creator")
    .window_size((850.0, 320.0))
    .resizable(false)
    .run()
    .map_err(|e| anyhow::anyhow!("Interactive form failed: {}", e))
}
