use std::path::PathBuf;

use iced::widget::{button, column, row, scrollable, text, text_input};
use iced::{Element, Font, Subscription, Task};
use tokio_util::sync::CancellationToken;

use vidlens_core::{
    DEFAULT_CHUNK_SIZE, PreviewHandle, ServerConfig, analyze_video, is_video, save_analysis,
    spawn_preview,
};

/// Shown in place of a result when the workflow fails for any reason.
const GENERIC_ERROR: &str = "Error processing video. Please try again.";

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    iced::application("vidlens", App::update, App::view)
        .subscription(App::subscription)
        .run_with(App::new)
}

/// The single page-level state struct. Every transition goes through
/// `update`; async work reports back as messages.
#[derive(Default)]
struct App {
    config: Option<ServerConfig>,
    path_input: String,
    selected: Option<PathBuf>,
    preview: Option<PreviewHandle>,
    is_loading: bool,
    result: Option<String>,
    error: Option<String>,
    saved_to: Option<PathBuf>,
    // Monotonic session counter; completions carrying an older value are
    // stale and get dropped.
    session_seq: u64,
    cancel: Option<CancellationToken>,
}

#[derive(Debug, Clone)]
enum Message {
    PathInput(String),
    PathSubmitted,
    FileDropped(PathBuf),
    Analyze,
    AnalysisDone(u64, Result<String, String>),
    SaveResult,
    ResultSaved(Result<PathBuf, String>),
    Reset,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let app = Self {
            config: ServerConfig::from_env().ok(),
            ..Self::default()
        };
        (app, Task::none())
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        })
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PathInput(value) => self.path_input = value,
            Message::PathSubmitted => {
                let path = PathBuf::from(self.path_input.trim());
                self.select_file(path);
            }
            Message::FileDropped(path) => self.select_file(path),
            Message::Analyze => return self.start_analysis(),
            Message::AnalysisDone(seq, outcome) => {
                if seq != self.session_seq {
                    // A superseded session resolved; its result is no
                    // longer of interest.
                    return Task::none();
                }
                self.is_loading = false;
                self.cancel = None;
                match outcome {
                    Ok(text) => self.result = Some(text),
                    Err(_) => self.error = Some(GENERIC_ERROR.to_string()),
                }
            }
            Message::SaveResult => {
                if let Some(text) = self.result.clone() {
                    return Task::perform(
                        async move {
                            let dir = std::env::current_dir().map_err(|e| e.to_string())?;
                            save_analysis(&text, &dir).await.map_err(|e| e.to_string())
                        },
                        Message::ResultSaved,
                    );
                }
            }
            Message::ResultSaved(outcome) => match outcome {
                Ok(path) => self.saved_to = Some(path),
                Err(_) => self.error = Some(GENERIC_ERROR.to_string()),
            },
            Message::Reset => self.reset(),
        }
        Task::none()
    }

    /// File selector contract: non-video paths are ignored with no feedback
    /// and no state change. Accepting a file supersedes any in-flight
    /// session, replaces the preview, and clears the previous result.
    fn select_file(&mut self, path: PathBuf) {
        if !is_video(&path) {
            return;
        }

        self.invalidate_session();
        self.close_preview();
        // Best effort: the workflow does not depend on the player being
        // installed.
        self.preview = if path.exists() {
            spawn_preview(&path).ok()
        } else {
            None
        };
        self.selected = Some(path);
        self.result = None;
        self.error = None;
        self.saved_to = None;
    }

    fn start_analysis(&mut self) -> Task<Message> {
        let Some(path) = self.selected.clone() else {
            return Task::none();
        };
        if self.is_loading {
            return Task::none();
        }
        let Some(config) = self.config.clone() else {
            self.error = Some(GENERIC_ERROR.to_string());
            return Task::none();
        };

        self.invalidate_session();
        let seq = self.session_seq;
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.is_loading = true;
        self.result = None;
        self.error = None;
        self.saved_to = None;

        Task::perform(
            async move {
                let outcome = analyze_video(&config, &path, DEFAULT_CHUNK_SIZE, &cancel)
                    .await
                    .map(|analysis| analysis.text)
                    .map_err(|e| e.to_string());
                (seq, outcome)
            },
            |(seq, outcome)| Message::AnalysisDone(seq, outcome),
        )
    }

    /// Cancel the active session token and bump the counter so any
    /// completion still in flight is discarded.
    fn invalidate_session(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.session_seq += 1;
        self.is_loading = false;
    }

    fn close_preview(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            preview.close();
        }
    }

    fn reset(&mut self) {
        self.invalidate_session();
        self.close_preview();
        self.path_input.clear();
        self.selected = None;
        self.result = None;
        self.error = None;
        self.saved_to = None;
    }

    fn view(&self) -> Element<'_, Message> {
        let mut content = column![
            text("vidlens").size(24),
            text("Drop a video file here or enter its path, then analyze it.").size(14),
            text_input("Path to a video file...", &self.path_input)
                .on_input(Message::PathInput)
                .on_submit(Message::PathSubmitted),
        ]
        .padding(20)
        .spacing(10);

        if let Some(selected) = &self.selected {
            content = content.push(text(format!("Selected: {}", selected.display())).size(14));

            let analyze = if self.is_loading {
                button("Processing...")
            } else {
                button("Analyze video").on_press(Message::Analyze)
            };
            content = content.push(
                row![analyze, button("Upload new video").on_press(Message::Reset)].spacing(10),
            );
        }

        if self.is_loading {
            content = content.push(text("Processing your video..."));
        }

        if let Some(error) = &self.error {
            content = content.push(text(error.clone()));
        }

        if let Some(result) = &self.result {
            if !self.is_loading {
                content = content
                    .push(scrollable(text(result.clone()).font(Font::MONOSPACE)))
                    .push(button("Save analysis").on_press(Message::SaveResult));
                if let Some(saved) = &self.saved_to {
                    content = content.push(text(format!("Saved to {}", saved.display())).size(14));
                }
            }
        }

        content.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new().0
    }

    #[test]
    fn selecting_a_non_video_changes_nothing() {
        let mut app = app();
        let _ = app.update(Message::FileDropped(PathBuf::from("notes.txt")));

        assert!(app.selected.is_none());
        assert!(app.preview.is_none());
        assert!(app.result.is_none());
        assert!(app.error.is_none());
    }

    #[test]
    fn selecting_a_video_clears_the_previous_result() {
        let mut app = app();
        app.result = Some("old result".into());

        let _ = app.update(Message::FileDropped(PathBuf::from("clip.mp4")));

        assert_eq!(app.selected, Some(PathBuf::from("clip.mp4")));
        assert!(app.result.is_none());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut app = app();
        let _ = app.update(Message::FileDropped(PathBuf::from("clip.mp4")));
        app.result = Some("OK".into());
        app.error = Some("boom".into());

        let _ = app.update(Message::Reset);

        assert!(app.selected.is_none());
        assert!(app.preview.is_none());
        assert!(app.result.is_none());
        assert!(app.error.is_none());
        assert!(app.path_input.is_empty());
        assert!(!app.is_loading);
    }

    #[test]
    fn stale_session_completion_is_discarded() {
        let mut app = app();
        app.session_seq = 2;
        app.is_loading = true;
        app.result = None;

        let _ = app.update(Message::AnalysisDone(1, Ok("stale".into())));

        assert!(app.result.is_none());
        assert!(app.is_loading);
    }

    #[test]
    fn current_session_completion_shows_the_result() {
        let mut app = app();
        app.session_seq = 2;
        app.is_loading = true;

        let _ = app.update(Message::AnalysisDone(2, Ok("OK".into())));

        assert_eq!(app.result.as_deref(), Some("OK"));
        assert!(!app.is_loading);
    }

    #[test]
    fn failed_session_shows_the_generic_error() {
        let mut app = app();
        app.session_seq = 1;
        app.is_loading = true;

        let _ = app.update(Message::AnalysisDone(1, Err("connection refused".into())));

        assert_eq!(app.error.as_deref(), Some(GENERIC_ERROR));
        assert!(app.result.is_none());
        assert!(!app.is_loading);
    }

    #[test]
    fn selecting_a_new_file_supersedes_the_active_session() {
        let mut app = app();
        let _ = app.update(Message::FileDropped(PathBuf::from("first.mp4")));
        let seq = app.session_seq;
        app.is_loading = true;
        app.cancel = Some(CancellationToken::new());
        let token = app.cancel.clone().unwrap();

        let _ = app.update(Message::FileDropped(PathBuf::from("second.mp4")));

        assert!(token.is_cancelled());
        assert!(app.session_seq > seq);
        assert!(!app.is_loading);
        assert_eq!(app.selected, Some(PathBuf::from("second.mp4")));
    }
}
