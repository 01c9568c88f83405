//! The single shared playback slot. At most one sound is ever current; the
//! view owns the real audio element and executes the commands issued here.

/// What the view must do to its audio element after a toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause,
    Resume,
    /// Stop whatever was playing and start this url from the beginning.
    Switch(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    current: Option<String>,
    playing: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The learner tapped the speaker icon for `url`.
    pub fn toggle(&mut self, url: &str) -> PlaybackCommand {
        if self.current.as_deref() == Some(url) {
            self.playing = !self.playing;
            if self.playing {
                PlaybackCommand::Resume
            } else {
                PlaybackCommand::Pause
            }
        } else {
            self.current = Some(url.to_string());
            self.playing = true;
            PlaybackCommand::Switch(url.to_string())
        }
    }

    /// The element reported the sound ran to its end.
    pub fn finished(&mut self) {
        self.playing = false;
    }

    /// Drop the slot entirely, e.g. when the card view closes. Reports
    /// whether a sound was actually live.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.playing;
        self.current = None;
        self.playing = false;
        was_playing
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
