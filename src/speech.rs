use std::process::{Child, Command, Stdio};

/// Fire-and-forget English text-to-speech.
pub trait Speaker {
    /// Starts speaking `text`, interrupting anything still playing.
    fn speak(&mut self, text: &str);

    fn stop(&mut self);
}

/// Speaks by running an external TTS program (`espeak`, `say`, ...) with the
/// text as its last argument.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSpeaker {
    /// Parses a command line such as `espeak -v en-us`.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            child: None,
        })
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) {
        self.stop();

        let text = text.trim();
        if text.is_empty() {
            return;
        }

        match Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.child = Some(child),
            Err(e) => tracing::warn!(program = %self.program, "speech output unavailable: {e}"),
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, _text: &str) {}

    fn stop(&mut self) {}
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSpeaker {
    pub spoken: Vec<String>,
}

#[cfg(test)]
impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }

    fn stop(&mut self) {}
}
