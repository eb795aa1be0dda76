use crate::format::render;
use crate::settings::{
    parse_precision, AllowedOperations, Settings, SettingsStore, AVAILABLE_OPERATIONS,
    MAX_PRECISION,
};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Interactive prompt loop over arbitrary input and output streams.
pub struct Session<R, W> {
    settings: Settings,
    store: SettingsStore,
    input: R,
    output: W,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Loads settings from `store`, or walks the user through creating them.
    pub fn start(store: SettingsStore, input: R, output: W) -> io::Result<Self> {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable settings file");
                None
            }
        };
        let mut session = Self {
            settings: loaded.clone().unwrap_or_default(),
            store,
            input,
            output,
        };
        if loaded.is_none() {
            session.first_time_setup()?;
        }
        Ok(session)
    }

    /// Starts with the given settings without touching the store.
    pub fn with_settings(settings: Settings, store: SettingsStore, input: R, output: W) -> Self {
        Self {
            settings,
            store,
            input,
            output,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes the display precision for this session only; it is not saved
    /// unless the settings are edited later.
    pub fn override_precision(&mut self, precision: u32) {
        self.settings.precision = precision.min(MAX_PRECISION);
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Welcome, {}! Simple Calculator starting.",
            self.settings.display_name
        )?;
        writeln!(
            self.output,
            "Type expressions like: 2 + 2  or  sqrt 9  or  2 ^ 3"
        )?;
        writeln!(self.output, "Commands: `settings` to change, `quit` to exit")?;

        loop {
            let prompt = format!("{}> ", self.settings.display_name);
            let Some(line) = self.prompt(&prompt)? else {
                break;
            };
            if self.handle_line(line.trim())? == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Ok(Flow::Quit);
        }
        if line.eq_ignore_ascii_case("settings") {
            self.edit_settings()?;
            self.save_settings()?;
            return Ok(Flow::Continue);
        }
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let rendered = render(line, &self.settings);
        debug!(input = line, output = %rendered, "evaluated");
        writeln!(self.output, "{}", rendered)?;
        Ok(Flow::Continue)
    }

    fn first_time_setup(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "No settings found. Let's customize your calculator."
        )?;
        self.edit_settings()?;

        let answer = self
            .prompt("Save these settings for next time? (y/N): ")?
            .unwrap_or_default();
        if answer.trim_start().starts_with(['y', 'Y']) && self.save_settings()? {
            writeln!(
                self.output,
                "Settings saved to {}",
                self.store.path().display()
            )?;
        }
        Ok(())
    }

    /// Blank or invalid answers keep the current value.
    fn edit_settings(&mut self) -> io::Result<()> {
        let name = self.prompt(&format!("Name ({}): ", self.settings.display_name))?;
        if let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            self.settings.display_name = name.to_string();
        }

        let precision = self.prompt(&format!(
            "Precision (decimal places) ({}): ",
            self.settings.precision
        ))?;
        if let Some(precision) = precision.as_deref().and_then(parse_precision) {
            self.settings.precision = precision;
        }

        writeln!(
            self.output,
            "Allowed operations (comma separated). Available: {}",
            AVAILABLE_OPERATIONS.join(", ")
        )?;
        let operations = self.prompt(&format!(
            "Current: {} : ",
            self.settings.allowed_operations
        ))?;
        if let Some(operations) = operations.map(|ops| AllowedOperations::parse_list(&ops)) {
            if !operations.is_empty() {
                self.settings.allowed_operations = operations;
            }
        }

        debug!(settings = ?self.settings, "settings updated");
        Ok(())
    }

    /// Returns whether the settings were written.
    fn save_settings(&mut self) -> io::Result<bool> {
        match self.store.save(&self.settings) {
            Ok(()) => Ok(true),
            Err(err) => {
                let message = format!("{:#}", anyhow::Error::from(err));
                warn!(error = %message, "could not save settings");
                writeln!(self.output, "Could not save settings: {}", message)?;
                Ok(false)
            }
        }
    }

    /// Prints `text` and reads one line. `None` means end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
