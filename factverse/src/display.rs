//! Terminal presentation: banner, menus, typing animation and progress bars.
//!
//! All delays are skipped when animation is disabled, so piped or scripted
//! sessions run at full speed.

use crate::menu::MenuLayout;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use factverse_core::category::CATEGORIES;
use factverse_core::{FactEntry, Provenance, ProviderStatus};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

const BANNER: &str = "\
████████████████████████████████████
█───█────█────█────█───█────█──────█
█ F A C T V E R S E   T O O L      █
█───█────█────█────█───█────█──────█
████████████████████████████████████";

const TYPING_DELAY: Duration = Duration::from_millis(20);
const FACT_TYPING_DELAY: Duration = Duration::from_millis(15);
const STEP_DELAY: Duration = Duration::from_millis(500);

/// Writes the shell's output to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Display {
    animate: bool,
}

impl Display {
    pub fn new(animate: bool) -> Self {
        Self { animate }
    }

    async fn pause(&self, duration: Duration) {
        if self.animate {
            tokio::time::sleep(duration).await;
        }
    }

    pub fn clear(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
    }

    /// Print a prompt without a newline.
    pub fn prompt(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", text.bold())?;
        stdout.flush()
    }

    pub fn line(&self, text: &str) {
        println!("{text}");
    }

    pub fn error(&self, text: &str) {
        println!("{}", format!("❌ {text}").red());
    }

    pub fn success(&self, text: &str) {
        println!("{}", format!("✅ {text}").green());
    }

    /// Print `text` one character at a time.
    pub async fn type_out(&self, text: &str, delay: Duration) -> io::Result<()> {
        let mut stdout = io::stdout();
        if !self.animate {
            writeln!(stdout, "{text}")?;
            return stdout.flush();
        }

        for ch in text.chars() {
            write!(stdout, "{ch}")?;
            stdout.flush()?;
            tokio::time::sleep(delay).await;
        }
        writeln!(stdout)?;
        stdout.flush()
    }

    /// Draw a bar filling from 0% to 100% over `duration`.
    pub async fn progress_bar(
        &self,
        label: &str,
        width: usize,
        empty: char,
        duration: Duration,
    ) -> io::Result<()> {
        let mut stdout = io::stdout();
        let width = width.max(1);
        let step = duration / width as u32;
        let first = if self.animate { 0 } else { width };

        for filled in first..=width {
            let percent = filled * 100 / width;
            let bar: String = std::iter::repeat('█')
                .take(filled)
                .chain(std::iter::repeat(empty).take(width - filled))
                .collect();
            write!(stdout, "\r{label}{} {percent}%", bar.green())?;
            stdout.flush()?;
            self.pause(step).await;
        }

        writeln!(stdout)?;
        stdout.flush()
    }

    pub async fn banner(&self, remote_active: bool) -> io::Result<()> {
        println!("{}", "🟢 Initializing... ⏳".green());
        self.pause(STEP_DELAY).await;
        println!("🔐 Launching: FactVerse – AI-Enhanced Fact Generator");
        self.pause(STEP_DELAY).await;
        println!("🧬 Terminal Interface Active...");
        if remote_active {
            println!("{}", "🤖 AI Fact Generator: ONLINE".cyan());
        } else {
            println!("{}", "📚 Local Fact Database: ACTIVE".cyan());
        }
        println!();
        println!("{}", BANNER.green().bold());
        println!();
        self.progress_bar("[ Loading tool... ] ", 20, '▒', Duration::from_millis(1500))
            .await?;
        println!();
        Ok(())
    }

    pub fn menu(&self, layout: MenuLayout, ai_mode: bool) {
        println!("💾 Choose a Category to Extract Random Data:");
        println!();
        for info in CATEGORIES.iter() {
            println!("[{}] {}", info.menu_key, info.label);
        }
        if let Some(key) = layout.toggle_key() {
            let state = if ai_mode { "ON".green() } else { "OFF".red() };
            println!("[{key}] 🤖 Toggle AI Mode ({state})");
        }
        println!("[{}] 🛑 Exit Terminal", layout.exit_key());
        println!();
    }

    /// Lead-in shown before a fact is fetched.
    pub async fn fact_header(&self, label: &str, remote: bool) -> io::Result<()> {
        println!("{}", "[✔️] Access Granted.".green());
        self.pause(STEP_DELAY).await;
        let line = if remote {
            format!("[🤖] Generating AI fact for: {label}...")
        } else {
            format!("[🧠] Fetching random entry from: {label}...")
        };
        self.type_out(&line, TYPING_DELAY).await?;
        println!();
        Ok(())
    }

    pub async fn fact(&self, entry: &FactEntry) -> io::Result<()> {
        println!("📄 Terminal Output:");
        print!(">> ");
        self.type_out(&format!("\"{}\"", entry.text), FACT_TYPING_DELAY)
            .await?;
        match entry.provenance {
            Provenance::Remote => println!("{}", "[🤖 AI-Generated]".cyan()),
            Provenance::Local => println!("{}", "[📚 Database]".cyan()),
            Provenance::Error => println!("{}", "[⚠️ Unavailable]".yellow()),
        }
        println!("{}", "-".repeat(60));
        println!();
        Ok(())
    }

    pub fn actions(&self) {
        println!("🔁 Actions:");
        println!("[1] Get Another  [2] Change Category  [3] Exit Tool");
    }

    pub async fn ai_toggled(&self, enabled: bool) {
        let state = if enabled {
            "ENABLED".green()
        } else {
            "DISABLED".red()
        };
        println!("🤖 AI Mode: {state}");
        self.pause(Duration::from_secs(1)).await;
    }

    pub async fn exit_sequence(&self, saved_facts: Option<&Path>) -> io::Result<()> {
        for step in [
            "📴 Disconnecting from FactVerse Terminal...",
            "💾 Saving session data...",
            "🔒 Encrypting your activity logs...",
        ] {
            println!("{step}");
            self.pause(STEP_DELAY).await;
        }
        println!("🔁 Terminating session variables...");
        println!();
        println!("{}", "🟢 Status: Safe Disconnect".green());
        println!();
        self.progress_bar("", 40, ' ', Duration::from_millis(800))
            .await?;
        println!("{}", "✅ Logout successful.".green());
        println!();
        if let Some(path) = saved_facts {
            println!("📁 Your saved facts are in: {}", path.display());
        }
        println!("🕶️ Stay anonymous, stay curious.");
        println!("👋 Goodbye, hacker.");
        Ok(())
    }

    pub fn interrupted(&self) {
        println!();
        println!("👋 Thanks for using FactVerse!");
    }
}

/// Render the `--status` report.
pub fn format_status(status: &ProviderStatus, facts_path: &Path) -> String {
    let mut out = String::new();
    out.push_str("FactVerse status\n");
    match &status.backend {
        Some(backend) => out.push_str(&format!("  Remote generator: ONLINE ({backend})\n")),
        None => out.push_str("  Remote generator: OFFLINE (no OPENAI_API_KEY)\n"),
    }
    if status.local_facts_loaded {
        out.push_str(&format!(
            "  Local facts: {} in {} categories ({})\n",
            status.local_fact_count,
            status.categories.len(),
            facts_path.display()
        ));
        out.push_str(&format!("  Categories: {}\n", status.categories.join(", ")));
    } else {
        out.push_str(&format!("  Local facts: none ({})\n", facts_path.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(backend: Option<&str>, count: usize) -> ProviderStatus {
        ProviderStatus {
            remote_available: backend.is_some(),
            backend: backend.map(str::to_string),
            local_facts_loaded: count > 0,
            local_fact_count: count,
            categories: if count > 0 {
                vec!["fun".into(), "lazy".into()]
            } else {
                Vec::new()
            },
            seen_this_session: 0,
        }
    }

    #[test]
    fn test_status_offline_with_local_facts() {
        let report = format_status(&status(None, 4), Path::new("facts.json"));
        assert!(report.contains("Remote generator: OFFLINE"));
        assert!(report.contains("Local facts: 4 in 2 categories (facts.json)"));
        assert!(report.contains("Categories: fun, lazy"));
    }

    #[test]
    fn test_status_online_without_local_facts() {
        let report = format_status(
            &status(Some("gpt-3.5-turbo @ https://api.openai.com/v1"), 0),
            Path::new("missing.json"),
        );
        assert!(report.contains("ONLINE (gpt-3.5-turbo @ https://api.openai.com/v1)"));
        assert!(report.contains("Local facts: none (missing.json)"));
    }
}
