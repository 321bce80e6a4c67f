// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::{BatchReport, StatusMessage};

use super::Renderable;

/// Writes one step message, failures prefixed with a red `Error:`.
fn write_message(w: &mut dyn Write, success: bool, message: &str) -> io::Result<()> {
    let message = message.trim_end();
    if success {
        writeln!(w, "{message}")
    } else {
        writeln!(w, "{} {message}", style("Error:").red().bold())
    }
}

impl Renderable for BatchReport {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        for result in &self.results {
            write_message(w, result.success, &result.message)?;
        }

        if ctx.verbose && !self.results.is_empty() {
            writeln!(w)?;
            writeln!(
                w,
                "{} succeeded, {} failed",
                style(self.succeeded).green(),
                style(self.failed).red()
            )?;
        }
        Ok(())
    }
}

impl Renderable for StatusMessage {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        write_message(w, self.success, &self.message)
    }
}

#[cfg(test)]
mod tests {
    use gitp_core::{BatchResult, Failure};

    use super::*;
    use crate::cli::OutputFormat;

    fn ctx(verbose: bool) -> OutputContext {
        OutputContext {
            format: OutputFormat::Text,
            quiet: false,
            verbose,
            is_tty: false,
        }
    }

    #[test]
    fn test_render_batch_report_text() {
        console::set_colors_enabled(false);
        let mut result = BatchResult::default();
        result.push("org/a", Ok("org/a: close issues successful.\n".to_string()));
        result.push("org/b", Err(Failure::resource("org/b: no issues match search.\n")));

        let mut buf = Vec::new();
        BatchReport::from(result)
            .render_text(&mut buf, &ctx(false))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "org/a: close issues successful.\nError: org/b: no issues match search.\n"
        );
    }

    #[test]
    fn test_render_batch_report_verbose_summary() {
        console::set_colors_enabled(false);
        let mut result = BatchResult::default();
        result.push("org/a", Ok("done".to_string()));

        let mut buf = Vec::new();
        BatchReport::from(result)
            .render_text(&mut buf, &ctx(true))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.ends_with("1 succeeded, 0 failed\n"));
    }
}
