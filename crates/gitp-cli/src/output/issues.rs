// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::IssuesReport;

use super::Renderable;

impl Renderable for IssuesReport {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        for repo in &self.repositories {
            writeln!(w, "{}", style(&repo.repository).cyan().bold())?;

            if let Some(message) = &repo.message {
                writeln!(w, "  {} {}", style("Error:").red().bold(), message.trim_end())?;
                continue;
            }
            if repo.issues.is_empty() {
                writeln!(w, "  {}", style("no issues match").dim())?;
                continue;
            }

            for issue in &repo.issues {
                let labels = if issue.labels.is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> = issue.labels.iter().map(String::as_str).collect();
                    format!(" [{}]", names.join(", "))
                };
                writeln!(
                    w,
                    "  {} {}{}",
                    style(format!("#{}", issue.number)).dim(),
                    issue.title,
                    style(labels).yellow()
                )?;
            }
        }
        Ok(())
    }
}
