use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(80);

/// Spinner shown while a repository is being fetched. The message carries
/// the running commit count and the page being walked.
pub fn fetch_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]),
    );
    pb.enable_steady_tick(TICK);
    pb.set_message(message);
    pb
}

/// Every commit was fetched and the file is in place.
pub fn finish_written(pb: &ProgressBar, message: String) {
    finish_with(pb, "\x1b[32m✔\x1b[0m {wide_msg}", message);
}

/// The stream stopped early (error or Ctrl-C); what was fetched is kept.
pub fn finish_stopped(pb: &ProgressBar, message: String) {
    finish_with(pb, "\x1b[31m✘\x1b[0m {wide_msg}", message);
}

fn finish_with(pb: &ProgressBar, template: &str, message: String) {
    pb.set_style(
        ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.finish_with_message(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_keeps_final_message() {
        let pb = fetch_spinner("fetching commits of o/n".into());
        assert_eq!(pb.message(), "fetching commits of o/n");
        finish_stopped(&pb, "fetching o/n stopped after 2 commits".into());
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "fetching o/n stopped after 2 commits");
    }
}
