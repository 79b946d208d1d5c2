// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Progress utilities
//!
//! Progress indicator for checking many payloads at once.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar over `total` payloads
///
/// Hidden when `visible` is false or there is at most one payload, so
/// machine-readable output and single checks stay clean.
pub fn create_progress_bar(total: u64, message: &str, visible: bool) -> ProgressBar {
    if !visible || total <= 1 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.set_message(message.to_string());
    pb
}
