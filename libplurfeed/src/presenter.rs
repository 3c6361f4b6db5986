//! Plain-text rendering of a merged feed

use std::io::Write;

use crate::types::{FeedPost, PostKind};

/// Format used for every timestamp in the feed (rendered in UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Printed after each post block
pub const SEPARATOR_WIDTH: usize = 80;

/// Render a single post block, without the separator or trailing newline.
pub fn render_post(post: &FeedPost) -> String {
    let header = format!(
        "[{}] {}",
        post.platform(),
        post.timestamp().format(TIMESTAMP_FORMAT)
    );

    match post.kind() {
        PostKind::Microblog { author } => format!("{} @{}: {}", header, author, post.text()),
        PostKind::Media { media_url } => format!(
            "{} {} Post: {}\nMedia URL: {}",
            header,
            post.platform(),
            post.text(),
            media_url.as_deref().unwrap_or("")
        ),
    }
}

/// Write every post followed by a separator line.
pub fn write_feed<W: Write>(out: &mut W, posts: &[FeedPost]) -> std::io::Result<()> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    for post in posts {
        writeln!(out, "{}", render_post(post))?;
        writeln!(out, "{}", separator)?;
    }
    out.flush()
}
