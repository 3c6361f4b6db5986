//! Merging normalized feeds into a single timeline
//!
//! The merge is a concatenation followed by a stable sort on the post
//! timestamp, newest first. Posts with equal timestamps keep the order in
//! which they were concatenated, so the result is fully determined by the
//! inputs.

use crate::types::FeedPost;

/// Merge the microblog and media feeds into one timeline, newest first.
pub fn aggregate(microblog: Vec<FeedPost>, media: Vec<FeedPost>) -> Vec<FeedPost> {
    aggregate_all([microblog, media])
}

/// Merge any number of feeds, newest first.
///
/// Feeds are concatenated in iteration order before sorting.
pub fn aggregate_all<I>(feeds: I) -> Vec<FeedPost>
where
    I: IntoIterator<Item = Vec<FeedPost>>,
{
    let mut combined: Vec<FeedPost> = feeds.into_iter().flatten().collect();
    // sort_by is stable
    combined.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    combined
}
