use crate::domain::{MediaGroups, MediaItem, MediaKind};

/// Partition a media list by kind, preserving input order within each group.
pub fn group_media(items: Vec<MediaItem>) -> MediaGroups {
    let mut groups = MediaGroups::default();
    for item in items {
        match item.kind {
            MediaKind::Photo => groups.photos.push(item),
            MediaKind::Animation => groups.animations.push(item),
            MediaKind::Video => groups.videos.push(item),
        }
    }
    groups
}
