pub const THUMBNAIL_SUFFIX: &str = "_thumbnail";

/// Splits `key` into stem and extension. The extension starts at the last `.`
/// of the final path component, unless only dots precede it there.
fn split_extension(key: &str) -> (&str, &str) {
    let name_start = key.rfind('/').map_or(0, |i| i + 1);
    let name = &key[name_start..];
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => {
            key.split_at(name_start + dot)
        }
        _ => (key, ""),
    }
}

/// Destination key for the thumbnail of `key`: `photo.png` -> `photo_thumbnail.png`.
pub fn derive_thumbnail_key(key: &str) -> String {
    let (stem, ext) = split_extension(key);
    format!("{stem}{THUMBNAIL_SUFFIX}{ext}")
}
