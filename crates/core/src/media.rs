use std::path::Path;

/// Map a file extension to its `video/...` content type.
///
/// A filesystem path carries no declared MIME type, so the type is derived
/// from the extension. Unknown or missing extensions yield `None`.
pub fn video_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mpg" | "mpeg" => "video/mpeg",
        "ts" => "video/mp2t",
        "flv" => "video/x-flv",
        "ogv" => "video/ogg",
        _ => return None,
    };
    Some(content_type)
}

pub fn is_video(path: &Path) -> bool {
    video_content_type(path).is_some_and(|ct| ct.starts_with("video/"))
}
