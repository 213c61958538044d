//! MIME type detection and output file naming

/// MIME type used when nothing better is known
pub const FALLBACK_MIME: &str = "application/octet-stream";

pub const HTML_MIME: &str = "text/html";

/// Determine the MIME type of a response
///
/// The `Content-Type` header wins; otherwise the type is guessed from the
/// URL path extension.
pub fn detect_mime(content_type: Option<&str>, url: &str) -> String {
    if let Some(header) = content_type {
        let mime = header.split(';').next().unwrap_or_default().trim();
        if !mime.is_empty() {
            return mime.to_lowercase();
        }
    }

    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// File extension (with leading dot) for a MIME type
pub fn extension_for_mime(mime: &str) -> String {
    let preferred = match mime {
        "image/jpeg" => Some("jpg"),
        "text/plain" => Some("txt"),
        FALLBACK_MIME => Some("bin"),
        _ => None,
    };
    preferred
        .or_else(|| {
            mime_guess::get_mime_extensions_str(mime).and_then(|exts| exts.first().copied())
        })
        .map_or_else(|| ".bin".to_string(), |ext| format!(".{ext}"))
}

/// Output file name for a downloaded URL
///
/// The start URL prefix is removed and slashes are flattened, so
/// `https://site/news/a` crawled from `https://site` becomes `news_a`.
pub fn output_filename(url: &str, start_url: &str, mime: &str) -> String {
    let stem = url.replace(start_url, "");
    let stem = stem.trim_matches('/');
    let stem = if stem.is_empty() { "index" } else { stem };
    let stem: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | ':' | '*' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    if mime == HTML_MIME {
        format!("{stem}_text.html")
    } else {
        format!("{stem}{}", extension_for_mime(mime))
    }
}
