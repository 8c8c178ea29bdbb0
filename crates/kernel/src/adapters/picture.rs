//! Responsive `<picture>` markup for media served by the site's image
//! optimizer.

use url::Url;

use crate::dom::{Document, NodeId};

/// One responsive breakpoint: an optional media query and a target width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub media: Option<&'static str>,
    pub width: u32,
}

/// Wide screens get the large rendition; everything else the small one.
pub const BREAKPOINTS: [Breakpoint; 2] = [
    Breakpoint {
        media: Some("(min-width: 600px)"),
        width: 2000,
    },
    Breakpoint {
        media: None,
        width: 750,
    },
];

const FALLBACK_FORMAT: &str = "jpg";

fn optimized_src(path: &str, width: u32, format: &str) -> String {
    format!("{path}?width={width}&format={format}&optimize=medium")
}

/// Path and extension of an image reference, ignoring any query string.
fn split_source(src: &str) -> (String, String) {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        Err(_) => src.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let file = path.rsplit('/').next().unwrap_or_default();
    let ext = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| FALLBACK_FORMAT.to_string());
    (path, ext)
}

/// Build a `<picture>` with WebP sources per breakpoint, followed by
/// original-format sources and an `<img>` for the last breakpoint.
pub fn optimized_picture(doc: &mut Document, src: &str, alt: &str, eager: bool) -> NodeId {
    let (path, ext) = split_source(src);
    let picture = doc.create_element("picture");

    for bp in &BREAKPOINTS {
        let source = doc.create_element("source");
        if let Some(media) = bp.media {
            doc.set_attr(source, "media", media);
        }
        doc.set_attr(source, "type", "image/webp");
        doc.set_attr(source, "srcset", &optimized_src(&path, bp.width, "webply"));
        doc.append_child(picture, source);
    }

    for bp in &BREAKPOINTS {
        let srcset = optimized_src(&path, bp.width, &ext);
        match bp.media {
            Some(media) => {
                let source = doc.create_element("source");
                doc.set_attr(source, "media", media);
                doc.set_attr(source, "srcset", &srcset);
                doc.append_child(picture, source);
            }
            None => {
                let img = doc.create_element("img");
                doc.set_attr(img, "loading", if eager { "eager" } else { "lazy" });
                doc.set_attr(img, "alt", alt);
                doc.set_attr(img, "src", &srcset);
                doc.append_child(picture, img);
            }
        }
    }

    picture
}

/// Serialized form of [`optimized_picture`], for attaching to a record.
pub fn optimized_picture_html(src: &str, alt: &str) -> String {
    let mut doc = Document::new();
    let picture = optimized_picture(&mut doc, src, alt, false);
    doc.to_html(picture)
}
