//! # File Name and Template Utilities
//!
//! Small helpers shared by the document archiver and the notification
//! layer: file name normalization, magic-byte extension sniffing and
//! `${placeholder}` template substitution.

/// Append `extension` to `name` unless the name already ends with a
/// plausible file extension (a dot followed by 3-4 letters). The
/// extension is lower-cased and dotted if it isn't already.
pub fn name_with_extension(name: &str, extension: &str) -> String {
    if has_extension(name) {
        return name.to_string();
    }

    let extension = extension.trim().to_lowercase();
    if extension.starts_with('.') {
        format!("{name}{extension}")
    } else {
        format!("{name}.{extension}")
    }
}

fn has_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (3..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Derive a file extension from the leading bytes of a document. Used when
/// the export source delivers a payload without one. Returns `None` for
/// unrecognized signatures; the caller treats that as a per-document
/// failure.
pub fn extension_from_bytes(content: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF", "pdf"),
        (&[0x89, b'P', b'N', b'G'], "png"),
        (&[0xFF, 0xD8, 0xFF], "jpg"),
        (b"GIF8", "gif"),
        (b"II*\x00", "tif"),
        (b"MM\x00*", "tif"),
        (b"{\\rtf", "rtf"),
        (b"PK\x03\x04", "zip"),
        (&[0xD0, 0xCF, 0x11, 0xE0], "doc"),
    ];

    SIGNATURES
        .iter()
        .find(|(magic, _)| content.starts_with(magic))
        .map(|(_, ext)| *ext)
}

/// Replace `${key}` placeholders in `template` with the supplied values.
/// Unknown placeholders are left untouched.
pub fn substitute_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in values {
        result = result.replace(&format!("${{{key}}}"), value);
    }
    result
}
