//! Error catalog for the receipt analysis pipeline
//!
//! Central registry of every error code the pipeline can surface, with the
//! metadata needed to build a caller-facing response: display name, HTTP
//! status class, internal message, user-facing message, and remediation
//! steps.
//!
//! Code format: `E` + 3-digit HTTP status class + 2-digit sequence
//! (e.g. `E40002`, `E50012`). The 4xx family is caller-correctable, the
//! 5xx family is system-side.
//!
//! Upstream services report content rejections as free text with an
//! embedded `Error:<CODE>` marker (e.g. `"Error:E41002 - corrupted"`);
//! [`extract_error_code`] recovers the code from such messages.
//!
//! The catalog is populated once and never mutated, so concurrent reads
//! from request handlers need no synchronization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Well-known error codes, grouped by the stage that produces them.
pub mod codes {
    /// Missing or empty request parameter
    pub const INVALID_PARAMETER: &str = "E40001";
    /// Storage path does not start with `/`
    pub const INVALID_PATH_FORMAT: &str = "E40002";
    /// Path or file name exceeds the 255-character limit
    pub const PATH_TOO_LONG: &str = "E40003";
    /// File identifier did not resolve to a stored object
    pub const FILE_NOT_FOUND: &str = "E40004";
    /// Storage path contains a parent-directory reference (`..`)
    pub const PATH_TRAVERSAL: &str = "E40005";
    /// Storage path contains consecutive separators (`//`)
    pub const DOUBLE_SEPARATOR: &str = "E40006";
    /// File extension is not in the allowed set
    pub const UNSUPPORTED_EXTENSION: &str = "E40007";

    /// Remote classifier: unsupported image format
    pub const UNSUPPORTED_IMAGE_FORMAT: &str = "E41001";
    /// Remote classifier: image file corrupted
    pub const IMAGE_CORRUPTED: &str = "E41002";
    /// Remote classifier: image below minimum resolution
    pub const IMAGE_TOO_SMALL: &str = "E41004";
    /// Remote classifier: no receipt detected in the image
    pub const RECEIPT_NOT_DETECTED: &str = "E41006";
    /// Remote classifier: text too unclear to read
    pub const TEXT_NOT_READABLE: &str = "E41007";
    /// Remote classifier: image too blurry
    pub const IMAGE_TOO_BLURRY: &str = "E41008";
    /// Remote classifier: multiple receipts in one image
    pub const MULTIPLE_RECEIPTS: &str = "E41009";

    /// Unexpected internal fault (also covers audit persistence failure)
    pub const INTERNAL_ERROR: &str = "E50001";
    /// Could not connect to the classification service
    pub const UPSTREAM_CONNECTION_FAILED: &str = "E50002";
    /// Classification did not complete within the configured deadline
    pub const PROCESSING_TIMEOUT: &str = "E50012";
}

/// Metadata for one error code
///
/// Entries are immutable; `message` is for logs and API `message` fields,
/// `user_message` is safe to show to an end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// Error code (e.g. "E40002")
    pub code: &'static str,
    /// Short display name (e.g. "Invalid image path format")
    pub name: &'static str,
    /// HTTP status the code maps to
    pub http_status: u16,
    /// Internal message (logs, API `message` field)
    pub message: &'static str,
    /// Message suitable for end-user display
    pub user_message: &'static str,
    /// Ordered remediation steps for the user
    pub recommended_actions: &'static [&'static str],
}

const RETRY_ACTIONS: &[&str] = &["Retry after a short wait", "Contact support"];
const RECAPTURE: &[&str] = &["Capture the receipt again"];

static CATALOG: Lazy<HashMap<&'static str, ErrorDescriptor>> = Lazy::new(|| {
    let entries = [
        // 4xx: caller-correctable
        ErrorDescriptor {
            code: codes::INVALID_PARAMETER,
            name: "Invalid parameter",
            http_status: 400,
            message: "a required parameter is missing or empty",
            user_message: "Image upload failed. Please capture the receipt again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::INVALID_PATH_FORMAT,
            name: "Invalid image path format",
            http_status: 400,
            message: "the image path format is invalid",
            user_message: "The image could not be read. Please capture the receipt again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::PATH_TOO_LONG,
            name: "Image path too long",
            http_status: 400,
            message: "the path exceeds 255 characters",
            user_message: "The file name is too long. Please upload the image again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::FILE_NOT_FOUND,
            name: "File not found",
            http_status: 404,
            message: "no file exists for the requested identifier",
            user_message: "The image could not be found. Please select another image",
            recommended_actions: &["Select another image"],
        },
        ErrorDescriptor {
            code: codes::PATH_TRAVERSAL,
            name: "Path traversal rejected",
            http_status: 400,
            message: "the image path contains a parent directory reference",
            user_message: "The image could not be read. Please capture the receipt again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::DOUBLE_SEPARATOR,
            name: "Consecutive separators rejected",
            http_status: 400,
            message: "the image path contains consecutive separators",
            user_message: "The image could not be read. Please capture the receipt again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::UNSUPPORTED_EXTENSION,
            name: "Unsupported file extension",
            http_status: 400,
            message: "the file extension is not in the allowed set",
            user_message: "Only image files (JPEG, PNG, GIF, BMP, WebP) can be uploaded",
            recommended_actions: RECAPTURE,
        },
        // 4xx: content rejections reported by the remote classifier
        ErrorDescriptor {
            code: codes::UNSUPPORTED_IMAGE_FORMAT,
            name: "Unsupported image format",
            http_status: 400,
            message: "the image format is not supported",
            user_message: "Unsupported image format. Please capture in JPEG or PNG",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::IMAGE_CORRUPTED,
            name: "Image file corrupted",
            http_status: 400,
            message: "the image file is corrupted",
            user_message: "The image is corrupted. Please capture the receipt again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::IMAGE_TOO_SMALL,
            name: "Image too small",
            http_status: 400,
            message: "the image is below the 200dpi minimum resolution",
            user_message: "The image is too small to satisfy the statutory resolution \
                           (200dpi or higher). Please capture a sharper image",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::RECEIPT_NOT_DETECTED,
            name: "Receipt not detected",
            http_status: 400,
            message: "no receipt was detected in the image",
            user_message: "No receipt found. Center the receipt in the frame and capture again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::TEXT_NOT_READABLE,
            name: "Text not readable",
            http_status: 400,
            message: "the text is too unclear to read",
            user_message: "The text is unclear. Capture again in a bright place with the \
                           camera in focus",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::IMAGE_TOO_BLURRY,
            name: "Image too blurry",
            http_status: 400,
            message: "the image is blurred",
            user_message: "The image is blurry. Hold the camera steady and capture again",
            recommended_actions: RECAPTURE,
        },
        ErrorDescriptor {
            code: codes::MULTIPLE_RECEIPTS,
            name: "Multiple receipts detected",
            http_status: 400,
            message: "multiple receipts appear in one image",
            user_message: "Multiple receipts were detected. Capture them one at a time",
            recommended_actions: RECAPTURE,
        },
        // 5xx: system-side
        ErrorDescriptor {
            code: codes::INTERNAL_ERROR,
            name: "Internal server error",
            http_status: 500,
            message: "an internal server error occurred",
            user_message: "A system error occurred. Please wait a moment and retry",
            recommended_actions: RETRY_ACTIONS,
        },
        ErrorDescriptor {
            code: codes::UPSTREAM_CONNECTION_FAILED,
            name: "Upstream connection failed",
            http_status: 503,
            message: "could not connect to the classification service",
            user_message: "A system error occurred. Please wait a moment and retry",
            recommended_actions: RETRY_ACTIONS,
        },
        ErrorDescriptor {
            code: codes::PROCESSING_TIMEOUT,
            name: "Processing timeout",
            http_status: 504,
            message: "processing timed out",
            user_message: "Processing is taking too long. Please wait a moment and retry",
            recommended_actions: &["Retry after 60 seconds", "Contact support"],
        },
    ];

    entries.iter().map(|e| (e.code, *e)).collect()
});

/// Marker scanned for by [`extract_error_code`]
static CODE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Error:([A-Z0-9]+)").expect("valid error marker regex"));

/// Look up the descriptor for an error code
///
/// Returns `None` for codes not in the catalog; callers degrade to a
/// descriptor-less response rather than fabricating metadata.
pub fn lookup(code: &str) -> Option<&'static ErrorDescriptor> {
    CATALOG.get(code)
}

/// Extract an embedded error code from a free-text message
///
/// Upstream failures arrive as opaque text carrying an `Error:<CODE>`
/// marker somewhere in the string. Returns the first code after the
/// marker, or `None` when no marker is present. Total over arbitrary
/// input.
///
/// ```
/// use recivo_common::catalog::extract_error_code;
///
/// assert_eq!(
///     extract_error_code("Error:E41002 - corrupted"),
///     Some("E41002".to_string()),
/// );
/// assert_eq!(extract_error_code("plain failure, no code"), None);
/// ```
pub fn extract_error_code(message: &str) -> Option<String> {
    CODE_MARKER
        .captures(message)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_code_returns_descriptor() {
        let descriptor = lookup("E41002").expect("E41002 is in the catalog");
        assert_eq!(descriptor.code, "E41002");
        assert_eq!(descriptor.name, "Image file corrupted");
        assert_eq!(descriptor.http_status, 400);
        assert!(!descriptor.recommended_actions.is_empty());
    }

    #[test]
    fn lookup_unknown_code_returns_none() {
        assert!(lookup("E99999").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("garbage").is_none());
    }

    #[test]
    fn all_codes_follow_status_class_format() {
        // letter + 3-digit status class + 2-digit sequence
        let format = Regex::new(r"^E[45]\d{4}$").unwrap();
        for (key, descriptor) in CATALOG.iter() {
            assert!(format.is_match(key), "malformed code: {key}");
            assert_eq!(*key, descriptor.code);
            let class = descriptor.http_status / 100;
            let key_class: u16 = key[1..2].parse().unwrap();
            assert_eq!(class, key_class, "status class mismatch for {key}");
        }
    }

    #[test]
    fn extract_code_from_marker() {
        assert_eq!(
            extract_error_code("Error:E41002 - corrupted"),
            Some("E41002".to_string())
        );
    }

    #[test]
    fn extract_code_marker_mid_string() {
        assert_eq!(
            extract_error_code("upstream said Error:E50012 while processing"),
            Some("E50012".to_string())
        );
    }

    #[test]
    fn extract_code_without_marker_returns_none() {
        assert_eq!(extract_error_code("plain failure, no code"), None);
        assert_eq!(extract_error_code(""), None);
        assert_eq!(extract_error_code("Error:"), None);
    }

    #[test]
    fn extract_code_returns_first_match() {
        assert_eq!(
            extract_error_code("Error:E40001 then Error:E50001"),
            Some("E40001".to_string())
        );
    }
}
