//! Category classification across MIME types and file extensions

use storage_health::analysis::CategoryClassifier;
use storage_health::types::Category;

#[test]
fn test_mime_type_wins_over_extension() {
    // A mislabelled extension does not override an explicit MIME type
    assert_eq!(
        CategoryClassifier::classify("video/mp4", "clip.jpg"),
        Category::Videos
    );
    assert_eq!(
        CategoryClassifier::classify("audio/mpeg", "track.txt"),
        Category::Audio
    );
}

#[test]
fn test_extension_fallback_when_mime_missing_or_generic() {
    assert_eq!(CategoryClassifier::classify("", "x.pdf"), Category::Documents);
    assert_eq!(
        CategoryClassifier::classify("application/octet-stream", "IMG_0001.HEIC"),
        Category::Photos
    );
    assert_eq!(
        CategoryClassifier::classify("binary/octet-stream", "song.flac"),
        Category::Audio
    );
}

#[test]
fn test_document_mime_types() {
    let cases = [
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.oasis.opendocument.spreadsheet",
        "text/plain; charset=utf-8",
    ];
    for content_type in cases {
        assert_eq!(
            CategoryClassifier::classify(content_type, "upload"),
            Category::Documents,
            "{} should be a document",
            content_type
        );
    }
}

#[test]
fn test_unknown_objects_fall_into_other() {
    assert_eq!(
        CategoryClassifier::classify("application/zip", "archive.zip"),
        Category::Other
    );
    assert_eq!(CategoryClassifier::classify("", "README"), Category::Other);
    assert_eq!(CategoryClassifier::classify("", ".bashrc"), Category::Other);
    assert_eq!(CategoryClassifier::classify("", ""), Category::Other);
}

#[test]
fn test_mime_matching_ignores_case_and_parameters() {
    assert_eq!(
        CategoryClassifier::classify("IMAGE/PNG; q=0.9", "avatar"),
        Category::Photos
    );
}
