use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rmht::MhtError;
use rmht::io::{ArchiveEncoding, LocalFileSink, LocalFileSource, read_archive, write_container};
use rmht::mht::{Container, PackOptions, Part, UnpackOptions, pack_all, parse_archive, unpack_all, write_archive};
use tempfile::TempDir;
use walkdir::WalkDir;

const PNG_HEADER: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn build_site(root: &Path) {
    fs::create_dir_all(root.join("css")).unwrap();
    fs::create_dir_all(root.join("img/icons")).unwrap();
    fs::write(
        root.join("index.html"),
        "<html><head><link href=\"css/site.css\"></head><body>Grüße, 世界 🌍</body></html>\r\n",
    )
    .unwrap();
    fs::write(root.join("css/site.css"), "body::after { content: \"→\"; }\n").unwrap();
    fs::write(root.join("app.js"), "console.log('hi');").unwrap();
    fs::write(root.join("img/logo.png"), PNG_HEADER).unwrap();
    fs::write(root.join("img/icons/fav.ico"), [0u8, 0, 1, 0, 0xff]).unwrap();
}

async fn pack_then_unpack(src: &Path, dst: &Path) -> usize {
    let container = pack_all(src, &PackOptions::default()).await.unwrap();
    let archive = write_archive(&container);
    let parsed = parse_archive(&archive).unwrap();
    unpack_all(&parsed, dst, &UnpackOptions::default()).await.unwrap()
}

#[tokio::test]
async fn test_round_trip_reproduces_tree() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    build_site(src.path());

    let written = pack_then_unpack(src.path(), dst.path()).await;

    assert_eq!(written, 5);
    assert_eq!(snapshot(src.path()), snapshot(dst.path()));
}

#[tokio::test]
async fn test_round_trip_through_archive_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    build_site(src.path());
    let archive = work.path().join("site.mht");

    let container = pack_all(src.path(), &PackOptions::default()).await.unwrap();
    let sink = LocalFileSink::new(&archive, false).unwrap();
    write_container(&sink, &container, ArchiveEncoding::utf_8_sig())
        .await
        .unwrap();

    let source = LocalFileSource::new(&archive).unwrap();
    let parsed = read_archive(&source, ArchiveEncoding::utf_8_sig()).await.unwrap();
    unpack_all(&parsed, dst.path(), &UnpackOptions::default())
        .await
        .unwrap();

    assert_eq!(snapshot(src.path()), snapshot(dst.path()));
}

#[tokio::test]
async fn test_text_and_binary_fidelity() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let text = "naïve café — ünïcödé ✓\nsecond line\n";
    fs::write(src.path().join("index.html"), "<p>root</p>").unwrap();
    fs::write(src.path().join("notes.txt"), text).unwrap();
    fs::write(src.path().join("pixel.png"), PNG_HEADER).unwrap();

    pack_then_unpack(src.path(), dst.path()).await;

    assert_eq!(fs::read_to_string(dst.path().join("notes.txt")).unwrap(), text);
    assert_eq!(fs::read(dst.path().join("pixel.png")).unwrap(), PNG_HEADER);
}

#[tokio::test]
async fn test_archive_is_deterministic() {
    let src = TempDir::new().unwrap();
    build_site(src.path());

    let first = write_archive(&pack_all(src.path(), &PackOptions::default()).await.unwrap());
    let second = write_archive(&pack_all(src.path(), &PackOptions::default()).await.unwrap());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_exactly_one_index_at_root() {
    let dst = TempDir::new().unwrap();
    let container = Container::from(vec![
        Part::root("<p>root</p>".to_string()),
        Part::text("pages/index.html", "text/html", "<p>nested</p>".to_string()),
        Part::binary("a.bin", "application/octet-stream", vec![1]),
    ]);

    unpack_all(&container, dst.path(), &UnpackOptions::default())
        .await
        .unwrap();

    let files = snapshot(dst.path());
    assert_eq!(files.keys().filter(|k| k.as_str() == "index.html").count(), 1);
    assert_eq!(files["index.html"], b"<p>root</p>");
    assert_eq!(files["pages/index.html"], b"<p>nested</p>");
}

#[tokio::test]
async fn test_first_only_with_three_parts() {
    let dst = TempDir::new().unwrap();
    let container = Container::from(vec![
        Part::root("<p>root</p>".to_string()),
        Part::text("a.css", "text/css", String::new()),
        Part::binary("b.png", "image/png", PNG_HEADER.to_vec()),
    ]);
    let options = UnpackOptions {
        first_only: true,
        ..Default::default()
    };

    let written = unpack_all(&container, dst.path(), &options).await.unwrap();

    assert_eq!(written, 1);
    assert_eq!(snapshot(dst.path()).len(), 1);
}

#[tokio::test]
async fn test_rootless_directory_packs_silently() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("only.css"), "p {}").unwrap();

    let written = pack_then_unpack(src.path(), dst.path()).await;

    assert_eq!(written, 1);
    assert!(!dst.path().join("index.html").exists());
    assert_eq!(fs::read(dst.path().join("only.css")).unwrap(), b"p {}");
}

#[tokio::test]
async fn test_require_root_rejects_rootless_directory() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("only.css"), "p {}").unwrap();

    let err = pack_all(src.path(), &PackOptions { require_root: true })
        .await
        .unwrap_err();
    assert!(matches!(err, MhtError::MissingRoot));
}

#[test]
fn test_existing_archive_is_not_touched() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("site.mht");
    fs::write(&archive, "previous").unwrap();

    let err = LocalFileSink::new(&archive, false).err().unwrap();

    assert!(matches!(err, MhtError::ArchiveExists(_)));
    assert_eq!(fs::read_to_string(&archive).unwrap(), "previous");
}

const FOREIGN_ARCHIVE: &str = "From: <Saved by a browser>\r\n\
    MIME-Version: 1.0\r\n\
    Content-Type: multipart/related;\r\n\
    \ttype=\"text/html\";\r\n\
    \tboundary=\"----MultipartBoundary--abc\"\r\n\
    \r\n\
    ------MultipartBoundary--abc\r\n\
    Content-Type: text/html\r\n\
    Content-Transfer-Encoding: quoted-printable\r\n\
    \r\n\
    <html><body>caf=C3=A9</body></html>\r\n\
    ------MultipartBoundary--abc\r\n\
    Content-Type: text/css\r\n\
    Content-Transfer-Encoding: 7bit\r\n\
    Content-Location: styles/main.css\r\n\
    \r\n\
    p { margin: 0 }\r\n\
    ------MultipartBoundary--abc\r\n\
    Content-Type: image/png\r\n\
    Content-Transfer-Encoding: base64\r\n\
    Content-Location: ./img/dot.png\r\n\
    \r\n\
    iVBORw0KGgo=\r\n\
    ------MultipartBoundary--abc--\r\n";

#[tokio::test]
async fn test_unpack_foreign_archive() {
    let dst = TempDir::new().unwrap();

    let container = parse_archive(FOREIGN_ARCHIVE.as_bytes()).unwrap();
    let written = unpack_all(&container, dst.path(), &UnpackOptions::default())
        .await
        .unwrap();

    assert_eq!(written, 3);
    let files = snapshot(dst.path());
    assert_eq!(files["index.html"], b"<html><body>caf\xC3\xA9</body></html>");
    assert_eq!(files["styles/main.css"], b"p { margin: 0 }");
    assert_eq!(files["img/dot.png"], PNG_HEADER[..8]);
}

#[tokio::test]
async fn test_fix_html_7bit_writes_foreign_payload_verbatim() {
    let dst = TempDir::new().unwrap();
    let options = UnpackOptions {
        fix_html_7bit: true,
        ..Default::default()
    };

    let container = parse_archive(FOREIGN_ARCHIVE.as_bytes()).unwrap();
    unpack_all(&container, dst.path(), &options).await.unwrap();

    let files = snapshot(dst.path());
    assert_eq!(files["index.html"], b"<html><body>caf=C3=A9</body></html>");
    assert_eq!(files["styles/main.css"], b"p { margin: 0 }");
    assert_eq!(files["img/dot.png"], PNG_HEADER[..8]);
}

#[tokio::test]
async fn test_unpack_undecodable_archive_writes_nothing() {
    let work = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let archive = work.path().join("broken.mht");
    fs::write(
        &archive,
        "Content-Type: multipart/related; boundary=\"B\"\r\n\
        \r\n\
        --B\r\n\
        Content-Type: text/html\r\n\
        \r\n\
        <p>ok</p>\r\n\
        --B\r\n\
        Content-Type: image/png\r\n\
        Content-Transfer-Encoding: base64\r\n\
        Content-Location: a.png\r\n\
        \r\n\
        @@not base64@@\r\n\
        --B--\r\n",
    )
    .unwrap();

    let source = LocalFileSource::new(&archive).unwrap();
    let err = read_archive(&source, ArchiveEncoding::default()).await.unwrap_err();

    assert!(matches!(err, MhtError::Decode(_)), "{err}");
    assert!(snapshot(dst.path()).is_empty());
}

#[tokio::test]
async fn test_unpack_archive_in_legacy_encoding() {
    let work = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let archive = work.path().join("latin1.mht");
    let text = "Content-Type: multipart/related; boundary=\"B\"\r\n\
        \r\n\
        --B\r\n\
        Content-Type: text/html\r\n\
        Content-Transfer-Encoding: 8bit\r\n\
        \r\n\
        <p>café</p>\r\n\
        --B--\r\n";
    let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!unmappable);
    fs::write(&archive, &bytes).unwrap();

    let encoding = ArchiveEncoding::for_label("latin1").unwrap();
    let source = LocalFileSource::new(&archive).unwrap();
    let parsed = read_archive(&source, encoding).await.unwrap();
    unpack_all(&parsed, dst.path(), &UnpackOptions::default())
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(dst.path().join("index.html")).unwrap(), "<p>café</p>");
}

#[tokio::test]
async fn test_round_trip_through_gb18030_archive() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    build_site(src.path());
    let archive = work.path().join("site.mht");
    let encoding = ArchiveEncoding::for_label("gb18030").unwrap();

    let container = pack_all(src.path(), &PackOptions::default()).await.unwrap();
    let sink = LocalFileSink::new(&archive, false).unwrap();
    write_container(&sink, &container, encoding).await.unwrap();

    let source = LocalFileSource::new(&archive).unwrap();
    let parsed = read_archive(&source, encoding).await.unwrap();
    unpack_all(&parsed, dst.path(), &UnpackOptions::default())
        .await
        .unwrap();

    assert_eq!(snapshot(src.path()), snapshot(dst.path()));
}

#[tokio::test]
async fn test_pack_rejects_non_utf8_text() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("index.html"), "<p>root</p>").unwrap();
    fs::write(src.path().join("legacy.txt"), b"caf\xE9").unwrap();

    let err = pack_all(src.path(), &PackOptions::default()).await.unwrap_err();

    match err {
        MhtError::Decode(msg) => assert!(msg.starts_with("legacy.txt:"), "{msg}"),
        other => panic!("expected a decode error, got {other:?}"),
    }
}
