//! Pipeline integration tests: real files on disk, in-memory host and bucket.
//!
//! Run with: `cargo test -p mediaferry-ingest --test ingest_test`

mod helpers;

use helpers::fixtures::{write_jpeg, write_pdf};
use helpers::{setup_test_env, setup_test_env_with_codec};
use image::{GenericImageView, ImageFormat};
use mediaferry_core::{AttachmentId, AttachmentMetadata};
use mediaferry_ingest::{Codec, UploadOutcome};

#[tokio::test]
async fn test_jpeg_is_converted_uploaded_and_removed() {
    let env = setup_test_env();
    write_jpeg(&env.local("2024/photo.jpg"), 64, 48);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");

    let metadata = env
        .offload
        .orchestrator()
        .on_metadata_generated(id, env.draft_metadata("2024/photo.jpg"))
        .await;

    assert_eq!(metadata.file, "2024/photo.webp");
    assert!(metadata.sizes.is_empty());
    assert!(!env.local("2024/photo.jpg").exists());
    assert!(!env.local("2024/photo.webp").exists());

    let object = env.storage.get("2024/photo.webp").expect("object uploaded");
    assert_eq!(object.content_type, "image/webp");
    let decoded = image::load_from_memory_with_format(&object.data, ImageFormat::WebP).unwrap();
    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(env.storage.keys(), vec!["2024/photo.webp".to_string()]);

    let attachment = env.host.get(id).unwrap();
    assert_eq!(attachment.relative_path, "2024/photo.webp");
    assert_eq!(attachment.mime_type, "image/webp");
}

#[tokio::test]
async fn test_pdf_is_uploaded_unchanged() {
    let env = setup_test_env();
    write_pdf(&env.local("2024/doc.pdf"));
    let id = env.host.insert(7, "2024/doc.pdf", "application/pdf");

    let outcome = env
        .offload
        .orchestrator()
        .on_attachment_created(id)
        .await
        .unwrap();

    assert!(outcome.is_uploaded());
    assert_eq!(outcome.key(), "2024/doc.pdf");
    assert!(!env.local("2024/doc.pdf").exists());

    let object = env.storage.get("2024/doc.pdf").unwrap();
    assert_eq!(object.content_type, "application/pdf");
    assert_eq!(object.data.as_ref(), helpers::fixtures::create_test_pdf().as_slice());

    let attachment = env.host.get(id).unwrap();
    assert_eq!(attachment.relative_path, "2024/doc.pdf");
    assert_eq!(attachment.mime_type, "application/pdf");
}

#[tokio::test]
async fn test_pdf_metadata_event_keeps_metadata() {
    let env = setup_test_env();
    write_pdf(&env.local("2024/doc.pdf"));
    let id = env.host.insert(8, "2024/doc.pdf", "application/pdf");
    let draft = AttachmentMetadata::new("2024/doc.pdf");

    let (metadata, report) = env.offload.orchestrator().ingest(id, draft.clone()).await;

    assert_eq!(metadata, draft);
    assert!(report.converted_key.is_none());
    assert!(report.upload.unwrap().is_uploaded());
    assert!(env.storage.contains("2024/doc.pdf"));
}

#[tokio::test]
async fn test_created_after_conversion_is_skipped() {
    let env = setup_test_env();
    write_jpeg(&env.local("2024/photo.jpg"), 16, 16);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");

    env.offload
        .orchestrator()
        .on_metadata_generated(id, env.draft_metadata("2024/photo.jpg"))
        .await;
    let outcome = env.offload.orchestrator().on_attachment_created(id).await;

    assert!(matches!(outcome, Some(UploadOutcome::Skipped { ref key }) if key == "2024/photo.webp"));
    assert_eq!(env.storage.keys().len(), 1);
}

#[tokio::test]
async fn test_upload_failure_still_removes_local_file() {
    let env = setup_test_env();
    write_jpeg(&env.local("2024/photo.jpg"), 16, 16);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");
    env.storage.set_fail_uploads(true);

    let (metadata, report) = env
        .offload
        .orchestrator()
        .ingest(id, env.draft_metadata("2024/photo.jpg"))
        .await;

    assert_eq!(metadata.file, "2024/photo.webp");
    assert!(matches!(
        report.upload,
        Some(UploadOutcome::Failed {
            local_removed: true,
            ..
        })
    ));
    assert!(!env.local("2024/photo.jpg").exists());
    assert!(!env.local("2024/photo.webp").exists());
    assert!(env.storage.keys().is_empty());
}

#[tokio::test]
async fn test_unconvertible_image_uploads_original() {
    let env = setup_test_env();
    let path = env.local("2024/fake.jpg");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"plain text pretending to be a jpeg").unwrap();
    let id = env.host.insert(3, "2024/fake.jpg", "image/jpeg");
    let draft = env.draft_metadata("2024/fake.jpg");

    let (metadata, report) = env.offload.orchestrator().ingest(id, draft.clone()).await;

    assert_eq!(metadata, draft);
    assert!(report.converted_key.is_none());
    assert_eq!(report.upload.unwrap().key(), "2024/fake.jpg");

    let object = env.storage.get("2024/fake.jpg").unwrap();
    assert_eq!(object.data.as_ref(), b"plain text pretending to be a jpeg");
    assert_eq!(object.content_type, "image/jpeg");
}

#[tokio::test]
async fn test_no_capable_backend_uploads_original() {
    let env = setup_test_env_with_codec(Codec::with_backends(Vec::new(), 80.0));
    write_jpeg(&env.local("2024/photo.jpg"), 16, 16);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");

    let metadata = env
        .offload
        .orchestrator()
        .on_metadata_generated(id, env.draft_metadata("2024/photo.jpg"))
        .await;

    assert_eq!(metadata.file, "2024/photo.jpg");
    assert_eq!(metadata.sizes.len(), 1);
    assert!(env.storage.contains("2024/photo.jpg"));
    assert!(!env.local("2024/photo.jpg").exists());
}

#[tokio::test]
async fn test_host_update_failure_does_not_block_upload() {
    let env = setup_test_env();
    write_jpeg(&env.local("2024/photo.jpg"), 16, 16);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");
    env.host.set_fail_updates(true);

    let metadata = env
        .offload
        .orchestrator()
        .on_metadata_generated(id, env.draft_metadata("2024/photo.jpg"))
        .await;

    assert_eq!(metadata.file, "2024/photo.webp");
    assert!(env.storage.contains("2024/photo.webp"));
    assert_eq!(env.host.get(id).unwrap().relative_path, "2024/photo.jpg");
}

#[tokio::test]
async fn test_unknown_attachment_returns_metadata_untouched() {
    let env = setup_test_env();
    let draft = env.draft_metadata("2024/ghost.jpg");

    let metadata = env
        .offload
        .orchestrator()
        .on_metadata_generated(AttachmentId(404), draft.clone())
        .await;

    assert_eq!(metadata, draft);
    assert!(env
        .offload
        .orchestrator()
        .on_attachment_created(AttachmentId(404))
        .await
        .is_none());
    assert!(env.storage.keys().is_empty());
}

#[tokio::test]
async fn test_parallel_ingestion_of_different_attachments() {
    let env = setup_test_env();
    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        let relative = format!("2024/{}.jpg", name);
        write_jpeg(&env.local(&relative), 20, 10);
        env.host.insert(id, &relative, "image/jpeg");
    }

    let orchestrator = env.offload.orchestrator();
    let (a, b, c) = tokio::join!(
        orchestrator.on_metadata_generated(AttachmentId(1), env.draft_metadata("2024/a.jpg")),
        orchestrator.on_metadata_generated(AttachmentId(2), env.draft_metadata("2024/b.jpg")),
        orchestrator.on_metadata_generated(AttachmentId(3), env.draft_metadata("2024/c.jpg")),
    );

    assert_eq!(
        [a.file, b.file, c.file],
        ["2024/a.webp", "2024/b.webp", "2024/c.webp"]
    );
    assert_eq!(
        env.storage.keys(),
        vec!["2024/a.webp", "2024/b.webp", "2024/c.webp"]
    );
}

#[tokio::test]
async fn test_conversion_never_touches_another_attachments_file() {
    let env = setup_test_env();
    let other = env.local("2024/photo.webp");
    std::fs::create_dir_all(other.parent().unwrap()).unwrap();
    std::fs::write(&other, b"RIFF....WEBPother attachment bytes").unwrap();
    let other_id = env.host.insert(1, "2024/photo.webp", "image/webp");

    write_jpeg(&env.local("2024/photo.jpg"), 16, 16);
    let id = env.host.insert(42, "2024/photo.jpg", "image/jpeg");
    let draft = env.draft_metadata("2024/photo.jpg");

    let (metadata, report) = env.offload.orchestrator().ingest(id, draft.clone()).await;

    assert_eq!(metadata, draft);
    assert!(report.converted_key.is_none());
    assert!(env.storage.contains("2024/photo.jpg"));
    assert!(!env.local("2024/photo.jpg").exists());
    assert_eq!(
        std::fs::read(&other).unwrap(),
        b"RIFF....WEBPother attachment bytes"
    );
    assert_eq!(env.host.get(id).unwrap().relative_path, "2024/photo.jpg");

    let outcome = env
        .offload
        .orchestrator()
        .on_attachment_created(other_id)
        .await
        .unwrap();
    assert!(outcome.is_uploaded());
    assert_eq!(
        env.storage.get("2024/photo.webp").unwrap().data.as_ref(),
        b"RIFF....WEBPother attachment bytes"
    );
}
