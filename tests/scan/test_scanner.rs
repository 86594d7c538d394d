use bucket_labeler::config::ScanConfig;
use bucket_labeler::scan::{LabelScanner, RunSummary, ScanOutcome, RULE};
use bucket_labeler::storage::{MockS3Backend, ObjectStorage, StorageError};
use bucket_labeler::vision::{LabelError, LabelResult, MockLabelBackend, MAX_LABELS};

const BUCKET: &str = "scan-bucket";

fn labels(names: &[&str]) -> Vec<LabelResult> {
    names
        .iter()
        .map(|name| LabelResult {
            name: name.to_string(),
            confidence: 95.0,
            instances: vec![],
            parents: vec![],
        })
        .collect()
}

async fn run_scan(storage: &MockS3Backend, detector: &MockLabelBackend) -> (ScanOutcome, String) {
    let scanner = LabelScanner::new(storage, detector, ScanConfig::for_bucket(BUCKET));
    let mut out = Vec::new();
    let outcome = scanner.run(&mut out).await.unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_empty_bucket_stops_before_labeling() {
    let storage = MockS3Backend::new();
    storage.set_no_contents(BUCKET).await;
    let detector = MockLabelBackend::new();

    let (outcome, output) = run_scan(&storage, &detector).await;

    assert_eq!(outcome, ScanOutcome::NoImages);
    assert!(detector.calls().await.is_empty());
    assert!(output.contains("No images found"));
    assert!(!output.contains("SUMMARY"));
    assert_eq!(
        output,
        "Fetching images from bucket: scan-bucket\n\
         No objects found in bucket: scan-bucket\n\
         No images found in the bucket.\n"
    );
}

#[tokio::test]
async fn test_listing_failure_stops_before_labeling() {
    let storage = MockS3Backend::new();
    storage.put_keys(BUCKET, ["a.jpg"]).await;
    storage
        .inject_error(StorageError::ServiceError("InternalError".into()))
        .await;
    let detector = MockLabelBackend::new();

    let (outcome, output) = run_scan(&storage, &detector).await;

    assert_eq!(outcome, ScanOutcome::NoImages);
    assert!(detector.calls().await.is_empty());
    assert!(output.contains("Error listing bucket contents: Service error: InternalError"));
    assert!(output.ends_with("No images found in the bucket.\n"));
}

#[tokio::test]
async fn test_one_success_one_failure() {
    let storage = MockS3Backend::new();
    storage.put_keys(BUCKET, ["first.jpg", "second.png"]).await;
    let detector = MockLabelBackend::new();
    detector
        .set_labels("first.jpg", labels(&["Car", "Road", "Sky"]))
        .await;
    detector
        .set_error("second.png", LabelError::NetworkError("reset".into()))
        .await;

    let (outcome, output) = run_scan(&storage, &detector).await;

    assert_eq!(
        outcome,
        ScanOutcome::Completed(RunSummary {
            images_found: 2,
            successful: 1,
            failed: 1,
            total_labels: 3,
        })
    );
    assert!(output.contains("Found 2 image(s) in the bucket\n"));
    assert!(output.contains("Files: first.jpg, second.png\n"));
    assert!(output.contains("✓ Labels detected in first.jpg: 3\n"));
    assert!(output.contains("ERROR processing second.png: Network error: reset\n"));
    assert!(output.contains("✗ Failed to process second.png\n"));
    assert!(output.contains("Total images found: 2\n"));
    assert!(output.contains("Successfully processed: 1\n"));
    assert!(output.contains("Failed: 1\n"));
    assert!(output.ends_with("Total labels detected: 3\n"));
}

#[tokio::test]
async fn test_images_processed_in_listing_order() {
    let storage = MockS3Backend::new();
    storage
        .put_keys(BUCKET, ["z.jpg", "notes.txt", "a.PNG", "m.jpeg"])
        .await;
    let detector = MockLabelBackend::new();
    for key in ["z.jpg", "a.PNG", "m.jpeg"] {
        detector.set_labels(key, labels(&["Thing"])).await;
    }

    let (outcome, _) = run_scan(&storage, &detector).await;

    let keys: Vec<String> = detector
        .calls()
        .await
        .into_iter()
        .map(|call| call.key)
        .collect();
    assert_eq!(keys, vec!["z.jpg", "a.PNG", "m.jpeg"]);
    assert!(detector.calls().await.iter().all(|call| call.bucket == BUCKET));
    assert!(detector
        .calls()
        .await
        .iter()
        .all(|call| call.max_labels == MAX_LABELS));

    match outcome {
        ScanOutcome::Completed(summary) => {
            assert_eq!(summary.images_found, 3);
            assert_eq!(summary.successful, 3);
            assert_eq!(summary.total_labels, 3);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_all_images_failing_still_completes() {
    let storage = MockS3Backend::new();
    storage.put_keys(BUCKET, ["a.jpg", "b.jpg"]).await;
    // No responses configured: every detection fails
    let detector = MockLabelBackend::new();

    let (outcome, output) = run_scan(&storage, &detector).await;

    assert_eq!(
        outcome,
        ScanOutcome::Completed(RunSummary {
            images_found: 2,
            successful: 0,
            failed: 2,
            total_labels: 0,
        })
    );
    assert_eq!(output.matches("✗ Failed to process").count(), 2);
    assert!(output.contains("SUMMARY"));
}

#[tokio::test]
async fn test_report_layout() {
    let storage = MockS3Backend::new();
    storage.put_keys(BUCKET, ["only.jpg"]).await;
    let detector = MockLabelBackend::new();
    detector.set_labels("only.jpg", labels(&["Cup"])).await;

    let (_, output) = run_scan(&storage, &detector).await;

    let expected = format!(
        "Fetching images from bucket: scan-bucket\n\
         Found 1 image(s) in the bucket\n\
         Files: only.jpg\n\
         {rule}\n\
         \n\
         {rule}\n\
         Detected labels for only.jpg\n\
         \n\
         Label: Cup\n\
         Confidence: 95\n\
         Instances:\n\
         Parents:\n\
         ----------\n\
         \n\
         ✓ Labels detected in only.jpg: 1\n\
         {rule}\n\
         \n\
         \n\
         {rule}\n\
         SUMMARY\n\
         {rule}\n\
         Total images found: 1\n\
         Successfully processed: 1\n\
         Failed: 0\n\
         Total labels detected: 1\n",
        rule = RULE
    );
    assert_eq!(output, expected);
    assert_eq!(RULE.len(), 60);
}
