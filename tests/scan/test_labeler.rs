use bucket_labeler::scan::label_image;
use bucket_labeler::vision::{
    BoundingBox, ImageKey, Instance, LabelDetector, LabelError, LabelResult, MockLabelBackend,
    MAX_LABELS,
};

fn label(name: &str, instances: usize, parents: &[&str]) -> LabelResult {
    LabelResult {
        name: name.to_string(),
        confidence: 90.0,
        instances: (0..instances)
            .map(|i| Instance {
                bounding_box: BoundingBox {
                    top: 0.25 * i as f32,
                    left: 0.5,
                    width: 0.25,
                    height: 0.5,
                },
                confidence: 88.0,
            })
            .collect(),
        parents: parents.iter().map(|p| p.to_string()).collect(),
    }
}

async fn run_labeler(
    detector: &MockLabelBackend,
    key: &str,
) -> (Result<usize, LabelError>, String) {
    let key = ImageKey::parse(key).unwrap();
    let mut out = Vec::new();
    let outcome = label_image(detector, "bucket", &key, &mut out).await.unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_success_returns_label_count() {
    let detector = MockLabelBackend::new();
    detector
        .set_labels(
            "park.jpg",
            vec![
                label("Tree", 2, &["Plant"]),
                label("Grass", 0, &["Plant"]),
                label("Dog", 1, &["Animal", "Pet"]),
            ],
        )
        .await;

    let (outcome, output) = run_labeler(&detector, "park.jpg").await;
    assert_eq!(outcome.unwrap(), 3);
    assert!(output.starts_with("Detected labels for park.jpg\n\n"));
    assert_eq!(output.matches("Label: ").count(), 3);
    assert_eq!(output.matches("----------").count(), 3);
    assert_eq!(output.matches("  Bounding box").count(), 3);
}

#[tokio::test]
async fn test_block_fields_in_order() {
    let detector = MockLabelBackend::new();
    detector
        .set_labels("dog.png", vec![label("Dog", 1, &["Animal"])])
        .await;

    let (_, output) = run_labeler(&detector, "dog.png").await;

    let positions: Vec<usize> = [
        "Label: Dog",
        "Confidence: 90",
        "Instances:",
        "  Bounding box",
        "    Top: 0",
        "    Left: 0.5",
        "    Width: 0.25",
        "    Height: 0.5",
        "  Confidence: 88",
        "Parents:",
        "   Animal",
        "----------",
    ]
    .iter()
    .map(|needle| output.find(needle).unwrap_or_else(|| panic!("missing {:?}", needle)))
    .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_always_requests_fixed_label_cap() {
    let detector = MockLabelBackend::new();
    detector.set_labels("a.jpg", vec![]).await;
    detector
        .set_error("b.jpg", LabelError::NetworkError("reset".into()))
        .await;

    let _ = run_labeler(&detector, "a.jpg").await;
    let _ = run_labeler(&detector, "b.jpg").await;

    let calls = detector.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.max_labels == MAX_LABELS));
    assert_eq!(MAX_LABELS, 5);
}

#[tokio::test]
async fn test_fault_is_reported_with_key() {
    let detector = MockLabelBackend::new();
    detector
        .set_error(
            "broken.jpg",
            LabelError::InvalidImage("InvalidImageFormatException".into()),
        )
        .await;

    let (outcome, output) = run_labeler(&detector, "broken.jpg").await;
    assert!(matches!(outcome, Err(LabelError::InvalidImage(_))));
    assert_eq!(
        output,
        "ERROR processing broken.jpg: Invalid image: InvalidImageFormatException\n\n"
    );
}

// Zero labels and a fault both contribute no labels; only the Result tells them apart.
#[tokio::test]
async fn test_zero_labels_versus_fault() {
    let detector = MockLabelBackend::new();
    detector.set_labels("blank.png", vec![]).await;
    detector
        .inject_error(LabelError::NetworkError("timed out".into()))
        .await;

    let (failed, _) = run_labeler(&detector, "blank.png").await;
    let (empty, output) = run_labeler(&detector, "blank.png").await;

    assert_eq!(failed.as_ref().copied().unwrap_or(0), 0);
    assert_eq!(empty.as_ref().copied().unwrap_or(0), 0);
    assert!(failed.is_err());
    assert!(empty.is_ok());
    assert_eq!(output, "Detected labels for blank.png\n\n");
}
