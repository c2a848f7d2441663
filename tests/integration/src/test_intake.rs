//! End-to-end intake tests: XML in, JSON object in S3 out.

#[cfg(test)]
mod tests {
    use xmlintake_core::{IntakeConfig, IntakeError, IntakeRequest};

    use crate::{
        cleanup_bucket, create_test_bucket, intake_handler, list_keys, s3_client,
        test_bucket_name,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_store_converted_document() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "intake").await;
        let handler = intake_handler(&client, &IntakeConfig::default());

        let req = IntakeRequest::from_xml("<root><a>1</a><a>2</a></root>")
            .with_bucket(&bucket)
            .with_sid("s1");
        let resp = handler.handle(req).await.expect("handle");

        assert_eq!(resp.bucket, bucket);
        assert!(resp.key.starts_with("s1/"), "key: {}", resp.key);
        assert!(resp.key.ends_with(".json"), "key: {}", resp.key);
        assert!(resp.e_tag.is_some(), "etag should be present");

        let obj = client
            .get_object()
            .bucket(&bucket)
            .key(&resp.key)
            .send()
            .await
            .expect("get_object");
        assert_eq!(obj.content_type(), Some("application/json"));

        let data = obj
            .body
            .collect()
            .await
            .expect("collect body")
            .into_bytes();
        assert_eq!(data.as_ref(), br#"{"root":{"a":["1","2"]}}"#);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_use_configured_default_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "fixed").await;
        let config = IntakeConfig::builder().default_bucket(bucket.clone()).build();
        let handler = intake_handler(&client, &config);

        let resp = handler
            .handle(IntakeRequest::from_xml("<note>hi</note>"))
            .await
            .expect("handle");

        assert_eq!(resp.bucket, bucket);
        assert_eq!(list_keys(&client, &bucket, None).await, vec![resp.key]);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_write_distinct_keys_for_repeated_input() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "repeat").await;
        let handler = intake_handler(&client, &IntakeConfig::default());

        let req = IntakeRequest::from_xml("<a>same</a>")
            .with_bucket(&bucket)
            .with_sid("dup");
        for _ in 0..3 {
            handler.handle(req.clone()).await.expect("handle");
        }

        let keys = list_keys(&client, &bucket, Some("dup/")).await;
        assert_eq!(keys.len(), 3, "keys: {keys:?}");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_not_write_malformed_xml() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "malformed").await;
        let handler = intake_handler(&client, &IntakeConfig::default());

        let err = handler
            .handle(IntakeRequest::from_xml("<root><a></root>").with_bucket(&bucket))
            .await
            .expect_err("malformed XML must fail");

        assert!(matches!(err, IntakeError::Parse(_)), "error: {err}");
        assert!(list_keys(&client, &bucket, None).await.is_empty());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_pass_through_missing_bucket_error() {
        let client = s3_client();
        let bucket = test_bucket_name("ghost");
        let handler = intake_handler(&client, &IntakeConfig::default());

        let err = handler
            .handle(IntakeRequest::from_xml("<a/>").with_bucket(&bucket))
            .await
            .expect_err("put to nonexistent bucket should fail");

        match err {
            IntakeError::Storage(inner) => assert_eq!(inner.code(), Some("NoSuchBucket")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
