use chrono::{TimeZone, Utc};
use s3_exporter_store::{BucketLister, ListingQuery, ObjectLister, S3Config, S3Store, StoreError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn store_for(server: &MockServer) -> S3Store {
    let config = S3Config {
        max_attempts: 1,
        ..S3Config::default()
            .with_endpoint(server.uri())
            .with_region("us-east-1")
            .with_credentials("test", "test")
            .with_path_style()
    };
    S3Store::new(&config).await.unwrap()
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "application/xml")
        .set_body_string(body)
}

#[tokio::test]
async fn test_list_page_maps_contents_and_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-bucket/"))
        .and(query_param("list-type", "2"))
        .and(query_param("prefix", "logs/"))
        .respond_with(xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>test-bucket</Name>
    <Prefix>logs/</Prefix>
    <KeyCount>2</KeyCount>
    <MaxKeys>2</MaxKeys>
    <IsTruncated>true</IsTruncated>
    <NextContinuationToken>page-2</NextContinuationToken>
    <Contents>
        <Key>logs/a.log</Key>
        <LastModified>2024-01-01T00:00:00.000Z</LastModified>
        <ETag>"aaa"</ETag>
        <Size>10</Size>
        <StorageClass>STANDARD</StorageClass>
    </Contents>
    <Contents>
        <Key>logs/b.log</Key>
        <LastModified>2024-02-01T00:00:00.000Z</LastModified>
        <ETag>"bbb"</ETag>
        <Size>20</Size>
        <StorageClass>STANDARD</StorageClass>
    </Contents>
</ListBucketResult>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let page = store
        .list_page(&ListingQuery::new("test-bucket").with_prefix("logs/"))
        .await
        .unwrap();

    assert_eq!(page.objects.len(), 2);
    assert_eq!(page.objects[0].size, 10);
    assert_eq!(page.objects[1].size, 20);
    assert_eq!(
        page.objects[1].last_modified,
        Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(page.common_prefix_count, 0);
    assert_eq!(page.next_continuation_token.as_deref(), Some("page-2"));
}

#[tokio::test]
async fn test_list_page_counts_common_prefixes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-bucket/"))
        .and(query_param("delimiter", "/"))
        .and(query_param("continuation-token", "page-2"))
        .respond_with(xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>test-bucket</Name>
    <Prefix></Prefix>
    <Delimiter>/</Delimiter>
    <KeyCount>3</KeyCount>
    <MaxKeys>1000</MaxKeys>
    <IsTruncated>false</IsTruncated>
    <CommonPrefixes><Prefix>logs/</Prefix></CommonPrefixes>
    <CommonPrefixes><Prefix>data/</Prefix></CommonPrefixes>
    <CommonPrefixes><Prefix>tmp/</Prefix></CommonPrefixes>
</ListBucketResult>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let mut query = ListingQuery::new("test-bucket").with_delimiter("/");
    query.continuation_token = Some("page-2".into());

    let page = store.list_page(&query).await.unwrap();

    assert!(page.objects.is_empty());
    assert_eq!(page.common_prefix_count, 3);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_list_page_no_such_bucket() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("Content-Type", "application/xml")
                .set_body_string(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>NoSuchBucket</Code>
    <Message>The specified bucket does not exist</Message>
    <BucketName>missing</BucketName>
    <RequestId>req-1</RequestId>
</Error>"#,
                ),
        )
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let result = store.list_page(&ListingQuery::new("missing")).await;

    assert!(matches!(result, Err(StoreError::NoSuchBucket(b)) if b == "missing"));
}

#[tokio::test]
async fn test_list_page_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-bucket/"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("Content-Type", "application/xml")
                .set_body_string(
                    r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>InternalError</Code>
    <Message>We encountered an internal error. Please try again.</Message>
    <RequestId>req-2</RequestId>
</Error>"#,
                ),
        )
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let result = store.list_page(&ListingQuery::new("test-bucket")).await;

    assert!(matches!(result, Err(StoreError::Request(_))));
}

#[tokio::test]
async fn test_list_buckets_keeps_unset_names_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Owner>
        <ID>owner</ID>
        <DisplayName>owner</DisplayName>
    </Owner>
    <Buckets>
        <Bucket>
            <Name>alpha</Name>
            <CreationDate>2024-01-01T00:00:00.000Z</CreationDate>
        </Bucket>
        <Bucket>
            <CreationDate>2024-01-02T00:00:00.000Z</CreationDate>
        </Bucket>
        <Bucket>
            <Name>beta</Name>
            <CreationDate>2024-01-03T00:00:00.000Z</CreationDate>
        </Bucket>
    </Buckets>
</ListAllMyBucketsResult>"#,
        ))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let buckets = store.list_buckets().await.unwrap();

    assert_eq!(buckets, vec!["alpha".to_string(), String::new(), "beta".to_string()]);
}
