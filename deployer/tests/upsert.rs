use fnpush_deployer::fakes::FakeClient;
use fnpush_deployer::{deploy, DeployError, Outcome, PlatformClient, PlatformError, ResourceSpec};

fn spec() -> ResourceSpec {
    ResourceSpec::new("fn-1", "pkg.zip")
}

#[tokio::test]
async fn existing_function_is_updated_only() {
    let client = FakeClient::new().on_update(Ok(()));
    let outcome = deploy(&client, &spec()).await.unwrap();

    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(client.calls(), vec!["update:fn-1"]);
}

#[tokio::test]
async fn missing_function_is_created() {
    let client = FakeClient::new()
        .on_update(Err(PlatformError::NotFound))
        .on_create(Ok(()));

    let outcome = deploy(&client, &spec()).await.unwrap();

    assert_eq!(outcome, Outcome::Created);
    assert_eq!(client.calls(), vec!["update:fn-1", "create:fn-1"]);
}

#[tokio::test]
async fn create_failure_is_surfaced_verbatim() {
    let client = FakeClient::new()
        .on_update(Err(PlatformError::NotFound))
        .on_create(Err(PlatformError::Other("quota exceeded".into())));

    let err = deploy(&client, &spec()).await.unwrap_err();

    assert_eq!(err, DeployError::Other("quota exceeded".into()));
    assert_eq!(client.calls(), vec!["update:fn-1", "create:fn-1"]);
}

#[tokio::test]
async fn update_failure_skips_create() {
    let client = FakeClient::new()
        .on_update(Err(PlatformError::Other("access denied".into())))
        .on_create(Ok(()));

    let err = deploy(&client, &spec()).await.unwrap_err();

    assert_eq!(err, DeployError::Other("access denied".into()));
    assert_eq!(client.calls(), vec!["update:fn-1"]);
}

#[tokio::test]
async fn not_found_on_create_is_not_retried() {
    let client = FakeClient::new()
        .on_update(Err(PlatformError::NotFound))
        .on_create(Err(PlatformError::NotFound));

    let err = deploy(&client, &spec()).await.unwrap_err();

    assert_eq!(err, DeployError::Other("resource not found".into()));
    assert_eq!(client.calls().len(), 2);
}

#[tokio::test]
async fn empty_identifier_makes_no_calls() {
    let client = FakeClient::new();
    let err = deploy(&client, &ResourceSpec::new("", "pkg.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidSpec(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn empty_artifact_makes_no_calls() {
    let client = FakeClient::new();
    let err = deploy(&client, &ResourceSpec::new("fn-1", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidSpec(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let client: Box<dyn PlatformClient> =
        Box::new(FakeClient::new().on_update(Err(PlatformError::NotFound)));

    assert_eq!(
        deploy(client.as_ref(), &spec()).await.unwrap(),
        Outcome::Created
    );
}

#[tokio::test]
async fn concurrent_deploys_do_not_interfere() {
    let existing = FakeClient::new();
    let missing = FakeClient::new().on_update(Err(PlatformError::NotFound));
    let first = ResourceSpec::new("fn-1", "one.zip");
    let second = ResourceSpec::new("fn-2", "two.zip");

    let (a, b) = tokio::join!(deploy(&existing, &first), deploy(&missing, &second));

    assert_eq!(a.unwrap(), Outcome::Updated);
    assert_eq!(b.unwrap(), Outcome::Created);
    assert_eq!(existing.calls(), vec!["update:fn-1"]);
    assert_eq!(missing.calls(), vec!["update:fn-2", "create:fn-2"]);
}
