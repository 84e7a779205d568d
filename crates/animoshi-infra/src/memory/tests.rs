use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use animoshi_core::domain::{ANONYMOUS_USER, Post, PostCounter, Waifu, WaifuStatus};
use animoshi_core::error::{AbuseReason, Dependency, RepoError};
use animoshi_core::ports::{
    BaseRepository, ChallengeScore, HumanVerifier, MediaError, MediaStore, PostRepository, Upload,
    VerifierError,
};
use animoshi_core::services::{NewComment, NewLike, NewPost, Repositories};
use animoshi_core::validation::{Page, Violation};
use animoshi_core::{InteractionError, InteractionService};

use super::InMemoryStore;

struct StaticVerifier(f64);

#[async_trait]
impl HumanVerifier for StaticVerifier {
    async fn score(&self, _token: &str) -> Result<ChallengeScore, VerifierError> {
        Ok(ChallengeScore {
            success: true,
            score: self.0,
        })
    }
}

struct FakeMedia;

#[async_trait]
impl MediaStore for FakeMedia {
    async fn upload(&self, upload: Upload) -> Result<String, MediaError> {
        Ok(format!("https://cdn.test/{}", upload.filename))
    }
}

/// Delegates to the store but refuses every counter increment.
struct StaleCounters(Arc<InMemoryStore>);

#[async_trait]
impl BaseRepository<Post, Uuid> for StaleCounters {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        BaseRepository::<Post, Uuid>::find_by_id(self.0.as_ref(), id).await
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        BaseRepository::<Post, Uuid>::insert(self.0.as_ref(), post).await
    }
}

#[async_trait]
impl PostRepository for StaleCounters {
    async fn list_recent(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        self.0.list_recent(page).await
    }

    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Post>, RepoError> {
        self.0.list_by_user(user_id, page).await
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, RepoError> {
        self.0.count_by_user(user_id).await
    }

    async fn increment_counter(&self, _id: Uuid, _counter: PostCounter) -> Result<i64, RepoError> {
        Err(RepoError::Connection("connection reset".to_string()))
    }
}

fn repositories(store: &Arc<InMemoryStore>) -> Repositories {
    Repositories {
        posts: store.clone(),
        comments: store.clone(),
        likes: store.clone(),
        waifus: store.clone(),
    }
}

fn service_with_score(score: f64) -> (InteractionService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let service =
        InteractionService::new(repositories(&store), Arc::new(StaticVerifier(score)), None);
    (service, store)
}

fn service() -> (InteractionService, Arc<InMemoryStore>) {
    service_with_score(0.9)
}

fn new_post(title: &str, content: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: content.to_string(),
        user_id: "user-1".to_string(),
        recaptcha_token: "token".to_string(),
        ..Default::default()
    }
}

fn new_comment(post_id: Uuid, text: &str) -> NewComment {
    NewComment {
        post_id: post_id.to_string(),
        user_id: "user-2".to_string(),
        text: text.to_string(),
        recaptcha_token: "token".to_string(),
    }
}

fn new_like(post_id: Uuid, session_token: Option<&str>) -> NewLike {
    NewLike {
        post_id: post_id.to_string(),
        user_id: "someone".to_string(),
        session_token: session_token.map(str::to_string),
        recaptcha_token: "token".to_string(),
    }
}

fn page(limit: u64) -> Page {
    Page::new(Some(limit), Some(0)).unwrap()
}

#[tokio::test]
async fn test_create_post_starts_with_zero_counters() {
    let (service, _) = service();

    let post = service
        .create_post(new_post("<b>Hello</b>", "World"), None)
        .await
        .unwrap();

    assert!(!post.id.is_nil());
    assert_eq!(post.likes, 0);
    assert_eq!(post.comments, 0);
    assert_eq!(post.title, "bHello/b");
    assert_eq!(post.user_name, post.user_id);

    let stored = service.get_post(post.id).await.unwrap();
    assert_eq!(stored, post);
}

#[tokio::test]
async fn test_comment_and_like_scenario() {
    let (service, _) = service();

    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    let comment = service
        .create_comment(new_comment(post.id, "first"), "9.9.9.9")
        .await
        .unwrap();
    assert_eq!(comment.post_id, post.id);
    assert_eq!(service.get_post(post.id).await.unwrap().comments, 1);

    service
        .create_like(new_like(post.id, None), "1.2.3.4")
        .await
        .unwrap();
    assert_eq!(service.get_post(post.id).await.unwrap().likes, 1);

    let repeat = service
        .create_like(new_like(post.id, None), "1.2.3.4")
        .await;
    assert!(matches!(
        repeat,
        Err(InteractionError::DuplicateAction { post_id }) if post_id == post.id
    ));
    assert_eq!(service.get_post(post.id).await.unwrap().likes, 1);

    service
        .create_like(new_like(post.id, None), "5.6.7.8")
        .await
        .unwrap();
    assert_eq!(service.get_post(post.id).await.unwrap().likes, 2);
}

#[tokio::test]
async fn test_comment_count_matches_number_of_comments() {
    let (service, _) = service();
    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    for i in 0..7 {
        let comment = service
            .create_comment(new_comment(post.id, &format!("comment {i}")), "9.9.9.9")
            .await
            .unwrap();
        assert_eq!(comment.post_id, post.id);
    }

    assert_eq!(service.get_post(post.id).await.unwrap().comments, 7);
    assert_eq!(service.list_comments(post.id, page(20)).await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_oversized_comment_is_not_recorded() {
    let (service, _) = service();
    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    let accepted = service
        .create_comment(new_comment(post.id, &"c".repeat(500)), "9.9.9.9")
        .await;
    assert!(accepted.is_ok());

    let result = service
        .create_comment(new_comment(post.id, &"c".repeat(501)), "9.9.9.9")
        .await;
    match result {
        Err(InteractionError::InvalidInput(err)) => {
            assert_eq!(err.field, "text");
            assert_eq!(err.violation, Violation::TooLong { max: 500 });
        }
        other => panic!("expected invalid input, got {other:?}"),
    }

    let mut long_author = new_comment(post.id, "hi");
    long_author.user_id = "u".repeat(129);
    assert!(matches!(
        service.create_comment(long_author, "9.9.9.9").await,
        Err(InteractionError::InvalidInput(_))
    ));

    assert_eq!(service.get_post(post.id).await.unwrap().comments, 1);
    assert_eq!(service.list_comments(post.id, page(20)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeat_session_token_is_duplicate_from_any_ip() {
    let (service, _) = service();
    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    service
        .create_like(new_like(post.id, Some("session-a")), "1.1.1.1")
        .await
        .unwrap();

    let repeat = service
        .create_like(new_like(post.id, Some("session-a")), "2.2.2.2")
        .await;
    assert!(matches!(repeat, Err(InteractionError::DuplicateAction { .. })));

    service
        .create_like(new_like(post.id, Some("session-b")), "3.3.3.3")
        .await
        .unwrap();
    assert_eq!(service.get_post(post.id).await.unwrap().likes, 2);
}

#[tokio::test]
async fn test_like_is_always_anonymous() {
    let (service, _) = service();
    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    let like = service
        .create_like(new_like(post.id, Some("session-a")), "1.1.1.1")
        .await
        .unwrap();

    assert_eq!(like.user_id, ANONYMOUS_USER);
    assert_eq!(like.user_ip, "1.1.1.1");
}

#[tokio::test]
async fn test_store_constraint_backs_up_duplicate_check() {
    let (_, store) = service();
    let post_id = Uuid::new_v4();
    let likes: Arc<dyn animoshi_core::ports::LikeRepository> = store;

    likes
        .insert(animoshi_core::domain::Like::new(
            post_id,
            "1.1.1.1".to_string(),
            None,
        ))
        .await
        .unwrap();

    let err = likes
        .insert(animoshi_core::domain::Like::new(
            post_id,
            "1.1.1.1".to_string(),
            None,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_interactions_on_missing_post_are_not_found() {
    let (service, _) = service();
    let missing = Uuid::new_v4();

    let comment = service
        .create_comment(new_comment(missing, "hi"), "1.1.1.1")
        .await;
    assert!(matches!(
        comment,
        Err(InteractionError::NotFound { entity_type: "post", id }) if id == missing
    ));

    let like = service.create_like(new_like(missing, None), "1.1.1.1").await;
    assert!(matches!(like, Err(InteractionError::NotFound { .. })));
    assert!(service.list_comments(missing, page(20)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gate_runs_before_validation() {
    let (service, _) = service_with_score(0.49);

    let result = service.create_post(new_post("", "World"), None).await;
    assert!(matches!(
        result,
        Err(InteractionError::AbuseRejected(AbuseReason::LowScore))
    ));

    let mut missing_token = new_post("Hello", "World");
    missing_token.recaptcha_token.clear();
    let result = service.create_post(missing_token, None).await;
    assert!(matches!(
        result,
        Err(InteractionError::AbuseRejected(AbuseReason::MissingToken))
    ));

    assert!(service.list_posts(page(20)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_boundary_score_is_accepted() {
    let (service, _) = service_with_score(0.5);

    assert!(service
        .create_post(new_post("Hello", "World"), None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_validation_failure_names_field() {
    let (service, _) = service();

    let result = service
        .create_post(new_post(&"a".repeat(101), "World"), None)
        .await;

    match result {
        Err(InteractionError::InvalidInput(err)) => {
            assert_eq!(err.field, "title");
            assert_eq!(err.violation, Violation::TooLong { max: 100 });
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_is_newest_first_and_capped() {
    let (service, store) = service();
    let base = Utc::now();

    for i in 0..25 {
        let mut post = Post::new(
            format!("post {i}"),
            String::new(),
            String::new(),
            false,
            "author".to_string(),
        );
        post.created_at = base + Duration::seconds(i);
        BaseRepository::<Post, Uuid>::insert(store.as_ref(), post)
            .await
            .unwrap();
    }

    let posts = service.list_posts(page(20)).await.unwrap();
    assert_eq!(posts.len(), 20);
    assert_eq!(posts[0].title, "post 24");
    assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let rest = service
        .list_posts(Page::new(Some(20), Some(20)).unwrap())
        .await
        .unwrap();
    assert_eq!(rest.len(), 5);

    assert!(Page::new(Some(21), Some(0)).is_err());
    assert_eq!(service.count_posts_by_user("author").await.unwrap(), 25);
    assert_eq!(
        service
            .list_posts_by_user("nobody", page(20))
            .await
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn test_stale_counter_does_not_reject_comment() {
    let store = Arc::new(InMemoryStore::new());
    let mut repos = repositories(&store);
    repos.posts = Arc::new(StaleCounters(store.clone()));
    let service = InteractionService::new(repos, Arc::new(StaticVerifier(0.9)), None);

    let post = service
        .create_post(new_post("Hello", "World"), None)
        .await
        .unwrap();

    let comment = service
        .create_comment(new_comment(post.id, "kept"), "1.1.1.1")
        .await
        .unwrap();

    assert_eq!(comment.post_id, post.id);
    assert_eq!(service.get_post(post.id).await.unwrap().comments, 0);
    assert_eq!(service.list_comments(post.id, page(20)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_approved_waifus_are_visible() {
    let (service, store) = service();
    let now = Utc::now();

    let waifu = |name: &str, status: WaifuStatus| Waifu {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        image: String::new(),
        user_id: "curator".to_string(),
        rating: 0,
        favorites: 0,
        status,
        created_at: now,
        updated_at: now,
    };

    let approved = waifu("approved", WaifuStatus::Approved);
    let pending = waifu("pending", WaifuStatus::Pending);
    for w in [approved.clone(), pending.clone()] {
        BaseRepository::<Waifu, Uuid>::insert(store.as_ref(), w)
            .await
            .unwrap();
    }

    assert_eq!(service.get_waifu(approved.id).await.unwrap().name, "approved");
    assert!(matches!(
        service.get_waifu(pending.id).await,
        Err(InteractionError::NotFound { entity_type: "waifu", .. })
    ));

    let listed = service.list_waifus(page(20)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, approved.id);
}

fn png(filename: &str, size: usize) -> Upload {
    Upload {
        filename: filename.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0; size],
    }
}

#[tokio::test]
async fn test_uploaded_image_becomes_post_image() {
    let store = Arc::new(InMemoryStore::new());
    let service = InteractionService::new(
        repositories(&store),
        Arc::new(StaticVerifier(0.9)),
        Some(Arc::new(FakeMedia)),
    );

    let post = service
        .create_post(new_post("Hello", "World"), Some(png("cat.png", 16)))
        .await
        .unwrap();
    assert_eq!(post.image, "https://cdn.test/cat.png");

    let mut explicit = new_post("Hello", "World");
    explicit.image = "https://example.com/dog.png".to_string();
    let post = service
        .create_post(explicit, Some(png("cat.png", 16)))
        .await
        .unwrap();
    assert_eq!(post.image, "https://example.com/dog.png");
}

#[tokio::test]
async fn test_upload_without_media_store_fails() {
    let (service, _) = service();

    let result = service
        .create_post(new_post("Hello", "World"), Some(png("cat.png", 16)))
        .await;

    assert!(matches!(
        result,
        Err(InteractionError::Dependency {
            dependency: Dependency::Media,
            ..
        })
    ));
}
