//! # Forum Client
//!
//! Forums, posts and comments. Every method is a fixed method/path plus a
//! declared response type, with no state of its own.

use crate::clients::resource_client::ResourceClient;
use crate::framework::{ApiResult, RequestExecutor};
use crate::model::{Comment, CreateCommentRequest, CreatePostRequest, Forum, Post};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the forum endpoints.
#[derive(Clone)]
pub struct ForumClient {
    executor: RequestExecutor,
}

impl ForumClient {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ResourceClient<Forum> for ForumClient {
    fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn collection(&self) -> &str {
        "forums"
    }
}

impl ForumClient {
    pub async fn get_forums(&self) -> ApiResult<Vec<Forum>> {
        self.list().await
    }

    pub async fn get_forum(&self, forum_id: u64) -> ApiResult<Forum> {
        self.get(forum_id).await
    }

    /// Posts of a forum. An unknown forum id yields an empty list, not a 404.
    #[instrument(skip(self))]
    pub async fn get_forum_posts(&self, forum_id: u64) -> ApiResult<Vec<Post>> {
        debug!("Sending request");
        self.executor.get(&format!("forums/{forum_id}/posts")).await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: u64) -> ApiResult<Post> {
        debug!("Sending request");
        self.executor.get(&format!("posts/{post_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn get_post_comments(&self, post_id: u64) -> ApiResult<Vec<Comment>> {
        debug!("Sending request");
        let path = format!("posts/{post_id}/comments");
        self.executor.get(&path).await
    }

    #[instrument(skip(self))]
    pub async fn create_post(&self, request: &CreatePostRequest) -> ApiResult<Post> {
        debug!("Sending request");
        self.executor.post("posts", request).await
    }

    /// The target post comes from `request.post_id`, nowhere else.
    #[instrument(skip(self))]
    pub async fn create_comment(&self, request: &CreateCommentRequest) -> ApiResult<Comment> {
        debug!("Sending request");
        self.executor
            .post(&format!("posts/{}/comments", request.post_id), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_transport, expect_request, MockTransport};
    use crate::framework::{ApiErrorKind, Method, TransportResponse};
    use serde_json::json;

    fn post_json(id: u64, forum_id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "forumId": forum_id,
            "title": "Hello",
            "content": "First!",
            "authorId": 1,
            "createdAt": "2024-01-15T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_get_forum_uses_collection_path() {
        let mut mock = MockTransport::new();
        let general = json!({"id": 1, "title": "General", "description": "d", "members": [1]});
        mock.expect_get("forums/1").return_json(200, general);
        mock.expect_get("forums/2")
            .return_json(404, json!({"error": "Forum not found"}));
        let client = ForumClient::new(RequestExecutor::new(mock.transport()));

        let forum = client.get_forum(1).await.unwrap();
        assert_eq!(forum.title, "General");

        let err = client.get_forum(2).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::HttpFailure { status: 404 });
        assert_eq!(err.message(), "Forum not found");
        mock.verify();
    }

    #[tokio::test]
    async fn test_unknown_forum_posts_is_empty_ok() {
        let mut mock = MockTransport::new();
        mock.expect_get("forums/999/posts")
            .return_json(200, json!([]));
        let client = ForumClient::new(RequestExecutor::new(mock.transport()));

        let posts = client.get_forum_posts(999).await;
        assert_eq!(posts, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_create_post_sends_payload() {
        let (transport, mut receiver) = create_mock_transport(10);
        let client = ForumClient::new(RequestExecutor::new(transport));

        let create_task = tokio::spawn(async move {
            let request = CreatePostRequest {
                title: "Hello".into(),
                content: "First!".into(),
                forum_id: 1,
            };
            client.create_post(&request).await
        });

        let (request, responder) = expect_request(&mut receiver)
            .await
            .expect("Expected request");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "posts");
        let expected = json!({"title": "Hello", "content": "First!", "forumId": 1});
        assert_eq!(request.body, Some(expected));
        responder
            .send(Ok(TransportResponse::json(201, &post_json(10, 1))))
            .unwrap();

        let post = create_task.await.unwrap().unwrap();
        assert_eq!(post.id, 10);
    }

    #[tokio::test]
    async fn test_create_comment_targets_argument_post() {
        let (transport, mut receiver) = create_mock_transport(10);
        let client = ForumClient::new(RequestExecutor::new(transport));

        let create_task = tokio::spawn(async move {
            let request = CreateCommentRequest {
                content: "Nice".into(),
                post_id: 42,
            };
            client.create_comment(&request).await
        });

        let (request, responder) = expect_request(&mut receiver)
            .await
            .expect("Expected request");
        assert_eq!(request.path, "posts/42/comments");
        let expected = json!({"content": "Nice", "postId": 42});
        assert_eq!(request.body, Some(expected));
        let comment = json!({
            "id": 5,
            "content": "Nice",
            "authorId": 1,
            "createdAt": "2024-01-15T11:00:00Z",
            "postId": 42
        });
        responder
            .send(Ok(TransportResponse::json(201, &comment)))
            .unwrap();

        let comment = create_task.await.unwrap().unwrap();
        assert_eq!(comment.post_id, Some(42));
    }
}
