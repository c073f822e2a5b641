use crate::framework::{ApiResult, RequestExecutor};
use crate::model::{LoginRequest, LoginResponse, LogoutResponse};
use tracing::{debug, instrument};

/// Client for the auth endpoints. Login needs no credential; the executor
/// attaches one anyway if the store holds it.
#[derive(Clone)]
pub struct AuthClient {
    executor: RequestExecutor,
}

impl AuthClient {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    #[instrument(skip(self))]
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        debug!("Sending request");
        self.executor.post("auth/login", request).await
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> ApiResult<LogoutResponse> {
        debug!("Sending request");
        self.executor.post_empty("auth/logout").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ApiErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_success_and_rejection() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/login")
            .return_json(200, json!({"sessionId": "session1", "userId": 1}));
        mock.expect_post("auth/login")
            .return_json(401, json!({"error": "Invalid credentials"}));
        let client = AuthClient::new(RequestExecutor::new(mock.transport()));

        let request = LoginRequest::new("user1", "password1");
        let ok = client.login(&request).await.unwrap();
        assert_eq!(ok.session_id, "session1");
        assert_eq!(ok.user_id, 1);

        let request = LoginRequest::new("user1", "wrong");
        let err = client.login(&request).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::HttpFailure { status: 401 });
        assert_eq!(err.message(), "Invalid credentials");

        let sent = mock.requests();
        let credentials = json!({"username": "user1", "password": "password1"});
        assert_eq!(sent[0].body, Some(credentials));
        mock.verify();
    }

    #[tokio::test]
    async fn test_logout_has_no_body() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/logout")
            .return_json(200, json!({"message": "Logged out successfully"}));
        let client = AuthClient::new(RequestExecutor::new(mock.transport()));

        let response = client.logout().await.unwrap();
        assert_eq!(response.message, "Logged out successfully");
        assert_eq!(mock.requests()[0].body, None);
    }
}
