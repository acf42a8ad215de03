//! Mock-server helpers shared by the integration tests.

use mockito::{Matcher, Mock, Server, ServerGuard};

/// A mock server that fails the test if any request reaches it.
pub struct NoCallServer {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl NoCallServer {
    pub async fn start() -> Self {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
            let mock = server
                .mock(method, Matcher::Any)
                .with_status(500)
                .expect(0)
                .create_async()
                .await;
            mocks.push(mock);
        }
        Self { server, mocks }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub async fn assert_no_calls(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }
}
